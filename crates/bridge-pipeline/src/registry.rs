//! Micro-transform registry and pipeline runner.
//!
//! A registry is an ordered global list plus an ordered list per endpoint.
//! It is assembled with a builder at start-up and is read-only afterwards,
//! so one registry can serve any number of concurrent translations.
//!
//! Order is part of the contract: the runner executes every global
//! transform, then every transform registered for the context's endpoint,
//! exactly in registration order. Adding behaviour means appending an entry.

use crate::context::{PipelineContext, RequestContext, ResponseContext};
use crate::endpoint::Endpoint;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// A small, stateless rewrite step with an optional applicability guard.
pub struct MicroTransform<C> {
    /// Diagnostic name; not required to be unique
    pub name: &'static str,
    /// Skip the transform when this returns false. `None` means always run.
    pub when: Option<fn(&C) -> bool>,
    /// Mutate the context in place
    pub apply: fn(&mut C),
}

pub type RequestTransform = MicroTransform<RequestContext>;
pub type ResponseTransform = MicroTransform<ResponseContext>;

impl<C> MicroTransform<C> {
    /// Unconditional transform
    pub fn new(name: &'static str, apply: fn(&mut C)) -> Self {
        Self {
            name,
            when: None,
            apply,
        }
    }

    /// Guarded transform
    pub fn guarded(name: &'static str, when: fn(&C) -> bool, apply: fn(&mut C)) -> Self {
        Self {
            name,
            when: Some(when),
            apply,
        }
    }

    /// Whether the guard admits this context
    pub fn applies_to(&self, ctx: &C) -> bool {
        self.when.map_or(true, |guard| guard(ctx))
    }
}

impl<C> Clone for MicroTransform<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for MicroTransform<C> {}

impl<C> fmt::Debug for MicroTransform<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicroTransform")
            .field("name", &self.name)
            .field("guarded", &self.when.is_some())
            .finish()
    }
}

/// Immutable transform table.
pub struct TransformRegistry<C> {
    global: Vec<MicroTransform<C>>,
    by_endpoint: HashMap<Endpoint, Vec<MicroTransform<C>>>,
}

impl<C> TransformRegistry<C> {
    pub fn builder() -> TransformRegistryBuilder<C> {
        TransformRegistryBuilder::default()
    }

    /// Transforms run for every endpoint
    pub fn global(&self) -> &[MicroTransform<C>] {
        &self.global
    }

    /// Transforms registered for one endpoint
    pub fn for_endpoint(&self, endpoint: Endpoint) -> &[MicroTransform<C>] {
        self.by_endpoint
            .get(&endpoint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of everything that would run for `endpoint`, in order
    pub fn names_for(&self, endpoint: Endpoint) -> Vec<&'static str> {
        self.global
            .iter()
            .chain(self.for_endpoint(endpoint))
            .map(|t| t.name)
            .collect()
    }

    /// Reopen the table for extension
    pub fn into_builder(self) -> TransformRegistryBuilder<C> {
        TransformRegistryBuilder {
            global: self.global,
            by_endpoint: self.by_endpoint,
        }
    }
}

impl<C> fmt::Debug for TransformRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("global", &self.global)
            .field("by_endpoint", &self.by_endpoint)
            .finish()
    }
}

/// Accumulates registrations, then `.build()` freezes them.
pub struct TransformRegistryBuilder<C> {
    global: Vec<MicroTransform<C>>,
    by_endpoint: HashMap<Endpoint, Vec<MicroTransform<C>>>,
}

impl<C> Default for TransformRegistryBuilder<C> {
    fn default() -> Self {
        Self {
            global: Vec::new(),
            by_endpoint: HashMap::new(),
        }
    }
}

impl<C> TransformRegistryBuilder<C> {
    /// Append a transform that runs for every endpoint
    pub fn global(mut self, transform: MicroTransform<C>) -> Self {
        self.global.push(transform);
        self
    }

    /// Append a transform for one endpoint
    pub fn endpoint(mut self, endpoint: Endpoint, transform: MicroTransform<C>) -> Self {
        self.by_endpoint.entry(endpoint).or_default().push(transform);
        self
    }

    /// Append several transforms for one endpoint, in order
    pub fn endpoint_all(
        mut self,
        endpoint: Endpoint,
        transforms: impl IntoIterator<Item = MicroTransform<C>>,
    ) -> Self {
        self.by_endpoint
            .entry(endpoint)
            .or_default()
            .extend(transforms);
        self
    }

    pub fn build(self) -> TransformRegistry<C> {
        TransformRegistry {
            global: self.global,
            by_endpoint: self.by_endpoint,
        }
    }
}

/// Run every applicable transform against `ctx`: globals first, then the
/// context's endpoint list. Returns how many transforms were applied.
pub fn run_pipeline<C: PipelineContext>(registry: &TransformRegistry<C>, ctx: &mut C) -> usize {
    let endpoint = ctx.endpoint();
    let mut applied = 0;

    for transform in registry.global().iter().chain(registry.for_endpoint(endpoint)) {
        if !transform.applies_to(ctx) {
            debug!(transform = transform.name, %endpoint, "guard false, skipping");
            continue;
        }
        trace!(transform = transform.name, %endpoint, "applying");
        (transform.apply)(ctx);
        applied += 1;
    }

    applied
}
