//! Query tokenizer.
//!
//! Scans a Solr/Lucene query string into a flat token stream in a single
//! left-to-right pass. The scanner never fails: unterminated phrases and
//! ranges run to the end of the input.

/// A lexical token of the legacy query syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare word. Backslash escapes are kept so wildcard and fuzzy
    /// detection can tell `foo\*` from `foo*`; see [`unescape`].
    Term(String),
    /// Field name, escapes resolved; the trailing colon is consumed
    Field(String),
    /// Quoted text, with any `~N` proximity suffix appended
    Phrase(String),
    And,
    Or,
    Not,
    Plus,
    Minus,
    LParen,
    RParen,
    /// `[lo TO hi]`, `{lo TO hi}` or any mix of the two brackets
    Range {
        lo: String,
        hi: String,
        lo_inclusive: bool,
        hi_inclusive: bool,
    },
    Eof,
}

impl Token {
    /// Whether this token can begin a clause.
    pub fn starts_clause(&self) -> bool {
        matches!(
            self,
            Token::Term(_)
                | Token::Field(_)
                | Token::Phrase(_)
                | Token::Range { .. }
                | Token::Not
                | Token::Plus
                | Token::Minus
                | Token::LParen
        )
    }
}

/// Single-pass scanner over a query string.
pub struct Tokenizer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    /// Consume the input, producing a token list that always ends in [`Token::Eof`].
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(&c) = self.chars.peek() else {
                break;
            };

            let token = match c {
                '(' => {
                    self.chars.next();
                    Token::LParen
                }
                ')' => {
                    self.chars.next();
                    Token::RParen
                }
                '"' => {
                    self.chars.next();
                    self.phrase()
                }
                '[' | '{' => {
                    self.chars.next();
                    self.range(c == '[')
                }
                '+' | '-' => {
                    self.chars.next();
                    match self.chars.peek() {
                        Some(next) if !next.is_whitespace() => {
                            if c == '+' {
                                Token::Plus
                            } else {
                                Token::Minus
                            }
                        }
                        // A lone sign is just a word
                        _ => self.word(Some(c)),
                    }
                }
                _ => self.word(None),
            };
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        tokens
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    /// Quoted run; the opening quote is already consumed.
    fn phrase(&mut self) -> Token {
        let mut text = String::new();

        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = self.chars.next() {
                        text.push(escaped);
                    }
                }
                '"' => break,
                _ => text.push(c),
            }
        }

        if self.chars.peek() == Some(&'~') {
            self.chars.next();
            let mut digits = String::new();
            while let Some(&d) = self.chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                self.chars.next();
            }
            if digits.is_empty() {
                digits.push('2');
            }
            text.push('~');
            text.push_str(&digits);
        }

        Token::Phrase(text)
    }

    /// Bracketed range; the opening bracket is already consumed.
    fn range(&mut self, lo_inclusive: bool) -> Token {
        let mut words: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut hi_inclusive = lo_inclusive;

        while let Some(c) = self.chars.next() {
            match c {
                ']' | '}' => {
                    hi_inclusive = c == ']';
                    break;
                }
                '\\' => {
                    if let Some(escaped) = self.chars.next() {
                        current.push(escaped);
                    }
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            words.push(current);
        }

        let mut words = words.into_iter().map(|w| w.trim_matches('"').to_string());
        let lo = words.next().unwrap_or_else(|| "*".to_string());
        let hi = match words.next() {
            Some(w) if w == "TO" => words.next(),
            other => other,
        }
        .unwrap_or_else(|| "*".to_string());

        Token::Range {
            lo,
            hi,
            lo_inclusive,
            hi_inclusive,
        }
    }

    /// Bare run up to whitespace, a parenthesis or an unescaped colon.
    fn word(&mut self, prefix: Option<char>) -> Token {
        let mut text: String = prefix.into_iter().collect();

        while let Some(&c) = self.chars.peek() {
            match c {
                '\\' => {
                    self.chars.next();
                    if let Some(escaped) = self.chars.next() {
                        text.push('\\');
                        text.push(escaped);
                    }
                }
                ':' => {
                    self.chars.next();
                    return Token::Field(unescape(&text));
                }
                '(' | ')' => break,
                c if c.is_whitespace() => break,
                _ => {
                    text.push(c);
                    self.chars.next();
                }
            }
        }

        match text.as_str() {
            "AND" | "&&" => Token::And,
            "OR" | "||" => Token::Or,
            "NOT" | "!" => Token::Not,
            _ => Token::Term(text),
        }
    }
}

/// Resolve backslash escapes in a bare word.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

/// Tokenize a query string.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).tokenize()
}
