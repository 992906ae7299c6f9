pub use logos::Logos;
use logos::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// 1-based line and column of the byte offset `at`.
pub fn location(inp: &str, at: usize) -> Location {
    let before = &inp[..at.min(inp.len())];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;

    Location { line, col }
}

pub fn get_line(inp: &str, line: usize) -> &str {
    inp.lines().nth(line.saturating_sub(1)).unwrap_or_default()
}

#[derive(Debug, Default)]
pub struct Tokens<'i> {
    pub inp: &'i str,
    pub path: String,
    pub span: Vec<Span>,
    pub token: Vec<Token<'i>>,
    pub cursor: usize,
}

impl<'i> Tokens<'i> {
    /// Lexes `inp`, dropping comments. The error lists every span that is
    /// not a valid token.
    pub fn lex(inp: &'i str, path: impl Into<String>) -> Result<Tokens<'i>, String> {
        let mut tokens = Tokens {
            inp,
            path: path.into(),
            ..Tokens::default()
        };
        let mut errors = Vec::new();
        let mut lexer = Token::lexer(inp);

        while let Some(token) = lexer.next() {
            match token {
                Ok(Token::Comment(text)) => crate::trace!("Skipping comment '{text}'"),
                Ok(token) => {
                    tokens.span.push(lexer.span());
                    tokens.token.push(token);
                }
                Err(()) => errors.push(tokens.error_at(lexer.span().start, "Error reading token")),
            }
        }

        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors.join("\n"))
        }
    }

    pub fn error_at(&self, at: usize, msg: impl Into<String>) -> String {
        let Location { line, col } = location(self.inp, at);
        format!(
            "{msg}\n    {path}:{line}:{col} {contents}",
            msg = msg.into(),
            path = self.path,
            contents = get_line(self.inp, line).trim()
        )
    }

    pub fn error_current_span(&self, msg: impl Into<String>) -> String {
        let at = self
            .try_span()
            .or_else(|| self.span.last().map(|s| s.end..s.end))
            .map_or(0, |s| s.start);
        self.error_at(at, msg)
    }

    pub fn current_location(&self) -> usize {
        self.try_span().map_or(self.inp.len(), |s| s.start)
    }

    pub fn steps(&mut self, steps: usize) {
        self.cursor = (self.cursor + steps).min(self.token.len());
    }

    pub fn step(&mut self) {
        self.steps(1);
    }

    pub fn skiping(&mut self, steps: usize) -> &mut Self {
        self.steps(steps);
        self
    }

    pub fn get_ident(&self) -> Option<&'i str> {
        match self.tokens() {
            [Token::Ident(s), ..] => Some(*s),
            _ => None,
        }
    }

    pub fn tokens(&self) -> &[Token<'i>] {
        &self.token[self.cursor..]
    }

    pub fn try_first(&self) -> Option<Token<'i>> {
        self.tokens().first().copied()
    }

    pub fn try_span(&self) -> Option<Span> {
        self.span.get(self.cursor).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == self.token.len()
    }
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'i> {
    #[regex(r"(#|//)[^\n]*")]
    Comment(&'i str),

    #[regex(r#""[^"]*""#, |lex| lex.slice().trim_matches('"'))]
    #[regex(r#"'[^']*'"#, |lex| lex.slice().trim_matches('\''))]
    String(&'i str),

    #[regex(r#"(?i:false)"#, |_| false)]
    #[regex(r#"(?i:true)"#, |_| true)]
    Bool(bool),

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Eq,

    #[token(":")]
    Colon,

    #[regex(r#"(?i:string)"#)]
    KwString,

    #[regex(r#"(?i:bool)"#)]
    KwBool,

    #[regex(r#"(?i:any)"#)]
    KwAny,

    #[regex("(?i:[a-z][_a-z0-9]*)")]
    Ident(&'i str),
}
