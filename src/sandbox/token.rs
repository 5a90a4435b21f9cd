//! Tokenizer for the sandbox source parser.
//!
//! The token stream is pull-based: the parser asks for tokens when it wants
//! them, and drops to raw character scanning for the context-sensitive JSX
//! positions (tag names, attribute names, text children) where a fixed token
//! grammar does not apply.

use logos::Logos;
use std::fmt;

/// The kind of token produced by the lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("const")]
    Const,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("typeof")]
    Typeof,

    // ========== Literals ==========
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    DoubleString,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    SingleString,

    /// Template literal captured whole, interpolations included; the parser
    /// re-scans the inside for `${}` parts
    #[regex(r"`([^`\\]|\\.)*`")]
    Template,

    // ========== Identifiers ==========
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    // ========== Punctuation & operators ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?.")]
    OptChain,
    #[token("?")]
    Question,
    #[token("=>")]
    FatArrow,
    #[token("===")]
    StrictEq,
    #[token("!==")]
    StrictNe,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("??")]
    Nullish,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
}

impl TokenKind {
    /// Keywords double as property/attribute/object-key names.
    pub fn is_name_like(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Const
                | TokenKind::Let
                | TokenKind::Var
                | TokenKind::Function
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Typeof
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Undefined
        )
    }
}

/// A token plus its source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tok<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
}

/// A parse failure with its source position.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}, column {})", self.message, self.line, self.column)
    }
}

impl std::error::Error for ParseError {}

fn position(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let prefix = &source[..offset];
    let line = prefix.matches('\n').count() + 1;
    let column = offset - prefix.rfind('\n').map_or(0, |i| i + 1) + 1;
    (line, column)
}

/// Pull-based token stream with raw-scan escape hatches for JSX.
#[derive(Clone)]
pub struct TokenStream<'src> {
    source: &'src str,
    lexer: logos::Lexer<'src, TokenKind>,
    peeked: Option<Option<Tok<'src>>>,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lexer: TokenKind::lexer(source),
            peeked: None,
        }
    }

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        let (line, column) = position(self.source, self.lexer.span().start);
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    fn pull(&mut self) -> Result<Option<Tok<'src>>, ParseError> {
        match self.lexer.next() {
            None => Ok(None),
            Some(Ok(kind)) => Ok(Some(Tok {
                kind,
                text: self.lexer.slice(),
            })),
            Some(Err(())) => Err(self.error(format!(
                "unexpected character '{}'",
                self.lexer.slice().chars().next().unwrap_or('?')
            ))),
        }
    }

    pub fn next(&mut self) -> Result<Option<Tok<'src>>, ParseError> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.pull(),
        }
    }

    pub fn peek(&mut self) -> Result<Option<Tok<'src>>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.pull()?);
        }
        Ok(self.peeked.unwrap_or(None))
    }

    pub fn peek_kind(&mut self) -> Result<Option<TokenKind>, ParseError> {
        Ok(self.peek()?.map(|tok| tok.kind))
    }

    /// Consume the next token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.peek_kind()? == Some(kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Tok<'src>, ParseError> {
        match self.next()? {
            Some(tok) if tok.kind == kind => Ok(tok),
            Some(tok) => Err(self.error(format!("expected {:?}, found '{}'", kind, tok.text))),
            None => Err(self.error(format!("expected {:?}, found end of input", kind))),
        }
    }

    // ========== Raw scanning (JSX positions) ==========
    //
    // Raw helpers operate on the lexer remainder and require that no token
    // has been peeked but not consumed.

    fn assert_raw(&mut self) -> Result<(), ParseError> {
        if self.peeked.take().is_some_and(|tok| tok.is_some()) {
            return Err(self.error("internal: raw scan with a pending token"));
        }
        Ok(())
    }

    fn remainder(&self) -> &'src str {
        self.lexer.remainder()
    }

    pub fn raw_skip_ws(&mut self) -> Result<(), ParseError> {
        self.assert_raw()?;
        let trimmed = self.remainder().trim_start();
        let skipped = self.remainder().len() - trimmed.len();
        self.lexer.bump(skipped);
        Ok(())
    }

    pub fn raw_peek_char(&mut self) -> Result<Option<char>, ParseError> {
        self.assert_raw()?;
        Ok(self.remainder().chars().next())
    }

    pub fn raw_eat_char(&mut self, expected: char) -> Result<bool, ParseError> {
        self.assert_raw()?;
        if self.remainder().starts_with(expected) {
            self.lexer.bump(expected.len_utf8());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn raw_expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        if self.raw_eat_char(expected)? {
            Ok(())
        } else {
            let found = self
                .remainder()
                .chars()
                .next()
                .map_or("end of input".to_string(), |c| format!("'{c}'"));
            Err(self.error(format!("expected '{expected}', found {found}")))
        }
    }

    /// Scan an identifier-like name; `allow_dash` admits `data-*`/`aria-*`
    /// attribute names.
    pub fn raw_name(&mut self, allow_dash: bool) -> Result<Option<&'src str>, ParseError> {
        self.assert_raw()?;
        let rest = self.remainder();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
            _ => return Ok(None),
        }
        let mut end = rest.len();
        for (i, c) in chars {
            let continues =
                c.is_ascii_alphanumeric() || c == '_' || c == '$' || (allow_dash && c == '-');
            if !continues {
                end = i;
                break;
            }
        }
        self.lexer.bump(end);
        Ok(Some(&rest[..end]))
    }

    /// Consume raw JSX text up to the next `<` or `{`. Errors at end of input
    /// since that means an unclosed element.
    pub fn jsx_text(&mut self) -> Result<&'src str, ParseError> {
        self.assert_raw()?;
        let rest = self.remainder();
        match rest.find(['<', '{']) {
            Some(end) => {
                self.lexer.bump(end);
                Ok(&rest[..end])
            }
            None => Err(self.error("unclosed JSX element")),
        }
    }

    /// Scan a quoted JSX attribute string, returning its unescaped contents.
    pub fn raw_string(&mut self) -> Result<String, ParseError> {
        self.assert_raw()?;
        let rest = self.remainder();
        let quote = match rest.chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => return Err(self.error("expected a quoted attribute value")),
        };
        let body = &rest[1..];
        match body.find(quote) {
            Some(end) => {
                self.lexer.bump(1 + end + 1);
                Ok(unescape(&body[..end]))
            }
            None => Err(self.error("unterminated attribute string")),
        }
    }
}

/// Resolve backslash escapes the way string literals spell them.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut stream = TokenStream::new(source);
        let mut out = Vec::new();
        while let Some(tok) = stream.next().unwrap() {
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn lexes_declaration_tokens() {
        assert_eq!(
            kinds("const x = 1;"),
            vec![
                TokenKind::Const,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn longest_match_wins_for_operators() {
        assert_eq!(
            kinds("a === b => ..."),
            vec![
                TokenKind::Ident,
                TokenKind::StrictEq,
                TokenKind::Ident,
                TokenKind::FatArrow,
                TokenKind::Ellipsis,
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        assert_eq!(
            kinds("a // comment\n/* block **/ b"),
            vec![TokenKind::Ident, TokenKind::Ident]
        );
    }

    #[test]
    fn keywords_do_not_swallow_identifiers() {
        assert_eq!(kinds("returning"), vec![TokenKind::Ident]);
        assert_eq!(kinds("return"), vec![TokenKind::Return]);
    }

    #[test]
    fn raw_name_scans_dashed_attribute_names() {
        let mut stream = TokenStream::new("data-state=\"open\"");
        assert_eq!(stream.raw_name(true).unwrap(), Some("data-state"));
        assert!(stream.raw_eat_char('=').unwrap());
        assert_eq!(stream.raw_string().unwrap(), "open");
    }

    #[test]
    fn jsx_text_stops_at_markers() {
        let mut stream = TokenStream::new("Hello {name}");
        assert_eq!(stream.jsx_text().unwrap(), "Hello ");
        assert_eq!(stream.raw_peek_char().unwrap(), Some('{'));
    }

    #[test]
    fn error_carries_line_and_column() {
        let mut stream = TokenStream::new("a\n  #");
        stream.next().unwrap();
        let err = stream.next().unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains('#'));
    }

    #[test]
    fn unescape_handles_common_escapes() {
        assert_eq!(unescape(r"a\nb\\c\'d"), "a\nb\\c'd");
    }
}
