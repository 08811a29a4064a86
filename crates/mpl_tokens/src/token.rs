//! A lexical token from a source buffer, along with streams for said token

use crate::spanned::{Span, Spanned};
use crate::symbols::AliasMap;
use std::collections::VecDeque;
use std::fmt::{Debug, Display, Formatter};
use strum::{EnumIter, IntoStaticStr};

/// A lexical token from a source buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    span: Span,
}

impl Token {
    /// Creates a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Creates the end of input token
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Gets the source text of this token
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({:?})@{}", self.kind, self.lexeme, self.span.start())
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_eof() {
            write!(f, "<EOF>")
        } else {
            write!(f, "'{}'", self.lexeme)
        }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

/// The kind for a token.
///
/// Symbols with both a unicode glyph and a backslash alias produce the same kind for either
/// spelling, see [AliasMap].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // literals
    Number,
    String,
    RawString,
    Identifier,
    True,
    False,

    // greek letters
    Alpha,
    Beta,
    Gamma,
    Delta,
    Epsilon,
    Zeta,
    Eta,
    Theta,
    Iota,
    Kappa,
    LambdaVar,
    Mu,
    Nu,
    Xi,
    Pi,
    Rho,
    Sigma,
    Tau,
    Upsilon,
    Phi,
    Chi,
    Psi,
    Omega,

    // type symbols
    Nat,
    Int,
    Rat,
    Real,
    Complex,
    Bool,

    /// ∅
    EmptySet,
    /// ⊥
    Bottom,

    Plus,
    Minus,
    /// ×
    Times,
    /// ÷
    Div,
    /// ∗
    Ast,
    /// ∘
    Compose,

    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
    Approx,
    Sim,

    And,
    Or,
    Not,
    /// ⟹
    Implies,

    /// ←
    LeftArrow,
    /// ≜
    Definition,

    // effect operators
    Raise,
    Handle,
    Parallel,
    Alloc,
    Release,
    Trace,
    Delay,
    Periodic,
    Receive,
    Send,

    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    LAngle,
    RAngle,
    LCeil,
    RCeil,
    LRaii,
    RRaii,
    LQuote,
    RQuote,
    LUnquote,
    RUnquote,

    Colon,
    Semi,
    Comma,
    Bar,
    Forall,
    In,
    /// →
    Arrow,
    /// ⇒
    DoubleArrow,
    /// 𝓜
    Module,
    /// 🖫
    Path,

    /// EOF, will only appear at the end of a token sequence
    Eof,
}

impl TokenKind {
    pub fn is_greek(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Alpha
                | Beta
                | Gamma
                | Delta
                | Epsilon
                | Zeta
                | Eta
                | Theta
                | Iota
                | Kappa
                | Mu
                | Nu
                | Xi
                | Pi
                | Rho
                | Sigma
                | Tau
                | Upsilon
                | Phi
                | Chi
                | Psi
                | Omega
        )
    }

    pub fn is_type_symbol(&self) -> bool {
        use TokenKind::*;
        matches!(self, Nat | Int | Rat | Real | Complex | Bool)
    }

    pub fn is_opening_delimiter(&self) -> bool {
        self.closing_delimiter().is_some()
    }

    /// The delimiter that closes this one, if this is an opening delimiter
    pub fn closing_delimiter(&self) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match self {
            LParen => RParen,
            LBrack => RBrack,
            LBrace => RBrace,
            LAngle => RAngle,
            LCeil => RCeil,
            LRaii => RRaii,
            LQuote => RQuote,
            LUnquote => RUnquote,
            _ => return None,
        })
    }

    pub fn is_closing_delimiter(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            RParen | RBrack | RBrace | RAngle | RCeil | RRaii | RQuote | RUnquote
        )
    }

    /// The name of this kind, e.g. `LAMBDA_VAR`
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(symbol) = AliasMap::global().symbol(*self) {
            return write!(f, "'{}'", symbol.glyph);
        }
        let punctuation = match self {
            TokenKind::Number => return write!(f, "number"),
            TokenKind::String => return write!(f, "string"),
            TokenKind::RawString => return write!(f, "raw string"),
            TokenKind::Identifier => return write!(f, "identifier"),
            TokenKind::Eof => return write!(f, "<EOF>"),
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Eq => "=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrack => "[",
            TokenKind::RBrack => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Colon => ":",
            TokenKind::Semi => ";",
            TokenKind::Comma => ",",
            TokenKind::Bar => "|",
            other => other.name(),
        };
        write!(f, "'{punctuation}'")
    }
}

/// A stream of tokens
#[derive(Debug, Default)]
pub struct TokenStream(VecDeque<Token>);

impl FromIterator<Token> for TokenStream {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_front()
    }
}

impl TokenStream {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spanned::Position;
    use strum::IntoEnumIterator;

    #[test]
    fn test_create_token_stream() {
        let vec: Vec<Token> = vec![];
        let mut stream = TokenStream::from_iter(vec);
        assert!(stream.next().is_none())
    }

    #[test]
    fn test_token_stream_order() {
        let span = Span::empty_at(0, Position::start());
        let mut stream = TokenStream::from_iter([
            Token::new(TokenKind::Identifier, "x", span),
            Token::eof(span),
        ]);
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.next().map(|t| t.kind()), Some(TokenKind::Identifier));
        assert_eq!(stream.next().map(|t| t.kind()), Some(TokenKind::Eof));
        assert!(stream.is_empty());
    }

    #[test]
    fn test_delimiters_pair_up() {
        for kind in TokenKind::iter().filter(|k| k.is_opening_delimiter()) {
            let closing = kind.closing_delimiter().unwrap();
            assert!(closing.is_closing_delimiter(), "{kind:?} closes with {closing:?}");
        }
        assert_eq!(
            TokenKind::iter().filter(|k| k.is_opening_delimiter()).count(),
            TokenKind::iter().filter(|k| k.is_closing_delimiter()).count()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Semi.to_string(), "';'");
        assert_eq!(TokenKind::LambdaVar.to_string(), "'λ'");
        assert_eq!(TokenKind::Identifier.to_string(), "identifier");
        assert_eq!(TokenKind::LambdaVar.name(), "LAMBDA_VAR");
        let span = Span::empty_at(0, Position::start());
        assert_eq!(Token::eof(span).to_string(), "<EOF>");
        assert_eq!(Token::new(TokenKind::Identifier, "foo", span).to_string(), "'foo'");
    }
}
