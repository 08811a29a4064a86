//! The nom parsers that recognize single tokens and the insignificant text between them

use crate::lexer::LexErrorKind;
use mpl_common::nom_helpers::{recognize_escape_word, recognize_identifier};
use mpl_tokens::symbols::AliasMap;
use mpl_tokens::token::TokenKind;
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_till};
use nom::character::complete::{anychar, char, digit1, hex_digit1, multispace1, one_of};
use nom::combinator::{opt, recognize, value};
use nom::error::{ErrorKind, ParseError};
use nom::multi::{many0_count, many1_count};
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;

/// Error produced by the token parsers.
///
/// `kind` is only set for failures the scanner reports as is. Errors without a kind just mean
/// "this parser does not apply here".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenError<'a> {
    pub input: &'a str,
    /// How much of `input` the error covers
    pub len: usize,
    pub kind: Option<LexErrorKind>,
}

impl<'a> ParseError<&'a str> for TokenError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        Self {
            input,
            len: 0,
            kind: None,
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(self, other: Self) -> Self {
        if self.kind.is_some() {
            self
        } else {
            other
        }
    }
}

pub(super) type Result<'a, O> = IResult<&'a str, O, TokenError<'a>>;

/// Creates an unrecoverable error
fn failure(input: &str, len: usize, kind: LexErrorKind) -> nom::Err<TokenError<'_>> {
    nom::Err::Failure(TokenError {
        input,
        len,
        kind: Some(kind),
    })
}

/// Parses a single token. The input must not start with insignificant text.
pub(super) fn parse_token(src: &str) -> Result<TokenKind> {
    alt((
        parse_raw_string,
        parse_string,
        parse_number,
        parse_word,
        parse_escape,
        parse_punctuation,
        parse_glyph,
        unexpected_character,
    ))(src)
}

/// Skips whitespace, line comments and nested block comments
pub(super) fn parse_insignificant(src: &str) -> Result<()> {
    value(
        (),
        many0_count(alt((
            value((), multispace1),
            parse_line_comment,
            parse_block_comment,
        ))),
    )(src)
}

fn parse_line_comment(src: &str) -> Result<()> {
    value((), preceded(tag("--"), take_till(|c| c == '\n')))(src)
}

fn parse_block_comment(src: &str) -> Result<()> {
    let (mut rest, _) = tag("{-")(src)?;
    let mut depth = 1_usize;
    while depth > 0 {
        if let Some(after) = rest.strip_prefix("{-") {
            depth += 1;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("-}") {
            depth -= 1;
            rest = after;
        } else {
            let mut chars = rest.chars();
            match chars.next() {
                Some(_) => rest = chars.as_str(),
                None => return Err(failure(src, 2, LexErrorKind::UnterminatedComment)),
            }
        }
    }
    Ok((rest, ()))
}

/// `"""…"""`, ending at the first `"""` not preceded by a backslash
fn parse_raw_string(src: &str) -> Result<TokenKind> {
    let (body, _) = tag("\"\"\"")(src)?;
    let mut search = 0;
    while let Some(found) = body[search..].find("\"\"\"") {
        let at = search + found;
        if body[..at].ends_with('\\') {
            search = at + 1;
            continue;
        }
        return Ok((&body[at + 3..], TokenKind::RawString));
    }
    Err(failure(src, 3, LexErrorKind::UnterminatedRawString))
}

fn parse_string(src: &str) -> Result<TokenKind> {
    let (rest, _) = char('"')(src)?;
    let (rest, _) = many0_count(parse_string_fragment)(rest)?;
    match char::<_, TokenError>('"')(rest) {
        Ok((rest, _)) => Ok((rest, TokenKind::String)),
        Err(_) => Err(failure(src, 1, LexErrorKind::UnterminatedString)),
    }
}

fn parse_string_fragment(input: &str) -> Result<()> {
    alt((value((), is_not("\"\\\n")), value((), parse_escaped_char)))(input)
}

/// A backslash escape inside a string. The error for an invalid escape covers the backslash and
/// the escaped character. A backslash at the end of a line or of the input is left for the
/// unterminated string check.
fn parse_escaped_char(input: &str) -> Result<char> {
    let (rest, _) = char('\\')(input)?;
    alt((
        value('\n', char('n')),
        value('"', char('"')),
        value('\\', char('\\')),
    ))(rest)
    .or_else(|_: nom::Err<TokenError>| match rest.chars().next() {
        Some(c) if c != '\n' => Err(failure(
            input,
            1 + c.len_utf8(),
            LexErrorKind::InvalidEscape(c),
        )),
        _ => Err(nom::Err::Error(TokenError::from_error_kind(
            input,
            ErrorKind::Char,
        ))),
    })
}

/// Decimal, fractional, exponent, hex and binary numbers
fn parse_number(src: &str) -> Result<TokenKind> {
    let (rest, _) = alt((parse_radix_number, parse_decimal_number))(src)?;
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        let len = src.len() - rest.len() + rest.chars().next().map_or(0, char::len_utf8);
        return Err(failure(src, len, LexErrorKind::MalformedNumber));
    }
    Ok((rest, TokenKind::Number))
}

fn parse_radix_number(src: &str) -> Result<&str> {
    let (digits, prefix) = alt((tag("0x"), tag("0X"), tag("0b"), tag("0B")))(src)?;
    let parsed = if prefix.ends_with(['x', 'X']) {
        hex_digit1::<_, TokenError>(digits)
    } else {
        recognize(many1_count(one_of("01")))(digits)
    };
    match parsed {
        Ok((rest, _)) => Ok((rest, &src[..src.len() - rest.len()])),
        Err(_) => Err(failure(src, prefix.len(), LexErrorKind::MalformedNumber)),
    }
}

fn parse_decimal_number(src: &str) -> Result<&str> {
    recognize(tuple((
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(src)
}

/// Identifiers and the `true`/`false` keywords
fn parse_word(src: &str) -> Result<TokenKind> {
    let (rest, word) = recognize_identifier(src)?;
    let kind = match word {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => TokenKind::Identifier,
    };
    Ok((rest, kind))
}

/// A backslash alias such as `\lambda`
fn parse_escape(src: &str) -> Result<TokenKind> {
    let (rest, word) = recognize_escape_word(src)?;
    match AliasMap::global().by_alias(word) {
        Some(kind) => Ok((rest, kind)),
        None => Err(failure(
            src,
            word.len() + 1,
            LexErrorKind::UnknownEscape(word.to_string()),
        )),
    }
}

fn parse_punctuation(src: &str) -> Result<TokenKind> {
    alt((
        value(TokenKind::Plus, char('+')),
        value(TokenKind::Minus, char('-')),
        value(TokenKind::Eq, char('=')),
        value(TokenKind::Lt, char('<')),
        value(TokenKind::Gt, char('>')),
        value(TokenKind::LParen, char('(')),
        value(TokenKind::RParen, char(')')),
        value(TokenKind::LBrack, char('[')),
        value(TokenKind::RBrack, char(']')),
        value(TokenKind::LBrace, char('{')),
        value(TokenKind::RBrace, char('}')),
        value(TokenKind::Colon, char(':')),
        value(TokenKind::Semi, char(';')),
        value(TokenKind::Comma, char(',')),
        value(TokenKind::Bar, char('|')),
    ))(src)
}

/// A unicode glyph from the alias map, optionally followed by an emoji presentation selector
fn parse_glyph(src: &str) -> Result<TokenKind> {
    let (rest, glyph) = anychar(src)?;
    match AliasMap::global().by_glyph(glyph) {
        Some(kind) => {
            let (rest, _) = opt(char('\u{FE0F}'))(rest)?;
            Ok((rest, kind))
        }
        None => Err(nom::Err::Error(TokenError::from_error_kind(
            src,
            ErrorKind::Char,
        ))),
    }
}

fn unexpected_character(src: &str) -> Result<TokenKind> {
    match src.chars().next() {
        Some(c) => Err(failure(src, c.len_utf8(), LexErrorKind::UnexpectedCharacter(c))),
        None => Err(nom::Err::Error(TokenError::from_error_kind(
            src,
            ErrorKind::Eof,
        ))),
    }
}
