//! nom helpers

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char};
use nom::combinator::recognize;
use nom::error::ParseError;
use nom::multi::many0_count;
use nom::sequence::{pair, preceded};
use nom::IResult;

/// Recognizes `[A-Za-z_][A-Za-z0-9_]*`
pub fn recognize_identifier<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Recognizes a backslash followed by a maximal run of ASCII letters, returning only the letters.
///
/// `\lambda` yields `lambda`, `\in\nat` yields `in` and leaves `\nat` as the rest.
pub fn recognize_escape_word<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    preceded(char('\\'), alpha1)(input)
}

/// Gets the input consumed between `before` and `after`, where `after` is a suffix of `before`.
pub fn consumed_between<'a>(before: &'a str, after: &'a str) -> &'a str {
    &before[..before.len() - after.len()]
}
