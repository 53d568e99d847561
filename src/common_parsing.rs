use nom::Parser;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, satisfy};
#[cfg(feature = "tracing")] use tracing::{instrument, trace};

#[cfg(not(feature = "tracing"))] use crate::no_trace as trace;


/// The result type of combinable parsers in this crate.
pub(crate) type PResult<'a, O> = nom::IResult<&'a str, O>;


/// Converts a hex digit into its value.
///
/// Panics if the character is not a hex digit; callers check with `is_ascii_hexdigit` first.
pub(crate) fn hex_to_nibble(hex: char) -> u8 {
    match hex {
        '0'..='9' => ((hex as u32) - ('0' as u32)) as u8,
        'A'..='F' => ((hex as u32) + 10 - ('A' as u32)) as u8,
        'a'..='f' => ((hex as u32) + 10 - ('a' as u32)) as u8,
        _ => unreachable!(),
    }
}

/// Parses a backslash followed by two hex digits and returns the encoded byte.
#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub(crate) fn parse_hex_pair_escape(rest: &str) -> PResult<u8> {
    trace!("rest is {:?}", rest);
    let (rest, _) = char('\\').parse(rest)?;
    let (rest, t) = satisfy(|c| c.is_ascii_hexdigit()).parse(rest)?;
    let (rest, b) = satisfy(|c| c.is_ascii_hexdigit()).parse(rest)?;
    let top_nibble = hex_to_nibble(t);
    let bottom_nibble = hex_to_nibble(b);
    Ok((rest, (top_nibble << 4) | bottom_nibble))
}

/// Parses the name of an attribute type.
///
/// Any run of characters that are neither whitespace, double quotes nor backslashes is accepted;
/// no schema is consulted.
#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub(crate) fn parse_attribute_type(rest: &str) -> PResult<&str> {
    trace!("rest is {:?}", rest);
    take_while1(|c: char| !c.is_whitespace() && c != '"' && c != '\\')
        .parse(rest)
}
