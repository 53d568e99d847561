//! Building the DN model from the pieces produced by the scanner.


use nom::Parser;
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{anychar, char, satisfy};
use nom::combinator::{map, recognize};
use nom::multi::many0;
use nom::sequence::{pair, preceded};
#[cfg(feature = "tracing")] use tracing::{instrument, trace};

use crate::common_parsing::{parse_attribute_type, parse_hex_pair_escape, PResult};
use crate::dn::{
    AttributeTypeAndValue, DistinguishedName, Padding, ParseErrorKind, RelativeDistinguishedName,
};
use crate::dn::scanning::{Piece, split_unescaped};
#[cfg(not(feature = "tracing"))] use crate::no_trace as trace;


const RDN_SEPARATORS: [char; 2] = [',', ';'];


#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum ValueToken<'a> {
    /// Text that is taken over verbatim.
    Text(&'a str),

    /// A backslash-escaped character.
    Char(char),

    /// A byte given as a hex-pair escape.
    EscapedByte(u8),
}
impl<'a> ValueToken<'a> {
    fn append_to(&self, target: &mut Vec<u8>) {
        match self {
            ValueToken::Text(text) => target.extend_from_slice(text.as_bytes()),
            ValueToken::Char(c) => {
                let mut buf = [0u8; 4];
                let encoded = c.encode_utf8(&mut buf);
                target.extend_from_slice(encoded.as_bytes());
            },
            ValueToken::EscapedByte(b) => target.push(*b),
        }
    }
}


/// Parses a complete distinguished name.
#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub(crate) fn parse_dn(input: &str) -> Result<DistinguishedName, ParseErrorKind> {
    trace!("input is {:?}", input);
    if input.trim().is_empty() {
        return Ok(DistinguishedName::default());
    }

    let segments = split_unescaped(input, 0, &RDN_SEPARATORS, usize::MAX)?;
    let mut rdns = Vec::with_capacity(segments.len());
    for segment in segments {
        rdns.push(build_rdn(segment)?);
    }
    Ok(DistinguishedName::from(rdns))
}

/// Parses a string that must contain exactly one relative distinguished name.
#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub(crate) fn parse_single_rdn(input: &str) -> Result<RelativeDistinguishedName, ParseErrorKind> {
    trace!("input is {:?}", input);
    let segments = split_unescaped(input, 0, &RDN_SEPARATORS, usize::MAX)?;
    if segments.len() > 1 {
        let first = &segments[0];
        let separator_pos = first.index + first.text.len() + first.trailing.len();
        return Err(ParseErrorKind::MultipleRdns { pos: separator_pos });
    }
    build_rdn(segments[0])
}

/// Builds an RDN from the piece of a DN string between two RDN separators.
#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub(crate) fn build_rdn(segment: Piece<'_>) -> Result<RelativeDistinguishedName, ParseErrorKind> {
    trace!("segment is {:?}", segment);
    let pair_pieces = split_unescaped(segment.text, segment.index, &['+'], usize::MAX)?;
    let mut pairs = Vec::with_capacity(pair_pieces.len());
    for pair_piece in pair_pieces {
        pairs.push(build_attribute(pair_piece)?);
    }
    Ok(RelativeDistinguishedName {
        pairs,
        padding: Padding::new(segment.leading, segment.trailing),
    })
}

#[cfg_attr(feature = "tracing", instrument(skip_all))]
fn build_attribute(piece: Piece<'_>) -> Result<AttributeTypeAndValue, ParseErrorKind> {
    trace!("piece is {:?}", piece);
    let halves = split_unescaped(piece.text, piece.index, &['='], 2)?;
    let (name_piece, value_piece) = match halves.as_slice() {
        [name_piece, value_piece] => (*name_piece, *value_piece),
        [name_piece] => {
            if name_piece.text.is_empty() {
                return Err(ParseErrorKind::EmptyAttributeType { pos: name_piece.index });
            }
            return Err(ParseErrorKind::MissingEquals { pos: name_piece.index + name_piece.text.len() });
        },
        _ => unreachable!("split is limited to two pieces"),
    };

    if name_piece.text.is_empty() {
        return Err(ParseErrorKind::EmptyAttributeType { pos: name_piece.index });
    }
    let name = match parse_attribute_type(name_piece.text) {
        Ok(("", name)) => name,
        Ok((rest, _)) => return Err(ParseErrorKind::InvalidAttributeType {
            pos: name_piece.index + name_piece.text.len() - rest.len(),
        }),
        Err(_) => return Err(ParseErrorKind::InvalidAttributeType { pos: name_piece.index }),
    };

    let (value, quoted) = unescape_value(value_piece.text, value_piece.index)?;
    Ok(AttributeTypeAndValue {
        name: name.to_owned(),
        value,
        quoted,
        padding: Padding::new(piece.leading, piece.trailing),
        around_equals: Padding::new(name_piece.trailing, value_piece.leading),
    })
}

/// Turns the textual form of a value into its semantic form.
///
/// Returns the value and whether it was wrapped in double quotes. `index` is the position of
/// `text` within the complete input.
#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub(crate) fn unescape_value(text: &str, index: usize) -> Result<(String, bool), ParseErrorKind> {
    trace!("text is {:?}", text);
    let quoted = text.starts_with('"');
    let parsed = if quoted {
        parse_quoted_value(text)
    } else {
        parse_unquoted_value(text)
    };
    let (rest, tokens) = match parsed {
        Ok(rt) => rt,
        Err(_) => return Err(ParseErrorKind::UnterminatedQuote { pos: index }),
    };

    if !rest.is_empty() {
        let pos = index + text.len() - rest.len();
        trace!("unparsed value remainder {:?} at {}", rest, pos);
        return Err(classify_remainder(rest, pos));
    }

    let mut bytes = Vec::with_capacity(text.len());
    for token in &tokens {
        token.append_to(&mut bytes);
    }
    match String::from_utf8(bytes) {
        Ok(value) => Ok((value, quoted)),
        Err(_) => Err(ParseErrorKind::InvalidUtf8 { pos: index }),
    }
}

fn classify_remainder(rest: &str, pos: usize) -> ParseErrorKind {
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), Some(c)) if c.is_ascii_hexdigit() => ParseErrorKind::MalformedHexEscape { pos },
        (Some('\\'), _) => ParseErrorKind::DanglingEscape { pos },
        _ => ParseErrorKind::StrayQuote { pos },
    }
}

#[cfg_attr(feature = "tracing", instrument(skip_all))]
fn parse_quoted_value(rest: &str) -> PResult<Vec<ValueToken<'_>>> {
    trace!("rest is {:?}", rest);
    let (rest, _) = char('"').parse(rest)?;
    let (rest, tokens) = many0(parse_quoted_value_token)
        .parse(rest)?;
    let (rest, _) = char('"').parse(rest)?;
    Ok((rest, tokens))
}

#[cfg_attr(feature = "tracing", instrument(skip_all))]
fn parse_quoted_value_token(rest: &str) -> PResult<ValueToken<'_>> {
    trace!("rest is {:?}", rest);
    alt((
        // only the quote and the backslash itself are unescaped within quotes
        map(
            preceded(char('\\'), satisfy(|c| c == '"' || c == '\\')),
            ValueToken::Char,
        ),
        map(
            recognize(pair(char('\\'), anychar)),
            ValueToken::Text,
        ),
        map(
            take_while1(|c: char| c != '"' && c != '\\'),
            ValueToken::Text,
        ),
    ))
        .parse(rest)
}

#[cfg_attr(feature = "tracing", instrument(skip_all))]
fn parse_unquoted_value(rest: &str) -> PResult<Vec<ValueToken<'_>>> {
    trace!("rest is {:?}", rest);
    many0(parse_unquoted_value_token)
        .parse(rest)
}

#[cfg_attr(feature = "tracing", instrument(skip_all))]
fn parse_unquoted_value_token(rest: &str) -> PResult<ValueToken<'_>> {
    trace!("rest is {:?}", rest);
    alt((
        map(parse_hex_pair_escape, ValueToken::EscapedByte),
        map(
            preceded(char('\\'), satisfy(|c| !c.is_ascii_hexdigit())),
            ValueToken::Char,
        ),
        map(
            take_while1(|c: char| c != '"' && c != '\\'),
            ValueToken::Text,
        ),
    ))
        .parse(rest)
}


#[cfg(test)]
mod tests {
    use super::{parse_dn, parse_single_rdn, unescape_value};
    use crate::dn::ParseErrorKind;

    #[test]
    fn test_unescape_value() {
        assert_eq!(unescape_value("", 0).unwrap(), ("".to_owned(), false));
        assert_eq!(unescape_value("abc", 0).unwrap(), ("abc".to_owned(), false));
        assert_eq!(unescape_value("Dewey\\, Cheatham & Howe", 0).unwrap(), ("Dewey, Cheatham & Howe".to_owned(), false));
        assert_eq!(unescape_value("\\ leading space", 0).unwrap(), (" leading space".to_owned(), false));
        assert_eq!(unescape_value("trailing space\\ ", 0).unwrap(), ("trailing space ".to_owned(), false));
        assert_eq!(unescape_value("\\#", 0).unwrap(), ("#".to_owned(), false));
        assert_eq!(unescape_value("a\\\\b", 0).unwrap(), ("a\\b".to_owned(), false));
        assert_eq!(unescape_value("\\\"quoted\\\"", 0).unwrap(), ("\"quoted\"".to_owned(), false));
        assert_eq!(unescape_value("caf\\C3\\A9", 0).unwrap(), ("caf\u{E9}".to_owned(), false));
        assert_eq!(unescape_value("\\2C", 0).unwrap(), (",".to_owned(), false));
        assert_eq!(unescape_value("a=b", 0).unwrap(), ("a=b".to_owned(), false));
    }

    #[test]
    fn test_unescape_quoted_value() {
        assert_eq!(unescape_value("\"foo\"", 0).unwrap(), ("foo".to_owned(), true));
        assert_eq!(unescape_value("\" foo\"", 0).unwrap(), (" foo".to_owned(), true));
        assert_eq!(unescape_value("\"mark+sn=cavage\"", 0).unwrap(), ("mark+sn=cavage".to_owned(), true));
        assert_eq!(unescape_value("\"say \\\"hi\\\"\"", 0).unwrap(), ("say \"hi\"".to_owned(), true));
        assert_eq!(unescape_value("\"back\\\\slash\"", 0).unwrap(), ("back\\slash".to_owned(), true));
        assert_eq!(unescape_value("\"verbatim\\,\"", 0).unwrap(), ("verbatim\\,".to_owned(), true));
        assert_eq!(unescape_value("\"\"", 0).unwrap(), ("".to_owned(), true));
    }

    #[test]
    fn test_unescape_value_errors() {
        assert_eq!(unescape_value("ab\\4z", 10).unwrap_err(), ParseErrorKind::MalformedHexEscape { pos: 12 });
        assert_eq!(unescape_value("ab\\4", 10).unwrap_err(), ParseErrorKind::MalformedHexEscape { pos: 12 });
        assert_eq!(unescape_value("ab\"cd\"", 3).unwrap_err(), ParseErrorKind::StrayQuote { pos: 5 });
        assert_eq!(unescape_value("\"foo\"bar", 0).unwrap_err(), ParseErrorKind::StrayQuote { pos: 5 });
        assert_eq!(unescape_value("\\FF", 7).unwrap_err(), ParseErrorKind::InvalidUtf8 { pos: 7 });
    }

    #[test]
    fn test_parse_dn_structure() {
        let dn = parse_dn("cn=mark, ou=people, o=joyent").unwrap();
        assert_eq!(dn.len(), 3);
        assert_eq!(dn.as_rdns()[0].pairs()[0].name(), "cn");
        assert_eq!(dn.as_rdns()[0].pairs()[0].value(), "mark");
        assert_eq!(dn.as_rdns()[1].padding().before, " ");
        assert_eq!(dn.as_rdns()[2].pairs()[0].value(), "joyent");

        let dn = parse_dn("l=Biel+l=Bienne,c=CH").unwrap();
        assert_eq!(dn.len(), 2);
        assert_eq!(dn.as_rdns()[0].len(), 2);
        assert_eq!(dn.as_rdns()[0].pairs()[0].value(), "Biel");
        assert_eq!(dn.as_rdns()[0].pairs()[1].value(), "Bienne");

        let dn = parse_dn("2.5.4.10=Dewey\\, Cheatham & Howe;l=London").unwrap();
        assert_eq!(dn.len(), 2);
        assert_eq!(dn.as_rdns()[0].pairs()[0].name(), "2.5.4.10");
        assert_eq!(dn.as_rdns()[0].pairs()[0].value(), "Dewey, Cheatham & Howe");

        let dn = parse_dn("cn = foo + sn = bar").unwrap();
        let pairs = dn.as_rdns()[0].pairs();
        assert_eq!(pairs[0].name(), "cn");
        assert_eq!(pairs[0].value(), "foo");
        assert_eq!(pairs[0].around_equals().before, " ");
        assert_eq!(pairs[0].around_equals().after, " ");
        assert_eq!(pairs[0].padding().after, " ");
        assert_eq!(pairs[1].padding().before, " ");
        assert!(!pairs[0].was_quoted());

        let dn = parse_dn("cn=").unwrap();
        assert_eq!(dn.as_rdns()[0].pairs()[0].value(), "");

        // escaping a non-special character is allowed
        let dn = parse_dn("cn=f\\o").unwrap();
        assert_eq!(dn.as_rdns()[0].pairs()[0].value(), "fo");

        assert!(parse_dn("").unwrap().is_empty());
        assert!(parse_dn("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_dn_errors() {
        assert_eq!(parse_dn("cn=\"foo, o=bar").unwrap_err(), ParseErrorKind::UnterminatedQuote { pos: 3 });
        assert_eq!(parse_dn("cn=foo\\").unwrap_err(), ParseErrorKind::DanglingEscape { pos: 6 });
        assert_eq!(parse_dn("=foo").unwrap_err(), ParseErrorKind::EmptyAttributeType { pos: 0 });
        assert_eq!(parse_dn("cn=a, =foo").unwrap_err(), ParseErrorKind::EmptyAttributeType { pos: 6 });
        assert_eq!(parse_dn("cn=a,,o=b").unwrap_err(), ParseErrorKind::EmptyAttributeType { pos: 5 });
        assert_eq!(parse_dn("cn=a,").unwrap_err(), ParseErrorKind::EmptyAttributeType { pos: 5 });
        assert_eq!(parse_dn("cn=a+,o=b").unwrap_err(), ParseErrorKind::EmptyAttributeType { pos: 5 });
        assert_eq!(parse_dn("cn").unwrap_err(), ParseErrorKind::MissingEquals { pos: 2 });
        assert_eq!(parse_dn("c n=foo").unwrap_err(), ParseErrorKind::InvalidAttributeType { pos: 1 });
        assert_eq!(parse_dn("cn=f\\4o").unwrap_err(), ParseErrorKind::MalformedHexEscape { pos: 4 });
        assert_eq!(parse_dn("cn=a\"b\"").unwrap_err(), ParseErrorKind::StrayQuote { pos: 4 });
    }

    #[test]
    fn test_parse_single_rdn() {
        let rdn = parse_single_rdn("cn=foo+sn=bar").unwrap();
        assert_eq!(rdn.len(), 2);
        assert_eq!(parse_single_rdn("cn=foo, o=bar").unwrap_err(), ParseErrorKind::MultipleRdns { pos: 6 });
        assert_eq!(parse_single_rdn("").unwrap_err(), ParseErrorKind::EmptyAttributeType { pos: 0 });
    }
}
