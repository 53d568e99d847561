//! Rendering distinguished names back into strings.
//!
//! By default, names are rendered canonically: attribute types in lowercase, the pairs of a
//! compound RDN sorted by attribute type, values quoted only when they begin or end with
//! whitespace, and a single space after each comma. [`FormatOptions`] selectively reproduces
//! how a parsed name was originally written instead.


use std::fmt::{self, Write};

use crate::dn::{AttributeTypeAndValue, RelativeDistinguishedName};


/// Toggles controlling how far rendering deviates from the canonical form.
///
/// Every toggle is optional so that a set of options can be layered over another one with
/// [`merged_with`](Self::merged_with); toggles that are not set count as `false`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct FormatOptions {
    /// Keep the pairs of compound RDNs in the order in which they were written instead of sorting
    /// them by attribute type.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub keep_order: Option<bool>,

    /// Keep double quotes around values that were originally quoted.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub keep_quote: Option<bool>,

    /// Reproduce the original whitespace around delimiters exactly. Takes precedence over
    /// `skip_space`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub keep_space: Option<bool>,

    /// Do not add a space after the commas between RDNs.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub skip_space: Option<bool>,

    /// Render attribute types as they were written instead of in lowercase.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub keep_case: Option<bool>,

    /// Render attribute types in uppercase. Takes precedence over `keep_case`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub upper_name: Option<bool>,
}
impl FormatOptions {
    /// Options with no toggle set, i.e. canonical rendering.
    pub const fn new() -> Self {
        Self {
            keep_order: None,
            keep_quote: None,
            keep_space: None,
            skip_space: None,
            keep_case: None,
            upper_name: None,
        }
    }

    pub const fn with_keep_order(self, keep_order: bool) -> Self {
        Self { keep_order: Some(keep_order), ..self }
    }

    pub const fn with_keep_quote(self, keep_quote: bool) -> Self {
        Self { keep_quote: Some(keep_quote), ..self }
    }

    pub const fn with_keep_space(self, keep_space: bool) -> Self {
        Self { keep_space: Some(keep_space), ..self }
    }

    pub const fn with_skip_space(self, skip_space: bool) -> Self {
        Self { skip_space: Some(skip_space), ..self }
    }

    pub const fn with_keep_case(self, keep_case: bool) -> Self {
        Self { keep_case: Some(keep_case), ..self }
    }

    pub const fn with_upper_name(self, upper_name: bool) -> Self {
        Self { upper_name: Some(upper_name), ..self }
    }

    /// Returns these options with every toggle that is set in `overrides` replaced by the value
    /// from `overrides`.
    pub fn merged_with(&self, overrides: &FormatOptions) -> FormatOptions {
        FormatOptions {
            keep_order: overrides.keep_order.or(self.keep_order),
            keep_quote: overrides.keep_quote.or(self.keep_quote),
            keep_space: overrides.keep_space.or(self.keep_space),
            skip_space: overrides.skip_space.or(self.skip_space),
            keep_case: overrides.keep_case.or(self.keep_case),
            upper_name: overrides.upper_name.or(self.upper_name),
        }
    }

    pub(crate) fn resolve(&self) -> Rendering {
        Rendering {
            keep_order: self.keep_order.unwrap_or(false),
            keep_quote: self.keep_quote.unwrap_or(false),
            keep_space: self.keep_space.unwrap_or(false),
            skip_space: self.skip_space.unwrap_or(false),
            keep_case: self.keep_case.unwrap_or(false),
            upper_name: self.upper_name.unwrap_or(false),
        }
    }
}


/// [`FormatOptions`] with every toggle decided.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Rendering {
    keep_order: bool,
    keep_quote: bool,
    keep_space: bool,
    skip_space: bool,
    keep_case: bool,
    upper_name: bool,
}


pub(crate) fn write_dn<W: Write>(
    out: &mut W,
    rdns: &[RelativeDistinguishedName],
    rendering: &Rendering,
) -> fmt::Result {
    for (i, rdn) in rdns.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        if rendering.keep_space {
            out.write_str(&rdn.padding.before)?;
            write_rdn(out, rdn, rendering)?;
            out.write_str(&rdn.padding.after)?;
        } else {
            if i > 0 && !rendering.skip_space {
                out.write_char(' ')?;
            }
            write_rdn(out, rdn, rendering)?;
        }
    }
    Ok(())
}

pub(crate) fn write_rdn<W: Write>(
    out: &mut W,
    rdn: &RelativeDistinguishedName,
    rendering: &Rendering,
) -> fmt::Result {
    let mut pairs: Vec<&AttributeTypeAndValue> = rdn.pairs.iter().collect();
    if !rendering.keep_order {
        // stable, so pairs sharing a type stay in their original order
        pairs.sort_by_cached_key(|pair| pair.folded_name());
    }

    for (i, pair) in pairs.into_iter().enumerate() {
        if i > 0 {
            out.write_char('+')?;
        }
        write_pair(out, pair, rendering)?;
    }
    Ok(())
}

pub(crate) fn write_pair<W: Write>(
    out: &mut W,
    pair: &AttributeTypeAndValue,
    rendering: &Rendering,
) -> fmt::Result {
    if rendering.keep_space {
        out.write_str(&pair.padding.before)?;
    }

    if rendering.upper_name {
        out.write_str(&pair.name.to_uppercase())?;
    } else if rendering.keep_case {
        out.write_str(&pair.name)?;
    } else {
        out.write_str(&pair.folded_name())?;
    }

    if rendering.keep_space {
        out.write_str(&pair.around_equals.before)?;
        out.write_char('=')?;
        out.write_str(&pair.around_equals.after)?;
    } else {
        out.write_char('=')?;
    }

    write_value(out, &pair.value, rendering.keep_quote && pair.quoted)?;

    if rendering.keep_space {
        out.write_str(&pair.padding.after)?;
    }
    Ok(())
}

/// Writes a value in escaped form.
///
/// Values beginning or ending with whitespace (or any value, if `force_quote` is set) are wrapped
/// in double quotes, within which only `"` and `\` are escaped.
pub(crate) fn write_value<W: Write>(out: &mut W, value: &str, force_quote: bool) -> fmt::Result {
    let quoted = force_quote
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);

    if quoted {
        out.write_char('"')?;
    }
    for (i, c) in value.char_indices() {
        let escape = match c {
            '\\'|'"' => true,
            ','|'+'|'='|';' => !quoted,
            '#' => !quoted && i == 0,
            _ => false,
        };
        if escape {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    if quoted {
        out.write_char('"')?;
    }
    Ok(())
}
