//! Structures related to Distinguished Names (DNs).


mod error;
pub(crate) mod parsing;
mod rdn;
pub(crate) mod scanning;


use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[cfg(feature = "tracing")] use tracing::trace;

pub use crate::dn::error::{ParseError, ParseErrorKind};
pub use crate::dn::rdn::{AttributeTypeAndValue, Padding, RelativeDistinguishedName};
use crate::format::{self, FormatOptions};
#[cfg(not(feature = "tracing"))] use crate::no_trace as trace;


/// The unique identifier of a specific object in the directory.
///
/// A DN is a sequence of relative distinguished names (RDNs) ordered from the most specific (the
/// entry itself, at index 0) to the least specific (closest to the root of the directory tree).
/// The DN without any RDNs is the empty DN and stands for the root itself.
///
/// Each DN carries [`FormatOptions`] that decide how it is rendered by its `Display`
/// implementation. They can be changed with [`set_format`](Self::set_format) and are copied
/// along when the DN is cloned. Comparison and hashing disregard them, as well as any other
/// detail of how the DN was written.
#[derive(Clone, Debug, Default)]
pub struct DistinguishedName {
    rdns: Vec<RelativeDistinguishedName>,
    format: FormatOptions,
}
impl DistinguishedName {
    /// Parses a distinguished name from its string representation.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        parsing::parse_dn(s)
            .map_err(|kind| {
                trace!("failed to parse {:?}: {}", s, kind);
                ParseError::new(s, kind)
            })
    }

    /// Attempts to parse this distinguished name from a string.
    pub fn try_from_str(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    /// Obtains the slice of the relative distinguished names that are the basis of this
    /// distinguished name.
    pub fn as_rdns(&self) -> &[RelativeDistinguishedName] {
        &self.rdns
    }

    /// Converts this distinguished name into a vector of relative distinguished names.
    pub fn into_rdns(self) -> Vec<RelativeDistinguishedName> {
        self.rdns
    }

    /// The number of RDNs.
    pub fn len(&self) -> usize {
        self.rdns.len()
    }

    /// Whether this is the empty DN, which has no RDNs.
    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Returns the RDN at the given index, counting from the leaf.
    pub fn rdn_at(&self, index: usize) -> Option<&RelativeDistinguishedName> {
        self.rdns.get(index)
    }

    /// Appends an RDN at the root end, making this DN a descendant of a new root.
    pub fn push(&mut self, rdn: RelativeDistinguishedName) {
        self.rdns.push(rdn);
    }

    /// Removes and returns the RDN closest to the root.
    pub fn pop(&mut self) -> Option<RelativeDistinguishedName> {
        self.rdns.pop()
    }

    /// Prepends an RDN at the leaf end, turning this DN into the DN of a new child entry.
    pub fn push_leaf(&mut self, rdn: RelativeDistinguishedName) {
        self.rdns.insert(0, rdn);
    }

    /// Removes and returns the leaf RDN.
    pub fn pop_leaf(&mut self) -> Option<RelativeDistinguishedName> {
        if self.rdns.is_empty() {
            None
        } else {
            Some(self.rdns.remove(0))
        }
    }

    /// Whether both DNs consist of the same RDNs in the same order.
    ///
    /// `other` may also be a string, which is parsed first; a string that cannot be parsed is
    /// not equal to anything.
    pub fn equals<O: DnOperand + ?Sized>(&self, other: &O) -> bool {
        match other.to_dn() {
            Some(other) => rdns_equal(&self.rdns, &other.rdns),
            None => false,
        }
    }

    /// Whether this DN is a descendant (at any depth) of `other`.
    ///
    /// Every DN except the empty one is a child of the empty DN; no DN is a child of itself.
    pub fn child_of<O: DnOperand + ?Sized>(&self, other: &O) -> bool {
        let other = match other.to_dn() {
            Some(o) => o,
            None => return false,
        };
        if self.rdns.len() <= other.rdns.len() {
            return false;
        }
        let suffix_start = self.rdns.len() - other.rdns.len();
        rdns_equal(&self.rdns[suffix_start..], &other.rdns)
    }

    /// Whether `other` is a descendant (at any depth) of this DN.
    pub fn parent_of<O: DnOperand + ?Sized>(&self, other: &O) -> bool {
        match other.to_dn() {
            Some(other) => other.child_of(self),
            None => false,
        }
    }

    /// Returns the DN one level up the hierarchy.
    ///
    /// Returns `None` for the empty DN, which has no parent. The returned DN has default format
    /// options.
    pub fn parent(&self) -> Option<DistinguishedName> {
        if self.rdns.is_empty() {
            return None;
        }
        Some(DistinguishedName::from(self.rdns[1..].to_vec()))
    }

    /// The format options currently used when rendering this DN via `Display`.
    pub fn format_options(&self) -> &FormatOptions {
        &self.format
    }

    /// Merges the given options into the format options of this DN.
    ///
    /// Toggles that are set in `options` replace the current ones; all others are retained.
    /// Clones made afterwards inherit the result.
    pub fn set_format(&mut self, options: FormatOptions) -> &mut Self {
        self.format = self.format.merged_with(&options);
        self
    }

    /// Renders this DN with the given options layered over its own format options, without
    /// changing the latter.
    pub fn format(&self, options: &FormatOptions) -> String {
        let rendering = self.format.merged_with(options).resolve();
        let mut ret = String::new();
        // writing into a String cannot fail
        let _ = format::write_dn(&mut ret, &self.rdns, &rendering);
        ret
    }
}
impl From<Vec<RelativeDistinguishedName>> for DistinguishedName {
    fn from(value: Vec<RelativeDistinguishedName>) -> Self {
        Self {
            rdns: value,
            format: FormatOptions::default(),
        }
    }
}
impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::write_dn(f, &self.rdns, &self.format.resolve())
    }
}
impl FromStr for DistinguishedName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
impl TryFrom<&str> for DistinguishedName {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        rdns_equal(&self.rdns, &other.rdns)
    }
}
impl Eq for DistinguishedName {
}
impl Hash for DistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rdns.hash(state);
    }
}

fn rdns_equal(ours: &[RelativeDistinguishedName], theirs: &[RelativeDistinguishedName]) -> bool {
    ours.len() == theirs.len()
        && ours.iter().zip(theirs.iter()).all(|(o, t)| o == t)
}


/// Something that can be compared to a distinguished name.
///
/// Implemented for distinguished names themselves and for strings, which are parsed on demand.
pub trait DnOperand {
    /// Obtains the distinguished name, or `None` if there is no valid one.
    fn to_dn(&self) -> Option<Cow<'_, DistinguishedName>>;
}
impl DnOperand for DistinguishedName {
    fn to_dn(&self) -> Option<Cow<'_, DistinguishedName>> {
        Some(Cow::Borrowed(self))
    }
}
impl DnOperand for str {
    fn to_dn(&self) -> Option<Cow<'_, DistinguishedName>> {
        DistinguishedName::try_from_str(self).map(Cow::Owned)
    }
}
impl DnOperand for String {
    fn to_dn(&self) -> Option<Cow<'_, DistinguishedName>> {
        self.as_str().to_dn()
    }
}
impl<T: DnOperand + ?Sized> DnOperand for &T {
    fn to_dn(&self) -> Option<Cow<'_, DistinguishedName>> {
        (**self).to_dn()
    }
}
