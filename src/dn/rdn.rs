//! Relative distinguished names and their attribute type/value pairs.


use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::dn::ParseError;
use crate::format::{self, FormatOptions};


/// The whitespace that surrounded a component in the string it was parsed from.
///
/// Only consulted when rendering with `keep_space`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Padding {
    pub before: String,
    pub after: String,
}
impl Padding {
    pub fn new<B: Into<String>, A: Into<String>>(before: B, after: A) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}


/// A single `type=value` assertion within a relative distinguished name.
///
/// Besides the attribute type (as written) and the unescaped value, this remembers how the pair
/// was written, so that the original form can be reproduced when rendering.
///
/// Equality and hashing only consider the case-folded attribute type and the value.
#[derive(Clone, Debug)]
pub struct AttributeTypeAndValue {
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) quoted: bool,
    pub(crate) padding: Padding,
    pub(crate) around_equals: Padding,
}
impl AttributeTypeAndValue {
    /// Creates a new pair from an attribute type and an unescaped value.
    ///
    /// Returns `None` if `name` is empty.
    pub fn try_new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            value: value.into(),
            quoted: false,
            padding: Padding::default(),
            around_equals: Padding::default(),
        })
    }

    /// Marks the value as having been written in double quotes.
    pub fn with_quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    /// The attribute type as it was written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute type in the lowercase form used for comparison.
    pub fn folded_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// The unescaped value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value<V: Into<String>>(&mut self, value: V) {
        self.value = value.into();
    }

    /// Whether the value was wrapped in double quotes.
    pub fn was_quoted(&self) -> bool {
        self.quoted
    }

    /// The whitespace between this pair and the neighboring `+` delimiters.
    pub fn padding(&self) -> &Padding {
        &self.padding
    }

    /// The whitespace before and after the `=` between type and value.
    pub fn around_equals(&self) -> &Padding {
        &self.around_equals
    }

    /// Whether this pair's attribute type matches `name`, ignoring case.
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name || self.folded_name() == name.to_lowercase()
    }
}
impl PartialEq for AttributeTypeAndValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.folded_name() == other.folded_name()
    }
}
impl Eq for AttributeTypeAndValue {
}
impl Hash for AttributeTypeAndValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded_name().hash(state);
        self.value.hash(state);
    }
}
impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::write_pair(f, self, &FormatOptions::default().resolve())
    }
}


/// A single component of a distinguished name.
///
/// An RDN consists of one or more attribute type/value pairs; more than one makes it a compound
/// (multi-valued) RDN such as `cn=foo+sn=bar`. The pairs are kept in the order in which they were
/// written, but compare as a set: `cn=foo+sn=bar` equals `sn=bar+cn=foo`.
#[derive(Clone, Debug)]
pub struct RelativeDistinguishedName {
    pub(crate) pairs: Vec<AttributeTypeAndValue>,
    pub(crate) padding: Padding,
}
impl RelativeDistinguishedName {
    /// Creates a new RDN from a single pair.
    pub fn new(pair: AttributeTypeAndValue) -> Self {
        Self {
            pairs: vec![pair],
            padding: Padding::default(),
        }
    }

    /// Attempts to create a new RDN from a list of pairs.
    ///
    /// Returns `None` if `pairs` is empty.
    pub fn try_from_pairs(pairs: Vec<AttributeTypeAndValue>) -> Option<Self> {
        if pairs.is_empty() {
            None
        } else {
            Some(Self {
                pairs,
                padding: Padding::default(),
            })
        }
    }

    /// The pairs in the order in which they were written.
    pub fn pairs(&self) -> &[AttributeTypeAndValue] {
        &self.pairs
    }

    /// The number of pairs; always at least one.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether this RDN consists of more than one pair.
    pub fn is_compound(&self) -> bool {
        self.pairs.len() > 1
    }

    /// Returns the value of the first pair whose attribute type matches `name`, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter()
            .find(|pair| pair.has_name(name))
            .map(|pair| pair.value())
    }

    /// Replaces the value of the first pair whose attribute type matches `name` (ignoring case),
    /// or appends a new pair if there is none.
    ///
    /// Returns `false` (and changes nothing) if `name` is empty.
    pub fn set<V: Into<String>>(&mut self, name: &str, value: V) -> bool {
        if let Some(pair) = self.pairs.iter_mut().find(|pair| pair.has_name(name)) {
            pair.set_value(value);
            return true;
        }
        match AttributeTypeAndValue::try_new(name, value) {
            Some(pair) => {
                self.pairs.push(pair);
                true
            },
            None => false,
        }
    }

    /// The whitespace between this RDN and the neighboring `,` delimiters.
    pub fn padding(&self) -> &Padding {
        &self.padding
    }

    /// Renders this RDN using the given options.
    ///
    /// Spacing options only affect the whitespace around compound RDN pairs.
    pub fn format(&self, options: &FormatOptions) -> String {
        let mut ret = String::new();
        // writing into a String cannot fail
        let _ = format::write_rdn(&mut ret, self, &options.resolve());
        ret
    }

    /// Attempts to parse this relative distinguished name from a string.
    pub fn try_from_str(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// The pairs as (case-folded type, value), sorted, for order-independent comparison.
    fn comparison_keys(&self) -> Vec<(String, &str)> {
        let mut keys: Vec<(String, &str)> = self.pairs.iter()
            .map(|pair| (pair.folded_name(), pair.value()))
            .collect();
        keys.sort_unstable();
        keys
    }
}
impl PartialEq for RelativeDistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        if self.pairs.len() != other.pairs.len() {
            return false;
        }
        if self.pairs.len() == 1 {
            return self.pairs[0] == other.pairs[0];
        }
        self.comparison_keys() == other.comparison_keys()
    }
}
impl Eq for RelativeDistinguishedName {
}
impl Hash for RelativeDistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.comparison_keys().hash(state);
    }
}
impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::write_rdn(f, self, &FormatOptions::default().resolve())
    }
}
impl FromStr for RelativeDistinguishedName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::dn::parsing::parse_single_rdn(s)
            .map_err(|kind| ParseError::new(s, kind))
    }
}
impl From<AttributeTypeAndValue> for RelativeDistinguishedName {
    fn from(value: AttributeTypeAndValue) -> Self {
        Self::new(value)
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{AttributeTypeAndValue, RelativeDistinguishedName};
    use crate::FormatOptions;

    fn pair(name: &str, value: &str) -> AttributeTypeAndValue {
        AttributeTypeAndValue::try_new(name, value).unwrap()
    }

    #[test]
    fn test_pair_equality() {
        assert_eq!(pair("CN", "foo"), pair("cn", "foo"));
        assert_ne!(pair("cn", "foo"), pair("cn", "Foo"));
        assert_ne!(pair("cn", "foo"), pair("sn", "foo"));
        assert!(AttributeTypeAndValue::try_new("", "foo").is_none());
    }

    #[test]
    fn test_compound_equality_is_order_independent() {
        let ab = RelativeDistinguishedName::try_from_pairs(vec![pair("a", "1"), pair("b", "2")]).unwrap();
        let ba = RelativeDistinguishedName::try_from_pairs(vec![pair("B", "2"), pair("A", "1")]).unwrap();
        let ac = RelativeDistinguishedName::try_from_pairs(vec![pair("a", "1"), pair("c", "2")]).unwrap();
        let a = RelativeDistinguishedName::new(pair("a", "1"));
        assert_eq!(ab, ba);
        assert_ne!(ab, ac);
        assert_ne!(ab, a);

        let mut set = HashSet::new();
        set.insert(ab.clone());
        assert!(set.contains(&ba));

        // duplicated types are compared as a multiset
        let aa = RelativeDistinguishedName::try_from_pairs(vec![pair("a", "1"), pair("a", "1")]).unwrap();
        let ab2 = RelativeDistinguishedName::try_from_pairs(vec![pair("a", "1"), pair("a", "2")]).unwrap();
        assert_ne!(aa, ab2);
    }

    #[test]
    fn test_get_and_set() {
        let mut rdn = RelativeDistinguishedName::try_from_pairs(vec![pair("CN", "foo"), pair("sn", "bar")]).unwrap();
        assert_eq!(rdn.get("cn"), Some("foo"));
        assert_eq!(rdn.get("SN"), Some("bar"));
        assert_eq!(rdn.get("uid"), None);

        assert!(rdn.set("cn", "baz"));
        assert_eq!(rdn.len(), 2);
        assert_eq!(rdn.pairs()[0].name(), "CN");
        assert_eq!(rdn.get("cn"), Some("baz"));

        assert!(rdn.set("uid", "u1"));
        assert_eq!(rdn.len(), 3);
        assert!(!rdn.set("", "nothing"));
        assert_eq!(rdn.len(), 3);
    }

    #[test]
    fn test_try_from_pairs() {
        assert!(RelativeDistinguishedName::try_from_pairs(Vec::new()).is_none());
        let rdn = RelativeDistinguishedName::try_from_pairs(vec![pair("cn", "foo")]).unwrap();
        assert!(!rdn.is_compound());
    }

    #[test]
    fn test_parse_rdn() {
        let rdn: RelativeDistinguishedName = "sn=bar+CN=foo".parse().unwrap();
        assert_eq!(rdn.len(), 2);
        assert_eq!(rdn.pairs()[0].name(), "sn");
        assert_eq!(rdn.pairs()[1].name(), "CN");
        assert_eq!(rdn.to_string(), "cn=foo+sn=bar");
        assert_eq!(rdn.format(&FormatOptions::new().with_keep_order(true).with_keep_case(true)), "sn=bar+CN=foo");

        assert!(RelativeDistinguishedName::try_from_str("cn=foo,dc=bar").is_none());
        assert!(RelativeDistinguishedName::try_from_str("").is_none());
        assert!(RelativeDistinguishedName::try_from_str("cn=foo\\,dc=bar").is_some());
    }

    #[test]
    fn test_display_pair() {
        assert_eq!(pair("CN", "a,b").to_string(), "cn=a\\,b");
        assert_eq!(pair("cn", " padded").to_string(), "cn=\" padded\"");
    }
}
