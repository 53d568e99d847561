//! Recognizing values that look like distinguished names.
//!
//! A value counts as a DN if it exposes a sequence of RDN-like entries and can be rendered as a
//! string, regardless of whether it was produced by [`crate::parse`]. Types opt in by implementing
//! [`DnShape`] and [`RdnShape`].


use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::dn::{DistinguishedName, RelativeDistinguishedName};


/// Something that looks like a relative distinguished name.
pub trait RdnShape {
    /// The number of attribute type/value pairs in this RDN.
    fn attribute_count(&self) -> usize;
}

/// Something that may look like a distinguished name.
pub trait DnShape: fmt::Display {
    /// The RDN-like entries from leaf to root, or `None` if this value has no such sequence.
    fn rdn_shapes(&self) -> Option<Vec<&dyn RdnShape>> {
        None
    }
}


/// Whether `value` is present and shaped like a distinguished name.
///
/// Strings are never DNs; they have to be parsed first.
pub fn is_dn<T: DnShape + ?Sized>(value: Option<&T>) -> bool {
    let shapes = match value.and_then(|v| v.rdn_shapes()) {
        Some(s) => s,
        None => return false,
    };
    shapes.iter().all(|rdn| rdn.attribute_count() > 0)
}


impl RdnShape for RelativeDistinguishedName {
    fn attribute_count(&self) -> usize {
        self.len()
    }
}
impl<K, V> RdnShape for BTreeMap<K, V> {
    fn attribute_count(&self) -> usize {
        self.len()
    }
}
impl<K, V, S> RdnShape for HashMap<K, V, S> {
    fn attribute_count(&self) -> usize {
        self.len()
    }
}
impl<K, V> RdnShape for Vec<(K, V)> {
    fn attribute_count(&self) -> usize {
        self.len()
    }
}

impl DnShape for DistinguishedName {
    fn rdn_shapes(&self) -> Option<Vec<&dyn RdnShape>> {
        Some(self.as_rdns().iter().map(|rdn| rdn as &dyn RdnShape).collect())
    }
}
impl DnShape for str {
}
impl DnShape for String {
}


#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fmt;

    use super::{is_dn, DnShape, RdnShape};
    use crate::DistinguishedName;

    struct Duck {
        rdns: Vec<BTreeMap<String, String>>,
    }
    impl fmt::Display for Duck {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut first = true;
            for rdn in &self.rdns {
                for (name, value) in rdn {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                    first = false;
                }
            }
            Ok(())
        }
    }
    impl DnShape for Duck {
        fn rdn_shapes(&self) -> Option<Vec<&dyn RdnShape>> {
            Some(self.rdns.iter().map(|rdn| rdn as &dyn RdnShape).collect())
        }
    }

    fn entry(name: &str, value: &str) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(name.to_owned(), value.to_owned());
        map
    }

    #[test]
    fn test_is_dn() {
        let valid = DistinguishedName::parse("cn=foo").unwrap();
        assert!(!is_dn::<DistinguishedName>(None));
        assert!(!is_dn(Some("cn=foo")));
        assert!(!is_dn(Some(&"cn=foo".to_owned())));
        assert!(is_dn(Some(&valid)));
        assert!(is_dn(Some(&DistinguishedName::default())));
    }

    #[test]
    fn test_duck() {
        let duck = Duck {
            rdns: vec![entry("look", "ma"), entry("a", "dn")],
        };
        assert_eq!(duck.to_string(), "look=ma, a=dn");
        assert!(is_dn(Some(&duck)));

        let lame = Duck {
            rdns: vec![entry("look", "ma"), BTreeMap::new()],
        };
        assert!(!is_dn(Some(&lame)));

        let dyn_duck: &dyn DnShape = &duck;
        assert!(is_dn(Some(dyn_duck)));
    }
}
