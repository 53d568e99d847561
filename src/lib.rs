//! Parsing, comparison and format-preserving rendering of LDAP distinguished names (DNs).
//!
//! ```
//! let dn = ldap_dn::parse("cn=mark, ou=people, o=joyent").unwrap();
//! assert_eq!(dn.len(), 3);
//! assert!(dn.child_of("o=joyent"));
//! assert_eq!(dn.to_string(), "cn=mark, ou=people, o=joyent");
//! ```


#[cfg(not(feature = "tracing"))]
macro_rules! no_trace {
    ($($tokens:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
pub(crate) use no_trace;


pub(crate) mod common_parsing;
pub mod dn;
pub mod format;
#[cfg(feature = "serde")]
mod ser_de;
pub mod shape;


pub use crate::dn::{
    AttributeTypeAndValue, DistinguishedName, DnOperand, Padding, ParseError, ParseErrorKind,
    RelativeDistinguishedName,
};
pub use crate::format::FormatOptions;
pub use crate::shape::{is_dn, DnShape, RdnShape};


/// Parses a distinguished name from its string representation.
///
/// The empty string (or one consisting only of whitespace) yields the empty DN.
pub fn parse(s: &str) -> Result<DistinguishedName, ParseError> {
    DistinguishedName::parse(s)
}
