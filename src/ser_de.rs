use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::Error as _;


use crate::dn::{AttributeTypeAndValue, DistinguishedName, RelativeDistinguishedName};


impl Serialize for DistinguishedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stringified = self.to_string();
        stringified.serialize(serializer)
    }
}
impl<'de> Deserialize<'de> for DistinguishedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stringified = String::deserialize(deserializer)?;
        Self::parse(&stringified)
            .map_err(D::Error::custom)
    }
}

impl Serialize for RelativeDistinguishedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stringified = self.to_string();
        stringified.serialize(serializer)
    }
}
impl<'de> Deserialize<'de> for RelativeDistinguishedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stringified = String::deserialize(deserializer)?;
        Self::try_from_str(&stringified)
            .ok_or(D::Error::custom("invalid syntax"))
    }
}

impl Serialize for AttributeTypeAndValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stringified = self.to_string();
        stringified.serialize(serializer)
    }
}
impl<'de> Deserialize<'de> for AttributeTypeAndValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stringified = String::deserialize(deserializer)?;
        let rdn = RelativeDistinguishedName::try_from_str(&stringified)
            .ok_or(D::Error::custom("invalid syntax"))?;
        if rdn.is_compound() {
            return Err(D::Error::custom("expected a single attribute, got a compound RDN"));
        }
        rdn.pairs.into_iter()
            .next()
            .ok_or(D::Error::custom("invalid syntax"))
    }
}
