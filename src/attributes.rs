//! Free-form processing attributes attached to an envelope.
//!
//! Pipeline stages use these to hand metadata to later stages. Names are
//! validated to be non-empty; values are opaque to this crate.

use std::{
    borrow::Borrow,
    fmt::{self, Display},
    str::FromStr,
};

use ahash::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated, non-empty attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeName(String);

impl AttributeName {
    /// Validate and wrap an attribute name.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyAttributeName`] if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyAttributeName);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AttributeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Borrow<str> for AttributeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An attribute value. No validation is imposed beyond the shape itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Bytes(Vec<u8>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

/// The attribute store embedded in an envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes(HashMap<AttributeName, AttributeValue>);

impl Attributes {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert a value, returning the previously stored one, if any.
    pub fn insert(
        &mut self,
        name: AttributeName,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(name, value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &AttributeName> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &AttributeValue)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_names_are_rejected() {
        assert!(matches!(
            AttributeName::new(""),
            Err(Error::EmptyAttributeName)
        ));
        assert!("".parse::<AttributeName>().is_err());
    }

    #[test]
    fn insert_get_remove_round_trip() {
        let mut attributes = Attributes::default();
        assert!(attributes.is_empty());

        let name = AttributeName::new("spam-score").unwrap();
        assert_eq!(attributes.insert(name.clone(), 42i64), None);
        assert_eq!(attributes.len(), 1);
        assert_eq!(
            attributes.get("spam-score"),
            Some(&AttributeValue::Integer(42))
        );

        let previous = attributes.insert(name, "high");
        assert_eq!(previous, Some(AttributeValue::Integer(42)));

        assert_eq!(
            attributes.remove("spam-score"),
            Some(AttributeValue::String("high".into()))
        );
        assert!(attributes.is_empty());
    }

    #[test]
    fn value_conversions() {
        assert_eq!(AttributeValue::from("x"), AttributeValue::String("x".into()));
        assert_eq!(AttributeValue::from(true), AttributeValue::Boolean(true));
        assert_eq!(
            AttributeValue::from(vec![1u8, 2]),
            AttributeValue::Bytes(vec![1, 2])
        );
    }
}
