//! Mailbox addresses carried on an envelope.
//!
//! A deliberately small subset of the RFC 5321 grammar: dot-string
//! local parts and LDH domains, with the usual size constraints
//! (local part up to 64 octets, domain up to 255). Quoted strings and
//! address literals are left to the full address-validation library,
//! which is a collaborator outside this crate.

use std::{
    fmt::{self, Display},
    ops::{Deref, DerefMut},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_LOCAL_PART: usize = 64;
const MAX_DOMAIN: usize = 255;

/// Errors that can occur during address parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Empty input.
    #[error("empty address")]
    Empty,

    /// Missing the '@' separator between local part and domain.
    #[error("missing '@' separator in mailbox")]
    MissingAtSign,

    /// Local part exceeds 64 octets.
    #[error("local-part exceeds {MAX_LOCAL_PART} octets")]
    LocalPartTooLong,

    /// Domain exceeds 255 octets.
    #[error("domain exceeds {MAX_DOMAIN} octets")]
    DomainTooLong,

    /// Invalid character or dot placement in the local part.
    #[error("invalid local-part: {0:?}")]
    InvalidLocalPart(String),

    /// Invalid label in the domain.
    #[error("invalid domain: {0:?}")]
    InvalidDomain(String),
}

/// A parsed mailbox (`local-part@domain`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    local_part: String,
    domain: String,
}

impl Address {
    /// Parse an address, with or without surrounding angle brackets.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] if the input is not a valid mailbox.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let mailbox = trimmed
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(trimmed);

        let (local_part, domain) = mailbox
            .rsplit_once('@')
            .ok_or(AddressError::MissingAtSign)?;

        validate_local_part(local_part)?;
        validate_domain(domain)?;

        Ok(Self {
            local_part: local_part.to_owned(),
            domain: domain.to_owned(),
        })
    }

    /// The part before the '@'.
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// The domain after the '@'.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// atext from RFC 5321, the characters allowed in an unquoted atom.
const fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}

fn validate_local_part(local_part: &str) -> Result<(), AddressError> {
    if local_part.is_empty() {
        return Err(AddressError::InvalidLocalPart(local_part.to_owned()));
    }
    if local_part.len() > MAX_LOCAL_PART {
        return Err(AddressError::LocalPartTooLong);
    }

    // Dot-string: atoms separated by single dots, no leading or trailing dot
    let valid = local_part
        .split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(is_atext));

    if valid {
        Ok(())
    } else {
        Err(AddressError::InvalidLocalPart(local_part.to_owned()))
    }
}

fn validate_domain(domain: &str) -> Result<(), AddressError> {
    if domain.is_empty() {
        return Err(AddressError::InvalidDomain(domain.to_owned()));
    }
    if domain.len() > MAX_DOMAIN {
        return Err(AddressError::DomainTooLong);
    }

    let valid_label = |label: &str| {
        !label.is_empty()
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    };

    if domain.split('.').all(valid_label) {
        Ok(())
    } else {
        Err(AddressError::InvalidDomain(domain.to_owned()))
    }
}

/// An ordered collection of addressees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressList(pub Vec<Address>);

impl Display for AddressList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, addr) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            Display::fmt(addr, f)?;
        }
        Ok(())
    }
}

impl From<Vec<Address>> for AddressList {
    fn from(value: Vec<Address>) -> Self {
        Self(value)
    }
}

impl FromIterator<Address> for AddressList {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for AddressList {
    type Target = Vec<Address>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for AddressList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_plain_mailbox() {
        let addr = Address::parse("sender@localhost").unwrap();
        assert_eq!(addr.local_part(), "sender");
        assert_eq!(addr.domain(), "localhost");
        assert_eq!(addr.to_string(), "sender@localhost");
    }

    #[test]
    fn parses_bracketed_path() {
        let addr = Address::parse("<postmaster@mail.example.com>").unwrap();
        assert_eq!(addr.domain(), "mail.example.com");
    }

    #[test]
    fn accepts_dot_string_and_atext() {
        assert!(Address::parse("first.last@example.com").is_ok());
        assert!(Address::parse("user+tag@example.com").is_ok());
        assert!(Address::parse("ops!page@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_mailboxes() {
        assert_eq!(Address::parse(""), Err(AddressError::Empty));
        assert_eq!(Address::parse("no-at-sign"), Err(AddressError::MissingAtSign));
        assert!(matches!(
            Address::parse(".leading@example.com"),
            Err(AddressError::InvalidLocalPart(_))
        ));
        assert!(matches!(
            Address::parse("double..dot@example.com"),
            Err(AddressError::InvalidLocalPart(_))
        ));
        assert!(matches!(
            Address::parse("user@-bad.example.com"),
            Err(AddressError::InvalidDomain(_))
        ));
    }

    #[test]
    fn enforces_size_limits() {
        let local = "a".repeat(65);
        assert_eq!(
            Address::parse(&format!("{local}@example.com")),
            Err(AddressError::LocalPartTooLong)
        );

        let domain = format!("{}.com", "a".repeat(253));
        assert_eq!(
            Address::parse(&format!("user@{domain}")),
            Err(AddressError::DomainTooLong)
        );
    }

    #[test]
    fn address_list_displays_comma_separated() {
        let list: AddressList = ["a@example.com", "b@example.com"]
            .into_iter()
            .map(|a| Address::parse(a).unwrap())
            .collect();
        assert_eq!(list.to_string(), "a@example.com, b@example.com");
        assert_eq!(list.len(), 2);
    }
}
