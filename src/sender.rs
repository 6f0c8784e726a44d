//! The three-state reverse-path model.
//!
//! An envelope's sender is not a simple optional address. A bounce or a
//! MAILER-DAEMON notification carries an *explicit* null reverse-path
//! (`<>`), which is a different assertion from a sender that was simply
//! never recorded. Both resolve to "no sender" at the boundary, but the
//! distinction is kept internally and never silently collapsed.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// No sender was ever recorded for this envelope.
    #[default]
    Unspecified,
    /// The null reverse-path `<>`: an explicit assertion that no sender
    /// exists, as used for bounces.
    Null,
    /// A concrete sender address.
    Address(Address),
}

impl Sender {
    /// The boundary view: `Some` only when a concrete address is present.
    /// [`Sender::Unspecified`] and [`Sender::Null`] both resolve to `None`.
    #[must_use]
    pub const fn address(&self) -> Option<&Address> {
        match self {
            Self::Address(addr) => Some(addr),
            Self::Unspecified | Self::Null => None,
        }
    }

    /// True only when a concrete address is present.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Address(_))
    }

    /// True only for the explicit null reverse-path.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True only when no sender was ever recorded.
    #[must_use]
    pub const fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

impl From<Address> for Sender {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified | Self::Null => write!(f, "<>"),
            Self::Address(addr) => write!(f, "<{addr}>"),
        }
    }
}

impl FromStr for Sender {
    type Err = AddressError;

    /// Parse a reverse-path: `<>` is the null sender, anything else must
    /// be a valid mailbox.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "<>" {
            Ok(Self::Null)
        } else {
            Address::parse(s).map(Self::Address)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unspecified_and_null_resolve_to_no_sender() {
        assert_eq!(Sender::Unspecified.address(), None);
        assert_eq!(Sender::Null.address(), None);
        assert!(!Sender::Unspecified.is_present());
        assert!(!Sender::Null.is_present());
    }

    #[test]
    fn states_are_not_collapsed() {
        assert!(Sender::Null.is_null());
        assert!(!Sender::Null.is_unspecified());
        assert!(Sender::Unspecified.is_unspecified());
        assert_ne!(Sender::Unspecified, Sender::Null);
    }

    #[test]
    fn present_sender_resolves_to_its_address() {
        let addr = Address::parse("sender@localhost").unwrap();
        let sender = Sender::from(addr.clone());
        assert!(sender.is_present());
        assert_eq!(sender.address(), Some(&addr));
    }

    #[test]
    fn reverse_path_round_trip() {
        assert_eq!("<>".parse::<Sender>().unwrap(), Sender::Null);

        let sender = "<sender@localhost>".parse::<Sender>().unwrap();
        assert_eq!(sender.to_string(), "<sender@localhost>");
        assert_eq!(Sender::Null.to_string(), "<>");
    }
}
