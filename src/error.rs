//! Error types for the missive crate.
//!
//! Every fallible operation on an envelope surfaces one of these variants
//! immediately to the caller; nothing is swallowed or retried internally.
//! Retry and quarantine policy belongs to the surrounding pipeline.

use thiserror::Error;

use crate::address::AddressError;

/// Specialized `Result` type for envelope operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The builder was finalised without a name ever being supplied.
    #[error("an envelope requires a name")]
    MissingName,

    /// An empty string was supplied where an envelope name is required.
    #[error("envelope names must not be empty")]
    EmptyName,

    /// An empty string was supplied where an attribute name is required.
    #[error("attribute names must not be empty")]
    EmptyAttributeName,

    /// The derivation depth for this lineage is exhausted, which usually
    /// means the envelope is caught in a bounce or fork loop. Callers are
    /// expected to stop forking this lineage and quarantine the envelope.
    #[error("refusing to derive a new name from {0:?}: too many nested derivations")]
    DerivationOverflow(String),

    /// A size was requested for an envelope with no attached payload.
    #[error("no message is attached to this envelope")]
    NoMessage,

    /// An unrecognised processing state tag.
    #[error("unknown processing state: {0:?}")]
    UnknownState(String),

    /// A sender or recipient address failed validation.
    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    /// A message payload could not be parsed.
    #[error("invalid message: {0}")]
    Message(#[from] mailparse::MailParseError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_is_stable() {
        assert_eq!(
            Error::MissingName.to_string(),
            "an envelope requires a name"
        );
        assert_eq!(
            Error::DerivationOverflow("a!1!b".into()).to_string(),
            "refusing to derive a new name from \"a!1!b\": too many nested derivations"
        );
        assert_eq!(
            Error::NoMessage.to_string(),
            "no message is attached to this envelope"
        );
    }

    #[test]
    fn address_errors_convert() {
        let err = Error::from(AddressError::MissingAtSign);
        assert!(matches!(err, Error::Address(_)));
        assert!(err.to_string().contains("'@'"));
    }
}
