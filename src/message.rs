//! The opaque MIME payload attached to an envelope.
//!
//! The payload is held as raw bytes and parsed on demand for header
//! access; the body's own data structures are out of scope here. The one
//! piece of identity this crate cares about is the `Message-ID` header:
//! it is assigned exactly once, at construction, and is never regenerated
//! when the payload is attached to or copied between envelopes.

use mailparse::MailHeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Header carrying the payload's own identity.
pub const MESSAGE_ID_HEADER: &str = "Message-ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeMessage {
    raw: Vec<u8>,
}

impl MimeMessage {
    /// Parse a message from raw bytes.
    ///
    /// A payload that does not carry a `Message-ID` header is stamped with
    /// a freshly generated one. A payload that already carries one keeps
    /// it verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Message`] if the bytes are not parseable as
    /// a MIME message.
    pub fn parse(raw: impl Into<Vec<u8>>) -> Result<Self> {
        let mut raw = raw.into();

        let parsed = mailparse::parse_mail(&raw)?;
        if parsed
            .headers
            .get_first_value(MESSAGE_ID_HEADER)
            .is_none()
        {
            let header = format!(
                "{MESSAGE_ID_HEADER}: <{}@localhost>\r\n",
                ulid::Ulid::new()
            );
            let mut stamped = Vec::with_capacity(header.len() + raw.len());
            stamped.extend_from_slice(header.as_bytes());
            stamped.append(&mut raw);
            raw = stamped;
        }

        Ok(Self { raw })
    }

    /// The payload's `Message-ID`, which is always present after
    /// [`MimeMessage::parse`].
    #[must_use]
    pub fn message_id(&self) -> Option<String> {
        self.header(MESSAGE_ID_HEADER)
    }

    /// The first value of the named header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        mailparse::parse_mail(&self.raw)
            .ok()
            .and_then(|mail| mail.headers.get_first_value(name))
    }

    /// The payload size in bytes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn size(&self) -> u64 {
        self.raw.len() as u64
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_message_id_is_assigned_once() {
        let message = MimeMessage::parse("Subject: hi\r\n\r\nbody\r\n").unwrap();
        let id = message.message_id().expect("an id should be assigned");
        assert!(id.starts_with('<') && id.ends_with("@localhost>"));

        // Re-parsing the stamped bytes keeps the same id
        let reparsed = MimeMessage::parse(message.as_bytes().to_vec()).unwrap();
        assert_eq!(reparsed.message_id(), Some(id));
    }

    #[test]
    fn existing_message_id_is_preserved_verbatim() {
        let message = MimeMessage::parse(
            "Message-ID: <keep-me@example.com>\r\nSubject: hi\r\n\r\nbody\r\n",
        )
        .unwrap();
        assert_eq!(
            message.message_id().as_deref(),
            Some("<keep-me@example.com>")
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let message = MimeMessage::parse("Subject: case\r\n\r\n").unwrap();
        assert_eq!(message.header("subject").as_deref(), Some("case"));
    }

    #[test]
    fn size_matches_raw_length() {
        let message =
            MimeMessage::parse("Message-ID: <m@x.com>\r\nSubject: s\r\n\r\nhello").unwrap();
        assert_eq!(message.size(), message.as_bytes().len() as u64);
    }
}
