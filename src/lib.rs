//! missive — the in-transit mail envelope model of an MTA pipeline.
//!
//! The central entity is the [`Envelope`]: a named, addressable unit
//! carrying a message payload, sender and recipient identities, free-form
//! processing attributes, and routing metadata. Envelopes are assembled
//! through [`Envelope::builder`], mutated in place by one pipeline stage
//! at a time, and forked with [`Envelope::duplicate`], which derives a
//! fresh, collision-resistant name via [`derive_new_name`].
//!
//! ```
//! use missive::{Address, Envelope, MimeMessage};
//!
//! # fn main() -> missive::Result<()> {
//! let envelope = Envelope::builder()
//!     .name("mail-id")?
//!     .sender("sender@localhost".parse::<Address>()?)
//!     .mime_message(MimeMessage::parse("Subject: hello\r\n\r\nhi\r\n")?)
//!     .build()?;
//!
//! assert!(envelope.has_sender());
//! let forked = envelope.duplicate()?;
//! assert_ne!(forked.name(), envelope.name());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod attributes;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod message;
pub mod naming;
pub mod sender;

pub use address::{Address, AddressError, AddressList};
pub use attributes::{AttributeName, AttributeValue, Attributes};
pub use envelope::{Builder, Envelope, State};
pub use error::{Error, Result};
pub use message::MimeMessage;
pub use naming::derive_new_name;
pub use sender::Sender;

pub use tracing;
