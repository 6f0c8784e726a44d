//! The in-transit mail envelope entity.
//!
//! An envelope is the addressable unit a pipeline stage works on: a name
//! unique within the processing run, sender and recipient identities,
//! free-form attributes, routing metadata, and an optional opaque MIME
//! payload. Envelopes are built through [`Builder`], mutated in place by
//! one stage at a time, and forked with [`Envelope::duplicate`], which
//! hands the copy a freshly derived name and an independently owned
//! payload.

use std::{
    fmt::{self, Display},
    net::{IpAddr, Ipv4Addr},
    str::FromStr,
    time::SystemTime,
};

use serde::{Deserialize, Serialize};

use crate::{
    address::{Address, AddressList},
    attributes::{AttributeName, AttributeValue, Attributes},
    error::{Error, Result},
    message::MimeMessage,
    naming,
    sender::Sender,
};

/// Remote address recorded when none was supplied.
pub const LOCALHOST_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Remote host recorded when none was supplied.
pub const LOCALHOST_NAME: &str = "localhost";

/// Processing-pipeline state tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Freshly received, not yet routed.
    #[default]
    Default,
    /// Handed to the delivery side of the pipeline.
    Transport,
    /// Failed processing; awaiting bounce or quarantine.
    Error,
    /// Fully processed; to be dropped from the pipeline.
    Ghost,
}

impl Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Transport => "transport",
            Self::Error => "error",
            Self::Ghost => "ghost",
        })
    }
}

impl FromStr for State {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "transport" => Ok(Self::Transport),
            "error" => Ok(Self::Error),
            "ghost" => Ok(Self::Ghost),
            other => Err(Error::UnknownState(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    name: String,
    sender: Sender,
    recipients: AddressList,
    attributes: Attributes,
    message: Option<MimeMessage>,
    remote_addr: IpAddr,
    remote_host: String,
    state: State,
    error_message: Option<String>,
    last_updated: SystemTime,
}

impl Envelope {
    /// Start assembling a new envelope.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the envelope.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyName`] for an empty name; the envelope is unchanged.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        self.name = name;
        self.touch();
        Ok(())
    }

    /// The full three-state sender, with no collapsing.
    #[must_use]
    pub const fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn set_sender(&mut self, sender: impl Into<Sender>) {
        self.sender = sender.into();
        self.touch();
    }

    /// The boundary view of the sender: `Some` only for a concrete
    /// address. An unspecified sender and the explicit null sender both
    /// resolve to `None`.
    #[must_use]
    pub const fn maybe_sender(&self) -> Option<&Address> {
        self.sender.address()
    }

    /// True only when a concrete sender address is present.
    #[must_use]
    pub const fn has_sender(&self) -> bool {
        self.sender.is_present()
    }

    #[must_use]
    pub const fn recipients(&self) -> &AddressList {
        &self.recipients
    }

    pub fn set_recipients(&mut self, recipients: impl Into<AddressList>) {
        self.recipients = recipients.into();
        self.touch();
    }

    pub fn add_recipient(&mut self, recipient: Address) {
        self.recipients.push(recipient);
        self.touch();
    }

    #[must_use]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &AttributeName> {
        self.attributes.names()
    }

    /// Store an attribute, returning the previously stored value, if any.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyAttributeName`] for an empty name; the store is
    /// unchanged.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<Option<AttributeValue>> {
        let name = AttributeName::new(name)?;
        let previous = self.attributes.insert(name, value);
        self.touch();
        Ok(previous)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttributeValue> {
        let removed = self.attributes.remove(name);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    #[must_use]
    pub const fn message(&self) -> Option<&MimeMessage> {
        self.message.as_ref()
    }

    /// Attach a payload. The payload's own `Message-ID` is preserved
    /// verbatim; identity is assigned only at [`MimeMessage::parse`] time.
    pub fn set_message(&mut self, message: MimeMessage) {
        self.message = Some(message);
        self.touch();
    }

    /// The attached payload's size in bytes.
    ///
    /// # Errors
    ///
    /// [`Error::NoMessage`] when no payload is attached. A missing
    /// payload is an invalid measurement, not a zero-sized one.
    pub fn message_size(&self) -> Result<u64> {
        self.message
            .as_ref()
            .map(MimeMessage::size)
            .ok_or(Error::NoMessage)
    }

    #[must_use]
    pub const fn remote_addr(&self) -> IpAddr {
        self.remote_addr
    }

    pub fn set_remote_addr(&mut self, addr: IpAddr) {
        self.remote_addr = addr;
        self.touch();
    }

    #[must_use]
    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    pub fn set_remote_host(&mut self, host: impl Into<String>) {
        self.remote_host = host.into();
        self.touch();
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    pub fn set_state(&mut self, state: State) {
        self.state = state;
        self.touch();
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.touch();
    }

    pub fn clear_error_message(&mut self) {
        if self.error_message.take().is_some() {
            self.touch();
        }
    }

    /// When the envelope last materially changed.
    #[must_use]
    pub const fn last_updated(&self) -> SystemTime {
        self.last_updated
    }

    /// Fork this envelope under a fresh identity.
    ///
    /// The copy gets a name derived from this one and an independently
    /// owned payload with identical content; every other field is equal
    /// in value. Mutating one envelope's payload is never visible through
    /// the other.
    ///
    /// # Errors
    ///
    /// [`Error::DerivationOverflow`] when this envelope's lineage has
    /// exhausted its derivation depth; see [`naming::derive_new_name`].
    #[tracing::instrument(level = "debug", skip(self), fields(name = %self.name))]
    pub fn duplicate(&self) -> Result<Self> {
        let name = naming::derive_new_name(&self.name)?;
        tracing::debug!(derived = %name, "duplicating envelope");

        Ok(Self {
            name,
            sender: self.sender.clone(),
            recipients: self.recipients.clone(),
            attributes: self.attributes.clone(),
            message: self.message.clone(),
            remote_addr: self.remote_addr,
            remote_host: self.remote_host.clone(),
            state: self.state,
            error_message: self.error_message.clone(),
            last_updated: self.last_updated,
        })
    }

    fn touch(&mut self) {
        self.last_updated = SystemTime::now();
    }
}

/// Transient assembly object for [`Envelope`].
///
/// Every field is optional except the name, which is validated eagerly
/// when supplied and required at [`Builder::build`] time. Unspecified
/// fields take their documented defaults.
#[derive(Debug, Default)]
pub struct Builder {
    name: Option<String>,
    sender: Sender,
    recipients: AddressList,
    attributes: Attributes,
    message: Option<MimeMessage>,
    remote_addr: Option<IpAddr>,
    remote_host: Option<String>,
    state: State,
    error_message: Option<String>,
    last_updated: Option<SystemTime>,
}

impl Builder {
    /// Set the envelope name.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyName`] for an empty name, surfaced at call time
    /// rather than deferred to [`Builder::build`].
    pub fn name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        self.name = Some(name);
        Ok(self)
    }

    #[must_use]
    pub fn sender(mut self, sender: impl Into<Sender>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Attach a payload. Its `Message-ID` is carried over verbatim.
    #[must_use]
    pub fn mime_message(mut self, message: MimeMessage) -> Self {
        self.message = Some(message);
        self
    }

    #[must_use]
    pub fn recipient(mut self, recipient: Address) -> Self {
        self.recipients.push(recipient);
        self
    }

    #[must_use]
    pub fn recipients(mut self, recipients: impl IntoIterator<Item = Address>) -> Self {
        self.recipients = recipients.into_iter().collect();
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: AttributeName, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    #[must_use]
    pub fn state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    #[must_use]
    pub fn remote_host(mut self, host: impl Into<String>) -> Self {
        self.remote_host = Some(host.into());
        self
    }

    #[must_use]
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn last_updated(mut self, at: SystemTime) -> Self {
        self.last_updated = Some(at);
        self
    }

    /// Finalise the envelope, applying defaults for unspecified fields.
    ///
    /// # Errors
    ///
    /// [`Error::MissingName`] when no name was ever supplied.
    pub fn build(self) -> Result<Envelope> {
        let name = self.name.ok_or(Error::MissingName)?;

        Ok(Envelope {
            name,
            sender: self.sender,
            recipients: self.recipients,
            attributes: self.attributes,
            message: self.message,
            remote_addr: self.remote_addr.unwrap_or(LOCALHOST_ADDR),
            remote_host: self
                .remote_host
                .unwrap_or_else(|| LOCALHOST_NAME.to_owned()),
            state: self.state,
            error_message: self.error_message,
            last_updated: self.last_updated.unwrap_or_else(SystemTime::now),
        })
    }
}
