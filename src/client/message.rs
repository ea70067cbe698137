//! Message payloads accepted by the relay's send endpoints

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

use super::Endpoint;
use crate::errors::{AppError, AppResult};

/// Wire value meaning "deliver to every eligible user".
pub const BROADCAST_ALL: &str = "@all";

/// Who a message is delivered to.
///
/// Serializes to the relay's `touser` string: `@all`, a `|`-joined user list,
/// or a raw value passed through untouched. An empty raw value lets the relay
/// fall back to its own configured default recipient.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Recipient {
    #[default]
    All,
    Users(Vec<String>),
    Raw(String),
}

impl Recipient {
    /// Build a user list. Names are kept exactly as given.
    pub fn users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Users(users.into_iter().map(Into::into).collect())
    }

    /// Empty `touser`; the relay falls back to its configured default recipient.
    pub fn relay_default() -> Self {
        Self::Raw(String::new())
    }

    /// Read a `touser` string. Only the exact `@all` sentinel is recognised;
    /// everything else is kept verbatim.
    pub fn parse(value: &str) -> Self {
        if value == BROADCAST_ALL {
            Self::All
        } else {
            Self::Raw(value.to_string())
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(BROADCAST_ALL),
            Self::Users(users) => f.write_str(&users.join("|")),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<&str> for Recipient {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for Recipient {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl Serialize for Recipient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Recipient {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Kind of message, as named in envelopes and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Markdown,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// A single message, serialized exactly as the relay's request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Text {
        text: String,
        #[serde(rename = "touser")]
        to_user: Recipient,
    },
    Image {
        /// Standard base64 of the raw image bytes.
        image: String,
        #[serde(rename = "touser")]
        to_user: Recipient,
    },
    Markdown {
        markdown: String,
        #[serde(rename = "touser")]
        to_user: Recipient,
    },
}

impl Message {
    pub fn text(text: impl Into<String>, to_user: impl Into<Recipient>) -> Self {
        Self::Text {
            text: text.into(),
            to_user: to_user.into(),
        }
    }

    pub fn markdown(markdown: impl Into<String>, to_user: impl Into<Recipient>) -> Self {
        Self::Markdown {
            markdown: markdown.into(),
            to_user: to_user.into(),
        }
    }

    /// Image message from content that is already base64 encoded.
    pub fn image_base64(image: impl Into<String>, to_user: impl Into<Recipient>) -> Self {
        Self::Image {
            image: image.into(),
            to_user: to_user.into(),
        }
    }

    pub fn image_from_bytes(bytes: &[u8], to_user: impl Into<Recipient>) -> Self {
        Self::image_base64(STANDARD.encode(bytes), to_user)
    }

    /// Read the whole file and encode it. No size limit is applied.
    pub fn image_from_path(path: impl AsRef<Path>, to_user: impl Into<Recipient>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| AppError::from_file_error(path, "read image", e))?;
        Ok(Self::image_from_bytes(&bytes, to_user))
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text { .. } => MessageKind::Text,
            Self::Image { .. } => MessageKind::Image,
            Self::Markdown { .. } => MessageKind::Markdown,
        }
    }

    pub fn recipient(&self) -> &Recipient {
        match self {
            Self::Text { to_user, .. }
            | Self::Image { to_user, .. }
            | Self::Markdown { to_user, .. } => to_user,
        }
    }

    /// Endpoint this message is posted to.
    pub fn endpoint(&self) -> Endpoint {
        match self.kind() {
            MessageKind::Text => Endpoint::SendText,
            MessageKind::Image => Endpoint::SendImage,
            MessageKind::Markdown => Endpoint::SendMarkdown,
        }
    }
}

/// `{type, content, touser}` form used by the relay's MQTT bridge.
///
/// Image content is expected to be base64 already. A missing `touser` is
/// sent empty so the relay applies its configured default recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(default = "Recipient::relay_default")]
    pub touser: Recipient,
}

impl From<Envelope> for Message {
    fn from(envelope: Envelope) -> Self {
        let to_user = envelope.touser;
        match envelope.kind {
            MessageKind::Text => Message::text(envelope.content, to_user),
            MessageKind::Image => Message::image_base64(envelope.content, to_user),
            MessageKind::Markdown => Message::markdown(envelope.content, to_user),
        }
    }
}
