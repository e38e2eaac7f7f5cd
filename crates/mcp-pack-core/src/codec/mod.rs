//! Format codecs for client config documents
//!
//! Every client config is read into a generic [`serde_json::Value`] tree and
//! written back through the codec of its format. Codecs must round-trip:
//! `parse(serialize(parse(text))) == parse(text)`.

mod json_codec;
mod toml_codec;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub use json_codec::JsonCodec;
pub use toml_codec::{TomlCodec, DATETIME_TAG, FLOAT_TAG};

/// Errors raised while parsing or serializing a config document
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid {format}: {message}")]
    Parse {
        format: ConfigFormat,
        message: String,
    },

    #[error("Cannot serialize as {format}: {message}")]
    Serialize {
        format: ConfigFormat,
        message: String,
    },

    #[error("Value not representable in {format}: {message}")]
    Unrepresentable {
        format: ConfigFormat,
        message: String,
    },
}

/// Parse/serialize contract shared by all client adapters
pub trait FormatCodec {
    /// The format this codec handles
    fn format(&self) -> ConfigFormat;

    /// Parse document text. Empty or whitespace-only text is the empty mapping.
    ///
    /// # Errors
    /// Returns [`CodecError::Parse`] if the text is not valid in this format
    fn parse(&self, text: &str) -> Result<Value, CodecError>;

    /// Serialize a document deterministically, always ending with a newline.
    ///
    /// # Errors
    /// Returns an error if the document cannot be expressed in this format
    fn serialize(&self, document: &Value) -> Result<String, CodecError>;
}

/// On-disk format of a client config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// The codec implementing this format
    #[must_use]
    pub fn codec(self) -> &'static dyn FormatCodec {
        match self {
            Self::Json => &JsonCodec,
            Self::Toml => &TomlCodec,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

fn with_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selects_codec() {
        assert_eq!(ConfigFormat::Json.codec().format(), ConfigFormat::Json);
        assert_eq!(ConfigFormat::Toml.codec().format(), ConfigFormat::Toml);
    }

    #[test]
    fn test_trailing_newline_added_once() {
        assert_eq!(with_trailing_newline("a".into()), "a\n");
        assert_eq!(with_trailing_newline("a\n".into()), "a\n");
    }
}
