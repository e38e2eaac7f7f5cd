//! JSON codec (Claude Desktop, Cursor, VS Code, Windsurf)

use super::{with_trailing_newline, CodecError, ConfigFormat, FormatCodec};
use serde_json::{Map, Value};

/// Two-space pretty-printed JSON with insertion-ordered keys
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl FormatCodec for JsonCodec {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }

    fn parse(&self, text: &str) -> Result<Value, CodecError> {
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_str(text).map_err(|e| CodecError::Parse {
            format: ConfigFormat::Json,
            message: e.to_string(),
        })
    }

    fn serialize(&self, document: &Value) -> Result<String, CodecError> {
        let text = serde_json::to_string_pretty(document).map_err(|e| CodecError::Serialize {
            format: ConfigFormat::Json,
            message: e.to_string(),
        })?;
        Ok(with_trailing_newline(text))
    }
}
