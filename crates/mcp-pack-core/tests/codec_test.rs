//! Codec round-trip tests on realistic client configs

use mcp_pack_core::codec::{CodecError, JsonCodec, TomlCodec};
use mcp_pack_core::{ConfigFormat, FormatCodec};
use serde_json::json;

const CLAUDE_DESKTOP: &str = r#"{
  "globalShortcut": "Ctrl+Space",
  "mcpServers": {
    "filesystem": {
      "command": "npx",
      "args": ["-y", "@modelcontextprotocol/server-filesystem", "/Users/me/Desktop"],
      "env": {"DEBUG": "1"}
    }
  },
  "window": {"width": 1280.5, "maximized": false, "position": null}
}"#;

const CODEX: &str = r#"
model = "o3"
approval_policy = "on-request"
max_tokens = 4096
temperature = 0.2

[history]
persistence = "save-all"

[mcp_servers.fetch]
command = "npx"
args = ["-y", "fetch"]

[mcp_servers.fetch.env]
USER_AGENT = "mcp-pack"
"#;

fn assert_round_trip(codec: &dyn FormatCodec, text: &str) {
    let parsed = codec.parse(text).unwrap();
    let serialized = codec.serialize(&parsed).unwrap();
    assert!(serialized.ends_with('\n'));

    let reparsed = codec.parse(&serialized).unwrap();
    assert_eq!(reparsed, parsed);

    // Serialization is deterministic
    assert_eq!(codec.serialize(&reparsed).unwrap(), serialized);
}

#[test]
fn test_json_round_trip() {
    assert_round_trip(&JsonCodec, CLAUDE_DESKTOP);
}

#[test]
fn test_toml_round_trip() {
    assert_round_trip(&TomlCodec, CODEX);
}

#[test]
fn test_toml_document_shape() {
    let doc = TomlCodec.parse(CODEX).unwrap();
    assert_eq!(doc["max_tokens"], json!(4096));
    assert_eq!(doc["temperature"], json!(0.2));
    assert_eq!(
        doc["mcp_servers"]["fetch"]["env"],
        json!({"USER_AGENT": "mcp-pack"})
    );
}

#[test]
fn test_json_keeps_key_order_through_round_trip() {
    let doc = JsonCodec.parse(CLAUDE_DESKTOP).unwrap();
    let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["globalShortcut", "mcpServers", "window"]);
}

#[test]
fn test_json_null_cannot_go_to_toml() {
    let doc = JsonCodec.parse(r#"{"args": ["a", null]}"#).unwrap();
    let err = ConfigFormat::Toml.codec().serialize(&doc).unwrap_err();
    assert!(matches!(err, CodecError::Unrepresentable { .. }));
}

#[test]
fn test_parse_errors_name_the_format() {
    let err = ConfigFormat::Json.codec().parse("{").unwrap_err();
    assert!(err.to_string().starts_with("Invalid JSON"));

    let err = ConfigFormat::Toml.codec().parse("[broken").unwrap_err();
    assert!(err.to_string().starts_with("Invalid TOML"));
}
