//! Deep merge of entry updates into existing config documents
//!
//! Policy, applied key by key over the update tree:
//! - mapping over mapping: merge recursively
//! - sequence: replace wholesale (never concatenate, so repeated applies do
//!   not accumulate duplicate arguments)
//! - anything else: overwrite
//!
//! Keys only present in the existing tree are kept. Merging is pure and
//! idempotent: `merge(&merge(d, u), u) == merge(d, u)`.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::EntryMap;

/// Merge `updates` into `existing`, returning a new document
#[must_use]
pub fn merge(existing: &Value, updates: &Value) -> Value {
    match (existing, updates) {
        (Value::Object(current), Value::Object(incoming)) => {
            Value::Object(merge_maps(current, incoming))
        }
        (_, update) => update.clone(),
    }
}

fn merge_maps(current: &Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    let mut output = current.clone();
    for (key, update) in incoming {
        let merged = match output.get(key) {
            Some(existing) => merge(existing, update),
            None => update.clone(),
        };
        output.insert(key.clone(), merged);
    }
    output
}

/// Where the entry map lives inside a client's config document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "lowercase")]
pub enum MergeRoot {
    /// Entries live under this key; sibling keys are preserved
    Nested(&'static str),
    /// The whole document is the entry map
    Document,
    /// The document is a generated import snippet listing the entries;
    /// it is rebuilt on every write and keeps nothing from the old file
    Snippet,
}

/// Format version of generated snippets
pub const SNIPPET_VERSION: u32 = 1;

const SNIPPET_DESCRIPTION: &str =
    "Import into Warp Drive (Settings -> Warp Drive -> Import JSON) to register MCP servers.";

impl MergeRoot {
    /// The document a client starts from when its config file does not exist
    #[must_use]
    pub fn empty_document(self) -> Value {
        match self {
            Self::Nested(key) => {
                let mut root = Map::new();
                root.insert(key.to_string(), Value::Object(Map::new()));
                Value::Object(root)
            }
            Self::Document => Value::Object(Map::new()),
            Self::Snippet => snippet(&EntryMap::new()),
        }
    }

    /// The current entry map of `document`, if present
    #[must_use]
    pub fn entries<'a>(self, document: &'a Value) -> Option<&'a Map<String, Value>> {
        match self {
            Self::Nested(key) => document.get(key).and_then(Value::as_object),
            Self::Document => document.as_object(),
            Self::Snippet => None,
        }
    }

    /// Merge `entries` into the root of `document`.
    ///
    /// `document` must be a mapping. A nested root that is missing or not a
    /// mapping is replaced by one. A snippet ignores `document`.
    #[must_use]
    pub fn apply(self, document: &Value, entries: &EntryMap) -> Value {
        match self {
            Self::Document => merge(document, &entries_to_value(entries)),
            Self::Nested(key) => {
                let mut root = document.as_object().cloned().unwrap_or_default();
                let current = match root.get(key) {
                    Some(existing @ Value::Object(_)) => existing.clone(),
                    _ => Value::Object(Map::new()),
                };
                root.insert(key.to_string(), merge(&current, &entries_to_value(entries)));
                Value::Object(root)
            }
            Self::Snippet => snippet(entries),
        }
    }
}

// No generation timestamp: an unchanged selection must serialize identically
fn snippet(entries: &EntryMap) -> Value {
    let servers: Vec<Value> = entries
        .iter()
        .map(|(name, entry)| {
            json!({
                "name": name,
                "command": entry.command,
                "args": entry.args,
                "env": entry.env,
            })
        })
        .collect();

    json!({
        "version": SNIPPET_VERSION,
        "generatedBy": "mcp-pack",
        "description": SNIPPET_DESCRIPTION,
        "servers": servers,
    })
}

fn entries_to_value(entries: &EntryMap) -> Value {
    let map = entries
        .iter()
        .map(|(id, entry)| (id.clone(), entry.to_value()))
        .collect();
    Value::Object(map)
}
