//! TOML codec (Codex CLI)
//!
//! TOML has no null and no top-level non-table values, so the conversion
//! to and from the JSON-shaped document tree is done by hand: nulls inside
//! tables are dropped and nulls inside arrays are rejected.
//!
//! Datetimes and non-finite floats have no JSON counterpart. They travel
//! through the tree as single-key tagged objects (see [`DATETIME_TAG`] and
//! [`FLOAT_TAG`]) and are written back as native TOML values.

use super::{with_trailing_newline, CodecError, ConfigFormat, FormatCodec};
use serde_json::{Map, Number, Value};

/// Key of the tagged object holding a TOML datetime in its string form
pub const DATETIME_TAG: &str = "$__toml_datetime";

/// Key of the tagged object holding a non-finite TOML float
/// (`nan`, `-nan`, `inf` or `-inf`)
pub const FLOAT_TAG: &str = "$__toml_float";

/// TOML codec with insertion-ordered tables
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl FormatCodec for TomlCodec {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Toml
    }

    fn parse(&self, text: &str) -> Result<Value, CodecError> {
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        let table: toml::Table = toml::from_str(text).map_err(|e| CodecError::Parse {
            format: ConfigFormat::Toml,
            message: e.message().to_string(),
        })?;

        Ok(table_to_json(table))
    }

    fn serialize(&self, document: &Value) -> Result<String, CodecError> {
        let Value::Object(map) = document else {
            return Err(unrepresentable("document root must be a table"));
        };

        let table = object_to_table(map)?;
        let text = toml::to_string(&table).map_err(|e| CodecError::Serialize {
            format: ConfigFormat::Toml,
            message: e.to_string(),
        })?;
        Ok(with_trailing_newline(text))
    }
}

fn unrepresentable(message: impl Into<String>) -> CodecError {
    CodecError::Unrepresentable {
        format: ConfigFormat::Toml,
        message: message.into(),
    }
}

fn tagged(tag: &str, value: String) -> Value {
    let mut map = Map::new();
    map.insert(tag.to_string(), Value::String(value));
    Value::Object(map)
}

fn non_finite_name(f: f64) -> &'static str {
    match (f.is_nan(), f.is_sign_negative()) {
        (true, false) => "nan",
        (true, true) => "-nan",
        (false, false) => "inf",
        (false, true) => "-inf",
    }
}

fn table_to_json(table: toml::Table) -> Value {
    let map = table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect();
    Value::Object(map)
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => match Number::from_f64(f) {
            Some(n) => Value::Number(n),
            None => tagged(FLOAT_TAG, non_finite_name(f).to_string()),
        },
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => tagged(DATETIME_TAG, dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => table_to_json(table),
    }
}

/// The native value behind a tagged object, `None` for ordinary tables
fn tagged_scalar(map: &Map<String, Value>) -> Result<Option<toml::Value>, CodecError> {
    if map.len() != 1 {
        return Ok(None);
    }
    let Some((tag, Value::String(text))) = map.iter().next() else {
        return Ok(None);
    };

    match tag.as_str() {
        DATETIME_TAG => text
            .parse::<toml::value::Datetime>()
            .map(|dt| Some(toml::Value::Datetime(dt)))
            .map_err(|e| unrepresentable(format!("datetime {text:?}: {e}"))),
        FLOAT_TAG => {
            let f = match text.as_str() {
                "nan" => f64::NAN,
                "-nan" => -f64::NAN,
                "inf" => f64::INFINITY,
                "-inf" => f64::NEG_INFINITY,
                other => return Err(unrepresentable(format!("float {other:?}"))),
            };
            Ok(Some(toml::Value::Float(f)))
        }
        _ => Ok(None),
    }
}

fn object_to_table(map: &Map<String, Value>) -> Result<toml::Table, CodecError> {
    let mut table = toml::Table::new();
    for (key, value) in map {
        // No null in TOML: an absent key is the closest equivalent
        if value.is_null() {
            continue;
        }
        table.insert(key.clone(), json_to_toml(value)?);
    }
    Ok(table)
}

fn json_to_toml(value: &Value) -> Result<toml::Value, CodecError> {
    Ok(match value {
        Value::Null => return Err(unrepresentable("null inside an array")),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                toml::Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                toml::Value::Float(f)
            } else {
                return Err(unrepresentable(format!("number {n}")));
            }
        }
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(items) => toml::Value::Array(
            items
                .iter()
                .map(json_to_toml)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => match tagged_scalar(map)? {
            Some(scalar) => scalar,
            None => toml::Value::Table(object_to_table(map)?),
        },
    })
}
