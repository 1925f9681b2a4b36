//! YAML to JSON value conversion with safe-load semantics.
//!
//! Deserializes straight into `serde_json::Value` through our own visitors instead of
//! `serde_yaml::Value`, so that:
//! - a repeated mapping key keeps its last value
//! - `<<` merge keys are applied, explicit keys winning over merged ones
//! - scalar mapping keys (null, bool, numbers) become their JSON text
//! - custom `!tag`s are rejected instead of being turned into wrapper objects

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use std::fmt;

const MERGE_KEY: &str = "<<";

/// Parse a single YAML document. `Ok(None)` for a document with no content at all
/// (blank, comments only, bare `---`).
pub fn parse_document(text: &str) -> Result<Option<Value>, String> {
    if is_blank_document(text) {
        return Ok(None);
    }

    let Node(value) = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

struct Node(Value);

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor).map(Node)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YAML node")
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer).map(|node| node.0)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    // NaN and infinities have no JSON form.
    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(Node(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut explicit: Vec<(String, Value)> = Vec::new();
        let mut merged = Map::new();

        while let Some(Key(key)) = access.next_key()? {
            let Node(value) = access.next_value()?;
            if key == MERGE_KEY {
                merge_into(&mut merged, value).map_err(de::Error::custom)?;
            } else {
                explicit.push((key, value));
            }
        }

        let mut map = merged;
        for (key, value) in explicit {
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (tag, _) = data.variant::<String>()?;
        Err(de::Error::custom(format!("unsupported tag !{}", tag.trim_start_matches('!'))))
    }
}

/// `<<: *anchor` or `<<: [*a, *b]`. Earlier sources win over later ones.
fn merge_into(merged: &mut Map<String, Value>, value: Value) -> Result<(), String> {
    match value {
        Value::Object(source) => {
            for (key, value) in source {
                merged.entry(key).or_insert(value);
            }
            Ok(())
        }
        Value::Array(sources) => sources
            .into_iter()
            .try_for_each(|source| match source {
                Value::Object(_) => merge_into(merged, source),
                _ => Err("merge sequence must contain only mappings".to_string()),
            }),
        _ => Err("merge value must be a mapping or a sequence of mappings".to_string()),
    }
}

/// Mapping key rendered the way JSON object keys are: scalars become text.
struct Key(String);

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(KeyVisitor).map(Key)
    }
}

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_unit<E>(self) -> Result<String, E> {
        Ok("null".to_string())
    }

    fn visit_none<E>(self) -> Result<String, E> {
        Ok("null".to_string())
    }

    fn visit_bool<E>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_str<E>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E>(self, v: String) -> Result<String, E> {
        Ok(v)
    }
}
