//! Tagged-object wire codec.
//!
//! A record result is a single-entry object keyed by its variant name. An
//! upload result is an object with exactly the fields `record_result`,
//! `toOne` and `toMany`. Decoding is strict: variant keys must be unique and
//! recognized, and upload result objects carry no other fields.

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{CodecError, Result};
use crate::record::{RecordResult, VARIANT_NAMES};
use crate::upload::UploadResult;

const UPLOAD_RESULT_FIELDS: [&str; 3] = ["record_result", "toOne", "toMany"];

impl RecordResult {
    /// Encode as a single-entry tagged object.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode from a single-entry tagged object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = expect_object(value, "record_result")?;

        if let Some(unknown) = object
            .keys()
            .find(|key| !VARIANT_NAMES.contains(&key.as_str()))
        {
            return Err(CodecError::UnknownVariant(unknown.clone()));
        }

        let mut entries = object.iter();
        let (tag, payload) = match (entries.next(), entries.next()) {
            (None, _) => return Err(CodecError::MissingVariant),
            (Some(entry), None) => entry,
            (Some(_), Some(_)) => {
                return Err(CodecError::AmbiguousVariant(object.keys().cloned().collect()));
            }
        };

        let result = match tag.as_str() {
            "Uploaded" => RecordResult::Uploaded(decode_payload(tag, payload)?),
            "Matched" => RecordResult::Matched(decode_payload(tag, payload)?),
            "MatchedMultiple" => RecordResult::MatchedMultiple(decode_payload(tag, payload)?),
            "NullRecord" => RecordResult::NullRecord(decode_payload(tag, payload)?),
            "FailedBusinessRule" => {
                RecordResult::FailedBusinessRule(decode_payload(tag, payload)?)
            }
            "NoMatch" => RecordResult::NoMatch(decode_payload(tag, payload)?),
            "ParseFailures" => RecordResult::ParseFailures(decode_payload(tag, payload)?),
            other => unreachable!("variant tag {other} passed the variant name check"),
        };

        Ok(result)
    }
}

impl UploadResult {
    /// Encode the whole tree.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Encode the whole tree as a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a tree, preserving relation order as found on the wire.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = expect_object(value, "upload result")?;

        if let Some(unexpected) = object
            .keys()
            .find(|key| !UPLOAD_RESULT_FIELDS.contains(&key.as_str()))
        {
            return Err(CodecError::malformed(
                "upload result",
                format!("unexpected field `{unexpected}`"),
            ));
        }

        let record_result = RecordResult::from_json(required(object, "record_result")?)?;

        let mut to_one = IndexMap::new();
        for (relation, child) in expect_object(required(object, "toOne")?, "toOne")? {
            to_one.insert(relation.clone(), UploadResult::from_json(child)?);
        }

        let mut to_many = IndexMap::new();
        for (relation, children) in expect_object(required(object, "toMany")?, "toMany")? {
            let children = children.as_array().ok_or_else(|| {
                CodecError::malformed(
                    format!("toMany.{relation}"),
                    format!("expected an array, found {}", kind(children)),
                )
            })?;
            let results = children
                .iter()
                .map(UploadResult::from_json)
                .collect::<Result<Vec<_>>>()?;
            to_many.insert(relation.clone(), results);
        }

        Ok(UploadResult {
            record_result,
            to_one,
            to_many,
        })
    }

    /// Decode a tree from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        UploadResult::from_json(&value)
    }
}

impl<'de> Deserialize<'de> for RecordResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RecordResult::from_json(&value).map_err(D::Error::custom)
    }
}

impl<'de> Deserialize<'de> for UploadResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        UploadResult::from_json(&value).map_err(D::Error::custom)
    }
}

fn decode_payload<T: DeserializeOwned>(tag: &str, payload: &Value) -> Result<T> {
    T::deserialize(payload).map_err(|err| CodecError::malformed(tag, err.to_string()))
}

fn expect_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        CodecError::malformed(context, format!("expected an object, found {}", kind(value)))
    })
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value> {
    object
        .get(field)
        .ok_or_else(|| CodecError::malformed("upload result", format!("missing field `{field}`")))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
