//! JSON wire codec for [`Session`].
//!
//! Decoding and encoding are deliberately asymmetric. Clients must send `id`,
//! `speakers` and `schedule`; the text fields are optional and default to empty
//! strings. Encoding always writes exactly the seven known keys, whatever else
//! the input carried.

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::data::Session;
use crate::errors::CodecError;
use crate::id::{SessionId, SpeakerId};

pub const ID: &str = "id";
pub const ABSTRACT: &str = "abstract";
pub const TITLE: &str = "title";
pub const CODE: &str = "code";
pub const TYPE: &str = "type";
pub const SPEAKERS: &str = "speakers";
pub const SCHEDULE: &str = "schedule";

/// Parses a session from raw JSON bytes.
pub fn decode(bytes: &[u8]) -> Result<Session, CodecError> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_value(value)
}

/// Builds a session from an already parsed JSON document.
pub fn decode_value(value: Value) -> Result<Session, CodecError> {
    let Value::Object(mut object) = value else {
        return Err(CodecError::NotAnObject);
    };

    let id = match object.remove(ID) {
        Some(Value::String(id)) => SessionId::from_string(id),
        Some(_) => return Err(invalid(ID, "a string")),
        None => return Err(CodecError::MissingField(ID)),
    };

    let speakers = match object.remove(SPEAKERS) {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(speaker) => Ok(SpeakerId::from_string(speaker)),
                _ => Err(invalid(SPEAKERS, "an array of strings")),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid(SPEAKERS, "an array of strings")),
        None => return Err(CodecError::MissingField(SPEAKERS)),
    };

    let schedule = match object.remove(SCHEDULE) {
        Some(Value::Number(number)) => truncate(&number),
        Some(_) => return Err(invalid(SCHEDULE, "a number")),
        None => return Err(CodecError::MissingField(SCHEDULE)),
    };

    Ok(Session {
        id,
        r#abstract: text(&mut object, ABSTRACT)?,
        title: text(&mut object, TITLE)?,
        code: text(&mut object, CODE)?,
        r#type: text(&mut object, TYPE)?,
        speakers,
        schedule,
        extra: object,
    })
}

/// Writes the seven-key wire form of a session.
pub fn encode(session: &Session) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(session)?)
}

fn invalid(field: &'static str, expected: &'static str) -> CodecError {
    CodecError::InvalidField { field, expected }
}

fn text(object: &mut Map<String, Value>, field: &'static str) -> Result<String, CodecError> {
    match object.remove(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(invalid(field, "a string")),
    }
}

// Keeps the low 32 bits; floats drop their fraction first.
fn truncate(number: &Number) -> i32 {
    if let Some(value) = number.as_i64() {
        value as i32
    } else if let Some(value) = number.as_u64() {
        value as i32
    } else {
        number
            .as_f64()
            .map(|value| value as i64 as i32)
            .unwrap_or_default()
    }
}

impl Serialize for Session {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Session", 7)?;
        state.serialize_field(ID, &self.id)?;
        state.serialize_field(ABSTRACT, &self.r#abstract)?;
        state.serialize_field(TITLE, &self.title)?;
        state.serialize_field(CODE, &self.code)?;
        state.serialize_field(TYPE, &self.r#type)?;
        state.serialize_field(SPEAKERS, &self.speakers)?;
        state.serialize_field(SCHEDULE, &self.schedule)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decode_value(value).map_err(D::Error::custom)
    }
}
