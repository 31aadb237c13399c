use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Song metadata: arbitrary key/value pairs with a required non-empty `url`.
#[derive(PartialEq, Debug, Clone)]
pub struct Song {
    fields: Map<String, Value>,
}

impl Song {
    pub fn new(url: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("url".to_string(), Value::String(url.into()));
        Song { fields }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// `Ok(None)` for anything that is not a record; an error for a record without `url`.
    pub fn from_value(value: Value) -> Result<Option<Self>> {
        let Value::Object(fields) = value else {
            return Ok(None);
        };

        match fields.get("url") {
            Some(Value::String(url)) if !url.is_empty() => Ok(Some(Song { fields })),
            _ => Err(Error::argument("song record needs a non-empty `url`")),
        }
    }

    pub fn url(&self) -> &str {
        self.fields
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A value as display text; strings are shown without quotes.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(display)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<Value> for Song {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Song::from_value(value)?.ok_or_else(|| Error::argument("song must be a record"))
    }
}

impl From<Song> for Value {
    fn from(song: Song) -> Self {
        Value::Object(song.fields)
    }
}

pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
