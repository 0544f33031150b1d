//! Read view over a sparse patch document.
//!
//! A key that is absent means "leave this setting alone". A key that is
//! present means "change it", whatever its value: `false`, `0` and `""` are
//! all requests to change. The reader never invents values for missing keys.

use serde_json::{Map, Value as Json};

use crate::error::{PrefsError, Result};
use crate::field::{FieldKind, Value};
use crate::folders::FolderSpec;

#[derive(Debug, Clone, Default)]
pub struct PatchReader {
    document: Map<String, Json>,
}

impl PatchReader {
    /// Parses the raw request body. Anything but a JSON object is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Json = serde_json::from_str(raw)?;
        Self::from_value(value)
    }
    pub fn from_value(value: Json) -> Result<Self> {
        match value {
            Json::Object(document) => Ok(Self { document }),
            other => Err(PrefsError::MalformedPatch(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            ))),
        }
    }
    pub fn has(&self, key: &str) -> bool {
        self.document.contains_key(key)
    }
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.document.keys().map(String::as_str)
    }
    pub fn raw(&self, key: &str) -> Option<&Json> {
        self.document.get(key)
    }

    // Typed getters below return Ok(None) when the key is absent.

    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        self.typed(key, FieldKind::Bool.expected(), Json::as_bool)
    }
    pub fn int(&self, key: &str) -> Result<Option<i64>> {
        self.typed(key, FieldKind::Int.expected(), |v| match v {
            Json::Number(n) => n.as_i64().or_else(|| {
                n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64)
            }),
            Json::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }
    pub fn real(&self, key: &str) -> Result<Option<f64>> {
        self.typed(key, FieldKind::Real.expected(), |v| match v {
            Json::Number(n) => n.as_f64(),
            Json::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        })
    }
    pub fn text(&self, key: &str) -> Result<Option<String>> {
        self.typed(key, FieldKind::Text.expected(), |v| v.as_str().map(str::to_string))
    }
    /// Accepts one delimited string or an array of strings. Empty entries are
    /// dropped.
    pub fn text_list(&self, key: &str, delimiter: &str) -> Result<Option<Vec<String>>> {
        self.typed(key, "a string or an array of strings", |v| match v {
            Json::String(s) => Some(split_non_empty(s, delimiter)),
            Json::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(|items| items.into_iter().filter(|s| !s.is_empty()).collect()),
            _ => None,
        })
    }
    pub fn choice(&self, key: &str, variants: u8) -> Result<Option<i64>> {
        match self.int(key) {
            Ok(Some(i)) if (0..variants as i64).contains(&i) => Ok(Some(i)),
            Ok(Some(_)) | Err(_) => Err(mismatch(key, FieldKind::Choice(variants).expected())),
            Ok(None) => Ok(None),
        }
    }
    /// Watched folders arrive as an object of path to location kind or
    /// destination. Entries keep the document order.
    pub fn folders(&self, key: &str) -> Result<Option<Vec<(String, FolderSpec)>>> {
        let Some(value) = self.document.get(key) else {
            return Ok(None);
        };
        let expected = "an object of folder locations";
        let entries = value.as_object().ok_or_else(|| mismatch(key, expected))?;
        entries
            .iter()
            .map(|(path, spec)| {
                FolderSpec::from_wire(spec)
                    .map(|spec| (path.clone(), spec))
                    .ok_or_else(|| mismatch(&format!("{}.{}", key, path), expected))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Coerces the value of a catalogue field to its declared kind.
    pub fn value(&self, key: &str, kind: FieldKind) -> Result<Option<Value>> {
        Ok(match kind {
            FieldKind::Bool => self.bool(key)?.map(Value::Bool),
            FieldKind::Int => self.int(key)?.map(Value::Int),
            FieldKind::Real => self.real(key)?.map(Value::Real),
            FieldKind::Text => self.text(key)?.map(Value::Text),
            FieldKind::TextList(delimiter) => self.text_list(key, delimiter)?.map(Value::TextList),
            FieldKind::Choice(variants) => self.choice(key, variants)?.map(Value::Int),
        })
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &'static str,
        coerce: impl Fn(&Json) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.document.get(key) {
            None => Ok(None),
            Some(value) => coerce(value).map(Some).ok_or_else(|| mismatch(key, expected)),
        }
    }
}

fn mismatch(key: &str, expected: &'static str) -> PrefsError {
    PrefsError::TypeMismatch { key: key.to_string(), expected }
}

fn split_non_empty(s: &str, delimiter: &str) -> Vec<String> {
    s.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
