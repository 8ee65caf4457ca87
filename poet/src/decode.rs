//! Decoding of the service's JSON export into [`TranslationEntry`] values.
//!
//! The export is an array of objects:
//!
//! ```json
//! [
//!   { "term": "Hello", "context": "Main.strings", "definition": "Bonjour", "comment": "greeting" },
//!   { "term": "items", "context": "Main.strings", "definition": { "one": "1 item", "other": "%d items" } }
//! ]
//! ```
//!
//! `term` and `context` are mandatory. A single bad record fails the whole batch so that broken
//! service responses show up instead of silently producing incomplete files.

use serde_json::{Map, Value};

use crate::{
    error::Error,
    types::{Translated, TranslationEntry},
};

/// Decodes a raw export body into entries, in document order.
///
/// An empty (or whitespace-only) body decodes to no entries.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<TranslationEntry>, Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let document: Value = serde_json::from_slice(bytes)?;
    let Value::Array(records) = document else {
        return Err(Error::DataMismatch(
            "expected a JSON array of translation records".to_string(),
        ));
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| decode_record(index, record))
        .collect()
}

/// Decodes one record. `index` is only used for error reporting.
pub fn decode_record(index: usize, record: &Value) -> Result<TranslationEntry, Error> {
    let Value::Object(fields) = record else {
        return Err(Error::malformed_record(index, "record is not an object"));
    };

    let term = required_string(index, fields, "term")?;
    let context = required_string(index, fields, "context")?;

    let translated = match fields.get("definition") {
        Some(Value::String(single)) => Translated::Single(Some(single.clone())),
        Some(Value::Object(forms)) => Translated::Plural(
            forms
                .iter()
                .filter_map(|(category, value)| {
                    value.as_str().map(|v| (category.clone(), v.to_string()))
                })
                .collect(),
        ),
        _ => Translated::Single(None),
    };

    let comment = fields
        .get("comment")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(TranslationEntry {
        term,
        context,
        comment,
        translated,
    })
}

fn required_string(index: usize, fields: &Map<String, Value>, key: &str) -> Result<String, Error> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(Error::malformed_record(
            index,
            format!("`{}` is not a string", key),
        )),
        None => Err(Error::malformed_record(index, format!("missing `{}`", key))),
    }
}
