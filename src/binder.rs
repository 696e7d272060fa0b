//! Maps each top-level field of a loaded document to a form control and
//! applies user edits back into the attribute mapping with the original JSON
//! type reconstructed.

use crate::value::{DocNumber, DocValue};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("field \"{key}\" contained a value of unexpected type {type_name}")]
    UnsupportedValue { key: String, type_name: String },
}

/// How one field is presented and edited. One case per supported JSON value
/// kind; anything unbindable becomes a [`BindError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldControl {
    /// The literal text "null"; not editable.
    Null,
    /// Checkbox bound to a boolean.
    Toggle { checked: bool },
    /// Single-line text restricted to an integer.
    Integer { buffer: String },
    /// Single-line text restricted to a decimal number.
    Decimal { buffer: String },
    /// Free-form single-line text.
    Text { buffer: String },
    /// Read-only pretty-printed object or array.
    Structured { rendered: String },
}

/// The live association between one mapping entry and its on-screen control.
/// Created when a file is rendered, dropped when a new file is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub key: String,
    pub control: FieldControl,
}

impl FieldBinding {
    pub fn for_value(key: &str, value: &DocValue) -> Result<Self, BindError> {
        let control = match value {
            DocValue::Null => FieldControl::Null,
            DocValue::Bool(b) => FieldControl::Toggle { checked: *b },
            DocValue::Number(n @ (DocNumber::I64(_) | DocNumber::U64(_))) => {
                FieldControl::Integer { buffer: n.to_text() }
            }
            DocValue::Number(n @ DocNumber::F64(_)) if n.is_finite() => {
                FieldControl::Decimal { buffer: n.to_text() }
            }
            DocValue::Number(DocNumber::F64(_)) => {
                // Strict JSON cannot round-trip NaN/Infinity, so there is no
                // control that could edit one.
                return Err(BindError::UnsupportedValue {
                    key: key.to_string(),
                    type_name: "non-finite number".to_string(),
                });
            }
            DocValue::String(s) => FieldControl::Text { buffer: s.clone() },
            DocValue::Array(_) | DocValue::Object(_) => FieldControl::Structured {
                rendered: value.to_pretty(),
            },
        };

        Ok(Self {
            key: key.to_string(),
            control,
        })
    }

    /// Accept an edited text buffer and produce the value to store under
    /// `self.key`, or None when the mapping must be left unchanged (the field
    /// is not text-editable, or the filtered text does not parse yet).
    pub fn accept_edit(&mut self, next: &str) -> Option<DocValue> {
        self.control.accept_edit(next)
    }
}

impl FieldControl {
    /// Current text of an editable text field, if this control has one.
    pub fn text_buffer(&self) -> Option<&str> {
        match self {
            FieldControl::Integer { buffer }
            | FieldControl::Decimal { buffer }
            | FieldControl::Text { buffer } => Some(buffer),
            _ => None,
        }
    }

    pub fn accept_edit(&mut self, next: &str) -> Option<DocValue> {
        match self {
            FieldControl::Text { buffer } => {
                if next == buffer {
                    return None;
                }
                // Strings take the raw text verbatim.
                *buffer = next.to_string();
                Some(DocValue::String(buffer.clone()))
            }
            FieldControl::Integer { buffer } => {
                let filtered = filter_edit(buffer, next, CharRule::Integer);
                // A fully-rejected edit is not a change event.
                if filtered == *buffer {
                    return None;
                }
                *buffer = filtered;
                parse_integer(buffer).map(DocValue::Number)
            }
            FieldControl::Decimal { buffer } => {
                let filtered = filter_edit(buffer, next, CharRule::Decimal);
                if filtered == *buffer {
                    return None;
                }
                *buffer = filtered;
                buffer
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| DocValue::Number(DocNumber::F64(v)))
            }
            // Null, toggles, and structured views have no text edit path.
            _ => None,
        }
    }
}

/// Build bindings for every field of the mapping, in insertion order. Fields
/// whose values cannot be bound are skipped and reported; the rest still
/// bind, so one bad field never hides the others.
pub fn bind_object(fields: &IndexMap<String, DocValue>) -> (Vec<FieldBinding>, Vec<BindError>) {
    let mut bindings = Vec::with_capacity(fields.len());
    let mut errors = Vec::new();

    for (key, value) in fields {
        match FieldBinding::for_value(key, value) {
            Ok(binding) => bindings.push(binding),
            Err(e) => errors.push(e),
        }
    }

    (bindings, errors)
}

#[derive(Clone, Copy)]
enum CharRule {
    /// Digits only.
    Integer,
    /// Digits plus at most one decimal point in the whole field.
    Decimal,
}

/// Emulates per-keystroke input filtering over a whole-buffer replacement:
/// the span of inserted characters is found by diffing `next` against `prev`,
/// and each inserted character is kept only if the rule admits it. Deletions
/// always pass through, and pre-existing characters (a loaded minus sign or
/// exponent) are never stripped.
fn filter_edit(prev: &str, next: &str, rule: CharRule) -> String {
    let (prefix, inserted, suffix) = split_insertion(prev, next);

    let mut out = String::with_capacity(next.len());
    out.push_str(prefix);

    let mut has_point = prefix.contains('.') || suffix.contains('.');
    for c in inserted.chars() {
        let keep = match rule {
            CharRule::Integer => c.is_ascii_digit(),
            CharRule::Decimal => {
                if c.is_ascii_digit() {
                    true
                } else if c == '.' && !has_point {
                    has_point = true;
                    true
                } else {
                    false
                }
            }
        };
        if keep {
            out.push(c);
        }
    }

    out.push_str(suffix);
    out
}

/// Splits `next` into (unchanged prefix, inserted span, unchanged suffix)
/// relative to `prev`, on char boundaries.
fn split_insertion<'a>(prev: &str, next: &'a str) -> (&'a str, &'a str, &'a str) {
    let prefix_len = prev
        .char_indices()
        .zip(next.char_indices())
        .find(|((_, a), (_, b))| a != b)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| prev.len().min(next.len()));

    let prev_rest = &prev[prefix_len..];
    let next_rest = &next[prefix_len..];
    let suffix_len = prev_rest
        .chars()
        .rev()
        .zip(next_rest.chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum::<usize>();

    let end = next.len() - suffix_len;
    (&next[..prefix_len], &next[prefix_len..end], &next[end..])
}

fn parse_integer(text: &str) -> Option<DocNumber> {
    if let Ok(v) = text.parse::<i64>() {
        return Some(DocNumber::I64(v));
    }
    // Magnitudes above i64::MAX keep their unsigned tag.
    text.parse::<u64>().ok().map(DocNumber::U64)
}
