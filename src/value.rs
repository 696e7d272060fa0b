use crate::statics;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A JSON number that preserves the distinction between I64, U64, and F64 for
/// round-tripping. A field loaded as an integer must save back as an integer
/// even when its textual form would also parse as a decimal.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl DocNumber {
    pub fn is_finite(&self) -> bool {
        match self {
            DocNumber::I64(_) | DocNumber::U64(_) => true,
            DocNumber::F64(v) => v.is_finite(),
        }
    }

    /// The textual form shown in an editable field. Integers print plainly;
    /// floats use ryu's shortest lossless form, so an unedited number never
    /// gains or loses insignificant trailing zeros.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    fn write_json(&self, out: &mut String) {
        match self {
            DocNumber::I64(v) => out.push_str(&v.to_string()),
            DocNumber::U64(v) => out.push_str(&v.to_string()),
            DocNumber::F64(v) => {
                if v.is_finite() {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format_finite(*v));
                } else {
                    // Strict JSON has no non-finite literals; parsing can never
                    // produce one, so this only guards programmatic values.
                    out.push_str(statics::EN_LITERAL_NULL);
                }
            }
        }
    }
}

impl Serialize for DocNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocNumber::I64(v) => serializer.serialize_i64(*v),
            DocNumber::U64(v) => serializer.serialize_u64(*v),
            DocNumber::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for DocNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = DocNumber;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(DocNumber::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(DocNumber::U64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(DocNumber::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A decoded JSON value. The tag assigned at load time is preserved through
/// every edit of that key until the file is reloaded.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Number(DocNumber),
    String(String),
    Array(Vec<DocValue>),
    Object(IndexMap<String, DocValue>),
}

impl DocValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, DocValue>> {
        match self {
            DocValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<IndexMap<String, DocValue>> {
        match self {
            DocValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DocValue::Null => "null",
            DocValue::Bool(_) => "bool",
            DocValue::Number(_) => "number",
            DocValue::String(_) => "string",
            DocValue::Array(_) => "array",
            DocValue::Object(_) => "object",
        }
    }

    /// Strict JSON parse. Errors carry serde_json's line/column message,
    /// which the GUI shows to the user verbatim.
    pub fn parse_json(text: &str) -> anyhow::Result<DocValue> {
        Ok(serde_json::from_str::<DocValue>(text)?)
    }

    pub fn to_pretty(&self) -> String {
        self.to_pretty_with_newline(statics::NL_LF)
    }

    /// Serialize with 2-space indentation and quoted keys, matching the
    /// output style of the original files this editor works on. No trailing
    /// newline; the newline style within the document is a parameter.
    pub fn to_pretty_with_newline(&self, newline: &str) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, true, newline);
        out
    }

    pub fn to_compact(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, false, statics::NL_LF);
        out
    }

    fn write_json(&self, out: &mut String, indent: usize, pretty: bool, newline: &str) {
        match self {
            DocValue::Null => out.push_str(statics::EN_LITERAL_NULL),
            DocValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            DocValue::Number(n) => n.write_json(out),
            DocValue::String(s) => write_escaped_string(out, s),
            DocValue::Array(values) => {
                out.push('[');
                if pretty && !values.is_empty() {
                    out.push_str(newline);
                }
                for (i, v) in values.iter().enumerate() {
                    if pretty {
                        out.push_str(&" ".repeat(indent + 2));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    v.write_json(out, indent + 2, pretty, newline);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push_str(newline);
                    }
                }
                if pretty && !values.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            DocValue::Object(map) => {
                out.push('{');
                if pretty && !map.is_empty() {
                    out.push_str(newline);
                }
                for (i, (k, v)) in map.iter().enumerate() {
                    if pretty {
                        out.push_str(&" ".repeat(indent + 2));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    write_escaped_string(out, k);
                    out.push(':');
                    if pretty {
                        out.push(' ');
                    }
                    v.write_json(out, indent + 2, pretty, newline);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push_str(newline);
                    }
                }
                if pretty && !map.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocValue::Null => serializer.serialize_unit(),
            DocValue::Bool(v) => serializer.serialize_bool(*v),
            DocValue::Number(n) => n.serialize(serializer),
            DocValue::String(s) => serializer.serialize_str(s),
            DocValue::Array(values) => values.serialize(serializer),
            DocValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DocValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = DocValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(DocValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(DocValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(DocValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(DocValue::Number(DocNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(DocValue::Number(DocNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(DocValue::Number(DocNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DocValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(DocValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<DocValue>()? {
                    values.push(value);
                }
                Ok(DocValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, DocValue>()? {
                    values.insert(key, value);
                }
                Ok(DocValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocNumber, DocValue};
    use indexmap::IndexMap;

    #[test]
    fn parse_json_preserves_number_tags() {
        let v = DocValue::parse_json(r#"{"a": 42, "b": 3.14, "c": 18446744073709551615}"#).unwrap();
        let obj = v.as_object().unwrap();

        assert_eq!(obj.get("a"), Some(&DocValue::Number(DocNumber::I64(42))));
        assert_eq!(obj.get("b"), Some(&DocValue::Number(DocNumber::F64(3.14))));
        assert_eq!(
            obj.get("c"),
            Some(&DocValue::Number(DocNumber::U64(u64::MAX)))
        );
    }

    #[test]
    fn parse_json_preserves_key_order() {
        let v = DocValue::parse_json(r#"{"zulu": 1, "alpha": 2, "mike": 3}"#).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn parse_json_rejects_invalid_input() {
        assert!(DocValue::parse_json("{ not json").is_err());
        assert!(DocValue::parse_json("").is_err());
    }

    #[test]
    fn number_text_is_shortest_lossless_form() {
        assert_eq!(DocNumber::F64(3.14).to_text(), "3.14");
        assert_eq!(DocNumber::F64(1.0).to_text(), "1.0");
        assert_eq!(DocNumber::I64(-7).to_text(), "-7");
        assert_eq!(DocNumber::U64(u64::MAX).to_text(), "18446744073709551615");
    }

    #[test]
    fn pretty_writer_uses_two_space_indent() {
        let v = DocValue::parse_json(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        assert_eq!(
            v.to_pretty(),
            "{\n  \"a\": 1,\n  \"b\": [\n    true,\n    null\n  ]\n}"
        );
    }

    #[test]
    fn pretty_writer_honors_newline_parameter() {
        let v = DocValue::parse_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(
            v.to_pretty_with_newline(crate::statics::NL_CRLF),
            "{\r\n  \"a\": 1\r\n}"
        );
    }

    #[test]
    fn empty_containers_stay_inline() {
        assert_eq!(DocValue::Object(IndexMap::new()).to_pretty(), "{}");
        assert_eq!(DocValue::Array(Vec::new()).to_pretty(), "[]");
    }

    #[test]
    fn strings_escape_quotes_and_control_characters() {
        let v = DocValue::String("a\"b\\c\n\u{0001}".to_string());
        assert_eq!(v.to_compact(), "\"a\\\"b\\\\c\\n\\u0001\"");
    }

    #[test]
    fn compact_and_pretty_roundtrip_through_the_parser() {
        let text = r#"{"a": true, "b": 42, "c": 3.14, "d": "hello", "e": null}"#;
        let v = DocValue::parse_json(text).unwrap();

        assert_eq!(DocValue::parse_json(&v.to_compact()).unwrap(), v);
        assert_eq!(DocValue::parse_json(&v.to_pretty()).unwrap(), v);
    }
}
