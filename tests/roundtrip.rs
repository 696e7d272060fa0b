use jsonform::{DocNumber, DocValue, LoadedDoc, bind_object};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn roundtrip_unmodified_bytes_identical() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.json");

    // One of each supported scalar type, plus structured values, in a
    // formatting style the serializer would not itself produce.
    let input = r#"{
    "a": true,
    "b":42,
    "c": 3.14,
    "d": "hello",
    "e": null,
    "obj": {"x": 1, "y": [1, 2]}
}
"#;

    std::fs::write(&path, input.as_bytes())?;

    let doc = LoadedDoc::load_path(&path)?;
    assert!(!doc.dirty);
    assert_eq!(doc.save_bytes(), input.as_bytes());
    Ok(())
}

#[test]
fn roundtrip_preserves_key_order_and_types() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.json");

    std::fs::write(
        &path,
        br#"{"zulu": 1, "alpha": 3.5, "mike": "m", "flag": false, "gap": null}"#,
    )?;

    let mut doc = LoadedDoc::load_path(&path)?;
    doc.mark_dirty();

    let out_path = dir.path().join("out.json");
    doc.save_to_path(&out_path)?;

    let reloaded = LoadedDoc::load_path(&out_path)?;
    let keys: Vec<&str> = reloaded.fields.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zulu", "alpha", "mike", "flag", "gap"]);

    assert_eq!(
        reloaded.fields.get("zulu"),
        Some(&DocValue::Number(DocNumber::I64(1)))
    );
    assert_eq!(
        reloaded.fields.get("alpha"),
        Some(&DocValue::Number(DocNumber::F64(3.5)))
    );
    assert_eq!(reloaded.fields.get("gap"), Some(&DocValue::Null));
    Ok(())
}

#[test]
fn structured_value_survives_attempted_edit() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.json");

    std::fs::write(&path, br#"{"obj": {"x": 1, "y": [1, 2]}}"#)?;

    let mut doc = LoadedDoc::load_path(&path)?;
    let (mut bindings, errors) = bind_object(&doc.fields);
    assert!(errors.is_empty());
    assert_eq!(bindings.len(), 1);

    // The structured view is read-only; an attempted edit produces no
    // write-back and the mapping stays untouched.
    assert_eq!(bindings[0].accept_edit("{\"x\": 99}"), None);

    let out_path = dir.path().join("out.json");
    doc.save_to_path(&out_path)?;

    let reloaded = LoadedDoc::load_path(&out_path)?;
    let expected = DocValue::parse_json(r#"{"x": 1, "y": [1, 2]}"#)?;
    assert_eq!(reloaded.fields.get("obj"), Some(&expected));
    Ok(())
}

#[test]
fn edited_field_changes_exactly_one_line() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.json");

    // Fixture in the serializer's own format, so the diff below is exact.
    let input = "{\n  \"name\": \"widget\",\n  \"count\": 42,\n  \"ratio\": 3.14,\n  \"enabled\": false\n}";
    std::fs::write(&path, input.as_bytes())?;

    let mut doc = LoadedDoc::load_path(&path)?;
    let (mut bindings, _) = bind_object(&doc.fields);

    let count = bindings
        .iter_mut()
        .find(|b| b.key == "count")
        .expect("count binding");
    let value = count.accept_edit("427").expect("parses");
    doc.fields.insert(count.key.clone(), value);
    doc.mark_dirty();

    let out = String::from_utf8(doc.save_bytes())?;
    assert_eq!(out.lines().count(), input.lines().count());

    let changed: Vec<(&str, &str)> = input
        .lines()
        .zip(out.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(changed, vec![("  \"count\": 42,", "  \"count\": 427,")]);
    Ok(())
}

#[test]
fn dirty_save_is_valid_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.json");

    std::fs::write(&path, br#"{"a": 1, "b": "x\n\"quoted\""}"#)?;
    let mut doc = LoadedDoc::load_path(&path)?;
    doc.fields
        .insert("a".to_string(), DocValue::Number(DocNumber::F64(2.5)));
    doc.mark_dirty();

    let out = doc.save_bytes();
    let _parsed = DocValue::parse_json(std::str::from_utf8(&out)?)?;
    Ok(())
}
