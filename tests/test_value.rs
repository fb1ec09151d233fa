use std::sync::Arc;

use pretty_assertions::assert_eq;
use url_values::{
    Error, Flattened, Record, RecordSchema, Scalar, SharedValue, UrlValues, Value,
};

fn logo_schema() -> Arc<RecordSchema> {
    RecordSchema::new("Logo", [("URL", Some("url")), ("Dimensions", Some("dimension"))])
}

fn dimension_schema() -> Arc<RecordSchema> {
    RecordSchema::new(
        "Dimension",
        [
            ("Width", Some("width")),
            ("Height", Some("height")),
            ("BasicName", Some("-")),
            ("Inner", Some("-")),
            ("Extra", Some("extra,omitempty")),
        ],
    )
}

fn request_schema() -> Arc<RecordSchema> {
    RecordSchema::new(
        "Request",
        [
            ("url", Some("url")),
            ("Logo", Some("logo")),
            ("Source", Some("source")),
        ],
    )
}

fn dimension(width: i32, height: i32, shade: &str) -> Value {
    Record::new(
        dimension_schema(),
        [
            width.into(),
            height.into(),
            "flux".into(),
            Value::nil(),
            Value::Map(vec![
                (Scalar::from("zoom"), false.into()),
                (Scalar::from("shade"), shade.into()),
            ]),
        ],
    )
    .into()
}

fn request() -> Value {
    let logo = Record::new(
        logo_schema(),
        [
            Value::from("https://x/f.ico"),
            Some(dimension(100, 120, "45%")).into(),
        ],
    );
    Some(Value::from(Record::new(
        request_schema(),
        [Value::from("https://x"), Some(Value::from(logo)).into(), "https://y".into()],
    )))
    .into()
}

fn encode(value: &Value) -> String {
    url_values::flatten_value(value).expect("flatten").encode()
}

#[test]
fn nested_record() {
    // `url` is private by convention and never emitted
    assert_eq!(
        encode(&request()),
        "logo.dimension.extra.shade=45%25&logo.dimension.height=120&logo.dimension.width=100&logo.url=https%3A%2F%2Fx%2Ff.ico&source=https%3A%2F%2Fy"
    );
}

#[test]
fn copies_flatten_identically() {
    let value = request();
    let copy = value.clone();
    assert_eq!(
        url_values::flatten_value(&value).unwrap(),
        url_values::flatten_value(&copy).unwrap()
    );
    assert_eq!(encode(&value), encode(&copy));
}

#[test]
fn private_fields_ignore_annotations() {
    let schema = RecordSchema::new(
        "Account",
        [
            ("secret", Some("Secret")),
            ("token", Some("token,omitempty")),
            ("Name", None),
        ],
    );
    let record = Record::new(schema, [Value::from("s3cr3t"), "t0k3n".into(), "ada".into()]);
    assert_eq!(encode(&record.into()), "Name=ada");
}

#[test]
fn omitempty_zero_values() {
    let schema = RecordSchema::new(
        "Query",
        [
            ("Nested", Some("nested")),
            ("Page", Some("page,omitempty")),
            ("Label", Some(",omitempty")),
            ("Offset", None),
        ],
    );
    let query = |nested: bool, page: i64, label: &str, offset: u64| -> Value {
        Record::new(
            schema.clone(),
            [Value::from(nested), page.into(), label.into(), offset.into()],
        )
        .into()
    };

    assert_eq!(encode(&query(false, 0, "", 0)), "Offset=0&nested=false");
    assert_eq!(encode(&query(true, 2, "x", 1)), "Label=x&Offset=1&nested=true&page=2");
}

#[test]
fn nil_root_is_invalid() {
    let err = url_values::flatten(&Value::nil()).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)), "got: {err}");

    let err = url_values::flatten(&Value::from(None::<Value>)).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)), "got: {err}");
}

#[test]
fn unsupported_root_is_invalid() {
    for kind in ["function", "channel"] {
        let err = url_values::flatten(&Value::Unsupported(kind)).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)), "got: {err}");
        assert!(err.to_string().contains(kind));

        let shared = Value::shared(Value::Unsupported(kind));
        assert!(url_values::flatten(&shared).is_err());
    }
}

#[test]
fn scalar_root() {
    assert_eq!(
        url_values::flatten(&Value::from(7)).unwrap(),
        Flattened::Scalar(Scalar::Int(7))
    );
    let err = url_values::flatten_value(&Value::from(7)).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)), "got: {err}");
}

#[test]
fn sequence_of_records() {
    let page = RecordSchema::new("Page", [("Source", Some("source,omitempty"))]);
    let seq = Value::Seq(vec![
        Record::new(page.clone(), [Value::from("")]).into(),
        Value::nil(),
        Record::new(page, [Value::from("a b")]).into(),
        Value::Seq(vec![]),
        Value::Seq(vec![Value::from(1), Value::from(2)]),
    ]);

    let values = url_values::flatten_value(&seq).unwrap();
    let expected: UrlValues = [("2", "source=a+b"), ("4", "0=1&1=2")].into_iter().collect();
    assert_eq!(values, expected);
    assert_eq!(values.encode(), "2=source%3Da%2Bb&4=0%3D1%261%3D2");
}

#[test]
fn shared_values_without_cycles() {
    let dim = SharedValue::new(dimension(1, 2, "0%"));
    let map = Value::Map(vec![
        (Scalar::from("small"), dim.clone().into()),
        (Scalar::from("large"), dim.into()),
    ]);
    assert_eq!(
        encode(&map),
        "large.extra.shade=0%25&large.height=2&large.width=1&small.extra.shade=0%25&small.height=2&small.width=1"
    );
}

#[test]
fn cyclic_values_are_rejected() {
    let node = SharedValue::new(Value::nil());
    node.replace(Value::Map(vec![
        (Scalar::from("name"), "a".into()),
        (Scalar::from("children"), Value::Seq(vec![node.clone().into()])),
    ]));

    let err = url_values::flatten(&node.clone().into()).unwrap_err();
    assert!(matches!(err, Error::CyclicValue), "got: {err}");

    // break the cycle so the node is dropped
    node.replace(Value::nil());
}

#[test]
fn indirect_cycles_are_rejected() {
    let a = SharedValue::new(Value::nil());
    let b = SharedValue::new(Value::Map(vec![(Scalar::from("a"), a.clone().into())]));
    a.replace(Value::Map(vec![(Scalar::from("b"), b.clone().into())]));

    let root = Value::Seq(vec![b.clone().into()]);
    assert!(matches!(url_values::flatten(&root), Err(Error::CyclicValue)));

    a.replace(Value::nil());
}

#[test]
fn nested_unsupported_values_are_skipped() {
    let schema = RecordSchema::new("Handler", [("Name", None), ("OnDone", None)]);
    let map = Value::Map(vec![
        (Scalar::from("h"), Record::new(schema, ["x".into(), Value::Unsupported("function")]).into()),
        (Scalar::from("c"), Value::Unsupported("channel")),
    ]);
    assert_eq!(encode(&map), "h.Name=x");
}

#[test]
fn iterate_flattened_values() {
    let values = url_values::flatten_value(&request()).unwrap();
    let iter: url_values::Iter<'_> = values.iter();
    let keys: Vec<&str> = iter.map(|(key, _)| key).collect();
    assert_eq!(
        keys,
        [
            "logo.dimension.extra.shade",
            "logo.dimension.height",
            "logo.dimension.width",
            "logo.url",
            "source",
        ]
    );
}
