//! The shapes a value can take while it is being flattened.
//!
//! Every input is normalized into [`Value`] before traversal, either by
//! building one directly or through the serde bridge in [`crate::to_value`].
//! The set of shapes is closed: records, maps, sequences, optional
//! references and scalars, plus a marker for anything that cannot carry
//! query parameters.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

use crate::field::{FieldDescriptor, is_private};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Record(Record),
    Map(Vec<(Scalar, Value)>),
    Seq(Vec<Value>),
    Ref(Ref),
    Scalar(Scalar),
    /// A shape with no data representation, named by its kind
    /// (e.g. `"function"` or `"channel"`).
    Unsupported(&'static str),
}

impl Value {
    /// Short name of the shape, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Record(_) => "record",
            Value::Map(_) => "map",
            Value::Seq(_) => "sequence",
            Value::Ref(Ref::Nil) => "nil",
            Value::Ref(_) => "reference",
            Value::Scalar(_) => "scalar",
            Value::Unsupported(kind) => *kind,
        }
    }

    pub fn nil() -> Self {
        Value::Ref(Ref::Nil)
    }

    /// Wraps `value` in a shared reference that other parts of the
    /// graph may also point at.
    pub fn shared(value: Value) -> Self {
        Value::Ref(Ref::Shared(SharedValue::new(value)))
    }
}

/// An optional reference to another value.
#[derive(Clone, Debug, PartialEq)]
pub enum Ref {
    Nil,
    Boxed(Box<Value>),
    Shared(SharedValue),
}

/// A reference-counted value with a stable identity.
///
/// Cloning a `SharedValue` yields another handle to the same value; this
/// is how a value graph can contain the same node twice, or itself.
#[derive(Clone, Default)]
pub struct SharedValue(Rc<RefCell<Value>>);

impl SharedValue {
    pub fn new(value: Value) -> Self {
        SharedValue(Rc::new(RefCell::new(value)))
    }

    /// Replaces the referenced value, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if the value is currently borrowed.
    pub fn replace(&self, value: Value) -> Value {
        self.0.replace(value)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn cell(&self) -> &RefCell<Value> {
        &self.0
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::nil()
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedValue({:#x})", self.identity())
    }
}

/// A leaf value with a single textual form.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
}

impl Scalar {
    /// The textual form the scalar takes in a query string.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Unit => Cow::Borrowed(""),
            Scalar::Bool(true) => Cow::Borrowed("true"),
            Scalar::Bool(false) => Cow::Borrowed("false"),
            Scalar::Int(v) => Cow::Owned(itoa::Buffer::new().format(*v).to_owned()),
            Scalar::UInt(v) => Cow::Owned(itoa::Buffer::new().format(*v).to_owned()),
            Scalar::Float(v) => Cow::Owned(ryu::Buffer::new().format(*v).to_owned()),
            Scalar::Char(c) => Cow::Owned(c.to_string()),
            Scalar::Str(s) => Cow::Borrowed(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Field layout of a record type: declared names and their resolved
/// descriptors, computed once and shared by every record of that type.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
    name: Cow<'static, str>,
    fields: Vec<FieldSpec>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub declared: Cow<'static, str>,
    pub descriptor: FieldDescriptor,
    /// `false` for fields hidden by naming convention.
    pub exported: bool,
}

impl RecordSchema {
    /// Builds a schema from `(declared name, annotation)` pairs in
    /// declaration order.
    ///
    /// ```
    /// use url_values::RecordSchema;
    ///
    /// let schema = RecordSchema::new("Dimension", [
    ///     ("Width", Some("width")),
    ///     ("Height", Some("height")),
    ///     ("Extra", Some("extra,omitempty")),
    ///     ("cache", None),
    /// ]);
    /// assert_eq!(schema.len(), 4);
    /// assert!(!schema.fields()[3].exported);
    /// ```
    pub fn new<I>(name: impl Into<Cow<'static, str>>, fields: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (&'static str, Option<&'static str>)>,
    {
        let fields = fields
            .into_iter()
            .map(|(declared, annotation)| FieldSpec {
                declared: Cow::Borrowed(declared),
                descriptor: FieldDescriptor::resolve(declared, annotation),
                exported: !is_private(declared),
            })
            .collect();
        Arc::new(Self {
            name: name.into(),
            fields,
        })
    }

    pub(crate) fn from_specs(name: &'static str, fields: Vec<FieldSpec>) -> Arc<Self> {
        Arc::new(Self {
            name: Cow::Borrowed(name),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record value: a schema plus one value per schema field.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl Record {
    /// Pairs `values` with the fields of `schema`.
    ///
    /// Missing trailing values are filled with nil references; surplus
    /// values are dropped. Either mismatch is logged at `debug`.
    pub fn new(schema: Arc<RecordSchema>, values: impl IntoIterator<Item = Value>) -> Self {
        let mut values: Vec<Value> = values.into_iter().collect();
        if values.len() != schema.len() {
            debug!(
                record = %schema.name,
                fields = schema.len(),
                values = values.len(),
                "record values do not match its schema"
            );
        }
        values.truncate(schema.len());
        values.resize_with(schema.len(), Value::nil);
        Self { schema, values }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldSpec, &Value)> {
        self.schema.fields.iter().zip(&self.values)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident as $cast:ty,)*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v as $cast)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_from! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    isize => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    usize => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<char> for Scalar {
    fn from(v: char) -> Self {
        Scalar::Char(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Value::Ref(Ref::Boxed(Box::new(v.into()))),
            None => Value::nil(),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl From<SharedValue> for Value {
    fn from(v: SharedValue) -> Self {
        Value::Ref(Ref::Shared(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_text() {
        assert_eq!(Scalar::Int(-42).to_text(), "-42");
        assert_eq!(Scalar::UInt(120).to_text(), "120");
        assert_eq!(Scalar::Float(1.5).to_text(), "1.5");
        assert_eq!(Scalar::Bool(false).to_text(), "false");
        assert_eq!(Scalar::Char('x').to_text(), "x");
        assert_eq!(Scalar::Unit.to_text(), "");
        assert_eq!(Scalar::from("45%").to_string(), "45%");
    }

    #[test]
    fn record_pads_missing_values() {
        let schema = RecordSchema::new("Query", [("Nested", None), ("Page", None)]);
        let record = Record::new(schema, [Value::from(true)]);
        let values: Vec<_> = record.fields().map(|(_, v)| v.clone()).collect();
        assert_eq!(values, vec![Value::from(true), Value::nil()]);
    }

    #[test]
    fn record_drops_surplus_values() {
        let schema = RecordSchema::new("Query", [("Nested", None)]);
        let record = Record::new(schema, [Value::from(true), Value::from(2)]);
        assert_eq!(record.fields().count(), 1);
        assert_eq!(record.fields().next().map(|(_, v)| v), Some(&Value::from(true)));
    }

    #[test]
    fn shared_values_compare_by_identity() {
        let a = SharedValue::new(Value::from(1));
        let b = SharedValue::new(Value::from(1));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn option_becomes_reference() {
        assert_eq!(Value::from(None::<i32>), Value::nil());
        assert_eq!(
            Value::from(Some("x")),
            Value::Ref(Ref::Boxed(Box::new(Value::from("x"))))
        );
    }
}
