//! Conversion of serde data into [`Value`].
//!
//! The serializer here does not write a querystring itself. It normalizes
//! whatever shape a `Serialize` implementation describes into the closed
//! [`Value`] variant, which the flattener then walks.

pub(crate) mod encode;
mod key;

use serde::ser;

use crate::error::*;
use crate::field::FieldDescriptor;
use crate::value::{FieldSpec, Record, RecordSchema, Ref, Scalar, Value};

use key::KeySerializer;

/// Converts any `Serialize` value into a [`Value`].
///
/// Struct fields are keyed by their serde name, which is read as a
/// serialization annotation: `#[serde(rename = "extra,omitempty")]`
/// renames the field to `extra` and elides it when empty, and
/// `#[serde(rename = "-")]` drops it.
///
/// The declared field name is not visible through serde, so an annotation
/// with an empty name segment such as `",omitempty"` keeps the whole key as
/// the field name; rename the field explicitly instead (`"page,omitempty"`).
///
/// ```
/// # use serde::Serialize;
/// use url_values::{Value, to_value};
///
/// #[derive(Serialize)]
/// struct Query {
///     nested: bool,
///     page: Option<i64>,
/// }
///
/// let value = to_value(&Query { nested: true, page: None }).unwrap();
/// let Value::Record(record) = value else { panic!("not a record") };
/// let names: Vec<_> = record.fields().map(|(f, _)| f.descriptor.output_name.clone()).collect();
/// assert_eq!(names, ["nested", "page"]);
/// ```
pub fn to_value<T: ser::Serialize + ?Sized>(input: &T) -> Result<Value> {
    input.serialize(ValueSerializer)
}

/// A serde serializer producing [`Value`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueSerializer;

macro_rules! serialize_scalar {
    (
        $($ty:ty => $meth:ident,)*) => {
        $(
            fn $meth(self, v: $ty) -> Result<Self::Ok> {
                Ok(Value::from(v))
            }
        )*
    };
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantBuilder<SeqBuilder>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = VariantBuilder<RecordBuilder>;

    serialize_scalar! {
        bool => serialize_bool,
        u8  => serialize_u8,
        u16 => serialize_u16,
        u32 => serialize_u32,
        u64 => serialize_u64,
        i8  => serialize_i8,
        i16 => serialize_i16,
        i32 => serialize_i32,
        i64 => serialize_i64,
        f32 => serialize_f32,
        f64 => serialize_f64,
        char => serialize_char,
        &str => serialize_str,
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok> {
        let mut buffer = itoa::Buffer::new();
        Ok(Value::from(buffer.format(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok> {
        let mut buffer = itoa::Buffer::new();
        Ok(Value::from(buffer.format(v)))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Self::Ok> {
        Ok(Value::from(String::from_utf8_lossy(value).into_owned()))
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(Value::Scalar(Scalar::Unit))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(Value::Scalar(Scalar::Unit))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + ser::Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + ser::Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        Ok(tagged(variant, value.serialize(self)?))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(Value::nil())
    }

    fn serialize_some<T: ?Sized + ser::Serialize>(self, value: &T) -> Result<Self::Ok> {
        Ok(Value::Ref(Ref::Boxed(Box::new(value.serialize(self)?))))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqBuilder::with_capacity(len.unwrap_or_default()))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(SeqBuilder::with_capacity(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SeqBuilder::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(VariantBuilder {
            variant,
            inner: SeqBuilder::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or_default()),
            key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(RecordBuilder::new(name, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(VariantBuilder {
            variant,
            inner: RecordBuilder::new(name, len),
        })
    }
}

/// Enum variants carrying data become a single-entry map keyed by the
/// variant name.
fn tagged(variant: &'static str, value: Value) -> Value {
    Value::Map(vec![(Scalar::from(variant), value)])
}

#[doc(hidden)]
pub struct SeqBuilder {
    items: Vec<Value>,
}

impl SeqBuilder {
    fn with_capacity(len: usize) -> Self {
        Self {
            items: Vec::with_capacity(len),
        }
    }

    fn push<T: ser::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Seq(self.items))
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Seq(self.items))
    }
}

#[doc(hidden)]
pub struct RecordBuilder {
    name: &'static str,
    fields: Vec<FieldSpec>,
    values: Vec<Value>,
}

impl RecordBuilder {
    fn new(name: &'static str, len: usize) -> Self {
        Self {
            name,
            fields: Vec::with_capacity(len),
            values: Vec::with_capacity(len),
        }
    }

    fn field<T: ser::Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        let descriptor = FieldDescriptor::from_key(key);
        // ignored fields are never visited, so skip converting them
        let value = if descriptor.ignore {
            Value::nil()
        } else {
            value.serialize(ValueSerializer)?
        };
        self.fields.push(FieldSpec {
            declared: key.into(),
            descriptor,
            exported: true,
        });
        self.values.push(value);
        Ok(())
    }

    fn finish(self) -> Value {
        let schema = RecordSchema::from_specs(self.name, self.fields);
        Value::Record(Record::new(schema, self.values))
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.finish())
    }
}

#[doc(hidden)]
pub struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl ser::SerializeTupleVariant for VariantBuilder<SeqBuilder> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.inner.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(tagged(self.variant, Value::Seq(self.inner.items)))
    }
}

impl ser::SerializeStructVariant for VariantBuilder<RecordBuilder> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.inner.field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(tagged(self.variant, self.inner.finish()))
    }
}

#[doc(hidden)]
pub struct MapBuilder {
    entries: Vec<(Scalar, Value)>,
    key: Option<Scalar>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        let Some(key) = self.key.take() else {
            return Err(Error::Custom(
                "serialize_value called before serialize_key".to_string(),
            ));
        };
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Map(self.entries))
    }
}
