//! The recursive flattener.
//!
//! Each shape reports back to its caller in one of three ways:
//! expanded into its own keys ([`Flattened::Values`]), a bare scalar the
//! caller must name ([`Flattened::Scalar`]), or nothing at all
//! ([`Flattened::Absent`]). The caller owns key naming and elision:
//!
//! * record fields are keyed by their output name; scalars are elided
//!   only when the field is `omitempty` and the value is blank or zero
//! * map entries are keyed by the stringified map key; blank scalars are
//!   always elided, zero numbers are kept
//! * sequence elements are keyed by index; nested elements are packed
//!   into a single encoded value, blank and empty elements are dropped
//!
//! Nested keys are joined with `.`, e.g. `logo.dimension.extra.shade`.

use tracing::{debug, trace};

use crate::error::*;
use crate::ser::encode::Encoding;
use crate::value::{Record, Ref, Scalar, SharedValue, Value};
use crate::values::UrlValues;

/// The outcome of flattening a single value.
#[derive(Clone, Debug, PartialEq)]
pub enum Flattened {
    /// The value expanded into its own keys.
    Values(UrlValues),
    /// The value is a scalar; the caller decides under which key to
    /// store it.
    Scalar(Scalar),
    /// The value is a nil reference or has no data representation, and
    /// contributes nothing.
    Absent,
}

pub(crate) struct Flattener {
    encoding: Encoding,
    /// Identities of shared values on the current descent path.
    visiting: Vec<usize>,
}

impl Flattener {
    pub(crate) fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            visiting: Vec::new(),
        }
    }

    /// Flattens the outer-most value, where a nil or unsupported value is
    /// an error rather than an absence.
    pub(crate) fn root(&mut self, value: &Value) -> Result<Flattened> {
        match value {
            Value::Ref(Ref::Nil) => Err(Error::invalid("nil root value")),
            Value::Unsupported(kind) => Err(Error::invalid(format_args!(
                "unsupported root value of kind {kind}"
            ))),
            Value::Ref(Ref::Boxed(inner)) => self.root(inner),
            Value::Ref(Ref::Shared(shared)) => self.enter(shared, Self::root),
            other => self.visit(other),
        }
    }

    fn visit(&mut self, value: &Value) -> Result<Flattened> {
        match value {
            Value::Record(record) => self.record(record).map(Flattened::Values),
            Value::Map(entries) => self.map(entries).map(Flattened::Values),
            Value::Seq(items) => self.seq(items).map(Flattened::Values),
            Value::Ref(Ref::Nil) => Ok(Flattened::Absent),
            Value::Ref(Ref::Boxed(inner)) => self.visit(inner),
            Value::Ref(Ref::Shared(shared)) => self.enter(shared, Self::visit),
            Value::Scalar(scalar) => Ok(Flattened::Scalar(scalar.clone())),
            Value::Unsupported(kind) => {
                debug!(kind, "skipping value with no data representation");
                Ok(Flattened::Absent)
            }
        }
    }

    /// Descends into a shared value, failing if it is already being
    /// flattened further up the path.
    fn enter(
        &mut self,
        shared: &SharedValue,
        f: fn(&mut Self, &Value) -> Result<Flattened>,
    ) -> Result<Flattened> {
        let id = shared.identity();
        if self.visiting.contains(&id) {
            debug!(depth = self.visiting.len(), "shared value refers back to itself");
            return Err(Error::CyclicValue);
        }
        let value = shared
            .cell()
            .try_borrow()
            .map_err(|_| Error::invalid("shared value is mutably borrowed"))?;

        self.visiting.push(id);
        let result = f(self, &value);
        self.visiting.pop();
        result
    }

    fn record(&mut self, record: &Record) -> Result<UrlValues> {
        let mut out = UrlValues::new();
        for (field, value) in record.fields() {
            if !field.exported {
                trace!(field = %field.declared, "skipping private field");
                continue;
            }
            let descriptor = &field.descriptor;
            if descriptor.ignore {
                continue;
            }

            match self.visit(value)? {
                Flattened::Absent => {}
                Flattened::Scalar(scalar) => {
                    if descriptor.omit_empty && scalar.is_empty() {
                        trace!(field = %descriptor.output_name, "omitting empty field");
                        continue;
                    }
                    out.add(&*descriptor.output_name, scalar.to_text());
                }
                Flattened::Values(nested) => out.extend_prefixed(&descriptor.output_name, nested),
            }
        }
        Ok(out)
    }

    fn map(&mut self, entries: &[(Scalar, Value)]) -> Result<UrlValues> {
        // entries that collide on a dotted key must merge in key order,
        // not in the container's iteration order
        let mut entries: Vec<_> = entries
            .iter()
            .map(|(key, value)| (key.to_text(), value))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut out = UrlValues::new();
        for (key, value) in entries {
            match self.visit(value)? {
                Flattened::Absent => {}
                Flattened::Scalar(scalar) => {
                    if !scalar.is_blank() {
                        out.add(key, scalar.to_text());
                    }
                }
                Flattened::Values(nested) => out.extend_prefixed(&key, nested),
            }
        }
        Ok(out)
    }

    fn seq(&mut self, items: &[Value]) -> Result<UrlValues> {
        let mut out = UrlValues::new();
        let mut index = itoa::Buffer::new();
        for (i, item) in items.iter().enumerate() {
            match self.visit(item)? {
                Flattened::Absent => {}
                Flattened::Scalar(scalar) => {
                    if !scalar.is_blank() {
                        out.add(index.format(i), scalar.to_text());
                    }
                }
                // each nested element packs into one value, e.g. `0=logo.url%3D...`
                Flattened::Values(nested) => {
                    if !nested.is_empty() {
                        out.add(index.format(i), nested.encode_with(self.encoding));
                    }
                }
            }
        }
        Ok(out)
    }
}
