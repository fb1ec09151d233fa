use std::io::Write;

use serde::ser;

use crate::error::{Error, Result};
use crate::flatten::{Flattened, Flattener};
use crate::ser::encode::Encoding;
use crate::value::Value;
use crate::values::UrlValues;

/// Configuration for flattening and encoding.
///
/// The only setting is the percent-encoding used when packing sequence
/// elements and when writing the final querystring. The default,
/// [`Encoding::Query`], escapes everything but unreserved characters.
///
/// ```
/// use std::collections::BTreeMap;
/// use url_values::{Config, Encoding};
///
/// let map: BTreeMap<&str, &str> = [("site", "https://x/a b")].into_iter().collect();
///
/// let config = Config::new();
/// assert_eq!(config.serialize_string(&map).unwrap(), "site=https%3A%2F%2Fx%2Fa+b");
///
/// let config = Config::new().encoding(Encoding::Minimal);
/// assert_eq!(config.serialize_string(&map).unwrap(), "site=https://x/a+b");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    encoding: Encoding,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            encoding: Encoding::Query,
        }
    }

    /// Sets the percent-encoding. Default is [`Encoding::Query`].
    pub const fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Flattens a value, reporting whether it expanded into keys or is a
    /// bare scalar.
    ///
    /// Fails with [`Error::InvalidValue`] when the value is nil or
    /// unsupported, and with [`Error::CyclicValue`] when a shared value
    /// refers back to itself.
    pub fn flatten(self, value: &Value) -> Result<Flattened> {
        Flattener::new(self.encoding).root(value)
    }

    /// Flattens a value into query values.
    ///
    /// Unlike [`Config::flatten`], a bare scalar at the root is rejected
    /// since there is no key to store it under.
    pub fn flatten_value(self, value: &Value) -> Result<UrlValues> {
        match self.flatten(value)? {
            Flattened::Values(values) => Ok(values),
            Flattened::Scalar(scalar) => Err(Error::invalid(format_args!(
                "cannot flatten a bare scalar ({scalar:?}) at the root"
            ))),
            Flattened::Absent => Err(Error::invalid("root value has no data")),
        }
    }

    /// Converts a `Serialize` value and flattens it into query values.
    pub fn to_url_values<T: ser::Serialize + ?Sized>(self, input: &T) -> Result<UrlValues> {
        let value = crate::to_value(input)?;
        self.flatten_value(&value)
    }

    /// Serializes an object to a querystring using this `Config`.
    pub fn serialize_string<T: ser::Serialize + ?Sized>(self, input: &T) -> Result<String> {
        Ok(self.to_url_values(input)?.encode_with(self.encoding))
    }

    /// Serializes an object to a querystring using this `Config`.
    pub fn serialize_to_writer<T: ser::Serialize + ?Sized, W: Write>(
        self,
        input: &T,
        writer: &mut W,
    ) -> Result<()> {
        let encoded = self.serialize_string(input)?;
        writer.write_all(encoded.as_bytes())?;
        Ok(())
    }
}
