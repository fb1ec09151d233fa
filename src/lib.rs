//! Flatten nested values into URL query values
//!
//! This crate turns an arbitrary, possibly nested value into a flat,
//! multi-valued mapping of dotted keys, ready to be encoded as the query
//! string of an HTTP GET request:
//!
//! ```text
//! { "logo": { "url": "https://x/f.ico", "dimension": { "width": 100 } } }
//! ```
//!
//! becomes
//!
//! ```text
//! logo.dimension.width=100&logo.url=https%3A%2F%2Fx%2Ff.ico
//! ```
//!
//! The transform is one-directional; nothing here parses a querystring
//! back into a value.
//!
//! ## Shapes
//!
//! * **Records** (structs) expand field by field. A field is keyed by
//!   its serde name, which is read as an annotation `name[,modifier]*`:
//!   `omitempty` elides blank or zero values, `-` drops the field.
//! * **Maps** expand entry by entry, keyed by the stringified map key.
//!   Blank entries (empty strings, `false`, `None`) are dropped, zeros
//!   are kept.
//! * **Sequences** are keyed by index. Elements that expand into keys of
//!   their own are packed into a single encoded value.
//! * **Options** and other references are followed; `None` contributes
//!   nothing.
//!
//! At the top level only records, maps and sequences are accepted.
//!
//! ## Usage
//!
//! ```
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Dimension {
//!     width: u32,
//!     height: u32,
//!     #[serde(rename = "-")]
//!     basic_name: String,
//! }
//!
//! #[derive(Serialize)]
//! struct Logo {
//!     url: String,
//!     dimension: Option<Dimension>,
//! }
//!
//! #[derive(Serialize)]
//! struct Request {
//!     logo: Option<Logo>,
//!     #[serde(rename = "source,omitempty")]
//!     source: String,
//! }
//!
//! let request = Request {
//!     logo: Some(Logo {
//!         url: "https://x/f.ico".to_owned(),
//!         dimension: Some(Dimension {
//!             width: 100,
//!             height: 120,
//!             basic_name: "flux".to_owned(),
//!         }),
//!     }),
//!     source: String::new(),
//! };
//!
//! let values = url_values::to_url_values(&request).unwrap();
//! assert_eq!(values.get("logo.dimension.width"), Some("100"));
//! assert_eq!(
//!     values.encode(),
//!     "logo.dimension.height=120&logo.dimension.width=100&logo.url=https%3A%2F%2Fx%2Ff.ico"
//! );
//! ```
//!
//! Values can also be described directly with [`Value`], which is how
//! declared field names, privacy and shared or cyclic graphs are
//! expressed; see [`RecordSchema`].

mod blank;
mod config;
mod error;
mod field;
mod flatten;
mod ser;
mod value;
mod values;

#[doc(inline)]
pub use blank::{is_blank, is_empty, is_zero};
#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use field::{FieldDescriptor, is_private};
#[doc(inline)]
pub use flatten::Flattened;
#[doc(inline)]
pub use ser::encode::Encoding;
#[doc(inline)]
pub use ser::{ValueSerializer, to_value};
#[doc(inline)]
pub use value::{FieldSpec, Record, RecordSchema, Ref, Scalar, SharedValue, Value};
#[doc(inline)]
pub use values::{Iter, UrlValues};

use std::io::Write;

/// Flattens any `Serialize` value into query values.
///
/// ```
/// use std::collections::HashMap;
///
/// let map: HashMap<&str, i32> = [("uno", 1), ("zero", 0)].into_iter().collect();
/// let values = url_values::to_url_values(&map).unwrap();
/// assert_eq!(values.encode(), "uno=1&zero=0");
///
/// assert!(url_values::to_url_values(&None::<HashMap<&str, i32>>).is_err());
/// ```
pub fn to_url_values<T: serde::Serialize + ?Sized>(input: &T) -> Result<UrlValues> {
    Config::default().to_url_values(input)
}

/// Flattens a [`Value`], reporting whether it expanded into keys or is a
/// bare scalar.
pub fn flatten(value: &Value) -> Result<Flattened> {
    Config::default().flatten(value)
}

/// Flattens a [`Value`] into query values.
pub fn flatten_value(value: &Value) -> Result<UrlValues> {
    Config::default().flatten_value(value)
}

/// Serializes a value into a canonical querystring.
///
/// ```
/// # use serde::Serialize;
/// #[derive(Serialize)]
/// struct Query {
///     nested: bool,
///     #[serde(rename = "page,omitempty")]
///     page: i64,
/// }
///
/// assert_eq!(
///     url_values::to_string(&Query { nested: true, page: 0 }).unwrap(),
///     "nested=true"
/// );
/// ```
pub fn to_string<T: serde::Serialize + ?Sized>(input: &T) -> Result<String> {
    Config::default().serialize_string(input)
}

/// Serializes a value into a generic writer object.
pub fn to_writer<T: serde::Serialize + ?Sized, W: Write>(input: &T, writer: &mut W) -> Result<()> {
    Config::default().serialize_to_writer(input, writer)
}
