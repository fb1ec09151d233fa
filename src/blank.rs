//! Blankness classification used to elide empty values.

use crate::value::{Ref, Scalar, Value};

/// Returns `true` if the value would leave a parameter blank in a query
/// string, e.g. `value=` or `value=false`.
///
/// Blank values are the empty string, `false`, unit, a nil reference and
/// an empty sequence. Numeric zeros are *not* blank; see [`is_zero`].
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Scalar(scalar) => scalar.is_blank(),
        Value::Ref(Ref::Nil) => true,
        Value::Seq(items) => items.is_empty(),
        _ => false,
    }
}

/// Returns `true` if the value equals the zero value of its own type.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Scalar(scalar) => scalar.is_zero(),
        Value::Ref(Ref::Nil) => true,
        Value::Seq(items) => items.is_empty(),
        Value::Map(entries) => entries.is_empty(),
        _ => false,
    }
}

/// The test applied to fields marked `omitempty`.
pub fn is_empty(value: &Value) -> bool {
    is_blank(value) || is_zero(value)
}

impl Scalar {
    /// See [`is_blank`].
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Unit | Scalar::Bool(false) => true,
            Scalar::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    /// See [`is_zero`].
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Int(v) => *v == 0,
            Scalar::UInt(v) => *v == 0,
            Scalar::Float(v) => *v == 0.0,
            Scalar::Char(c) => *c == '\0',
            other => other.is_blank(),
        }
    }

    /// See [`is_empty`].
    pub fn is_empty(&self) -> bool {
        self.is_blank() || self.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_scalars() {
        assert!(is_blank(&Value::from("")));
        assert!(is_blank(&Value::from(false)));
        assert!(is_blank(&Value::Scalar(Scalar::Unit)));
        assert!(is_blank(&Value::nil()));
        assert!(is_blank(&Value::Seq(vec![])));

        assert!(!is_blank(&Value::from(0)));
        assert!(!is_blank(&Value::from(true)));
        assert!(!is_blank(&Value::from(" ")));
        assert!(!is_blank(&Value::Seq(vec![Value::nil()])));
    }

    #[test]
    fn zero_values() {
        assert!(is_zero(&Value::from(0)));
        assert!(is_zero(&Value::from(0u8)));
        assert!(is_zero(&Value::from(-0.0)));
        assert!(is_zero(&Value::from('\0')));
        assert!(is_zero(&Value::Map(vec![])));

        assert!(!is_zero(&Value::from(2)));
        assert!(!is_zero(&Value::from(0.1)));
    }

    #[test]
    fn empty_is_either() {
        assert!(is_empty(&Value::from(0i64)));
        assert!(is_empty(&Value::from("")));
        assert!(!is_empty(&Value::from("0")));
        assert!(!is_empty(&Value::Unsupported("function")));
        assert!(Scalar::UInt(0).is_empty());
        assert!(!Scalar::UInt(0).is_blank());
    }
}
