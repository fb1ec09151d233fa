//! Field metadata resolution.
//!
//! Record fields may carry a serialization annotation of the form
//! `name[,modifier]*`. The first segment renames the field in the output,
//! and the recognised modifiers are `omitempty` and `-`:
//!
//! * `"url"` emits the field under `url`
//! * `"extra,omitempty"` emits the field under `extra`, unless it is blank
//! * `",omitempty"` keeps the declared name but elides blank values
//! * `"-"` or `"name,-"` drops the field entirely
//!
//! Malformed annotations never fail; anything unrecognised is ignored.

use std::borrow::Cow;

use tracing::debug;

/// The resolved output settings of a single record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key segment used for the field in the flattened output.
    pub output_name: Cow<'static, str>,
    /// Elide the field when its value is blank or the zero value of its type.
    pub omit_empty: bool,
    /// Never emit the field.
    pub ignore: bool,
}

impl FieldDescriptor {
    /// Resolves the descriptor for a field declared as `declared` with an
    /// optional annotation.
    ///
    /// ```
    /// use url_values::FieldDescriptor;
    ///
    /// let field = FieldDescriptor::resolve("Extra", Some("extra,omitempty"));
    /// assert_eq!(field.output_name, "extra");
    /// assert!(field.omit_empty);
    /// assert!(!field.ignore);
    ///
    /// let field = FieldDescriptor::resolve("Width", None);
    /// assert_eq!(field.output_name, "Width");
    /// ```
    pub fn resolve(
        declared: impl Into<Cow<'static, str>>,
        annotation: Option<&str>,
    ) -> Self {
        let declared = declared.into();
        let Some(annotation) = annotation.filter(|a| !a.is_empty()) else {
            return Self {
                output_name: declared,
                omit_empty: false,
                ignore: false,
            };
        };

        let mut segments = annotation.split(',');
        let name = segments.next().unwrap_or_default();
        let mut omit_empty = false;
        let mut ignore = name == "-";
        for modifier in segments {
            match modifier {
                "omitempty" => omit_empty = true,
                "-" => ignore = true,
                _ => {}
            }
        }

        let output_name = if name.is_empty() {
            declared
        } else {
            Cow::Owned(name.to_owned())
        };
        Self {
            output_name,
            omit_empty,
            ignore,
        }
    }

    /// Resolves a field whose only name is its annotation, as produced by
    /// serde where the (possibly renamed) key is all that is visible.
    ///
    /// With no name segment there is no declared name to fall back to, so
    /// the whole key (e.g. `",omitempty"`) becomes the output name while
    /// its modifiers still apply.
    pub(crate) fn from_key(key: &'static str) -> Self {
        let name = key.split(',').next().unwrap_or_default();
        let mut field = Self::resolve(name, Some(key));
        if field.output_name.is_empty() {
            debug!(key, "annotation has no name segment, keeping the raw key");
            field.output_name = Cow::Borrowed(key);
        }
        field
    }
}

/// Fields declared with a lowercase leading letter are private by
/// convention and are never emitted.
pub fn is_private(declared: &str) -> bool {
    declared
        .as_bytes()
        .first()
        .is_some_and(|b| b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_annotation_uses_declared_name() {
        let field = FieldDescriptor::resolve("Source", None);
        assert_eq!(field.output_name, "Source");
        assert!(!field.omit_empty);
        assert!(!field.ignore);

        let field = FieldDescriptor::resolve("Source", Some(""));
        assert_eq!(field.output_name, "Source");
    }

    #[test]
    fn empty_name_segment_falls_back() {
        let field = FieldDescriptor::resolve("Page", Some(",omitempty"));
        assert_eq!(field.output_name, "Page");
        assert!(field.omit_empty);
    }

    #[test]
    fn dash_ignores() {
        assert!(FieldDescriptor::resolve("Inner", Some("-")).ignore);
        assert!(FieldDescriptor::resolve("Inner", Some("inner,-")).ignore);
        assert!(FieldDescriptor::resolve("Inner", Some("-,omitempty")).ignore);
        assert!(!FieldDescriptor::resolve("Inner", Some("inner,omitempty")).ignore);
    }

    #[test]
    fn unknown_modifiers_are_ignored() {
        let field = FieldDescriptor::resolve("Page", Some("page,string,,omitempty "));
        assert_eq!(field.output_name, "page");
        // modifiers match literally
        assert!(!field.omit_empty);
        assert!(!field.ignore);
    }

    #[test]
    fn serde_keys_resolve_as_annotations() {
        let field = FieldDescriptor::from_key("extra,omitempty");
        assert_eq!(field.output_name, "extra");
        assert!(field.omit_empty);

        assert!(FieldDescriptor::from_key("-").ignore);

        let field = FieldDescriptor::from_key(",omitempty");
        assert_eq!(field.output_name, ",omitempty");
        assert!(field.omit_empty);
        assert_eq!(FieldDescriptor::from_key("plain").output_name, "plain");
    }

    #[test]
    fn privacy_follows_leading_letter() {
        assert!(is_private("secret"));
        assert!(!is_private("Secret"));
        assert!(!is_private("_secret"));
        assert!(!is_private(""));
    }
}
