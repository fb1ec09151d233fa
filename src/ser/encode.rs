use std::borrow::Cow;

use percent_encoding::AsciiSet;

/// The percent-encoding applied to keys and values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Query component escaping: everything except ASCII alphanumerics
    /// and `-`, `_`, `.`, `~` is percent-encoded and spaces become `+`.
    ///
    /// `https://x` encodes as `https%3A%2F%2Fx`.
    #[default]
    Query,
    /// The `application/x-www-form-urlencoded` set; spaces are encoded
    /// as `%20`.
    Form,
    /// The minimal WHATWG query set, extended with the characters that
    /// delimit querystring pairs. Spaces become `+`.
    Minimal,
}

/// Everything except the RFC 3986 unreserved characters.
const QUERY_COMPONENT_SET: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// As defined in https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
const FORM_URLENCODED_SET: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// As defined in https://url.spec.whatwg.org/#query-percent-encode-set,
/// plus `+`, `=` and `&` which would otherwise change how the pair splits.
const MINIMAL_QS_SET: &AsciiSet = &percent_encoding::CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'%')
    .add(b'+')
    .add(b'=')
    .add(b'&');

impl Encoding {
    fn set(self) -> &'static AsciiSet {
        match self {
            Encoding::Query => QUERY_COMPONENT_SET,
            Encoding::Form => FORM_URLENCODED_SET,
            Encoding::Minimal => MINIMAL_QS_SET,
        }
    }

    fn space_as_plus(self) -> bool {
        !matches!(self, Encoding::Form)
    }
}

/// Percent-encodes `b`, returning an iterator of encoded chunks so the
/// common no-escape case does not allocate.
pub fn encode(b: &[u8], encoding: Encoding) -> impl Iterator<Item = Cow<'_, str>> + '_ {
    let plus = encoding.space_as_plus();
    percent_encoding::percent_encode(b, encoding.set()).map(move |s| {
        // spaces are escaped as `%20` by the set; swap for `+` when asked
        if plus && s == "%20" {
            Cow::Borrowed("+")
        } else {
            Cow::Borrowed(s)
        }
    })
}

/// Appends the encoded form of `b` to `out`.
pub fn encode_into(out: &mut String, b: &[u8], encoding: Encoding) {
    for chunk in encode(b, encoding) {
        out.push_str(&chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(s: &str, encoding: Encoding) -> String {
        let mut out = String::new();
        encode_into(&mut out, s.as_bytes(), encoding);
        out
    }

    #[test]
    fn query_component() {
        assert_eq!(encoded("https://x/f.ico", Encoding::Query), "https%3A%2F%2Fx%2Ff.ico");
        assert_eq!(encoded("45%", Encoding::Query), "45%25");
        assert_eq!(encoded("a b~c", Encoding::Query), "a+b~c");
        assert_eq!(encoded("k=v&w", Encoding::Query), "k%3Dv%26w");
    }

    #[test]
    fn form() {
        assert_eq!(encoded("a b*c~", Encoding::Form), "a%20b*c%7E");
    }

    #[test]
    fn minimal() {
        assert_eq!(encoded("https://x/a b", Encoding::Minimal), "https://x/a+b");
        assert_eq!(encoded("1+1=2&%", Encoding::Minimal), "1%2B1%3D2%26%25");
    }

    #[test]
    fn multibyte() {
        assert_eq!(encoded("comté", Encoding::Query), "comt%C3%A9");
    }
}
