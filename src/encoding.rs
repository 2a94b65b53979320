use std::borrow::Cow;
use std::io::Cursor;

use encoding_rs::{Encoding, UTF_8};
use xhtmlchardet::detect;

use crate::error::DecodeError;

// The charset named by a byte order mark or the XML declaration. Input
// that names none is UTF-8.
fn sniff(data: &[u8]) -> &'static Encoding {
    let mut cursor = Cursor::new(data);
    detect(&mut cursor, None)
        .ok()
        .and_then(|charsets| charsets.into_iter().next())
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode raw document bytes into UTF-8 text. A byte order mark wins over
/// whatever the declaration claims, and is stripped.
pub(crate) fn decode(data: &[u8]) -> Result<Cow<str>, DecodeError> {
    let (text, used, had_errors) = sniff(data).decode(data);
    if had_errors {
        return Err(DecodeError::Encoding(used.name()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8() {
        let data = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>";
        let enc = sniff(data);
        assert_eq!(enc.name(), "UTF-8");
    }

    #[test]
    fn test_utf8_without_declaration() {
        let data = b"<a/>";
        let enc = sniff(data);
        assert_eq!(enc.name(), "UTF-8");
    }

    #[test]
    fn test_iso8859_1() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a/>";
        let enc = sniff(data);
        // windows-1252 is a superset of 8859-1
        assert_eq!(enc.name(), "windows-1252");
    }

    #[test]
    fn test_decode_latin1() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>caf\xe9</a>";
        let text = decode(data).unwrap();
        assert!(text.ends_with("<a>caf\u{e9}</a>"));
    }

    #[test]
    fn test_decode_strips_bom() {
        let data = b"\xef\xbb\xbf<a/>";
        assert_eq!(decode(data).unwrap(), "<a/>");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let data = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>\xff\xfe\xfd</a>";
        let err = decode(data).unwrap_err();
        assert!(matches!(err, DecodeError::Encoding("UTF-8")));
    }
}
