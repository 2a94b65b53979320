use std::io::{self, Read};

use xmlmask::{reformat, reformat_str, Configuration, DecodeError, Error, Limit, Limits};

#[test]
fn test_unclosed_start_tag() {
    let err = reformat_str("<note><from>Jane", &Configuration::new()).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn test_invalid_close_tag() {
    let err = reformat_str("<a></b>", &Configuration::new()).unwrap_err();
    match err {
        Error::Decode(DecodeError::InvalidCloseTag { expected, found }) => {
            assert_eq!(expected, "a");
            assert_eq!(found, "b");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_invalid_close_tag_prefix() {
    let err = reformat_str("<x:a></y:a>", &Configuration::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Decode(DecodeError::InvalidCloseTag { .. })
    ));
}

#[test]
fn test_xmlparser_error() {
    let err = reformat_str("<doc><", &Configuration::new()).unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Parser(_))));
}

#[test]
fn test_unknown_entity() {
    let err = reformat_str("<a>&bogus;</a>", &Configuration::new()).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn test_token_limit() {
    let config = Configuration::new().with_limits(Limits {
        max_tokens: 3,
        ..Limits::default()
    });
    let err = reformat_str("<a><b/><c/></a>", &config).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded(Limit::Tokens(3))));
    assert_eq!(err.to_string(), "limit exceeded: more than 3 tokens");
}

#[test]
fn test_token_limit_not_reached() {
    let config = Configuration::new().with_limits(Limits {
        max_tokens: 6,
        ..Limits::default()
    });
    assert!(reformat_str("<a><b/><c/></a>", &config).is_ok());
}

#[test]
fn test_token_limit_ignores_attributes() {
    let xml = r#"<a x="1" y="2"><b z="3"/></a>"#;
    let limits = |max_tokens| Limits {
        max_tokens,
        ..Limits::default()
    };
    let config = Configuration::new().with_limits(limits(4));
    assert!(reformat_str(xml, &config).is_ok());
    let config = Configuration::new().with_limits(limits(3));
    let err = reformat_str(xml, &config).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded(Limit::Tokens(3))));
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }
}

#[test]
fn test_read_error() {
    let err = reformat(FailingReader, &Configuration::new()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(err.to_string(), "reading input: disk on fire");
}

#[test]
fn test_invalid_encoding() {
    let err = reformat(
        &b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>\xff\xfe\xfd</a>"[..],
        &Configuration::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Encoding(_))));
}
