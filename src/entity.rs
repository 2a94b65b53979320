use std::borrow::Cow;

use crate::error::DecodeError;

pub(crate) fn parse_entities(content: Cow<str>) -> Result<Cow<str>, DecodeError> {
    if !content.contains('&') {
        return Ok(content);
    }
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }
        let mut entity = String::new();
        let mut is_complete = false;
        for c in chars.by_ref() {
            if c == ';' {
                is_complete = true;
                break;
            }
            entity.push(c);
        }
        if !is_complete {
            return Err(DecodeError::UnclosedEntity(entity));
        }
        match entity.as_str() {
            "amp" => result.push('&'),
            "apos" => result.push('\''),
            "gt" => result.push('>'),
            "lt" => result.push('<'),
            "quot" => result.push('"'),
            _ => match character_reference(&entity) {
                Some(c) => result.push(c),
                None => return Err(DecodeError::InvalidEntity(entity)),
            },
        }
    }
    Ok(result.into())
}

// `#123` or `#x7B`
fn character_reference(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

pub(crate) fn serialize_text(content: &str) -> Cow<str> {
    escape(content, false)
}

pub(crate) fn serialize_attribute(content: &str) -> Cow<str> {
    escape(content, true)
}

fn escape(content: &str, quote: bool) -> Cow<str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (quote && c == '"');
    if !content.contains(needs_escape) {
        return content.into();
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quote => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let text = "A &amp; B";
        assert_eq!(parse_entities(text.into()).unwrap(), "A & B");
    }

    #[test]
    fn test_parse_multiple() {
        let text = "&amp;&apos;&gt;&lt;&quot;";
        assert_eq!(parse_entities(text.into()).unwrap(), "&'><\"");
    }

    #[test]
    fn test_parse_character_references() {
        let text = "&#65;&#x42;&#x263A;";
        assert_eq!(parse_entities(text.into()).unwrap(), "AB\u{263A}");
    }

    #[test]
    fn test_parse_unknown_entity() {
        let text = "&unknown;";
        let err = parse_entities(text.into());
        if let Err(DecodeError::InvalidEntity(entity)) = err {
            assert_eq!(entity, "unknown");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_bad_character_reference() {
        let err = parse_entities("&#xD800;".into());
        assert!(matches!(err, Err(DecodeError::InvalidEntity(_))));
    }

    #[test]
    fn test_parse_unfinished_entity() {
        let text = "&amp";
        let err = parse_entities(text.into());
        if let Err(DecodeError::UnclosedEntity(entity)) = err {
            assert_eq!(entity, "amp");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_no_entities() {
        let text = "hello";
        let result = parse_entities(text.into()).unwrap();
        // this is the same slice
        assert!(std::ptr::eq(text, result.as_ref()));
    }

    #[test]
    fn test_serialize_text() {
        assert_eq!(serialize_text("A & B <c> \"d\""), "A &amp; B &lt;c&gt; \"d\"");
    }

    #[test]
    fn test_serialize_attribute() {
        assert_eq!(serialize_attribute("say \"hi\" & go"), "say &quot;hi&quot; &amp; go");
    }

    #[test]
    fn test_serialize_no_entities() {
        let text = "hello";
        let result = serialize_text(text);
        assert!(std::ptr::eq(text, result.as_ref()));
    }
}
