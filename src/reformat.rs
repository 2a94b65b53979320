use std::borrow::Cow;
use std::io::Read;

use tracing::{debug, trace};
use xmlparser::{ElementEnd, Token, Tokenizer};

use crate::config::Configuration;
use crate::encoding::decode;
use crate::entity::parse_entities;
use crate::error::{DecodeError, Error, Limit};
use crate::indent::{IndentWriter, StartTag};
use crate::name::flatten;
use crate::stack::MaskStack;

/// Re-indent the XML document read from `input`, masking the text of
/// elements matched by the configured rules.
///
/// The whole input is read before processing starts; its character
/// encoding is detected from the byte order mark or XML declaration. The
/// output is always UTF-8.
///
/// ```rust
/// use xmlmask::{reformat, Configuration, MaskRule, MaskingKind};
///
/// let config = Configuration::new().with_mask(MaskRule::new("id", MaskingKind::ShowLastFour));
/// let output = reformat("<doc><id>123456789</id></doc>".as_bytes(), &config)?;
/// assert_eq!(output, b"<doc>\n  <id>*****6789</id>\n</doc>");
/// # Ok::<(), xmlmask::Error>(())
/// ```
pub fn reformat(mut input: impl Read, config: &Configuration) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    reformat_bytes(&buf, config)
}

/// Like [`reformat`], over a buffer.
pub fn reformat_bytes(input: &[u8], config: &Configuration) -> Result<Vec<u8>, Error> {
    let xml = decode(input)?;
    reformat_str(&xml, config).map(String::into_bytes)
}

/// Like [`reformat`], for input that is already text.
pub fn reformat_str(xml: &str, config: &Configuration) -> Result<String, Error> {
    debug!(input_len = xml.len(), masks = config.masks.len(), "reformatting document");
    let mut reformatter = Reformatter::new(config);
    reformatter.run(Tokenizer::from(xml))?;
    let tokens = reformatter.tokens;
    let output = reformatter.finish()?;
    debug!(output_len = output.len(), tokens, "reformatted document");
    Ok(output)
}

// Character data that is itself a serialized XML document.
fn is_inline_fragment(text: &str) -> bool {
    text.starts_with('<') && text.ends_with('>') && text.contains("><")
}

// A fragment carrying its own prolog has to be tokenized as a document;
// otherwise it is element content, which allows several roots and text.
fn fragment_tokenizer(fragment: &str) -> Tokenizer<'_> {
    let is_document = fragment
        .strip_prefix("<?xml")
        .map_or(false, |rest| rest.starts_with(|c: char| c.is_ascii_whitespace()))
        || fragment.starts_with("<!DOCTYPE");
    if is_document {
        Tokenizer::from(fragment)
    } else {
        Tokenizer::from_fragment(fragment, 0..fragment.len())
    }
}

fn declaration(version: &str, has_encoding: bool, standalone: Option<bool>) -> String {
    let mut out = format!("<?xml version=\"{}\"", version);
    // the output is always UTF-8, whatever the input was
    if has_encoding {
        out.push_str(" encoding=\"UTF-8\"");
    }
    match standalone {
        Some(true) => out.push_str(" standalone=\"yes\""),
        Some(false) => out.push_str(" standalone=\"no\""),
        None => {}
    }
    out.push_str("?>");
    out
}

// Attributes and the `>` closing a start tag belong to the start element
// and don't count on their own.
fn counts_towards_limit(token: &Token) -> bool {
    !matches!(
        token,
        Token::Attribute { .. }
            | Token::ElementEnd {
                end: ElementEnd::Open,
                ..
            }
    )
}

/// State for one document: the output, the open elements and their masks.
///
/// Inline fragments are processed by the same reformatter, so they share
/// the indentation and the masks of the elements they sit in.
struct Reformatter<'c> {
    config: &'c Configuration,
    writer: IndentWriter<'c, Vec<u8>>,
    masks: MaskStack<'c>,
    // flattened names of the open elements, parallel to `masks`
    open: Vec<String>,
    tokens: usize,
    fragment_depth: usize,
}

impl<'c> Reformatter<'c> {
    fn new(config: &'c Configuration) -> Self {
        Reformatter {
            config,
            writer: IndentWriter::new(Vec::new(), &config.prefix, &config.indent),
            masks: MaskStack::new(),
            open: Vec::new(),
            tokens: 0,
            fragment_depth: 0,
        }
    }

    fn finish(self) -> Result<String, Error> {
        let output = self.writer.finish()?;
        // everything written came from &str
        String::from_utf8(output)
            .map_err(|e| Error::Encode(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    fn count_token(&mut self) -> Result<(), Error> {
        self.tokens += 1;
        let max = self.config.limits.max_tokens;
        if self.tokens > max {
            return Err(Error::LimitExceeded(Limit::Tokens(max)));
        }
        Ok(())
    }

    /// Process tokens until the tokenizer runs out. Elements opened here
    /// must be closed here.
    fn run(&mut self, tokenizer: Tokenizer) -> Result<(), Error> {
        let floor = self.open.len();
        let mut pending: Option<StartTag> = None;
        for token in tokenizer {
            let token = token?;
            if counts_towards_limit(&token) {
                self.count_token()?;
            }
            match token {
                Token::Declaration {
                    version,
                    encoding,
                    standalone,
                    ..
                } => {
                    let markup = declaration(version.as_str(), encoding.is_some(), standalone);
                    self.writer.markup(&markup)?;
                }
                Token::ProcessingInstruction { span, .. }
                | Token::Comment { span, .. }
                | Token::DtdStart { span, .. }
                | Token::EmptyDtd { span, .. }
                | Token::EntityDeclaration { span, .. }
                | Token::DtdEnd { span } => {
                    self.writer.markup(span.as_str())?;
                }
                Token::ElementStart { prefix, local, .. } => {
                    pending = Some(self.open_element(prefix.as_str(), local.as_str()));
                }
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    if let Some(tag) = pending.as_mut() {
                        let name = flatten(prefix.as_str(), local.as_str()).into_owned();
                        let value = parse_entities(value.as_str().into())?.into_owned();
                        tag.attributes.push((name, value));
                    }
                }
                Token::ElementEnd { end, .. } => match end {
                    ElementEnd::Open => {
                        if let Some(tag) = pending.take() {
                            self.writer.start_tag(&tag)?;
                        }
                    }
                    ElementEnd::Empty => {
                        if let Some(tag) = pending.take() {
                            self.writer.start_tag(&tag)?;
                            self.close_element(floor, &tag.name)?;
                        }
                    }
                    ElementEnd::Close(prefix, local) => {
                        let name = flatten(prefix.as_str(), local.as_str());
                        self.close_element(floor, &name)?;
                    }
                },
                Token::Text { text } => {
                    let text = parse_entities(text.as_str().into())?;
                    self.character_data(text)?;
                }
                Token::Cdata { text, .. } => {
                    self.character_data(text.as_str().into())?;
                }
            }
        }
        let unclosed = self.open.len() - floor;
        if unclosed > 0 {
            return Err(DecodeError::Unbalanced(unclosed).into());
        }
        Ok(())
    }

    // The rule is resolved against the raw name, before flattening.
    fn open_element(&mut self, prefix: &str, local: &str) -> StartTag {
        let rule = self.config.find_rule(prefix, local);
        self.masks.push(rule);
        let name = flatten(prefix, local).into_owned();
        self.open.push(name.clone());
        debug_assert_eq!(self.masks.depth(), self.open.len());
        StartTag::new(name)
    }

    fn close_element(&mut self, floor: usize, name: &str) -> Result<(), Error> {
        if self.open.len() <= floor {
            return Err(DecodeError::UnexpectedCloseTag(name.to_string()).into());
        }
        if let Some(expected) = self.open.last() {
            if expected != name {
                return Err(DecodeError::InvalidCloseTag {
                    expected: expected.clone(),
                    found: name.to_string(),
                }
                .into());
            }
        }
        self.writer.end_tag(name)?;
        self.open.pop();
        self.masks.pop();
        debug_assert_eq!(self.masks.depth(), self.open.len());
        Ok(())
    }

    fn character_data(&mut self, text: Cow<str>) -> Result<(), Error> {
        if is_inline_fragment(&text) {
            return self
                .inline_fragment(&text)
                .map_err(|e| Error::InlineFragment(Box::new(e)));
        }
        let mask = self.masks.peek().map(|rule| rule.mask);
        if let Some(mask) = mask {
            trace!(
                element = self.open.last().map(String::as_str).unwrap_or_default(),
                %mask,
                "masking text"
            );
        }
        self.writer.text(&text, mask)
    }

    fn inline_fragment(&mut self, fragment: &str) -> Result<(), Error> {
        let max = self.config.limits.max_fragment_depth;
        if self.fragment_depth >= max {
            return Err(Error::LimitExceeded(Limit::FragmentDepth(max)));
        }
        self.fragment_depth += 1;
        debug!(
            fragment_depth = self.fragment_depth,
            fragment_len = fragment.len(),
            "processing inline xml fragment"
        );
        let result = self.run(fragment_tokenizer(fragment));
        self.fragment_depth -= 1;
        result
    }
}
