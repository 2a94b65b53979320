use std::io::Write;

use crate::entity::{serialize_attribute, serialize_text};
use crate::error::Error;
use crate::mask::MaskingKind;

// How a token moves the nesting depth; decides where newlines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    In,
    Same,
    Out,
}

/// A start tag waiting for its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartTag {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
}

impl StartTag {
    pub(crate) fn new(name: String) -> Self {
        StartTag {
            name,
            attributes: Vec::new(),
        }
    }
}

/// Writes tokens, putting every tag on its own line indented by depth.
///
/// An end tag directly after its own start tag stays on the same line, so
/// `<a>text</a>` and `<a></a>` come out on a single line.
///
/// Character data is held back until the next token is written. If that
/// token starts a new line, whitespace-only text is dropped and a
/// trailing newline with the whitespace around it is cut. The layout of
/// the input then never doubles up with the layout written here.
pub(crate) struct IndentWriter<'a, W: Write> {
    w: W,
    prefix: &'a str,
    indent: &'a str,
    depth: usize,
    // no newline before the very first token
    put_newline: bool,
    // the last tag written was a start tag
    indented_in: bool,
    pending: String,
    pending_mask: Option<MaskingKind>,
}

impl<'a, W: Write> IndentWriter<'a, W> {
    pub(crate) fn new(w: W, prefix: &'a str, indent: &'a str) -> Self {
        IndentWriter {
            w,
            prefix,
            indent,
            depth: 0,
            put_newline: false,
            indented_in: false,
            pending: String::new(),
            pending_mask: None,
        }
    }

    /// Write out any held back character data and return the sink.
    pub(crate) fn finish(mut self) -> Result<W, Error> {
        let line_break = !self.is_compact();
        self.flush_text(line_break)?;
        Ok(self.w)
    }

    fn is_compact(&self) -> bool {
        self.prefix.is_empty() && self.indent.is_empty()
    }

    fn write(&mut self, text: &str) -> Result<(), Error> {
        self.w.write_all(text.as_bytes()).map_err(Error::Encode)
    }

    fn flush_text(&mut self, line_break: bool) -> Result<(), Error> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut text = std::mem::take(&mut self.pending);
        let mask = self.pending_mask.take();
        if line_break {
            if text.trim().is_empty() {
                return Ok(());
            }
            trim_layout(&mut text);
        }
        let text = match mask {
            Some(kind) => kind.apply(&text),
            None => text,
        };
        self.write(&serialize_text(&text))
    }

    fn write_indent(&mut self, step: Step) -> Result<(), Error> {
        if self.is_compact() {
            return self.flush_text(false);
        }
        // an end tag right after its start tag stays on the line
        let line_break = !(step == Step::Out && self.indented_in);
        self.flush_text(line_break)?;
        match step {
            Step::Out => {
                self.depth = self.depth.saturating_sub(1);
                if self.indented_in {
                    self.indented_in = false;
                    return Ok(());
                }
            }
            Step::Same => self.indented_in = false,
            Step::In => {}
        }
        if self.put_newline {
            self.write("\n")?;
        } else {
            self.put_newline = true;
        }
        let (prefix, indent) = (self.prefix, self.indent);
        self.write(prefix)?;
        for _ in 0..self.depth {
            self.write(indent)?;
        }
        if step == Step::In {
            self.depth += 1;
            self.indented_in = true;
        }
        Ok(())
    }

    pub(crate) fn start_tag(&mut self, tag: &StartTag) -> Result<(), Error> {
        self.write_indent(Step::In)?;
        self.write("<")?;
        self.write(&tag.name)?;
        for (name, value) in &tag.attributes {
            self.write(" ")?;
            self.write(name)?;
            self.write("=\"")?;
            self.write(&serialize_attribute(value))?;
            self.write("\"")?;
        }
        self.write(">")
    }

    pub(crate) fn end_tag(&mut self, name: &str) -> Result<(), Error> {
        self.write_indent(Step::Out)?;
        self.write("</")?;
        self.write(name)?;
        self.write(">")
    }

    /// Character data, masked with `mask` and escaped. Never moves to a new
    /// line.
    pub(crate) fn text(&mut self, text: &str, mask: Option<MaskingKind>) -> Result<(), Error> {
        self.flush_text(false)?;
        self.pending.push_str(text);
        self.pending_mask = mask;
        Ok(())
    }

    /// Markup written verbatim on its own line: declarations, processing
    /// instructions, comments and DTD pieces.
    pub(crate) fn markup(&mut self, markup: &str) -> Result<(), Error> {
        self.write_indent(Step::Same)?;
        self.write(markup)
    }
}

// Cut trailing whitespace from its first newline on: `"x \n  "` becomes
// `"x "`.
fn trim_layout(text: &mut String) {
    let content_end = text.trim_end().len();
    if let Some(offset) = text[content_end..].find('\n') {
        text.truncate(content_end + offset);
    }
}
