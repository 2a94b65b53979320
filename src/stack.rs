use crate::config::MaskRule;

/// The mask active for each currently open element, innermost last.
///
/// Only the innermost entry ever governs character data, so a rule never
/// leaks into the text of a parent or sibling element.
#[derive(Debug, Default)]
pub(crate) struct MaskStack<'a> {
    entries: Vec<Option<&'a MaskRule>>,
}

impl<'a> MaskStack<'a> {
    pub(crate) fn new() -> Self {
        MaskStack {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, rule: Option<&'a MaskRule>) {
        self.entries.push(rule);
    }

    /// Remove the entry of the innermost element. `None` if nothing is open.
    pub(crate) fn pop(&mut self) -> Option<Option<&'a MaskRule>> {
        self.entries.pop()
    }

    /// The rule governing text directly inside the innermost open element.
    pub(crate) fn peek(&self) -> Option<&'a MaskRule> {
        self.entries.last().copied().flatten()
    }

    pub(crate) fn depth(&self) -> usize {
        self.entries.len()
    }
}
