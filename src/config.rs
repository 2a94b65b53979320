use std::str::FromStr;

use crate::error::Error;
use crate::mask::MaskingKind;

/// A pairing of an element identity with a masking kind.
///
/// `name` matches the element's local name case-insensitively. `space` is
/// the namespace prefix; empty matches any namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MaskRule {
    pub name: String,
    pub space: String,
    pub mask: MaskingKind,
}

impl Default for MaskRule {
    fn default() -> Self {
        MaskRule {
            name: String::new(),
            space: String::new(),
            mask: MaskingKind::ShowNone,
        }
    }
}

impl MaskRule {
    pub fn new(name: impl Into<String>, mask: MaskingKind) -> Self {
        MaskRule {
            name: name.into(),
            space: String::new(),
            mask,
        }
    }

    /// Restrict the rule to elements in `space`.
    pub fn in_space(mut self, space: impl Into<String>) -> Self {
        self.space = space.into();
        self
    }

    /// Whether an element `namespace:local` is subject to this rule.
    ///
    /// Names compare case-insensitively. Namespaces only have to agree when
    /// both the element and the rule have one.
    ///
    /// ```rust
    /// use xmlmask::{MaskRule, MaskingKind};
    ///
    /// let rule = MaskRule::new("Nm", MaskingKind::ShowWordStart).in_space("ct");
    /// assert!(rule.matches("", "nm"));
    /// assert!(rule.matches("CT", "Nm"));
    /// assert!(!rule.matches("pt", "Nm"));
    /// ```
    pub fn matches(&self, namespace: &str, local: &str) -> bool {
        if !eq_fold(local, &self.name) {
            return false;
        }
        namespace.is_empty() || self.space.is_empty() || eq_fold(namespace, &self.space)
    }
}

impl FromStr for MaskRule {
    type Err = Error;

    /// Parse `[space:]name=kind`, e.g. `ct:Nm=show-word-start`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (element, kind) = s
            .split_once('=')
            .ok_or_else(|| Error::InvalidMaskRule(s.to_string()))?;
        let (space, name) = element.split_once(':').unwrap_or(("", element));
        let (space, name) = (space.trim(), name.trim());
        if name.is_empty() {
            return Err(Error::InvalidMaskRule(s.to_string()));
        }
        Ok(MaskRule {
            name: name.to_string(),
            space: space.to_string(),
            mask: kind.trim().parse()?,
        })
    }
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Safety ceilings applied while processing one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Limits {
    /// Maximum number of tokens read, counted over the document and all
    /// inline fragments inside it.
    pub max_tokens: usize,
    /// Maximum nesting of inline fragments inside inline fragments.
    pub max_fragment_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_tokens: 1_000_000,
            max_fragment_depth: 16,
        }
    }
}

/// How a document is re-indented and masked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Configuration {
    /// Written at the start of every indented line.
    pub prefix: String,
    /// Repeated once per nesting level.
    pub indent: String,
    /// Masking rules, tried in order; the first match wins.
    pub masks: Vec<MaskRule>,
    pub limits: Limits,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            prefix: String::new(),
            indent: "  ".to_string(),
            masks: Vec::new(),
            limits: Limits::default(),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_mask(mut self, rule: MaskRule) -> Self {
        self.masks.push(rule);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The first rule matching the element `namespace:local`, if any.
    pub fn find_rule(&self, namespace: &str, local: &str) -> Option<&MaskRule> {
        self.masks.iter().find(|rule| rule.matches(namespace, local))
    }
}
