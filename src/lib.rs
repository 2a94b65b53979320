//! Re-indent XML documents while masking the text of sensitive elements.
//!
//! `xmlmask` streams the tokens of a document back out with fresh
//! indentation. Text directly inside elements named by a [`MaskRule`] is
//! obscured with one of the [`MaskingKind`] transforms, so IDs, names and
//! account numbers can be logged or shared safely.
//!
//! ```rust
//! use xmlmask::{reformat_str, Configuration, MaskRule, MaskingKind};
//!
//! let config = Configuration::new()
//!     .with_mask(MaskRule::new("Nm", MaskingKind::ShowWordStart).in_space("ct"));
//! let output = reformat_str("<ct:Dbtr><ct:Nm>John Doe</ct:Nm></ct:Dbtr>", &config)?;
//! assert_eq!(output, "<ct:Dbtr>\n  <ct:Nm>J*** D**</ct:Nm>\n</ct:Dbtr>");
//! # Ok::<(), xmlmask::Error>(())
//! ```
//!
//! Character data that is itself a serialized XML document (escaped or in
//! a CDATA section) is unfolded and processed in place. Its top-level text
//! is masked by the enclosing element's rule; elements inside it are
//! matched against the rules on their own.
#![forbid(unsafe_code)]

mod config;
mod encoding;
mod entity;
mod error;
mod indent;
pub mod mask;
mod name;
mod reformat;
mod stack;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{Configuration, Limits, MaskRule};
pub use error::{DecodeError, Error, Limit};
pub use mask::MaskingKind;
pub use reformat::{reformat, reformat_bytes, reformat_str};
