//! HTML extraction primitives.
//!
//! CodePlex has no API, so everything the migrator knows about a work item is
//! recovered from rendered pages. Two tools are provided for that:
//!
//! - [`find_first`] and [`find_all`] match dot-all regular expressions against
//!   the raw document. These are used for flat, single-occurrence fields.
//! - [`Document`] parses the page into a tree and locates elements with CSS
//!   selectors. This is used wherever containers repeat or nest (listing rows,
//!   numbered comment containers, the optional closed block).

mod document;
mod error;
mod extract;
pub mod markdown;

pub use document::{selector, Document, Element};
pub use error::SelectorError;
pub use extract::{find_all, find_first, pattern, FindAll};
pub use markdown::to_markdown;
