//! Content repository for a flat-file publishing engine.
//!
//! Articles and pages live as plain text files: a YAML metadata block, a
//! blank line, then the content. Articles encode their identity in the
//! filename (`YYYY-M-D-<permalink>`), pages use the bare stem. The
//! indexes answer ordered, filtered queries over those files; everything
//! beyond the filename is parsed lazily and cached.

mod article;
mod config;
mod document;
mod error;
mod format;
mod item;
mod messages;
mod page;
mod repository;

pub use article::{parse_article_filename, Article};
pub use config::Config;
pub use document::Metadata;
pub use error::Error;
pub use format::{Formatter, MarkdownFormatter};
pub use messages::{Locale, Messages};
pub use page::Page;
pub use repository::{ArticleIndex, DirSource, ListOptions, PageIndex, PathSource};
