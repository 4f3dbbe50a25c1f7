use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;

use crate::config::ItemDefaults;
use crate::document::{Document, Metadata};
use crate::error::Error;
use crate::format::Formatter;
use crate::messages::Messages;

/// Shared core of articles and pages: the backing file, its lazily parsed
/// document and everything derived from it.
///
/// The document is read and parsed at most once, on the first accessor
/// that needs it; summary/body splitting and formatting memoize in the
/// same way. Validation results are cached separately because
/// `validate` overwrites them on every call while `errors` only reads.
pub(crate) struct ItemCore {
    path: PathBuf,
    defaults: ItemDefaults,
    formatter: Arc<dyn Formatter>,
    doc: OnceCell<Document>,
    split: OnceCell<(String, String)>,
    summary_html: OnceCell<String>,
    body_html: OnceCell<String>,
    errors: Mutex<Option<Vec<String>>>,
}

impl std::fmt::Debug for ItemCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemCore")
            .field("path", &self.path)
            .field("loaded", &self.doc.get().is_some())
            .finish()
    }
}

impl ItemCore {
    pub fn new(path: PathBuf, defaults: ItemDefaults, formatter: Arc<dyn Formatter>) -> Self {
        ItemCore {
            path,
            defaults,
            formatter,
            doc: OnceCell::new(),
            split: OnceCell::new(),
            summary_html: OnceCell::new(),
            body_html: OnceCell::new(),
            errors: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_url(&self) -> &str {
        &self.defaults.base_url
    }

    fn doc(&self) -> Result<&Document, Error> {
        self.doc.get_or_try_init(|| Document::load(&self.path))
    }

    pub fn metadata(&self) -> Result<&Metadata, Error> {
        Ok(&self.doc()?.meta)
    }

    pub fn title(&self) -> Result<Option<&str>, Error> {
        Ok(self.doc()?.meta.title.as_deref())
    }

    pub fn author(&self) -> Result<&str, Error> {
        Ok(self
            .doc()?
            .meta
            .author
            .as_deref()
            .unwrap_or(&self.defaults.author))
    }

    pub fn tags(&self) -> Result<&[String], Error> {
        Ok(&self.doc()?.meta.tags)
    }

    pub fn delimiter(&self) -> Result<&str, Error> {
        Ok(self
            .doc()?
            .meta
            .delimiter
            .as_deref()
            .unwrap_or(&self.defaults.summary_delimiter))
    }

    pub fn raw_content(&self) -> Result<&str, Error> {
        Ok(&self.doc()?.raw)
    }

    fn split(&self) -> Result<&(String, String), Error> {
        self.split.get_or_try_init(|| {
            let delimiter = self.delimiter()?.to_string();
            Ok(self.doc()?.split_summary(&delimiter))
        })
    }

    pub fn summary(&self) -> Result<&str, Error> {
        Ok(&self.split()?.0)
    }

    pub fn body(&self) -> Result<&str, Error> {
        Ok(&self.split()?.1)
    }

    pub fn summary_html(&self) -> Result<&str, Error> {
        self.summary_html
            .get_or_try_init(|| self.formatter.format(self.summary()?))
            .map(String::as_str)
    }

    pub fn body_html(&self) -> Result<&str, Error> {
        self.body_html
            .get_or_try_init(|| self.formatter.format(self.body()?))
            .map(String::as_str)
    }

    /// Run every publishing check and cache the resulting messages.
    ///
    /// Always recomputes; returns `Ok(true)` iff no check failed. Faults
    /// from the formatter become one message each instead of propagating.
    /// A document that cannot be read or parsed at all still propagates,
    /// since there is nothing meaningful to report per-field.
    pub fn validate(&self, messages: &Messages) -> Result<bool, Error> {
        let mut errors = Vec::new();

        if !self.title()?.is_some_and(|t| !t.is_empty()) {
            errors.push(messages.lookup("no_title", &[]));
        }
        if self.author()?.is_empty() {
            errors.push(messages.lookup("no_author", &[]));
        }
        if !self.doc()?.tags_well_formed {
            errors.push(messages.lookup("wrong_tags", &[]));
        }
        if self.summary_html().is_err() {
            errors.push(messages.lookup("summary_failed", &[]));
        }
        if self.body_html().is_err() {
            errors.push(messages.lookup("body_failed", &[]));
        }

        let ok = errors.is_empty();
        *self.errors.lock().unwrap() = Some(errors);
        Ok(ok)
    }

    /// Messages from the most recent validation, validating once first if
    /// none has run yet.
    pub fn errors(&self, messages: &Messages) -> Result<Vec<String>, Error> {
        if let Some(cached) = self.errors.lock().unwrap().clone() {
            return Ok(cached);
        }
        self.validate(messages)?;
        Ok(self.errors.lock().unwrap().clone().unwrap_or_default())
    }
}
