use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::document::Metadata;
use crate::error::Error;
use crate::format::Formatter;
use crate::item::ItemCore;
use crate::messages::Messages;

/// A dateless content item: same file format as an article, but addressed
/// by its bare filename stem instead of a date prefix.
#[derive(Debug)]
pub struct Page {
    permalink: String,
    core: ItemCore,
}

impl Page {
    pub fn new(
        path: impl Into<PathBuf>,
        config: &Config,
        formatter: Arc<dyn Formatter>,
    ) -> Result<Self, Error> {
        let path = path.into();
        let permalink = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidFilename { path: path.clone() })?;
        Ok(Page {
            permalink,
            core: ItemCore::new(path, config.into(), formatter),
        })
    }

    pub fn path(&self) -> &Path {
        self.core.path()
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    pub fn url(&self) -> String {
        format!("/pages/{}", self.permalink)
    }

    pub fn full_url(&self) -> String {
        format!("{}{}", self.core.base_url().trim_end_matches('/'), self.url())
    }

    pub fn metadata(&self) -> Result<&Metadata, Error> {
        self.core.metadata()
    }

    pub fn title(&self) -> Result<Option<&str>, Error> {
        self.core.title()
    }

    pub fn author(&self) -> Result<&str, Error> {
        self.core.author()
    }

    pub fn tags(&self) -> Result<&[String], Error> {
        self.core.tags()
    }

    pub fn delimiter(&self) -> Result<&str, Error> {
        self.core.delimiter()
    }

    pub fn raw_content(&self) -> Result<&str, Error> {
        self.core.raw_content()
    }

    pub fn summary(&self) -> Result<&str, Error> {
        self.core.summary()
    }

    pub fn body(&self) -> Result<&str, Error> {
        self.core.body()
    }

    pub fn summary_html(&self) -> Result<&str, Error> {
        self.core.summary_html()
    }

    pub fn body_html(&self) -> Result<&str, Error> {
        self.core.body_html()
    }

    pub fn validate(&self, messages: &Messages) -> Result<bool, Error> {
        self.core.validate(messages)
    }

    pub fn errors(&self, messages: &Messages) -> Result<Vec<String>, Error> {
        self.core.errors(messages)
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for Page {}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::format::MarkdownFormatter;

    #[test]
    fn permalink_is_the_filename_stem() {
        let config = Config::default();
        let page = Page::new("pages/about.txt", &config, Arc::new(MarkdownFormatter)).unwrap();
        assert_eq!(page.permalink(), "about");
        assert_eq!(page.url(), "/pages/about");
    }

    #[test]
    fn pages_parse_the_same_document_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("about.txt");
        let mut fd = std::fs::File::create(&path).unwrap();
        fd.write_all(b"title: About\nauthor: jane\n\nWho we are~And more\n")
            .unwrap();

        let config = Config::default();
        let page = Page::new(path, &config, Arc::new(MarkdownFormatter)).unwrap();
        assert_eq!(page.title().unwrap(), Some("About"));
        assert_eq!(page.summary().unwrap(), "Who we are");
        assert_eq!(page.body().unwrap(), "Who we areAnd more");
        assert!(page.validate(&Messages::default()).unwrap());
    }
}
