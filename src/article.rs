use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::document::Metadata;
use crate::error::Error;
use crate::format::Formatter;
use crate::item::ItemCore;
use crate::messages::Messages;

static FILENAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})-([^.]+)").unwrap());

/// Parse an article filename into its date and permalink.
///
/// Filenames carry identity as `YYYY-M-D-<permalink>`; everything after
/// the date up to the first dot is the permalink. Anything that does not
/// match, including impossible calendar dates, is not an article.
pub fn parse_article_filename(path: &Path) -> Result<(NaiveDate, String), Error> {
    let invalid = || Error::InvalidFilename {
        path: path.to_path_buf(),
    };

    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let caps = FILENAME_PATTERN.captures(name).ok_or_else(invalid)?;

    // the numeric groups always parse; only the calendar can reject them
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let day: u32 = caps[3].parse().map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

    Ok((date, caps[4].to_string()))
}

/// One date-addressed content item backed by a single file.
///
/// Construction only parses the filename and fails loudly when it does
/// not encode a date and permalink. Everything sourced from the file body
/// is read lazily on first access and cached for the article's lifetime.
#[derive(Debug)]
pub struct Article {
    date: NaiveDate,
    permalink: String,
    core: ItemCore,
}

impl Article {
    pub fn new(
        path: impl Into<PathBuf>,
        config: &Config,
        formatter: Arc<dyn Formatter>,
    ) -> Result<Self, Error> {
        let path = path.into();
        let (date, permalink) = parse_article_filename(&path)?;
        Ok(Article {
            date,
            permalink,
            core: ItemCore::new(path, config.into(), formatter),
        })
    }

    pub fn path(&self) -> &Path {
        self.core.path()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    /// Site-relative URL, `/YYYY/MM/DD/<permalink>`.
    pub fn url(&self) -> String {
        use chrono::Datelike;
        format!(
            "/{}/{:02}/{:02}/{}",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.permalink
        )
    }

    /// [`Article::url`] prefixed with the configured site root.
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

    /// Re-run all publishing checks.
    ///
    /// Always recomputes and refreshes the cached messages; `Ok(true)`
    /// iff every check passed. Formatter faults become messages instead
    /// of propagating, an unreadable document still propagates.
    pub fn validate(&self, messages: &Messages) -> Result<bool, Error> {
        self.core.validate(messages)
    }

    /// Messages from the last validation, validating first if needed.
    pub fn errors(&self, messages: &Messages) -> Result<Vec<String>, Error> {
        self.core.errors(messages)
    }
}

// identity is the backing path
impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for Article {}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::format::MarkdownFormatter;

    fn formatter() -> Arc<dyn Formatter> {
        Arc::new(MarkdownFormatter)
    }

    fn write_article(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut fd = std::fs::File::create(&path).unwrap();
        fd.write_all(content.as_bytes()).unwrap();
        path
    }

    struct FailingFormatter;

    impl Formatter for FailingFormatter {
        fn format(&self, _raw: &str) -> Result<String, Error> {
            Err(Error::Formatting("simulated".to_string()))
        }
    }

    #[test]
    fn filename_parsing_extracts_date_and_permalink() {
        let (date, permalink) =
            parse_article_filename(Path::new("articles/2012-03-05-hello-world.txt")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2012, 3, 5).unwrap());
        assert_eq!(permalink, "hello-world");
    }

    #[test]
    fn one_digit_month_and_day_are_accepted() {
        let (date, permalink) =
            parse_article_filename(Path::new("2009-1-4-short.md")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2009, 1, 4).unwrap());
        assert_eq!(permalink, "short");
    }

    #[test]
    fn bad_filenames_fail_construction() {
        for name in ["about.txt", "2012-hello.txt", "12-03-05-short-year.txt"] {
            let err = parse_article_filename(Path::new(name)).unwrap_err();
            assert!(matches!(err, Error::InvalidFilename { .. }), "{name}");
        }
    }

    #[test]
    fn impossible_calendar_dates_fail_construction() {
        let err = parse_article_filename(Path::new("2012-2-30-leap.txt")).unwrap_err();
        assert!(matches!(err, Error::InvalidFilename { .. }));
    }

    #[test]
    fn accessors_parse_lazily_and_fall_back_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_article(
            dir.path(),
            "2012-03-05-hello.txt",
            "title: Hi\ntags: [intro]\n\nHi there~More text\n",
        );

        let config = Config::default();
        let article = Article::new(path, &config, formatter()).unwrap();
        assert_eq!(article.title().unwrap(), Some("Hi"));
        assert_eq!(article.author().unwrap(), "unknown");
        assert_eq!(article.tags().unwrap(), ["intro"]);
        assert_eq!(article.delimiter().unwrap(), "~");
        assert_eq!(article.summary().unwrap(), "Hi there");
        assert_eq!(article.body().unwrap(), "Hi thereMore text");
        assert_eq!(article.summary_html().unwrap(), "<p>Hi there</p>\n");
    }

    #[test]
    fn url_is_zero_padded() {
        let config = Config::default();
        let article =
            Article::new("2012-3-5-hello.txt", &config, formatter()).unwrap();
        assert_eq!(article.url(), "/2012/03/05/hello");
        assert_eq!(article.full_url(), "http://localhost:3000/2012/03/05/hello");
    }

    #[test]
    fn equality_is_path_equality() {
        let config = Config::default();
        let a = Article::new("2012-3-5-hello.txt", &config, formatter()).unwrap();
        let b = Article::new("2012-3-5-hello.txt", &config, formatter()).unwrap();
        let c = Article::new("2012-3-6-world.txt", &config, formatter()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn validation_reports_one_message_per_failed_check() {
        let dir = tempfile::tempdir().unwrap();
        // no title, broken tags; author comes from the config fallback
        let path = write_article(
            dir.path(),
            "2012-03-05-hello.txt",
            "tags: 7\n\nbody text\n",
        );

        let mut config = Config::default();
        config.author = String::new();
        let article = Article::new(path, &config, formatter()).unwrap();

        let messages = Messages::default();
        assert!(!article.validate(&messages).unwrap());
        let errors = article.errors(&messages).unwrap();
        assert_eq!(
            errors,
            ["Title is absent", "No author given", "Wrong tags given"]
        );
    }

    #[test]
    fn formatter_faults_become_validation_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_article(
            dir.path(),
            "2012-03-05-hello.txt",
            "title: Hi\nauthor: jane\n\nHi there~More text\n",
        );

        let config = Config::default();
        let article = Article::new(path, &config, Arc::new(FailingFormatter)).unwrap();

        let messages = Messages::default();
        assert!(!article.validate(&messages).unwrap());
        assert_eq!(
            article.errors(&messages).unwrap(),
            ["Failed to format summary", "Failed to format body"]
        );
    }

    #[test]
    fn errors_before_validate_runs_validation_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_article(
            dir.path(),
            "2012-03-05-hello.txt",
            "title: Hi\nauthor: jane\n\ncontent\n",
        );

        let config = Config::default();
        let article = Article::new(path, &config, formatter()).unwrap();
        let messages = Messages::default();
        assert!(article.errors(&messages).unwrap().is_empty());
        assert!(article.validate(&messages).unwrap());
    }
}
