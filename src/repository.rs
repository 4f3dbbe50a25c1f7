use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use regex::RegexBuilder;

use crate::article::Article;
use crate::config::Config;
use crate::format::{Formatter, MarkdownFormatter};
use crate::page::Page;

/// Where candidate content files come from.
///
/// The filesystem scan lives behind this seam so tests (or a future
/// database-backed store) can substitute an in-memory listing.
pub trait PathSource: Send + Sync {
    /// All candidate file paths, lexicographically ascending.
    fn list_paths(&self) -> Vec<PathBuf>;
}

/// Non-recursive directory listing. A missing directory is an empty
/// source, not an error.
#[derive(Debug)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSource { dir: dir.into() }
    }
}

impl PathSource for DirSource {
    fn list_paths(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("not listing {:?}: {e}", self.dir);
                return Vec::new();
            }
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .collect();
        paths.sort();
        paths
    }
}

/// Pagination and filtering for [`ArticleIndex::all`].
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub limit: usize,
    pub offset: usize,
    pub tag: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            limit: 10_000,
            offset: 0,
            tag: None,
        }
    }
}

/// Ordered, filtered views over the articles directory.
///
/// The path listing and the tag frequency map are each computed once per
/// index and then read-only; restart (or a fresh index) is the only cache
/// invalidation. Articles themselves are constructed per query, which
/// only parses filenames; file contents stay lazy.
pub struct ArticleIndex {
    config: Config,
    formatter: Arc<dyn Formatter>,
    source: Box<dyn PathSource>,
    paths: OnceCell<Vec<PathBuf>>,
    tag_counts: OnceCell<BTreeMap<String, usize>>,
}

impl ArticleIndex {
    pub fn new(config: Config) -> Self {
        Self::with_formatter(config, Arc::new(MarkdownFormatter))
    }

    pub fn with_formatter(config: Config, formatter: Arc<dyn Formatter>) -> Self {
        let source = Box::new(DirSource::new(&config.articles_dir));
        Self::with_source(config, formatter, source)
    }

    pub fn with_source(
        config: Config,
        formatter: Arc<dyn Formatter>,
        source: Box<dyn PathSource>,
    ) -> Self {
        ArticleIndex {
            config,
            formatter,
            source,
            paths: OnceCell::new(),
            tag_counts: OnceCell::new(),
        }
    }

    /// Candidate paths, newest-dated filenames first.
    fn paths(&self) -> &[PathBuf] {
        self.paths.get_or_init(|| {
            let mut paths = self.source.list_paths();
            paths.sort();
            paths.reverse();
            paths
        })
    }

    /// A file that is not a well-formed article is not an error at the
    /// index level, it is just not a publishable item.
    fn open(&self, path: &Path) -> Option<Article> {
        match Article::new(path, &self.config, Arc::clone(&self.formatter)) {
            Ok(article) => Some(article),
            Err(e) => {
                debug!("skipping {path:?}: {e}");
                None
            }
        }
    }

    fn publishable(&self, article: &Article, today: NaiveDate) -> bool {
        self.config.allow_future || article.date() <= today
    }

    /// All publishable articles, newest first, sliced by
    /// `options.offset`/`options.limit` after filtering.
    ///
    /// Tag matching is case-sensitive but space-insensitive: spaces on
    /// both sides are normalized to hyphens before comparison. An article
    /// whose metadata cannot be read is dropped from tag-filtered
    /// listings rather than failing the whole query.
    pub fn all(&self, options: &ListOptions) -> Vec<Article> {
        let today = today();
        let wanted = options.tag.as_deref().map(normalize_tag);

        let mut matched = Vec::new();
        for path in self.paths() {
            let Some(article) = self.open(path) else {
                continue;
            };
            if !self.publishable(&article, today) {
                continue;
            }
            if let Some(ref wanted) = wanted {
                match article.tags() {
                    Ok(tags) => {
                        if !tags.iter().any(|t| normalize_tag(t) == *wanted) {
                            continue;
                        }
                    }
                    Err(e) => {
                        warn!("dropping {:?} from tag listing: {e}", article.path());
                        continue;
                    }
                }
            }
            matched.push(article);
        }

        matched
            .into_iter()
            .skip(options.offset)
            .take(options.limit)
            .collect()
    }

    /// Articles whose filename contains the given fragments joined by
    /// hyphens, in listing order.
    ///
    /// Fragments must appear in filename order (year, month, day, slug);
    /// single-digit numeric fragments are zero-padded first, and the
    /// match is case-insensitive. No fragments matches every article.
    pub fn find<S: AsRef<str>>(&self, parts: &[S]) -> Vec<Article> {
        let pattern = parts
            .iter()
            .map(|p| zero_pad(p.as_ref()))
            .collect::<Vec<_>>()
            .join("-");
        // escaped fragments always compile
        let matcher = RegexBuilder::new(&regex::escape(&pattern))
            .case_insensitive(true)
            .build()
            .unwrap();

        let today = today();
        self.paths()
            .iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| matcher.is_match(n))
            })
            .filter_map(|path| self.open(path))
            .filter(|article| self.publishable(article, today))
            .collect()
    }

    /// First match of [`ArticleIndex::find`], if any.
    pub fn first<S: AsRef<str>>(&self, parts: &[S]) -> Option<Article> {
        self.find(parts).into_iter().next()
    }

    /// Tag frequencies across every publishable article.
    ///
    /// Cold path: the first call reads and parses every article file, and
    /// the result is kept for the index lifetime.
    pub fn tags(&self) -> &BTreeMap<String, usize> {
        self.tag_counts.get_or_init(|| {
            let mut freqs = BTreeMap::new();
            for article in self.find::<&str>(&[]) {
                match article.tags() {
                    Ok(tags) => {
                        for tag in tags {
                            *freqs.entry(tag.clone()).or_insert(0) += 1;
                        }
                    }
                    Err(e) => warn!("no tags from {:?}: {e}", article.path()),
                }
            }
            freqs
        })
    }
}

/// Lookup over the pages directory. Pages have no date, so listing order
/// is plain lexicographic.
pub struct PageIndex {
    config: Config,
    formatter: Arc<dyn Formatter>,
    source: Box<dyn PathSource>,
}

impl PageIndex {
    pub fn new(config: Config) -> Self {
        Self::with_formatter(config, Arc::new(MarkdownFormatter))
    }

    pub fn with_formatter(config: Config, formatter: Arc<dyn Formatter>) -> Self {
        let source = Box::new(DirSource::new(&config.pages_dir));
        Self::with_source(config, formatter, source)
    }

    pub fn with_source(
        config: Config,
        formatter: Arc<dyn Formatter>,
        source: Box<dyn PathSource>,
    ) -> Self {
        PageIndex {
            config,
            formatter,
            source,
        }
    }

    pub fn all(&self) -> Vec<Page> {
        self.source
            .list_paths()
            .into_iter()
            .filter_map(|path| {
                Page::new(path, &self.config, Arc::clone(&self.formatter)).ok()
            })
            .collect()
    }

    /// The page whose filename stem is exactly `slug`.
    pub fn find(&self, slug: &str) -> Option<Page> {
        self.source
            .list_paths()
            .into_iter()
            .find(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|stem| stem == slug)
            })
            .and_then(|path| Page::new(path, &self.config, Arc::clone(&self.formatter)).ok())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn normalize_tag(tag: &str) -> String {
    tag.replace(' ', "-")
}

fn zero_pad(part: &str) -> String {
    if part.len() == 1 && part.chars().all(|c| c.is_ascii_digit()) {
        format!("0{part}")
    } else {
        part.to_string()
    }
}
