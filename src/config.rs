use std::path::PathBuf;

/// Process-wide settings for the repository layer.
///
/// Passed explicitly into the indexes and items instead of living in a
/// global, so independent configurations can coexist in one process
/// (tests, multi-site hosts).
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding date-named article files.
    pub articles_dir: PathBuf,
    /// Directory holding page files (bare permalink names).
    pub pages_dir: PathBuf,
    /// Include articles dated after today in listings.
    pub allow_future: bool,
    /// Fallback author when the metadata block has none.
    pub author: String,
    /// Fallback summary delimiter when the metadata block has none.
    pub summary_delimiter: String,
    /// Site root prepended by `Article::full_url`.
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            articles_dir: PathBuf::from("articles"),
            pages_dir: PathBuf::from("pages"),
            allow_future: false,
            author: "unknown".to_string(),
            summary_delimiter: "~".to_string(),
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// The per-item slice of [`Config`]: the fallbacks an already-constructed
/// item still needs when its metadata block leaves fields out.
#[derive(Debug, Clone)]
pub(crate) struct ItemDefaults {
    pub author: String,
    pub summary_delimiter: String,
    pub base_url: String,
}

impl From<&Config> for ItemDefaults {
    fn from(config: &Config) -> Self {
        ItemDefaults {
            author: config.author.clone(),
            summary_delimiter: config.summary_delimiter.clone(),
            base_url: config.base_url.clone(),
        }
    }
}
