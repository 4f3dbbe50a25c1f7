use std::path::Path;

use serde::Serialize;
use serde_yaml::Value;

use crate::error::Error;

/// Metadata block of a content file, as written by the author.
///
/// Serializable so the templating layer can hand it to its render context
/// as-is. Absent keys stay `None`; item-level accessors apply the
/// configured fallbacks.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub delimiter: Option<String>,
}

/// One fully read content file: metadata block plus the raw text after it.
///
/// Loaded at most once per item and cached there; everything derived
/// (summary, body, validation) works off this.
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub meta: Metadata,
    /// Cleared when the `tags` key exists but is not a sequence of strings.
    pub tags_well_formed: bool,
    pub raw: String,
}

impl Document {
    /// Read `path` and split it at the first blank line into a YAML
    /// metadata block and the raw content.
    pub fn load(path: &Path) -> Result<Document, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let (head, raw) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::malformed(path, "no blank line after the metadata block"))?;

        let value: Value = serde_yaml::from_str(head)
            .map_err(|e| Error::malformed(path, e.to_string()))?;
        if !value.is_mapping() {
            return Err(Error::malformed(path, "metadata block is not a key-value mapping"));
        }

        let string_key = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let (tags, tags_well_formed) = match value.get("tags") {
            None => (Vec::new(), true),
            Some(Value::Sequence(seq)) => {
                let strings: Vec<String> = seq
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                let well_formed = strings.len() == seq.len();
                (strings, well_formed)
            }
            Some(_) => (Vec::new(), false),
        };

        Ok(Document {
            meta: Metadata {
                title: string_key("title"),
                author: string_key("author"),
                tags,
                delimiter: string_key("delimiter"),
            },
            tags_well_formed,
            raw: raw.to_string(),
        })
    }

    /// Split the raw content once on `delimiter`.
    ///
    /// Returns `(summary, body)`: summary is the text before the first
    /// delimiter occurrence, body is the whole text with that occurrence
    /// removed, both with one trailing newline trimmed. With no delimiter
    /// in the text the two are identical.
    pub fn split_summary(&self, delimiter: &str) -> (String, String) {
        match self.raw.split_once(delimiter) {
            Some((before, after)) => {
                let mut body = String::with_capacity(before.len() + after.len());
                body.push_str(before);
                body.push_str(after);
                (chomp(before).to_string(), chomp(&body).to_string())
            }
            None => {
                let whole = chomp(&self.raw).to_string();
                (whole.clone(), whole)
            }
        }
    }
}

/// Trim exactly one trailing line break, like Ruby's `chomp`.
fn chomp(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_doc(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2012-03-05-hello.txt");
        let mut fd = std::fs::File::create(&path).unwrap();
        fd.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_metadata_and_content() {
        let (_dir, path) = write_doc(
            "title: Hi\nauthor: jane\ntags: [intro, misc]\n\nHi there~More text\n",
        );
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.meta.title.as_deref(), Some("Hi"));
        assert_eq!(doc.meta.author.as_deref(), Some("jane"));
        assert_eq!(doc.meta.tags, vec!["intro", "misc"]);
        assert!(doc.tags_well_formed);
        assert_eq!(doc.raw, "Hi there~More text\n");
    }

    #[test]
    fn splits_summary_once_on_delimiter() {
        let (_dir, path) = write_doc("title: Hi\n\nHi there~More text\n");
        let doc = Document::load(&path).unwrap();
        let (summary, body) = doc.split_summary("~");
        assert_eq!(summary, "Hi there");
        assert_eq!(body, "Hi thereMore text");
    }

    #[test]
    fn no_delimiter_means_summary_equals_body() {
        let (_dir, path) = write_doc("title: World\n\nOnly one block here\n");
        let doc = Document::load(&path).unwrap();
        let (summary, body) = doc.split_summary("~");
        assert_eq!(summary, body);
        assert_eq!(summary, "Only one block here");
    }

    #[test]
    fn later_delimiter_occurrences_are_kept() {
        let (_dir, path) = write_doc("title: Hi\n\na~b~c");
        let doc = Document::load(&path).unwrap();
        let (summary, body) = doc.split_summary("~");
        assert_eq!(summary, "a");
        assert_eq!(body, "ab~c");
    }

    #[test]
    fn missing_blank_line_is_malformed() {
        let (_dir, path) = write_doc("title: Hi\nno separator anywhere");
        let err = Document::load(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { .. }), "got {err:?}");
    }

    #[test]
    fn non_mapping_head_is_malformed() {
        let (_dir, path) = write_doc("just a scalar\n\nbody\n");
        let err = Document::load(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { .. }), "got {err:?}");
    }

    #[test]
    fn non_string_tags_clear_the_well_formed_flag() {
        let (_dir, path) = write_doc("title: Hi\ntags: [ok, 3]\n\nbody\n");
        let doc = Document::load(&path).unwrap();
        assert!(!doc.tags_well_formed);
        assert_eq!(doc.meta.tags, vec!["ok"]);
    }
}
