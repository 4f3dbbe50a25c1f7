//! Human-readable message lookup for validation reports.
//!
//! The repository core never hardcodes user-facing text; it asks the
//! catalog by key so hosts can swap locales.

/// Locales shipped with the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Russian,
}

/// Keyed message catalog with `{param}` interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Messages { locale }
    }

    /// Look up `key`, interpolating `{name}` placeholders from `params`.
    /// Unknown keys come back verbatim so a missing translation never
    /// breaks a validation run.
    pub fn lookup(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = match self.locale {
            Locale::English => english(key),
            Locale::Russian => russian(key),
        };
        let mut text = template.unwrap_or(key).to_string();
        for (name, value) in params {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "no_title" => "Title is absent",
        "no_author" => "No author given",
        "wrong_tags" => "Wrong tags given",
        "summary_failed" => "Failed to format summary",
        "body_failed" => "Failed to format body",
        "invalid_filename" => "Failed to extract date or permalink from {path}",
        _ => return None,
    })
}

fn russian(key: &str) -> Option<&'static str> {
    Some(match key {
        "no_title" => "Заголовок пуст",
        "no_author" => "Автор не указан",
        "wrong_tags" => "Теги перечислены неверно",
        "summary_failed" => "Не получилось отформатировать сводку поста",
        "body_failed" => "Не получилось отформатировать тело поста",
        "invalid_filename" => "Не получилось извлечь дату или URL из файла {path}",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_lookup() {
        let messages = Messages::default();
        assert_eq!(messages.lookup("no_title", &[]), "Title is absent");
        assert_eq!(
            messages.lookup("invalid_filename", &[("path", "/dev/null")]),
            "Failed to extract date or permalink from /dev/null"
        );
    }

    #[test]
    fn russian_lookup() {
        let messages = Messages::new(Locale::Russian);
        assert_eq!(messages.lookup("no_author", &[]), "Автор не указан");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        assert_eq!(Messages::default().lookup("no_such_key", &[]), "no_such_key");
    }
}
