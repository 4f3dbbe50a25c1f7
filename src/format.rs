use pulldown_cmark::{html, Event, Options, Parser};

use crate::error::Error;

/// Turns raw content text into markup.
///
/// The repository itself is agnostic to the target markup; summary/body
/// formatting and validation only rely on this seam. A failing formatter
/// must report through `Err`, which validation converts into an error
/// entry instead of propagating.
pub trait Formatter: Send + Sync {
    fn format(&self, raw: &str) -> Result<String, Error>;
}

/// Default formatter: CommonMark with strikethrough and tables, and soft
/// breaks promoted to hard breaks.
#[derive(Debug, Default)]
pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format(&self, raw: &str) -> Result<String, Error> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);

        let parser = Parser::new_ext(raw, options).map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            _ => event,
        });

        let mut out = String::new();
        html::push_html(&mut out, parser);
        Ok(out)
    }
}
