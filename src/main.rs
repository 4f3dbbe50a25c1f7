use anyhow::bail;
use clap::{command, Arg, ArgAction};
use log::warn;
use std::path::PathBuf;

use quire::{ArticleIndex, Config, ListOptions, Messages, PageIndex};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .args([
            Arg::new("articles_dir")
                .help("Directory path of articles")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("articles"),
            Arg::new("pages_dir")
                .help("Directory path of pages")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("pages"),
            Arg::new("tag")
                .long("tag")
                .help("Only list articles carrying this tag"),
            Arg::new("match")
                .long("match")
                .action(ArgAction::Append)
                .help("Filename fragments to look up, in filename order (year month day slug)"),
            Arg::new("limit")
                .long("limit")
                .value_parser(clap::value_parser!(usize))
                .help("Maximum number of articles to list"),
            Arg::new("offset")
                .long("offset")
                .value_parser(clap::value_parser!(usize))
                .default_value("0")
                .help("Number of articles to skip"),
            Arg::new("future")
                .long("future")
                .action(ArgAction::SetTrue)
                .help("Include articles dated after today"),
            Arg::new("tags")
                .long("tags")
                .action(ArgAction::SetTrue)
                .help("Print tag frequencies instead of a listing"),
            Arg::new("check")
                .long("check")
                .action(ArgAction::SetTrue)
                .help("Validate every article and page"),
        ])
        .get_matches();

    let articles_dir: &PathBuf = matches.get_one("articles_dir").unwrap();
    if !articles_dir.exists() || !articles_dir.is_dir() {
        bail!("articles_dir must be a directory.");
    }

    let mut config = Config::default();
    config.articles_dir = articles_dir.to_owned();
    config.pages_dir = matches.get_one::<PathBuf>("pages_dir").unwrap().to_owned();
    config.allow_future = matches.get_flag("future");
    if let Ok(author) = std::env::var("QUIRE_AUTHOR") {
        config.author = author;
    }
    if let Ok(url) = std::env::var("QUIRE_URL") {
        config.base_url = url;
    }

    let index = ArticleIndex::new(config.clone());

    if matches.get_flag("tags") {
        for (tag, count) in index.tags() {
            println!("{count:4}  {tag}");
        }
        return Ok(());
    }

    if matches.get_flag("check") {
        return check(&index, &PageIndex::new(config));
    }

    let articles = match matches.get_many::<String>("match") {
        Some(parts) => {
            let parts: Vec<&str> = parts.map(String::as_str).collect();
            index.find(&parts)
        }
        None => {
            let mut options = ListOptions::default();
            if let Some(limit) = matches.get_one::<usize>("limit") {
                options.limit = *limit;
            }
            options.offset = *matches.get_one::<usize>("offset").unwrap();
            options.tag = matches.get_one::<String>("tag").cloned();
            index.all(&options)
        }
    };

    for article in &articles {
        let title = match article.title() {
            Ok(Some(title)) => title.to_string(),
            Ok(None) => "(untitled)".to_string(),
            Err(e) => {
                warn!("could not read {:?}: {e}", article.path());
                "(unreadable)".to_string()
            }
        };
        println!("{}  {:24}  {title}", article.date(), article.permalink());
    }

    Ok(())
}

fn check(articles: &ArticleIndex, pages: &PageIndex) -> anyhow::Result<()> {
    let messages = Messages::default();
    let mut invalid = 0usize;

    for article in articles.find::<&str>(&[]) {
        match article.errors(&messages) {
            Ok(errors) if errors.is_empty() => {}
            Ok(errors) => {
                invalid += 1;
                println!("{}:", article.path().display());
                for error in errors {
                    println!("  - {error}");
                }
            }
            Err(e) => {
                invalid += 1;
                println!("{}:\n  - {e}", article.path().display());
            }
        }
    }

    for page in pages.all() {
        match page.errors(&messages) {
            Ok(errors) if errors.is_empty() => {}
            Ok(errors) => {
                invalid += 1;
                println!("{}:", page.path().display());
                for error in errors {
                    println!("  - {error}");
                }
            }
            Err(e) => {
                invalid += 1;
                println!("{}:\n  - {e}", page.path().display());
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} invalid content item(s)");
    }
    println!("all content items are valid");
    Ok(())
}
