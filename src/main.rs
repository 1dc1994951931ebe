//! mf2 - Microformats2 extraction tool

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use url::Url;

#[derive(Parser)]
#[command(name = "mf2")]
#[command(version, about = "Microformats2 extraction tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a document and print canonical MF2 JSON
    Parse {
        /// Input HTML file
        file: String,

        /// Base URL for resolving relative URLs
        #[arg(long)]
        base: Option<String>,

        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Show a summary of the items in a document
    Info {
        /// Input HTML file
        file: String,

        /// Base URL for resolving relative URLs
        #[arg(long)]
        base: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse {
            file,
            base,
            compact,
        } => run_parse(&file, base.as_deref(), compact),
        Command::Info { file, base, json } => run_info(&file, base.as_deref(), json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_file(path: &str, base: Option<&str>) -> mf2::Result<mf2::Document> {
    let html = std::fs::read_to_string(path)?;
    match base {
        Some(raw) => {
            let url = Url::parse(raw)?;
            mf2::parse_with_base(&html, url)
        }
        None => mf2::parse(&html),
    }
}

fn run_parse(path: &str, base: Option<&str>, compact: bool) -> mf2::Result<()> {
    let document = parse_file(path, base)?;
    if compact {
        println!("{}", serde_json::to_string(&document.as_raw_data())?);
    } else {
        println!("{}", document.as_json()?);
    }
    Ok(())
}

// JSON output structures for `info`
#[derive(Serialize)]
struct DocumentInfo {
    file: String,
    items: usize,
    top_level: Vec<ItemInfo>,
}

#[derive(Serialize)]
struct ItemInfo {
    types: Vec<String>,
    properties: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ItemInfo>,
}

fn run_info(path: &str, base: Option<&str>, json: bool) -> mf2::Result<()> {
    let document = parse_file(path, base)?;

    if json {
        let info = DocumentInfo {
            file: path.to_string(),
            items: document.len(),
            top_level: document
                .top_level_items
                .iter()
                .map(|id| item_info(&document, *id))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("File: {path}");
        println!(
            "Items: {} ({} top-level)",
            document.len(),
            document.top_level_items.len()
        );
        for id in &document.top_level_items {
            print_item(&document, *id, 1);
        }
    }
    Ok(())
}

fn item_info(document: &mf2::Document, id: mf2::ItemId) -> ItemInfo {
    let item = document.get(id);
    ItemInfo {
        types: item.types.clone(),
        properties: item.properties.values().map(Vec::len).sum(),
        children: item
            .children
            .iter()
            .map(|child| item_info(document, *child))
            .collect(),
    }
}

fn print_item(document: &mf2::Document, id: mf2::ItemId, depth: usize) {
    let item = document.get(id);
    let indent = "  ".repeat(depth);
    let keys: Vec<&str> = item.properties.keys().map(String::as_str).collect();
    println!("{}h-{} [{}]", indent, item.types.join(" h-"), keys.join(", "));
    for child in &item.children {
        print_item(document, *child, depth + 1);
    }
}
