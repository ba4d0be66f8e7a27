//! Veles CLI - Command-line tool for inspecting game data and diagnostics logs.
//!
//! This is the main entry point for the Veles command-line application.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use veles::diag::AssertRecord;
use veles::prelude::*;

/// Veles - game data inspection tool
#[derive(Parser)]
#[command(name = "veles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List info records declared in XML data
    InfosList {
        /// Info XML file or directory
        #[arg(short, long, env = "VELES_INFOS")]
        input: PathBuf,

        /// Substring filter on type keys
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Dump one info record with its resolved text
    InfosDump {
        /// Info XML file or directory
        #[arg(short, long, env = "VELES_INFOS")]
        input: PathBuf,

        /// Identity key of the record (e.g. UNIT_WARRIOR)
        #[arg(short, long)]
        r#type: String,

        /// Game text XML file or directory
        #[arg(long, env = "VELES_TEXT")]
        text: Option<PathBuf>,

        /// Language to resolve text in
        #[arg(short, long, default_value = "English")]
        language: String,

        /// Print the raw record as JSON instead
        #[arg(short, long)]
        json: bool,
    },

    /// Summarize a structured assertion log by fingerprint
    AssertsReport {
        /// Path to the AssertsJson.log file
        #[arg(short, long)]
        log: PathBuf,

        /// Group by "assert" (site) or "callstack" fingerprint
        #[arg(short, long, default_value = "assert")]
        by: String,

        /// Show only the N most frequent groups
        #[arg(short, long)]
        top: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InfosList { input, filter } => {
            cmd_infos_list(&input, filter.as_deref())?;
        }
        Commands::InfosDump {
            input,
            r#type,
            text,
            language,
            json,
        } => {
            cmd_infos_dump(&input, &r#type, text.as_deref(), &language, json)?;
        }
        Commands::AssertsReport { log, by, top } => {
            cmd_asserts_report(&log, &by, top)?;
        }
    }

    Ok(())
}

fn cmd_infos_list(input: &PathBuf, filter: Option<&str>) -> Result<()> {
    let table = load_info_table(input)?;

    let mut shown = 0;
    for (index, info) in table.iter().enumerate() {
        let ty = info.type_id().unwrap_or("(no type)");
        if let Some(pattern) = filter {
            if !ty.contains(pattern) {
                continue;
            }
        }

        let flag = if info.is_graphical_only() { "  [graphical]" } else { "" };
        println!("{:>5}  {}{}", index, ty, flag);
        shown += 1;
    }

    println!("\nTotal: {} records ({} shown)", table.len(), shown);
    Ok(())
}

fn cmd_infos_dump(
    input: &PathBuf,
    ty: &str,
    text: Option<&Path>,
    language: &str,
    json: bool,
) -> Result<()> {
    let table = load_info_table(input)?;
    let info = table
        .by_type(ty)
        .with_context(|| format!("No info record with type {}", ty))?;

    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    let texts = load_text_source(text, language)?;
    println!("Type:        {}", info.type_id().unwrap_or(""));
    println!("Graphical:   {}", info.is_graphical_only());
    println!("Button:      {}", info.button());
    println!("Description: {}", info.description(texts.as_ref(), 0));
    println!("Text:        {}", info.text(texts.as_ref()));
    println!("Civilopedia: {}", info.civilopedia(texts.as_ref()));
    println!("Help:        {}", info.help(texts.as_ref()));
    println!("Strategy:    {}", info.strategy(texts.as_ref()));
    Ok(())
}

fn cmd_asserts_report(log: &PathBuf, by: &str, top: Option<usize>) -> Result<()> {
    let contents =
        fs::read_to_string(log).with_context(|| format!("Failed to read {}", log.display()))?;

    let mut groups: HashMap<String, AssertGroup> = HashMap::new();
    let mut total = 0usize;
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: AssertRecord = serde_json::from_str(line)
            .with_context(|| format!("Bad record on line {}", number + 1))?;

        let key = match by {
            "assert" => record.assert_key,
            "callstack" => record.callstack_key,
            other => bail!("Unknown grouping {:?} (use assert or callstack)", other),
        };
        let group = groups.entry(key).or_default();
        group.count += 1;
        if group.example.is_none() {
            group.example = record.msg;
        }
        total += 1;
    }

    let mut sorted: Vec<_> = groups.into_iter().collect();
    sorted.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    let distinct = sorted.len();
    if let Some(top) = top {
        sorted.truncate(top);
    }

    println!("{} records, {} distinct {} keys\n", total, distinct, by);
    for (key, group) in &sorted {
        match &group.example {
            Some(msg) => println!("{:>6}  {}  ({})", group.count, key, msg),
            None => println!("{:>6}  {}", group.count, key),
        }
    }
    Ok(())
}

#[derive(Default)]
struct AssertGroup {
    count: usize,
    example: Option<String>,
}

/// Load and merge every info XML file at `path`, a single file or a
/// directory scanned recursively in file name order.
fn load_info_table(path: &Path) -> Result<InfoTable<InfoBase>> {
    let start = Instant::now();
    let mut table = InfoTable::new();

    for file in xml_files(path)? {
        let document = XmlDocument::from_file(&file)
            .with_context(|| format!("Failed to parse {}", file.display()))?;

        let mut count = 0;
        for element in document.descendants() {
            if element.child_by_tag("Type").is_none() {
                continue;
            }
            let mut info = InfoBase::new();
            info.read(&element)?;
            table.merge(info);
            count += 1;
        }
        println!("Loaded {} records from {}", count, file.display());
    }

    println!("{} records total in {:?}", table.len(), start.elapsed());
    Ok(table)
}

fn load_text_source(path: Option<&Path>, language: &str) -> Result<Box<dyn TextSource>> {
    let path = match path {
        Some(path) => path,
        None => return Ok(Box::new(KeyEchoSource)),
    };

    let mut source = XmlTextSource::new(language);
    for file in xml_files(path)? {
        let document = XmlDocument::from_file(&file)
            .with_context(|| format!("Failed to parse {}", file.display()))?;
        source.load_document(&document);
    }
    println!("Loaded {} text entries for {}", source.len(), source.language());
    Ok(Box::new(source))
}

/// Expand `path` into the XML files it names, recursing into directories.
fn xml_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("xml")
        {
            files.push(entry.into_path());
        }
    }

    anyhow::ensure!(!files.is_empty(), "No XML files found under {}", path.display());
    Ok(files)
}
