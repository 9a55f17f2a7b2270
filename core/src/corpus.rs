//! Loading a labelled corpus from disk.
//!
//! Accepts a `.jsonl` file, a `.json` file (array or single object), or a
//! directory. Inside a directory, JSON files are parsed as above and every
//! other file is a plain-text document labelled by its parent directory, which
//! matches the usual `category/NNNN` newsgroup layout.

use crate::Document;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

lazy_static! {
    // Attribution lines and quoted text, matched anywhere in a line.
    static ref QUOTE_RE: Regex =
        Regex::new(r"(writes in|writes:|wrote:|says:|said:|^In article|^Quoted from|^\||^>)").expect("valid regex");
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    label: String,
    text: String,
}

/// Cleanup applied to plain-text documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop everything up to the first blank line.
    pub strip_headers: bool,
    /// Drop the signature block after the last `--` line.
    pub strip_footers: bool,
    /// Drop quoted lines and attributions such as "... writes:" or "In article".
    pub strip_quotes: bool,
}

impl LoadOptions {
    /// Headers, footers and quotes all removed.
    pub fn newsgroups() -> Self {
        Self { strip_headers: true, strip_footers: true, strip_quotes: true }
    }
}

pub fn load_corpus<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut docs = Vec::new();
    if path.is_dir() {
        let walker = WalkDir::new(path).sort_by_file_name().into_iter();
        for entry in walker.filter_entry(|e| e.depth() == 0 || !is_hidden(e)) {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            if !entry.file_type().is_file() { continue; }
            load_file(entry.path(), opts, &mut docs)?;
        }
    } else if path.is_file() {
        load_file(path, opts, &mut docs)?;
    } else {
        anyhow::bail!("corpus path {} does not exist", path.display());
    }
    tracing::info!(path = %path.display(), num_docs = docs.len(), "loaded corpus");
    Ok(docs)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

fn load_file(file: &Path, opts: &LoadOptions, docs: &mut Vec<Document>) -> Result<()> {
    match file.extension().and_then(|s| s.to_str()) {
        Some("jsonl") => load_jsonl(file, opts, docs),
        Some("json") => load_json(file, opts, docs),
        _ => load_text(file, opts, docs),
    }
}

fn load_jsonl(file: &Path, opts: &LoadOptions, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid document", file.display(), lineno + 1))?;
        docs.push(to_document(doc, opts));
    }
    Ok(())
}

fn load_json(file: &Path, opts: &LoadOptions, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v).with_context(|| format!("{}: invalid document", file.display()))?;
                docs.push(to_document(doc, opts));
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json).with_context(|| format!("{}: invalid document", file.display()))?;
            docs.push(to_document(doc, opts));
        }
        _ => tracing::warn!(file = %file.display(), "skipping json that is neither an object nor an array"),
    }
    Ok(())
}

fn load_text(file: &Path, opts: &LoadOptions, docs: &mut Vec<Document>) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    // Newsgroup posts are frequently latin-1; keep what decodes.
    let raw = String::from_utf8_lossy(&bytes);
    let label = file
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    docs.push(Document { label, text: clean(&raw, opts) });
    Ok(())
}

fn to_document(doc: InputDoc, opts: &LoadOptions) -> Document {
    Document { label: doc.label, text: clean(&doc.text, opts) }
}

/// Apply the configured header/footer/quote stripping.
pub fn clean(text: &str, opts: &LoadOptions) -> String {
    let mut body: &str = text;
    if opts.strip_headers {
        body = strip_header(body);
    }
    if opts.strip_footers {
        body = strip_footer(body);
    }
    if opts.strip_quotes {
        strip_quoting(body)
    } else {
        body.to_string()
    }
}

fn strip_header(text: &str) -> &str {
    match text.find("\n\n") {
        Some(pos) => &text[pos + 2..],
        None => text,
    }
}

fn strip_footer(text: &str) -> &str {
    let mut offset = 0;
    let mut cut = None;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == "--" {
            cut = Some(offset);
        }
        offset += line.len();
    }
    match cut {
        Some(pos) => &text[..pos],
        None => text,
    }
}

fn strip_quoting(text: &str) -> String {
    text.lines()
        .filter(|line| !QUOTE_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}
