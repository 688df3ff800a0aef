use core::result::Result as CoreResult;
use regex::Regex;
use sage_core::{Dataset, DatasetSource, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Lines that introduce or contain quoted replies in newsgroup posts.
const QUOTE_PATTERN: &str = r"(writes in|writes:|wrote:|says:|said:|^In article|^Quoted from|^\||^>)";

/// Default cap on samples, keeping training cheap on a laptop.
pub const DEFAULT_MAX_SAMPLES: usize = 500;

/// Labelled corpus laid out as one subdirectory per category, one file per sample
/// (the on-disk 20-newsgroups layout).
///
/// Samples are taken round-robin across categories so that a small
/// `max_samples` still covers every label.
#[derive(Debug, Clone)]
pub struct NewsgroupCorpus {
    root: PathBuf,
    max_samples: usize,
    strip_metadata: bool,
}

impl NewsgroupCorpus {
    /// Reads the corpus under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_samples: DEFAULT_MAX_SAMPLES,
            strip_metadata: true,
        }
    }

    /// Caps the number of samples read.
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Keep headers, quoted replies and signatures in the sample text.
    #[must_use]
    pub fn keep_metadata(mut self) -> Self {
        self.strip_metadata = false;
        self
    }

    fn sorted_children(dir: &Path, want_dirs: bool) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(CoreResult::ok)
            .filter(|entry: &DirEntry| entry.file_type().is_dir() == want_dirs)
            .map(DirEntry::into_path)
            .collect()
    }

    /// Interleaves per-category file lists until `max_samples` are chosen.
    fn round_robin(files: &[Vec<PathBuf>], max_samples: usize) -> Vec<(usize, &Path)> {
        let longest = files.iter().map(Vec::len).max().unwrap_or(0);
        let mut picked = Vec::new();

        'outer: for idx in 0..longest {
            for (label, category_files) in files.iter().enumerate() {
                if picked.len() >= max_samples {
                    break 'outer;
                }
                if let Some(path) = category_files.get(idx) {
                    picked.push((label, path.as_path()));
                }
            }
        }

        picked
    }
}

impl DatasetSource for NewsgroupCorpus {
    fn load_classification_dataset(&self) -> Result<Dataset> {
        if !self.root.is_dir() {
            return Err(Error::NotFound(format!(
                "Corpus directory {} does not exist",
                self.root.display()
            )));
        }

        let categories = Self::sorted_children(&self.root, true);
        let label_names: Vec<String> = categories
            .iter()
            .map(|dir| {
                dir.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();
        let files: Vec<Vec<PathBuf>> = categories
            .iter()
            .map(|dir| Self::sorted_children(dir, false))
            .collect();

        let quote_re = Regex::new(QUOTE_PATTERN)
            .map_err(|err| Error::Other(format!("Invalid quote pattern: {err}")))?;

        let picked = Self::round_robin(&files, self.max_samples);
        if picked.is_empty() {
            return Err(Error::NotFound(format!(
                "No samples found under {}",
                self.root.display()
            )));
        }

        let mut texts = Vec::with_capacity(picked.len());
        let mut labels = Vec::with_capacity(picked.len());
        for (label, path) in picked {
            let raw = String::from_utf8_lossy(&fs::read(path)?).into_owned();
            let text = if self.strip_metadata {
                strip_footer(&strip_quoting(&strip_header(&raw), &quote_re))
            } else {
                raw
            };
            texts.push(text);
            labels.push(label);
        }

        tracing::info!(
            samples = texts.len(),
            categories = label_names.len(),
            root = %self.root.display(),
            "Loaded classification corpus"
        );

        let mut dataset = Dataset::labelled(texts, labels, label_names);
        dataset.source = Some(self.root.display().to_string());
        Ok(dataset)
    }
}

/// Drops the header block (everything before the first blank line).
fn strip_header(text: &str) -> String {
    text.split_once("\n\n")
        .map_or_else(|| text.to_owned(), |(_, body)| body.to_owned())
}

/// Drops lines that quote or attribute other posts.
fn strip_quoting(text: &str, quote_re: &Regex) -> String {
    text.lines()
        .filter(|line| !quote_re.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drops a trailing signature, delimited by the last blank or dash-only line.
fn strip_footer(text: &str) -> String {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    let separator = lines
        .iter()
        .rposition(|line| line.trim_matches('-').trim().is_empty());

    match separator {
        Some(line_num) if line_num > 0 => lines[..line_num].join("\n"),
        _ => text.to_owned(),
    }
}
