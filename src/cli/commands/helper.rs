use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::{Finding, Severity};
use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{Candidate, Dialect, Scanner, Session, file_scanner::scan_files},
    utils::LineIndex,
};

/// Loaded configuration plus the directory every relative path is resolved against.
pub struct Workspace {
    pub config: Config,
    pub root: PathBuf,
}

impl Workspace {
    pub fn load(common: &CommonArgs) -> Result<Self> {
        let start_dir = match &common.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let loaded = load_config(&start_dir)?;
        let mut config = loaded.config;
        let root = common.root.clone().unwrap_or(loaded.root);

        if let Some(language) = &common.source_language {
            config.source_language = language.clone();
            config.validate()?;
        }

        if !loaded.from_file {
            log::info!("no config file found, using defaults");
        }

        Ok(Self { config, root })
    }

    /// Path as shown to the user: relative to the root when possible.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Session over this root with every configured dictionary loaded.
    pub fn open_session(&self) -> (Session, Vec<String>) {
        let mut session = Session::open(&self.root);
        let files: Vec<&str> = self
            .config
            .languages
            .iter()
            .map(|mapping| mapping.file.as_str())
            .collect();
        session.dictionaries(&files);
        let warnings = session
            .warnings()
            .iter()
            .map(|warning| warning.to_string())
            .collect();
        (session, warnings)
    }

    /// Collect source files and scan each one in parallel.
    pub fn scan(&self) -> Result<ScannedWorkspace> {
        let filter = self.config.text_filter.build()?;
        let scanner = Scanner::new(&self.config.property_names, filter);
        let dictionaries = self.config.dictionary_paths(&self.root);

        let collected = scan_files(
            &self.root,
            &self.config.includes,
            &self.config.ignores,
            &dictionaries,
        );

        let paths: Vec<&String> = collected.files.iter().collect();
        let results: Vec<Result<ScannedFile, String>> = paths
            .par_iter()
            .map(|file| {
                let path = PathBuf::from(file);
                let content = fs::read_to_string(&path).map_err(|err| {
                    log::warn!("cannot read {}: {}", path.display(), err);
                    (*file).clone()
                })?;
                let display_path = self.display_path(&path);
                let dialect = Dialect::detect(&path, content.as_str());
                let candidates = scanner
                    .clone()
                    .with_source_file(display_path.clone())
                    .with_markup(dialect.has_markup())
                    .scan(&content);
                Ok(ScannedFile {
                    path,
                    display_path,
                    content,
                    dialect,
                    candidates,
                })
            })
            .collect();

        let mut files = Vec::with_capacity(results.len());
        let mut unreadable_count = collected.skipped_count;
        for result in results {
            match result {
                Ok(file) => files.push(file),
                Err(_) => unreadable_count += 1,
            }
        }

        Ok(ScannedWorkspace {
            files,
            unreadable_count,
        })
    }
}

/// A source file with its candidates.
pub struct ScannedFile {
    pub path: PathBuf,
    pub display_path: String,
    pub content: String,
    /// Probe used to synthesize replacements for this file.
    pub dialect: Dialect,
    pub candidates: Vec<Candidate>,
}

pub struct ScannedWorkspace {
    /// Files in path order.
    pub files: Vec<ScannedFile>,
    pub unreadable_count: usize,
}

impl ScannedWorkspace {
    pub fn candidate_count(&self) -> usize {
        self.files.iter().map(|file| file.candidates.len()).sum()
    }
}

/// Build a finding located at `candidate`'s start in `file`.
pub fn finding_at(
    file: &ScannedFile,
    index: &LineIndex,
    candidate: &Candidate,
    severity: Severity,
    notes: Vec<String>,
) -> Finding {
    let (line, col) = index.line_col(&file.content, candidate.start);
    Finding {
        file_path: file.display_path.clone(),
        line,
        col,
        source_line: index.line_text(&file.content, line).to_string(),
        severity,
        message: candidate.text.clone(),
        context: candidate.context(),
        notes,
    }
}

/// `path:line:col` of a candidate.
pub fn location(file: &ScannedFile, index: &LineIndex, candidate: &Candidate) -> String {
    let (line, col) = index.line_col(&file.content, candidate.start);
    format!("{}:{}:{}", file.display_path, line, col)
}
