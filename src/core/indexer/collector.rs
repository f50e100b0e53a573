//! Source directory scanner with pattern-based filtering.
//!
//! Lists the PDF files directly inside each configured source
//! directory. Output order is deterministic: directories in
//! configuration order, files sorted by name within a directory.

use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::{PdfVecError, Result};
use crate::core::types::SourceDocument;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Result of scanning the source directories
#[derive(Debug, Default)]
pub struct Collection {
    /// Documents to extract, in enumeration order
    pub documents: Vec<SourceDocument>,

    /// Matching files rejected for exceeding the size limit
    pub oversized: Vec<PathBuf>,
}

impl Collection {
    /// Every matching file, including the oversized ones
    pub fn found(&self) -> usize {
        self.documents.len() + self.oversized.len()
    }
}

/// Enumerates eligible documents across source directories
pub struct FileCollector {
    /// File name patterns to include (e.g., "*.pdf")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (matched against name and full path)
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,

    /// Create source directories that are missing
    create_missing_dirs: bool,
}

impl FileCollector {
    /// Create a new collector
    ///
    /// # Arguments
    ///
    /// * `include_patterns` - Glob patterns for files to include
    /// * `exclude_patterns` - Glob patterns for files to exclude
    /// * `max_file_size_mb` - Maximum file size in megabytes
    /// * `create_missing_dirs` - Create absent source directories
    ///
    /// # Returns
    ///
    /// A new `FileCollector` or an error if a pattern is invalid
    pub fn new(
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
        create_missing_dirs: bool,
    ) -> Result<Self> {
        let include = parse_patterns(include_patterns, "include")?;
        let exclude = parse_patterns(exclude_patterns, "exclude")?;

        Ok(Self {
            include_patterns: include,
            exclude_patterns: exclude,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
            create_missing_dirs,
        })
    }

    /// Collect documents from every source directory, in order
    pub fn collect(&self, source_dirs: &[PathBuf]) -> Result<Collection> {
        let mut collection = Collection::default();

        for dir in source_dirs {
            if !dir.is_dir() {
                if self.create_missing_dirs {
                    tracing::warn!("Directory {:?} does not exist, creating it", dir);
                    fs::create_dir_all(dir)?;
                } else {
                    tracing::warn!("Directory {:?} does not exist, skipping", dir);
                }
                continue;
            }

            let before = collection.found();
            self.collect_dir(dir, &mut collection);
            tracing::info!("Found {} PDF files in {:?}", collection.found() - before, dir);
        }

        Ok(collection)
    }

    /// Collect matching files directly inside one directory
    fn collect_dir(&self, dir: &Path, collection: &mut Collection) {
        let category = category_name(dir);

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();

                    if !self.matches_patterns(path) {
                        continue;
                    }

                    if let Ok(metadata) = entry.metadata() {
                        if metadata.len() > self.max_file_size_bytes {
                            tracing::warn!(
                                "Skipping {:?}: {} bytes exceeds the {} byte limit",
                                path,
                                metadata.len(),
                                self.max_file_size_bytes
                            );
                            collection.oversized.push(path.to_path_buf());
                            continue;
                        }
                    }

                    let title = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();

                    collection.documents.push(SourceDocument {
                        path: path.to_path_buf(),
                        title,
                        category: category.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }
    }

    /// Check if a file path matches the include/exclude patterns
    fn matches_patterns(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|f| f.to_str()) {
            Some(n) => n,
            None => return false,
        };

        let matches_include = self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| p.matches_with(name, MATCH_OPTIONS));

        if !matches_include {
            return false;
        }

        !self.exclude_patterns.iter().any(|p| {
            p.matches_with(name, MATCH_OPTIONS) || p.matches_path_with(path, MATCH_OPTIONS)
        })
    }
}

fn parse_patterns(patterns: Vec<String>, kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|p| {
            Pattern::new(&p).map_err(|e| {
                PdfVecError::Config(format!("Invalid {kind} pattern '{p}': {e}"))
            })
        })
        .collect()
}

/// The directory's own name, used as the document category
fn category_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }
    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| dir.display().to_string())
}
