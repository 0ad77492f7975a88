use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::{ConfigError, IoError};

// @module: File discovery and path utilities

/// Prefix of an include pattern
pub const INCLUDE_PREFIX: &str = "[+]";

/// Prefix of an exclude pattern
pub const EXCLUDE_PREFIX: &str = "[-]";

/// One include or exclude glob compiled to a regular expression.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    include: bool,
    regex: Regex,
}

impl FilePattern {
    /// Parse `[+]glob`, `[-]glob` or a bare glob (an include).
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let (include, glob) = if let Some(glob) = pattern.strip_prefix(INCLUDE_PREFIX) {
            (true, glob)
        } else if let Some(glob) = pattern.strip_prefix(EXCLUDE_PREFIX) {
            (false, glob)
        } else {
            (true, pattern)
        };

        if glob.is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "empty glob".to_string(),
            });
        }

        let regex = Regex::new(&glob_to_regex(glob)).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            include,
            regex,
        })
    }

    pub fn is_include(&self) -> bool {
        self.include
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether a relative path with `/` separators matches the glob
    pub fn matches(&self, relative: &str) -> bool {
        self.regex.is_match(relative)
    }
}

// @converts: Glob syntax to an anchored regex
// `*` stays within a segment, `**` crosses segments, `?` is one character
fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::from("^");
    let chars: Vec<char> = glob.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    regex.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    regex.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    regex.push('$');
    regex
}

/// Ordered include and exclude patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<FilePattern>,
}

impl PatternSet {
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| FilePattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn has_includes(&self) -> bool {
        self.patterns.iter().any(FilePattern::is_include)
    }

    /// Selected when at least one include and no exclude matches
    pub fn matches(&self, relative: &str) -> bool {
        let mut included = false;
        for pattern in &self.patterns {
            if pattern.matches(relative) {
                if !pattern.is_include() {
                    return false;
                }
                included = true;
            }
        }
        included
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), IoError> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).map_err(|source| IoError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// File name of the interchange file for a document identifier.
    ///
    /// Characters outside `[A-Za-z0-9._-]` become `_`; an empty identifier
    /// maps to `document`.
    pub fn output_file_name(document_id: &str) -> String {
        let sanitized: String = document_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
            .collect();

        let stem = if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
            "document".to_string()
        } else {
            sanitized
        };
        format!("{}.xmi", stem)
    }

    // @generates: Output path for a document's interchange file
    pub fn output_path<P: AsRef<Path>>(output_dir: P, document_id: &str) -> PathBuf {
        output_dir.as_ref().join(Self::output_file_name(document_id))
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Files under `dir` selected by `patterns`, sorted by relative path
    pub fn find_matching<P: AsRef<Path>>(dir: P, patterns: &PatternSet) -> Result<Vec<PathBuf>, IoError> {
        let dir = dir.as_ref();
        let mut result = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| IoError::Read {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: io::Error::from(e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = Self::relative_path(dir, entry.path());
            if patterns.matches(&relative) {
                result.push((relative, entry.into_path()));
            }
        }

        result.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(result.into_iter().map(|(_, path)| path).collect())
    }

    // @returns: Path relative to base with `/` separators
    fn relative_path(base: &Path, path: &Path) -> String {
        let relative = path.strip_prefix(base).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
