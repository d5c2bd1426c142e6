#![deny(unsafe_code)]

//! Shared test utilities for the workspace.
//!
//! [`TestDir`] owns a temporary directory that is removed on drop and offers
//! small helpers for laying out files relative to it. [`FileTree`] describes a
//! set of files and directories that can be materialised in one call, which
//! keeps merge-file and dir-merge fixtures readable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary directory removed when dropped.
#[derive(Debug)]
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Creates a fresh temporary directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Root of the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Joins `relative` onto the root.
    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Creates `relative` (and any missing parents) and returns its path.
    pub fn mkdir(&self, relative: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: impl AsRef<Path>, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Writes one rule per line to `relative`.
    pub fn write_rules(&self, relative: impl AsRef<Path>, lines: &[&str]) -> io::Result<PathBuf> {
        let mut contents = lines.join("\n");
        contents.push('\n');
        self.write_file(relative, contents.as_bytes())
    }

    /// Reads the file at `relative`.
    pub fn read_file(&self, relative: impl AsRef<Path>) -> io::Result<Vec<u8>> {
        fs::read(self.join(relative))
    }

    /// Returns whether `relative` exists.
    #[must_use]
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.join(relative).exists()
    }
}

#[derive(Clone, Debug)]
enum Entry {
    File { path: PathBuf, contents: Vec<u8> },
    Dir { path: PathBuf },
}

/// Declarative description of files and directories to create.
#[derive(Clone, Debug, Default)]
pub struct FileTree {
    entries: Vec<Entry>,
}

impl FileTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text file.
    pub fn text_file(&mut self, path: impl Into<PathBuf>, contents: &str) -> &mut Self {
        self.entries.push(Entry::File {
            path: path.into(),
            contents: contents.as_bytes().to_vec(),
        });
        self
    }

    /// Adds a rule file with one rule per line.
    pub fn rules_file(&mut self, path: impl Into<PathBuf>, lines: &[&str]) -> &mut Self {
        let mut contents = lines.join("\n");
        contents.push('\n');
        self.text_file(path, &contents)
    }

    /// Adds an empty directory.
    pub fn dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.entries.push(Entry::Dir { path: path.into() });
        self
    }

    /// Creates every entry below `root`.
    pub fn create_in(&self, root: &TestDir) -> io::Result<()> {
        for entry in &self.entries {
            match entry {
                Entry::File { path, contents } => {
                    root.write_file(path, contents)?;
                }
                Entry::Dir { path } => {
                    root.mkdir(path)?;
                }
            }
        }
        Ok(())
    }
}
