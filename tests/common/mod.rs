#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use stardict::utils::dictzip::write_dictzip;

/// Builds StarDict bundles on disk for tests.
pub struct BundleFixture {
    name: String,
    book_name: String,
    entries: Vec<(String, String)>,
    synonyms: Vec<(String, u32)>,
    compressed: bool,
}

impl BundleFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            book_name: name.to_string(),
            entries: Vec::new(),
            synonyms: Vec::new(),
            compressed: false,
        }
    }

    pub fn book_name(mut self, book_name: &str) -> Self {
        self.book_name = book_name.to_string();
        self
    }

    pub fn entry(mut self, word: &str, definition: &str) -> Self {
        self.entries.push((word.to_string(), definition.to_string()));
        self
    }

    pub fn synonym(mut self, synonym: &str, position: u32) -> Self {
        self.synonyms.push((synonym.to_string(), position));
        self
    }

    pub fn compressed(mut self) -> Self {
        self.compressed = true;
        self
    }

    /// Writes the bundle into `dir` and returns its base path.
    pub fn write(&self, dir: &Path) -> PathBuf {
        let base = dir.join(&self.name);

        let ifo = format!(
            "StarDict's dict ifo file\nversion=2.4.2\nbookname={}\nwordcount={}\nsynwordcount={}\n",
            self.book_name,
            self.entries.len(),
            self.synonyms.len()
        );
        fs::write(dir.join(format!("{}.ifo", self.name)), ifo).unwrap();

        let mut idx = Vec::new();
        let mut blob = Vec::new();
        for (word, definition) in &self.entries {
            idx.extend_from_slice(word.as_bytes());
            idx.push(0);
            idx.extend_from_slice(&(blob.len() as u32).to_be_bytes());
            idx.extend_from_slice(&(definition.len() as u32).to_be_bytes());
            blob.extend_from_slice(definition.as_bytes());
        }
        fs::write(dir.join(format!("{}.idx", self.name)), idx).unwrap();

        if self.compressed {
            let mut out = Vec::new();
            write_dictzip(&blob, 16, &mut out).unwrap();
            fs::write(dir.join(format!("{}.dict.dz", self.name)), out).unwrap();
        } else {
            fs::write(dir.join(format!("{}.dict", self.name)), blob).unwrap();
        }

        if !self.synonyms.is_empty() {
            let mut syn = Vec::new();
            for (synonym, position) in &self.synonyms {
                syn.extend_from_slice(synonym.as_bytes());
                syn.push(0);
                syn.extend_from_slice(&position.to_be_bytes());
            }
            fs::write(dir.join(format!("{}.syn", self.name)), syn).unwrap();
        }
        base
    }
}

pub fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
}
