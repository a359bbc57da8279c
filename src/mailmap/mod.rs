//! Identity alias table built from git mailmap files.
//!
//! Names and emails share one token table: a raw token resolves to its
//! canonical token, or to itself when unknown. Mailmap lines that give a
//! proper name for a commit email also record that email-to-name link, so
//! every email declared for one identity resolves to the same name.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Read-only alias table consulted while attributing lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AliasTable {
    /// Raw name or lowercased email to canonical name or email.
    tokens: HashMap<String, String>,
    /// Lowercased email to the proper name declared for it.
    email_names: HashMap<String, String>,
}

/// One parsed mailmap line.
#[derive(Debug, PartialEq, Eq)]
struct Entry<'a> {
    proper_name: Option<&'a str>,
    proper_email: Option<&'a str>,
    commit_name: Option<&'a str>,
    commit_email: &'a str,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from mailmap contents, later sources overriding earlier ones.
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for source in sources {
            table.merge_str(source.as_ref());
        }
        table
    }

    /// Build a table from mailmap files. Files that are missing or
    /// unreadable are skipped.
    pub fn load_files(paths: &[PathBuf]) -> Self {
        let contents = paths.iter().filter_map(|path| match fs::read(path) {
            Ok(bytes) => {
                debug!(path = %path.display(), "reading mailmap");
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
            Err(err) => {
                debug!(path = %path.display(), %err, "mailmap skipped");
                None
            }
        });
        Self::from_sources(contents)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.email_names.is_empty()
    }

    /// Fold mailmap text into the table. Lines that do not parse are ignored.
    pub fn merge_str(&mut self, content: &str) {
        for line in content.lines() {
            if let Some(entry) = parse_line(line) {
                self.apply(&entry);
            }
        }
    }

    fn apply(&mut self, entry: &Entry<'_>) {
        let commit_email = entry.commit_email.to_lowercase();

        if let Some(proper_email) = entry.proper_email {
            self.tokens
                .entry(proper_email.to_lowercase())
                .or_insert_with(|| proper_email.to_string());
            self.tokens
                .insert(commit_email.clone(), proper_email.to_string());
        }

        if let Some(proper_name) = entry.proper_name {
            self.tokens
                .entry(proper_name.to_string())
                .or_insert_with(|| proper_name.to_string());
            self.email_names
                .insert(commit_email, proper_name.to_string());
            if let Some(proper_email) = entry.proper_email {
                self.email_names
                    .entry(proper_email.to_lowercase())
                    .or_insert_with(|| proper_name.to_string());
            }
            if let Some(commit_name) = entry.commit_name {
                self.tokens
                    .insert(commit_name.to_string(), proper_name.to_string());
            }
        }
    }

    /// Resolve a single name or email token, falling back to the input.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.tokens
            .get(token)
            .or_else(|| self.tokens.get(&token.to_lowercase()))
            .map(String::as_str)
            .unwrap_or(token)
    }

    /// Canonical `(name, email)` for a raw identity.
    ///
    /// The email resolves through the table on its own. The name prefers a
    /// proper name declared for the raw email, then one declared for the
    /// canonical email, then a plain name alias, then the raw name.
    pub fn canonicalize<'a>(&'a self, name: &'a str, email: &'a str) -> (&'a str, &'a str) {
        let canonical_email = self
            .tokens
            .get(&email.to_lowercase())
            .map(String::as_str)
            .unwrap_or(email);

        let canonical_name = self
            .email_names
            .get(&email.to_lowercase())
            .or_else(|| self.email_names.get(&canonical_email.to_lowercase()))
            .map(String::as_str)
            .unwrap_or_else(|| self.resolve(name));

        (canonical_name, canonical_email)
    }
}

/// Split `Name <email> rest` into its trimmed parts.
fn parse_name_and_email(s: &str) -> Option<(&str, &str, &str)> {
    let left = s.find('<')?;
    let right = left + s[left..].find('>')?;
    let name = s[..left].trim();
    let email = s[left + 1..right].trim();
    Some((name, email, &s[right + 1..]))
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn parse_line(line: &str) -> Option<Entry<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (name1, email1, rest) = parse_name_and_email(line)?;
    let entry = match parse_name_and_email(rest) {
        Some((name2, email2, _)) => Entry {
            proper_name: non_empty(name1),
            proper_email: non_empty(email1),
            commit_name: non_empty(name2),
            commit_email: non_empty(email2)?,
        },
        None => Entry {
            proper_name: non_empty(name1),
            proper_email: None,
            commit_name: None,
            commit_email: non_empty(email1)?,
        },
    };
    Some(entry)
}

/// Standard mailmap files inside a working tree, in override order.
pub fn project_files(root: &Path) -> Vec<PathBuf> {
    vec![root.join(".mailmap"), root.join("mailmap")]
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
