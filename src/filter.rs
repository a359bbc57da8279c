use std::path::Path;

/// Extensions that are mostly machine-edited and say little about who
/// knows the code.
pub const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &["svg", "json", "nock", "xml"];

/// Decides which changed paths take part in reviewer attribution.
#[derive(Debug, Clone)]
pub struct PathFilter {
    ignored_extensions: Vec<String>,
    only_extensions: Vec<String>,
    ignored_paths: Vec<String>,
    only_paths: Vec<String>,
}

fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn normalize_prefix(prefix: &str) -> String {
    prefix
        .trim()
        .trim_start_matches("./")
        .trim_end_matches('/')
        .to_string()
}

impl PathFilter {
    pub fn new(
        ignored_extensions: &[String],
        only_extensions: &[String],
        ignored_paths: &[String],
        only_paths: &[String],
    ) -> Self {
        let exts = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|e| normalize_ext(e))
                .filter(|e| !e.is_empty())
                .collect()
        };
        let prefixes = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|p| normalize_prefix(p))
                .filter(|p| !p.is_empty())
                .collect()
        };

        let mut ignored: Vec<String> = DEFAULT_IGNORED_EXTENSIONS
            .iter()
            .map(|e| e.to_string())
            .collect();
        ignored.extend(exts(ignored_extensions));

        Self {
            ignored_extensions: ignored,
            only_extensions: exts(only_extensions),
            ignored_paths: prefixes(ignored_paths),
            only_paths: prefixes(only_paths),
        }
    }

    pub fn accepts(&self, path: &str) -> bool {
        self.accepts_extension(path) && self.accepts_path(path)
    }

    /// Only-list wins when present; otherwise the ignore list applies.
    fn accepts_extension(&self, path: &str) -> bool {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let matches = |list: &[String]| {
            ext.as_deref()
                .is_some_and(|ext| list.iter().any(|e| e == ext))
        };

        if !self.only_extensions.is_empty() {
            return matches(&self.only_extensions);
        }
        !matches(&self.ignored_extensions)
    }

    fn accepts_path(&self, path: &str) -> bool {
        if !self.only_paths.is_empty() {
            return self.only_paths.iter().any(|p| under(path, p));
        }
        !self.ignored_paths.iter().any(|p| under(path, p))
    }

    pub fn apply(&self, paths: Vec<String>) -> Vec<String> {
        paths.into_iter().filter(|p| self.accepts(p)).collect()
    }
}

/// `path` equals `prefix` or lies below it, compared by whole components.
fn under(path: &str, prefix: &str) -> bool {
    Path::new(path).starts_with(prefix)
}

/// Split a flag value on commas and whitespace.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
