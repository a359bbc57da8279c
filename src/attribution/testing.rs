use std::collections::HashMap;
use std::sync::Mutex;

use super::{AttributionRecord, BlameError, BlameSource};

/// In-memory blame source keyed by path. Unknown paths report `NotFound`.
#[derive(Default)]
pub struct FakeBlame {
    files: HashMap<String, Result<Vec<AttributionRecord>, BlameError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBlame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: &str, records: Vec<AttributionRecord>) -> Self {
        self.files.insert(path.to_string(), Ok(records));
        self
    }

    pub fn failing(mut self, path: &str, err: BlameError) -> Self {
        self.files.insert(path.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl BlameSource for FakeBlame {
    fn blame(&self, path: &str, revision: &str) -> Result<Vec<AttributionRecord>, BlameError> {
        self.calls.lock().unwrap().push(path.to_string());
        match self.files.get(path) {
            Some(result) => result.clone(),
            None => Err(BlameError::NotFound {
                path: path.to_string(),
                revision: revision.to_string(),
            }),
        }
    }
}

pub fn rec(name: &str, email: &str, lines: usize, commit_time: i64) -> AttributionRecord {
    AttributionRecord::new(name, email, lines, commit_time)
}

pub fn paths(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}
