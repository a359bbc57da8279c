use std::fmt;

use serde::Serialize;

/// Display identity of a ranked contributor.
///
/// Rendered as `Name <email>`, or just the email when the canonical name
/// is empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContributorKey(String);

impl ContributorKey {
    pub fn new(name: &str, email: &str) -> Self {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            Self(email.to_string())
        } else {
            Self(format!("{name} <{email}>"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContributorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContributorKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
