//! Flat-file username/password lookup.
//!
//! A plain membership check against a separately maintained CSV list. No hashing, rate limiting
//! or sessions happen here.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};

#[derive(Clone, PartialEq, Eq)]
struct Credential {
    username: String,
    password: String,
}

/// Credentials loaded from a CSV file.
///
/// The first row is a header and is skipped whatever it says. Username and password are read
/// from the first two columns by position; further columns are ignored, and rows with fewer than
/// two columns match nobody.
#[derive(Clone, Default)]
pub struct CredentialList {
    entries: Vec<Credential>,
}

impl fmt::Debug for CredentialList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialList")
            .field("entries_len", &self.entries.len())
            .finish()
    }
}

impl CredentialList {
    /// Load the list from `path`.
    ///
    /// A missing or unreadable file is a storage error; malformed CSV is a decode error.
    pub fn load(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            IngestionError::storage(format!("failed to open credential list {}", path.display()), e)
        })?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Parse the list from any reader.
    pub fn from_reader<R: Read>(reader: R) -> IngestionResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let mut entries = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if let (Some(username), Some(password)) = (record.get(0), record.get(1)) {
                entries.push(Credential {
                    username: username.to_owned(),
                    password: password.to_owned(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact match on both username and password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.entries
            .iter()
            .any(|c| c.username == username && c.password == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_requires_both_fields_to_match() {
        let list = CredentialList::from_reader("username,password\nada,lovelace\ngrace,hopper\n".as_bytes())
            .unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.verify("grace", "hopper"));
        assert!(!list.verify("grace", "lovelace"));
        assert!(!list.verify("nobody", ""));
    }

    #[test]
    fn columns_are_read_by_position_whatever_the_header() {
        let input = "login,secret,role\nada,lovelace,admin\nlonely\n";
        let list = CredentialList::from_reader(input.as_bytes()).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.verify("ada", "lovelace"));
        assert!(!list.verify("login", "secret"));
        assert!(!list.verify("lonely", ""));
    }

    #[test]
    fn header_only_list_matches_nobody() {
        let list = CredentialList::from_reader("username,password\n".as_bytes()).unwrap();
        assert!(list.is_empty());
        assert!(!list.verify("", ""));
    }
}
