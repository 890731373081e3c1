//! Resource identity primitives.
//!
//! A managed setting is identified by a [`CompositeId`]: an ordered mapping of
//! named string fields serialized into a single token. The token is the
//! externally visible resource identifier, so the encoding is stable (the same
//! mapping always yields the same token) and exactly invertible.
//!
//! # Encoding
//!
//! Entries are emitted in key order as `base64(key):base64(value)` and joined
//! with `-`. The standard base64 alphabet contains neither delimiter, so no
//! escaping is needed.
//!
//! # Example
//!
//! ```rust
//! use regmode_core::identity::{CompositeId, ProjectId};
//!
//! let project = ProjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e").unwrap();
//! let id = CompositeId::for_project(&project);
//! let token = id.encode();
//! assert_eq!(CompositeId::decode(&token).unwrap(), id);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key under which the project identifier is stored in a [`CompositeId`].
pub const PROJECT_ID_KEY: &str = "project_id";

const ENTRY_DELIMITER: char = '-';
const PAIR_DELIMITER: char = ':';

/// Identifier of a cloud project (Atlas group).
///
/// Project IDs are exactly 24 lowercase hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Length of a project identifier.
    pub const LEN: usize = 24;

    /// Creates a new project ID after validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is not 24 lowercase hex characters.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Returns the project ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::invalid_id("project ID cannot be empty"));
        }

        if id.len() != Self::LEN {
            return Err(Error::invalid_id(format!(
                "project ID '{id}' must be {} characters, got {}",
                Self::LEN,
                id.len()
            )));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(Error::invalid_id(format!(
                "project ID '{id}' contains non-hexadecimal characters"
            )));
        }

        Ok(())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.0
    }
}

/// Durable, ordered identity of a managed resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CompositeId {
    fields: BTreeMap<String, String>,
}

impl CompositeId {
    /// Creates an empty identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the identity of a project-scoped setting.
    #[must_use]
    pub fn for_project(project: &ProjectId) -> Self {
        Self::new().with(PROJECT_ID_KEY, project.as_str())
    }

    /// Adds or replaces a field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the identity has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Extracts and validates the project identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is missing or not a valid project ID.
    pub fn project_id(&self) -> Result<ProjectId> {
        let raw = self
            .get(PROJECT_ID_KEY)
            .ok_or_else(|| Error::invalid_id(format!("identity has no '{PROJECT_ID_KEY}' field")))?;
        ProjectId::new(raw)
    }

    /// Serializes the identity into its token form.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut token = String::new();
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                token.push(ENTRY_DELIMITER);
            }
            token.push_str(&STANDARD.encode(key));
            token.push(PAIR_DELIMITER);
            token.push_str(&STANDARD.encode(value));
        }
        token
    }

    /// Parses a token produced by [`CompositeId::encode`].
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, an entry is not a single
    /// `key:value` pair, a key repeats, or a component is not valid
    /// base64-encoded UTF-8.
    pub fn decode(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::invalid_id("composite identity token is empty"));
        }

        let mut fields = BTreeMap::new();
        for entry in token.split(ENTRY_DELIMITER) {
            let mut parts = entry.split(PAIR_DELIMITER);
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(Error::invalid_id(format!(
                    "malformed identity entry '{entry}' (expected key{PAIR_DELIMITER}value)"
                )));
            };
            let key = decode_component(key)?;
            if fields.contains_key(&key) {
                return Err(Error::invalid_id(format!(
                    "identity field '{key}' appears more than once"
                )));
            }
            fields.insert(key, decode_component(value)?);
        }

        Ok(Self { fields })
    }
}

fn decode_component(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| Error::invalid_id(format!("identity component '{encoded}' is not base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::invalid_id(format!("identity component '{encoded}' is not UTF-8: {e}")))
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for CompositeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CompositeId {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PROJECT: &str = "5f1a2b3c4d5e6f7a8b9c0d1e";

    #[test]
    fn valid_project_ids() {
        assert!(ProjectId::new(PROJECT).is_ok());
        assert!(ProjectId::new("000000000000000000000000").is_ok());
    }

    #[test]
    fn invalid_project_ids() {
        assert!(ProjectId::new("").is_err());
        assert!(ProjectId::new("5f1a2b3c").is_err());
        assert!(ProjectId::new("5F1A2B3C4D5E6F7A8B9C0D1E").is_err());
        assert!(ProjectId::new("zz1a2b3c4d5e6f7a8b9c0d1e").is_err());
        assert!(ProjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e0").is_err());
    }

    #[test]
    fn encoding_matches_provider_format() {
        let project = ProjectId::new(PROJECT).unwrap();
        let token = CompositeId::for_project(&project).encode();
        // base64("project_id") ":" base64(PROJECT)
        assert_eq!(token, "cHJvamVjdF9pZA==:NWYxYTJiM2M0ZDVlNmY3YThiOWMwZDFl");
    }

    #[test]
    fn encoding_is_independent_of_insertion_order() {
        let a = CompositeId::new().with("b", "2").with("a", "1");
        let b = CompositeId::new().with("a", "1").with("b", "2");
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn decode_rejects_malformed_tokens() {
        assert!(CompositeId::decode("").is_err());
        assert!(CompositeId::decode("YQ==").is_err());
        assert!(CompositeId::decode("YQ==:Yg==:Yw==").is_err());
        assert!(CompositeId::decode("!!!:Yg==").is_err());
        // 0xff is not valid UTF-8
        assert!(CompositeId::decode("/w==:Yg==").is_err());
        // key "a" twice
        assert!(matches!(
            CompositeId::decode("YQ==:Yg==-YQ==:Yw=="),
            Err(Error::InvalidId { ref message }) if message.contains("more than once")
        ));
    }

    #[test]
    fn project_id_extraction() {
        let id = CompositeId::decode(&CompositeId::new().with(PROJECT_ID_KEY, PROJECT).encode())
            .unwrap();
        assert_eq!(id.project_id().unwrap().as_str(), PROJECT);

        assert!(CompositeId::new().with("other", "x").project_id().is_err());
        assert!(CompositeId::new()
            .with(PROJECT_ID_KEY, "not-a-project")
            .project_id()
            .is_err());
    }

    #[test]
    fn project_id_serde_validates() {
        let json = format!("\"{PROJECT}\"");
        let id: ProjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id.as_str(), PROJECT);
        assert!(serde_json::from_str::<ProjectId>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn decode_is_left_inverse_of_encode(
            fields in prop::collection::btree_map(".{0,16}", ".{0,32}", 1..6)
        ) {
            let id: CompositeId = fields.into_iter().collect();
            let decoded = CompositeId::decode(&id.encode()).unwrap();
            prop_assert_eq!(decoded, id);
        }

        #[test]
        fn encoding_is_stable(
            fields in prop::collection::btree_map("[a-z_]{1,8}", "[ -~]{0,16}", 1..4)
        ) {
            let a: CompositeId = fields.clone().into_iter().collect();
            let b: CompositeId = fields.into_iter().rev().collect();
            prop_assert_eq!(a.encode(), b.encode());
        }
    }
}
