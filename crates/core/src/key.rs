//! Entity keys: kind-scoped identity with optional ancestor paths
//!
//! A key addresses exactly one entity. It is a non-empty path of
//! `(kind, identifier)` elements: the terminal element names the entity,
//! any preceding elements name its ancestors. The identifier is either a
//! store-assigned numeric id or a caller-chosen name; a terminal element
//! without an identifier marks the key *incomplete* (the store assigns an
//! id on first write).
//!
//! ## Contract
//!
//! - Kinds are non-empty UTF-8 strings
//! - Names are non-empty and at most `max_key_name_bytes` (default 1500)
//! - Only the terminal element may lack an identifier
//! - Raw identifiers resolved through [`Key::named`] always become names;
//!   numeric-id keys are built explicitly with [`Key::with_id`]

use crate::limits::Limits;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of a single path element
///
/// Either a store-assigned numeric id or a caller-chosen name. Ordering
/// puts all ids before all names (ids numerically, names lexicographically),
/// matching the enumeration order of the store being bridged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyId {
    /// Store-assigned numeric identifier
    Id(i64),
    /// Caller-chosen name
    Name(String),
}

impl KeyId {
    /// Render the identifier as its path string form
    pub fn render(&self) -> String {
        match self {
            KeyId::Id(id) => id.to_string(),
            KeyId::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Id(id) => write!(f, "{}", id),
            KeyId::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for KeyId {
    fn from(id: i64) -> Self {
        KeyId::Id(id)
    }
}

impl From<&str> for KeyId {
    fn from(name: &str) -> Self {
        KeyId::Name(name.to_string())
    }
}

impl From<String> for KeyId {
    fn from(name: String) -> Self {
        KeyId::Name(name)
    }
}

/// One element of a key path: a kind plus an optional identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathElement {
    /// The kind this element addresses
    pub kind: String,
    /// The identifier, `None` while incomplete
    pub id: Option<KeyId>,
}

/// Identity of a single entity
///
/// # Example
///
/// ```
/// use kindling_core::Key;
///
/// let key = Key::named("Customer", "acme").child_with_id("Order", 42);
/// assert_eq!(key.kind(), "Order");
/// assert_eq!(key.path_end_identifier().as_deref(), Some("42"));
/// assert!(key.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    path: Vec<PathElement>,
}

impl Key {
    /// Create a single-element key with a caller-chosen name
    pub fn named(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Key {
            path: vec![PathElement {
                kind: kind.into(),
                id: Some(KeyId::Name(name.into())),
            }],
        }
    }

    /// Create a single-element key with a numeric id
    pub fn with_id(kind: impl Into<String>, id: i64) -> Self {
        Key {
            path: vec![PathElement {
                kind: kind.into(),
                id: Some(KeyId::Id(id)),
            }],
        }
    }

    /// Create a single-element incomplete key (store assigns the id)
    pub fn incomplete(kind: impl Into<String>) -> Self {
        Key {
            path: vec![PathElement {
                kind: kind.into(),
                id: None,
            }],
        }
    }

    /// Extend the path with a named child element
    pub fn child_named(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.path.push(PathElement {
            kind: kind.into(),
            id: Some(KeyId::Name(name.into())),
        });
        self
    }

    /// Extend the path with a numeric-id child element
    pub fn child_with_id(mut self, kind: impl Into<String>, id: i64) -> Self {
        self.path.push(PathElement {
            kind: kind.into(),
            id: Some(KeyId::Id(id)),
        });
        self
    }

    /// Extend the path with an incomplete child element
    pub fn child_incomplete(mut self, kind: impl Into<String>) -> Self {
        self.path.push(PathElement {
            kind: kind.into(),
            id: None,
        });
        self
    }

    /// The full path, ancestors first
    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    /// Kind of the terminal element
    pub fn kind(&self) -> &str {
        match self.path.last() {
            Some(element) => &element.kind,
            None => "",
        }
    }

    /// Identifier of the terminal element, if assigned
    pub fn id(&self) -> Option<&KeyId> {
        self.path.last().and_then(|element| element.id.as_ref())
    }

    /// Whether the terminal element has an identifier
    pub fn is_complete(&self) -> bool {
        self.id().is_some()
    }

    /// The terminal identifier rendered as a string
    ///
    /// `None` for incomplete keys. Numeric ids render in decimal.
    pub fn path_end_identifier(&self) -> Option<String> {
        self.id().map(KeyId::render)
    }

    /// Complete an incomplete key with a store-assigned id
    ///
    /// A key that already has a terminal identifier is returned unchanged.
    pub fn with_assigned_id(mut self, id: i64) -> Self {
        if let Some(element) = self.path.last_mut() {
            if element.id.is_none() {
                element.id = Some(KeyId::Id(id));
            }
        }
        self
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            match &element.id {
                Some(id) => write!(f, "{}:{}", element.kind, id)?,
                None => write!(f, "{}:?", element.kind)?,
            }
        }
        Ok(())
    }
}

/// Validate a key against limits
///
/// Checked on every client write path:
/// - the path is non-empty
/// - every kind is non-empty
/// - every name is non-empty and within `max_key_name_bytes`
/// - only the terminal element may lack an identifier
pub fn validate_key(key: &Key, limits: &Limits) -> Result<(), KeyError> {
    let path = key.path();
    if path.is_empty() {
        return Err(KeyError::EmptyPath);
    }
    for (i, element) in path.iter().enumerate() {
        if element.kind.is_empty() {
            return Err(KeyError::EmptyKind);
        }
        let terminal = i + 1 == path.len();
        if !terminal && element.id.is_none() {
            return Err(KeyError::IncompleteAncestor {
                kind: element.kind.clone(),
            });
        }
        if let Some(KeyId::Name(name)) = &element.id {
            if name.is_empty() {
                return Err(KeyError::EmptyName);
            }
            if name.len() > limits.max_key_name_bytes {
                return Err(KeyError::NameTooLong {
                    actual: name.len(),
                    max: limits.max_key_name_bytes,
                });
            }
        }
    }
    Ok(())
}

/// Key validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Key has no path elements
    #[error("key path cannot be empty")]
    EmptyPath,

    /// A path element has an empty kind
    #[error("key kind cannot be empty")]
    EmptyKind,

    /// A path element has an empty name
    #[error("key name cannot be empty")]
    EmptyName,

    /// A name exceeds the maximum length
    #[error("key name too long: {actual} bytes exceeds maximum {max}")]
    NameTooLong {
        /// Actual name length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// A non-terminal path element lacks an identifier
    #[error("ancestor element '{kind}' must have an identifier")]
    IncompleteAncestor {
        /// Kind of the offending element
        kind: String,
    },
}
