//! To-do list identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Entity domain every to-do list belongs to
pub const TODO_DOMAIN: &str = "todo";

/// Identifier of a to-do list, e.g. `todo.shopping`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListId(String);

/// Errors from parsing a list identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListIdError {
    #[error("Specify an entity from within the todo domain (got {0:?})")]
    WrongDomain(String),

    #[error("List identifier {0:?} has no object id")]
    MissingObjectId(String),
}

impl ListId {
    /// Parse and validate a list identifier
    pub fn parse(s: &str) -> Result<Self, ListIdError> {
        let s = s.trim();
        let (domain, object_id) = s
            .split_once('.')
            .ok_or_else(|| ListIdError::WrongDomain(s.to_string()))?;

        if domain != TODO_DOMAIN {
            return Err(ListIdError::WrongDomain(s.to_string()));
        }
        if object_id.is_empty() {
            return Err(ListIdError::MissingObjectId(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    /// The part after the domain (`shopping` for `todo.shopping`)
    pub fn object_id(&self) -> &str {
        self.0
            .split_once('.')
            .map(|(_, object_id)| object_id)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ListId {
    type Err = ListIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ListId {
    type Error = ListIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ListId> for String {
    fn from(id: ListId) -> Self {
        id.0
    }
}
