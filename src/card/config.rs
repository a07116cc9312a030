//! Card configuration

use serde::{Deserialize, Serialize};

use super::error::{CardError, CardResult};
use crate::model::ListId;

/// Rows taken by the card without a title
const BASE_SIZE: usize = 3;
/// Extra rows for the title
const TITLE_SIZE: usize = 2;

/// One card on the board, as written in the `[[cards]]` config section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    /// List to show, e.g. `todo.shopping`
    pub entity: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Omit the completed section
    #[serde(default)]
    pub hide_completed: bool,
}

impl CardConfig {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            title: None,
            hide_completed: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn hide_completed(mut self, hide: bool) -> Self {
        self.hide_completed = hide;
        self
    }

    /// Check the entity and return its list id
    pub fn validate(&self) -> CardResult<ListId> {
        ListId::parse(&self.entity).map_err(|e| CardError::InvalidConfig(e.to_string()))
    }

    /// Layout height hint
    pub fn card_size(&self) -> usize {
        if self.title.is_some() {
            BASE_SIZE + TITLE_SIZE
        } else {
            BASE_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let list = CardConfig::new("todo.shopping").validate().unwrap();
        assert_eq!(list.object_id(), "shopping");

        let err = CardConfig::new("light.kitchen").validate().unwrap_err();
        assert!(matches!(err, CardError::InvalidConfig(_)));
        assert!(err
            .to_string()
            .contains("Specify an entity from within the todo domain"));
    }

    #[test]
    fn test_card_size() {
        assert_eq!(CardConfig::new("todo.a").card_size(), 3);
        assert_eq!(CardConfig::new("todo.a").title("Groceries").card_size(), 5);
    }

    #[test]
    fn test_parse_from_toml() {
        let config: CardConfig = toml::from_str(
            r#"
            entity = "todo.chores"
            hide_completed = true
            "#,
        )
        .unwrap();
        assert!(config.hide_completed);
        assert!(config.title.is_none());
    }
}
