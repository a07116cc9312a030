//! Item set notifier
//!
//! Keeps one broadcast channel per list and pushes the full item set to every
//! subscriber after each mutation.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::model::{ListId, TodoItem};

/// Full item set of a list, pushed after every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsUpdate {
    pub list: ListId,
    pub items: Vec<TodoItem>,
}

/// Configuration for the notifier (`[notifier]` in the config file)
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Capacity of each list's broadcast channel
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_broadcast_capacity() -> usize {
    64
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

/// Per-list broadcast channels
#[derive(Debug, Clone)]
pub struct Notifier {
    channels: Arc<RwLock<HashMap<ListId, broadcast::Sender<ItemsUpdate>>>>,
    config: NotifierConfig,
}

impl Notifier {
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Get a receiver for a list's updates, creating the channel on first use
    pub fn subscribe(&self, list: &ListId) -> broadcast::Receiver<ItemsUpdate> {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        channels
            .entry(list.clone())
            .or_insert_with(|| broadcast::channel(self.config.broadcast_capacity.max(1)).0)
            .subscribe()
    }

    /// Push a list's full item set to its subscribers
    pub fn publish(&self, list: &ListId, items: Vec<TodoItem>) {
        let channels = self
            .channels
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let Some(sender) = channels.get(list) else {
            return;
        };

        let count = items.len();
        match sender.send(ItemsUpdate {
            list: list.clone(),
            items,
        }) {
            Ok(receivers) => {
                tracing::trace!(list = %list, items = count, receivers, "Published item set");
            }
            Err(_) => {
                tracing::trace!(list = %list, "No subscribers for item set");
            }
        }
    }

    /// Number of live receivers for a list
    pub fn subscriber_count(&self, list: &ListId) -> usize {
        self.channels
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(list)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Drop the channel of a removed list
    pub fn remove(&self, list: &ListId) {
        self.channels
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(list);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotifierConfig::default())
    }
}
