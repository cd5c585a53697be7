use crate::app::Message;
use log::warn;
use scoreboard_common::control::ControlClient;
use std::sync::Arc;
use tokio::{
    sync::mpsc::UnboundedSender,
    task::{self, JoinHandle},
};

/// The device's canned messages, index-addressable and read-only after
/// load. Starts empty and stays empty if the one-time load fails.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PresetCatalog {
    messages: Vec<String>,
}

impl PresetCatalog {
    pub fn from_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.messages.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}

/// One-shot startup request for the preset list. Not retried on failure.
pub fn spawn_load(client: Arc<ControlClient>, tx: UnboundedSender<Message>) -> JoinHandle<()> {
    task::spawn(async move {
        match client.get_presets().await {
            Ok(messages) => {
                let _ = tx.send(Message::PresetsLoaded(messages));
            }
            Err(e) => warn!("Loading preset messages failed: {e}"),
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_catalog_preserves_order_and_indexing() {
        let catalog = PresetCatalog::from_messages(vec![
            "GAME OVER".to_string(),
            "HALF TIME".to_string(),
            "GOAL!".to_string(),
        ]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0), Some("GAME OVER"));
        assert_eq!(catalog.get(2), Some("GOAL!"));
        assert_eq!(catalog.get(3), None);
        assert_eq!(
            catalog.iter().collect::<Vec<_>>(),
            vec!["GAME OVER", "HALF TIME", "GOAL!"]
        );
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = PresetCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.get(0), None);
    }
}
