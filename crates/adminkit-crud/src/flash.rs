//! One-time flash notifications recorded for the next rendered page.

use serde::{Deserialize, Serialize};

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

/// A leveled, keyed notification queued for display.
///
/// The key is a message identifier (`flash.<entity>.<action>.<outcome>`),
/// resolved to display text by the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// Severity level.
    pub level: FlashLevel,
    /// Message key.
    pub key: String,
}

/// Sink recording flash messages for the current visitor.
///
/// The web layer provides a session-scoped implementation; tests use
/// [`VecFlashBag`].
pub trait FlashSink: Send + Sync {
    /// Queue a message.
    fn add(&self, level: FlashLevel, key: String);

    /// Take all queued messages, leaving the sink empty.
    fn drain(&self) -> Vec<FlashMessage>;
}

/// Build the flash key for a CRUD action outcome.
pub fn flash_key(entity_name: &str, action: &str, outcome: &str) -> String {
    format!("flash.{entity_name}.{action}.{outcome}")
}

/// A simple in-memory flash bag.
#[derive(Debug, Default)]
pub struct VecFlashBag {
    messages: std::sync::Mutex<Vec<FlashMessage>>,
}

impl VecFlashBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlashSink for VecFlashBag {
    fn add(&self, level: FlashLevel, key: String) {
        self.messages
            .lock()
            .expect("flash bag lock poisoned")
            .push(FlashMessage { level, key });
    }

    fn drain(&self) -> Vec<FlashMessage> {
        std::mem::take(&mut *self.messages.lock().expect("flash bag lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_key_format() {
        assert_eq!(
            flash_key("product", "add", "success"),
            "flash.product.add.success"
        );
    }

    #[test]
    fn test_drain_empties_the_bag() {
        let bag = VecFlashBag::new();
        bag.add(FlashLevel::Success, flash_key("product", "edit", "success"));

        let drained = bag.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].level, FlashLevel::Success);
        assert!(bag.drain().is_empty());
    }
}
