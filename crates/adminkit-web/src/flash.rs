//! Session-scoped flash message storage.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use adminkit_crud::flash::{FlashLevel, FlashMessage, FlashSink};

/// In-process flash storage keyed by visitor session.
#[derive(Debug, Default)]
pub struct SessionFlashStore {
    messages: DashMap<Uuid, Vec<FlashMessage>>,
}

impl SessionFlashStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sink for one visitor session.
    pub fn scoped(self: &Arc<Self>, session: Uuid) -> SessionFlash {
        SessionFlash {
            store: Arc::clone(self),
            session,
        }
    }
}

/// [`FlashSink`] bound to one visitor session.
#[derive(Debug, Clone)]
pub struct SessionFlash {
    store: Arc<SessionFlashStore>,
    session: Uuid,
}

impl FlashSink for SessionFlash {
    fn add(&self, level: FlashLevel, key: String) {
        self.store
            .messages
            .entry(self.session)
            .or_default()
            .push(FlashMessage { level, key });
    }

    fn drain(&self) -> Vec<FlashMessage> {
        self.store
            .messages
            .remove(&self.session)
            .map(|(_, messages)| messages)
            .unwrap_or_default()
    }
}
