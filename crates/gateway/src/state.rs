//! Shared application state for the gateway

use std::sync::Arc;

use relaydesk_messaging::{Directory, Dispatcher};

/// Shared application state containing the broker and directory handles
#[derive(Clone)]
pub struct GatewayState {
    /// The message broker serving all room intents
    pub dispatcher: Arc<Dispatcher>,
    /// Bootstrap directory data served read-only
    pub directory: Arc<Directory>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(dispatcher: Arc<Dispatcher>, directory: Directory) -> Self {
        Self {
            dispatcher,
            directory: Arc::new(directory),
        }
    }
}
