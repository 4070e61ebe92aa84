mod agents;
mod chat;
mod core;

pub use agents::{AssistantConfig, GuardrailConfig};
pub use chat::{ChatConfig, RejectedTurnPolicy};
pub use self::core::{Config, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PROVIDER};
