pub mod schema;

pub use schema::{
    AssistantConfig, ChatConfig, Config, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PROVIDER,
    GuardrailConfig, RejectedTurnPolicy,
};
