// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod http_client;
pub mod scrub;
pub mod sse;
pub mod streaming;
pub mod structured;
pub mod traits;
pub mod types;

// ── Provider implementations ────────────────────────────────────────────────
pub mod compatible;
pub mod factory;

// ── Infrastructure re-exports ───────────────────────────────────────────────
pub use http_client::build_provider_client_with_timeout;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use sse::{SseBuffer, parse_data_lines, parse_data_lines_without_done};
pub use streaming::{ProviderStream, StreamCollector, StreamEvent, resp_to_events};
pub use structured::parse_structured;
pub use traits::{CompletionRequest, Provider, ProviderCapabilities};
pub use types::{MessageRole, ProviderMessage, ProviderResponse, ResponseSchema, StopReason};

// ── Provider + factory re-exports ───────────────────────────────────────────
pub use compatible::OpenAiCompatibleProvider;
pub use factory::create_provider;
