pub mod chat_loop;
pub mod guardrail;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use chat_loop::{
    ChatLoop, FAREWELL, INPUT_BLOCKED_NOTICE, LoopState, OUTPUT_BLOCKED_NOTICE, PROMPT,
};
pub use guardrail::{
    DomainVerdict, GuardrailOutput, InputGuardrail, KeywordGuardrail, ModelGuardrail,
    OutputGuardrail,
};
pub use runner::{Agent, StreamedRun};
