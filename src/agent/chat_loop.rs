use super::runner::Agent;
use crate::config::{ChatConfig, RejectedTurnPolicy};
use crate::error::{ChatError, GuardrailError, Result};
use crate::session::History;
use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

pub const PROMPT: &str = "User (type 'exit' to quit): ";
pub const FAREWELL: &str = "Goodbye! 👋";
pub const INPUT_BLOCKED_NOTICE: &str = "🚫 Guardrail tripped: input not allowed.";
pub const OUTPUT_BLOCKED_NOTICE: &str = "🚫 Guardrail tripped: output not allowed.";

/// Where the loop is in one read-classify-generate-report cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingInput,
    Classifying,
    Generating,
    Reporting,
    Terminated,
}

enum Outcome {
    Reply(String),
    Blocked(GuardrailError),
}

/// Interactive read-print loop over any line reader and writer.
///
/// Guardrail vetoes are reported to the user and the loop carries on. Any
/// other error ends the loop and is returned to the caller.
pub struct ChatLoop<'a, R, W> {
    agent: &'a Agent,
    reader: R,
    writer: W,
    settings: ChatConfig,
    history: History,
    state: LoopState,
}

impl<'a, R, W> ChatLoop<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(agent: &'a Agent, reader: R, writer: W, mut settings: ChatConfig) -> Self {
        settings.normalize();
        Self {
            agent,
            reader,
            writer,
            settings,
            history: History::new(),
            state: LoopState::AwaitingInput,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run until the exit token or end of input; returns the conversation.
    pub async fn run(mut self) -> Result<History> {
        let span = tracing::info_span!("chat", session = %self.history.session_id());
        async move {
            tracing::debug!(agent = %self.agent.name(), "Chat loop started");
            while self.state != LoopState::Terminated {
                self.write(PROMPT).await?;

                let Some(line) = self.read_line().await? else {
                    self.write("\n").await?;
                    self.terminate().await?;
                    break;
                };

                if self.is_exit(&line) {
                    self.terminate().await?;
                } else if !line.trim().is_empty() {
                    self.turn(line).await?;
                }
            }
            tracing::debug!(turns = self.history.len(), "Chat loop finished");
            Ok(self.history)
        }
        .instrument(span)
        .await
    }

    /// Run one full cycle for `line` without reading input.
    pub async fn submit(&mut self, line: &str) -> Result<()> {
        self.turn(line.to_string()).await
    }

    /// Consume the loop and hand back the conversation so far.
    pub fn into_history(self) -> History {
        self.history
    }

    async fn turn(&mut self, line: String) -> Result<()> {
        self.history.push_user(line);
        self.transition(LoopState::Classifying);

        let agent = self.agent;
        let outcome = match agent.run_streamed(self.history.turns()).await {
            Ok(mut run) => {
                self.transition(LoopState::Generating);
                let mut echoed = false;
                while let Some(fragment) = run.next_fragment().await {
                    self.write(&fragment?).await?;
                    echoed = true;
                }
                let finished = run.finish().await;
                if echoed && finished.is_err() {
                    self.write("\n").await?;
                }
                match finished {
                    Ok(text) => Outcome::Reply(text),
                    Err(ChatError::Guardrail(blocked)) => Outcome::Blocked(blocked),
                    Err(error) => return Err(error),
                }
            }
            Err(ChatError::Guardrail(blocked)) => Outcome::Blocked(blocked),
            Err(error) => return Err(error),
        };

        self.transition(LoopState::Reporting);
        self.report(outcome).await?;
        self.transition(LoopState::AwaitingInput);
        Ok(())
    }

    async fn report(&mut self, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Reply(text) => {
                self.write(&format!("\nAssistant: {text}\n")).await?;
                self.history.push_assistant(text);
            }
            Outcome::Blocked(blocked) => {
                let notice = match blocked {
                    GuardrailError::InputBlocked { .. } => INPUT_BLOCKED_NOTICE,
                    GuardrailError::OutputBlocked { .. } => OUTPUT_BLOCKED_NOTICE,
                };
                tracing::debug!(
                    guardrail = %blocked.guardrail(),
                    info = %blocked.output_info(),
                    "Turn rejected"
                );
                self.write(&format!("{notice}\n")).await?;
                if self.settings.rejected_turns == RejectedTurnPolicy::Drop {
                    self.history.pop_dangling_user();
                }
            }
        }
        Ok(())
    }

    async fn terminate(&mut self) -> Result<()> {
        self.write(&format!("{FAREWELL}\n")).await?;
        self.transition(LoopState::Terminated);
        Ok(())
    }

    fn transition(&mut self, next: LoopState) {
        tracing::trace!(from = ?self.state, to = ?next, "Loop transition");
        self.state = next;
    }

    fn is_exit(&self, line: &str) -> bool {
        line.to_lowercase() == self.settings.exit_token.to_lowercase()
    }

    /// Next input line without its terminator, `None` at end of input.
    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .context("Failed to read user input")?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .await
            .context("Failed to write to output")?;
        self.writer
            .flush()
            .await
            .context("Failed to flush output")?;
        Ok(())
    }
}
