use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `guardchat` - terminal chat with a guardrail-gated assistant.
#[derive(Parser, Debug)]
#[command(name = "guardchat")]
#[command(version)]
#[command(
    about = "Chat with an LLM assistant whose input is screened by a guardrail model.",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.guardchat/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; a bare `guardchat` starts an interactive chat.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start a chat session (default)
    Chat {
        /// Model to use for both the assistant and the guardrail
        #[arg(long)]
        model: Option<String>,

        /// OpenAI-compatible API base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Sampling temperature (0.0 - 2.0)
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Skip the guardrail classifier
        #[arg(long)]
        no_guardrail: bool,

        /// Single message mode (answer once, don't read stdin)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Run only the guardrail classifier on TEXT and print its verdict
    Classify {
        /// Text to classify
        text: String,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Chat {
            model: None,
            base_url: None,
            temperature: None,
            no_guardrail: false,
            message: None,
        }
    }
}
