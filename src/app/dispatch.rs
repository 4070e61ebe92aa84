use crate::agent::{Agent, ChatLoop, KeywordGuardrail, ModelGuardrail};
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::LlmError;
use crate::llm::{Provider, ProviderMessage, create_provider};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

const OUTPUT_GUARDRAIL_NAME: &str = "Blocked terms";

/// Flags of `guardchat chat` that override the loaded config.
#[derive(Debug, Default, Clone)]
pub struct ChatOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f64>,
}

impl ChatOverrides {
    /// Apply on top of file and env settings, then re-validate.
    pub fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if self.temperature.is_some() {
            config.temperature = self.temperature;
        }
        config.validate().context("Invalid command-line override")?;
        Ok(())
    }
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Commands::Init { force } => init_config(cli.config.as_deref(), force),

        Commands::Chat {
            model,
            base_url,
            temperature,
            no_guardrail,
            message,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            ChatOverrides {
                model,
                base_url,
                temperature,
            }
            .apply(&mut config)?;
            run_chat(&config, !no_guardrail, message).await
        }

        Commands::Classify { text } => {
            let config = Config::load(cli.config.as_deref())?;
            run_classify(&config, &text).await
        }
    }
}

/// Assemble the assistant with the guardrails `config` asks for.
///
/// The classifier gates input when `guardrail.enabled` and `use_guardrail`
/// are both set; the keyword check gates output when terms are configured.
pub fn build_agent(config: &Config, provider: &Arc<dyn Provider>, use_guardrail: bool) -> Agent {
    let mut agent = Agent::from_config(config, Arc::clone(provider));

    if use_guardrail && config.guardrail.enabled {
        agent = agent.with_input_guardrail(Arc::new(ModelGuardrail::from_config(
            Arc::clone(provider),
            &config.guardrail,
            &config.model,
            config.temperature,
        )));
    } else {
        info!("Input guardrail disabled");
    }

    let blocked_terms =
        KeywordGuardrail::new(OUTPUT_GUARDRAIL_NAME, &config.guardrail.output_blocked_terms);
    if !blocked_terms.is_empty() {
        agent = agent.with_output_guardrail(Arc::new(blocked_terms));
    }

    agent
}

fn require_api_key(config: &Config) -> Result<()> {
    if config.has_api_key() {
        return Ok(());
    }
    Err(LlmError::MissingApiKey {
        provider: config.provider.clone(),
    }
    .into())
}

async fn run_chat(config: &Config, use_guardrail: bool, message: Option<String>) -> Result<()> {
    require_api_key(config)?;
    let provider = create_provider(config);
    let agent = build_agent(config, &provider, use_guardrail);

    info!(
        model = %config.model,
        base_url = %config.base_url,
        input_guardrails = agent.input_guardrail_count(),
        output_guardrails = agent.output_guardrail_count(),
        "Starting chat"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let mut chat = ChatLoop::new(&agent, stdin, stdout, config.chat.clone());

    match message {
        Some(text) => chat.submit(&text).await?,
        None => {
            chat.run().await?;
        }
    }
    Ok(())
}

async fn run_classify(config: &Config, text: &str) -> Result<()> {
    require_api_key(config)?;
    let provider = create_provider(config);
    let classifier =
        ModelGuardrail::from_config(provider, &config.guardrail, &config.model, config.temperature);

    let verdict = classifier.classify(&[ProviderMessage::user(text)]).await?;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

fn init_config(path_override: Option<&Path>, force: bool) -> Result<()> {
    let config_path = match path_override {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    if config_path.exists() && !force {
        bail!(
            "Config file {} already exists (pass --force to overwrite)",
            config_path.display()
        );
    }

    let config = Config {
        config_path,
        ..Config::default()
    };
    config.save()?;
    println!("Wrote default config to {}", config.config_path.display());
    Ok(())
}
