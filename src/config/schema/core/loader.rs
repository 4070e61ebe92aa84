use super::Config;
use anyhow::{Context, Result, bail};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// `~/.guardchat/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(".guardchat").join("config.toml"))
    }

    /// Load the config file (defaults when the default path has no file),
    /// then apply environment overrides and validate.
    ///
    /// An explicit `path_override` must exist.
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let config_path = match path_override {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => Self::default_config_path()?,
        };

        let mut config = Self::read_file(&config_path)?;
        config.config_path = config_path;
        config.apply_env_overrides();
        config.chat.normalize();
        config.validate()?;
        Ok(config)
    }

    fn read_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        tracing::debug!(path = %config_path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
