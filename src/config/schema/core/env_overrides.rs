use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) =
            std::env::var("GUARDCHAT_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY"))
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(base_url) = std::env::var("GUARDCHAT_BASE_URL")
            && !base_url.is_empty()
        {
            self.base_url = base_url;
        }

        if let Ok(model) = std::env::var("GUARDCHAT_MODEL")
            && !model.is_empty()
        {
            self.model = model;
        }

        if let Ok(temp_str) = std::env::var("GUARDCHAT_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.temperature = Some(temp);
        }
    }
}
