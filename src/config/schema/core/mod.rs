mod env_overrides;
mod loader;
#[cfg(test)]
mod test_env;
mod types;

pub use types::{Config, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PROVIDER};
