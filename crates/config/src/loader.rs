use std::path::Path;

use anyhow::bail;

use crate::Config;

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let config: Config = toml::from_str(&content)?;

    validate_paths(&config)?;

    Ok(config)
}

fn validate_paths(config: &Config) -> anyhow::Result<()> {
    if !config.api.path.starts_with('/') {
        bail!("api.path must start with '/', got '{}'", config.api.path);
    }

    if config.server.health.enabled && !config.server.health.path.starts_with('/') {
        bail!(
            "server.health.path must start with '/', got '{}'",
            config.server.health.path
        );
    }

    Ok(())
}
