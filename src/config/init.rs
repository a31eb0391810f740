use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::followup::FollowUpConfig;
use crate::scoring::Market;

const HEADER: &str = "\
# lead-triage configuration
#
# market: which weight table to start from (us, uae)
# scoring: override any weight of that table, e.g.
#   scoring:
#     hot_threshold: 75
#     budget:
#       - { range: \">=2000000\", bonus: 25 }
# follow_up: drip offsets (humantime) and SMS quiet hours (lead's local time)
#   utc_offset: \"-05:00\"   leads' time zone; unset uses this machine's
";

/// A config that selects `market` and spells out the follow-up defaults.
pub fn starter_config(market: Market) -> Config {
    Config {
        market: Some(market),
        scoring: None,
        follow_up: Some(FollowUpConfig::default()),
    }
}

/// Write a config file atomically, creating parent directories as needed.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_config(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    tracing::info!(path = %path.display(), "config written");
    Ok(())
}
