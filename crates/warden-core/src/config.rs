use std::{env, fs, path::Path, time::Duration};

use crate::{
    dispatch::{ChannelPolicy, ChannelRule},
    domain::{ChannelId, GuildId},
    errors::Error,
    Result,
};

/// Typed configuration, loaded once at process start and immutable after.
#[derive(Clone, Debug)]
pub struct Config {
    /// Discord bot token (gateway login).
    pub discord_token: String,
    /// Bearer credential for the backend admin API. Never logged.
    pub api_key: String,
    /// Backend base URL; endpoints are appended verbatim.
    pub backend_url: String,
    /// Command prefix, e.g. `,`.
    pub prefix: String,
    /// The single guild this deployment is allowed to live in.
    pub home_guild_id: GuildId,
    /// Structural constraints on specific channels.
    pub channel_policies: Vec<ChannelPolicy>,
    /// Timeout applied to every backend HTTP call.
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let discord_token = require_env("DISCORD_TOKEN")?;
        let api_key = require_env("API_KEY")?;
        let backend_url = require_env("BACKEND_URL")?;

        let home_guild_id = require_env("HOME_GUILD_ID")?
            .parse::<u64>()
            .map(GuildId)
            .map_err(|_| Error::Config("HOME_GUILD_ID must be a numeric guild id".to_string()))?;

        let prefix = env_str("PREFIX").and_then(non_empty).unwrap_or_else(|| ",".to_string());

        let mut channel_policies = Vec::new();
        if let Some(channel) = env_channel_id("SUGGEST_CHANNEL_ID")? {
            let suggest_prefix = env_str("SUGGEST_PREFIX")
                .and_then(non_empty)
                .unwrap_or_else(|| format!("{prefix}suggest"));
            channel_policies.push(ChannelPolicy {
                channel_id: channel,
                rule: ChannelRule::RequirePrefix(suggest_prefix),
            });
        }
        if let Some(channel) = env_channel_id("KEYWORD_CHANNEL_ID")? {
            let token = env_str("KEYWORD_TOKEN").and_then(non_empty).ok_or_else(|| {
                Error::Config("KEYWORD_TOKEN is required when KEYWORD_CHANNEL_ID is set".to_string())
            })?;
            channel_policies.push(ChannelPolicy {
                channel_id: channel,
                rule: ChannelRule::RequireExact(token),
            });
        }

        let http_timeout = Duration::from_secs(env_u64("HTTP_TIMEOUT_SECS").unwrap_or(30));

        Ok(Self {
            discord_token,
            api_key,
            backend_url,
            prefix,
            home_guild_id,
            channel_policies,
            http_timeout,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    env_str(key)
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_channel_id(key: &str) -> Result<Option<ChannelId>> {
    let Some(raw) = env_str(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|id| Some(ChannelId(id)))
        .map_err(|_| Error::Config(format!("{key} must be a numeric channel id")))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Minimal `.env` loader; never overrides variables already set.
fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() || env::var_os(key).is_some() {
            continue;
        }

        let mut val = v.trim().to_string();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_whitespace_only_values() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }

    #[test]
    fn dotenv_does_not_override_existing_vars() {
        let dir = std::env::temp_dir().join(format!("warden-dotenv-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(".env");
        fs::write(&file, "WARDEN_TEST_EXISTING=from_file\nWARDEN_TEST_FRESH=\"quoted\"\n").unwrap();

        env::set_var("WARDEN_TEST_EXISTING", "from_env");
        load_dotenv_if_present(&file);

        assert_eq!(env::var("WARDEN_TEST_EXISTING").unwrap(), "from_env");
        assert_eq!(env::var("WARDEN_TEST_FRESH").unwrap(), "quoted");

        let _ = fs::remove_dir_all(&dir);
    }
}
