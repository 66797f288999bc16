use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_UPSTREAM_URL: &str = "https://lite.duckduckgo.com/lite/";
pub const DEFAULT_RESULT_CAP: usize = 5;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_EXCLUDED_HOSTS: &[&str] = &["duckduckgo.com", "//r.search.yahoo.com"];

/// Runtime settings for the proxy. Built once at startup and handed to the
/// server; nothing reads the environment after that.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub upstream_url: String,
    pub result_cap: usize,
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Fragments that disqualify a link when found anywhere in its url: the
    /// engine's domain and redirect wrappers.
    pub excluded_hosts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            result_cap: DEFAULT_RESULT_CAP,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            excluded_hosts: DEFAULT_EXCLUDED_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        dotenv().ok(); // Load .env file if present
        let defaults = Config::default();
        Config {
            bind_addr: get_env_or_default("SEARCH_PROXY_BIND", &defaults.bind_addr),
            port: get_env_parsed("SEARCH_PROXY_PORT", defaults.port),
            upstream_url: get_env_or_default("SEARCH_UPSTREAM_URL", &defaults.upstream_url),
            result_cap: get_env_parsed("SEARCH_RESULT_CAP", defaults.result_cap),
            timeout_ms: get_env_parsed("SEARCH_TIMEOUT_MS", defaults.timeout_ms),
            user_agent: get_env_or_default("SEARCH_USER_AGENT", &defaults.user_agent),
            excluded_hosts: env::var("SEARCH_EXCLUDED_HOSTS")
                .map(|v| parse_host_list(&v))
                .unwrap_or(defaults.excluded_hosts),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {key}={raw:?}, using {default}");
            default
        }),
        Err(_) => default,
    }
}

pub fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_deployment() {
        let config = Config::default();
        assert_eq!(config.port, 8081);
        assert_eq!(config.result_cap, 5);
        assert_eq!(config.listen_addr(), "127.0.0.1:8081");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.excluded_hosts.contains(&"duckduckgo.com".to_string()));
    }

    #[test]
    fn test_parse_host_list() {
        assert_eq!(
            parse_host_list(" Example.com, ,r.search.yahoo.com,"),
            vec!["example.com".to_string(), "r.search.yahoo.com".to_string()]
        );
        assert!(parse_host_list("").is_empty());
    }
}
