pub mod client;
pub mod dashboard;
pub mod domain;
pub mod format;
pub mod pipeline;
pub mod view;

#[cfg(test)]
mod testing;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5002/api";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub http_timeout_secs: Option<u64>,
        pub log_file: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let http_timeout_secs = match std::env::var("STOCKPICK_HTTP_TIMEOUT_SECS") {
                Ok(s) if !s.trim().is_empty() => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("STOCKPICK_HTTP_TIMEOUT_SECS is not a number: {s}"))?,
                ),
                _ => None,
            };

            Ok(Self {
                api_base_url: non_empty_var("STOCKPICK_API_BASE_URL"),
                http_timeout_secs,
                log_file: non_empty_var("STOCKPICK_LOG_FILE"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn api_base_url(&self) -> &str {
            self.api_base_url
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL)
        }

        pub fn with_api_base_url(mut self, base_url: Option<String>) -> Self {
            if let Some(url) = base_url.filter(|s| !s.trim().is_empty()) {
                self.api_base_url = Some(url);
            }
            self
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn empty() -> Settings {
            Settings {
                api_base_url: None,
                http_timeout_secs: None,
                log_file: None,
                sentry_dsn: None,
            }
        }

        #[test]
        fn falls_back_to_local_backend() {
            assert_eq!(empty().api_base_url(), DEFAULT_API_BASE_URL);
        }

        #[test]
        fn cli_override_wins_unless_blank() {
            let s = empty().with_api_base_url(Some("http://example.test/api".to_string()));
            assert_eq!(s.api_base_url(), "http://example.test/api");

            let s = s.with_api_base_url(Some("  ".to_string()));
            assert_eq!(s.api_base_url(), "http://example.test/api");
        }
    }
}
