use reelfetch_config::HttpConfig;
use reqwest::Client;

/// Shared outbound client. Every call made through it carries the
/// configured timeout instead of reqwest's unbounded default.
pub fn build_http_client(config: &HttpConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .build()
}
