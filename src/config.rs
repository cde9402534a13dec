use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub agent_token: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_email: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_timeout: Duration,
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(3000),
            agent_token: env::var("AGENT_TOKEN").unwrap_or_default(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: parse_var("SMTP_PORT").unwrap_or(587),
            smtp_email: non_empty_var("SMTP_EMAIL"),
            smtp_password: non_empty_var("SMTP_PASSWORD"),
            smtp_timeout: Duration::from_secs(parse_var("SMTP_TIMEOUT_SECS").unwrap_or(30)),
            session_ttl: Duration::from_secs(parse_var("SESSION_TTL_SECS").unwrap_or(3600)),
            sweep_interval: Duration::from_secs(
                parse_var::<u64>("SESSION_SWEEP_SECS").unwrap_or(60).max(1),
            ),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
