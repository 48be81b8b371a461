use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Storage
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub seed_sample_tasks: bool,

    // Text generation service (disabled when unset)
    pub ai_service_url: Option<String>,
    pub ai_service_timeout_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = Environment::parse(&lookup("ENV").unwrap_or_else(|| "dev".to_string()));
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string());

        let data_dir = lookup("DATA_DIR").unwrap_or_else(|| "data".to_string()).into();
        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string()).into();
        let seed_sample_tasks = lookup("SEED_SAMPLE_TASKS")
            .and_then(|s| parse_bool(&s))
            .unwrap_or(true);

        let ai_service_url = lookup("AI_SERVICE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let ai_service_timeout_seconds = lookup("AI_SERVICE_TIMEOUT_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Settings {
            env,
            server_addr,
            data_dir,
            static_dir,
            seed_sample_tasks,
            ai_service_url,
            ai_service_timeout_seconds,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
