use std::env;

/// Optional behaviors the product has not committed to yet. Each flag is
/// off by default, matching current policy: publication is one-way,
/// grading is final, and teacher-entered scores are not capped.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapabilityPolicy {
    pub allow_unpublish: bool,
    pub allow_regrade: bool,
    pub enforce_score_ceiling: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub capabilities: CapabilityPolicy,
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizly-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            capabilities: CapabilityPolicy {
                allow_unpublish: env_flag("ALLOW_UNPUBLISH"),
                allow_regrade: env_flag("ALLOW_REGRADE"),
                enforce_score_ceiling: env_flag("ENFORCE_SCORE_CEILING"),
            },
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizly-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            capabilities: CapabilityPolicy::default(),
        }
    }
}
