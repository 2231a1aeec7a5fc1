use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub http: HttpConfig,
    pub pagination: PaginationConfig,
    pub filter: FilterConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Public origin used to build absolute `Link` URLs, e.g. `https://social.example`
    pub base_url: String,
    pub port: u16,
}

/// Page size policy for one list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitPolicy {
    pub default: u32,
    pub max: u32,
}

impl LimitPolicy {
    pub const fn new(default: u32, max: u32) -> Self {
        Self { default, max }
    }

    /// Page size used when the request names none; never above `max`
    pub fn default_limit(&self) -> u32 {
        self.default.min(self.max)
    }

    /// Replace `max`, pulling `default` down with it. Zero is ignored.
    fn with_max(mut self, max: u32) -> Self {
        if max > 0 {
            self.max = max;
            self.default = self.default.min(max);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub statuses: LimitPolicy,
    pub account_statuses: LimitPolicy,
    pub accounts: LimitPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub allow_raw_sql: bool,
    pub max_nested_depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_slow_query_warning: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub enable_audit_logging: bool,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // HTTP overrides
        if let Ok(v) = env::var("HTTP_BASE_URL") {
            self.http.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("PORT") {
            self.http.port = v.parse().unwrap_or(self.http.port);
        }

        // Pagination overrides
        if let Some(max) = env_u32("PAGINATION_STATUSES_MAX_LIMIT") {
            self.pagination.statuses = self.pagination.statuses.with_max(max);
        }
        if let Some(max) = env_u32("PAGINATION_ACCOUNT_STATUSES_MAX_LIMIT") {
            self.pagination.account_statuses = self.pagination.account_statuses.with_max(max);
        }
        if let Some(max) = env_u32("PAGINATION_ACCOUNTS_MAX_LIMIT") {
            self.pagination.accounts = self.pagination.accounts.with_max(max);
        }

        // Filter overrides
        if let Ok(v) = env::var("FILTER_ALLOW_RAW_SQL") {
            self.filter.allow_raw_sql = v.parse().unwrap_or(self.filter.allow_raw_sql);
        }
        if let Ok(v) = env::var("FILTER_MAX_NESTED_DEPTH") {
            self.filter.max_nested_depth = v.parse().unwrap_or(self.filter.max_nested_depth);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms = v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v.parse().unwrap_or(self.security.enable_audit_logging);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }

        self
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }

    fn pagination_defaults() -> PaginationConfig {
        PaginationConfig {
            statuses: LimitPolicy::new(20, 80),
            account_statuses: LimitPolicy::new(20, 40),
            accounts: LimitPolicy::new(40, 80),
        }
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            http: HttpConfig {
                base_url: "http://localhost:3000".to_string(),
                port: 3000,
            },
            pagination: Self::pagination_defaults(),
            filter: FilterConfig {
                allow_raw_sql: true,
                max_nested_depth: 10,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 100,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                enable_audit_logging: false,
                jwt_secret: String::new(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            http: HttpConfig {
                base_url: "https://staging.example.com".to_string(),
                port: 8080,
            },
            pagination: Self::pagination_defaults(),
            filter: FilterConfig {
                allow_raw_sql: false,
                max_nested_depth: 5,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 500,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                enable_audit_logging: true,
                jwt_secret: String::new(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            http: HttpConfig {
                base_url: "https://app.example.com".to_string(),
                port: 8080,
            },
            pagination: Self::pagination_defaults(),
            filter: FilterConfig {
                allow_raw_sql: false,
                max_nested_depth: 5,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 1000,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                enable_audit_logging: true,
                jwt_secret: String::new(),
            },
        }
    }
}

fn env_u32(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.filter.allow_raw_sql);
        assert_eq!(config.pagination.statuses, LimitPolicy::new(20, 80));
        assert_eq!(config.pagination.accounts.default, 40);
        assert!(config.is_development());
    }

    #[test]
    fn lowering_max_pulls_default_down() {
        let policy = LimitPolicy::new(40, 80).with_max(30);
        assert_eq!(policy, LimitPolicy::new(30, 30));
        assert_eq!(LimitPolicy::new(20, 80).with_max(40), LimitPolicy::new(20, 40));
        assert_eq!(LimitPolicy::new(20, 80).with_max(0), LimitPolicy::new(20, 80));
        assert_eq!(LimitPolicy::new(40, 30).default_limit(), 30);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.filter.allow_raw_sql);
        assert_eq!(config.pagination.account_statuses.max, 40);
        assert!(config.security.jwt_secret.is_empty());
    }
}
