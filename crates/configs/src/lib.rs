use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Secret used when nothing is configured. Refused in production.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool { matches!(self, Environment::Production) }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(anyhow!("unknown environment '{other}' (expected development, production or test)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 5000, worker_threads: Some(4), static_dir: default_static_dir() }
    }
}

fn default_static_dir() -> String { "dist/public".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_run_migrations() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self { Self { jwt_secret: default_jwt_secret(), token_ttl_hours: default_token_ttl() } }
}

fn default_jwt_secret() -> String { DEV_JWT_SECRET.into() }
fn default_token_ttl() -> i64 { 12 }

/// Allowed browser origins. An entry starting with `*.` matches any origin
/// ending in the remainder (e.g. `*.repl.co`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|pattern| match pattern.strip_prefix("*.") {
            Some(suffix) => origin.ends_with(&format!(".{suffix}")),
            None => pattern == origin,
        })
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file when present, defaults otherwise; then environment
    /// overrides and validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow!("PORT must be an integer in 1024..=65535, got '{port}'"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = threads.trim().parse::<usize>().ok();
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.server.static_dir = dir;
        }
        if let Some(env) = lookup("APP_ENV") {
            self.environment = Environment::parse(&env)?;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = ttl
                .trim()
                .parse::<i64>()
                .map_err(|_| anyhow!("TOKEN_TTL_HOURS must be an integer, got '{ttl}'"))?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors.origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate(self.environment)?;
        if self.cors.origins.is_empty() {
            self.cors.origins = default_origins(self.server.port);
        }
        Ok(())
    }
}

fn default_origins(port: u16) -> Vec<String> {
    vec![
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
        format!("http://0.0.0.0:{port}"),
        "*.repl.co".to_string(),
    ]
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("server.host cannot be empty"));
        }
        if self.port < 1024 {
            return Err(anyhow!("server.port must be >= 1024 (non-privileged ports), got {}", self.port));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn validate(&self, env: Environment) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret cannot be empty"));
        }
        if env.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            return Err(anyhow!("JWT_SECRET must be set in production"));
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn with_db() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/marketplace".into();
        cfg
    }

    #[test]
    fn defaults_follow_expected_values() {
        let mut cfg = with_db();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.environment, Environment::Development);
        assert!(cfg.cors.allows("http://localhost:5000"));
        assert!(cfg.cors.allows("https://my-app.repl.co"));
        assert!(!cfg.cors.allows("https://evil.example.com"));
    }

    #[test]
    fn env_overrides_are_applied() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(lookup(&[
            ("DATABASE_URL", "postgresql://db/app"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("APP_ENV", "test"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.environment, Environment::Test);
        assert_eq!(cfg.cors.origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn privileged_port_is_rejected() {
        let mut cfg = with_db();
        cfg.server.port = 80;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(lookup(&[("PORT", "abc")])).is_err());
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = cfg.normalize_and_validate().unwrap_err();
        assert!(err.to_string().contains("database.url"));
    }

    #[test]
    fn production_requires_real_secret() {
        let mut cfg = with_db();
        cfg.environment = Environment::Production;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = with_db();
        cfg.environment = Environment::Production;
        cfg.auth.jwt_secret = "a-long-random-secret".into();
        assert!(cfg.normalize_and_validate().is_ok());
    }

    #[test]
    fn toml_file_is_parsed() {
        let cfg: AppConfig = toml::from_str(
            r#"
            environment = "production"
            [server]
            host = "127.0.0.1"
            port = 9000
            [database]
            url = "postgres://db/app"
            max_connections = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 5);
        assert!(cfg.database.run_migrations);
    }
}
