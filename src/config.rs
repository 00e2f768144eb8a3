//! Environment-driven configuration.
//! Every knob has a default so a bare `fitserve` starts against a local MySQL
//! with catalog files under `data/` and static assets under `public/`.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port.
    pub port: u16,
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Fixed admin credentials for /api/admin/login.
    pub admin_user: String,
    pub admin_pass: String,
    /// Server-held credential for the Groq chat proxy; the proxy refuses
    /// requests when unset.
    pub groq_api_key: Option<String>,
    /// Directory holding the catalog JSON files.
    pub data_dir: PathBuf,
    /// Directory served as static front-end assets.
    pub public_dir: PathBuf,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(6800);
        Self {
            port,
            db_host: env_or("DB_HOST", "localhost"),
            db_user: env_or("DB_USER", "root"),
            db_password: env_or("DB_PASSWORD", "root1"),
            db_name: env_or("DB_NAME", "fit"),
            admin_user: env_or("ADMIN_USER", "admin"),
            admin_pass: env_or("ADMIN_PASS", "admin123"),
            groq_api_key: std::env::var("GROQ_API_KEY").ok().filter(|s| !s.is_empty()),
            data_dir: PathBuf::from(env_or("FITSERVE_DATA_DIR", "data")),
            public_dir: PathBuf::from(env_or("FITSERVE_PUBLIC_DIR", "public")),
        }
    }

    /// Connection URL for the external `user` table.
    pub fn mysql_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}/{}",
            self.db_user, self.db_password, self.db_host, self.db_name
        )
    }
}
