use std::{collections::HashMap, env};

/// Local-only fallback secret for signing session cookies.
pub const LOCAL_SESSION_SECRET: &str = "bulldoggy-local-session-secret";

/// Demo accounts available when running locally without `BULLDOGGY_USERS`.
pub const LOCAL_USERS: &str = "pythonista:I<3testing,engineer:Muh5devices";

/// Session lifetime used when `SESSION_MAX_AGE_HOURS` is unset or out of range.
pub const DEFAULT_SESSION_MAX_AGE_HOURS: i64 = 168;

/// Longest accepted session lifetime (ten years).
pub const MAX_SESSION_MAX_AGE_HOURS: i64 = 24 * 365 * 10;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared read-only with every handler through `FromRef<AppState>`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls cookie hardening and secret fallbacks.
    pub env: Env,
    // Postgres connection string. `None` selects the in-memory repository.
    pub db_url: Option<String>,
    // HS256 secret used to sign and verify the `reminders_session` cookie.
    pub session_secret: String,
    // Lifetime of an issued session, in hours.
    pub session_max_age_hours: i64,
    // Known accounts: username -> password.
    pub users: HashMap<String, String>,
    // Directory mounted under `/static` (also holds the favicon).
    pub static_dir: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Defines the runtime context. Local mode allows fallbacks for secrets and the
/// database; production demands everything explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking configuration for test scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            session_secret: LOCAL_SESSION_SECRET.to_string(),
            session_max_age_hours: DEFAULT_SESSION_MAX_AGE_HOURS,
            users: parse_users(LOCAL_USERS),
            static_dir: "static".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables and fails fast.
    ///
    /// # Panics
    /// Panics in production when `DATABASE_URL`, `SESSION_SECRET` or
    /// `BULLDOGGY_USERS` is missing, so the server never starts with an
    /// insecure or incomplete configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let session_max_age_hours = env::var("SESSION_MAX_AGE_HOURS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|hours| (1..=MAX_SESSION_MAX_AGE_HOURS).contains(hours))
            .unwrap_or(DEFAULT_SESSION_MAX_AGE_HOURS);

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Without a database the app keeps reminders in memory.
                db_url: env::var("DATABASE_URL").ok(),
                session_secret: env::var("SESSION_SECRET")
                    .unwrap_or_else(|_| LOCAL_SESSION_SECRET.to_string()),
                session_max_age_hours,
                users: parse_users(
                    &env::var("BULLDOGGY_USERS").unwrap_or_else(|_| LOCAL_USERS.to_string()),
                ),
                static_dir,
                bind_addr,
            },
            Env::Production => {
                let users = parse_users(
                    &env::var("BULLDOGGY_USERS")
                        .expect("FATAL: BULLDOGGY_USERS required in prod"),
                );
                if users.is_empty() {
                    panic!("FATAL: BULLDOGGY_USERS contains no valid `name:password` entries");
                }

                Self {
                    env: Env::Production,
                    db_url: Some(
                        env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod"),
                    ),
                    session_secret: env::var("SESSION_SECRET")
                        .expect("FATAL: SESSION_SECRET must be set in production."),
                    session_max_age_hours,
                    users,
                    static_dir,
                    bind_addr,
                }
            }
        }
    }

    /// Path of the favicon served at `/favicon.ico`.
    pub fn favicon_path(&self) -> String {
        format!("{}/img/favicon.ico", self.static_dir.trim_end_matches('/'))
    }
}

/// parse_users
///
/// Parses `name:password` pairs separated by commas. Entries without a colon or
/// with an empty name are skipped; the password may itself contain colons.
pub fn parse_users(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|entry| {
            let (name, password) = entry.trim().split_once(':')?;
            let name = name.trim();
            if name.is_empty() || password.is_empty() {
                return None;
            }
            Some((name.to_string(), password.to_string()))
        })
        .collect()
}
