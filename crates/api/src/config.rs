use std::fmt::Display;
use std::str::FromStr;

use hotelops_core::transition::TransitionPolicy;
use hotelops_events::bus::DEFAULT_CAPACITY;

use crate::auth::jwt::{JwtConfig, DEFAULT_GUEST_TTL_DAYS, DEFAULT_STAFF_TTL_HOURS};

/// Startup configuration problem. The binary exits on any of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Credentials for the admin account created at startup if absent.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining the notification queue at shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Bounded size of the notification event queue (default: `256`).
    pub notification_queue_capacity: usize,
    pub transition_policy: TransitionPolicy,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                    |
    /// | `DATABASE_URL`                | **required**            |
    /// | `JWT_SECRET`                  | **required**            |
    /// | `JWT_STAFF_TTL_HOURS`         | `24`                    |
    /// | `JWT_GUEST_TTL_DAYS`          | `7`                     |
    /// | `NOTIFICATION_QUEUE_CAPACITY` | `256`                   |
    /// | `STATUS_TRANSITION_POLICY`    | `permissive`            |
    /// | `ADMIN_EMAIL`/`ADMIN_PASSWORD`| unset                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let shutdown_timeout_secs = parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30u64)?;

        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required(&lookup, "JWT_SECRET")?,
            staff_ttl_hours: parse_or(&lookup, "JWT_STAFF_TTL_HOURS", DEFAULT_STAFF_TTL_HOURS)?,
            guest_ttl_days: parse_or(&lookup, "JWT_GUEST_TTL_DAYS", DEFAULT_GUEST_TTL_DAYS)?,
        };

        let notification_queue_capacity =
            parse_or(&lookup, "NOTIFICATION_QUEUE_CAPACITY", DEFAULT_CAPACITY)?;
        if notification_queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "NOTIFICATION_QUEUE_CAPACITY",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let transition_policy =
            parse_or(&lookup, "STATUS_TRANSITION_POLICY", TransitionPolicy::Permissive)?;

        let bootstrap_admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            jwt,
            notification_queue_capacity,
            transition_policy,
            bootstrap_admin,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/hotelops"),
        ("JWT_SECRET", "s3cret"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, ["http://localhost:5173"]);
        assert_eq!(config.jwt.staff_ttl_hours, 24);
        assert_eq!(config.jwt.guest_ttl_days, 7);
        assert_eq!(config.notification_queue_capacity, 256);
        assert_eq!(config.transition_policy, TransitionPolicy::Permissive);
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn missing_or_empty_secret_is_rejected() {
        assert_matches!(
            load(&[REQUIRED[0]]),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
        assert_matches!(
            load(&[REQUIRED[0], ("JWT_SECRET", "  ")]),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn bad_numbers_name_the_variable() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        assert_matches!(load(&vars), Err(ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn strict_policy_and_bootstrap_admin() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("STATUS_TRANSITION_POLICY", "strict"),
            ("ADMIN_EMAIL", "root@hotel.test"),
            ("ADMIN_PASSWORD", "change-me-now"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.transition_policy, TransitionPolicy::Strict);
        assert_eq!(config.bootstrap_admin.unwrap().email, "root@hotel.test");
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
    }
}
