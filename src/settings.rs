use serde::{Deserialize, Serialize};
use std::fs;

use crate::models::Provider;

/// Built-in signing secret for development setups without a `SESSION_SECRET`.
/// Startup refuses to fall back to this value in production mode.
pub const DEV_SESSION_SECRET: &str = "authgate-dev-secret-not-for-production-use";

/// Upper bound on the session TTL (one year). Duration arithmetic overflows
/// far above this, and a longer setting is a configuration mistake anyway.
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthgateSettings {
    #[serde(default)]
    pub application: ApplicationSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Allowed browser origin for credentialed cross-origin requests.
    pub cors_origin: String,
    /// Deployment-mode flag. Drives the `Secure` cookie attribute and makes
    /// an explicit session secret mandatory.
    pub production: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Shared HMAC signing secret for session tokens.
    pub secret: String,
    /// Session token lifetime; the cookie max-age matches it.
    pub ttl_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub name: String,

    // Direct values (can be overridden by environment variables)
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    // Environment variable names for overrides
    pub client_id_env: Option<String>,
    pub client_secret_env: Option<String>,
}

/// Resolved OAuth client credentials for one provider.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Default for AuthgateSettings {
    fn default() -> Self {
        Self {
            application: ApplicationSettings::default(),
            session: SessionSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origin: "http://localhost:5173".to_string(),
            production: false,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secret: String::new(), // Resolved during load
            ttl_hours: 1,
        }
    }
}

fn default_providers() -> Vec<ProviderSettings> {
    vec![
        ProviderSettings {
            name: "google".to_string(),
            client_id: None,
            client_secret: None,
            client_id_env: Some("GOOGLE_CLIENT_ID".to_string()),
            client_secret_env: Some("GOOGLE_CLIENT_SECRET".to_string()),
        },
        ProviderSettings {
            name: "github".to_string(),
            client_id: None,
            client_secret: None,
            client_id_env: Some("GITHUB_CLIENT_ID".to_string()),
            client_secret_env: Some("GITHUB_CLIENT_SECRET".to_string()),
        },
    ]
}

impl AuthgateSettings {
    /// Load settings from `Settings.toml` (if present) and environment
    /// variables. This also loads a `.env` file and initializes the logger.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - `Settings.toml` cannot be read or parsed
    /// - Production mode is enabled without an explicit session secret
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();
        env_logger::try_init()?;

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        settings.clamp_session_ttl();
        settings.resolve_session_secret()?;

        Ok(settings)
    }

    /// Load base settings from `Settings.toml` in the current directory,
    /// falling back to defaults when the file does not exist.
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::path::PathBuf::from("Settings.toml");
        if config_path.exists() {
            let toml_content = fs::read_to_string(&config_path)?;
            let settings = basic_toml::from_str(&toml_content)?;
            log::info!("Loaded base settings from {}", config_path.display());
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_session_env_overrides(&mut settings.session);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("CORS_ORIGIN") {
            app_settings.cors_origin = cors_origin;
        }
        if let Ok(production_str) = std::env::var("PRODUCTION") {
            if let Ok(production) = production_str.parse::<bool>() {
                app_settings.production = production;
            }
        }
    }

    /// Apply environment overrides for session settings
    pub fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            if !secret.is_empty() {
                session_settings.secret = secret;
            }
        }
        if let Ok(ttl_str) = std::env::var("SESSION_TTL_HOURS") {
            if let Ok(ttl) = ttl_str.parse::<u64>() {
                session_settings.ttl_hours = ttl;
            }
        }
    }

    /// Keep the session TTL within `1..=MAX_SESSION_TTL_HOURS`. Zero would
    /// mint tokens that are dead on arrival; absurdly large values overflow
    /// duration arithmetic.
    pub fn clamp_session_ttl(&mut self) {
        let ttl = self.session.ttl_hours;
        if ttl == 0 || ttl > MAX_SESSION_TTL_HOURS {
            let clamped = ttl.clamp(1, MAX_SESSION_TTL_HOURS);
            log::warn!("SESSION_TTL_HOURS {ttl} is out of range; using {clamped}");
            self.session.ttl_hours = clamped;
        }
    }

    /// Require an explicit secret in production; fall back to the labeled
    /// development secret otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if production mode is enabled and no session secret
    /// was supplied.
    pub fn resolve_session_secret(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.session.secret.is_empty() {
            return Ok(());
        }
        if self.application.production {
            return Err(
                "SESSION_SECRET must be set when running in production mode".into(),
            );
        }
        log::warn!(
            "SESSION_SECRET is not set; using the built-in development secret. \
             Never deploy this configuration."
        );
        self.session.secret = DEV_SESSION_SECRET.to_string();
        Ok(())
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Whether session cookies carry the `Secure` attribute.
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.application.production
    }

    /// Resolve the client credentials for `provider`, or `None` when either
    /// half is missing from configuration and environment.
    #[must_use]
    pub fn resolve_credentials(&self, provider: Provider) -> Option<ClientCredentials> {
        let entry = self.providers.iter().find(|p| p.name == provider.as_str())?;
        Some(ClientCredentials {
            client_id: entry.get_client_id()?,
            client_secret: entry.get_client_secret()?,
        })
    }
}

impl ProviderSettings {
    /// Get the client ID, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.client_id.clone().filter(|v| !v.is_empty())
    }

    /// Get the client secret, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_secret(&self) -> Option<String> {
        if let Some(env_var) = &self.client_secret_env {
            if let Ok(value) = std::env::var(env_var) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.client_secret.clone().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clean_env_vars() {
        std::env::remove_var("SESSION_SECRET");
        std::env::remove_var("SESSION_TTL_HOURS");
        std::env::remove_var("PRODUCTION");
        std::env::remove_var("GOOGLE_CLIENT_ID");
        std::env::remove_var("GOOGLE_CLIENT_SECRET");
    }

    #[test]
    fn test_default_settings() {
        let settings = AuthgateSettings::default();
        assert_eq!(settings.application.port, 5000);
        assert!(!settings.application.production);
        assert_eq!(settings.session.ttl_hours, 1);
        assert_eq!(settings.session.secret, "");
        assert_eq!(settings.providers.len(), 2);
    }

    #[test]
    #[serial]
    fn test_session_secret_env_override() {
        clean_env_vars();

        let mut session_settings = SessionSettings {
            secret: "from-toml".to_string(),
            ttl_hours: 1,
        };

        std::env::set_var("SESSION_SECRET", "env-override-secret");
        AuthgateSettings::apply_session_env_overrides(&mut session_settings);
        assert_eq!(session_settings.secret, "env-override-secret");

        clean_env_vars();
    }

    #[test]
    fn test_session_ttl_is_clamped() {
        let mut settings = AuthgateSettings::default();

        settings.session.ttl_hours = u64::MAX;
        settings.clamp_session_ttl();
        assert_eq!(settings.session.ttl_hours, MAX_SESSION_TTL_HOURS);

        settings.session.ttl_hours = 0;
        settings.clamp_session_ttl();
        assert_eq!(settings.session.ttl_hours, 1);

        // In-range values pass through untouched.
        settings.session.ttl_hours = 12;
        settings.clamp_session_ttl();
        assert_eq!(settings.session.ttl_hours, 12);
    }

    #[test]
    #[serial]
    fn test_dev_secret_fallback_outside_production() {
        clean_env_vars();

        let mut settings = AuthgateSettings::default();
        settings.resolve_session_secret().unwrap();
        assert_eq!(settings.session.secret, DEV_SESSION_SECRET);
    }

    #[test]
    #[serial]
    fn test_production_requires_explicit_secret() {
        clean_env_vars();

        let mut settings = AuthgateSettings::default();
        settings.application.production = true;
        assert!(settings.resolve_session_secret().is_err());

        // An explicit secret satisfies production mode.
        settings.session.secret = "explicit".to_string();
        assert!(settings.resolve_session_secret().is_ok());
        assert_eq!(settings.session.secret, "explicit");
    }

    #[test]
    #[serial]
    fn test_resolve_credentials_from_env() {
        clean_env_vars();

        let settings = AuthgateSettings::default();
        assert!(settings.resolve_credentials(Provider::Google).is_none());

        std::env::set_var("GOOGLE_CLIENT_ID", "id-123");
        // Only half of the pair present: still unconfigured.
        assert!(settings.resolve_credentials(Provider::Google).is_none());

        std::env::set_var("GOOGLE_CLIENT_SECRET", "secret-456");
        let credentials = settings.resolve_credentials(Provider::Google).unwrap();
        assert_eq!(credentials.client_id, "id-123");
        assert_eq!(credentials.client_secret, "secret-456");

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_demo_provider_needs_no_credentials_entry() {
        clean_env_vars();

        // The demo adapter performs no network calls, so the provider list
        // deliberately has no demo entry.
        let settings = AuthgateSettings::default();
        assert!(settings.resolve_credentials(Provider::Demo).is_none());
    }
}
