use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity providers supported for login.
///
/// A closed set rather than a string-keyed lookup so that adapter dispatch
/// is checked exhaustively at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    GitHub,
    Demo,
}

impl Provider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a request names a provider outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown provider: {}", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::GitHub),
            "demo" => Ok(Self::Demo),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Normalized user record, provider-agnostic.
///
/// `id` and `provider` together identify a user for session purposes.
/// `email` may be absent when a provider exposes no primary email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIdentity {
    pub id: String,
    pub email: Option<String>,
    pub name: String,
    pub provider: Provider,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trips_through_str() {
        for provider in [Provider::Google, Provider::GitHub, Provider::Demo] {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = "facebook".parse::<Provider>().unwrap_err();
        assert_eq!(err, UnknownProvider("facebook".to_string()));
    }

    #[test]
    fn test_provider_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Provider::GitHub).unwrap(),
            "\"github\""
        );
    }

    #[test]
    fn test_identity_serialization_shape() {
        let identity = CanonicalIdentity {
            id: "42".to_string(),
            email: None,
            name: "Octo Cat".to_string(),
            provider: Provider::GitHub,
        };

        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(value["id"], "42");
        assert_eq!(value["email"], serde_json::Value::Null);
        assert_eq!(value["name"], "Octo Cat");
        assert_eq!(value["provider"], "github");
    }
}
