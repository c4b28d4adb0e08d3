//! Data Transfer Objects
//!
//! Request and response types for the auth and timeline endpoints.
//! Responses are deserialized here, at the client boundary, so nothing
//! downstream handles untyped JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// AUTH DTOs
// ============================================

/// Login request body
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Registration request body
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Password change request body
#[derive(Debug, Serialize)]
pub(crate) struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

/// E-mail verification request body
#[derive(Debug, Serialize)]
pub(crate) struct VerifyEmailRequest<'a> {
    pub token: &'a str,
}

/// Resend-verification request body
#[derive(Debug, Serialize)]
pub(crate) struct ResendVerificationRequest<'a> {
    pub email: &'a str,
}

/// Issued credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer credential
    pub access_token: String,
    /// Always "bearer" in practice
    pub token_type: String,
    /// Lifetime in seconds, as reported by the server
    pub expires_in: u64,
}

/// Registration outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(default)]
    pub verification_sent: bool,
}

/// Result of `/auth/verify-token`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatus {
    pub valid: bool,
}

/// Generic `{"message": ...}` acknowledgement
///
/// An empty body decodes to the default, an empty message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Result of e-mail verification
///
/// A successful verification logs the user in, so the response may carry
/// a credential and the freshly verified profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Server-side user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub last_login: Option<DateTime<Utc>>,
}

// ============================================
// TIMELINE DTOs
// ============================================

/// A publisher continuity era
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Era {
    pub id: i64,
    pub title: String,
    /// `[start, end]` publication years
    pub years: (i32, i32),
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_event: Option<String>,
}

impl Era {
    /// First publication year of the era
    pub fn start_year(&self) -> i32 {
        self.years.0
    }

    /// Last publication year of the era
    pub fn end_year(&self) -> i32 {
        self.years.1
    }
}

/// Timestamps arrive either as RFC 3339 or as naive ISO-8601 (taken as UTC)
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw))),
                None => Ok(None),
            }
        }
    }
}
