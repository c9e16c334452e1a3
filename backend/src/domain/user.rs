//! User identity, role and balance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum length of an opaque user identifier.
pub const USER_ID_MAX: usize = 128;

/// Validation errors raised while constructing user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be at most {max} characters")]
    IdTooLong { max: usize },
    #[error("user id may only contain ASCII letters, digits, '-' or '_'")]
    InvalidIdCharacters,
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}

/// Opaque user identifier issued by the identity provider.
///
/// Identifiers are restricted to `[A-Za-z0-9_-]` so they can be embedded in
/// storage keys without escaping and can never contain a path separator.
///
/// # Examples
/// ```
/// use notegen::domain::UserId;
///
/// let id = UserId::new("108234567890").expect("valid id");
/// assert_eq!(id.as_ref(), "108234567890");
/// assert!(UserId::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.len() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        if !id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(UserValidationError::InvalidIdCharacters);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorisation role carried in the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Display attributes copied from the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Stored user record.
///
/// `credits` is the remaining balance; it only changes through ledger
/// transactions and never drops below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub credits: u32,
    pub profile: UserProfile,
}

impl User {
    pub fn has_credits(&self) -> bool {
        self.credits > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("108234567890")]
    #[case("clx0a1b2c3")]
    #[case("user_1-a")]
    fn accepts_provider_identifiers(#[case] raw: &str) {
        let id = UserId::new(raw).expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("a/b", UserValidationError::InvalidIdCharacters)]
    #[case(" 123", UserValidationError::InvalidIdCharacters)]
    #[case("../x", UserValidationError::InvalidIdCharacters)]
    fn rejects_malformed_identifiers(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_identifiers() {
        let raw = "a".repeat(USER_ID_MAX + 1);
        assert_eq!(
            UserId::new(raw),
            Err(UserValidationError::IdTooLong { max: USER_ID_MAX })
        );
    }

    #[rstest]
    fn user_id_deserialisation_validates() {
        assert!(serde_json::from_str::<UserId>("\"ok-1\"").is_ok());
        assert!(serde_json::from_str::<UserId>("\"no/slash\"").is_err());
    }

    #[rstest]
    #[case(Role::User, "USER")]
    #[case(Role::Admin, "ADMIN")]
    fn role_round_trips_through_strings(#[case] role: Role, #[case] raw: &str) {
        assert_eq!(role.as_str(), raw);
        assert_eq!(raw.parse::<Role>(), Ok(role));
        assert_eq!(
            serde_json::to_string(&role).expect("serialise role"),
            format!("\"{raw}\"")
        );
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        assert!(matches!(
            "ROOT".parse::<Role>(),
            Err(UserValidationError::UnknownRole(_))
        ));
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    fn has_credits_reflects_balance(#[case] credits: u32, #[case] expected: bool) {
        let user = User {
            id: UserId::new("u1").expect("id"),
            role: Role::User,
            credits,
            profile: UserProfile::default(),
        };
        assert_eq!(user.has_credits(), expected);
    }
}
