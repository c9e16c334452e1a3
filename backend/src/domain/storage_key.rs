//! Object storage keys scoped to a user's upload namespace.
//!
//! Keys follow `uploads/{userId}/{unixMillis}-{filename}`. Ownership is
//! decided structurally by prefix; no lookup is involved.

use std::fmt;

use super::UserId;

const UPLOADS_ROOT: &str = "uploads";

/// Maximum filename length in bytes.
pub const FILE_NAME_MAX_BYTES: usize = 255;

/// Reasons a client-supplied filename is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileNameError {
    #[error("filename must not be empty")]
    Empty,
    #[error("filename must not contain path separators")]
    PathSeparator,
    #[error("filename must not contain control characters")]
    ControlCharacter,
    #[error("filename must be at most {max} bytes")]
    TooLong { max: usize },
}

/// A filename that can be appended to a storage key without leaving the
/// owner's namespace.
///
/// # Examples
/// ```
/// use notegen::domain::UploadFileName;
///
/// let name = UploadFileName::new("  lecture 1.pdf ").expect("valid");
/// assert_eq!(name.as_ref(), "lecture 1.pdf");
/// assert!(UploadFileName::new("../secret.pdf").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFileName(String);

impl UploadFileName {
    pub fn new(raw: &str) -> Result<Self, FileNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FileNameError::Empty);
        }
        if trimmed.contains(['/', '\\']) {
            return Err(FileNameError::PathSeparator);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(FileNameError::ControlCharacter);
        }
        if trimmed.len() > FILE_NAME_MAX_BYTES {
            return Err(FileNameError::TooLong {
                max: FILE_NAME_MAX_BYTES,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UploadFileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reference to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Build the key for a fresh upload.
    ///
    /// # Examples
    /// ```
    /// use notegen::domain::{StorageKey, UploadFileName, UserId};
    ///
    /// let user = UserId::new("u1").expect("id");
    /// let file = UploadFileName::new("foo.pdf").expect("name");
    /// let key = StorageKey::for_upload(&user, 171, &file);
    /// assert_eq!(key.as_str(), "uploads/u1/171-foo.pdf");
    /// ```
    pub fn for_upload(owner: &UserId, issued_at_millis: i64, file_name: &UploadFileName) -> Self {
        Self(format!(
            "{}{issued_at_millis}-{}",
            Self::namespace_of(owner),
            file_name.as_ref()
        ))
    }

    /// Wrap a client-supplied key. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_owned()))
        }
    }

    /// Key prefix owned by `user`, including the trailing slash.
    pub fn namespace_of(user: &UserId) -> String {
        format!("{UPLOADS_ROOT}/{user}/")
    }

    /// True when the key lies inside `user`'s upload namespace.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.0.starts_with(&Self::namespace_of(user))
    }

    /// Final path segment, used as the display filename.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn u1() -> UserId {
        UserId::new("u1").expect("fixture id")
    }

    #[rstest]
    #[case("report.pdf", "report.pdf")]
    #[case("  spaced name.pdf\t", "spaced name.pdf")]
    #[case("ünïcode.pdf", "ünïcode.pdf")]
    fn file_names_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(UploadFileName::new(raw).expect("valid").as_ref(), expected);
    }

    #[rstest]
    #[case("", FileNameError::Empty)]
    #[case("   ", FileNameError::Empty)]
    #[case("a/b.pdf", FileNameError::PathSeparator)]
    #[case("..\\b.pdf", FileNameError::PathSeparator)]
    #[case("a\u{0}b.pdf", FileNameError::ControlCharacter)]
    fn invalid_file_names_are_rejected(#[case] raw: &str, #[case] expected: FileNameError) {
        assert_eq!(UploadFileName::new(raw), Err(expected));
    }

    #[rstest]
    fn overlong_file_names_are_rejected() {
        let raw = format!("{}.pdf", "a".repeat(FILE_NAME_MAX_BYTES));
        assert_eq!(
            UploadFileName::new(&raw),
            Err(FileNameError::TooLong {
                max: FILE_NAME_MAX_BYTES
            })
        );
    }

    #[rstest]
    fn upload_keys_follow_the_namespace_convention(u1: UserId) {
        let file = UploadFileName::new("foo.pdf").expect("name");
        let key = StorageKey::for_upload(&u1, 1_717_000_000_000, &file);

        assert_eq!(key.as_str(), "uploads/u1/1717000000000-foo.pdf");
        assert!(key.is_owned_by(&u1));
        assert_eq!(key.file_name(), "1717000000000-foo.pdf");
    }

    #[rstest]
    #[case("uploads/u1/171-foo.pdf", "u1", true)]
    #[case("uploads/u1/171-foo.pdf", "u2", false)]
    #[case("uploads/u10/171-foo.pdf", "u1", false)]
    #[case("uploads/u1", "u1", false)]
    #[case("other/u1/171-foo.pdf", "u1", false)]
    #[case("/uploads/u1/171-foo.pdf", "u1", false)]
    fn ownership_is_decided_by_prefix(
        #[case] raw: &str,
        #[case] user: &str,
        #[case] expected: bool,
    ) {
        let key = StorageKey::parse(raw).expect("non-blank key");
        let user = UserId::new(user).expect("id");
        assert_eq!(key.is_owned_by(&user), expected);
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn blank_keys_do_not_parse(#[case] raw: &str) {
        assert!(StorageKey::parse(raw).is_none());
    }

    #[rstest]
    #[case("uploads/u1/171-foo.pdf", "171-foo.pdf")]
    #[case("uploads/u1/", "")]
    #[case("plain", "plain")]
    fn file_name_is_the_last_segment(#[case] raw: &str, #[case] expected: &str) {
        let key = StorageKey::parse(raw).expect("non-blank key");
        assert_eq!(key.file_name(), expected);
    }
}
