//! User accounts and credential verification.
//!
//! The directory is seeded at startup and read-only afterwards; the content
//! core consumes it only to check role membership and to mint token claims.
//! Passwords are hashed with Argon2id at seed time and verified on login —
//! plaintext never outlives startup.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use ulid::Ulid;

use quizbank_core::{Error, Result};

/// The role required to invoke admin write operations.
pub const ADMIN_ROLE: &str = "admin";

/// A user account.
#[derive(Clone)]
pub struct UserAccount {
    /// Stable account identifier (ULID string).
    pub id: String,
    /// Login email, unique within the directory.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional surname.
    pub surname: Option<String>,
    /// Accumulated quiz score.
    pub score: i32,
    /// Role memberships.
    pub roles: Vec<String>,
    /// Argon2id password hash (PHC string).
    password_hash: String,
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("score", &self.score)
            .field("roles", &self.roles)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl UserAccount {
    /// Returns true when the account holds the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// In-memory account directory.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<UserAccount>,
}

impl UserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory seeded with one administrator account.
    ///
    /// # Errors
    ///
    /// Returns an error when the password cannot be hashed.
    pub fn with_seeded_admin(email: &str, password: &str) -> Result<Self> {
        let mut directory = Self::new();
        directory.seed_account(email, password, vec![ADMIN_ROLE.to_string()])?;
        Ok(directory)
    }

    /// Adds an account with the given roles.
    ///
    /// # Errors
    ///
    /// Returns an error when the password cannot be hashed.
    pub fn seed_account(&mut self, email: &str, password: &str, roles: Vec<String>) -> Result<()> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::internal(format!("password hashing failed: {e}")))?
            .to_string();

        self.users.push(UserAccount {
            id: Ulid::new().to_string(),
            email: email.to_string(),
            name: None,
            surname: None,
            score: 0,
            roles,
            password_hash,
        });
        Ok(())
    }

    /// Verifies credentials and returns the matching account.
    ///
    /// Email matching is case-insensitive. Returns `None` for an unknown
    /// email or a wrong password — callers cannot distinguish the two.
    #[must_use]
    pub fn verify_credentials(&self, email: &str, password: &str) -> Option<&UserAccount> {
        let account = self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))?;

        let parsed = PasswordHash::new(&account.password_hash).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()?;

        Some(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_seeded_credentials() {
        let directory =
            UserDirectory::with_seeded_admin("admin@example.com", "hunter2").expect("seed");

        let account = directory
            .verify_credentials("admin@example.com", "hunter2")
            .expect("verify");
        assert!(account.has_role(ADMIN_ROLE));
        assert_eq!(account.score, 0);
    }

    #[test]
    fn test_email_matching_is_case_insensitive() {
        let directory =
            UserDirectory::with_seeded_admin("Admin@Example.com", "hunter2").expect("seed");
        assert!(directory
            .verify_credentials("admin@example.com", "hunter2")
            .is_some());
    }

    #[test]
    fn test_verify_rejects_wrong_password_and_unknown_email() {
        let directory =
            UserDirectory::with_seeded_admin("admin@example.com", "hunter2").expect("seed");
        assert!(directory
            .verify_credentials("admin@example.com", "wrong")
            .is_none());
        assert!(directory
            .verify_credentials("nobody@example.com", "hunter2")
            .is_none());
    }

    #[test]
    fn test_non_admin_account_lacks_role() {
        let mut directory = UserDirectory::new();
        directory
            .seed_account("reader@example.com", "hunter2", Vec::new())
            .expect("seed");
        let account = directory
            .verify_credentials("reader@example.com", "hunter2")
            .expect("verify");
        assert!(!account.has_role(ADMIN_ROLE));
    }
}
