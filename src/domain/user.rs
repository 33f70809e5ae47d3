// Locally stored user record and form validation
use super::error::ValidationError;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 6;

/// The single persisted credential record. Plain text; not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }

    pub fn into_user(self) -> StoredUser {
        StoredUser {
            email: self.email,
            password: self.password,
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }

    pub fn matches(&self, user: &StoredUser) -> bool {
        user.email == self.email && user.password == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, password: &str) -> SignUpForm {
        SignUpForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_sign_up_validation() {
        assert_eq!(form("", "a@x.com", "123456").validate(), Err(ValidationError::MissingFields));
        assert_eq!(
            form("A", "a@x.com", "12345").validate().unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );
        assert!(form("A", "a@x.com", "123456").validate().is_ok());
    }

    #[test]
    fn test_sign_in_matches_exactly() {
        let user = form("A", "a@x.com", "123456").into_user();
        let sign_in = |email: &str, password: &str| SignInForm {
            email: email.to_string(),
            password: password.to_string(),
        };

        assert!(sign_in("a@x.com", "123456").matches(&user));
        assert!(!sign_in("A@x.com", "123456").matches(&user));
        assert!(!sign_in("a@x.com", "1234567").matches(&user));
        assert_eq!(sign_in("", "x").validate(), Err(ValidationError::MissingFields));
    }
}
