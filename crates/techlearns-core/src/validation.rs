//! Login and signup form validation.
//!
//! Runs before any request is built; a form that fails here never reaches
//! the network.

use std::fmt;

use serde::Serialize;

use crate::session::UserType;

/// Minimum signup password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field left blank.
    Required(&'static str),
    /// Email is not of the form `local@domain.tld`.
    InvalidEmail,
    /// Password shorter than [`MIN_PASSWORD_LEN`].
    PasswordTooShort { min: usize },
    /// Password and confirmation differ.
    PasswordMismatch,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{field} is required"),
            Self::InvalidEmail => f.write_str("Please enter a valid email address"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordMismatch => f.write_str("Passwords do not match"),
        }
    }
}

/// Every problem found in one form submission, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn finish(errors: Vec<ValidationError>) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Syntactic email check: one `@`, non-empty local part, a dotted domain
/// with non-empty labels, and no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Login form. Serializes to the login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub user_type: UserType,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(ValidationError::Required("Email"));
        } else if !is_valid_email(self.email.trim()) {
            errors.push(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            errors.push(ValidationError::Required("Password"));
        }
        finish(errors)
    }
}

/// Signup form. Serializes to the register request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip)]
    pub user_type: UserType,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::Required("Name"));
        }
        if self.email.trim().is_empty() {
            errors.push(ValidationError::Required("Email"));
        } else if !is_valid_email(self.email.trim()) {
            errors.push(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.password != self.confirm_password {
            errors.push(ValidationError::PasswordMismatch);
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            phone: None,
            user_type: UserType::User,
        }
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a@b..com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_login_rejects_invalid_email() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "secret".into(),
            user_type: UserType::User,
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::InvalidEmail]);
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "a@b.co".into(),
            password: String::new(),
            user_type: UserType::Mentor,
        };
        assert!(form.validate().unwrap_err().contains(&ValidationError::Required("Password")));
    }

    #[test]
    fn test_signup_password_mismatch() {
        let err = signup("abc", "abcd").validate().unwrap_err();
        assert!(err.contains(&ValidationError::PasswordMismatch));
        assert!(err.to_string().contains("Passwords do not match"));
    }

    #[test]
    fn test_signup_valid() {
        assert!(signup("secret1", "secret1").validate().is_ok());
    }

    #[test]
    fn test_signup_body_omits_confirmation() {
        let json = serde_json::to_value(signup("secret1", "secret1")).unwrap();
        assert!(json.get("confirmPassword").is_none());
        assert!(json.get("userType").is_none());
        assert_eq!(json["name"], "Ravi");
    }
}
