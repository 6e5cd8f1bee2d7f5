//! Client-side form validation.
//!
//! Mirrors the checks the web forms ran before submitting, so obviously
//! bad input is rejected without a round trip.

use validator::Validate;

use crate::error::CoreError;
use crate::models::auth::{LoginRequest, SignupRequest};
use crate::models::user::UserUpdate;

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Return every rule `password` breaks. Empty means the password is acceptable.
pub fn password_problems(password: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        problems.push(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Password must contain at least one number".to_string());
    }

    problems
}

pub fn validate_login(form: &LoginRequest) -> Result<(), CoreError> {
    form.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

pub fn validate_signup(form: &SignupRequest) -> Result<(), CoreError> {
    let mut problems: Vec<String> = match form.validate() {
        Ok(()) => Vec::new(),
        Err(e) => vec![e.to_string()],
    };
    problems.extend(password_problems(&form.password));

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(problems.join("; ")))
    }
}

pub fn validate_profile_update(update: &UserUpdate) -> Result<(), CoreError> {
    if update.is_empty() {
        return Err(CoreError::Validation("Nothing to update".to_string()));
    }
    update
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            name: "Amira Haddad".into(),
            email: "amira@example.com".into(),
            password: "Str0ngPass".into(),
            location: "ontario".into(),
            job_preference: "Nurse".into(),
            origin_country: Some("Lebanon".into()),
        }
    }

    #[test]
    fn strong_password_has_no_problems() {
        assert!(password_problems("Str0ngPass").is_empty());
    }

    #[test]
    fn weak_password_lists_each_rule() {
        let problems = password_problems("abc");
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("8 characters")));
        assert!(problems.iter().any(|p| p.contains("uppercase")));
        assert!(problems.iter().any(|p| p.contains("number")));
    }

    #[test]
    fn valid_signup_passes() {
        assert!(validate_signup(&signup()).is_ok());
    }

    #[test]
    fn signup_with_bad_email_and_password_fails() {
        let form = SignupRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            ..signup()
        };
        let err = validate_signup(&form).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("uppercase"));
    }

    #[test]
    fn login_requires_email_shape() {
        let form = LoginRequest {
            email: "nobody".into(),
            password: "x".into(),
        };
        assert_matches!(validate_login(&form), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_profile_update_is_rejected() {
        assert_matches!(
            validate_profile_update(&UserUpdate::default()),
            Err(CoreError::Validation(_))
        );
    }
}
