//! Sign-up field validation.

use std::fmt;

use serde::Serialize;

use super::models::SignUpRequest;

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 30;
const PASSWORD_MIN_LEN: usize = 6;
const PHONE_MIN_LEN: usize = 3;
const PHONE_MAX_LEN: usize = 20;
const EMAIL_MAX_LEN: usize = 254;

/// A single violated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every field a sign-up candidate violated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Names of the violated fields, in check order
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

/// Sign-up candidate that passed validation, with email and phone normalized
#[derive(Debug, Clone)]
pub struct ValidSignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a sign-up candidate, collecting every violation
///
/// # Errors
///
/// Returns all violated fields if any constraint is unmet.
pub fn validate_sign_up(request: SignUpRequest) -> Result<ValidSignUp, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let first_name = check_name(&mut errors, "first_name", request.first_name);
    let last_name = check_name(&mut errors, "last_name", request.last_name);

    let email = match request.email.as_deref().map(normalize_email) {
        None => {
            errors.push("email", "is required");
            String::new()
        }
        Some(email) if email.is_empty() => {
            errors.push("email", "is required");
            email
        }
        Some(email) => {
            if !is_valid_email(&email) {
                errors.push("email", "is not a valid email address");
            }
            email
        }
    };

    let phone = match request.phone.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("phone", "is required");
            String::new()
        }
        Some(phone) => {
            if !is_valid_phone(phone) {
                errors.push(
                    "phone",
                    format!(
                        "must be {PHONE_MIN_LEN}-{PHONE_MAX_LEN} characters of digits, spaces or dashes with an optional leading +"
                    ),
                );
            }
            phone.to_string()
        }
    };

    let password = match request.password {
        None => {
            errors.push("password", "is required");
            String::new()
        }
        Some(password) => {
            if password.chars().count() < PASSWORD_MIN_LEN {
                errors.push(
                    "password",
                    format!("must be at least {PASSWORD_MIN_LEN} characters"),
                );
            }
            password
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidSignUp {
        first_name,
        last_name,
        email,
        phone,
        password,
    })
}

fn check_name(errors: &mut ValidationErrors, field: &'static str, value: Option<String>) -> String {
    let Some(value) = value.map(|v| v.trim().to_string()) else {
        errors.push(field, "is required");
        return String::new();
    };

    let len = value.chars().count();
    if len == 0 {
        errors.push(field, "is required");
    } else if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        errors.push(
            field,
            format!("must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters"),
        );
    }
    value
}

fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    !(domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) || domain.contains(".."))
}

fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    if !(PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&len) {
        return false;
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    digits.chars().any(|c| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}
