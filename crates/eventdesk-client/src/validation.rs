//! Client-side form checks.
//!
//! Failures are reported per field and never leave the process: a form that
//! does not validate is not sent.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use crate::auth::Profile;
use crate::models::{CreateUserData, GuestPayload, UpdateUserData, User};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static GUEST_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{7,10}$").expect("valid phone regex"));

pub const MIN_PASSWORD_LEN: usize = 8;

/// Field name to message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. A later error for the same field replaces the
    /// earlier one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Required, well-formed email.
pub fn validate_email(email: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        Some("Email is required")
    } else if !is_valid_email(email.trim()) {
        Some("Invalid email format")
    } else {
        None
    }
}

/// At least eight characters with a lowercase letter, an uppercase letter
/// and a digit.
pub fn validate_new_password(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 8 characters");
    }
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Some("Password must contain an uppercase letter, a lowercase letter and a number");
    }
    None
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Option<&'static str> {
    (password != confirmation).then_some("Passwords do not match")
}

/// Guest phone numbers are 7 to 10 digits without the area code.
pub fn validate_guest_phone(phone: &str) -> Option<&'static str> {
    (!GUEST_PHONE_RE.is_match(phone)).then_some("Phone must be 7-10 digits without state code")
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Login form: both fields required.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(message) = validate_email(&self.email) {
            errors.add("email", message);
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result()
    }
}

/// Password recovery form.
#[derive(Debug, Clone, Default)]
pub struct RecoverPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl RecoverPasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(message) = validate_new_password(&self.password) {
            errors.add("password", message);
        }
        if let Some(message) = validate_password_confirmation(&self.password, &self.confirm_password) {
            errors.add("confirmPassword", message);
        }
        errors.into_result()
    }
}

/// What an entity dialog is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
    View,
}

/// User dialog state.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub mode: FormMode,
    /// Set in edit mode.
    pub id: Option<i64>,
    pub email: String,
    pub name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub state_code: String,
    pub phone: String,
    pub profile: Option<Profile>,
    pub new_password: String,
    pub confirm_password: String,
}

impl UserForm {
    /// Edit-mode form prefilled from an existing user.
    pub fn edit(user: &User) -> Self {
        Self {
            mode: FormMode::Edit,
            id: Some(user.id),
            email: user.email.clone(),
            name: user.person.name.clone(),
            paternal_surname: user.person.paternal_surname.clone(),
            maternal_surname: user.person.maternal_surname.clone(),
            state_code: user.person.state_code.clone(),
            phone: user.person.phone.clone(),
            profile: Some(user.profile),
            new_password: String::new(),
            confirm_password: String::new(),
        }
    }

    fn changes_password(&self) -> bool {
        self.mode == FormMode::Create
            || !self.new_password.is_empty()
            || !self.confirm_password.is_empty()
    }

    /// Check the form. `existing` is used to reject an email already taken
    /// by another user.
    pub fn validate(&self, existing: &[User]) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.mode == FormMode::View {
            errors.add("form", "Form is read-only");
            return Err(errors);
        }
        if self.mode == FormMode::Edit && self.id.is_none() {
            errors.add("id", "User id is required when editing");
        }

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if self.paternal_surname.trim().is_empty() {
            errors.add("paternalSurname", "Paternal surname is required");
        }
        if self.profile.is_none() {
            errors.add("profile", "Profile is required");
        }
        if self.state_code.trim().is_empty() {
            errors.add("stateCode", "State code is required");
        }
        if let Some(message) = validate_email(&self.email) {
            errors.add("email", message);
        } else {
            let email = self.email.trim();
            let duplicate = existing.iter().any(|user| {
                user.email.eq_ignore_ascii_case(email)
                    && (self.mode == FormMode::Create || Some(user.id) != self.id)
            });
            if duplicate {
                errors.add("email", "Email is already in use");
            }
        }
        if !self.phone.trim().is_empty() && !is_digits(self.phone.trim()) {
            errors.add("phone", "Phone must contain digits only");
        }

        if self.changes_password() {
            if self.new_password.chars().count() < MIN_PASSWORD_LEN {
                errors.add("newPassword", "Password must be at least 8 characters");
            }
            if let Some(message) =
                validate_password_confirmation(&self.new_password, &self.confirm_password)
            {
                errors.add("confirmPassword", message);
            }
        }

        errors.into_result()
    }

    pub fn to_create_data(&self) -> CreateUserData {
        CreateUserData {
            email: self.email.trim().to_string(),
            password: self.new_password.clone(),
            name: self.name.trim().to_string(),
            paternal_surname: self.paternal_surname.trim().to_string(),
            maternal_surname: self.maternal_surname.trim().to_string(),
            state_code: self.state_code.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    pub fn to_update_data(&self) -> UpdateUserData {
        UpdateUserData {
            id: self.id.unwrap_or_default(),
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            paternal_surname: self.paternal_surname.trim().to_string(),
            maternal_surname: self.maternal_surname.trim().to_string(),
            state_code: self.state_code.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: (!self.new_password.is_empty()).then(|| self.new_password.clone()),
        }
    }
}

/// Guest dialog state is the payload itself.
pub type GuestForm = GuestPayload;

impl GuestForm {
    /// Name, paternal surname and phone are required.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if self.paternal_surname.trim().is_empty() {
            errors.add("paternalSurname", "Paternal surname is required");
        }
        if self.phone_number.trim().is_empty() {
            errors.add("phoneNumber", "Phone is required");
        } else if let Some(message) = validate_guest_phone(self.phone_number.trim()) {
            errors.add("phoneNumber", message);
        }
        errors.into_result()
    }
}
