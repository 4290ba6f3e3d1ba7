//! Field checks shared by the JSON API and the admin forms.

use crate::web::error::FieldErrors;

pub const MIN_PASSWORD_LENGTH: usize = 5;
pub const MAX_FIELD_LENGTH: usize = 255;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

/// Records an error on `email` unless it looks like `local@domain.tld`.
pub fn validate_email(errors: &mut FieldErrors, field: &str, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.add(field, BLANK);
        return;
    }
    if email.chars().count() > MAX_FIELD_LENGTH {
        errors.add(field, too_long());
        return;
    }
    if !is_well_formed_email(email) {
        errors.add(field, "Enter a valid email address.");
    }
}

/// Surrounding whitespace does not count towards the length.
pub fn validate_password(errors: &mut FieldErrors, field: &str, password: &str) {
    let password = password.trim();
    if password.is_empty() {
        errors.add(field, BLANK);
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("Ensure this field has at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }
}

/// Names may be empty; only the length is bounded.
pub fn validate_name(errors: &mut FieldErrors, field: &str, name: &str) {
    if name.chars().count() > MAX_FIELD_LENGTH {
        errors.add(field, too_long());
    }
}

/// Like [`validate_name`] but blank values are rejected too.
pub fn validate_required_text(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, BLANK);
    } else {
        validate_name(errors, field, value);
    }
}

fn too_long() -> String {
    format!("Ensure this field has no more than {MAX_FIELD_LENGTH} characters.")
}

fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains('@') || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.is_empty() || domain.chars().any(char::is_whitespace) {
        return false;
    }
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
