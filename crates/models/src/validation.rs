//! Field rules shared by request validation (`validator` custom functions)
//! and entity-level checks.
use std::borrow::Cow;

use validator::ValidationError;

pub const ISBN_LEN: usize = 13;

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// ISBN-13 as stored: exactly 13 ASCII digits, no hyphens.
pub fn isbn13(value: &str) -> Result<(), ValidationError> {
    if value.len() == ISBN_LEN && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("isbn13");
        err.message = Some(Cow::Borrowed("ISBN must be exactly 13 digits"));
        Err(err)
    }
}

/// `first_name` -> `firstName`, matching the JSON field names clients send.
pub fn json_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
