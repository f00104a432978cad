//! Form validation rules and the field-scoped error map.

use super::models::{ApplicantRecord, FieldValue};
use super::schema::{
    FieldId, Requirement, TextFormat, INVALID_EMAIL_MESSAGE, REQUIRED_MESSAGE, SCHEMA,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Field-scoped complaints awaiting correction, ordered by schema position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<FieldId, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn insert(&mut self, field: FieldId, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Removes the entry for `field`, returning whether one existed.
    pub fn remove(&mut self, field: FieldId) -> bool {
        self.entries.remove(&field).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.entries.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Marks every listed field as required, keeping unrelated entries.
    pub fn merge_missing<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = FieldId>,
    {
        for field in fields {
            self.insert(field, REQUIRED_MESSAGE);
        }
    }
}

/// Returns true if `email` has the `local@domain.tld` shape.
///
/// # Examples
///
/// ```
/// use intake::domain::is_valid_email;
///
/// assert!(is_valid_email("a@b.com"));
/// assert!(!is_valid_email("abc"));
/// assert!(!is_valid_email("a b@c.d"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks a record against every rule in the schema.
///
/// Rules are independent: requirement rules report empty required fields
/// and unchecked declarations, and the email rule only looks at non-empty
/// values, so an empty email is reported once, as required.
pub fn validate_record(record: &ApplicantRecord) -> ErrorMap {
    let mut errors = ErrorMap::new();

    for spec in SCHEMA.iter() {
        let value = record.get(spec.id);

        match spec.requirement {
            Requirement::Optional => {}
            Requirement::NonEmpty(message) | Requirement::MustBeTrue(message) => {
                if value.is_empty() {
                    errors.insert(spec.id, message);
                }
            }
        }

        if let (Some(TextFormat::Email), FieldValue::Text(text)) = (spec.format, value) {
            if !text.is_empty() && !is_valid_email(text) {
                errors.insert(spec.id, INVALID_EMAIL_MESSAGE);
            }
        }
    }

    errors
}
