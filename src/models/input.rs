use std::str::FromStr;

use heck::ToLowerCamelCase;
use serde_json::{Map, Value};
use validator::{ValidationErrors, ValidationErrorsKind};

use super::field_error;

/// Reads request fields out of a JSON object one at a time.
///
/// A field of the wrong type is recorded as a validation error and read as
/// absent, so a single bad value never hides the problems with the rest of
/// the body. Absent and `null` fields read as `None`; whether they are
/// required is left to the request's own `#[validate(required)]` rules.
pub struct JsonFields<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> JsonFields<'a> {
    pub fn new(body: &'a Value) -> Self {
        let mut errors = ValidationErrors::new();
        let object = body.as_object();
        if object.is_none() {
            errors.add("body", field_error("type", "Request body must be a JSON object"));
        }
        Self { object, errors }
    }

    /// `field` is the Rust field name; the JSON key is its camelCase form.
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.object?
            .get(&field.to_lower_camel_case())
            .filter(|value| !value.is_null())
    }

    pub fn text(&mut self, field: &'static str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors.add(field, field_error("type", "Must be text"));
                None
            }
        }
    }

    pub fn integer(&mut self, field: &'static str) -> Option<i64> {
        let value = self.get(field)?;
        if value.as_i64().is_none() {
            self.errors.add(field, field_error("type", "Must be a whole number"));
        }
        value.as_i64()
    }

    /// Text that must name one of `T`'s variants.
    pub fn choice<T: FromStr>(&mut self, field: &'static str, message: &'static str) -> Option<T> {
        let raw = self.text(field)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.add(field, field_error("choice", message));
                None
            }
        }
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// Adds the field errors of `rules` to `errors`, skipping fields that
/// already failed to read.
pub fn absorb(errors: &mut ValidationErrors, rules: Result<(), ValidationErrors>) {
    let Err(rules) = rules else { return };
    for (field, kind) in rules.into_errors() {
        if errors.errors().contains_key(field) {
            continue;
        }
        if let ValidationErrorsKind::Field(list) = kind {
            for error in list {
                errors.add(field, error);
            }
        }
    }
}
