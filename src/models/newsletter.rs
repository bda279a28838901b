use serde_json::Value;
use validator::{Validate, ValidationErrors};

use super::input::{absorb, JsonFields};

const DEFAULT_SOURCE: &str = "website";

#[derive(Debug, Validate)]
pub struct SubscribeRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: Option<String>,
    #[validate(length(max = 100, message = "Name must be 100 characters or fewer"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Source must be between 1 and 50 characters"))]
    pub source: Option<String>,
}

/// A subscribe request after normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub email: String,
    pub name: Option<String>,
    pub source: String,
}

impl SubscribeRequest {
    pub fn from_json(body: &Value) -> Result<Subscriber, ValidationErrors> {
        let mut fields = JsonFields::new(body);
        let request = Self {
            email: fields.text("email"),
            name: fields.text("name"),
            source: fields.text("source"),
        };
        request.normalized(fields.into_errors())
    }

    pub fn normalized(self, mut errors: ValidationErrors) -> Result<Subscriber, ValidationErrors> {
        let request = Self {
            email: self.email.map(|e| e.trim().to_ascii_lowercase()),
            name: self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            source: Some(self.source.map_or_else(|| DEFAULT_SOURCE.to_string(), |s| s.trim().to_string())),
        };
        absorb(&mut errors, request.validate());

        match (request.email, request.source) {
            (Some(email), Some(source)) if errors.is_empty() => Ok(Subscriber {
                email,
                name: request.name,
                source,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Validate)]
pub struct UnsubscribeRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: Option<String>,
}

impl UnsubscribeRequest {
    /// Returns the normalized email to unsubscribe.
    pub fn from_json(body: &Value) -> Result<String, ValidationErrors> {
        let mut fields = JsonFields::new(body);
        let request = Self {
            email: fields.text("email").map(|e| e.trim().to_ascii_lowercase()),
        };
        let mut errors = fields.into_errors();
        absorb(&mut errors, request.validate());

        match request.email {
            Some(email) if errors.is_empty() => Ok(email),
            _ => Err(errors),
        }
    }
}

/// Outcome of a subscribe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Created,
    Reactivated,
    AlreadyActive,
}

impl Subscription {
    pub fn message(&self) -> &'static str {
        match self {
            Subscription::Created => "Thanks for subscribing to our newsletter",
            Subscription::Reactivated => "Welcome back! Your subscription has been renewed",
            Subscription::AlreadyActive => "This email is already subscribed",
        }
    }
}
