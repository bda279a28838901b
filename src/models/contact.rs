use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::input::{absorb, JsonFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    General,
    Booking,
    Workshop,
    Partnership,
    Press,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Booking => "booking",
            InquiryType::Workshop => "workshop",
            InquiryType::Partnership => "partnership",
            InquiryType::Press => "press",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown inquiry type `{0}`")]
pub struct UnknownInquiryType(pub String);

impl FromStr for InquiryType {
    type Err = UnknownInquiryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(InquiryType::General),
            "booking" => Ok(InquiryType::Booking),
            "workshop" => Ok(InquiryType::Workshop),
            "partnership" => Ok(InquiryType::Partnership),
            "press" => Ok(InquiryType::Press),
            _ => Err(UnknownInquiryType(s.to_string())),
        }
    }
}

#[derive(Debug, Validate)]
pub struct ContactRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: Option<String>,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "Subject must be 200 characters or fewer"))]
    pub subject: Option<String>,
    pub inquiry_type: Option<InquiryType>,
    #[validate(
        required(message = "Message is required"),
        length(min = 10, max = 2000, message = "Message must be between 10 and 2000 characters")
    )]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub inquiry_type: InquiryType,
    pub message: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ContactRequest {
    pub fn from_json(body: &Value) -> Result<NewContactMessage, ValidationErrors> {
        let mut fields = JsonFields::new(body);
        let request = Self {
            name: fields.text("name"),
            email: fields.text("email"),
            phone: fields.text("phone"),
            subject: fields.text("subject"),
            inquiry_type: fields.choice(
                "inquiry_type",
                "Inquiry type must be one of general, booking, workshop, partnership or press",
            ),
            message: fields.text("message"),
        };
        request.into_message(fields.into_errors())
    }

    pub fn into_message(self, mut errors: ValidationErrors) -> Result<NewContactMessage, ValidationErrors> {
        let request = ContactRequest {
            name: self.name.map(|n| n.trim().to_string()),
            email: self.email.map(|e| e.trim().to_ascii_lowercase()),
            phone: non_blank(self.phone),
            subject: non_blank(self.subject),
            inquiry_type: self.inquiry_type,
            message: self.message.map(|m| m.trim().to_string()),
        };
        absorb(&mut errors, request.validate());

        match (request.name, request.email, request.message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(NewContactMessage {
                name,
                email,
                phone: request.phone,
                subject: request.subject,
                inquiry_type: request.inquiry_type.unwrap_or(InquiryType::General),
                message,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactReceived {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "name": "Meera",
            "email": "meera@example.org",
            "phone": "  ",
            "message": "Do you run pottery workshops in March?",
        })
    }

    fn fields(errors: &ValidationErrors) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = errors.field_errors().keys().copied().collect();
        fields.sort();
        fields
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        let message = ContactRequest::from_json(&body()).unwrap();
        assert_eq!(message.phone, None);
        assert_eq!(message.inquiry_type, InquiryType::General);
    }

    #[test]
    fn short_phone_and_message_are_rejected() {
        let mut body = body();
        body["phone"] = json!("12345");
        body["message"] = json!("Hi");
        let errors = ContactRequest::from_json(&body).unwrap_err();
        assert_eq!(fields(&errors), vec!["message", "phone"]);
    }

    #[test]
    fn unknown_inquiry_type_is_reported_with_other_fields() {
        let body = json!({
            "email": "meera@example.org",
            "inquiryType": "complaint",
            "message": "Hi",
        });
        let errors = ContactRequest::from_json(&body).unwrap_err();
        assert_eq!(fields(&errors), vec!["inquiry_type", "message", "name"]);
    }

    #[test]
    fn inquiry_type_ignores_case() {
        assert_eq!("Workshop".parse::<InquiryType>(), Ok(InquiryType::Workshop));
        assert!("complaint".parse::<InquiryType>().is_err());
    }
}
