//! Record-to-payload dispatch and the validation gate in front of it.
//!
//! [`format`] turns any record into the string actually embedded in a
//! QR code. [`validate`] is the authoritative check run before a record
//! is rendered or persisted; it is stricter than per-field form
//! validation and reports structured, user-correctable reasons.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

use crate::models::Record;
use crate::{mecard, vcard};

/// A field-scoped reason a record cannot be encoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("URL must not be empty")]
    EmptyUrl,
    #[error("'{0}' is not a valid absolute URL")]
    InvalidUrl(String),
    #[error("text must not be empty")]
    EmptyText,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("phone number must not be empty")]
    EmptyPhone,
    #[error("latitude {0} is not a number or outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} is not a number or outside [-180, 180]")]
    InvalidLongitude(f64),
    #[error("first and last name are required")]
    MissingName,
    #[error("MeCard name must not be empty")]
    MissingMeCardName,
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Matches the `\S+@\S+.\S+` shape: no whitespace, one `@` with a
/// non-empty local part, and a dot-separated domain.
fn looks_like_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Produce the payload string for a record.
///
/// Total over the record enum: the match is exhaustive, so the
/// unsupported-type case cannot arise.
pub fn format(record: &Record) -> String {
    match record {
        Record::Url { url } => url.clone(),
        Record::Text { text } => text.clone(),
        Record::Email {
            email,
            subject,
            body,
        } => {
            let mut query: Vec<String> = Vec::new();
            if let Some(subject) = subject {
                query.push(format!("subject={}", encode_component(subject)));
            }
            if let Some(body) = body {
                query.push(format!("body={}", encode_component(body)));
            }
            if query.is_empty() {
                format!("mailto:{email}")
            } else {
                format!("mailto:{email}?{}", query.join("&"))
            }
        }
        Record::Phone { phone } => format!("tel:{phone}"),
        Record::Sms { phone, message } => match message {
            Some(message) => format!("sms:{phone}?body={}", encode_component(message)),
            None => format!("sms:{phone}"),
        },
        Record::Location {
            latitude,
            longitude,
            ..
        } => format!("geo:{latitude},{longitude}"),
        Record::VCard(card) => vcard::encode(card),
        Record::MeCard(card) => mecard::encode(card),
    }
}

/// Validate a record before payload generation.
pub fn validate(record: &Record) -> Result<(), ValidationError> {
    match record {
        Record::Url { url } => {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyUrl);
            }
            Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl(trimmed.to_string()))?;
            Ok(())
        }
        Record::Text { text } => {
            if text.trim().is_empty() {
                Err(ValidationError::EmptyText)
            } else {
                Ok(())
            }
        }
        Record::Email { email, .. } => {
            if looks_like_email(email.trim()) {
                Ok(())
            } else {
                Err(ValidationError::InvalidEmail(email.clone()))
            }
        }
        Record::Phone { phone } | Record::Sms { phone, .. } => {
            if phone.trim().is_empty() {
                Err(ValidationError::EmptyPhone)
            } else {
                Ok(())
            }
        }
        Record::Location {
            latitude,
            longitude,
            ..
        } => {
            if latitude.is_nan() || !(-90.0..=90.0).contains(latitude) {
                return Err(ValidationError::InvalidLatitude(*latitude));
            }
            if longitude.is_nan() || !(-180.0..=180.0).contains(longitude) {
                return Err(ValidationError::InvalidLongitude(*longitude));
            }
            Ok(())
        }
        Record::VCard(card) => {
            if card.first_name.trim().is_empty() || card.last_name.trim().is_empty() {
                Err(ValidationError::MissingName)
            } else {
                Ok(())
            }
        }
        Record::MeCard(card) => {
            if card.name.trim().is_empty() {
                Err(ValidationError::MissingMeCardName)
            } else {
                Ok(())
            }
        }
    }
}
