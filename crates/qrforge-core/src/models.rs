//! Shared data types for the application.

use serde::{Deserialize, Serialize};

/// A structured record describing what a QR code should encode.
///
/// Exactly one variant is populated; optional fields are absent rather
/// than present-but-empty (producers trim before constructing a record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Url {
        url: String,
    },
    Text {
        text: String,
    },
    Email {
        email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Phone {
        phone: String,
    },
    Sms {
        phone: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Location {
        latitude: f64,
        longitude: f64,
        /// Informational only; never encoded into the payload.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
    #[serde(rename = "vcard")]
    VCard(VCardData),
    #[serde(rename = "mecard")]
    MeCard(MeCardData),
}

impl Record {
    /// The discriminant of this record, used for history filtering,
    /// duplicate detection and auto-save slots.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Url { .. } => RecordKind::Url,
            Record::Text { .. } => RecordKind::Text,
            Record::Email { .. } => RecordKind::Email,
            Record::Phone { .. } => RecordKind::Phone,
            Record::Sms { .. } => RecordKind::Sms,
            Record::Location { .. } => RecordKind::Location,
            Record::VCard(_) => RecordKind::VCard,
            Record::MeCard(_) => RecordKind::MeCard,
        }
    }
}

/// Record discriminant as a standalone value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Url,
    Text,
    Email,
    Phone,
    Sms,
    Location,
    #[serde(rename = "vcard")]
    VCard,
    #[serde(rename = "mecard")]
    MeCard,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordKind::Url => "url",
            RecordKind::Text => "text",
            RecordKind::Email => "email",
            RecordKind::Phone => "phone",
            RecordKind::Sms => "sms",
            RecordKind::Location => "location",
            RecordKind::VCard => "vcard",
            RecordKind::MeCard => "mecard",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(RecordKind::Url),
            "text" => Ok(RecordKind::Text),
            "email" => Ok(RecordKind::Email),
            "phone" => Ok(RecordKind::Phone),
            "sms" => Ok(RecordKind::Sms),
            "location" => Ok(RecordKind::Location),
            "vcard" => Ok(RecordKind::VCard),
            "mecard" => Ok(RecordKind::MeCard),
            _ => Err(format!("unknown record kind: {s}")),
        }
    }
}

/// Tag on a vCard phone entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneLabel {
    Mobile,
    Home,
    Work,
    Fax,
    Other,
}

/// Tag on a vCard email entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailLabel {
    Personal,
    Work,
    Other,
}

/// Tag on a vCard address entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressLabel {
    Home,
    Work,
    Postal,
    Other,
}

/// A labelled phone number on a vCard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VCardPhone {
    pub label: PhoneLabel,
    pub value: String,
}

/// A labelled email address on a vCard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VCardEmail {
    pub label: EmailLabel,
    pub value: String,
}

/// A labelled postal address on a vCard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VCardAddress {
    pub label: AddressLabel,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal: String,
    #[serde(default)]
    pub country: String,
}

impl Default for AddressLabel {
    fn default() -> Self {
        AddressLabel::Home
    }
}

/// Social media URLs attached to a vCard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// Personal website, emitted as a plain URL line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.linkedin.is_none()
            && self.twitter.is_none()
            && self.facebook.is_none()
            && self.instagram.is_none()
            && self.website.is_none()
    }
}

/// Contact fields for a vCard 3.0 record.
///
/// `first_name` and `last_name` are required non-empty; everything else
/// is optional. List entries with empty values are filtered out at
/// encoding time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VCardData {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// ISO date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Embedded image as a data URL or bare base64 payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<VCardPhone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<VCardEmail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Work website, emitted as `URL;TYPE=WORK`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<VCardAddress>,
    #[serde(default, skip_serializing_if = "SocialLinks::is_empty")]
    pub social: SocialLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Contact fields for a MeCard record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeCardData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Gradient shape for the code foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

/// Optional foreground gradient settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientConfig {
    pub enabled: bool,
    pub secondary: String,
    pub kind: GradientKind,
    /// Rotation in degrees, only meaningful for linear gradients.
    #[serde(default)]
    pub rotation: f64,
}

/// Optional background image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundImage {
    pub image: String,
    pub opacity: f64,
}

/// Optional centre logo settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoConfig {
    pub image: String,
    pub stroke_width: f64,
    pub stroke_color: String,
}

/// Visual styling for a rendered code. Pure configuration, no lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorConfig {
    pub foreground: String,
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent_background: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<BackgroundImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoConfig>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            transparent_background: None,
            gradient: None,
            background_image: None,
            logo: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_tagged_json() {
        let record = Record::Email {
            email: "a@b.com".to_string(),
            subject: Some("Hi".to_string()),
            body: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"email\""));
        assert!(!json.contains("body"));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn kind_matches_serde_tag() {
        let record = Record::VCard(VCardData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        });
        assert_eq!(record.kind(), RecordKind::VCard);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "vcard");
        assert_eq!(record.kind().to_string(), "vcard");
    }

    #[test]
    fn kind_parses_from_str() {
        assert_eq!("MeCard".parse::<RecordKind>().unwrap(), RecordKind::MeCard);
        assert!("qr".parse::<RecordKind>().is_err());
    }
}
