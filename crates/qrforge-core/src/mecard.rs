//! MeCard wire-format encoding.
//!
//! Produces the `MECARD:...;;` string scanned by phone contact apps.
//! Fields are emitted in a fixed order and values pass through the
//! MeCard escaping grammar. The encoder itself is permissive; the
//! minimum-field rule lives in [`is_valid`] and is enforced by the
//! payload validator before anything is rendered or persisted.

use crate::escape::escape_mecard;
use crate::models::MeCardData;

/// Encode a MeCard record as its wire string.
///
/// Absent fields are skipped entirely; a record with no fields still
/// encodes to `MECARD:;;` (the trailing double semicolon is part of the
/// format and always present).
pub fn encode(card: &MeCardData) -> String {
    let mut fields: Vec<String> = Vec::new();

    let mut push = |key: &str, value: &str| {
        fields.push(format!("{key}:{}", escape_mecard(value)));
    };

    if !card.name.is_empty() {
        push("N", &card.name);
    }
    if let Some(phone) = &card.phone {
        push("TEL", phone);
    }
    if let Some(email) = &card.email {
        push("EMAIL", email);
    }
    if let Some(url) = &card.url {
        push("URL", url);
    }
    if let Some(address) = &card.address {
        push("ADR", address);
    }
    if let Some(note) = &card.note {
        push("NOTE", note);
    }

    format!("MECARD:{};;", fields.join(";"))
}

/// A MeCard is worth encoding when it has a name and at least one
/// contact field.
pub fn is_valid(card: &MeCardData) -> bool {
    if card.name.trim().is_empty() {
        return false;
    }
    card.phone.is_some()
        || card.email.is_some()
        || card.url.is_some()
        || card.address.is_some()
        || card.note.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> MeCardData {
        MeCardData {
            name: "Doe John".to_string(),
            phone: Some("+15551234".to_string()),
            email: Some("john@example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn encodes_fields_in_fixed_order() {
        let encoded = encode(&MeCardData {
            url: Some("https://example.com".to_string()),
            note: Some("note".to_string()),
            ..card()
        });
        assert_eq!(
            encoded,
            "MECARD:N:Doe John;TEL:+15551234;EMAIL:john@example.com;\
             URL:https\\://example.com;NOTE:note;;"
        );
    }

    #[test]
    fn always_terminates_with_double_semicolon() {
        assert!(encode(&card()).ends_with(";;"));
        assert_eq!(encode(&MeCardData::default()), "MECARD:;;");
    }

    #[test]
    fn escapes_reserved_characters_in_values() {
        let encoded = encode(&MeCardData {
            name: "Smith; Jane".to_string(),
            note: Some("a:b".to_string()),
            ..Default::default()
        });
        assert_eq!(encoded, "MECARD:N:Smith\\; Jane;NOTE:a\\:b;;");
    }

    #[test]
    fn validity_needs_name_and_one_contact_field() {
        assert!(is_valid(&card()));
        assert!(!is_valid(&MeCardData {
            name: "  ".to_string(),
            ..card()
        }));
        assert!(!is_valid(&MeCardData {
            name: "Solo".to_string(),
            ..Default::default()
        }));
    }
}
