//! vCard 3.0 (RFC 2426) text encoding.
//!
//! Emits a CRLF-joined property list suitable for embedding in a QR
//! code. The caller (form layer / payload validator) guarantees a
//! non-empty first and last name before encoding.

use crate::escape::escape_vcard;
use crate::models::{AddressLabel, EmailLabel, PhoneLabel, VCardData};

/// vCard TEL type parameter for a phone label.
fn phone_type(label: PhoneLabel) -> &'static str {
    match label {
        PhoneLabel::Mobile => "CELL",
        PhoneLabel::Home => "HOME",
        PhoneLabel::Work => "WORK",
        PhoneLabel::Fax => "FAX",
        PhoneLabel::Other => "VOICE",
    }
}

/// vCard EMAIL type parameter for an email label.
fn email_type(label: EmailLabel) -> &'static str {
    match label {
        EmailLabel::Personal => "HOME",
        EmailLabel::Work => "WORK",
        EmailLabel::Other => "INTERNET",
    }
}

/// vCard ADR type parameter for an address label.
fn address_type(label: AddressLabel) -> &'static str {
    match label {
        AddressLabel::Home => "HOME",
        AddressLabel::Work => "WORK",
        AddressLabel::Postal => "POSTAL",
        AddressLabel::Other => "INTL",
    }
}

/// Strip the `data:image/...;base64,` prefix from an embedded image so
/// only the base64 payload is inlined after `ENCODING=b`.
fn strip_data_url(image: &str) -> &str {
    if image.starts_with("data:image/") {
        if let Some(idx) = image.find(";base64,") {
            return &image[idx + ";base64,".len()..];
        }
    }
    image
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Encode a contact as a vCard 3.0 text block, lines joined by CRLF.
pub fn encode(card: &VCardData) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("BEGIN:VCARD".to_string());
    lines.push("VERSION:3.0".to_string());

    // FN: display name assembled from the present name parts.
    let full_name = [
        non_empty(&card.prefix),
        Some(card.first_name.as_str()).filter(|v| !v.is_empty()),
        non_empty(&card.middle_name),
        Some(card.last_name.as_str()).filter(|v| !v.is_empty()),
        non_empty(&card.suffix),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    lines.push(format!("FN:{}", escape_vcard(&full_name)));

    // N: five positional slots, empty when the part is absent.
    lines.push(format!(
        "N:{};{};{};{};{}",
        escape_vcard(&card.last_name),
        escape_vcard(&card.first_name),
        escape_vcard(card.middle_name.as_deref().unwrap_or("")),
        escape_vcard(card.prefix.as_deref().unwrap_or("")),
        escape_vcard(card.suffix.as_deref().unwrap_or("")),
    ));

    if let Some(nickname) = non_empty(&card.nickname) {
        lines.push(format!("NICKNAME:{}", escape_vcard(nickname)));
    }
    if let Some(birthday) = non_empty(&card.birthday) {
        lines.push(format!("BDAY:{}", birthday.replace('-', "")));
    }
    if let Some(photo) = non_empty(&card.photo) {
        lines.push(format!(
            "PHOTO;ENCODING=b;TYPE=JPEG:{}",
            strip_data_url(photo)
        ));
    }

    for phone in &card.phones {
        let value = phone.value.trim();
        if value.is_empty() {
            continue;
        }
        lines.push(format!(
            "TEL;TYPE={}:{}",
            phone_type(phone.label),
            escape_vcard(value)
        ));
    }
    for email in &card.emails {
        let value = email.value.trim();
        if value.is_empty() {
            continue;
        }
        lines.push(format!(
            "EMAIL;TYPE={}:{}",
            email_type(email.label),
            escape_vcard(value)
        ));
    }

    if let Some(org) = non_empty(&card.organization) {
        lines.push(format!("ORG:{}", escape_vcard(org)));
    }
    if let Some(title) = non_empty(&card.title) {
        lines.push(format!("TITLE:{}", escape_vcard(title)));
    }
    if let Some(department) = non_empty(&card.department) {
        lines.push(format!("X-DEPARTMENT:{}", escape_vcard(department)));
    }
    if let Some(role) = non_empty(&card.role) {
        lines.push(format!("ROLE:{}", escape_vcard(role)));
    }
    if let Some(logo) = non_empty(&card.logo) {
        lines.push(format!(
            "LOGO;ENCODING=b;TYPE=JPEG:{}",
            strip_data_url(logo)
        ));
    }
    if let Some(work_url) = non_empty(&card.work_url) {
        lines.push(format!("URL;TYPE=WORK:{}", escape_vcard(work_url)));
    }

    for address in &card.addresses {
        let parts = [
            address.street.trim(),
            address.city.trim(),
            address.state.trim(),
            address.postal.trim(),
            address.country.trim(),
        ];
        if parts.iter().all(|p| p.is_empty()) {
            continue;
        }
        // First two ADR slots (PO box, extended address) are reserved
        // per RFC 2426 and never populated here.
        lines.push(format!(
            "ADR;TYPE={}:;;{};{};{};{};{}",
            address_type(address.label),
            escape_vcard(parts[0]),
            escape_vcard(parts[1]),
            escape_vcard(parts[2]),
            escape_vcard(parts[3]),
            escape_vcard(parts[4]),
        ));
    }

    let socials = [
        ("linkedin", &card.social.linkedin),
        ("twitter", &card.social.twitter),
        ("facebook", &card.social.facebook),
        ("instagram", &card.social.instagram),
    ];
    for (network, link) in socials {
        if let Some(link) = non_empty(link) {
            lines.push(format!(
                "X-SOCIALPROFILE;TYPE={network}:{}",
                escape_vcard(link)
            ));
        }
    }
    if let Some(website) = non_empty(&card.social.website) {
        lines.push(format!("URL:{}", escape_vcard(website)));
    }

    if let Some(notes) = non_empty(&card.notes) {
        lines.push(format!("NOTE:{}", escape_vcard(notes)));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SocialLinks, VCardAddress, VCardEmail, VCardPhone};

    fn card() -> VCardData {
        VCardData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn frames_with_begin_version_end() {
        let out = encode(&card());
        assert!(out.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(out.ends_with("END:VCARD"));
    }

    #[test]
    fn n_line_always_has_five_slots() {
        let out = encode(&card());
        let n_lines: Vec<&str> = out
            .split("\r\n")
            .filter(|l| l.starts_with("N:"))
            .collect();
        assert_eq!(n_lines, vec!["N:Lovelace;Ada;;;"]);
        assert_eq!(n_lines[0].split(';').count(), 5);
    }

    #[test]
    fn fn_line_joins_present_name_parts() {
        let out = encode(&VCardData {
            prefix: Some("Dr.".to_string()),
            middle_name: Some("King".to_string()),
            suffix: Some("Jr.".to_string()),
            ..card()
        });
        assert!(out.contains("FN:Dr. Ada King Lovelace Jr.\r\n"));
    }

    #[test]
    fn bday_strips_hyphens() {
        let out = encode(&VCardData {
            birthday: Some("1815-12-10".to_string()),
            ..card()
        });
        assert!(out.contains("BDAY:18151210\r\n"));
    }

    #[test]
    fn phone_and_email_type_mapping() {
        let out = encode(&VCardData {
            phones: vec![
                VCardPhone {
                    label: PhoneLabel::Mobile,
                    value: "+1555".to_string(),
                },
                VCardPhone {
                    label: PhoneLabel::Other,
                    value: "+1556".to_string(),
                },
                VCardPhone {
                    label: PhoneLabel::Fax,
                    value: "   ".to_string(),
                },
            ],
            emails: vec![VCardEmail {
                label: EmailLabel::Personal,
                value: "ada@example.com".to_string(),
            }],
            ..card()
        });
        assert!(out.contains("TEL;TYPE=CELL:+1555\r\n"));
        assert!(out.contains("TEL;TYPE=VOICE:+1556\r\n"));
        assert!(!out.contains("TYPE=FAX"));
        assert!(out.contains("EMAIL;TYPE=HOME:ada@example.com\r\n"));
    }

    #[test]
    fn address_keeps_reserved_leading_slots() {
        let out = encode(&VCardData {
            addresses: vec![VCardAddress {
                label: AddressLabel::Work,
                street: "1 Infinite Loop".to_string(),
                city: "Cupertino".to_string(),
                state: "CA".to_string(),
                postal: "95014".to_string(),
                country: "USA".to_string(),
            }],
            ..card()
        });
        assert!(out.contains("ADR;TYPE=WORK:;;1 Infinite Loop;Cupertino;CA;95014;USA\r\n"));
    }

    #[test]
    fn photo_strips_data_url_prefix() {
        let out = encode(&VCardData {
            photo: Some("data:image/jpeg;base64,AAAA".to_string()),
            ..card()
        });
        assert!(out.contains("PHOTO;ENCODING=b;TYPE=JPEG:AAAA\r\n"));
    }

    #[test]
    fn social_profiles_and_website() {
        let out = encode(&VCardData {
            social: SocialLinks {
                linkedin: Some("https://linkedin.com/in/ada".to_string()),
                website: Some("https://ada.dev".to_string()),
                ..Default::default()
            },
            ..card()
        });
        assert!(out.contains("X-SOCIALPROFILE;TYPE=linkedin:https://linkedin.com/in/ada\r\n"));
        assert!(out.contains("\r\nURL:https://ada.dev\r\n"));
    }

    #[test]
    fn values_are_escaped() {
        let out = encode(&VCardData {
            organization: Some("Babbage; Sons, Ltd".to_string()),
            ..card()
        });
        assert!(out.contains("ORG:Babbage\\; Sons\\, Ltd\r\n"));
    }
}
