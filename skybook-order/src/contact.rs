use serde::Serialize;
use skybook_shared::ContactInfo;
use std::fmt;
use std::ops::RangeInclusive;

const PHONE_DIGITS: RangeInclusive<usize> = 8..=12;
const ID_DIGITS: RangeInclusive<usize> = 8..=14;

/// Field-level messages shown next to the contact inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
}

impl ContactErrors {
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none() && self.id_number.is_none()
    }
}

impl fmt::Display for ContactErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [self.phone_number.as_deref(), self.id_number.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        f.write_str(&messages.join("; "))
    }
}

/// Phone: 8 to 12 digits. Citizen id: 8 to 14 digits. Email is not checked.
pub fn validate(contact: &ContactInfo) -> Result<(), ContactErrors> {
    let phone = contact.phone_number.expose();
    let id_number = contact.id_number.expose();

    let errors = ContactErrors {
        phone_number: if phone.is_empty() {
            Some("Vui lòng nhập số điện thoại".to_string())
        } else if !is_digits(phone, PHONE_DIGITS) {
            Some("Số điện thoại phải từ 8-12 số".to_string())
        } else {
            None
        },
        id_number: if id_number.is_empty() {
            Some("Vui lòng nhập số căn cước công dân".to_string())
        } else if !is_digits(id_number, ID_DIGITS) {
            Some("Số căn cước công dân phải từ 8-14 số".to_string())
        } else {
            None
        },
    };

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_digits(value: &str, len: RangeInclusive<usize>) -> bool {
    len.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_contact() {
        let contact = ContactInfo::new("a@example.com", "0987654321", "123456789012");
        assert!(validate(&contact).is_ok());
    }

    #[test]
    fn test_short_phone_rejected() {
        let contact = ContactInfo::new("", "123", "123456789012");
        let errors = validate(&contact).unwrap_err();
        assert_eq!(errors.phone_number.as_deref(), Some("Số điện thoại phải từ 8-12 số"));
        assert!(errors.id_number.is_none());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = validate(&ContactInfo::default()).unwrap_err();
        assert_eq!(errors.phone_number.as_deref(), Some("Vui lòng nhập số điện thoại"));
        assert_eq!(errors.id_number.as_deref(), Some("Vui lòng nhập số căn cước công dân"));
    }

    #[test]
    fn test_bounds_and_non_digits() {
        assert!(is_digits("12345678", PHONE_DIGITS));
        assert!(is_digits("123456789012", PHONE_DIGITS));
        assert!(!is_digits("1234567890123", PHONE_DIGITS));
        assert!(!is_digits("0987 65432", PHONE_DIGITS));
        assert!(!is_digits("０９８７６５４３２１", PHONE_DIGITS));
        assert!(is_digits("12345678901234", ID_DIGITS));
        assert!(!is_digits("123456789012345", ID_DIGITS));
    }
}
