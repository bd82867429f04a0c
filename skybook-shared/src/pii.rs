use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for personal identifiers (phone, national ID) that masks its value in Debug and Display.
/// Serialization passes the real value through so it can still go over the wire to the booking API.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Masked(value.to_string())
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Masked(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let id: Masked<String> = "123456789012".into();
        assert_eq!(format!("{:?}", id), "********");
        assert_eq!(id.to_string(), "********");
        assert_eq!(id.expose(), "123456789012");
    }

    #[test]
    fn test_serialization_keeps_value() {
        let phone: Masked<String> = "0987654321".into();
        assert_eq!(serde_json::to_string(&phone).unwrap(), "\"0987654321\"");
        let back: Masked<String> = serde_json::from_str("\"0987654321\"").unwrap();
        assert_eq!(back, phone);
    }
}
