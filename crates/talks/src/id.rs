//! Typed identifiers for the catalog.
//!
//! Session ids are opaque tokens minted by the server (random 128-bit values
//! rendered as canonical UUID strings). Speaker ids come from an external
//! speaker catalog and are kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A type-safe wrapper around string IDs.
///
/// The marker type keeps session and speaker ids apart at compile time while
/// both serialize as plain JSON strings.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: std::marker::PhantomData<T>,
}

// Serialize as just the string
impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_string(value))
    }
}

impl<T> Id<T> {
    /// Wraps an existing string value.
    ///
    /// # Example
    /// ```
    /// use talks::id::{Id, SessionMarker};
    ///
    /// let session_id = Id::<SessionMarker>::from_string("44".to_string());
    /// assert_eq!(session_id.as_str(), "44");
    /// ```
    pub fn from_string(value: String) -> Self {
        Self {
            value,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Mints a new random ID (a v4 UUID in its hyphenated form).
    ///
    /// # Example
    /// ```
    /// use talks::id::SessionId;
    ///
    /// let first = SessionId::generate();
    /// let second = SessionId::generate();
    /// assert_eq!(first.as_str().len(), 36);
    /// assert_ne!(first, second);
    /// ```
    pub fn generate() -> Self {
        Self::from_string(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::from_string(value.to_string())
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

// Type markers for different entity types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionMarker;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpeakerMarker;

/// Type alias for Session IDs
pub type SessionId = Id<SessionMarker>;

/// Type alias for Speaker IDs
pub type SpeakerId = Id<SpeakerMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();

        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(id1.as_str()).is_ok());
        assert!(!id1.is_empty());
    }

    #[test]
    fn test_id_creation() {
        let id = SessionId::from_string("47".to_string());
        assert_eq!(id.as_str(), "47");
        assert_eq!(id.to_string(), "47");
        assert_eq!(format!("{id:?}"), "Id(47)");
    }

    #[test]
    fn test_id_from_str() {
        let id: SpeakerId = "159".into();
        assert_eq!(id.as_str(), "159");
        assert_eq!(id.into_string(), "159");
    }

    #[test]
    fn test_serde() {
        let original = SpeakerId::from_string("122".to_string());

        let serialized = serde_json::to_string(&original).unwrap();
        assert_eq!(serialized, "\"122\"");

        let deserialized: SpeakerId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }
}
