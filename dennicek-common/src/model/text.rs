use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Text with at least one non-whitespace character.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct NonEmptyText(String);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Text must not be empty")]
pub struct EmptyTextError;

impl NonEmptyText {
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyTextError> {
        let text = text.into();
        if text.trim().is_empty() {
            Err(EmptyTextError)
        } else {
            Ok(Self(text))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = EmptyTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        NonEmptyText::new(inner)
            .map_err(|_| Error::invalid_value(Unexpected::Str(""), &"non-empty text"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::text::{EmptyTextError, NonEmptyText};

    #[test]
    fn rejects_blank_text() {
        assert_eq!(NonEmptyText::new(""), Err(EmptyTextError));
        assert_eq!(NonEmptyText::new(" \t\n"), Err(EmptyTextError));
    }

    #[test]
    fn keeps_text_untrimmed() {
        let text = NonEmptyText::new("  Ahoj ").unwrap();
        assert_eq!(text.get(), "  Ahoj ");
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<NonEmptyText>("\"Ana\"").is_ok());
        assert!(serde_json::from_str::<NonEmptyText>("\"   \"").is_err());
    }
}
