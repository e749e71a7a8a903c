//! Validated input for embedding requests.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// A non-empty list of texts to embed.
///
/// Built through one of the `TryFrom` conversions, which all reject an
/// empty list. The conversion from a dynamic [`Value`] additionally
/// rejects anything that is not an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmbeddingInput(Vec<String>);

impl EmbeddingInput {
    const INVALID: &'static str = "Texts must be a non-empty list of strings";

    /// Creates an input from any collection of strings.
    pub fn new<I, S>(texts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        if texts.is_empty() {
            return Err(Error::invalid_input(Self::INVALID));
        }

        Ok(Self(texts))
    }

    /// Returns the texts.
    pub fn texts(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of texts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: an input holds at least one text.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the input, returning the texts.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl TryFrom<Vec<String>> for EmbeddingInput {
    type Error = Error;

    fn try_from(texts: Vec<String>) -> Result<Self> {
        Self::new(texts)
    }
}

impl TryFrom<Vec<&str>> for EmbeddingInput {
    type Error = Error;

    fn try_from(texts: Vec<&str>) -> Result<Self> {
        Self::new(texts)
    }
}

impl TryFrom<&[&str]> for EmbeddingInput {
    type Error = Error;

    fn try_from(texts: &[&str]) -> Result<Self> {
        Self::new(texts.iter().copied())
    }
}

impl TryFrom<&[String]> for EmbeddingInput {
    type Error = Error;

    fn try_from(texts: &[String]) -> Result<Self> {
        Self::new(texts.iter().cloned())
    }
}

impl<const N: usize> TryFrom<[&str; N]> for EmbeddingInput {
    type Error = Error;

    fn try_from(texts: [&str; N]) -> Result<Self> {
        Self::new(texts)
    }
}

impl TryFrom<Value> for EmbeddingInput {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(Error::invalid_input(Self::INVALID));
        };

        let texts = items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                _ => Err(Error::invalid_input(Self::INVALID)),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(texts)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_accepts_strings() {
        let input = EmbeddingInput::try_from(vec!["a", "b"]).expect("Valid input");
        assert_eq!(input.texts(), ["a", "b"]);
        assert_eq!(input.len(), 2);
        assert!(!input.is_empty());
    }

    #[test]
    fn test_rejects_empty() {
        let result = EmbeddingInput::try_from(Vec::<String>::new());
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = EmbeddingInput::try_from(json!([]));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_non_string_items() {
        let result = EmbeddingInput::try_from(json!(["a", 2]));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_non_array() {
        let result = EmbeddingInput::try_from(json!("a"));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_serializes_as_array() {
        let input = EmbeddingInput::try_from(["x", "y"]).expect("Valid input");
        assert_eq!(serde_json::to_value(&input).unwrap(), json!(["x", "y"]));
    }
}
