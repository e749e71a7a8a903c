//! Prelude module for olympia-client.
//!
//! This module re-exports the most commonly used types from the
//! olympia-client library. Import this module to get quick access to
//! the essential components.

pub use crate::client::{CredentialResolver, OlympiaClient, OlympiaConfig};
pub use crate::embedding::EmbeddingInput;
pub use crate::error::{Error, Result};
