//! Extractors that reject with the shared error envelope instead of axum's plain-text bodies.

pub mod validated_json;

pub use validated_json::ValidatedJson;
