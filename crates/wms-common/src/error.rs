//! Error types for capabilities resolution.

use thiserror::Error;

use crate::CrsCode;

/// Result type alias using CapabilitiesError.
pub type CapabilitiesResult<T> = Result<T, CapabilitiesError>;

/// Primary error type for capabilities parsing and resolution.
///
/// Only [`CapabilitiesError::InvalidCapabilities`] and, in strict lookups,
/// [`CapabilitiesError::NoLayerFound`] ever reach a caller. The
/// `Unresolved*` variants describe per-field fallbacks that are logged
/// and replaced by a default.
#[derive(Debug, Error)]
pub enum CapabilitiesError {
    // === Fatal ===
    #[error("Invalid capabilities document: {0}")]
    InvalidCapabilities(String),

    // === Lookup ===
    #[error("Layer not found: {0}")]
    NoLayerFound(String),

    // === Non-fatal, logged ===
    #[error("No usable extent for layer '{layer}' in {target}")]
    UnresolvedExtent { layer: String, target: CrsCode },

    #[error("No attribution source for layer '{layer}', using {fallback}")]
    UnresolvedAttributionSource { layer: String, fallback: String },

    #[error("Cannot project from {from} to {to}: {message}")]
    UnresolvedProjection {
        from: String,
        to: CrsCode,
        message: String,
    },
}

impl CapabilitiesError {
    /// Whether this error aborts processing instead of falling back.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CapabilitiesError::InvalidCapabilities(_))
    }
}

impl From<quick_xml::Error> for CapabilitiesError {
    fn from(err: quick_xml::Error) -> Self {
        CapabilitiesError::InvalidCapabilities(format!("XML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_capabilities_is_fatal() {
        assert!(CapabilitiesError::InvalidCapabilities("no version".into()).is_fatal());
        assert!(!CapabilitiesError::NoLayerFound("ch.swisstopo".into()).is_fatal());
        assert!(!CapabilitiesError::UnresolvedExtent {
            layer: "a".into(),
            target: CrsCode::Epsg2056,
        }
        .is_fatal());
    }

    #[test]
    fn test_messages() {
        let err = CapabilitiesError::UnresolvedProjection {
            from: "EPSG:31467".into(),
            to: CrsCode::Epsg3857,
            message: "unknown source CRS".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot project from EPSG:31467 to EPSG:3857: unknown source CRS"
        );
    }
}
