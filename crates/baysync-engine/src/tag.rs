//! Resource tag extraction from free-text locations.
//!
//! A location names its resource as a marker word followed by whitespace and a
//! number, anywhere in the text: `"Bay 3 - North hall"` carries tag `"3"` for
//! the marker `Bay`. Matching is case-sensitive.

use regex::Regex;

use crate::error::{Result, SyncError};

/// Marker word used when none is configured.
pub const DEFAULT_MARKER: &str = "Bay";

/// Extracts the numeric resource identifier from a location string.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    pattern: Regex,
}

impl TagExtractor {
    /// Build an extractor for the given marker word. The marker is matched
    /// literally; regex metacharacters in it carry no special meaning.
    ///
    /// # Errors
    /// Returns `SyncError::InvalidMarker` when the marker is empty or too
    /// large to compile into a pattern.
    pub fn new(marker: &str) -> Result<Self> {
        if marker.trim().is_empty() {
            return Err(SyncError::InvalidMarker("marker is empty".to_string()));
        }
        let pattern = Regex::new(&format!(r"{}\s+(\d+)", regex::escape(marker)))
            .map_err(|e| SyncError::InvalidMarker(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Return the digits following the marker word.
    ///
    /// # Errors
    /// Returns `SyncError::MalformedLocation` when the location does not
    /// contain the marker followed by a number.
    pub fn extract(&self, location: &str) -> Result<String> {
        self.pattern
            .captures(location)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| SyncError::MalformedLocation {
                location: location.to_string(),
            })
    }
}
