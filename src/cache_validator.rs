use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

/// Integrity-checked wrapper for cached enrichment payloads.
///
/// Cached provider responses are stored alongside a SHA-256 checksum and
/// re-verified on every read; a corrupted or tampered entry reads as a
/// cache miss and the provider is consulted again.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SealedEntry {
    /// JSON payload of the cached value.
    payload: String,
    /// SHA-256 checksum of the payload (hex encoded).
    checksum: String,
}

impl SealedEntry {
    /// Seals a value for caching. Returns `None` when the value cannot
    /// be serialized, which callers treat as "do not cache".
    pub fn seal<T: Serialize>(value: &T) -> Option<Self> {
        let payload = serde_json::to_string(value).ok()?;
        let checksum = Self::digest(&payload);
        Some(Self { payload, checksum })
    }

    fn digest(payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether the payload still matches its checksum.
    pub fn is_intact(&self) -> bool {
        Self::digest(&self.payload) == self.checksum
    }

    /// Store form for a string-valued cache.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decodes a stored entry, verifies its checksum, and deserializes
    /// the payload. Any failure reads as `None` (cache miss).
    pub fn open<T: DeserializeOwned>(stored: &str) -> Option<T> {
        let entry: SealedEntry = serde_json::from_str(stored).ok()?;
        if !entry.is_intact() {
            tracing::warn!(
                "cache entry failed integrity check, discarding (payload length {})",
                entry.payload.len()
            );
            return None;
        }
        serde_json::from_str(&entry.payload).ok()
    }
}
