//! Content fingerprints
//!
//! Provides [`Fingerprint`], a 32-byte Blake3 digest of a value's JSON
//! encoding. Two payloads with equal fingerprints serialize identically.

use crate::error::FingerprintError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte content fingerprint (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Wrap raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fingerprint arbitrary bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Fingerprint a serializable value through its JSON encoding
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[inline]
    pub fn of<T: serde::Serialize>(value: &T) -> Result<Self, FingerprintError> {
        let json = serde_json::to_vec(value)?;
        Ok(Self::compute(&json))
    }

    /// First 16 hex chars
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(FingerprintError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl serde::Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_same_fingerprint() {
        let a = Fingerprint::of(&vec!["x", "y"]).unwrap();
        let b = Fingerprint::of(&vec!["x", "y"]).unwrap();
        let c = Fingerprint::of(&vec!["y", "x"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_parses_back() {
        let fp = Fingerprint::compute(b"menu");
        let parsed: Fingerprint = fp.to_string().parse().unwrap();
        assert_eq!(fp, parsed);
        assert_eq!(fp.short().len(), 16);
    }

    #[test]
    fn rejects_short_hex() {
        let err = "abcd".parse::<Fingerprint>().unwrap_err();
        assert!(matches!(
            err,
            FingerprintError::InvalidLength { expected: 32, actual: 2 }
        ));
    }
}
