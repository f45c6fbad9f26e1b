//! Binary container format for fitted artifacts.
//!
//! An artifact file is a 24-byte header followed by a Postcard-encoded
//! payload:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     Magic ("IGEA")
//! 4       1     Version major
//! 5       1     Version minor
//! 6       1     Artifact kind
//! 7       1     Reserved
//! 8       4     Payload size (bytes, little-endian)
//! 12      4     CRC32 checksum of payload
//! 16      4     Number of features
//! 20      4     Reserved
//! ```
//!
//! Decode failures split into two families: byte-level damage (magic,
//! truncation, checksum, Postcard) and incompatibility (format version ahead
//! of this runtime, unknown or mismatched kind). The loader surfaces the two
//! families as distinct user-facing errors.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Magic bytes identifying an artifact file.
pub const MAGIC: &[u8; 4] = b"IGEA";

/// Current format version (major).
pub const CURRENT_VERSION_MAJOR: u8 = 1;

/// Current format version (minor).
pub const CURRENT_VERSION_MINOR: u8 = 0;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Artifact kind stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ArtifactKind {
    /// Fitted per-feature scaler.
    Scaler = 0,
    /// Fitted regression model.
    Model = 1,
}

impl ArtifactKind {
    /// Convert from a raw header byte, returning None for unknown values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Scaler),
            1 => Some(Self::Model),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scaler => write!(f, "scaler"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// Parsed artifact header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactHeader {
    /// Format version (major).
    pub version_major: u8,
    /// Format version (minor).
    pub version_minor: u8,
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Size of the payload in bytes.
    pub payload_size: u32,
    /// CRC32 checksum of the payload.
    pub checksum: u32,
    /// Number of features the artifact was fitted on.
    pub num_features: u32,
}

impl ArtifactHeader {
    /// Create a header for the current format version.
    pub fn new(kind: ArtifactKind, num_features: u32) -> Self {
        Self {
            version_major: CURRENT_VERSION_MAJOR,
            version_minor: CURRENT_VERSION_MINOR,
            kind,
            payload_size: 0,
            checksum: 0,
            num_features,
        }
    }

    /// Serialize the header to its 24-byte wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];

        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.version_major;
        buf[5] = self.version_minor;
        buf[6] = self.kind as u8;
        buf[7] = 0;
        buf[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf[16..20].copy_from_slice(&self.num_features.to_le_bytes());
        buf[20..24].copy_from_slice(&[0, 0, 0, 0]);

        buf
    }

    /// Parse a header from 24 bytes.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, FormatError> {
        if &buf[0..4] != MAGIC {
            return Err(FormatError::BadMagic);
        }

        let version_major = buf[4];
        let version_minor = buf[5];

        if version_major > CURRENT_VERSION_MAJOR {
            return Err(FormatError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        let kind = ArtifactKind::from_u8(buf[6]).ok_or(FormatError::UnknownKind(buf[6]))?;

        let payload_size = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let checksum = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
        let num_features = u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]);

        Ok(Self {
            version_major,
            version_minor,
            kind,
            payload_size,
            checksum,
            num_features,
        })
    }
}

/// Errors produced while encoding or decoding an artifact file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Not an artifact file (wrong magic).
    #[error("not an artifact file (bad magic)")]
    BadMagic,

    /// Artifact was written by a newer format version.
    #[error("artifact requires format version {major}.{minor}, newer than this runtime supports")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// Kind byte is not a known artifact kind.
    #[error("unknown artifact kind byte {0:#04x}")]
    UnknownKind(u8),

    /// Header declares a different kind than the caller expected.
    #[error("expected a {expected} artifact but found a {actual} artifact")]
    KindMismatch {
        expected: ArtifactKind,
        actual: ArtifactKind,
    },

    /// File ends before the declared payload does.
    #[error("file truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Payload bytes do not match the stored checksum.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Payload failed to decode.
    #[error("payload decode failed: {0}")]
    Decode(#[from] postcard::Error),
}

impl FormatError {
    /// Whether this failure means the bytes decode but the object is unusable,
    /// as opposed to byte-level damage.
    pub fn is_incompatibility(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedVersion { .. } | Self::UnknownKind(_) | Self::KindMismatch { .. }
        )
    }
}

/// Compute the CRC32 checksum of payload bytes.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Encode a payload into a complete artifact file image.
pub fn encode_artifact<T: Serialize>(
    kind: ArtifactKind,
    num_features: u32,
    payload: &T,
) -> Result<Vec<u8>, FormatError> {
    let payload_bytes = postcard::to_allocvec(payload)?;

    let mut header = ArtifactHeader::new(kind, num_features);
    header.payload_size = payload_bytes.len() as u32;
    header.checksum = compute_checksum(&payload_bytes);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload_bytes.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload_bytes);
    Ok(out)
}

/// Decode an artifact file image, verifying kind, length, and checksum.
pub fn decode_artifact<T: DeserializeOwned>(
    expected_kind: ArtifactKind,
    bytes: &[u8],
) -> Result<(ArtifactHeader, T), FormatError> {
    if bytes.len() < HEADER_SIZE {
        return Err(FormatError::Truncated {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    let mut header_buf = [0u8; HEADER_SIZE];
    header_buf.copy_from_slice(&bytes[..HEADER_SIZE]);
    let header = ArtifactHeader::from_bytes(&header_buf)?;

    if header.kind != expected_kind {
        return Err(FormatError::KindMismatch {
            expected: expected_kind,
            actual: header.kind,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    let declared = header.payload_size as usize;
    if payload.len() < declared {
        return Err(FormatError::Truncated {
            expected: declared,
            actual: payload.len(),
        });
    }
    let payload = &payload[..declared];

    let actual_checksum = compute_checksum(payload);
    if actual_checksum != header.checksum {
        return Err(FormatError::ChecksumMismatch {
            expected: header.checksum,
            actual: actual_checksum,
        });
    }

    let value = postcard::from_bytes(payload)?;
    Ok((header, value))
}
