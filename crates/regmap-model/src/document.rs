#![deny(unsafe_code)]

use std::fmt;

use sha2::Digest;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// Identity of one input blob: its position in the request and a content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct DocumentId {
    /// Zero-based position in the ordered input sequence.
    pub index: usize,
    /// First 12 hex digits of the SHA-256 of the bytes.
    pub fingerprint: String,
}

impl DocumentId {
    pub fn of(index: usize, bytes: &[u8]) -> Self {
        let mut fingerprint = sha256_hex(bytes);
        fingerprint.truncate(12);
        Self { index, fingerprint }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document #{} ({})", self.index, self.fingerprint)
    }
}

/// An input blob paired with its identity.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub index: usize,
    pub bytes: &'a [u8],
}

impl<'a> Document<'a> {
    pub fn new(index: usize, bytes: &'a [u8]) -> Self {
        Self { index, bytes }
    }

    pub fn id(&self) -> DocumentId {
        DocumentId::of(self.index, self.bytes)
    }
}
