//! Content hashing using SHA-1.
//!
//! Blob and commit ids are 40-character lowercase hex SHA-1 digests.

use sha1::{Digest, Sha1};

/// Compute the SHA-1 hash of arbitrary bytes, returned as a hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex_encode(&result)
}

/// Compute a commit id from its identifying parts.
///
/// The digest covers the message, the timestamp's textual form, and the
/// serialized commit record, in that order, so ids are a pure function
/// of commit content.
pub fn hash_commit(message: &str, timestamp: &str, record: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(message.as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(record);
    hex_encode(&hasher.finalize())
}

/// Encode raw bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
