// Cryptographic Hashing Wrappers
use sha2::{Digest, Sha256};

/// SHA-256: single round, used as the building block for `hash_sha256d`
pub fn hash_sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double SHA-256: block identity hashes, txids and Merkle nodes
pub fn hash_sha256d(data: &[u8]) -> [u8; 32] {
    hash_sha256(&hash_sha256(data))
}

/// Double SHA-256 Concat: hashes a then b without allocating a temporary Vec
pub fn hash_sha256d_concat(a: &[u8], b: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(a);
    hasher.update(b);
    let first: [u8; 32] = hasher.finalize().into();
    hash_sha256(&first)
}
