// Proof-of-work hashing and difficulty comparison.
//
// The header hash that has to fall under the difficulty ceiling is a
// memory-hard function, separate from the double SHA-256 block identity hash.
use std::cmp::Ordering;

use primitive_types::U256;

use crate::crypto::hash::hash_sha256d;
use crate::primitives::block::BLOCK_HEADER_BYTES;
use crate::primitives::uint256::Uint256;

/// Proof-of-work hash over a serialized 80-byte block header.
///
/// Implementations must be deterministic and usable from several threads at
/// once, since the nonce search fans out over a thread pool.
pub trait PowHasher: Sync {
    fn pow_hash(&self, header: &[u8; BLOCK_HEADER_BYTES]) -> Uint256;
}

/// scrypt with the header as both password and salt.
#[derive(Debug, Clone, Copy)]
pub struct ScryptPow {
    params: scrypt::Params,
}

impl ScryptPow {
    /// N = 2^10, 128 KiB of scratch memory per hash.
    pub const LOG_N: u8 = 10;
    pub const R: u32 = 1;
    pub const P: u32 = 1;

    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, scrypt::errors::InvalidParams> {
        let params = scrypt::Params::new(log_n, r, p, 32)?;
        Ok(ScryptPow { params })
    }
}

impl Default for ScryptPow {
    fn default() -> Self {
        ScryptPow::new(Self::LOG_N, Self::R, Self::P).expect("consensus scrypt parameters are valid")
    }
}

impl PowHasher for ScryptPow {
    fn pow_hash(&self, header: &[u8; BLOCK_HEADER_BYTES]) -> Uint256 {
        let mut out = [0u8; 32];
        scrypt::scrypt(header, header, &self.params, &mut out).expect("32-byte scrypt output is always accepted");
        Uint256(out)
    }
}

/// Double SHA-256 as the work function. Cheap; used where only the search
/// mechanics matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256dPow;

impl PowHasher for Sha256dPow {
    fn pow_hash(&self, header: &[u8; BLOCK_HEADER_BYTES]) -> Uint256 {
        Uint256(hash_sha256d(header))
    }
}

/// Unsigned 256-bit comparison.
pub fn compare256(a: &Uint256, b: &Uint256) -> Ordering {
    a.to_u256().cmp(&b.to_u256())
}

/// True when `hash` is at or below `ceiling`.
pub fn meets_target(hash: &Uint256, ceiling: &Uint256) -> bool {
    compare256(hash, ceiling) != Ordering::Greater
}

/// Expands compact difficulty bits into a full target. Negative or
/// overflowing encodings expand to zero.
pub fn target_from_compact(bits: u32) -> Uint256 {
    let exponent = bits >> 24;
    let mantissa = bits & 0x007f_ffff;
    if bits & 0x0080_0000 != 0 && mantissa != 0 {
        return Uint256::ZERO;
    }

    let value = if exponent <= 3 {
        U256::from(mantissa >> (8 * (3 - exponent)))
    } else if exponent > 34 {
        U256::zero()
    } else {
        let shift = 8 * (exponent - 3) as usize;
        let mantissa = U256::from(mantissa);
        // Drop mantissa bits that would be shifted past bit 255
        if mantissa.bits() + shift > 256 {
            U256::zero()
        } else {
            mantissa << shift
        }
    };
    Uint256::from_u256(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare256_numeric_order() {
        let small = Uint256::from_static_hex("0x01");
        let big = Uint256::from_static_hex("0x0100");
        assert_eq!(compare256(&small, &big), Ordering::Less);
        assert_eq!(compare256(&big, &small), Ordering::Greater);
        assert_eq!(compare256(&big, &big), Ordering::Equal);
    }

    #[test]
    fn test_meets_target_is_inclusive() {
        let ceiling = Uint256::from_static_hex("0x0fff");
        assert!(meets_target(&ceiling, &ceiling));
        assert!(meets_target(&Uint256::ZERO, &ceiling));
        assert!(!meets_target(&Uint256::from_static_hex("0x1000"), &ceiling));
    }

    #[test]
    fn test_compact_expansion_matches_limits() {
        assert_eq!(
            target_from_compact(0x1f0fffff),
            Uint256::from_static_hex("000fffff00000000000000000000000000000000000000000000000000000000")
        );
        assert_eq!(
            target_from_compact(0x200fffff),
            Uint256::from_static_hex("0fffff0000000000000000000000000000000000000000000000000000000000")
        );
        assert_eq!(target_from_compact(0x03123456), Uint256::from_static_hex("123456"));
        assert_eq!(target_from_compact(0x01123456), Uint256::from_static_hex("12"));
    }

    #[test]
    fn test_compact_negative_and_overflow() {
        assert_eq!(target_from_compact(0x04923456), Uint256::ZERO);
        assert_eq!(target_from_compact(0xff123456), Uint256::ZERO);
    }

    #[test]
    fn test_scrypt_pow_is_deterministic() {
        let hasher = ScryptPow::default();
        let header = [7u8; BLOCK_HEADER_BYTES];
        assert_eq!(hasher.pow_hash(&header), hasher.pow_hash(&header));
        assert_ne!(hasher.pow_hash(&header), Sha256dPow.pow_hash(&header));
    }

    #[test]
    fn test_scrypt_known_vector() {
        // scrypt(P = S = 80 zero bytes, N = 1024, r = 1, p = 1, dkLen = 32), raw output order
        let hasher = ScryptPow::default();
        let header = [0u8; BLOCK_HEADER_BYTES];
        assert_eq!(
            hex::encode(hasher.pow_hash(&header).as_bytes()),
            "161d0876f3b93b1048cda1bdeaa7332ee210f7131b42013cb43913a6553a4b69"
        );
    }
}
