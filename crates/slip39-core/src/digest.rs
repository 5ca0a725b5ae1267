//! Keyed digest backing the Shamir digest share.
//!
//! Every split with threshold > 1 carries a synthetic share at
//! [`DIGEST_INDEX`](crate::shamir::DIGEST_INDEX) holding
//! `digest(random_part, secret) || random_part`. Recombination recomputes the
//! digest and compares, which is the only tamper evidence in the scheme.
//!
//! The digest sits behind [`ShareDigest`] so the Shamir math can be tested
//! against other keyed functions. [`HmacSha256Digest`] is the interoperable
//! choice and the one used by the mnemonic layer.

use ring::hmac;

/// Length of the truncated digest stored in the digest share (bytes).
pub const DIGEST_LEN: usize = 4;

/// A keyed digest truncated to [`DIGEST_LEN`] bytes.
pub trait ShareDigest {
    /// Digest `secret` under `key`.
    fn digest(&self, key: &[u8], secret: &[u8]) -> [u8; DIGEST_LEN];

    /// Check a digest in constant time.
    fn verify(&self, key: &[u8], secret: &[u8], expected: &[u8]) -> bool {
        constant_time_eq(&self.digest(key, secret), expected)
    }
}

/// HMAC-SHA256 truncated to the first four bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HmacSha256Digest;

impl ShareDigest for HmacSha256Digest {
    fn digest(&self, key: &[u8], secret: &[u8]) -> [u8; DIGEST_LEN] {
        let key = hmac::Key::new(hmac::HMAC_SHA256, key);
        let tag = hmac::sign(&key, secret);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&tag.as_ref()[..DIGEST_LEN]);
        out
    }
}

/// Byte comparison without early exit on the first differing byte.
///
/// The length check may short-circuit: digest length is public.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
