//! Shamir secret sharing over GF(256) with a digest share.
//!
//! This module provides:
//! - [`split_secret`]: split a byte string into `N` shares, any `T` of which recover it
//! - [`recover_secret`]: recombine `T` shares and authenticate the result
//! - [`interpolate`]: Lagrange interpolation of share values at an arbitrary x
//!
//! # Share Layout
//!
//! For a threshold `T > 1` the polynomial is pinned by `T` points:
//!
//! ```text
//! x = 0 .. T-2   random values
//! x = 254        digest(random_part, secret) || random_part
//! x = 255        the secret
//! ```
//!
//! The remaining shares `x = T-2 .. N` are evaluated from those points. With
//! `T == 1` every share is the secret itself and no digest is involved.

use rand::{CryptoRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::digest::{HmacSha256Digest, ShareDigest, DIGEST_LEN};
use crate::error::Slip39Error;
use crate::field;

/// Maximum number of shares at any level of the tree.
pub const MAX_SHARE_COUNT: u8 = 16;

/// x-coordinate holding the secret.
pub const SECRET_INDEX: u8 = 255;

/// x-coordinate holding the digest share.
pub const DIGEST_INDEX: u8 = 254;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One point of a sharing polynomial: `(x, y)` where `y` is a byte string.
///
/// The value is zeroized on drop and masked in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RawShare {
    /// x-coordinate (member or group index).
    pub index: u8,
    /// Share value, one polynomial evaluation per secret byte.
    pub value: Vec<u8>,
}

impl RawShare {
    /// Create a share from an index and a value.
    #[must_use]
    pub fn new(index: u8, value: Vec<u8>) -> Self {
        Self { index, value }
    }
}

impl fmt::Debug for RawShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawShare")
            .field("index", &self.index)
            .field("value", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// Split `secret` into `share_count` shares with the given `threshold`,
/// authenticated with HMAC-SHA256.
///
/// # Errors
///
/// - [`Slip39Error::Configuration`] if the threshold is 0, exceeds the share
///   count, the share count exceeds [`MAX_SHARE_COUNT`], or the secret is
///   shorter than the digest.
/// - [`Slip39Error::Random`] if `rng` fails.
pub fn split_secret<R: RngCore + CryptoRng>(
    threshold: u8,
    share_count: u8,
    secret: &[u8],
    rng: &mut R,
) -> Result<Vec<RawShare>, Slip39Error> {
    split_secret_with_digest(&HmacSha256Digest, threshold, share_count, secret, rng)
}

/// [`split_secret`] with a caller-supplied digest.
///
/// # Errors
///
/// See [`split_secret`].
pub fn split_secret_with_digest<D: ShareDigest, R: RngCore + CryptoRng>(
    digest: &D,
    threshold: u8,
    share_count: u8,
    secret: &[u8],
    rng: &mut R,
) -> Result<Vec<RawShare>, Slip39Error> {
    if threshold < 1 {
        return Err(Slip39Error::Configuration(
            "threshold must be a positive integer".to_string(),
        ));
    }
    if threshold > share_count {
        return Err(Slip39Error::Configuration(format!(
            "threshold ({threshold}) must not exceed the number of shares ({share_count})"
        )));
    }
    if share_count > MAX_SHARE_COUNT {
        return Err(Slip39Error::Configuration(format!(
            "number of shares ({share_count}) must not exceed {MAX_SHARE_COUNT}"
        )));
    }

    if threshold == 1 {
        return Ok((0..share_count)
            .map(|index| RawShare::new(index, secret.to_vec()))
            .collect());
    }

    if secret.len() < DIGEST_LEN {
        return Err(Slip39Error::Configuration(format!(
            "secret must be at least {DIGEST_LEN} bytes to carry a digest share"
        )));
    }

    // threshold >= 2 here.
    let random_share_count = threshold.saturating_sub(2);

    let mut base: Vec<RawShare> = Vec::with_capacity(usize::from(threshold));
    for index in 0..random_share_count {
        base.push(RawShare::new(index, random_bytes(rng, secret.len())?));
    }

    let random_part = Zeroizing::new(random_bytes(rng, secret.len().saturating_sub(DIGEST_LEN))?);
    let mut digest_value = digest.digest(&random_part, secret).to_vec();
    digest_value.extend_from_slice(&random_part);
    base.push(RawShare::new(DIGEST_INDEX, digest_value));
    base.push(RawShare::new(SECRET_INDEX, secret.to_vec()));

    let mut shares: Vec<RawShare> = base
        .iter()
        .take(usize::from(random_share_count))
        .cloned()
        .collect();
    for index in random_share_count..share_count {
        let value = interpolate(&base, index)?;
        shares.push(RawShare::new(index, value.to_vec()));
    }

    Ok(shares)
}

// ---------------------------------------------------------------------------
// Recover
// ---------------------------------------------------------------------------

/// Recombine shares produced by [`split_secret`] with the same `threshold`.
///
/// # Errors
///
/// - [`Slip39Error::InsufficientShares`] if fewer than `threshold` shares are given.
/// - [`Slip39Error::Consistency`] on duplicate indices or differing value lengths.
/// - [`Slip39Error::DigestMismatch`] if the digest share does not match.
pub fn recover_secret(
    threshold: u8,
    shares: &[RawShare],
) -> Result<Zeroizing<Vec<u8>>, Slip39Error> {
    recover_secret_with_digest(&HmacSha256Digest, threshold, shares)
}

/// [`recover_secret`] with a caller-supplied digest.
///
/// # Errors
///
/// See [`recover_secret`].
pub fn recover_secret_with_digest<D: ShareDigest>(
    digest: &D,
    threshold: u8,
    shares: &[RawShare],
) -> Result<Zeroizing<Vec<u8>>, Slip39Error> {
    if threshold < 1 {
        return Err(Slip39Error::Configuration(
            "threshold must be a positive integer".to_string(),
        ));
    }
    if shares.len() < usize::from(threshold) {
        return Err(Slip39Error::InsufficientShares(format!(
            "{} share(s) provided, threshold is {threshold}",
            shares.len()
        )));
    }

    let Some(first) = shares.first() else {
        return Err(Slip39Error::InsufficientShares("no shares provided".to_string()));
    };
    if threshold == 1 {
        return Ok(Zeroizing::new(first.value.clone()));
    }

    let secret = interpolate(shares, SECRET_INDEX)?;
    let digest_share = interpolate(shares, DIGEST_INDEX)?;
    if digest_share.len() < DIGEST_LEN {
        return Err(Slip39Error::DigestMismatch);
    }
    let (expected, random_part) = digest_share.split_at(DIGEST_LEN);

    if !digest.verify(random_part, &secret, expected) {
        tracing::warn!(threshold, "digest share does not authenticate the recovered secret");
        return Err(Slip39Error::DigestMismatch);
    }

    Ok(secret)
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Evaluate at `x` the unique polynomial through `shares`.
///
/// If `x` is already one of the share indices, that share's value is returned.
///
/// # Errors
///
/// - [`Slip39Error::InsufficientShares`] if `shares` is empty.
/// - [`Slip39Error::Consistency`] on duplicate indices or differing value lengths.
pub fn interpolate(shares: &[RawShare], x: u8) -> Result<Zeroizing<Vec<u8>>, Slip39Error> {
    let Some(first) = shares.first() else {
        return Err(Slip39Error::InsufficientShares(
            "cannot interpolate without shares".to_string(),
        ));
    };
    let len = first.value.len();

    for (i, share) in shares.iter().enumerate() {
        if share.value.len() != len {
            return Err(Slip39Error::Consistency(
                "all share values must have the same length".to_string(),
            ));
        }
        if shares[..i].iter().any(|s| s.index == share.index) {
            return Err(Slip39Error::Consistency(format!(
                "duplicate share index {}",
                share.index
            )));
        }
    }

    if let Some(hit) = shares.iter().find(|s| s.index == x) {
        return Ok(Zeroizing::new(hit.value.clone()));
    }

    // log(prod_j (x_j - x)); terms are reduced as we go.
    let log_prod = shares.iter().fold(0usize, |acc, s| {
        add_mod(acc, usize::from(field::log(field::add(s.index, x))))
    });

    let mut result = Zeroizing::new(vec![0u8; len]);
    for share in shares {
        // log of the Lagrange basis polynomial for `share`, evaluated at x.
        let mut log_basis = sub_mod(
            log_prod,
            usize::from(field::log(field::add(share.index, x))),
        );
        for other in shares.iter().filter(|o| o.index != share.index) {
            log_basis = sub_mod(
                log_basis,
                usize::from(field::log(field::add(share.index, other.index))),
            );
        }

        for (out, &y) in result.iter_mut().zip(share.value.iter()) {
            if y != 0 {
                *out ^= field::exp(usize::from(field::log(y)).saturating_add(log_basis));
            }
        }
    }

    Ok(result)
}

#[allow(clippy::arithmetic_side_effects)]
const fn add_mod(a: usize, b: usize) -> usize {
    (a % field::ORDER + b % field::ORDER) % field::ORDER
}

#[allow(clippy::arithmetic_side_effects)]
const fn sub_mod(a: usize, b: usize) -> usize {
    (a % field::ORDER + field::ORDER - b % field::ORDER) % field::ORDER
}

/// Fill a fresh buffer from the injected random source.
pub(crate) fn random_bytes<R: RngCore + CryptoRng>(
    rng: &mut R,
    len: usize,
) -> Result<Vec<u8>, Slip39Error> {
    let mut bytes = vec![0u8; len];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| Slip39Error::Random(format!("CSPRNG fill failed: {e}")))?;
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
