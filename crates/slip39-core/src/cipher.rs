//! Passphrase encryption of the master secret.
//!
//! A four-round balanced Feistel network whose round function is
//! PBKDF2-HMAC-SHA256 (`ring::pbkdf2`):
//!
//! ```text
//! F(i, R) = PBKDF2(password = [i] || passphrase,
//!                  salt     = "shamir" || identifier (u16 BE) || R,
//!                  rounds   = (10000 << e) / 4,
//!                  len      = |R|)
//! ```
//!
//! Encryption runs rounds 0, 1, 2, 3 and decryption 3, 2, 1, 0; both finish
//! with a swap of the halves. Any passphrase, including the empty one, decrypts to
//! *something*: a wrong passphrase yields a different, well-formed secret.

use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::{Zeroize, Zeroizing};

use crate::error::Slip39Error;

/// Total PBKDF2 iterations at exponent 0, spread over all rounds.
const BASE_ITERATION_COUNT: u64 = 10_000;

/// Number of Feistel rounds.
const ROUND_COUNT: u8 = 4;

const ENCRYPT_ROUNDS: [u8; ROUND_COUNT as usize] = [0, 1, 2, 3];
const DECRYPT_ROUNDS: [u8; ROUND_COUNT as usize] = [3, 2, 1, 0];

/// Salt prefix for the round function.
const CUSTOMIZATION_STRING: &[u8] = b"shamir";

/// Largest iteration exponent whose per-round count still fits `u32`.
pub const MAX_ITERATION_EXPONENT: u8 = 20;

static PBKDF2_ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Encrypt a master secret into the encrypted master secret (EMS).
///
/// # Errors
///
/// Returns [`Slip39Error::Configuration`] if the secret length is odd or the
/// iteration exponent exceeds [`MAX_ITERATION_EXPONENT`].
pub fn encrypt(
    master_secret: &[u8],
    passphrase: &[u8],
    iteration_exponent: u8,
    identifier: u16,
) -> Result<Zeroizing<Vec<u8>>, Slip39Error> {
    feistel(
        master_secret,
        passphrase,
        iteration_exponent,
        identifier,
        &ENCRYPT_ROUNDS,
    )
}

/// Decrypt an EMS back into the master secret.
///
/// # Errors
///
/// Same conditions as [`encrypt`].
pub fn decrypt(
    encrypted_master_secret: &[u8],
    passphrase: &[u8],
    iteration_exponent: u8,
    identifier: u16,
) -> Result<Zeroizing<Vec<u8>>, Slip39Error> {
    feistel(
        encrypted_master_secret,
        passphrase,
        iteration_exponent,
        identifier,
        &DECRYPT_ROUNDS,
    )
}

/// Check that a passphrase only contains printable ASCII (`0x20..=0x7E`).
///
/// # Errors
///
/// Returns [`Slip39Error::Configuration`] naming the first offending position.
pub fn validate_passphrase(passphrase: &str) -> Result<(), Slip39Error> {
    match passphrase
        .chars()
        .position(|c| !(' '..='~').contains(&c))
    {
        Some(pos) => Err(Slip39Error::Configuration(format!(
            "passphrase must contain only printable ASCII characters (code points 32-126), \
             invalid character at position {pos}"
        ))),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Feistel network
// ---------------------------------------------------------------------------

fn feistel(
    input: &[u8],
    passphrase: &[u8],
    iteration_exponent: u8,
    identifier: u16,
    rounds: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Slip39Error> {
    if input.is_empty() || input.len() % 2 != 0 {
        return Err(Slip39Error::Configuration(format!(
            "secret length must be even and non-zero, got {} bytes",
            input.len()
        )));
    }
    let iterations = round_iterations(iteration_exponent)?;

    let half = input.len().div_ceil(2);
    let mut left = Zeroizing::new(input[..half].to_vec());
    let mut right = Zeroizing::new(input[half..].to_vec());
    let mut keystream = Zeroizing::new(vec![0u8; half]);

    for &round in rounds {
        round_function(round, passphrase, identifier, &right, iterations, &mut keystream);
        for (l, k) in left.iter_mut().zip(keystream.iter()) {
            *l ^= k;
        }
        std::mem::swap(&mut left, &mut right);
    }

    let mut output = Zeroizing::new(Vec::with_capacity(input.len()));
    output.extend_from_slice(&right);
    output.extend_from_slice(&left);
    Ok(output)
}

fn round_function(
    round: u8,
    passphrase: &[u8],
    identifier: u16,
    half: &[u8],
    iterations: NonZeroU32,
    out: &mut [u8],
) {
    let mut password = Zeroizing::new(Vec::with_capacity(passphrase.len().saturating_add(1)));
    password.push(round);
    password.extend_from_slice(passphrase);

    let mut salt = Vec::with_capacity(
        CUSTOMIZATION_STRING
            .len()
            .saturating_add(2)
            .saturating_add(half.len()),
    );
    salt.extend_from_slice(CUSTOMIZATION_STRING);
    salt.extend_from_slice(&identifier.to_be_bytes());
    salt.extend_from_slice(half);

    pbkdf2::derive(PBKDF2_ALGORITHM, iterations, &salt, &password, out);
    salt.zeroize();
}

/// Per-round PBKDF2 iteration count for the given exponent.
fn round_iterations(iteration_exponent: u8) -> Result<NonZeroU32, Slip39Error> {
    if iteration_exponent > MAX_ITERATION_EXPONENT {
        return Err(Slip39Error::Configuration(format!(
            "iteration exponent ({iteration_exponent}) must not exceed {MAX_ITERATION_EXPONENT}"
        )));
    }
    #[allow(clippy::arithmetic_side_effects)]
    let count = (BASE_ITERATION_COUNT / u64::from(ROUND_COUNT)) << iteration_exponent;
    u32::try_from(count)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| {
            Slip39Error::Configuration(format!(
                "iteration count for exponent {iteration_exponent} is out of range"
            ))
        })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
