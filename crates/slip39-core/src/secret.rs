//! The master secret being backed up.
//!
//! [`MasterSecret`] wraps [`SecretSlice<u8>`] from the `secrecy` crate:
//! - zeroized on drop
//! - masked `Debug`/`Display` (`MasterSecret(***)`)
//! - length checked on construction (even, at least 128 bits)

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, SecretSlice};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::Slip39Error;
use crate::shamir::random_bytes;

/// Minimum master secret length in bytes (128 bits).
pub const MIN_SECRET_LEN: usize = 16;

/// A validated master secret.
pub struct MasterSecret {
    inner: SecretSlice<u8>,
}

impl MasterSecret {
    /// Copy `data` into a new master secret.
    ///
    /// The caller should zeroize the source afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::Configuration`] if `data` is shorter than
    /// [`MIN_SECRET_LEN`] bytes or has an odd length.
    pub fn new(data: &[u8]) -> Result<Self, Slip39Error> {
        validate_length(data.len())?;
        Ok(Self {
            inner: data.to_vec().into(),
        })
    }

    /// Fresh random secret of `len` bytes from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// See [`MasterSecret::generate_with_rng`].
    pub fn generate(len: usize) -> Result<Self, Slip39Error> {
        Self::generate_with_rng(len, &mut OsRng)
    }

    /// Fresh random secret of `len` bytes from `rng`.
    ///
    /// # Errors
    ///
    /// - [`Slip39Error::Configuration`] for an invalid length.
    /// - [`Slip39Error::Random`] if `rng` fails.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        len: usize,
        rng: &mut R,
    ) -> Result<Self, Slip39Error> {
        validate_length(len)?;
        let bytes = Zeroizing::new(random_bytes(rng, len)?);
        Self::new(&bytes)
    }

    /// Expose the raw bytes. Keep the borrow short.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Always `false`: a master secret holds at least [`MIN_SECRET_LEN`] bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TryFrom<Vec<u8>> for MasterSecret {
    type Error = Slip39Error;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        let value = Zeroizing::new(value);
        Self::new(&value)
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(***)")
    }
}

impl fmt::Display for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(***)")
    }
}

fn validate_length(len: usize) -> Result<(), Slip39Error> {
    if len < MIN_SECRET_LEN {
        return Err(Slip39Error::Configuration(format!(
            "master secret must be at least {MIN_SECRET_LEN} bytes (128 bits), got {len}"
        )));
    }
    if len % 2 != 0 {
        return Err(Slip39Error::Configuration(format!(
            "master secret length must be even, got {len} bytes"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
