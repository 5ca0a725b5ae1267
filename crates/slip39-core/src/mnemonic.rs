//! Share ⇄ mnemonic encoding.
//!
//! This module provides:
//! - [`Share`]: one leaf of a share tree, with all the metadata needed to
//!   recombine it
//! - [`Share::to_words`] / [`Share::to_mnemonic`]: encode
//! - [`Share::from_words`] / [`Share::from_mnemonic`]: decode and validate
//! - [`validate_mnemonic`]: `true` iff a mnemonic decodes
//!
//! # Layout
//!
//! ```text
//! identifier (15) | iteration exponent (5) | group index (4) |
//! group threshold - 1 (4) | group count - 1 (4) | member index (4) |
//! member threshold - 1 (4) | zero padding | share value | checksum (30)
//! ```
//!
//! The 40 metadata bits fill exactly four words. The value is left-padded
//! with fewer than ten zero bits so that it ends on a word boundary.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bits::{BitReader, BitWriter};
use crate::checksum::{create_checksum, verify_checksum, CHECKSUM_WORDS};
use crate::error::Slip39Error;
use crate::secret::MIN_SECRET_LEN;
use crate::wordlist::{get_wordlist, word_index, RADIX_BITS};

// ── Constants ──────────────────────────────────────────────────────

/// Width of the random identifier.
pub const ID_BITS: u32 = 15;

/// Width of the iteration exponent field.
pub const ITERATION_EXP_BITS: u32 = 5;

/// Width of each index and threshold field.
const INDEX_BITS: u32 = 4;

/// Words taken by identifier, exponent and the five 4-bit fields.
pub const METADATA_WORDS: usize = 4;

/// Shortest valid mnemonic: a 128-bit value.
pub const MIN_MNEMONIC_WORDS: usize = 20;

/// Largest value storable in a 4-bit count field.
const MAX_FIELD_COUNT: u8 = 16;

/// Largest padding that can precede a byte-aligned value.
const MAX_PADDING_BITS: usize = 8;

// ── Types ──────────────────────────────────────────────────────────

/// A single mnemonic share.
///
/// Thresholds and counts are stored as their real values (`1..=16`); the
/// "minus one" encoding only exists on the wire.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// Random 15-bit identifier shared by all shares of one split.
    pub identifier: u16,
    /// PBKDF2 iteration exponent used to encrypt the master secret.
    pub iteration_exponent: u8,
    /// Index of this share's group (x-coordinate at the group level).
    pub group_index: u8,
    /// Number of groups required to recover.
    pub group_threshold: u8,
    /// Total number of groups.
    pub group_count: u8,
    /// Index of this member within its group.
    pub member_index: u8,
    /// Number of members of this group required to recover the group secret.
    pub member_threshold: u8,
    /// Share value.
    pub value: Vec<u8>,
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("identifier", &self.identifier)
            .field("iteration_exponent", &self.iteration_exponent)
            .field("group_index", &self.group_index)
            .field("group_threshold", &self.group_threshold)
            .field("group_count", &self.group_count)
            .field("member_index", &self.member_index)
            .field("member_threshold", &self.member_threshold)
            .field("value", &"***")
            .finish()
    }
}

// ── Encoding ───────────────────────────────────────────────────────

impl Share {
    /// Encode into word indices, checksum included.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::Configuration`] if a field does not fit its
    /// width or the value length is invalid.
    pub fn to_indices(&self) -> Result<Vec<u16>, Slip39Error> {
        self.check_fields()?;

        let mut writer = BitWriter::new();
        writer.write_bits(u64::from(self.identifier), ID_BITS);
        writer.write_bits(u64::from(self.iteration_exponent), ITERATION_EXP_BITS);
        writer.write_bits(u64::from(self.group_index), INDEX_BITS);
        writer.write_bits(u64::from(self.group_threshold.saturating_sub(1)), INDEX_BITS);
        writer.write_bits(u64::from(self.group_count.saturating_sub(1)), INDEX_BITS);
        writer.write_bits(u64::from(self.member_index), INDEX_BITS);
        writer.write_bits(u64::from(self.member_threshold.saturating_sub(1)), INDEX_BITS);

        let value_bits = self.value.len().saturating_mul(8);
        let value_words = value_bits.div_ceil(RADIX_BITS as usize);
        let padding = value_words
            .saturating_mul(RADIX_BITS as usize)
            .saturating_sub(value_bits);
        for _ in 0..padding {
            writer.write_bits(0, 1);
        }
        writer.write_bytes(&self.value);

        let mut indices = writer.into_symbols(RADIX_BITS);
        let checksum = create_checksum(&indices);
        indices.extend_from_slice(&checksum);
        Ok(indices)
    }

    /// Encode into dictionary words.
    ///
    /// # Errors
    ///
    /// See [`Share::to_indices`].
    pub fn to_words(&self) -> Result<Vec<&'static str>, Slip39Error> {
        let wordlist = get_wordlist();
        self.to_indices()?
            .into_iter()
            .map(|i| {
                wordlist.get(usize::from(i)).copied().ok_or_else(|| {
                    Slip39Error::InvalidMnemonic(format!("word index {i} out of range"))
                })
            })
            .collect()
    }

    /// Encode into a space-separated mnemonic.
    ///
    /// # Errors
    ///
    /// See [`Share::to_indices`].
    pub fn to_mnemonic(&self) -> Result<String, Slip39Error> {
        Ok(self.to_words()?.join(" "))
    }

    fn check_fields(&self) -> Result<(), Slip39Error> {
        if u32::from(self.identifier) >> ID_BITS != 0 {
            return Err(Slip39Error::Configuration(format!(
                "identifier {} does not fit in {ID_BITS} bits",
                self.identifier
            )));
        }
        if u32::from(self.iteration_exponent) >> ITERATION_EXP_BITS != 0 {
            return Err(Slip39Error::Configuration(format!(
                "iteration exponent {} does not fit in {ITERATION_EXP_BITS} bits",
                self.iteration_exponent
            )));
        }
        for (name, count) in [
            ("group threshold", self.group_threshold),
            ("group count", self.group_count),
            ("member threshold", self.member_threshold),
        ] {
            if !(1..=MAX_FIELD_COUNT).contains(&count) {
                return Err(Slip39Error::Configuration(format!(
                    "{name} must be between 1 and {MAX_FIELD_COUNT}, got {count}"
                )));
            }
        }
        for (name, index) in [
            ("group index", self.group_index),
            ("member index", self.member_index),
        ] {
            if index >= MAX_FIELD_COUNT {
                return Err(Slip39Error::Configuration(format!(
                    "{name} must be below {MAX_FIELD_COUNT}, got {index}"
                )));
            }
        }
        if self.value.len() < MIN_SECRET_LEN || self.value.len() % 2 != 0 {
            return Err(Slip39Error::Configuration(format!(
                "share value must be an even number of bytes, at least {MIN_SECRET_LEN}, got {}",
                self.value.len()
            )));
        }
        Ok(())
    }
}

// ── Decoding ───────────────────────────────────────────────────────

impl Share {
    /// Decode a whitespace-separated mnemonic.
    ///
    /// # Errors
    ///
    /// See [`Share::from_words`].
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, Slip39Error> {
        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        Self::from_words(&words)
    }

    /// Decode a mnemonic given as individual words.
    ///
    /// Words are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::InvalidMnemonic`] if a word is unknown, the
    /// mnemonic is too short, the padding or value length is invalid, the
    /// checksum fails, or the group fields are inconsistent.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self, Slip39Error> {
        let mut indices = Vec::with_capacity(words.len());
        for (pos, word) in words.iter().enumerate() {
            let index = word_index(word.as_ref()).ok_or_else(|| {
                Slip39Error::InvalidMnemonic(format!(
                    "unknown word at position {}",
                    pos.saturating_add(1)
                ))
            })?;
            indices.push(index);
        }
        Self::from_indices(&indices)
    }

    /// Decode from word indices, checksum included.
    ///
    /// # Errors
    ///
    /// See [`Share::from_words`].
    pub fn from_indices(indices: &[u16]) -> Result<Self, Slip39Error> {
        if indices.len() < MIN_MNEMONIC_WORDS {
            return Err(Slip39Error::InvalidMnemonic(format!(
                "mnemonic must be at least {MIN_MNEMONIC_WORDS} words, got {}",
                indices.len()
            )));
        }
        if indices.iter().any(|&i| u32::from(i) >> RADIX_BITS != 0) {
            return Err(Slip39Error::InvalidMnemonic(
                "word index out of range".to_string(),
            ));
        }

        // Both bounds hold: len >= MIN_MNEMONIC_WORDS.
        let value_words = indices
            .len()
            .saturating_sub(METADATA_WORDS)
            .saturating_sub(CHECKSUM_WORDS);
        let value_area_bits = value_words.saturating_mul(RADIX_BITS as usize);
        #[allow(clippy::arithmetic_side_effects)]
        let padding = value_area_bits % 16;
        if padding > MAX_PADDING_BITS {
            return Err(Slip39Error::InvalidMnemonic(
                "invalid mnemonic length".to_string(),
            ));
        }
        #[allow(clippy::arithmetic_side_effects)]
        let value_len = (value_area_bits - padding) / 8;
        if value_len < MIN_SECRET_LEN || value_len % 2 != 0 {
            return Err(Slip39Error::InvalidMnemonic(format!(
                "invalid master secret length ({value_len} bytes)"
            )));
        }

        if !verify_checksum(indices) {
            return Err(Slip39Error::InvalidMnemonic(
                "invalid mnemonic checksum".to_string(),
            ));
        }

        let data = &indices[..indices.len().saturating_sub(CHECKSUM_WORDS)];
        let mut reader = BitReader::from_symbols(data, RADIX_BITS);
        let identifier = reader.read_bits(ID_BITS)?;
        let iteration_exponent = reader.read_bits(ITERATION_EXP_BITS)?;
        let group_index = reader.read_bits(INDEX_BITS)?;
        let group_threshold = reader.read_bits(INDEX_BITS)?.saturating_add(1);
        let group_count = reader.read_bits(INDEX_BITS)?.saturating_add(1);
        let member_index = reader.read_bits(INDEX_BITS)?;
        let member_threshold = reader.read_bits(INDEX_BITS)?.saturating_add(1);

        let padding_bits = u32::try_from(padding).unwrap_or(u32::MAX);
        if reader.read_bits(padding_bits)? != 0 {
            return Err(Slip39Error::InvalidMnemonic(
                "invalid mnemonic padding".to_string(),
            ));
        }
        let value = reader.read_bytes(value_len)?;

        if group_threshold > group_count {
            return Err(Slip39Error::InvalidMnemonic(format!(
                "group threshold ({group_threshold}) cannot exceed group count ({group_count})"
            )));
        }
        if group_index >= group_count {
            return Err(Slip39Error::InvalidMnemonic(format!(
                "group index ({group_index}) must be below group count ({group_count})"
            )));
        }

        Ok(Self {
            identifier: u16::try_from(identifier).unwrap_or_default(),
            iteration_exponent: narrow(iteration_exponent),
            group_index: narrow(group_index),
            group_threshold: narrow(group_threshold),
            group_count: narrow(group_count),
            member_index: narrow(member_index),
            member_threshold: narrow(member_threshold),
            value,
        })
    }
}

/// Fields read here are at most 5 bits wide (plus one), so they fit `u8`.
fn narrow(v: u64) -> u8 {
    u8::try_from(v).unwrap_or(u8::MAX)
}

/// `true` if `mnemonic` decodes to a well-formed share.
#[must_use]
pub fn validate_mnemonic(mnemonic: &str) -> bool {
    Share::from_mnemonic(mnemonic).is_ok()
}

// ── Unit tests ─────────────────────────────────────────────────────
