//! `slip39-core`: Shamir backup shares for master secrets (SLIP-0039).
//!
//! A master secret is encrypted under a passphrase, split into groups with
//! a group threshold, each group split again into members with a member
//! threshold, and every leaf share encoded as a checksummed mnemonic.
//!
//! Pure computation: no I/O, no global mutable state. Randomness is injected
//! (`*_with_rng`) or drawn from the OS CSPRNG.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod secret;

pub mod digest;
pub mod field;
pub mod shamir;

pub mod cipher;

pub mod bits;
pub mod checksum;
pub mod mnemonic;
pub mod wordlist;

pub mod recovery;
pub mod tree;

pub use cipher::{decrypt, encrypt, validate_passphrase, MAX_ITERATION_EXPONENT};
pub use digest::{HmacSha256Digest, ShareDigest};
pub use error::Slip39Error;
pub use mnemonic::{validate_mnemonic, Share, MIN_MNEMONIC_WORDS};
pub use recovery::{recover_from_shares, recover_secret};
pub use secret::{MasterSecret, MIN_SECRET_LEN};
pub use shamir::{RawShare, MAX_SHARE_COUNT};
pub use tree::{GroupNode, GroupSpec, MemberShare, ShareTree, SplitOptions};
pub use wordlist::{get_wordlist, suggest_words, validate_word, word_index, WORDLIST_SIZE};
