//! Two-level share tree: master secret → groups → member mnemonics.
//!
//! This module provides:
//! - [`SplitOptions`] / [`GroupSpec`]: the sharing policy, loadable from JSON
//! - [`ShareTree::split`]: encrypt a master secret and split it into groups
//!   of member shares, each encoded as a mnemonic
//! - path access (`"r"`, `"r/<group>"`, `"r/<group>/<member>"`) via
//!   [`ShareTree::mnemonics_at`]
//!
//! # Split
//!
//! ```text
//! master secret ──encrypt──▶ EMS ──split(group_threshold, groups)──▶ group values
//! group value ──split(member_threshold, member_count)──▶ member shares ──▶ mnemonics
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::cipher::{self, MAX_ITERATION_EXPONENT};
use crate::error::Slip39Error;
use crate::mnemonic::{Share, ID_BITS};
use crate::secret::MasterSecret;
use crate::shamir::{self, random_bytes, MAX_SHARE_COUNT};

/// Maximum depth of a path below the root.
const MAX_PATH_DEPTH: usize = 2;

/// Maximum digits in one path component.
const MAX_PATH_COMPONENT_DIGITS: usize = 2;

// ── Options ────────────────────────────────────────────────────────

/// Member-level policy for one group: `member_threshold` of `member_count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    /// Members required to reconstruct the group's share.
    pub member_threshold: u8,
    /// Members in the group.
    pub member_count: u8,
}

impl GroupSpec {
    /// `member_threshold`-of-`member_count`.
    #[must_use]
    pub const fn new(member_threshold: u8, member_count: u8) -> Self {
        Self {
            member_threshold,
            member_count,
        }
    }
}

impl Default for GroupSpec {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Sharing policy for [`ShareTree::split`].
///
/// The default is a single 1-of-1 group, no passphrase and exponent 0.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitOptions {
    /// Passphrase used to encrypt the master secret (printable ASCII).
    pub passphrase: String,
    /// Groups required to recover.
    pub group_threshold: u8,
    /// One entry per group.
    pub groups: Vec<GroupSpec>,
    /// PBKDF2 cost: `10000 << iteration_exponent` iterations in total.
    pub iteration_exponent: u8,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            passphrase: String::new(),
            group_threshold: 1,
            groups: vec![GroupSpec::default()],
            iteration_exponent: 0,
        }
    }
}

impl fmt::Debug for SplitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitOptions")
            .field("passphrase", &"***")
            .field("group_threshold", &self.group_threshold)
            .field("groups", &self.groups)
            .field("iteration_exponent", &self.iteration_exponent)
            .finish()
    }
}

impl SplitOptions {
    /// Parse a policy from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::Configuration`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, Slip39Error> {
        serde_json::from_str(json)
            .map_err(|e| Slip39Error::Configuration(format!("invalid split options: {e}")))
    }

    /// Check every constraint [`ShareTree::split`] enforces on the policy.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::Configuration`] naming the first violation.
    pub fn validate(&self) -> Result<(), Slip39Error> {
        cipher::validate_passphrase(&self.passphrase)?;

        if self.iteration_exponent > MAX_ITERATION_EXPONENT {
            return Err(Slip39Error::Configuration(format!(
                "iteration exponent ({}) must not exceed {MAX_ITERATION_EXPONENT}",
                self.iteration_exponent
            )));
        }

        let group_count = self.groups.len();
        if group_count == 0 {
            return Err(Slip39Error::Configuration(
                "at least one group is required".to_string(),
            ));
        }
        if group_count > usize::from(MAX_SHARE_COUNT) {
            return Err(Slip39Error::Configuration(format!(
                "number of groups ({group_count}) must not exceed {MAX_SHARE_COUNT}"
            )));
        }
        if self.group_threshold == 0 {
            return Err(Slip39Error::Configuration(
                "group threshold must be a positive integer".to_string(),
            ));
        }
        if usize::from(self.group_threshold) > group_count {
            return Err(Slip39Error::Configuration(format!(
                "the requested group threshold ({}) must not exceed the number of groups ({group_count})",
                self.group_threshold
            )));
        }

        for (i, group) in self.groups.iter().enumerate() {
            validate_group(i, group)?;
        }
        Ok(())
    }
}

fn validate_group(position: usize, group: &GroupSpec) -> Result<(), Slip39Error> {
    let GroupSpec {
        member_threshold,
        member_count,
    } = *group;
    if member_threshold == 0 {
        return Err(Slip39Error::Configuration(format!(
            "group {position}: member threshold must be a positive integer"
        )));
    }
    if member_threshold > member_count {
        return Err(Slip39Error::Configuration(format!(
            "group {position}: member threshold ({member_threshold}) must not exceed the number of members ({member_count})"
        )));
    }
    if member_count > MAX_SHARE_COUNT {
        return Err(Slip39Error::Configuration(format!(
            "group {position}: number of members ({member_count}) must not exceed {MAX_SHARE_COUNT}"
        )));
    }
    if member_threshold == 1 && member_count > 1 {
        return Err(Slip39Error::Configuration(format!(
            "group {position}: creating multiple member shares with member threshold 1 is not allowed, \
             use 1-of-1 member sharing instead"
        )));
    }
    Ok(())
}

// ── Tree ───────────────────────────────────────────────────────────

/// A leaf: one member share and its mnemonic.
#[derive(Clone)]
pub struct MemberShare {
    share: Share,
    mnemonic: Zeroizing<String>,
}

impl MemberShare {
    /// The decoded share.
    #[must_use]
    pub const fn share(&self) -> &Share {
        &self.share
    }

    /// Index within the group.
    #[must_use]
    pub const fn member_index(&self) -> u8 {
        self.share.member_index
    }

    /// The space-separated mnemonic.
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }
}

impl fmt::Debug for MemberShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberShare")
            .field("member_index", &self.share.member_index)
            .field("mnemonic", &"***")
            .finish()
    }
}

/// One group of member shares.
#[derive(Debug, Clone)]
pub struct GroupNode {
    group_index: u8,
    member_threshold: u8,
    members: Vec<MemberShare>,
}

impl GroupNode {
    /// Index of the group (x-coordinate at the group level).
    #[must_use]
    pub const fn group_index(&self) -> u8 {
        self.group_index
    }

    /// Members required to reconstruct this group's share.
    #[must_use]
    pub const fn member_threshold(&self) -> u8 {
        self.member_threshold
    }

    /// All member shares, ordered by member index.
    #[must_use]
    pub fn members(&self) -> &[MemberShare] {
        &self.members
    }

    /// Member `index`, if present.
    #[must_use]
    pub fn member(&self, index: usize) -> Option<&MemberShare> {
        self.members.get(index)
    }

    /// Mnemonics of every member, in order.
    #[must_use]
    pub fn mnemonics(&self) -> Vec<&str> {
        self.members.iter().map(MemberShare::mnemonic).collect()
    }
}

/// Result of splitting a master secret: root → groups → members.
#[derive(Debug, Clone)]
pub struct ShareTree {
    identifier: u16,
    iteration_exponent: u8,
    group_threshold: u8,
    groups: Vec<GroupNode>,
}

impl ShareTree {
    /// Split `master_secret` with the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// See [`ShareTree::split_with_rng`].
    pub fn split(master_secret: &[u8], options: &SplitOptions) -> Result<Self, Slip39Error> {
        Self::split_with_rng(master_secret, options, &mut OsRng)
    }

    /// Split `master_secret` according to `options`, drawing randomness from `rng`.
    ///
    /// # Errors
    ///
    /// - [`Slip39Error::Configuration`] if the secret or the options are invalid.
    /// - [`Slip39Error::Random`] if `rng` fails.
    pub fn split_with_rng<R: RngCore + CryptoRng>(
        master_secret: &[u8],
        options: &SplitOptions,
        rng: &mut R,
    ) -> Result<Self, Slip39Error> {
        let secret = MasterSecret::new(master_secret)?;
        options.validate()?;

        let group_count = u8::try_from(options.groups.len())
            .map_err(|_| Slip39Error::Configuration("too many groups".to_string()))?;
        let identifier = random_identifier(rng)?;

        tracing::debug!(
            identifier,
            group_threshold = options.group_threshold,
            group_count,
            iteration_exponent = options.iteration_exponent,
            "splitting master secret"
        );

        let ems = cipher::encrypt(
            secret.expose(),
            options.passphrase.as_bytes(),
            options.iteration_exponent,
            identifier,
        )?;

        let group_shares =
            shamir::split_secret(options.group_threshold, group_count, &ems, rng)?;

        let mut groups = Vec::with_capacity(group_shares.len());
        for (spec, group_share) in options.groups.iter().zip(group_shares.iter()) {
            let member_shares = shamir::split_secret(
                spec.member_threshold,
                spec.member_count,
                &group_share.value,
                rng,
            )?;

            let mut members = Vec::with_capacity(member_shares.len());
            for member_share in &member_shares {
                let share = Share {
                    identifier,
                    iteration_exponent: options.iteration_exponent,
                    group_index: group_share.index,
                    group_threshold: options.group_threshold,
                    group_count,
                    member_index: member_share.index,
                    member_threshold: spec.member_threshold,
                    value: member_share.value.clone(),
                };
                let mnemonic = Zeroizing::new(share.to_mnemonic()?);
                members.push(MemberShare { share, mnemonic });
            }

            tracing::trace!(
                group_index = group_share.index,
                member_threshold = spec.member_threshold,
                member_count = spec.member_count,
                "group split"
            );
            groups.push(GroupNode {
                group_index: group_share.index,
                member_threshold: spec.member_threshold,
                members,
            });
        }

        Ok(Self {
            identifier,
            iteration_exponent: options.iteration_exponent,
            group_threshold: options.group_threshold,
            groups,
        })
    }

    /// Random identifier shared by every share of this split.
    #[must_use]
    pub const fn identifier(&self) -> u16 {
        self.identifier
    }

    /// PBKDF2 iteration exponent.
    #[must_use]
    pub const fn iteration_exponent(&self) -> u8 {
        self.iteration_exponent
    }

    /// Groups required to recover.
    #[must_use]
    pub const fn group_threshold(&self) -> u8 {
        self.group_threshold
    }

    /// Total number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// All groups, ordered by group index.
    #[must_use]
    pub fn groups(&self) -> &[GroupNode] {
        &self.groups
    }

    /// Group `index`, if present.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&GroupNode> {
        self.groups.get(index)
    }

    /// Every mnemonic in the tree, group by group.
    #[must_use]
    pub fn mnemonics(&self) -> Vec<&str> {
        self.groups.iter().flat_map(GroupNode::mnemonics).collect()
    }

    /// Mnemonics below `path`.
    ///
    /// `"r"` is the whole tree, `"r/2"` group 2, `"r/2/1"` member 1 of group 2.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::InvalidMnemonic`] if the path is malformed or an
    /// index is out of range.
    pub fn mnemonics_at(&self, path: &str) -> Result<Vec<&str>, Slip39Error> {
        match parse_path(path)?.as_slice() {
            [] => Ok(self.mnemonics()),
            [g] => Ok(self.group_at(*g)?.mnemonics()),
            [g, m] => {
                let group = self.group_at(*g)?;
                let member = group.member(*m).ok_or_else(|| {
                    Slip39Error::InvalidMnemonic(format!(
                        "path index ({m}) exceeds the last member index ({})",
                        group.members.len().saturating_sub(1)
                    ))
                })?;
                Ok(vec![member.mnemonic()])
            }
            _ => Err(Slip39Error::InvalidMnemonic(format!(
                "path depth exceeds {MAX_PATH_DEPTH}"
            ))),
        }
    }

    fn group_at(&self, index: usize) -> Result<&GroupNode, Slip39Error> {
        self.group(index).ok_or_else(|| {
            Slip39Error::InvalidMnemonic(format!(
                "path index ({index}) exceeds the last group index ({})",
                self.groups.len().saturating_sub(1)
            ))
        })
    }
}

/// Parse `r(/\d{1,2}){0,2}` into its numeric components.
fn parse_path(path: &str) -> Result<Vec<usize>, Slip39Error> {
    let invalid = || {
        Slip39Error::InvalidMnemonic(format!("expected a path like \"r/0/0\", got {path:?}"))
    };

    let mut parts = path.split('/');
    if parts.next() != Some("r") {
        return Err(invalid());
    }
    let mut indices = Vec::with_capacity(MAX_PATH_DEPTH);
    for part in parts {
        if part.is_empty()
            || part.len() > MAX_PATH_COMPONENT_DIGITS
            || !part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        indices.push(part.parse::<usize>().map_err(|_| invalid())?);
    }
    if indices.len() > MAX_PATH_DEPTH {
        return Err(Slip39Error::InvalidMnemonic(format!(
            "path {path:?} exceeds the maximum depth ({MAX_PATH_DEPTH})"
        )));
    }
    Ok(indices)
}

fn random_identifier<R: RngCore + CryptoRng>(rng: &mut R) -> Result<u16, Slip39Error> {
    let bytes = random_bytes(rng, 2)?;
    let raw = u16::from_be_bytes([bytes[0], bytes[1]]);
    Ok(raw >> (u16::BITS - ID_BITS))
}

// ── Unit tests ─────────────────────────────────────────────────────
