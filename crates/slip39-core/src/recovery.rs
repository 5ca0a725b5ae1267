//! Master secret recovery from mnemonics.
//!
//! This module provides:
//! - [`recover_secret`]: decode mnemonics, check them against each other,
//!   combine members into groups and groups into the master secret
//! - [`recover_from_shares`]: the same, starting from decoded [`Share`]s
//!
//! Nothing is combined until every share has been decoded and the common
//! parameters (identifier, iteration exponent, group threshold, group count)
//! agree. Recovery either returns the full secret or an error.

use std::collections::BTreeMap;

use crate::cipher::{self, MAX_ITERATION_EXPONENT};
use crate::error::Slip39Error;
use crate::mnemonic::Share;
use crate::secret::MasterSecret;
use crate::shamir::{self, RawShare};

/// Shares of one group, keyed by member index.
struct GroupShares<'a> {
    member_threshold: u8,
    members: BTreeMap<u8, &'a Share>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recover the master secret from a set of mnemonics.
///
/// The mnemonics may come in any order and may span any subset of groups;
/// extra shares beyond the thresholds are ignored. An empty passphrase is
/// valid.
///
/// # Errors
///
/// - [`Slip39Error::Configuration`] if the passphrase is not printable ASCII.
/// - [`Slip39Error::InvalidMnemonic`] if any mnemonic fails to decode, or
///   its iteration exponent is above [`MAX_ITERATION_EXPONENT`]. The 5-bit
///   field decodes up to 31, but such a share cannot be decrypted.
/// - [`Slip39Error::InsufficientShares`] if no mnemonics are given or too few
///   groups are complete.
/// - [`Slip39Error::Consistency`] if the shares do not belong together.
/// - [`Slip39Error::DigestMismatch`] if a combination fails authentication.
pub fn recover_secret<S: AsRef<str>>(
    mnemonics: &[S],
    passphrase: &str,
) -> Result<MasterSecret, Slip39Error> {
    cipher::validate_passphrase(passphrase)?;

    let shares = mnemonics
        .iter()
        .map(|m| Share::from_mnemonic(m.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    recover_from_shares(&shares, passphrase)
}

/// Recover the master secret from already decoded shares.
///
/// # Errors
///
/// Same as [`recover_secret`]. The only [`Slip39Error::InvalidMnemonic`] left
/// is the iteration exponent check.
pub fn recover_from_shares(
    shares: &[Share],
    passphrase: &str,
) -> Result<MasterSecret, Slip39Error> {
    cipher::validate_passphrase(passphrase)?;

    let Some(first) = shares.first() else {
        return Err(Slip39Error::InsufficientShares(
            "the list of mnemonics is empty".to_string(),
        ));
    };
    check_common_parameters(first, shares)?;
    if first.iteration_exponent > MAX_ITERATION_EXPONENT {
        return Err(Slip39Error::InvalidMnemonic(format!(
            "iteration exponent ({}) exceeds the supported maximum ({MAX_ITERATION_EXPONENT})",
            first.iteration_exponent
        )));
    }

    tracing::debug!(
        identifier = first.identifier,
        share_count = shares.len(),
        group_threshold = first.group_threshold,
        group_count = first.group_count,
        "recovering master secret"
    );

    let groups = group_shares(shares)?;

    let mut complete = Vec::with_capacity(groups.len());
    let mut incomplete = Vec::new();
    for (&group_index, group) in &groups {
        if group.members.len() < usize::from(group.member_threshold) {
            incomplete.push(format!(
                "group {group_index} has {} of {} required shares",
                group.members.len(),
                group.member_threshold
            ));
            continue;
        }
        let value = combine_group(group)?;
        tracing::trace!(group_index, "group share recovered");
        complete.push(RawShare::new(group_index, value));
    }

    if complete.len() < usize::from(first.group_threshold) {
        let mut message = format!(
            "{} of {} required groups are complete",
            complete.len(),
            first.group_threshold
        );
        if !incomplete.is_empty() {
            message.push_str(": ");
            message.push_str(&incomplete.join(", "));
        }
        return Err(Slip39Error::InsufficientShares(message));
    }

    complete.truncate(usize::from(first.group_threshold));
    let ems = shamir::recover_secret(first.group_threshold, &complete)?;
    let master_secret = cipher::decrypt(
        &ems,
        passphrase.as_bytes(),
        first.iteration_exponent,
        first.identifier,
    )?;

    tracing::debug!(identifier = first.identifier, "master secret recovered");
    MasterSecret::new(&master_secret)
}

// ---------------------------------------------------------------------------
// Consistency checks
// ---------------------------------------------------------------------------

fn check_common_parameters(first: &Share, shares: &[Share]) -> Result<(), Slip39Error> {
    for share in shares {
        if share.identifier != first.identifier {
            return Err(Slip39Error::Consistency(
                "all mnemonics must have the same identifier".to_string(),
            ));
        }
        if share.iteration_exponent != first.iteration_exponent {
            return Err(Slip39Error::Consistency(
                "all mnemonics must have the same iteration exponent".to_string(),
            ));
        }
        if share.group_threshold != first.group_threshold {
            return Err(Slip39Error::Consistency(
                "all mnemonics must have the same group threshold".to_string(),
            ));
        }
        if share.group_count != first.group_count {
            return Err(Slip39Error::Consistency(
                "all mnemonics must have the same group count".to_string(),
            ));
        }
        if share.value.len() != first.value.len() {
            return Err(Slip39Error::Consistency(
                "all mnemonics must have the same length".to_string(),
            ));
        }
    }
    Ok(())
}

/// Bucket shares by group index, collapsing exact duplicates.
fn group_shares(shares: &[Share]) -> Result<BTreeMap<u8, GroupShares<'_>>, Slip39Error> {
    let mut groups: BTreeMap<u8, GroupShares<'_>> = BTreeMap::new();
    for share in shares {
        let group = groups.entry(share.group_index).or_insert_with(|| GroupShares {
            member_threshold: share.member_threshold,
            members: BTreeMap::new(),
        });
        if group.member_threshold != share.member_threshold {
            return Err(Slip39Error::Consistency(format!(
                "mnemonics in group {} must have the same member threshold",
                share.group_index
            )));
        }
        match group.members.get(&share.member_index) {
            Some(existing) if existing.value == share.value => {}
            Some(_) => {
                return Err(Slip39Error::Consistency(format!(
                    "group {} contains two different shares with member index {}",
                    share.group_index, share.member_index
                )));
            }
            None => {
                group.members.insert(share.member_index, share);
            }
        }
    }
    Ok(groups)
}

/// Combine the lowest-indexed `member_threshold` members of a complete group.
fn combine_group(group: &GroupShares<'_>) -> Result<Vec<u8>, Slip39Error> {
    let raw: Vec<RawShare> = group
        .members
        .values()
        .take(usize::from(group.member_threshold))
        .map(|s| RawShare::new(s.member_index, s.value.clone()))
        .collect();
    let value = shamir::recover_secret(group.member_threshold, &raw)?;
    Ok(value.to_vec())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
