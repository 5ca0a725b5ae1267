//! Split → mnemonics → recover lifecycles.

use rand::rngs::StdRng;
use rand::SeedableRng;
use slip39_core::{
    recover_secret, GroupSpec, MasterSecret, ShareTree, Slip39Error, SplitOptions,
};

const MS: &[u8; 16] = b"ABCDEFGHIJKLMNOP";
const PASSPHRASE: &str = "TREZOR";

fn one_group(member_threshold: u8, member_count: u8, passphrase: &str) -> SplitOptions {
    SplitOptions {
        passphrase: passphrase.to_string(),
        group_threshold: 1,
        groups: vec![GroupSpec::new(member_threshold, member_count)],
        iteration_exponent: 0,
    }
}

/// All k-element subsets of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn helper(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            helper(i + 1, n, k, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    helper(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}

#[test]
fn every_5_of_7_combination_recovers() {
    let tree = ShareTree::split_with_rng(
        MS,
        &one_group(5, 7, PASSPHRASE),
        &mut StdRng::seed_from_u64(57),
    )
    .expect("split should succeed");
    let mnemonics = tree.mnemonics_at("r/0").expect("group 0 exists");
    assert_eq!(mnemonics.len(), 7);

    let subsets = combinations(7, 5);
    assert_eq!(subsets.len(), 21);
    for subset in subsets {
        // Reverse to show order independence.
        let chosen: Vec<&str> = subset.iter().rev().map(|&i| mnemonics[i]).collect();
        let ms = recover_secret(&chosen, PASSPHRASE).expect("threshold subset should recover");
        assert_eq!(ms.expose(), MS, "subset {subset:?}");
    }
}

#[test]
fn below_threshold_is_insufficient() {
    let tree = ShareTree::split_with_rng(
        MS,
        &one_group(5, 7, PASSPHRASE),
        &mut StdRng::seed_from_u64(58),
    )
    .expect("split should succeed");
    let mnemonics = tree.mnemonics();
    for k in 1..5 {
        let err = recover_secret(&mnemonics[..k], PASSPHRASE).expect_err("should fail");
        assert!(matches!(err, Slip39Error::InsufficientShares(_)), "{k} shares: {err}");
    }
}

#[test]
fn passphrase_sensitivity() {
    let with_pw = ShareTree::split(MS, &one_group(5, 7, PASSPHRASE)).expect("split");
    let without_pw = ShareTree::split(MS, &one_group(5, 7, "")).expect("split");

    let good = recover_secret(&with_pw.mnemonics()[..5], PASSPHRASE).expect("recover");
    assert_eq!(good.expose(), MS);

    let wrong = recover_secret(&with_pw.mnemonics()[..5], "").expect("recover");
    assert_ne!(wrong.expose(), MS);

    let none = recover_secret(&without_pw.mnemonics()[..5], "").expect("recover");
    assert_eq!(none.expose(), MS);
}

#[test]
fn iteration_exponents_round_trip() {
    for exponent in [1u8, 2] {
        let options = SplitOptions {
            iteration_exponent: exponent,
            ..SplitOptions::default()
        };
        let tree = ShareTree::split(MS, &options).expect("split");
        assert_eq!(tree.iteration_exponent(), exponent);
        let ms = recover_secret(&tree.mnemonics_at("r/0").expect("path"), "").expect("recover");
        assert_eq!(ms.expose(), MS);
    }
}

#[test]
fn two_level_minimal_set_recovers() {
    let options = SplitOptions {
        passphrase: String::new(),
        group_threshold: 2,
        groups: vec![
            GroupSpec::new(3, 5),
            GroupSpec::new(3, 3),
            GroupSpec::new(2, 5),
            GroupSpec::new(1, 1),
        ],
        iteration_exponent: 0,
    };
    let tree = ShareTree::split(MS, &options).expect("split");
    let group2 = tree.mnemonics_at("r/2").expect("path");
    let group3 = tree.mnemonics_at("r/3").expect("path");

    let mnemonics = vec![group2[0], group2[2], group3[0]];
    let ms = recover_secret(&mnemonics, "").expect("recover");
    assert_eq!(ms.expose(), MS);
}

#[test]
fn one_complete_and_one_partial_group_is_insufficient() {
    let options = SplitOptions {
        group_threshold: 2,
        groups: vec![GroupSpec::new(2, 3), GroupSpec::new(2, 3)],
        ..SplitOptions::default()
    };
    let tree = ShareTree::split(MS, &options).expect("split");
    let g0 = tree.mnemonics_at("r/0").expect("path");
    let g1 = tree.mnemonics_at("r/1").expect("path");

    let err = recover_secret(&[g0[0], g0[1], g1[2]], "").expect_err("should fail");
    assert!(matches!(err, Slip39Error::InsufficientShares(_)), "{err}");

    let ms = recover_secret(&[g0[0], g0[1], g1[2], g1[0]], "").expect("recover");
    assert_eq!(ms.expose(), MS);
}

#[test]
fn group_threshold_one_needs_a_single_group() {
    let options = SplitOptions {
        group_threshold: 1,
        groups: vec![GroupSpec::new(2, 3), GroupSpec::new(3, 5)],
        ..SplitOptions::default()
    };
    let tree = ShareTree::split(MS, &options).expect("split");
    let g1 = tree.mnemonics_at("r/1").expect("path");
    let ms = recover_secret(&g1[2..5], "").expect("recover");
    assert_eq!(ms.expose(), MS);
}

#[test]
fn threshold_one_shares_are_trivial() {
    // With 1-of-1 at every level, the single mnemonic carries the EMS verbatim.
    let tree = ShareTree::split(MS, &SplitOptions::default()).expect("split");
    let leaf = &tree.groups()[0].members()[0];
    let ems = slip39_core::encrypt(MS, b"", 0, tree.identifier()).expect("encrypt");
    assert_eq!(leaf.share().value, ems.as_slice());
}

#[test]
fn random_256_bit_secret_round_trips() {
    let mut rng = StdRng::seed_from_u64(256);
    let secret = MasterSecret::generate_with_rng(32, &mut rng).expect("generate");
    let options = SplitOptions {
        passphrase: "correct horse battery staple".to_string(),
        group_threshold: 2,
        groups: vec![GroupSpec::new(2, 3), GroupSpec::new(1, 1), GroupSpec::new(3, 4)],
        iteration_exponent: 0,
    };
    let tree = ShareTree::split_with_rng(secret.expose(), &options, &mut rng).expect("split");
    for m in tree.mnemonics() {
        assert_eq!(m.split(' ').count(), 33);
    }

    let g0 = tree.mnemonics_at("r/0").expect("path");
    let g2 = tree.mnemonics_at("r/2").expect("path");
    let input = [g2[3], g0[1], g2[0], g0[2], g2[1]];
    let ms = recover_secret(&input, &options.passphrase).expect("recover");
    assert_eq!(ms.expose(), secret.expose());
}

#[test]
fn policy_from_json_drives_the_split() {
    let options = SplitOptions::from_json(
        r#"{
            "passphrase": "TREZOR",
            "groupThreshold": 1,
            "groups": [{ "memberThreshold": 2, "memberCount": 4 }]
        }"#,
    )
    .expect("valid policy");
    let tree = ShareTree::split(MS, &options).expect("split");
    assert_eq!(tree.mnemonics().len(), 4);
    let ms = recover_secret(&tree.mnemonics()[1..3], PASSPHRASE).expect("recover");
    assert_eq!(ms.expose(), MS);
}
