//! Larger sharing scenarios.

use slip39_core::{recover_secret, GroupSpec, ShareTree, Slip39Error, SplitOptions};

/// Alice keeps two 1-of-1 groups for herself, gives a 3-of-5 group to her
/// friends and a 2-of-6 group to her family. Any two groups recover.
fn alice_tree() -> ShareTree {
    let options = SplitOptions {
        passphrase: "TREZOR".to_string(),
        group_threshold: 2,
        groups: vec![
            GroupSpec::new(1, 1),
            GroupSpec::new(1, 1),
            GroupSpec::new(3, 5),
            GroupSpec::new(2, 6),
        ],
        iteration_exponent: 0,
    };
    ShareTree::split(b"ABCDEFGHIJKLMNOP", &options).expect("split should succeed")
}

#[test]
fn alice_alone_recovers_with_both_personal_shares() {
    let tree = alice_tree();
    let alice_first = tree.mnemonics_at("r/0/0").expect("path");
    let alice_second = tree.mnemonics_at("r/1/0").expect("path");
    let mnemonics = [alice_first[0], alice_second[0]];
    let ms = recover_secret(&mnemonics, "TREZOR").expect("recover");
    assert_eq!(ms.expose(), b"ABCDEFGHIJKLMNOP");
}

#[test]
fn alice_with_three_friends() {
    let tree = alice_tree();
    let alice = tree.mnemonics_at("r/0/0").expect("path")[0];
    let friends = tree.mnemonics_at("r/2").expect("path");
    let mnemonics = [alice, friends[0], friends[2], friends[4]];
    let ms = recover_secret(&mnemonics, "TREZOR").expect("recover");
    assert_eq!(ms.expose(), b"ABCDEFGHIJKLMNOP");
}

#[test]
fn alice_with_two_family_members() {
    let tree = alice_tree();
    let alice = tree.mnemonics_at("r/1/0").expect("path")[0];
    let family = tree.mnemonics_at("r/3").expect("path");
    let mnemonics = [family[5], alice, family[1]];
    let ms = recover_secret(&mnemonics, "TREZOR").expect("recover");
    assert_eq!(ms.expose(), b"ABCDEFGHIJKLMNOP");
}

#[test]
fn friends_and_family_without_alice() {
    let tree = alice_tree();
    let friends = tree.mnemonics_at("r/2").expect("path");
    let family = tree.mnemonics_at("r/3").expect("path");
    let mnemonics = [friends[1], friends[3], friends[4], family[0], family[3]];
    let ms = recover_secret(&mnemonics, "TREZOR").expect("recover");
    assert_eq!(ms.expose(), b"ABCDEFGHIJKLMNOP");
}

#[test]
fn alice_with_only_two_friends_fails() {
    let tree = alice_tree();
    let alice = tree.mnemonics_at("r/0/0").expect("path")[0];
    let friends = tree.mnemonics_at("r/2").expect("path");
    let err = recover_secret(&[alice, friends[0], friends[1]], "TREZOR").expect_err("should fail");
    assert!(matches!(err, Slip39Error::InsufficientShares(_)), "{err}");
}

#[test]
fn whole_family_is_one_group_only() {
    let tree = alice_tree();
    let family = tree.mnemonics_at("r/3").expect("path");
    let err = recover_secret(&family, "TREZOR").expect_err("should fail");
    assert!(matches!(err, Slip39Error::InsufficientShares(_)), "{err}");
}

fn sixteen_of_sixteen() -> ShareTree {
    let secret = [
        0xd2, 0xb5, 0xe4, 0x5b, 0x29, 0x34, 0x28, 0x1a, 0x11, 0x8e, 0xce, 0x2a, 0xe4, 0x98, 0x51,
        0x4d,
    ];
    let options = SplitOptions {
        passphrase: "TREZOR".to_string(),
        group_threshold: 16,
        groups: vec![GroupSpec::new(1, 1); 16],
        iteration_exponent: 0,
    };
    ShareTree::split(&secret, &options).expect("split should succeed")
}

#[test]
fn sixteen_of_sixteen_groups_recover() {
    let tree = sixteen_of_sixteen();
    let mnemonics: Vec<&str> = (0..16)
        .map(|g| tree.mnemonics_at(&format!("r/{g}")).expect("path")[0])
        .collect();
    let ms = recover_secret(&mnemonics, "TREZOR").expect("recover");
    assert_eq!(
        ms.expose(),
        &[
            0xd2, 0xb5, 0xe4, 0x5b, 0x29, 0x34, 0x28, 0x1a, 0x11, 0x8e, 0xce, 0x2a, 0xe4, 0x98,
            0x51, 0x4d
        ]
    );
}

#[test]
fn fifteen_of_sixteen_groups_fail() {
    let tree = sixteen_of_sixteen();
    let mnemonics = tree.mnemonics();
    for skipped in [0usize, 7, 15] {
        let subset: Vec<&str> = mnemonics
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != skipped)
            .map(|(_, m)| *m)
            .collect();
        let err = recover_secret(&subset, "TREZOR").expect_err("15 groups must not recover");
        assert!(matches!(err, Slip39Error::InsufficientShares(_)), "{err}");
    }
}

#[test]
fn sixteen_members_in_one_group() {
    let options = SplitOptions {
        groups: vec![GroupSpec::new(16, 16)],
        ..SplitOptions::default()
    };
    let tree = ShareTree::split(b"ABCDEFGHIJKLMNOP", &options).expect("split");
    let mnemonics = tree.mnemonics();
    assert_eq!(mnemonics.len(), 16);
    assert_eq!(recover_secret(&mnemonics, "").expect("recover").expose(), b"ABCDEFGHIJKLMNOP");
    assert!(matches!(
        recover_secret(&mnemonics[1..], ""),
        Err(Slip39Error::InsufficientShares(_))
    ));
}
