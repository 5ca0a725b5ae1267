//! Feistel cipher Known Answer Tests.
//!
//! Expected outputs computed with an independent PBKDF2-HMAC-SHA256
//! implementation of the same round function.

use slip39_core::cipher::{decrypt, encrypt};

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("valid hex"))
        .collect()
}

#[test]
fn encrypt_128_bit_with_passphrase() {
    let ems = encrypt(b"ABCDEFGHIJKLMNOP", b"TREZOR", 0, 7945).expect("should encrypt");
    assert_eq!(ems.as_slice(), hex_to_bytes("69e0a5129bcb1f0ee36db2e1e2d11952").as_slice());
}

#[test]
fn encrypt_128_bit_empty_passphrase() {
    let ems = encrypt(b"ABCDEFGHIJKLMNOP", b"", 0, 7945).expect("should encrypt");
    assert_eq!(ems.as_slice(), hex_to_bytes("048425312591a25a7098a75989f92aaa").as_slice());
}

#[test]
fn encrypt_256_bit_exponent_1_max_identifier() {
    let secret: Vec<u8> = (0u8..32).collect();
    let ems = encrypt(&secret, b"TREZOR", 1, 0x7FFF).expect("should encrypt");
    assert_eq!(
        ems.as_slice(),
        hex_to_bytes("5e939dbd6711213e3472ad76c8a918a7499ea79dc6ba8cff88ff6cdffde61d16").as_slice()
    );
    let back = decrypt(&ems, b"TREZOR", 1, 0x7FFF).expect("should decrypt");
    assert_eq!(back.as_slice(), secret.as_slice());
}

#[test]
fn published_vector_ems_decrypts() {
    // Share value of the single-share 128-bit vector is its EMS.
    let ems = hex_to_bytes("11bc609d21747c49ba78c0701293e417");
    let ms = decrypt(&ems, b"TREZOR", 0, 7945).expect("should decrypt");
    assert_eq!(ms.as_slice(), hex_to_bytes("bb54aac4b89dc868ba37d9cc21b2cece").as_slice());
}
