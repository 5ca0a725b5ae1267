//! GF(2^8) arithmetic for Shamir interpolation.
//!
//! The field is generated by the Rijndael polynomial
//! `x^8 + x^4 + x^3 + x + 1` (`0x11B`) with generator `3`. Log and antilog
//! tables are computed at compile time, so there is no runtime cache and no
//! shared mutable state.

/// Reduction polynomial `x^8 + x^4 + x^3 + x + 1`.
const PRIMITIVE_POLY: u16 = 0x11B;

/// Multiplicative group order of GF(256).
pub const ORDER: usize = 255;

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
const fn build_tables() -> ([u8; ORDER], [u8; 256]) {
    let mut exp = [0u8; ORDER];
    let mut log = [0u8; 256];
    let mut poly: u16 = 1;
    let mut i = 0;
    while i < ORDER {
        exp[i] = poly as u8;
        log[poly as usize] = i as u8;
        // Multiply by the generator (x + 1) and reduce.
        poly = (poly << 1) ^ poly;
        if poly & 0x100 != 0 {
            poly ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; ORDER], [u8; 256]) = build_tables();

/// `EXP[i] = 3^i`.
const EXP: [u8; ORDER] = TABLES.0;

/// `LOG[3^i] = i`. `LOG[0]` is meaningless and never read for a zero operand.
const LOG: [u8; 256] = TABLES.1;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Field addition (and subtraction): bitwise XOR.
#[must_use]
pub const fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication through the log/antilog tables.
#[must_use]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let sum = usize::from(LOG[usize::from(a)]).saturating_add(usize::from(LOG[usize::from(b)]));
    exp(sum)
}

/// Multiplicative inverse.
///
/// `a` must be non-zero; inverting zero is a caller bug.
#[must_use]
pub fn inv(a: u8) -> u8 {
    debug_assert!(a != 0, "zero has no multiplicative inverse in GF(256)");
    exp(ORDER.saturating_sub(usize::from(log(a))))
}

/// Discrete logarithm base 3. `a` must be non-zero.
#[must_use]
pub fn log(a: u8) -> u8 {
    debug_assert!(a != 0, "log(0) is undefined");
    LOG[usize::from(a)]
}

/// `3^i`, with `i` reduced modulo the group order.
#[must_use]
pub fn exp(i: usize) -> u8 {
    #[allow(clippy::arithmetic_side_effects)]
    let reduced = i % ORDER;
    EXP[reduced]
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
