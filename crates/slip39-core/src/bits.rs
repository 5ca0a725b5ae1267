//! MSB-first bit packing between byte fields and fixed-width symbols.
//!
//! The mnemonic layout mixes 15-, 5- and 4-bit fields with a byte-aligned
//! share value, all laid out on a 10-bit word grid. [`BitWriter`] and
//! [`BitReader`] keep encode and decode symmetric: every field written with
//! `write_bits(v, n)` is read back with `read_bits(n)` in the same order.
//!
//! Both buffers may hold share values and are zeroized on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Slip39Error;

/// Largest field width accepted by a single read or write.
const MAX_FIELD_BITS: u32 = 64;

/// Append-only bit buffer.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct BitWriter {
    buf: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    /// Empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Append the low `width` bits of `value`, most significant first.
    ///
    /// Bits of `value` above `width` are ignored.
    pub fn write_bits(&mut self, value: u64, width: u32) {
        debug_assert!(width <= MAX_FIELD_BITS, "field wider than {MAX_FIELD_BITS} bits");
        for shift in (0..width.min(MAX_FIELD_BITS)).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
    }

    /// Append whole bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_bits(u64::from(b), 8);
        }
    }

    /// Append zero bits until the length is a multiple of `multiple`.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn pad_to_multiple(&mut self, multiple: usize) {
        if multiple == 0 {
            return;
        }
        while self.bit_len % multiple != 0 {
            self.push_bit(false);
        }
    }

    /// Zero-pad to a multiple of `width` and slice into `width`-bit symbols.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn into_symbols(mut self, width: u32) -> Vec<u16> {
        debug_assert!((1..=16).contains(&width), "symbols are at most 16 bits");
        self.pad_to_multiple(width as usize);
        let mut reader = BitReader {
            buf: std::mem::take(&mut self.buf),
            bit_len: self.bit_len,
            pos: 0,
        };
        let mut symbols = Vec::with_capacity(reader.remaining() / width.max(1) as usize);
        while reader.remaining() > 0 {
            // Within bounds: remaining() is a multiple of width.
            if let Ok(v) = reader.read_bits(width) {
                symbols.push(v as u16);
            }
        }
        symbols
    }

    fn push_bit(&mut self, bit: bool) {
        #[allow(clippy::arithmetic_side_effects)]
        let (byte, offset) = (self.bit_len / 8, self.bit_len % 8);
        if byte == self.buf.len() {
            self.buf.push(0);
        }
        if bit {
            self.buf[byte] |= 0x80 >> offset;
        }
        self.bit_len = self.bit_len.saturating_add(1);
    }
}

/// Sequential bit reader, usually built from decoded word indices.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BitReader {
    buf: Vec<u8>,
    bit_len: usize,
    pos: usize,
}

impl BitReader {
    /// Reader over the concatenation of `width`-bit `symbols`.
    #[must_use]
    pub fn from_symbols(symbols: &[u16], width: u32) -> Self {
        let mut writer = BitWriter::new();
        for &s in symbols {
            writer.write_bits(u64::from(s), width);
        }
        Self {
            buf: std::mem::take(&mut writer.buf),
            bit_len: writer.bit_len,
            pos: 0,
        }
    }

    /// Bits left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bit_len.saturating_sub(self.pos)
    }

    /// Read `width` bits as an unsigned integer, most significant first.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::InvalidMnemonic`] if fewer than `width` bits remain.
    pub fn read_bits(&mut self, width: u32) -> Result<u64, Slip39Error> {
        if width > MAX_FIELD_BITS || self.remaining() < width as usize {
            return Err(Slip39Error::InvalidMnemonic(
                "unexpected end of mnemonic data".to_string(),
            ));
        }
        let mut value = 0u64;
        for _ in 0..width {
            #[allow(clippy::arithmetic_side_effects)]
            let bit = (self.buf[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | u64::from(bit);
            self.pos = self.pos.saturating_add(1);
        }
        Ok(value)
    }

    /// Read `count` whole bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Slip39Error::InvalidMnemonic`] if not enough bits remain.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, Slip39Error> {
        if self.remaining() < count.saturating_mul(8) {
            return Err(Slip39Error::InvalidMnemonic(
                "unexpected end of mnemonic data".to_string(),
            ));
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let byte = u8::try_from(self.read_bits(8)?).unwrap_or_default();
            out.push(byte);
        }
        Ok(out)
    }
}
