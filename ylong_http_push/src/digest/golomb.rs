// Copyright (c) 2023 Huawei Device Co., Ltd.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! [Golomb-Rice coding] of sorted integer sets.
//!
//! [Golomb-Rice coding]: https://en.wikipedia.org/wiki/Golomb_coding#Rice_coding
//!
//! # Introduction
//! A sorted set is delta encoded, the first delta being relative to `0`.
//! Every delta `d` is split by the modulus `P = 2^k` into a quotient
//! `q = d >> k` and a remainder `r = d & (P - 1)`:
//!
//! ```text
//! +-------------------+---+------------------+
//! | 1 1 ... 1 (q ones)| 0 | r (k bits, MSB)  |
//! +-------------------+---+------------------+
//! ```
//!
//! All codes are concatenated and the last byte is filled with `0b0`. The
//! shortest possible code is `k + 1` bits, so a decoder stops as soon as fewer
//! bits than that remain. Padding long enough to hold a code only ever decodes
//! as a zero delta, which collapses into the previous value.

use core::cmp::Ordering;

use thiserror::Error;

/// Default upper bound of a single unary run accepted by [`GolombDecoder`].
///
/// [`GolombDecoder`]: GolombDecoder
pub const DEFAULT_MAX_UNARY_RUN: u64 = 1 << 12;

/// Possible errors in Golomb-Rice decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GolombDecodeError {
    /// The stream ends in the middle of a unary run or a remainder field.
    #[error("golomb-rice stream ends inside a code")]
    Truncated,

    /// A unary run is longer than the decoder accepts.
    #[error("unary run exceeds the limit of {limit}")]
    UnaryRunTooLong {
        /// The configured limit.
        limit: u64,
    },

    /// A decoded value does not fit into the configured domain.
    #[error("decoded value {value} is outside the domain of {domain}")]
    OutOfRange {
        /// The decoded value.
        value: u64,
        /// The exclusive upper bound of the domain.
        domain: u64,
    },

    /// Accumulating the deltas overflows `u64`.
    #[error("decoded value overflows")]
    Overflow,
}

/// Encodes a set of integers into a Golomb-Rice coded byte string.
///
/// `fixed_bits` is `log2(P)`. Values are sorted and deduplicated before being
/// encoded.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::golomb::golomb_encode;
///
/// let mut dst = Vec::new();
/// golomb_encode(&[18], 6, &mut dst);
/// assert_eq!(dst, [0x24]);
/// ```
pub fn golomb_encode(values: &[u64], fixed_bits: u32, dst: &mut Vec<u8>) {
    GolombEncoder::new(fixed_bits).encode(values, dst)
}

/// Decodes a Golomb-Rice coded byte string with the default unary run limit
/// and no domain bound.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::golomb::golomb_decode;
///
/// assert_eq!(golomb_decode(&[0x24], 6).unwrap(), vec![18]);
/// ```
pub fn golomb_decode(src: &[u8], fixed_bits: u32) -> Result<Vec<u64>, GolombDecodeError> {
    GolombDecoder::new(fixed_bits).decode(src)
}

/// Golomb-Rice encoder with a fixed remainder width.
#[derive(Clone, Copy, Debug)]
pub struct GolombEncoder {
    fixed_bits: u32,
}

impl GolombEncoder {
    /// Creates a new `GolombEncoder` writing `fixed_bits` remainder bits.
    pub fn new(fixed_bits: u32) -> Self {
        Self { fixed_bits }
    }

    /// Encodes `values` and appends the result to `dst`.
    pub fn encode(&self, values: &[u64], dst: &mut Vec<u8>) {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut writer = BitWriter::new(dst);
        let mut prev = 0u64;
        for value in sorted {
            self.encode_value(&mut writer, value - prev);
            prev = value;
        }
        writer.finish();
    }

    fn encode_value(&self, writer: &mut BitWriter<'_>, delta: u64) {
        let mut unary = delta.checked_shr(self.fixed_bits).unwrap_or(0);
        while unary != 0 {
            let nbits = unary.min(63) as u32;
            writer.write_bits(u64::MAX, nbits);
            unary -= nbits as u64;
        }
        writer.write_bits(0, 1);
        // Remainder bits above the width of `u64` are always zero.
        let mut pad = self.fixed_bits.saturating_sub(u64::BITS);
        while pad != 0 {
            let nbits = pad.min(u64::BITS);
            writer.write_bits(0, nbits);
            pad -= nbits;
        }
        writer.write_bits(delta, self.fixed_bits.min(u64::BITS));
    }
}

/// Golomb-Rice decoder with a fixed remainder width.
///
/// The decoder refuses unary runs longer than `max_run` and, when a domain is
/// set, values that do not fit into it.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::golomb::{GolombDecodeError, GolombDecoder};
///
/// let decoder = GolombDecoder::new(6).max_unary_run(4);
/// assert_eq!(
///     decoder.decode(&[0xff, 0x00]),
///     Err(GolombDecodeError::UnaryRunTooLong { limit: 4 })
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GolombDecoder {
    fixed_bits: u32,
    max_run: u64,
    domain: Option<u64>,
}

impl GolombDecoder {
    /// Creates a new `GolombDecoder` reading `fixed_bits` remainder bits.
    pub fn new(fixed_bits: u32) -> Self {
        Self {
            fixed_bits,
            max_run: DEFAULT_MAX_UNARY_RUN,
            domain: None,
        }
    }

    /// Sets the longest unary run the decoder accepts.
    pub fn max_unary_run(mut self, max_run: u64) -> Self {
        self.max_run = max_run;
        self
    }

    /// Sets the exclusive upper bound of decoded values.
    pub fn domain(mut self, domain: u64) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Decodes `src` into an ascending, duplicate free list of values.
    pub fn decode(&self, src: &[u8]) -> Result<Vec<u64>, GolombDecodeError> {
        let mut reader = BitReader::new(src);
        let min_code_len = self.fixed_bits as usize + 1;
        let mut values: Vec<u64> = Vec::new();
        let mut prev = 0u64;

        while reader.remaining() >= min_code_len {
            let delta = self.decode_value(&mut reader)?;
            let value = prev.checked_add(delta).ok_or(GolombDecodeError::Overflow)?;
            if let Some(domain) = self.domain {
                if value >= domain {
                    return Err(GolombDecodeError::OutOfRange { value, domain });
                }
            }
            if values.last() != Some(&value) {
                values.push(value);
            }
            prev = value;
        }
        Ok(values)
    }

    fn decode_value(&self, reader: &mut BitReader<'_>) -> Result<u64, GolombDecodeError> {
        let mut unary = 0u64;
        loop {
            match reader.read_bit() {
                Some(true) => {
                    unary += 1;
                    if unary > self.max_run {
                        return Err(GolombDecodeError::UnaryRunTooLong {
                            limit: self.max_run,
                        });
                    }
                }
                Some(false) => break,
                None => return Err(GolombDecodeError::Truncated),
            }
        }
        let mut pad = self.fixed_bits.saturating_sub(u64::BITS);
        while pad != 0 {
            let nbits = pad.min(u64::BITS);
            match reader.read_bits(nbits) {
                Some(0) => pad -= nbits,
                Some(_) => return Err(GolombDecodeError::Overflow),
                None => return Err(GolombDecodeError::Truncated),
            }
        }
        let rest = reader
            .read_bits(self.fixed_bits.min(u64::BITS))
            .ok_or(GolombDecodeError::Truncated)?;
        match 1u64.checked_shl(self.fixed_bits) {
            Some(modulus) => unary
                .checked_mul(modulus)
                .map(|high| high | rest)
                .ok_or(GolombDecodeError::Overflow),
            None if unary == 0 => Ok(rest),
            None => Err(GolombDecodeError::Overflow),
        }
    }
}

/// Writes bits MSB first into a `Vec<u8>`.
struct BitWriter<'a> {
    dst: &'a mut Vec<u8>,
    // `state`:
    // +----------+----------+----------------------------+
    // | Code A   | Code B   |          Unfilled          |
    // +----------+----------+----------------------------+
    // |<-------------------  64 bits  ------------------->
    state: u64,
    unfilled: u32,
}

impl<'a> BitWriter<'a> {
    fn new(dst: &'a mut Vec<u8>) -> Self {
        Self {
            dst,
            state: 0,
            unfilled: 64,
        }
    }

    /// Writes the lowest `nbits` bits of `code`, `nbits` being at most 64.
    fn write_bits(&mut self, code: u64, nbits: u32) {
        if nbits == 0 {
            return;
        }
        let code = match nbits {
            64 => code,
            _ => code & ((1u64 << nbits) - 1),
        };
        match self.unfilled.cmp(&nbits) {
            Ordering::Greater => {
                self.state |= code << (self.unfilled - nbits);
                self.unfilled -= nbits;
            }
            Ordering::Equal => {
                self.state |= code;
                self.dst.extend_from_slice(&self.state.to_be_bytes());
                self.state = 0;
                self.unfilled = 64;
            }
            // The high part of `code` fills up `state`, the low part starts
            // the next one.
            Ordering::Less => {
                let rest = nbits - self.unfilled;
                self.state |= code >> rest;
                self.dst.extend_from_slice(&self.state.to_be_bytes());
                self.state = code << (64 - rest);
                self.unfilled = 64 - rest;
            }
        }
    }

    /// Outputs the filled bytes of `state`, the last one padded with `0b0`.
    fn finish(self) {
        if self.unfilled != 64 {
            let bytes = self.state.to_be_bytes();
            let len = (8 - (self.unfilled >> 3)) as usize;
            self.dst.extend_from_slice(&bytes[..len]);
        }
    }
}

/// Reads bits MSB first from a byte slice.
struct BitReader<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.src.len() * 8 - self.pos
    }

    fn read_bit(&mut self) -> Option<bool> {
        let byte = self.src.get(self.pos >> 3)?;
        let bit = (byte >> (7 - (self.pos & 7))) & 0x1;
        self.pos += 1;
        Some(bit == 1)
    }

    /// Reads `nbits` bits, `nbits` being at most 64.
    fn read_bits(&mut self, nbits: u32) -> Option<u64> {
        if self.remaining() < nbits as usize {
            return None;
        }
        let mut value = 0u64;
        for _ in 0..nbits {
            let bit = self.read_bit()?;
            value = (value << 1) | u64::from(bit);
        }
        Some(value)
    }
}
