// Copyright Claudio Mattera 2025-2026.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Packed color triplets
//!
//! In 64K color mode the UC1698U stores three horizontally adjacent pixels
//! in one two-byte RAM cell, using the 5-6-5 layout from the datasheet:
//!
//! ```text
//! byte 1: A4 A3 A2 A1 A0 B5 B4 B3
//! byte 2: B2 B1 B0 C4 C3 C2 C1 C0
//! ```
//!
//! The layout is a hardware contract and is reproduced bit for bit.

/// Three horizontally adjacent pixel values packed into one RAM cell
///
/// The first and third channel hold 5 significant bits, the second holds 6.
/// Higher bits are ignored when packing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Triplet {
    /// Value of the first pixel (5 bits)
    pub first: u8,

    /// Value of the second pixel (6 bits)
    pub second: u8,

    /// Value of the third pixel (5 bits)
    pub third: u8,
}

impl Triplet {
    /// Create a new triplet
    #[must_use]
    pub const fn new(first: u8, second: u8, third: u8) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    /// Create a triplet with the same value in all three channels
    #[must_use]
    pub const fn splat(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Pack the triplet into its two-byte wire form
    ///
    /// Channels are truncated to their significant bits (5, 6 and 5
    /// respectively) before packing.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 2] {
        let first = self.first & 0x1f;
        let second = self.second & 0x3f;
        let third = self.third & 0x1f;

        [(first << 3) | (second >> 3), (second << 5) | third]
    }

    /// Unpack a triplet from its two-byte wire form
    ///
    /// This is the exact inverse of [`to_bytes`](Self::to_bytes) over the
    /// truncated channel ranges.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            first: bytes[0] >> 3,
            second: ((bytes[0] & 0x07) << 3) | (bytes[1] >> 5),
            third: bytes[1] & 0x1f,
        }
    }

    /// Replace the channel at `index` modulo 3
    pub fn set_channel(&mut self, index: u16, value: u8) {
        match index % 3 {
            0 => self.first = value,
            1 => self.second = value,
            _ => self.third = value,
        }
    }
}
