// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dictionary file header.
//!
//! Every `.fsa` dictionary opens with a 20-byte signature, parsed in one read
//! before anything else touches the arc table. The layout (and the constants
//! below) comes straight from the Daciuk-style automaton format this crate
//! reads: a 4-byte magic, a handful of format/version bytes, a `goto_length`
//! that tells the arc decoder how many bytes each packed successor pointer
//! occupies, and three size limits the caller can use to size result buffers.

use std::io::{self, Read};

/// Magic bytes identifying an FSA dictionary file: `\fsa`.
pub const MAGIC: [u8; 4] = [0x5c, b'f', b's', b'a'];

/// The only automaton format version this crate understands.
pub const FORMAT_VERSION: u8 = 5;

/// The only major dictionary version this crate understands.
pub const MAJOR_VERSION: u8 = 1;

/// Longest surface word the engine will translate and search for, in bytes.
pub const MAX_WORD_LENGTH: usize = 100;

/// Fixed on-disk header size, in bytes.
pub const HEADER_SIZE: usize = 20;

/// Parsed dictionary header.
///
/// `goto_length` and `type_` keep their on-disk names; `goto_length` is masked
/// to its low nibble on read, matching the original format where the high
/// nibble of that byte was reserved.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub format_version: u8,
    pub filler: u8,
    pub annotation_separator: u8,
    pub goto_length: u8,
    pub type_: u8,
    pub major_version: u8,
    pub minor_version: u16,
    pub max_result: u16,
    pub max_results_count: u16,
    /// Size, in bytes, of the annotation payload area on disk (`_max_results_size`
    /// in the original). Callers that need a scratch buffer sized for an
    /// embedding host should use [`Header::max_results_size`] instead.
    pub stored_max_results_size: u32,
}

impl Header {
    /// Read the raw 20-byte header from `r`. Does not validate the magic or
    /// version fields — the caller (which knows the file path, for error
    /// context) does that. Does not touch the arc table that follows.
    pub fn read<R: Read>(r: &mut R) -> io::Result<(Self, [u8; 4])> {
        let mut buf = [0u8; HEADER_SIZE];
        r.read_exact(&mut buf)?;

        let header = Self {
            format_version: buf[4],
            filler: buf[5],
            annotation_separator: buf[6],
            goto_length: buf[7] & 0x0f,
            type_: buf[8],
            major_version: buf[9],
            minor_version: u16::from_le_bytes([buf[10], buf[11]]),
            max_result: u16::from_le_bytes([buf[12], buf[13]]),
            max_results_count: u16::from_le_bytes([buf[14], buf[15]]),
            stored_max_results_size: u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]),
        };
        let magic = [buf[0], buf[1], buf[2], buf[3]];
        Ok((header, magic))
    }

    /// Total scratch buffer size an embedding host would need to reserve for a
    /// single [`crate::Dictionary::find`] call: the on-disk annotation budget
    /// plus two word-length-sized scratch regions (translated input, candidate
    /// path), mirroring the original `max_results_size` computation.
    pub fn max_results_size(&self) -> usize {
        self.stored_max_results_size as usize + 2 * (MAX_WORD_LENGTH + 2)
    }
}
