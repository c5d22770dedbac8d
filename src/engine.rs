// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The public engine: opening dictionaries and running lookups against them.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::arc::{self, ArcOffset};
use crate::contracts;
use crate::error::{FindError, LoadError};
use crate::header::{self, Header};
use crate::tables::Tables;
use crate::traversal::{self, SearchContext};

/// Query flags, combined bitwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(pub u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const ADD_DIACRITICS: u8 = 1;
    pub const IGNORE_CASE: u8 = 2;
    pub const DISALLOW_LOWERCASE: u8 = 4;

    pub fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    fn folding(self) -> bool {
        self.contains(Self::ADD_DIACRITICS) || self.contains(Self::IGNORE_CASE)
    }
}

impl From<u8> for Flags {
    fn from(value: u8) -> Self {
        Flags(value)
    }
}

/// An opened morphological dictionary.
///
/// Holds the arc buffer and the four translation tables, all immutable once
/// constructed, so a `Dictionary` is `Send + Sync` and safe to share across
/// threads: every [`Dictionary::find`] call allocates its own scratch state.
pub struct Dictionary {
    buf: Vec<u8>,
    goto_length: u8,
    type_: u8,
    start: ArcOffset,
    start1: Option<ArcOffset>,
    start2: Option<ArcOffset>,
    tables: Tables,
    header: Header,
}

impl Dictionary {
    /// Open and validate a `.fsa` dictionary file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let mut file = File::open(&path).map_err(|source| LoadError::CannotOpen {
            path: path.clone(),
            source,
        })?;

        let file_len = file
            .metadata()
            .map_err(|source| LoadError::CannotOpen {
                path: path.clone(),
                source,
            })?
            .len();
        file.seek(SeekFrom::Start(0)).map_err(|source| LoadError::SeekFailed {
            path: path.clone(),
            source,
        })?;

        if file_len < header::HEADER_SIZE as u64 {
            return Err(LoadError::ShortRead {
                path,
                expected: header::HEADER_SIZE,
                actual: file_len as usize,
            });
        }

        let (header, magic) = Header::read(&mut file).map_err(|_| LoadError::ShortRead {
            path: path.clone(),
            expected: header::HEADER_SIZE,
            actual: file_len as usize,
        })?;

        if magic != header::MAGIC {
            return Err(LoadError::BadMagic { path, found: magic });
        }
        if header.major_version != header::MAJOR_VERSION {
            return Err(LoadError::BadMajorVersion {
                path,
                found: header.major_version,
            });
        }
        if header.format_version != header::FORMAT_VERSION {
            return Err(LoadError::BadFormatVersion {
                path,
                found: header.format_version,
            });
        }

        let body_len = (file_len - header::HEADER_SIZE as u64) as usize;
        // over-allocate by a machine word so the arc decoder's packed-word read
        // never needs to reason about running off the end of the real data.
        let mut buf = vec![0u8; body_len + std::mem::size_of::<usize>()];
        read_body(&mut file, &mut buf[..body_len], &path, body_len)?;

        let goto_length = header.goto_length;
        contracts::check_goto_length(goto_length);

        let start = arc::first_node(goto_length);
        let start1 = resolve_alt_root(&buf, goto_length, start, b'!');
        let start2 = resolve_alt_root(&buf, goto_length, start, b'^');

        Ok(Self {
            buf,
            goto_length,
            type_: header.type_,
            start,
            start1,
            start2,
            tables: Tables::new(),
            header,
        })
    }

    /// The dictionary header, for introspection (e.g. the `inspect` CLI command).
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn has_compound_roots(&self) -> bool {
        self.start1.is_some() && self.start2.is_some()
    }

    /// Look up `word`, returning zero or more decoded entries. Never panics
    /// on malformed input; an empty result means no match, not an error.
    pub fn find(&self, word: &[u8], flags: impl Into<Flags>) -> Result<Vec<Vec<u8>>, FindError> {
        let flags = flags.into();
        let (copy, input_len, uppercase) = self.translate(word, flags);
        let mut ctx = SearchContext::new(input_len, self.type_);

        if flags.folding() {
            self.search_folded(&copy, uppercase, flags, &mut ctx)?;
        } else {
            self.search_exact(&copy, uppercase, flags, &mut ctx)?;
        }

        Ok(ctx.entries)
    }

    /// Look up every word in `words`, preserving order. A word with zero
    /// results is echoed back verbatim in that slot, rather than omitted —
    /// a policy host bindings depend on.
    pub fn find_all(&self, words: &[&[u8]], flags: impl Into<Flags> + Copy) -> Result<Vec<Vec<u8>>, FindError> {
        let mut out = Vec::with_capacity(words.len());
        for &word in words {
            let mut results = self.find(word, flags)?;
            if results.is_empty() {
                out.push(word.to_vec());
            } else {
                out.append(&mut results);
            }
        }
        Ok(out)
    }

    /// Translate `word` through `enc_in`, truncated at `MAX_WORD_LENGTH`,
    /// terminated with `':'` then `0`. Returns the translated buffer, its
    /// length excluding the sentinel, and whether any non-initial letter was
    /// uppercase (tracked only when case is semantically significant).
    ///
    /// The returned buffer is always `MAX_WORD_LENGTH + 2` bytes, zero-padded
    /// past the `':'`/NUL sentinel — the same fixed scratch size the original
    /// buffer layout reserves for the translated input (§3's candidate/scratch
    /// sizing). `accent_walk`'s compound-root branch advances its `word` slice
    /// one step past the sentinel before checking the next byte; this padding
    /// keeps that read (and any further tail reads a pathological dictionary's
    /// arcs might trigger) inside the buffer instead of panicking.
    fn translate(&self, word: &[u8], flags: Flags) -> (Vec<u8>, usize, bool) {
        let bound = word.len().min(header::MAX_WORD_LENGTH);
        let mut copy = vec![0u8; header::MAX_WORD_LENGTH + 2];
        let mut uppercase = false;
        let track_case = !flags.contains(Flags::IGNORE_CASE) && !flags.contains(Flags::DISALLOW_LOWERCASE);

        for (i, &b) in word.iter().take(bound).enumerate() {
            let translated = self.tables.enc_in[b as usize];
            if track_case && i != 0 && self.tables.lower[translated as usize] != translated {
                uppercase = true;
            }
            copy[i] = translated;
        }
        let input_len = bound;
        copy[input_len] = b':';
        copy[input_len + 1] = 0;
        (copy, input_len, uppercase)
    }

    fn search_exact(&self, copy: &[u8], uppercase: bool, flags: Flags, ctx: &mut SearchContext) -> Result<(), FindError> {
        let mut copy = copy.to_vec();
        traversal::find_exact(&self.buf, self.goto_length, &self.tables.enc_out, &copy, 0, self.start, ctx)?;

        if uppercase {
            self.lowercase_from(&mut copy, 1);
            traversal::find_exact(&self.buf, self.goto_length, &self.tables.enc_out, &copy, 0, self.start, ctx)?;
        }

        if self.tables.lower[copy[0] as usize] != copy[0] && !flags.contains(Flags::DISALLOW_LOWERCASE) {
            copy[0] = self.tables.lower[copy[0] as usize];
            traversal::find_exact(&self.buf, self.goto_length, &self.tables.enc_out, &copy, 0, self.start, ctx)?;
        }

        if ctx.entries.is_empty() {
            if let (Some(start1), Some(start2)) = (self.start1, self.start2) {
                traversal::compound_fallback(&self.buf, self.goto_length, &self.tables.enc_out, &copy, start1, start2, ctx)?;
            }
        }
        Ok(())
    }

    fn search_folded(&self, copy: &[u8], uppercase: bool, flags: Flags, ctx: &mut SearchContext) -> Result<(), FindError> {
        let accent_table = self.tables.fold_table(flags.0 & 0b11);
        let mut copy = copy.to_vec();

        if flags.contains(Flags::IGNORE_CASE) {
            self.lowercase_from(&mut copy, 0);
        }
        traversal::accent_walk(
            &self.buf,
            self.goto_length,
            &self.tables.enc_out,
            accent_table,
            &copy,
            0,
            self.start,
            None,
            ctx,
        )?;

        if uppercase {
            self.lowercase_from(&mut copy, 1);
            traversal::accent_walk(
                &self.buf,
                self.goto_length,
                &self.tables.enc_out,
                accent_table,
                &copy,
                0,
                self.start,
                None,
                ctx,
            )?;
        }

        if self.tables.lower[copy[0] as usize] != copy[0] {
            copy[0] = self.tables.lower[copy[0] as usize];
            traversal::accent_walk(
                &self.buf,
                self.goto_length,
                &self.tables.enc_out,
                accent_table,
                &copy,
                0,
                self.start,
                None,
                ctx,
            )?;
        }

        if ctx.entries.is_empty() {
            if let (Some(start1), Some(start2)) = (self.start1, self.start2) {
                traversal::accent_walk(
                    &self.buf,
                    self.goto_length,
                    &self.tables.enc_out,
                    accent_table,
                    &copy,
                    0,
                    start1,
                    Some(start2),
                    ctx,
                )?;
            }
        }
        Ok(())
    }

    /// Lowercase `copy` in place from index `from` up to (not including) the
    /// `:' + NUL` sentinel, in terms of the `lower` table.
    fn lowercase_from(&self, copy: &mut [u8], from: usize) {
        for b in &mut copy[from..] {
            if *b == 0 {
                break;
            }
            *b = self.tables.lower[*b as usize];
        }
    }
}

fn resolve_alt_root(buf: &[u8], goto_length: u8, start: ArcOffset, wanted: u8) -> Option<ArcOffset> {
    let first = arc::descend(buf, start, goto_length);
    arc::find_sibling(buf, first, goto_length, |node| arc::letter(buf, node) == wanted)
}

fn read_body(file: &mut File, dst: &mut [u8], path: &Path, expected: usize) -> Result<(), LoadError> {
    let mut read = 0;
    loop {
        match file.read(&mut dst[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(LoadError::CannotOpen {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
    if read != expected {
        return Err(LoadError::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual: read,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_bitwise() {
        let flags = Flags(Flags::ADD_DIACRITICS | Flags::IGNORE_CASE);
        assert!(flags.contains(Flags::ADD_DIACRITICS));
        assert!(flags.contains(Flags::IGNORE_CASE));
        assert!(!flags.contains(Flags::DISALLOW_LOWERCASE));
    }
}
