// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The three traversal algorithms and the compound-word fallback.
//!
//! All three walk the same arc-decoded buffer, but differ in how eagerly
//! they branch:
//!
//! - [`find_exact`] follows exactly one matching child per level (the
//!   dictionary format guarantees unique letters per node, so the first
//!   match is the only one).
//! - [`accent_walk`] follows *every* sibling whose letter equals the sought
//!   letter under the active fold table, since folding is many-to-one.
//! - [`complete_rest`] ignores the input word entirely and enumerates every
//!   completion reachable from a node, emitting one result per final arc it
//!   passes through (which both of the above call once the input word is
//!   exhausted).
//!
//! A [`SearchContext`] carries the mutable state (the candidate path being
//! built and the results accumulated so far) explicitly between calls,
//! instead of through thread-local or global state.

use crate::arc::{self, ArcOffset};
use crate::contracts;
use crate::error::FindError;
use crate::format;

/// Mutable state threaded through one `find` call.
pub struct SearchContext {
    /// Letters walked so far: `candidate[..input_len]` is the matched input,
    /// the rest is whatever the automaton holds past it. Grows as traversal
    /// descends past the input word.
    candidate: Vec<u8>,
    pub entries: Vec<Vec<u8>>,
    input_len: usize,
    dict_type: u8,
}

impl SearchContext {
    pub fn new(input_len: usize, dict_type: u8) -> Self {
        Self {
            candidate: vec![0u8; input_len + 2],
            entries: Vec::new(),
            input_len,
            dict_type,
        }
    }

    fn set(&mut self, depth: usize, byte: u8) {
        if self.candidate.len() <= depth {
            self.candidate.resize(depth + 1, 0);
        }
        self.candidate[depth] = byte;
    }

    /// The candidate path built so far, for contract checks at call sites
    /// that don't otherwise hold a reference to it.
    fn candidate(&self) -> &[u8] {
        &self.candidate
    }

    fn emit(&mut self, depth: usize, enc_out: &[u8; 256]) -> Result<(), FindError> {
        self.set(depth, 0);
        let entry = format::format(self.dict_type, &self.candidate, self.input_len, enc_out)?;
        self.entries.push(entry);
        Ok(())
    }
}

/// Exact-match traversal: `find_word` in the reference implementation.
///
/// `word` is the remaining (NUL-terminated) input to match; `next_node` is
/// the arc reference for the node to descend from.
pub fn find_exact(
    buf: &[u8],
    goto_length: u8,
    enc_out: &[u8; 256],
    word: &[u8],
    level: usize,
    mut next_node: ArcOffset,
    ctx: &mut SearchContext,
) -> Result<(), FindError> {
    // Only the top-level call (from `Dictionary::find`) walks `word` from its
    // own start; the compound fallback re-enters here at a nonzero `level`
    // with `word` already sliced to the remainder, so the "candidate so far
    // equals the input consumed so far" contract only applies when `level`
    // starts at 0.
    let check_prefix = level == 0;
    let mut rest = word;
    let mut level = level;
    loop {
        next_node = arc::descend(buf, next_node, goto_length);
        let Some(matched) = arc::find_sibling(buf, next_node, goto_length, |node| arc::letter(buf, node) == rest[0])
        else {
            return Ok(());
        };

        ctx.set(level, arc::letter(buf, matched));
        if check_prefix {
            contracts::check_candidate_matches_input(ctx.candidate(), word, level + 1, ctx.input_len);
        }
        level += 1;

        if rest[1] == 0 {
            complete_rest(buf, goto_length, enc_out, level, matched, ctx)?;
            return Ok(());
        }

        rest = &rest[1..];
        next_node = matched;
    }
}

/// Diacritic/case-folded traversal: `accent_word` in the reference
/// implementation. Branches into every sibling arc whose letter equals
/// either the sought letter or its folded form, and additionally follows
/// the literal `:` arc into `start_node2` (the compound-word second root)
/// when present.
#[allow(clippy::too_many_arguments)]
pub fn accent_walk(
    buf: &[u8],
    goto_length: u8,
    enc_out: &[u8; 256],
    accent_table: &[u8; 256],
    word: &[u8],
    level: usize,
    next_node: ArcOffset,
    start_node2: Option<ArcOffset>,
    ctx: &mut SearchContext,
) -> Result<(), FindError> {
    let first = arc::descend(buf, next_node, goto_length);
    let mut node = first;
    loop {
        let char_no = arc::letter(buf, node);
        if word[0] == char_no || word[0] == accent_table[char_no as usize] {
            ctx.set(level, char_no);
            if word[1] == 0 && start_node2.is_none() {
                complete_rest(buf, goto_length, enc_out, level + 1, node, ctx)?;
            } else {
                accent_walk(
                    buf,
                    goto_length,
                    enc_out,
                    accent_table,
                    &word[1..],
                    level + 1,
                    node,
                    start_node2,
                    ctx,
                )?;
            }
        } else if char_no == b':' {
            if let Some(alt_root) = start_node2 {
                accent_walk(buf, goto_length, enc_out, accent_table, word, level, alt_root, None, ctx)?;
            }
        }

        if arc::is_last(buf, node) {
            break;
        }
        node = arc::next_sibling(node, goto_length);
    }
    Ok(())
}

/// Enumerate every completion reachable from `next_node`, formatting and
/// recording one entry per final arc passed through (before recursing
/// further, so a final arc partway down a branch doesn't suppress longer
/// completions deeper in the same branch). `compl_rest` in the reference
/// implementation.
pub fn complete_rest(
    buf: &[u8],
    goto_length: u8,
    enc_out: &[u8; 256],
    depth: usize,
    next_node: ArcOffset,
    ctx: &mut SearchContext,
) -> Result<(), FindError> {
    let first = arc::descend(buf, next_node, goto_length);
    if first == 0 {
        // successor resolves to the buffer origin: no further arcs (sink)
        return Ok(());
    }

    let mut node = first;
    loop {
        ctx.set(depth, arc::letter(buf, node));
        if arc::is_final(buf, node) {
            ctx.emit(depth + 1, enc_out)?;
        }
        complete_rest(buf, goto_length, enc_out, depth + 1, node, ctx)?;

        if arc::is_last(buf, node) {
            break;
        }
        node = arc::next_sibling(node, goto_length);
    }
    Ok(())
}

/// Compound-word fallback used only in exact-match mode, when the main
/// search (and its uppercase/lowercase retries) found nothing. Walks `word`
/// letter-by-letter through `start1`'s subtree; at every depth reached this
/// way whose node has a sibling `:` arc, treats that depth as a valid split
/// between the compound's two parts and looks the remainder up from
/// `start2` via [`find_exact`] — which may itself add results to `ctx`. The
/// walk keeps going past a found split, since a compound word can split at
/// more than one point (e.g. a three-part compound), stopping only when the
/// input is exhausted or no further letter match continues the walk.
pub fn compound_fallback(
    buf: &[u8],
    goto_length: u8,
    enc_out: &[u8; 256],
    word: &[u8],
    start1: ArcOffset,
    start2: ArcOffset,
    ctx: &mut SearchContext,
) -> Result<(), FindError> {
    let mut next_node = arc::descend(buf, start1, goto_length);
    let mut level = 0;
    let mut word = word;

    loop {
        let Some(matched) = arc::find_sibling(buf, next_node, goto_length, |node| arc::letter(buf, node) == word[0])
        else {
            return Ok(());
        };

        ctx.set(level, arc::letter(buf, matched));
        level += 1;
        word = &word[1..];
        if word[0] == 0 {
            return Ok(());
        }

        let new_node = arc::descend(buf, matched, goto_length);
        next_node = new_node;

        if arc::find_sibling(buf, new_node, goto_length, |node| arc::letter(buf, node) == b':').is_some() {
            find_exact(buf, goto_length, enc_out, word, level, start2, ctx)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_table() -> [u8; 256] {
        let mut t = [0u8; 256];
        for (i, b) in t.iter_mut().enumerate() {
            *b = i as u8;
        }
        t
    }

    /// Reproduces the shape `search_folded`'s compound-root branch (`start_node2
    /// = Some(..)`) drives `accent_walk` through: the word is already exhausted
    /// (positioned on the `':'` sentinel) when a node's arc is itself literally
    /// `':'`, so it's taken as a normal match rather than the alt-root restart,
    /// and the walk recurses one step past the sentinel onto a node holding a
    /// `0`-letter arc. With an under-padded `word` slice that next comparison
    /// reads one byte past its end; it must not panic regardless.
    #[test]
    fn accent_walk_does_not_panic_past_the_sentinel_under_compound_roots() {
        // offset 0: synthetic anchor arc, inline child at offset 2.
        // offset 2: arc ':' , inline child at offset 4, last in its node.
        // offset 4: arc 0 (pathological), last in its node.
        let buf: Vec<u8> = vec![0, 4, b':', 2 | 4, 0, 2];
        let enc_out = identity_table();
        let accent_table = identity_table();
        let mut ctx = SearchContext::new(0, 2);

        let result = accent_walk(&buf, 1, &enc_out, &accent_table, &[b':', 0], 0, 0, Some(999), &mut ctx);
        assert!(result.is_ok());
    }
}
