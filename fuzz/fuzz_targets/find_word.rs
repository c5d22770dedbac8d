// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for word lookup against a well-formed, arbitrarily shaped
//! dictionary.
//!
//! `load_dictionary` fuzzes malformed files; this target instead builds a
//! structurally valid `.fsa` (random entries, random `goto_length`, random
//! type byte) and throws arbitrary words and flag combinations at
//! `Dictionary::find`. The traversal and formatter are the parts of this
//! crate that recurse over attacker-shaped automaton content, so this is
//! where an out-of-bounds read or an infinite recursion would show up.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use majka::{arc, header};
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Arbitrary)]
struct Input {
    entries: Vec<Vec<u8>>,
    goto_length: u8,
    type_: u8,
    word: Vec<u8>,
    flags: u8,
}

#[derive(Default)]
struct Node {
    final_: bool,
    children: BTreeMap<u8, Node>,
}

fn insert(root: &mut Node, path: &[u8]) {
    let mut node = root;
    for &b in path {
        node = node.children.entry(b).or_default();
    }
    node.final_ = true;
}

fn write_node(buf: &mut Vec<u8>, goto_length: u8, children: &BTreeMap<u8, Node>) -> usize {
    if children.is_empty() {
        return 0;
    }
    let arcs: Vec<(u8, bool, usize)> = children
        .iter()
        .map(|(&letter, node)| (letter, node.final_, write_node(buf, goto_length, &node.children)))
        .collect();

    let start = buf.len();
    let last_index = arcs.len() - 1;
    for (i, (letter, final_, child_offset)) in arcs.into_iter().enumerate() {
        let mut flags: u64 = (child_offset as u64) << 3;
        if final_ {
            flags |= 1;
        }
        if i == last_index {
            flags |= 2;
        }
        buf.push(letter);
        for k in 0..goto_length as usize {
            buf.push(((flags >> (8 * k as u64)) & 0xff) as u8);
        }
    }
    start
}

fuzz_target!(|input: Input| {
    // goto_length is a 4-bit on-disk field; keep it in a range the decoder's
    // native-word packed read can service.
    let goto_length = (input.goto_length % 8).max(1);

    let mut root = Node::default();
    for entry in input.entries.iter().take(64) {
        if entry.len() > 64 {
            continue;
        }
        insert(&mut root, entry);
    }

    let mut buf = vec![0u8; 2 * (1 + goto_length as usize)];
    let root_children_offset = write_node(&mut buf, goto_length, &root.children);
    let synth_offset = arc::first_node(goto_length);
    let packed = (root_children_offset as u64) << 3;
    for k in 0..goto_length as usize {
        buf[synth_offset + 1 + k] = ((packed >> (8 * k as u64)) & 0xff) as u8;
    }

    let mut file_bytes = vec![0u8; header::HEADER_SIZE];
    file_bytes[0..4].copy_from_slice(&header::MAGIC);
    file_bytes[4] = header::FORMAT_VERSION;
    file_bytes[7] = goto_length;
    file_bytes[8] = input.type_;
    file_bytes[9] = header::MAJOR_VERSION;
    file_bytes[12..14].copy_from_slice(&1000u16.to_le_bytes());
    file_bytes[14..16].copy_from_slice(&1000u16.to_le_bytes());
    file_bytes[16..20].copy_from_slice(&65536u32.to_le_bytes());
    file_bytes.extend_from_slice(&buf);

    let mut file = match tempfile::NamedTempFile::new() {
        Ok(f) => f,
        Err(_) => return,
    };
    if file.write_all(&file_bytes).is_err() {
        return;
    }

    let Ok(dict) = majka::Dictionary::open(file.path()) else {
        return;
    };

    // Must never panic on any word/flags combination, including an unknown
    // result type that `find` is supposed to surface as a `FindError`.
    let _ = dict.find(&input.word, input.flags);
});
