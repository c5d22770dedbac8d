//! Morphological dictionary lookup over a compact finite-state automaton.
//!
//! Given a surface word, [`Dictionary::find`] returns zero or more annotated
//! strings — lemmas, tags, word forms — by walking a compressed trie-like
//! automaton stored as a single `.fsa` file. Diacritic-insensitive and
//! case-insensitive matching broaden the set of letters an arc accepts
//! during the walk; the nine dictionary "types" each spell out a different
//! rule for turning a completed walk back into the strings the caller sees.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  header.rs  │────▶│   arc.rs     │────▶│ traversal.rs│
//! │ (file sig,  │     │ (decode one  │     │ (find_exact,│
//! │  Header)    │     │  arc/node)   │     │ accent_walk,│
//! └─────────────┘     └──────────────┘     │ complete_rest)
//!        │                   │             └──────┬──────┘
//!        ▼                   ▼                    ▼
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  tables.rs  │     │ contracts.rs │     │  format.rs  │
//! │ (fold/enc   │     │ (debug-only  │     │ (candidate  │
//! │  tables)    │     │  invariants) │     │ -> string)  │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!        │                                        │
//!        └───────────────────┬────────────────────┘
//!                             ▼
//!                       ┌───────────┐
//!                       │ engine.rs │
//!                       │(Dictionary│
//!                       │  /Flags)  │
//!                       └───────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use majka::{Dictionary, Flags};
//!
//! let dict = Dictionary::open("cs.fsa").unwrap();
//! let lemmas = dict.find(b"byt", Flags::ADD_DIACRITICS).unwrap();
//! ```

// Module declarations
pub mod arc;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod format;
pub mod header;
pub mod tables;
pub mod traversal;

// Re-exports for the public API
pub use engine::{Dictionary, Flags};
pub use error::{FindError, LoadError};
pub use header::Header;

#[cfg(test)]
mod tests {
    //! End-to-end tests against small, hand-built `.fsa` fixtures.
    //!
    //! These exercise the properties the dictionary format promises
    //! end to end: determinism, flag monotonicity, case fallback, bounded
    //! results, and the absence of out-of-bounds reads, rather than any
    //! single module in isolation.

    use super::*;
    use crate::engine::Flags;
    use proptest::prelude::*;
    use std::io::Write;

    /// A node in the trie used to build test fixtures: `final_` marks whether
    /// the arc leading into this node ends an accepted path (a full
    /// entry — word letters followed by the `:`-separated annotation tail).
    #[derive(Default)]
    struct FixtureNode {
        final_: bool,
        children: std::collections::BTreeMap<u8, FixtureNode>,
    }

    fn insert_entry(root: &mut FixtureNode, path: &[u8]) {
        let mut node = root;
        for &byte in path {
            node = node.children.entry(byte).or_default();
        }
        node.final_ = true;
    }

    /// Serializes `children` as a sibling arc run (recursing into each
    /// child's own children first, so every arc's successor offset is
    /// already known by the time the arc itself is written). Returns the
    /// offset of the run's first arc, or `0` (the sink marker `descend`
    /// treats as "no further arcs") if `children` is empty.
    fn write_node(buf: &mut Vec<u8>, goto_length: u8, children: &std::collections::BTreeMap<u8, FixtureNode>) -> usize {
        if children.is_empty() {
            return 0;
        }
        let arcs: Vec<(u8, bool, usize)> = children
            .iter()
            .map(|(&letter, node)| {
                let child_offset = write_node(buf, goto_length, &node.children);
                (letter, node.final_, child_offset)
            })
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

    /// Builds a minimal, well-formed `.fsa` file from a flat list of full
    /// entry paths (word letters, then `:`, then a length byte, then any
    /// literal suffix bytes — the same shape [`crate::format`] expects to
    /// find past `input_len`), and writes it to a temp path.
    fn build_fsa_file(entries: &[&[u8]], type_: u8) -> tempfile::TempPath {
        let goto_length: u8 = 3;

        let mut root = FixtureNode::default();
        for &entry in entries {
            insert_entry(&mut root, entry);
        }

        // The first `1 + goto_length` bytes are an arc this crate never
        // decodes (offset 0 is reserved as the sink marker); the next
        // `1 + goto_length` bytes are the synthetic root arc whose
        // `descend` gives the real root's first child arc — see
        // `arc::first_node`.
        let mut buf = vec![0u8; 2 * (1 + goto_length as usize)];
        let root_children_offset = write_node(&mut buf, goto_length, &root.children);

        let synth_offset = arc::first_node(goto_length);
        let packed = (root_children_offset as u64) << 3;
        for k in 0..goto_length as usize {
            buf[synth_offset + 1 + k] = ((packed >> (8 * k as u64)) & 0xff) as u8;
        }

        let mut header = vec![0u8; header::HEADER_SIZE];
        header[0..4].copy_from_slice(&header::MAGIC);
        header[4] = header::FORMAT_VERSION;
        header[7] = goto_length;
        header[8] = type_;
        header[9] = header::MAJOR_VERSION;
        header[12..14].copy_from_slice(&100u16.to_le_bytes());
        header[14..16].copy_from_slice(&100u16.to_le_bytes());
        header[16..20].copy_from_slice(&4096u32.to_le_bytes());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&header).unwrap();
        file.write_all(&buf).unwrap();
        file.into_temp_path()
    }

    /// Three type-2 (single compound output) entries sharing a root:
    /// `byt` and `být` (the latter spelled with the accented `ť`, byte 187,
    /// in place of the plain `t`) both lemmatizing to themselves, plus a
    /// lowercase-only `praha` to exercise the uppercase fallback.
    fn build_fixture() -> tempfile::TempPath {
        build_fsa_file(
            &[
                b"byt:A",
                &[b'b', b'y', 187, b':', b'A'],
                b"praha:A",
            ],
            2,
        )
    }

    #[test]
    fn exact_match_finds_the_plain_entry() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        let results = dict.find(b"byt", 0u8).unwrap();
        assert_eq!(results, vec![b"byt".to_vec()]);
    }

    #[test]
    fn diacritic_folding_reaches_both_entries() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        let mut results = dict.find(b"byt", Flags::ADD_DIACRITICS).unwrap();
        results.sort();
        // `enc_out` maps the accented 187 (ISO-8859-2 'ť') to Windows-1250's 157 on the way out.
        let mut expected = vec![b"byt".to_vec(), vec![b'b', b'y', 157]];
        expected.sort();
        assert_eq!(results, expected);
    }

    #[test]
    fn empty_input_returns_no_results() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        assert!(dict.find(b"", 0u8).unwrap().is_empty());
    }

    #[test]
    fn nonsense_word_returns_no_results() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        assert!(dict.find(b"nonsenseword", 0u8).unwrap().is_empty());
    }

    #[test]
    fn long_input_is_truncated_not_rejected() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        let long = vec![b'x'; 500];
        assert!(dict.find(&long, 0u8).unwrap().is_empty());
    }

    #[test]
    fn uppercase_falls_back_to_lowercase() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        let upper = dict.find(b"Praha", 0u8).unwrap();
        assert_eq!(upper, vec![b"praha".to_vec()]);
    }

    #[test]
    fn disallow_lowercase_suppresses_case_fallback() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        let upper = dict.find(b"Praha", Flags::DISALLOW_LOWERCASE).unwrap();
        assert!(upper.is_empty());
    }

    #[test]
    fn disallow_lowercase_suppresses_non_initial_case_fallback_too() {
        // DISALLOW_LOWERCASE suppresses every lowercase retry, not just the
        // leading-letter one: a non-initial uppercase letter (here "bYt")
        // must not fall back to its lowercased form either.
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        let results = dict.find(b"bYt", Flags::DISALLOW_LOWERCASE).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn find_all_echoes_unmatched_words() {
        let path = build_fixture();
        let dict = Dictionary::open(&path).unwrap();
        let out = dict.find_all(&[&b"byt"[..], &b"nope"[..]], 0u8).unwrap();
        assert_eq!(out, vec![b"byt".to_vec(), b"nope".to_vec()]);
    }

    #[test]
    fn concurrent_lookups_share_one_dictionary_safely() {
        use std::sync::Arc;
        use std::thread;

        let path = build_fixture();
        let dict = Arc::new(Dictionary::open(&path).unwrap());

        let handles: Vec<_> = [b"byt".to_vec(), b"praha".to_vec(), b"nonsense".to_vec()]
            .into_iter()
            .map(|word| {
                let dict = Arc::clone(&dict);
                thread::spawn(move || dict.find(&word, 0u8).unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], vec![b"byt".to_vec()]);
        assert_eq!(results[1], vec![b"praha".to_vec()]);
        assert!(results[2].is_empty());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        let err = Dictionary::open(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::BadMagic { .. }));
    }

    #[test]
    fn truncated_header_is_a_short_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\\fsa").unwrap();
        let err = Dictionary::open(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::ShortRead { .. }));
    }

    proptest! {
        #[test]
        fn find_is_deterministic(word in "[a-zA-Z]{0,12}") {
            let path = build_fixture();
            let dict = Dictionary::open(&path).unwrap();
            let first = dict.find(word.as_bytes(), 0u8).unwrap();
            let second = dict.find(word.as_bytes(), 0u8).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn flag_monotonicity_holds(word in "[a-zA-Z]{1,8}") {
            let path = build_fixture();
            let dict = Dictionary::open(&path).unwrap();
            let plain: std::collections::BTreeSet<_> = dict.find(word.as_bytes(), 0u8).unwrap().into_iter().collect();
            let diacritics: std::collections::BTreeSet<_> = dict
                .find(word.as_bytes(), Flags::ADD_DIACRITICS)
                .unwrap()
                .into_iter()
                .collect();
            let both: std::collections::BTreeSet<_> = dict
                .find(word.as_bytes(), Flags::ADD_DIACRITICS | Flags::IGNORE_CASE)
                .unwrap()
                .into_iter()
                .collect();
            prop_assert!(plain.is_subset(&diacritics));
            prop_assert!(diacritics.is_subset(&both));
        }

        #[test]
        fn never_panics_on_arbitrary_bytes(word in proptest::collection::vec(any::<u8>(), 0..600)) {
            let path = build_fixture();
            let dict = Dictionary::open(&path).unwrap();
            let _ = dict.find(&word, 0u8);
            let _ = dict.find(&word, Flags::ADD_DIACRITICS | Flags::IGNORE_CASE);
        }
    }
}
