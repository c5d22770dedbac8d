// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for dictionary loading.
//!
//! `Dictionary::open` is the first thing that touches a `.fsa` file a caller
//! hands us, and that file is untrusted input — a corrupted download, a
//! hand-edited fixture, a deliberately hostile upload. Every byte sequence
//! must either load cleanly or come back as a typed `LoadError`; none of
//! them should panic or read outside the file's own bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    let mut file = match tempfile::NamedTempFile::new() {
        Ok(f) => f,
        Err(_) => return,
    };
    if file.write_all(data).is_err() {
        return;
    }

    // Must never panic, regardless of how `data` is malformed.
    let _ = majka::Dictionary::open(file.path());
});
