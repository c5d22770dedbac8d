// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for dictionary loading and lookup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong opening a `.fsa` dictionary file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open dictionary file {path}")]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("seek on dictionary file {path} failed")]
    SeekFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("short read on dictionary file {path}: expected {expected} bytes, got {actual}")]
    ShortRead {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("invalid dictionary file (bad magic number): {path}")]
    BadMagic { path: PathBuf, found: [u8; 4] },

    #[error(
        "invalid majka dictionary version ({found} instead of {}) of dictionary file {path}",
        crate::header::MAJOR_VERSION
    )]
    BadMajorVersion { path: PathBuf, found: u8 },

    #[error(
        "invalid fsa dictionary version ({found} instead of {}) of dictionary file {path}",
        crate::header::FORMAT_VERSION
    )]
    BadFormatVersion { path: PathBuf, found: u8 },
}

/// Everything that can go wrong during a lookup against an already-open dictionary.
#[derive(Debug, Error)]
pub enum FindError {
    /// The dictionary's `type` byte does not match any of the nine recognized
    /// result-reconstruction rules. A well-formed dictionary never triggers this;
    /// the original implementation treated it as fatal (`exit(EXIT_FAILURE)`), here
    /// it is a recoverable error instead.
    #[error("cannot interpret dictionary file of type {type_}")]
    UnsupportedType { type_: u8 },
}
