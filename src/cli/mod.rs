// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the majka command-line interface.
//!
//! Two subcommands: `lookup` to query a dictionary for one or more words,
//! and `inspect` to print a dictionary's header fields without running a
//! search.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "majka",
    about = "Morphological dictionary lookup over a compact finite-state automaton",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up one or more words in a dictionary
    Lookup {
        /// Path to the .fsa dictionary file
        dictionary: String,

        /// Words to look up; reads one word per line from stdin if omitted
        words: Vec<String>,

        /// Broaden matching to accept diacritic-folded letters
        #[arg(short = 'd', long)]
        add_diacritics: bool,

        /// Broaden matching to be case-insensitive
        #[arg(short = 'i', long)]
        ignore_case: bool,

        /// Don't retry a failed exact match with the leading letter lowercased
        #[arg(short = 'c', long)]
        disallow_lowercase: bool,

        /// Echo the input word back when a lookup finds nothing, instead of
        /// omitting that word from the output (the `find_all` batch policy)
        #[arg(long)]
        echo_misses: bool,
    },

    /// Print a dictionary's header fields
    Inspect {
        /// Path to the .fsa dictionary file
        file: String,
    },
}
