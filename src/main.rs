// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! majka CLI: look up words in, or inspect the header of, a `.fsa`
//! morphological dictionary.
//!
//! ```bash
//! # Look up one or more words
//! majka lookup cs.fsa byt být
//!
//! # Diacritic- and case-insensitive lookup
//! majka lookup --add-diacritics --ignore-case cs.fsa BYT
//!
//! # Inspect a dictionary's header
//! majka inspect cs.fsa
//! ```

use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;

use majka::{Dictionary, Flags};

mod cli;
use cli::display::{
    double_divider, double_footer, double_header, flag_badge, pad_left, pad_right, result_count,
    row, section_bot, section_mid, section_top, styled, themed, title, BOLD, RED,
};
use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lookup {
            dictionary,
            words,
            add_diacritics,
            ignore_case,
            disallow_lowercase,
            echo_misses,
        } => run_lookup(
            &dictionary,
            words,
            build_flags(add_diacritics, ignore_case, disallow_lowercase),
            echo_misses,
        ),
        Commands::Inspect { file } => run_inspect(&file),
    };

    if let Err(message) = result {
        eprintln!("{} {}", themed(RED, &[BOLD], "error:"), message);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn build_flags(add_diacritics: bool, ignore_case: bool, disallow_lowercase: bool) -> u8 {
    let mut flags = 0u8;
    if add_diacritics {
        flags |= Flags::ADD_DIACRITICS;
    }
    if ignore_case {
        flags |= Flags::IGNORE_CASE;
    }
    if disallow_lowercase {
        flags |= Flags::DISALLOW_LOWERCASE;
    }
    flags
}

fn active_flag_badges(flags: u8) -> Vec<String> {
    let mut badges = Vec::new();
    if flags & Flags::ADD_DIACRITICS != 0 {
        badges.push(flag_badge("ADD_DIACRITICS"));
    }
    if flags & Flags::IGNORE_CASE != 0 {
        badges.push(flag_badge("IGNORE_CASE"));
    }
    if flags & Flags::DISALLOW_LOWERCASE != 0 {
        badges.push(flag_badge("DISALLOW_LOWERCASE"));
    }
    badges
}

fn run_lookup(dictionary_path: &str, words: Vec<String>, flags: u8, echo_misses: bool) -> Result<(), String> {
    let dict = Dictionary::open(dictionary_path).map_err(|e| e.to_string())?;

    let words = if words.is_empty() {
        read_stdin_words().map_err(|e| e.to_string())?
    } else {
        words
    };

    double_header();
    title("majka lookup");
    double_divider();
    row(&format!(" dictionary: {}", dictionary_path));
    let badges = active_flag_badges(flags);
    if !badges.is_empty() {
        row(&format!(" flags: {}", badges.join(" ")));
    }
    double_footer();

    for word in &words {
        let results = dict.find(word.as_bytes(), flags).map_err(|e| e.to_string())?;
        print_entry(word, &results, echo_misses);
    }

    Ok(())
}

fn print_entry(word: &str, results: &[Vec<u8>], echo_misses: bool) {
    section_top(&format!("{} [{}]", word, result_count(results.len()).trim()));
    if results.is_empty() {
        if echo_misses {
            row(&format!(" {}", word));
        } else {
            row(&styled(&[], "  (no results)"));
        }
    } else {
        for entry in results {
            row(&format!(" {}", String::from_utf8_lossy(entry)));
        }
    }
    section_bot();
}

fn read_stdin_words() -> io::Result<Vec<String>> {
    let stdin = io::stdin();
    let mut words = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            words.push(trimmed.to_string());
        }
    }
    Ok(words)
}

fn run_inspect(path: &str) -> Result<(), String> {
    let dict = Dictionary::open(path).map_err(|e| e.to_string())?;
    let header = dict.header();

    double_header();
    title("majka dictionary header");
    double_divider();
    section_mid("format");
    row(&format!(" {} format version", pad_left(&header.format_version.to_string(), 3)));
    row(&format!(
        " {}.{} major.minor version",
        header.major_version, header.minor_version
    ));
    row(&format!(" type {}", pad_right(&header.type_.to_string(), 4)));
    section_mid("limits");
    row(&format!(" max_result           {}", header.max_result));
    row(&format!(" max_results_count    {}", header.max_results_count));
    row(&format!(" max_results_size     {}", header.max_results_size()));
    section_mid("compound extension");
    row(&format!(" start1/start2 present: {}", dict.has_compound_roots()));
    double_footer();

    Ok(())
}
