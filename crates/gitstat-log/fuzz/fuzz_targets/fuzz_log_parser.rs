// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the log parser
//!
//! Feeds arbitrary text through `LogParser` line by line. The parser may
//! reject input but must never panic, and every emitted file entry must
//! balance.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gitstat_log::LogParser;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut parser = LogParser::new();
        let mut records = Vec::new();

        for line in input.lines() {
            match parser.push_line(line) {
                Ok(record) => records.extend(record),
                Err(_) => break,
            }
        }

        if let Ok(record) = parser.finish() {
            records.extend(record);
        }

        for record in &records {
            for change in record.file_map.values() {
                assert_eq!(change.num_inserts + change.num_deletes, change.total_changes);
            }
        }
    }
});
