//! Fuzz target for mode string parsing and MODE line splitting
//!
//! Parses arbitrary `+ov-b alice bob *!*@x` style input, then splits the
//! result at a fuzzed line budget and checks every change is carried once.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_clientproto::mode::{split_mode_changes, ModeChangeList, ModeLimits};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Some((&budget, rest)) = data.split_first() else {
        return;
    };
    let Ok(input) = str::from_utf8(rest) else {
        return;
    };
    if input.len() > 2048 {
        return;
    }

    let pieces: Vec<&str> = input.split(' ').collect();
    // Typical channel modes: list/status modes always take a parameter,
    // `k` and `l` only when being set.
    let takes = |c: char, adding: bool| {
        matches!(c, 'b' | 'e' | 'I' | 'o' | 'v') || (adding && matches!(c, 'k' | 'l'))
    };

    let Ok(changes) = ModeChangeList::parse(&pieces, takes) else {
        return;
    };

    let lines = split_mode_changes(&changes, &ModeLimits::with_max_len(usize::from(budget)));
    let mut next = 0;
    for line in &lines {
        assert_eq!(line.range.start, next);
        assert!(line.range.end > line.range.start);
        next = line.range.end;
    }
    assert_eq!(next, changes.len());
});
