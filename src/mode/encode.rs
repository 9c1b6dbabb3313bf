//! MODE text encoding and line splitting.

use std::ops::Range;

use super::types::{ModeChange, ModeLimits};

/// Encode `changes[start..]` as mode letters, stopping before the first
/// change that would push the line past `max_len`.
///
/// Signs are emitted once per run of same-direction changes (`+ov-b`). The
/// length charged for a line is the letters and signs plus, for every
/// carried change with a parameter, the parameter and its separating space.
///
/// Returns the letters and the index of the first change not carried,
/// which is `changes.len()` when everything fit. The change at `start` is
/// always carried, even if it alone exceeds `max_len`, so repeated calls
/// from the returned index always reach the end.
///
/// # Example
///
/// ```
/// use slirc_clientproto::mode::{encode_mode_text, ModeChange};
///
/// let changes = [
///     ModeChange::plus('o', Some("alice")),
///     ModeChange::plus('v', Some("bob")),
///     ModeChange::minus('b', Some("*!*@x")),
/// ];
/// assert_eq!(encode_mode_text(&changes, 0, 100), ("+ov-b".to_string(), 3));
/// assert_eq!(encode_mode_text(&changes, 0, 15), ("+ov".to_string(), 2));
/// ```
pub fn encode_mode_text(changes: &[ModeChange], start: usize, max_len: usize) -> (String, usize) {
    let mut output = String::new();
    let mut param_len = 0;
    let mut active_sign = None;

    let mut i = start;
    while i < changes.len() {
        let change = &changes[i];

        let needed = change.sign();
        if active_sign != Some(needed) {
            active_sign = Some(needed);
            output.push(needed);
        }

        if let Some(p) = change.param() {
            param_len += p.len() + 1;
        }

        if i > start && output.len() + 1 + param_len > max_len {
            if output.ends_with(['+', '-']) {
                output.pop();
            }
            break;
        }

        output.push(change.letter);
        i += 1;
    }

    (output, i)
}

/// Parameters of `changes`, in order, skipping changes without one.
pub fn mode_params(changes: &[ModeChange]) -> impl Iterator<Item = &str> {
    changes.iter().filter_map(ModeChange::param)
}

/// One encoded MODE line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeLine {
    /// Mode letters and signs, e.g. `+ov-b`.
    pub letters: String,
    /// The changes this line carries.
    pub range: Range<usize>,
}

/// Split a whole change list into lines respecting `limits`.
///
/// Every change lands on exactly one line, in the original order.
pub fn split_mode_changes(changes: &[ModeChange], limits: &ModeLimits) -> Vec<ModeLine> {
    let mut lines = Vec::new();
    let mut start = 0;

    while start < changes.len() {
        let end = match limits.max_changes {
            Some(n) if n > 0 => changes.len().min(start + n),
            _ => changes.len(),
        };
        let (letters, resume) = encode_mode_text(&changes[..end], start, limits.max_len);
        lines.push(ModeLine {
            letters,
            range: start..resume,
        });
        start = resume;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ModeChange> {
        vec![
            ModeChange::plus('o', Some("alice")),
            ModeChange::plus('v', Some("bob")),
            ModeChange::minus('b', Some("*!*@x")),
        ]
    }

    /// Length of the full mode text for a carried range.
    fn text_len(letters: &str, changes: &[ModeChange]) -> usize {
        letters.len() + mode_params(changes).map(|p| p.len() + 1).sum::<usize>()
    }

    #[test]
    fn test_everything_fits() {
        let changes = sample();
        let (letters, resume) = encode_mode_text(&changes, 0, 512);
        assert_eq!(letters, "+ov-b");
        assert_eq!(resume, 3);
        let params: Vec<_> = mode_params(&changes).collect();
        assert_eq!(params, ["alice", "bob", "*!*@x"]);
    }

    #[test]
    fn test_exact_boundary() {
        let changes = sample();
        // "+ov-b alice bob *!*@x" is 21 bytes.
        assert_eq!(encode_mode_text(&changes, 0, 21), ("+ov-b".into(), 3));
        assert_eq!(encode_mode_text(&changes, 0, 20), ("+ov".into(), 2));
    }

    #[test]
    fn test_dangling_sign_trimmed() {
        let changes = sample();
        for max_len in 13..=20 {
            let (letters, resume) = encode_mode_text(&changes, 0, max_len);
            assert_eq!(letters, "+ov", "max_len {max_len}");
            assert_eq!(resume, 2);
        }
    }

    #[test]
    fn test_stop_without_sign_change() {
        let changes = sample();
        // "+ov alice bob" is 13 bytes; 12 only fits the first change.
        assert_eq!(encode_mode_text(&changes, 0, 12), ("+o".into(), 1));
    }

    #[test]
    fn test_resume_from_middle() {
        let changes = sample();
        assert_eq!(encode_mode_text(&changes, 2, 512), ("-b".into(), 3));
        assert_eq!(encode_mode_text(&changes, 1, 512), ("+v-b".into(), 3));
    }

    #[test]
    fn test_first_change_always_carried() {
        let changes = sample();
        assert_eq!(encode_mode_text(&changes, 0, 1), ("+o".into(), 1));
        assert_eq!(encode_mode_text(&changes, 2, 0), ("-b".into(), 3));
    }

    #[test]
    fn test_start_past_end() {
        let changes = sample();
        assert_eq!(encode_mode_text(&changes, 3, 100), (String::new(), 3));
        assert_eq!(encode_mode_text(&[], 0, 100), (String::new(), 0));
    }

    #[test]
    fn test_sign_runs_collapse() {
        let changes = vec![
            ModeChange::plus('i', None),
            ModeChange::plus('m', None),
            ModeChange::minus('n', None),
            ModeChange::minus('t', None),
            ModeChange::plus('s', None),
        ];
        assert_eq!(encode_mode_text(&changes, 0, 100), ("+im-nt+s".into(), 5));
    }

    #[test]
    fn test_length_never_exceeds_budget() {
        let changes: Vec<_> = (0..30)
            .map(|i| {
                if i % 3 == 0 {
                    ModeChange::minus('b', Some(&format!("mask{i}!*@host")))
                } else {
                    ModeChange::plus('v', Some(&format!("nick{i}")))
                }
            })
            .collect();

        for max_len in 20..120 {
            let mut start = 0;
            while start < changes.len() {
                let (letters, resume) = encode_mode_text(&changes, start, max_len);
                assert!(resume > start);
                if resume - start > 1 {
                    assert!(text_len(&letters, &changes[start..resume]) <= max_len);
                }
                start = resume;
            }
        }
    }

    #[test]
    fn test_split_with_change_cap() {
        let changes: Vec<_> = "abcdefg".chars().map(|c| ModeChange::plus(c, None)).collect();
        let limits = ModeLimits {
            max_len: 512,
            max_changes: Some(3),
        };
        let lines = split_mode_changes(&changes, &limits);
        let letters: Vec<_> = lines.iter().map(|l| l.letters.as_str()).collect();
        assert_eq!(letters, ["+abc", "+def", "+g"]);
        assert_eq!(lines[2].range, 6..7);
    }

    #[test]
    fn test_split_by_length() {
        let changes = sample();
        let lines = split_mode_changes(&changes, &ModeLimits::with_max_len(13));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].letters, "+ov");
        assert_eq!(lines[1].letters, "-b");
        assert_eq!(lines[1].range, 2..3);
    }
}
