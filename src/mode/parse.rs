//! Mode string parsing.

use crate::error::ModeParseError;

use super::types::{ModeChange, ModeChangeList};

impl ModeChangeList {
    /// Parse `+o-v alice bob` style pieces into a change list.
    ///
    /// `pieces[0]` holds the letters and signs; the rest are parameters,
    /// consumed left to right by every letter for which
    /// `takes_param(letter, adding)` is true.
    ///
    /// ```
    /// use slirc_clientproto::mode::ModeChangeList;
    ///
    /// let takes = |c: char, adding: bool| matches!(c, 'o' | 'v' | 'b') || (c == 'l' && adding);
    /// let list = ModeChangeList::parse(&["+ol-l", "alice", "10"], takes).unwrap();
    /// assert_eq!(list.len(), 3);
    /// assert_eq!(list[2].param, None);
    /// ```
    pub fn parse<F>(pieces: &[&str], takes_param: F) -> Result<Self, ModeParseError>
    where
        F: Fn(char, bool) -> bool,
    {
        let mut res = ModeChangeList::new();

        let Some((first, rest)) = pieces.split_first() else {
            return Ok(res);
        };
        let mut letters = first.chars();
        let mut args = rest.iter().copied();

        let mut adding = match letters.next() {
            Some('+') => true,
            Some('-') => false,
            Some(_) => return Err(ModeParseError::MissingModeModifier),
            None => return Ok(res),
        };

        for c in letters {
            match c {
                '+' => adding = true,
                '-' => adding = false,
                _ => {
                    let param = if takes_param(c, adding) {
                        match args.next() {
                            Some(arg) => Some(arg.to_string()),
                            None => return Err(ModeParseError::MissingParameter(c)),
                        }
                    } else {
                        None
                    };
                    res.push(ModeChange::new(c, adding, param));
                }
            }
        }

        if args.next().is_some() {
            return Err(ModeParseError::UnusedParameters);
        }

        Ok(res)
    }
}
