use std::fmt;
use std::ops::Deref;

use crate::util::DEFAULT_MAX_MODES;

/// Default byte budget for the mode text of one MODE line (letters, signs,
/// separators and parameters), leaving room for source, command and target
/// within a 512-byte line.
pub const DEFAULT_MODE_TEXT_LEN: usize = 450;

/// A single `+x`/`-x` mode change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChange {
    /// Mode character, e.g. `o`.
    pub letter: char,
    /// True for `+`, false for `-`.
    pub adding: bool,
    /// Parameter, e.g. the nickname for `+o`.
    pub param: Option<String>,
}

impl ModeChange {
    /// Create a change.
    pub fn new(letter: char, adding: bool, param: Option<String>) -> Self {
        ModeChange { letter, adding, param }
    }

    /// A `+letter` change.
    pub fn plus(letter: char, param: Option<&str>) -> Self {
        Self::new(letter, true, param.map(str::to_string))
    }

    /// A `-letter` change.
    pub fn minus(letter: char, param: Option<&str>) -> Self {
        Self::new(letter, false, param.map(str::to_string))
    }

    /// `+` or `-`.
    pub fn sign(&self) -> char {
        if self.adding {
            '+'
        } else {
            '-'
        }
    }

    /// The parameter, treating an empty string as absent.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref().filter(|p| !p.is_empty())
    }
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign(), self.letter)?;
        if let Some(p) = self.param() {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}

/// The ordered changes produced by one mode operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChangeList(Vec<ModeChange>);

impl ModeChangeList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change.
    pub fn push(&mut self, change: ModeChange) -> &mut Self {
        self.0.push(change);
        self
    }

    /// Append a `+letter` change.
    pub fn push_add(&mut self, letter: char, param: Option<&str>) -> &mut Self {
        self.push(ModeChange::plus(letter, param))
    }

    /// Append a `-letter` change.
    pub fn push_remove(&mut self, letter: char, param: Option<&str>) -> &mut Self {
        self.push(ModeChange::minus(letter, param))
    }

    /// Remove all changes.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Consume the list.
    pub fn into_vec(self) -> Vec<ModeChange> {
        self.0
    }
}

impl Deref for ModeChangeList {
    type Target = [ModeChange];

    fn deref(&self) -> &[ModeChange] {
        &self.0
    }
}

impl From<Vec<ModeChange>> for ModeChangeList {
    fn from(changes: Vec<ModeChange>) -> Self {
        ModeChangeList(changes)
    }
}

impl FromIterator<ModeChange> for ModeChangeList {
    fn from_iter<I: IntoIterator<Item = ModeChange>>(iter: I) -> Self {
        ModeChangeList(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ModeChangeList {
    type Item = &'a ModeChange;
    type IntoIter = std::slice::Iter<'a, ModeChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Limits applied when splitting a change list into MODE lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModeLimits {
    /// Byte budget for mode text per line.
    pub max_len: usize,
    /// Maximum changes per line (ISUPPORT `MODES`); `None` for no cap.
    pub max_changes: Option<usize>,
}

impl Default for ModeLimits {
    fn default() -> Self {
        ModeLimits {
            max_len: DEFAULT_MODE_TEXT_LEN,
            max_changes: Some(DEFAULT_MAX_MODES),
        }
    }
}

impl ModeLimits {
    /// Only a byte budget, no per-line change cap.
    pub fn with_max_len(max_len: usize) -> Self {
        ModeLimits {
            max_len,
            max_changes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_param_is_absent() {
        let c = ModeChange::new('k', true, Some(String::new()));
        assert_eq!(c.param(), None);
        assert_eq!(c.to_string(), "+k");
    }

    #[test]
    fn test_display() {
        assert_eq!(ModeChange::plus('o', Some("alice")).to_string(), "+o alice");
        assert_eq!(ModeChange::minus('m', None).to_string(), "-m");
    }

    #[test]
    fn test_list_builders() {
        let mut list = ModeChangeList::new();
        list.push_add('o', Some("alice")).push_remove('v', Some("bob"));
        assert_eq!(list.len(), 2);
        assert!(list[0].adding);
        assert!(!list[1].adding);
        let letters: String = list.iter().map(|c| c.letter).collect();
        assert_eq!(letters, "ov");
    }
}
