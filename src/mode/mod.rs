//! Mode changes and their MODE-line encoding.

mod encode;
mod parse;
mod types;

pub use self::encode::{encode_mode_text, mode_params, split_mode_changes, ModeLine};
pub use self::types::{ModeChange, ModeChangeList, ModeLimits, DEFAULT_MODE_TEXT_LEN};
