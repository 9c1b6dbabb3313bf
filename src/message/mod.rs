mod constructors;
mod numeric;
mod types;

pub use self::numeric::{codes, Numeric};
pub use self::types::{Message, MessageList, SerializeKey};
