//! Value objects - immutable types that represent domain concepts

mod flags;
mod permissions;
mod snowflake;

pub use flags::{MessageFlags, SystemChannelFlags};
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
