//! Well-known tag keys and defaults.
//!
//! The naming engine only ever writes [`NAME_TAG`] and only ever reads [`GROUP_TAG`]
//! besides it.

/// Tag key holding the human-readable instance name.
pub const NAME_TAG: &str = "Name";

/// Tag key carrying the name of the scaling group the instance belongs to.
///
/// Its value becomes the name prefix under [`crate::NamingPolicy::GroupPrefix`].
pub const GROUP_TAG: &str = "aws:autoscaling:groupName";

/// Number of failed attempts tolerated by the allocation loop unless configured otherwise.
pub const DEFAULT_RETRIES: u32 = 10;
