//! Resolver trait (port) - the cache the model layer delegates to
//!
//! Entities only store the ids of related entities. Whatever owns the
//! client's entity cache implements this trait: the `parse_*` operations
//! decode a nested payload *and* register the result, the `resolve_*`
//! operations look an entity up by id. Neither kind may perform network I/O.
//!
//! The resolver is passed explicitly into every decode call and accessor, so
//! independent client sessions can use independent caches.

use std::sync::Arc;

use crate::entities::{Channel, Emoji, Guild, Member, Role, User};
use crate::error::ModelResult;
use crate::payload::Payload;
use crate::value_objects::Snowflake;

pub trait ModelResolver: Send + Sync {
    /// Decode and register a user
    fn parse_user(&self, payload: &Payload) -> ModelResult<Arc<User>>;

    /// Decode and register a role belonging to `guild_id`
    fn parse_role(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Role>>;

    /// Decode and register a custom emoji belonging to `guild_id`
    fn parse_emoji(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Emoji>>;

    /// Decode and register a member of `guild_id`
    fn parse_member(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Member>>;

    /// Decode and register a channel, inside `guild_id` when given
    fn parse_channel(
        &self,
        payload: &Payload,
        guild_id: Option<Snowflake>,
    ) -> ModelResult<Arc<Channel>>;

    /// Look up a known user
    fn resolve_user(&self, id: Snowflake) -> ModelResult<Arc<User>>;

    /// Look up a known guild
    fn resolve_guild(&self, id: Snowflake) -> ModelResult<Arc<Guild>>;

    /// Look up a known direct-message channel
    fn resolve_dm_channel(&self, id: Snowflake) -> ModelResult<Arc<Channel>>;
}
