//! Ban entity - a user banned from a guild

use std::sync::Arc;

use crate::error::ModelResult;
use crate::payload::{Fields, Payload};
use crate::traits::ModelResolver;

use super::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ban {
    pub user: Arc<User>,
    pub reason: Option<String>,
}

impl Ban {
    /// Decode a ban payload; the banned user is registered with the resolver
    pub fn from_payload<R>(resolver: &R, payload: &Payload) -> ModelResult<Self>
    where
        R: ModelResolver + ?Sized,
    {
        let f = Fields::new(payload);
        Ok(Self {
            user: f.nested("user", |user| resolver.parse_user(user))?,
            reason: f.opt_string("reason")?,
        })
    }
}
