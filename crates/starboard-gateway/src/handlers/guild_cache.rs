//! Per-server role permissions, kept from GUILD_CREATE and role events
//!
//! Text commands carry only the author's role ids, so the author's server
//! permissions are computed from this cache.

use std::collections::HashMap;

use dashmap::DashMap;
use starboard_core::Permissions;

use crate::events::{GuildCreateEvent, GuildRole};

#[derive(Debug, Default)]
struct GuildInfo {
    owner_id: Option<String>,
    roles: HashMap<String, Permissions>,
}

/// Guild cache
#[derive(Debug, Default)]
pub struct GuildCache {
    guilds: DashMap<String, GuildInfo>,
}

impl GuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, guild: &GuildCreateEvent) {
        let info = GuildInfo {
            owner_id: guild.owner_id.clone(),
            roles: guild
                .roles
                .iter()
                .map(|r| (r.id.clone(), r.permissions))
                .collect(),
        };
        self.guilds.insert(guild.id.clone(), info);
    }

    pub fn remove(&self, guild_id: &str) {
        self.guilds.remove(guild_id);
    }

    pub fn upsert_role(&self, guild_id: &str, role: &GuildRole) {
        if let Some(mut info) = self.guilds.get_mut(guild_id) {
            info.roles.insert(role.id.clone(), role.permissions);
        }
    }

    pub fn remove_role(&self, guild_id: &str, role_id: &str) {
        if let Some(mut info) = self.guilds.get_mut(guild_id) {
            info.roles.remove(role_id);
        }
    }

    pub fn contains(&self, guild_id: &str) -> bool {
        self.guilds.contains_key(guild_id)
    }

    /// Server-wide permissions of a member: the owner has all of them,
    /// everyone else gets `@everyone` (the role sharing the guild id) plus
    /// their own roles.
    pub fn permissions_for(&self, guild_id: &str, user_id: &str, member_roles: &[String]) -> Permissions {
        let Some(info) = self.guilds.get(guild_id) else {
            return Permissions::empty();
        };

        if info.owner_id.as_deref() == Some(user_id) {
            return Permissions::all();
        }

        let everyone = info.roles.get(guild_id).copied().unwrap_or_default();
        member_roles
            .iter()
            .filter_map(|id| info.roles.get(id))
            .fold(everyone, |acc, perms| acc | *perms)
    }
}
