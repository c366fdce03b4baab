//! IP and user-agent access lists.
//!
//! Empty allow-lists permit everything; the blacklist always applies.

use std::collections::HashSet;

use crate::security::client::ClientKey;

pub fn is_blacklisted(blacklist: &HashSet<String>, client: &ClientKey) -> bool {
    blacklist.contains(client.as_str())
}

pub fn is_whitelisted(whitelist: &HashSet<String>, client: &ClientKey) -> bool {
    whitelist.is_empty() || whitelist.contains(client.as_str())
}

/// True if no agents are configured or one of them is a substring of
/// `user_agent`.
pub fn is_user_agent_allowed(allowed: &[String], user_agent: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|agent| user_agent.contains(agent.as_str()))
}
