//! Protocol addresses and phone number normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Server part of an individual user's JID.
pub const USER_SERVER: &str = "s.whatsapp.net";

/// Server part of a group JID.
pub const GROUP_SERVER: &str = "g.us";

/// A WhatsApp protocol address in `user@server` form.
///
/// # Examples
///
/// ```
/// use wasend_core::Jid;
///
/// let jid = Jid::new("5511999887766", "s.whatsapp.net");
/// assert_eq!(jid.user(), "5511999887766");
/// assert!(!jid.is_group());
/// assert_eq!(jid.to_string(), "5511999887766@s.whatsapp.net");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jid(String);

impl Jid {
    /// Create a JID from a user and server part.
    pub fn new(user: &str, server: &str) -> Self {
        Self(format!("{user}@{server}"))
    }

    /// Parse a JID that already carries a server part.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.split_once('@') {
            Some((user, server)) if !user.is_empty() && !server.is_empty() => {
                Some(Self(s.to_string()))
            }
            _ => None,
        }
    }

    /// Get the user portion of the JID.
    pub fn user(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    /// Get the server portion of the JID.
    pub fn server(&self) -> &str {
        self.0.split_once('@').map(|(_, s)| s).unwrap_or("")
    }

    /// Whether this JID addresses a group chat.
    pub fn is_group(&self) -> bool {
        self.server() == GROUP_SERVER
    }

    /// Get the full JID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalize a phone number or group id into a JID.
///
/// Input that already contains `@` is taken verbatim. Individual numbers
/// keep only their digits; group ids keep digits and `-` so legacy
/// `creator-timestamp` ids survive.
///
/// ```
/// use wasend_core::phone_to_jid;
///
/// let jid = phone_to_jid("+55 (11) 99988-7766", false).unwrap();
/// assert_eq!(jid.as_str(), "5511999887766@s.whatsapp.net");
///
/// let group = phone_to_jid("120363001234567890", true).unwrap();
/// assert!(group.is_group());
/// ```
pub fn phone_to_jid(number: &str, is_group: bool) -> Result<Jid> {
    if number.contains('@') {
        return Jid::parse(number).ok_or_else(|| Error::InvalidAddress(number.to_string()));
    }

    let user: String = if is_group {
        number
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '-')
            .collect()
    } else {
        number.chars().filter(char::is_ascii_digit).collect()
    };

    if user.trim_matches('-').is_empty() {
        return Err(Error::InvalidAddress(number.to_string()));
    }

    let server = if is_group { GROUP_SERVER } else { USER_SERVER };
    Ok(Jid::new(&user, server))
}

/// Rewrite a local individual number (leading `0`) to international form.
///
/// Numbers that already carry a server part, or do not start with `0`
/// once formatting characters are ignored, are returned unchanged.
pub(crate) fn localize(number: &str, country_code: &str) -> String {
    if number.contains('@') {
        return number.to_string();
    }
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let code: String = country_code.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('0') {
        Some(rest) if !code.is_empty() && !number.trim_start().starts_with('+') => {
            format!("{code}{rest}")
        }
        _ => number.to_string(),
    }
}
