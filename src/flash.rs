use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

impl Level {
    /// Bootstrap alert modifier for the level.
    pub fn css_class(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "danger",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Success => write!(f, "success"),
            Level::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: Level,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

fn pending(jar: &SignedCookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// Queues messages for the next rendered page, after any already pending.
pub fn push(jar: SignedCookieJar, messages: Vec<FlashMessage>) -> SignedCookieJar {
    let mut queued = pending(&jar);
    queued.extend(messages);
    let value = match serde_json::to_string(&queued) {
        Ok(value) => value,
        Err(_) => return jar,
    };
    let cookie = Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Removes and returns the pending messages.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<FlashMessage>) {
    let messages = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, messages)
}
