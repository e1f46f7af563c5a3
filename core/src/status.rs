//! Accepted status-code sets.
//!
//! A call succeeds when the response status is in the set built from the
//! verb's default and the call site's `ExpectedStatus`.

use crate::http::HttpMethod;

/// What a call site is willing to treat as success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExpectedStatus {
    /// The verb's default set.
    #[default]
    Default,
    /// The verb's default set plus these codes.
    Also(Vec<u16>),
    /// Exactly these codes; the verb default does not apply.
    Only(Vec<u16>),
}

impl ExpectedStatus {
    pub fn also(codes: impl IntoIterator<Item = u16>) -> Self {
        ExpectedStatus::Also(codes.into_iter().collect())
    }

    pub fn only(codes: impl IntoIterator<Item = u16>) -> Self {
        ExpectedStatus::Only(codes.into_iter().collect())
    }

    pub fn accepts(&self, defaults: &StatusDefaults, method: HttpMethod, status: u16) -> bool {
        match self {
            ExpectedStatus::Default => defaults.for_method(method).contains(&status),
            ExpectedStatus::Also(extra) => {
                defaults.for_method(method).contains(&status) || extra.contains(&status)
            }
            ExpectedStatus::Only(codes) => codes.contains(&status),
        }
    }
}

/// Default accepted codes per verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDefaults {
    pub get: Vec<u16>,
    pub post: Vec<u16>,
    pub patch: Vec<u16>,
}

impl Default for StatusDefaults {
    fn default() -> Self {
        Self {
            get: vec![200],
            post: vec![200, 201],
            patch: vec![200],
        }
    }
}

impl StatusDefaults {
    pub fn for_method(&self, method: HttpMethod) -> &[u16] {
        match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Post => &self.post,
            HttpMethod::Patch => &self.patch,
        }
    }
}
