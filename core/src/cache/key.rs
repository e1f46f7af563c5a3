use sha2::{Digest, Sha256};

use crate::http::{HttpMethod, Query};

pub const KEY_PREFIX: &str = "cinema_request_";

/// Derives cache keys for read requests.
///
/// The key covers method, path and query. Query pairs are sorted first so
/// call-site ordering does not matter. Components are JSON-encoded before
/// hashing, which keeps `("a", "b=c")` and `("a=b", "c")` apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_key(&self, method: HttpMethod, path: &str, query: &Query) -> String {
        let canonical = serde_json::json!([method.as_str(), path, query.sorted()]);
        let digest = Sha256::digest(canonical.to_string().as_bytes());
        format!("{KEY_PREFIX}{digest:x}")
    }
}
