//! Configuration for the HTTP runtime

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub bind_addr: String,
    /// Path prefix all endpoints are served under.
    pub root_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
            root_path: "/services".to_owned(),
        }
    }
}

impl HttpConfig {
    /// Root path with a single leading slash and no trailing slash.
    /// An empty result means endpoints are served at the server root.
    #[must_use]
    pub fn normalized_root(&self) -> String {
        let trimmed = self.root_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn with_root(root: &str) -> HttpConfig {
        HttpConfig {
            root_path: root.to_owned(),
            ..HttpConfig::default()
        }
    }

    #[test]
    fn root_is_normalized() {
        assert_eq!(with_root("/services").normalized_root(), "/services");
        assert_eq!(with_root("services/").normalized_root(), "/services");
        assert_eq!(with_root("/ws/v1/").normalized_root(), "/ws/v1");
        assert_eq!(with_root("/").normalized_root(), "");
        assert_eq!(with_root("").normalized_root(), "");
    }
}
