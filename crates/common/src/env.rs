//! Environment/runtime helpers
//!
//! Sanity checks run at startup before the listener is bound.

use tracing::{info, warn};

/// Check the static client bundle directory. Returns whether it can be served.
pub async fn check_static_dir(static_dir: &str) -> bool {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if meta.is_dir() => {
            info!(%static_dir, "static client assets found");
            true
        }
        _ => {
            warn!(%static_dir, "static client directory not found; only the API will be served");
            false
        }
    }
}

/// Names of required variables that are unset or blank.
pub fn missing_vars<F>(required: &[&str], lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    required
        .iter()
        .filter(|name| lookup(name).map(|v| v.trim().is_empty()).unwrap_or(true))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_unset_and_blank_vars() {
        let lookup = |k: &str| match k {
            "DATABASE_URL" => Some("postgres://x".to_string()),
            "PORT" => Some("  ".to_string()),
            _ => None,
        };
        let missing = missing_vars(&["DATABASE_URL", "PORT", "HOST"], lookup);
        assert_eq!(missing, vec!["PORT".to_string(), "HOST".to_string()]);
    }

    #[tokio::test]
    async fn missing_static_dir_is_not_servable() {
        assert!(!check_static_dir("/definitely/not/here").await);
    }
}
