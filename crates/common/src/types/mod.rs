use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/health`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
}

impl Health {
    pub fn ok(environment: &str) -> Self {
        Self { status: "ok".into(), environment: environment.into(), timestamp: Utc::now() }
    }
}
