pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_payload_shape() {
        let h = types::Health::ok("development");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["environment"], "development");
        assert!(v["timestamp"].is_string());
    }
}
