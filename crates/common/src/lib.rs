//! Pieces shared by every crate in the workspace: wire-level helper types
//! and tracing setup.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn ack_serializes_message_only() {
        let ack = types::Ack::new("Provider deleted successfully");
        let v = serde_json::to_value(&ack).unwrap();
        assert_eq!(v, serde_json::json!({"message": "Provider deleted successfully"}));
    }
}
