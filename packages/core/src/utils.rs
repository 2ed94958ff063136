// ABOUTME: Shared utility functions for VibeSpecs
// ABOUTME: ID generation and timestamp helpers

use chrono::{DateTime, Utc};
use rand::Rng;

const ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

fn random_id(prefix: &str, len: usize) -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..ID_CHARSET.len());
            ID_CHARSET[idx] as char
        })
        .collect();
    format!("{}{}", prefix, body)
}

/// Generate a unique project ID (`p_` followed by 12 alphanumerics)
pub fn generate_project_id() -> String {
    random_id("p_", 12)
}

/// Generate a unique user ID (`u_` followed by 12 alphanumerics)
pub fn generate_user_id() -> String {
    random_id("u_", 12)
}

/// Current time truncated to millisecond precision, which is what every
/// storage backend and the wire format keep.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_project_id() {
        let id1 = generate_project_id();
        let id2 = generate_project_id();

        assert_eq!(id1.len(), 14);
        assert!(id1.starts_with("p_"));
        assert_ne!(id1, id2);
        assert!(id1[2..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_user_id() {
        let id = generate_user_id();
        assert!(id.starts_with("u_"));
        assert_eq!(id.len(), 14);
    }

    #[test]
    fn test_now_millis_has_no_sub_millisecond_part() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
