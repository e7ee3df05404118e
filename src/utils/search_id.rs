//! Search session id generation

use chrono::Utc;
use rand::Rng;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a search id: base36 of `(unix_millis << 64) + random(0..2147483646)`
pub fn search_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let salt = rand::thread_rng().gen_range(0..2_147_483_646_u32) as u128;
    base36((millis << 64) + salt)
}

/// Lowercase base36 encoding
pub fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1_295), "zz");
    }

    #[test]
    fn test_search_id_shape() {
        let id = search_id();
        assert!(id.len() >= 20);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_search_ids_differ() {
        let ids: std::collections::HashSet<String> = (0..16).map(|_| search_id()).collect();
        assert!(ids.len() > 1);
    }
}
