use crate::models::LinkMap;
use rand::RngCore;

/// Random bytes per generated code; hex encoding doubles this to 8 characters.
const CODE_BYTES: usize = 4;

/// Draws before giving up on finding a free generated code.
pub const MAX_ATTEMPTS: usize = 16;

/// Generate a random short code: 4 random bytes as 8 lowercase hex characters.
pub fn random_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Generate a code that is not yet a key of `links`.
///
/// Returns `None` only if every one of the `MAX_ATTEMPTS` draws collided.
pub fn unique_code(links: &LinkMap) -> Option<String> {
    (0..MAX_ATTEMPTS)
        .map(|_| random_code())
        .find(|code| !links.contains_key(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(code: &str) -> bool {
        code.chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn random_code_is_eight_hex_chars() {
        for _ in 0..100 {
            let code = random_code();
            assert_eq!(code.len(), 8, "unexpected code {code}");
            assert!(is_lower_hex(&code), "unexpected code {code}");
        }
    }

    #[test]
    fn unique_code_avoids_existing_keys() {
        let mut links = LinkMap::new();
        for _ in 0..50 {
            let code = unique_code(&links).unwrap();
            assert!(!links.contains_key(&code));
            links.insert(code, "https://example.com".into());
        }
        assert_eq!(links.len(), 50);
    }
}
