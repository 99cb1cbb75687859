use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),
}

pub(crate) fn base64url_encode(input: Vec<u8>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    Ok(base64url_encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_random_string_length() {
        // 32 random bytes encode to 43 base64url characters without padding
        let s = gen_random_string(32).expect("random generation should succeed");
        assert_eq!(s.len(), 43);
    }

    #[test]
    fn test_gen_random_string_uniqueness() {
        let a = gen_random_string(32).expect("random generation should succeed");
        let b = gen_random_string(32).expect("random generation should succeed");
        assert_ne!(a, b, "two random strings must not collide");
    }

    #[test]
    fn test_encoding_is_url_safe_without_padding() {
        // 0xfb 0xff forces '+'/'/' in standard base64 and '=' padding
        let encoded = base64url_encode(vec![0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert!(!encoded.contains(['+', '/', '=']));
    }
}
