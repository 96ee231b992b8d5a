use sha2::{Digest, Sha256};

/// Content-derived id for generated records: the first 32 hex characters
/// of the SHA-256 of the trimmed text.
pub fn text_hash(text: &str) -> String {
    let digest = Sha256::digest(text.trim().as_bytes());
    hex::encode(&digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_hash_trims() {
        assert_eq!(text_hash("  привет мир \n"), text_hash("привет мир"));
        assert_eq!(text_hash("abc").len(), 32);
        assert_ne!(text_hash("abc"), text_hash("abd"));
    }

    #[test]
    fn test_text_hash_known_value() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
        assert_eq!(text_hash("abc"), "ba7816bf8f01cfea414140de5dae2223");
    }
}
