//! System prompt fingerprinting.
//!
//! Brains log the fingerprint of their system prompt at startup so that
//! transcripts can be matched to the prompt revision that produced them.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 hex fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::hash_prompt;

    #[test]
    fn test_hash_prompt_stable() {
        let first = hash_prompt("You are a helpful assistant.");
        let second = hash_prompt("You are a helpful assistant.");
        let different = hash_prompt("You are a terse assistant.");

        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 64);
    }
}
