use cask_types::Hash;

/// The digest algorithm a store names its files with.
///
/// Both produce a 256-bit digest with the same wire representation; the
/// choice is per store and must stay fixed for the lifetime of a store
/// directory, since file names are digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// Cryptographic SHA-256.
    #[default]
    Sha256,
    /// Non-cryptographic: two XXH3-128 passes with different seeds,
    /// concatenated. Much faster, for trusted stores only.
    Xxh3Pair,
}

/// Digest `bytes` with the chosen algorithm.
pub fn compute_hash(algorithm: HashAlgorithm, bytes: &[u8]) -> Hash {
    match algorithm {
        HashAlgorithm::Sha256 => {
            use sha2::Digest as _;
            Hash::from_bytes(sha2::Sha256::digest(bytes).into())
        }
        HashAlgorithm::Xxh3Pair => {
            let mut digest = [0_u8; 32];
            let lo = xxhash_rust::xxh3::xxh3_128_with_seed(bytes, 0);
            let hi = xxhash_rust::xxh3::xxh3_128_with_seed(bytes, 1);
            digest[..16].copy_from_slice(&lo.to_be_bytes());
            digest[16..].copy_from_slice(&hi.to_be_bytes());
            Hash::from_bytes(digest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_the_known_empty_digest() {
        assert_eq!(
            compute_hash(HashAlgorithm::Sha256, b"").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digests_are_deterministic_and_content_sensitive() {
        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Xxh3Pair] {
            let a = compute_hash(algorithm, b"some entity bytes");
            let b = compute_hash(algorithm, b"some entity bytes");
            let c = compute_hash(algorithm, b"some entity bytez");
            assert_eq!(a, b);
            assert_ne!(a, c);
            assert!(!a.is_zero());
        }
    }

    #[test]
    fn algorithms_disagree() {
        let bytes = b"abc";
        assert_ne!(
            compute_hash(HashAlgorithm::Sha256, bytes),
            compute_hash(HashAlgorithm::Xxh3Pair, bytes)
        );
    }
}
