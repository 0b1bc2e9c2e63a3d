// src/pipeline/encode.rs

//! Canonical query encoding and fingerprinting.
//!
//! The encoding sorts parameter names so insertion order never changes the
//! cache key, and expands list values into repeated `name=value` pairs in
//! their own order. The same string is used as the listing request's query.

use sha2::{Digest, Sha256};
use url::form_urlencoded;

use crate::models::{EncodedQuery, Fingerprint, Query};

/// Encode `query` into its canonical `application/x-www-form-urlencoded` form.
pub fn encode(query: &Query) -> EncodedQuery {
    let mut params: Vec<_> = query.params().iter().collect();
    // Stable: a name set twice keeps its relative order
    params.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        for param in value.to_params() {
            serializer.append_pair(name, &param);
        }
    }
    EncodedQuery(serializer.finish())
}

/// Hash an encoded query into its cache key.
pub fn fingerprint(encoded: &EncodedQuery) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(encoded.as_str().as_bytes());
    Fingerprint(hex::encode(hasher.finalize()))
}

/// [`encode`] then [`fingerprint`].
pub fn fingerprint_query(query: &Query) -> (EncodedQuery, Fingerprint) {
    let encoded = encode(query);
    let fp = fingerprint(&encoded);
    (encoded, fp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sorts_names() {
        let query = Query::new()
            .with("text", "Machine learning")
            .with("area", 1)
            .with("per_page", 50);
        assert_eq!(
            encode(&query).as_str(),
            "area=1&per_page=50&text=Machine+learning"
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = Query::new()
            .with("text", "FPGA")
            .with("area", 1)
            .with("professional_role", vec![96i64, 10]);
        let b = Query::new()
            .with("professional_role", vec![96i64, 10])
            .with("area", 1)
            .with("text", "FPGA");

        assert_eq!(encode(&a), encode(&b));
        assert_eq!(fingerprint(&encode(&a)), fingerprint(&encode(&b)));
    }

    #[test]
    fn test_list_order_is_preserved() {
        let a = Query::new().with("professional_role", vec![96i64, 10]);
        let b = Query::new().with("professional_role", vec![10i64, 96]);

        assert_eq!(
            encode(&a).as_str(),
            "professional_role=96&professional_role=10"
        );
        assert_ne!(fingerprint(&encode(&a)), fingerprint(&encode(&b)));
    }

    #[test]
    fn test_different_values_differ() {
        let a = Query::new().with("text", "Rust");
        let b = Query::new().with("text", "rust");
        assert_ne!(fingerprint(&encode(&a)), fingerprint(&encode(&b)));
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let (encoded, fp) = fingerprint_query(&Query::new());
        assert_eq!(encoded.as_str(), "");
        assert_eq!(
            fp.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
