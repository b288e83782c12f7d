//! Signing Module — Kraken `API-Sign` computation
//!
//! `API-Sign = base64(HMAC-SHA512(base64decode(secret), path || SHA256(nonce || postdata)))`
//!
//! `postdata` is the form-encoded parameter string. It must be byte-for-byte
//! the body that goes on the wire, otherwise Kraken rejects the signature.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::form::FormParams;

type HmacSha512 = Hmac<Sha512>;

/// Parameter carrying the nonce; its value is also prefixed to the digest input.
pub const NONCE_FIELD: &str = "nonce";

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Compute the `API-Sign` value for `params` posted to `path`.
///
/// `secret_b64` is the API secret exactly as Kraken issues it (base64).
pub fn sign(path: &str, params: &FormParams, secret_b64: &str) -> Result<String, SigningError> {
    let nonce = params.get(NONCE_FIELD).ok_or(SigningError::MissingNonce)?;
    sign_encoded(path, nonce, &params.encode(), secret_b64)
}

fn sign_encoded(
    path: &str,
    nonce: &str,
    encoded_params: &str,
    secret_b64: &str,
) -> Result<String, SigningError> {
    let key = STANDARD
        .decode(secret_b64)
        .map_err(|_| SigningError::InvalidSecret)?;

    let digest = Sha256::new()
        .chain_update(nonce.as_bytes())
        .chain_update(encoded_params.as_bytes())
        .finalize();

    let mut mac = HmacSha512::new_from_slice(&key).map_err(|_| SigningError::InvalidSecret)?;
    mac.update(path.as_bytes());
    mac.update(&digest);

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

// ---------------------------------------------------------------------------
// Sealed request
// ---------------------------------------------------------------------------

/// A parameter set frozen together with its signature.
///
/// `encoded_params` is the string that was hashed and must be sent as the
/// request body unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub nonce: String,
    pub encoded_params: String,
    /// Base64 `API-Sign` header value
    pub signature: String,
}

impl SignedEnvelope {
    /// Encode `params` once and sign that exact encoding.
    pub fn seal(path: &str, params: &FormParams, secret_b64: &str) -> Result<Self, SigningError> {
        let nonce = params
            .get(NONCE_FIELD)
            .ok_or(SigningError::MissingNonce)?
            .to_owned();
        let encoded_params = params.encode();
        let signature = sign_encoded(path, &nonce, &encoded_params, secret_b64)?;

        Ok(Self {
            nonce,
            encoded_params,
            signature,
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Signing module errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("API secret is not valid base64")]
    InvalidSecret,

    #[error("Request parameters carry no nonce")]
    MissingNonce,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ADD_ORDER_PATH: &str = "/0/private/AddOrder";

    // Published example from Kraken's REST authentication guide.
    const DOC_SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";
    const DOC_SIGNATURE: &str =
        "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ==";

    fn doc_params() -> FormParams {
        [
            ("nonce", "1616492376594"),
            ("ordertype", "limit"),
            ("pair", "XBTUSD"),
            ("price", "37500"),
            ("type", "buy"),
            ("volume", "1.25"),
        ]
        .into_iter()
        .collect()
    }

    fn sample_params(nonce: &str) -> FormParams {
        let mut params = FormParams::new();
        params
            .append("nonce", nonce)
            .append("pair", "XBTUSD")
            .append("type", "buy")
            .append("ordertype", "market")
            .append("volume", "0.01")
            .append("validate", "true");
        params
    }

    #[test]
    fn test_vector_kraken_documentation() {
        let params = doc_params();
        assert_eq!(
            params.encode(),
            "nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25"
        );
        assert_eq!(sign(ADD_ORDER_PATH, &params, DOC_SECRET).unwrap(), DOC_SIGNATURE);
    }

    #[test]
    fn test_signature_deterministic() {
        let a = sign(ADD_ORDER_PATH, &sample_params("1"), DOC_SECRET).unwrap();
        let b = sign(ADD_ORDER_PATH, &sample_params("1"), DOC_SECRET).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_length() {
        let sig = sign(ADD_ORDER_PATH, &sample_params("1"), DOC_SECRET).unwrap();
        // 64-byte HMAC-SHA512 = 88 base64 chars with padding
        assert_eq!(sig.len(), 88);
        assert_eq!(STANDARD.decode(&sig).unwrap().len(), 64);
    }

    #[test]
    fn test_signature_changes_with_nonce() {
        let a = sign(ADD_ORDER_PATH, &sample_params("1616492376594"), DOC_SECRET).unwrap();
        let b = sign(ADD_ORDER_PATH, &sample_params("1616492376595"), DOC_SECRET).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_signature_changes_with_path() {
        let a = sign(ADD_ORDER_PATH, &sample_params("1"), DOC_SECRET).unwrap();
        let b = sign("/0/private/CancelOrder", &sample_params("1"), DOC_SECRET).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let a = sign(ADD_ORDER_PATH, &sample_params("1"), DOC_SECRET).unwrap();
        let b = sign(ADD_ORDER_PATH, &sample_params("1"), "c2VjcmV0").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_signature_changes_with_param_order() {
        let mut reordered = FormParams::new();
        reordered
            .append("nonce", "1")
            .append("type", "buy")
            .append("pair", "XBTUSD")
            .append("ordertype", "market")
            .append("volume", "0.01")
            .append("validate", "true");
        let a = sign(ADD_ORDER_PATH, &sample_params("1"), DOC_SECRET).unwrap();
        let b = sign(ADD_ORDER_PATH, &reordered, DOC_SECRET).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_secret_rejected() {
        assert_eq!(
            sign(ADD_ORDER_PATH, &sample_params("1"), "not base64!"),
            Err(SigningError::InvalidSecret)
        );
    }

    #[test]
    fn test_missing_nonce_rejected() {
        let params: FormParams = [("pair", "XBTUSD")].into_iter().collect();
        assert_eq!(
            sign(ADD_ORDER_PATH, &params, DOC_SECRET),
            Err(SigningError::MissingNonce)
        );
        assert_eq!(
            SignedEnvelope::seal(ADD_ORDER_PATH, &params, DOC_SECRET),
            Err(SigningError::MissingNonce)
        );
    }

    #[test]
    fn test_seal_matches_sign() {
        let params = doc_params();
        let sealed = SignedEnvelope::seal(ADD_ORDER_PATH, &params, DOC_SECRET).unwrap();
        assert_eq!(sealed.nonce, "1616492376594");
        assert_eq!(sealed.encoded_params, params.encode());
        assert_eq!(sealed.signature, DOC_SIGNATURE);
    }

    #[test]
    fn test_seal_deterministic() {
        let a = SignedEnvelope::seal(ADD_ORDER_PATH, &sample_params("7"), DOC_SECRET).unwrap();
        let b = SignedEnvelope::seal(ADD_ORDER_PATH, &sample_params("7"), DOC_SECRET).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_distinct_nonces_distinct_signatures(a in 1u64..u64::MAX, b in 1u64..u64::MAX) {
            prop_assume!(a != b);
            let sig_a = sign(ADD_ORDER_PATH, &sample_params(&a.to_string()), DOC_SECRET).unwrap();
            let sig_b = sign(ADD_ORDER_PATH, &sample_params(&b.to_string()), DOC_SECRET).unwrap();
            prop_assert_ne!(sig_a, sig_b);
        }

        #[test]
        fn prop_values_with_reserved_characters_still_sign(userref in ".*") {
            let mut params = sample_params("1");
            params.append("userref", userref);
            let sealed = SignedEnvelope::seal(ADD_ORDER_PATH, &params, DOC_SECRET).unwrap();
            prop_assert_eq!(FormParams::decode(&sealed.encoded_params), params);
        }
    }
}
