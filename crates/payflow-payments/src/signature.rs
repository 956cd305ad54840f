//! Payment Signature Verification
//!
//! The hosted checkout hands the browser a signature equal to
//! `hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}"))`. Only the
//! processor and this server hold the secret, so a matching signature proves
//! the confirmation was not forged by the client.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded SHA-256 MAC
const SIGNATURE_HEX_LEN: usize = 64;

fn mac_for(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::VerificationFailed(format!("HMAC key rejected: {e}")))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// Compute the signature the processor issues for this order/payment pair
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> Result<String> {
    let mac = mac_for(secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a supplied signature against the expected one.
///
/// Only the exact lowercase hex rendering is accepted. The byte comparison
/// itself is constant-time.
pub fn verify_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    supplied: &str,
) -> Result<bool> {
    let mac = mac_for(secret, order_id, payment_id)?;

    let well_formed = supplied.len() == SIGNATURE_HEX_LEN
        && supplied.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if !well_formed {
        return Ok(false);
    }

    let Ok(bytes) = hex::decode(supplied) else {
        return Ok(false);
    };

    Ok(mac.verify_slice(&bytes).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret";
    const ORDER: &str = "order_123";
    const PAYMENT: &str = "pay_456";

    fn verify(order_id: &str, payment_id: &str, supplied: &str) -> bool {
        verify_signature(SECRET, order_id, payment_id, supplied).unwrap()
    }

    #[test]
    fn test_known_vector() {
        // hmac.new(b"test_secret", b"order_123|pay_456", sha256).hexdigest()
        assert_eq!(
            expected_signature(SECRET, ORDER, PAYMENT).unwrap(),
            "6c343620f1910da483982cf25b9dc33d709afdd25930f08964ef60b65aefa831"
        );
    }

    #[test]
    fn test_order_id_comes_first() {
        assert_ne!(
            expected_signature(SECRET, ORDER, PAYMENT).unwrap(),
            expected_signature(SECRET, PAYMENT, ORDER).unwrap(),
        );
    }

    #[test]
    fn test_valid_signature_accepted() {
        let sig = expected_signature(SECRET, ORDER, PAYMENT).unwrap();
        assert!(verify(ORDER, PAYMENT, &sig));
    }

    #[test]
    fn test_single_character_mutations_rejected() {
        let sig = expected_signature(SECRET, ORDER, PAYMENT).unwrap();

        assert!(!verify("order_124", PAYMENT, &sig));
        assert!(!verify(ORDER, "pay_457", &sig));
        assert!(!verify_signature("test_secreT", ORDER, PAYMENT, &sig).unwrap());

        for i in 0..sig.len() {
            let mut tampered = sig.clone().into_bytes();
            tampered[i] = if tampered[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(!verify(ORDER, PAYMENT, &tampered), "mutation at {i} accepted");
        }
    }

    #[test]
    fn test_malformed_signatures_rejected() {
        let sig = expected_signature(SECRET, ORDER, PAYMENT).unwrap();

        assert!(!verify(ORDER, PAYMENT, "invalid"));
        assert!(!verify(ORDER, PAYMENT, ""));
        assert!(!verify(ORDER, PAYMENT, &sig.to_uppercase()));
        assert!(!verify(ORDER, PAYMENT, &sig[..63]));
        assert!(!verify(ORDER, PAYMENT, &format!("{sig}0")));
    }
}
