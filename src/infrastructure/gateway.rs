//! Razorpay-style payment gateway adapter
//!
//! Order creation is local (the gateway order id is minted here and
//! echoed back by the client); signature verification is the real
//! security boundary: HMAC-SHA256 over "order_id|payment_id" keyed
//! with the gateway secret, hex-encoded.

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::config::PaymentGatewayConfig;
use crate::domain::gateway::{OrderRef, PaymentGateway};
use crate::domain::DomainResult;

const SHA256_BLOCK_LEN: usize = 64;

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut block = [0u8; SHA256_BLOCK_LEN];
    if key.len() > SHA256_BLOCK_LEN {
        block[..32].copy_from_slice(&Sha256::digest(key));
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let mut inner = Sha256::new();
    inner.update(block.map(|b| b ^ 0x36));
    inner.update(message);
    let inner_hash = inner.finalize();

    let mut outer = Sha256::new();
    outer.update(block.map(|b| b ^ 0x5c));
    outer.update(inner_hash);
    outer.finalize().into()
}

pub struct HmacPaymentGateway {
    config: PaymentGatewayConfig,
}

impl HmacPaymentGateway {
    pub fn new(config: PaymentGatewayConfig) -> Self {
        Self { config }
    }

    /// Signature the gateway would produce for this pair. Exposed so
    /// callers simulating the checkout callback can mint one.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        let message = format!("{}|{}", order_id, payment_id);
        hex::encode(hmac_sha256(
            self.config.key_secret.as_bytes(),
            message.as_bytes(),
        ))
    }
}

#[async_trait]
impl PaymentGateway for HmacPaymentGateway {
    async fn create_order(&self, booking_id: i32, amount: i64) -> DomainResult<OrderRef> {
        let nonce: u64 = rand::thread_rng().gen();
        Ok(OrderRef {
            order_id: format!("order_{}_{:016x}", booking_id, nonce),
            // Gateway amounts are in paise.
            amount: amount * 100,
            currency: "INR".to_string(),
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let expected = self.sign(order_id, payment_id);
        // Both sides are fixed-length hex; compare without early exit.
        expected.len() == signature.len()
            && expected
                .bytes()
                .zip(signature.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HmacPaymentGateway {
        HmacPaymentGateway::new(PaymentGatewayConfig {
            key_id: "rzp_test_key".into(),
            key_secret: "rzp_test_secret".into(),
        })
    }

    #[test]
    fn hmac_matches_rfc_4231_case_1() {
        let key = [0x0b; 20];
        let mac = hmac_sha256(&key, b"Hi There");
        assert_eq!(
            hex::encode(mac),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn hmac_handles_keys_longer_than_the_block() {
        // RFC 4231 test case 6: 131-byte key.
        let key = [0xaa; 131];
        let mac = hmac_sha256(&key, b"Test Using Larger Than Block-Size Key - Hash Key First");
        assert_eq!(
            hex::encode(mac),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn signature_roundtrip() {
        let gw = gateway();
        let sig = gw.sign("order_1_abc", "pay_xyz");
        assert!(gw.verify_signature("order_1_abc", "pay_xyz", &sig));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let gw = gateway();
        let mut sig = gw.sign("order_1_abc", "pay_xyz");
        assert!(!gw.verify_signature("order_1_abc", "pay_other", &sig));
        assert!(!gw.verify_signature("order_1_abc", "pay_xyz", "deadbeef"));

        // Flip one hex digit.
        let flipped = if sig.ends_with('0') { '1' } else { '0' };
        sig.pop();
        sig.push(flipped);
        assert!(!gw.verify_signature("order_1_abc", "pay_xyz", &sig));
    }

    #[tokio::test]
    async fn orders_carry_paise_amounts() {
        let gw = gateway();
        let order = gw.create_order(7, 531).await.unwrap();
        assert_eq!(order.amount, 53100);
        assert_eq!(order.currency, "INR");
        assert!(order.order_id.starts_with("order_7_"));
    }
}
