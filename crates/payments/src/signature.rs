//! Webhook payload signature scheme.
//!
//! The processor signs each delivery with HMAC-SHA256 over
//! `"{timestamp}.{payload}"` using a shared secret, and sends the
//! result in a header of the form `t=<unix seconds>,v1=<hex digest>`.
//! A header may carry several `v1` entries during secret rotation; the
//! delivery is accepted if any of them verifies.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::VerificationError;

type HmacSha256 = Hmac<Sha256>;

/// Name of the HTTP header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Verifies a signature header against the raw payload.
///
/// Checks the HMAC in constant time and rejects timestamps older (or
/// newer) than `tolerance`, bounding the replay window.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance: Duration,
    now: DateTime<Utc>,
) -> Result<(), VerificationError> {
    let (timestamp, candidates) = parse_header(header)?;

    let age_secs = (now.timestamp() - timestamp).abs();
    if age_secs > tolerance.num_seconds() {
        return Err(VerificationError::TimestampOutOfTolerance { age_secs });
    }

    for candidate in candidates {
        let digest =
            hex::decode(&candidate).map_err(|_| VerificationError::SignatureMismatch)?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| VerificationError::SignatureMismatch)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&digest).is_ok() {
            return Ok(());
        }
    }

    Err(VerificationError::SignatureMismatch)
}

/// Computes a valid signature header for a payload.
///
/// Used by tests and local fakes to simulate processor deliveries.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: DateTime<Utc>) -> String {
    let ts = timestamp.timestamp();
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(ts.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let digest = hex::encode(mac.finalize().into_bytes());
    format!("t={ts},v1={digest}")
}

fn parse_header(header: &str) -> Result<(i64, Vec<String>), VerificationError> {
    let mut timestamp = None;
    let mut candidates = Vec::new();

    for pair in header.split(',') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            return Err(VerificationError::MalformedHeader(header.to_string()));
        };
        match key {
            "t" => {
                timestamp = Some(value.parse::<i64>().map_err(|_| {
                    VerificationError::MalformedHeader(header.to_string())
                })?);
            }
            "v1" => candidates.push(value.to_string()),
            // Unknown scheme versions are skipped, not rejected.
            _ => {}
        }
    }

    match (timestamp, candidates.is_empty()) {
        (Some(ts), false) => Ok((ts, candidates)),
        _ => Err(VerificationError::MalformedHeader(header.to_string())),
    }
}
