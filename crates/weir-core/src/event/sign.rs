//! Signing identities and signer recovery.
//!
//! Events carry no public keys. The creator signs the event digest with a
//! secp256k1 key and verifiers recover the signing address from the
//! signature itself, then compare it with the claimed `creatorAddress`
//! (case-sensitive on the EIP-55 checksummed form).
//!
//! Signatures travel as `0x` + 130 hex chars: the 65-byte `r||s||v`
//! RPC encoding with `v` in `{27, 28}`. [`recover_creator`] also accepts
//! the raw parity notation (`v` in `{0, 1}`) some clients emit.

use alloy::hex;
use alloy::primitives::{B256, Signature};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;

use crate::error::Error;

/// A signing identity: a secp256k1 keypair plus its checksummed address.
///
/// The key never leaves this struct. Dropping the identity drops the key.
#[derive(Debug, Clone)]
pub struct Identity {
    signer: PrivateKeySigner,
    address: String,
}

impl Identity {
    /// Generate a fresh random identity.
    #[must_use]
    pub fn random() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// Wrap an existing signer.
    #[must_use]
    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address().to_checksum(None);
        Self { signer, address }
    }

    /// The EIP-55 checksummed address, `0x` + 40 hex chars.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign a 32-byte digest, returning the RPC-encoded hex signature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signing`] if the underlying signer fails.
    pub fn sign_digest(&self, digest: &B256) -> Result<String, Error> {
        let signature = self
            .signer
            .sign_hash_sync(digest)
            .map_err(|err| Error::Signing {
                reason: err.to_string(),
            })?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

/// Recover the checksummed address that signed `digest`.
///
/// # Errors
///
/// Returns [`Error::MalformedSignature`] if the hex does not decode to 65
/// bytes, the recovery byte is out of range, or point recovery fails.
pub fn recover_creator(digest: &B256, signature: &str) -> Result<String, Error> {
    let bytes = hex::decode(signature).map_err(|err| Error::MalformedSignature {
        reason: err.to_string(),
    })?;
    let parsed = Signature::from_raw(&bytes).map_err(|err| Error::MalformedSignature {
        reason: err.to_string(),
    })?;
    let address = parsed
        .recover_address_from_prehash(digest)
        .map_err(|err| Error::MalformedSignature {
            reason: err.to_string(),
        })?;
    Ok(address.to_checksum(None))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use alloy::primitives::utils::eip191_hash_message;

    #[test]
    fn addresses_are_checksummed() {
        let identity = Identity::random();
        let address = identity.address();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);

        let parsed: Address = address.parse().expect("parse address");
        assert_eq!(parsed.to_checksum(None), address);
    }

    #[test]
    fn random_identities_differ() {
        assert_ne!(Identity::random().address(), Identity::random().address());
    }

    #[test]
    fn sign_then_recover_roundtrip() {
        let identity = Identity::random();
        let digest = eip191_hash_message(b"weir");

        let signature = identity.sign_digest(&digest).expect("sign");
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 132);
        assert!(
            signature.ends_with("1b") || signature.ends_with("1c"),
            "v must be 27 or 28, got {signature}"
        );

        let recovered = recover_creator(&digest, &signature).expect("recover");
        assert_eq!(recovered, identity.address());
    }

    #[test]
    fn signing_is_deterministic() {
        let identity = Identity::random();
        let digest = eip191_hash_message(b"same message");
        let first = identity.sign_digest(&digest).expect("sign");
        let second = identity.sign_digest(&digest).expect("sign");
        assert_eq!(first, second);
    }

    #[test]
    fn recovery_pins_the_signer() {
        let alice = Identity::random();
        let mallory = Identity::random();
        let digest = eip191_hash_message(b"payload");

        let signature = alice.sign_digest(&digest).expect("sign");
        let recovered = recover_creator(&digest, &signature).expect("recover");
        assert_eq!(recovered, alice.address());
        assert_ne!(recovered, mallory.address());
    }

    #[test]
    fn recover_accepts_raw_parity_notation() {
        let identity = Identity::random();
        let digest = eip191_hash_message(b"parity");
        let signature = identity.sign_digest(&digest).expect("sign");

        // Rewrite v from 27/28 to 0/1.
        let raw_v = if signature.ends_with("1b") { "00" } else { "01" };
        let rewritten = format!("{}{raw_v}", &signature[..130]);

        let recovered = recover_creator(&digest, &rewritten).expect("recover");
        assert_eq!(recovered, identity.address());
    }

    #[test]
    fn recover_rejects_malformed_hex() {
        let digest = eip191_hash_message(b"x");
        assert!(recover_creator(&digest, "").is_err());
        assert!(recover_creator(&digest, "0x1234").is_err());
        assert!(recover_creator(&digest, &format!("0x{}", "zz".repeat(65))).is_err());
    }

    #[test]
    fn recover_rejects_bad_recovery_byte() {
        let digest = eip191_hash_message(b"x");
        let bogus = format!("0x{}05", "11".repeat(64));
        let err = recover_creator(&digest, &bogus).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrCode::BadEventSignature);
    }
}
