//! The signature scheme is an external collaborator from the consensus core's point of
//! view: `Handler` only ever calls [`SignatureVerifier::verify`]. `Secp256k1Verifier` is
//! the one concrete implementation shipped here: it signs and verifies with secp256k1
//! Schnorr signatures over a 32-byte message digest.

use std::fmt;

use secp256k1::{schnorr, Keypair, Message, PublicKey, Secp256k1, XOnlyPublicKey};

/// An opaque payee address: a compressed secp256k1 public key. The consensus core
/// never interprets these bytes beyond equality and handing them to a
/// [`SignatureVerifier`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address([u8; 33]);

impl Address {
    pub fn from_compressed(bytes: [u8; 33]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    pub fn from_public_key(key: &PublicKey) -> Self {
        Address(key.serialize())
    }

    fn x_only(&self) -> Option<XOnlyPublicKey> {
        PublicKey::from_slice(&self.0).ok().map(|k| k.x_only_public_key().0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

/// External collaborator boundary for signature verification.
///
/// Implementations must return `false` when `address` is `None` — the null-address
/// case stands in for "the claimed outpoint does not exist in the pool", and a
/// missing outpoint can never be satisfied by any signature.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, address: Option<&Address>, message: &[u8], signature: &[u8]) -> bool;
}

/// The production verifier: secp256k1 Schnorr signatures (BIP340-style) over a
/// 32-byte message digest.
#[derive(Default)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, address: Option<&Address>, message: &[u8], signature: &[u8]) -> bool {
        let Some(address) = address else { return false };
        let Some(pk) = address.x_only() else { return false };
        let Ok(sig) = schnorr::Signature::from_slice(signature) else { return false };
        let Ok(msg) = Message::from_digest_slice(message) else { return false };
        sig.verify(&msg, &pk).is_ok()
    }
}

/// A deterministic keypair generator for tests and fixtures: derives a key from a
/// seed instead of the OS RNG so that test vectors stay reproducible.
pub fn keypair_from_seed(seed: u64) -> (Keypair, Address) {
    let secp = Secp256k1::new();
    let mut sk_bytes = [0u8; 32];
    sk_bytes[24..].copy_from_slice(&seed.to_be_bytes());
    // Seed 0 would produce an all-zero scalar, which secp256k1 rejects as a secret key.
    sk_bytes[0] = 1;
    let keypair = Keypair::from_seckey_slice(&secp, &sk_bytes).expect("seed produces a valid secret key");
    let address = Address::from_public_key(&keypair.public_key());
    (keypair, address)
}

/// Signs `message` with `keypair` using the same scheme [`Secp256k1Verifier`] checks.
pub fn sign(keypair: &Keypair, message: &[u8]) -> Vec<u8> {
    let msg = Message::from_digest_slice(message).expect("message must be a 32-byte digest");
    let sig: [u8; 64] = *keypair.sign_schnorr(msg).as_ref();
    sig.to_vec()
}
