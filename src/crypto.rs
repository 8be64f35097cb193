//! Cryptographic primitives for proofchain: SHA-256 digests and secp256k1 keys

use crate::error::ChainError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::{PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

pub type Sha256Hash = [u8; 32];

/// Account identifier: an opaque hex string.
///
/// Addresses produced by [`KeyPair::address`] are compressed secp256k1 public
/// keys, so a transfer's sender doubles as the key its signature is checked
/// against. Nothing beyond presence is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Address(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Address::new(value)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Address::new(value)
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                ChainError::Crypto(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                ChainError::Crypto(format!("Invalid secret key bytes: {}", e))
            }
        })?;

        Ok(Self::from_secret_key(secret_key))
    }

    /// Creates a KeyPair from a hex-encoded secret key.
    pub fn from_secret_hex(hex_str: &str) -> Result<Self, ChainError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ChainError::Crypto(format!("Invalid hex secret key: {}", e)))?;
        Self::from_secret_bytes(&bytes)
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Returns the KeyPair's public key as a compressed byte array.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key.serialize()
    }

    /// The account identifier owned by this key: the hex compressed public key.
    pub fn address(&self) -> Address {
        Address(hex::encode(self.public_key_bytes()))
    }

    /// Signs a 32-byte digest and returns the DER-encoded signature.
    pub fn sign_digest(&self, digest: &Sha256Hash) -> Vec<u8> {
        let message = Message::from_digest(*digest);
        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);
        signature.serialize_der().to_vec()
    }
}

/// Verifies a DER-encoded ECDSA signature over `digest` for a hex public key.
pub fn verify_digest(
    public_key_hex: &str,
    digest: &Sha256Hash,
    signature_der: &[u8],
) -> Result<(), ChainError> {
    let key_bytes = hex::decode(public_key_hex)
        .map_err(|e| ChainError::Crypto(format!("Invalid hex public key: {}", e)))?;
    let public_key = PublicKey::from_slice(&key_bytes)
        .map_err(|e| ChainError::Crypto(format!("Invalid public key: {}", e)))?;

    let signature = Signature::from_der(signature_der)
        .map_err(|e| ChainError::Crypto(format!("Invalid signature: {}", e)))?;

    let message = Message::from_digest(*digest);

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| ChainError::Crypto("Signature verification failed".to_string()))
}
