//! Session cookie policy and signing-key setup.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha512};
use std::env;
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, MemoryStore, SessionManagerLayer,
};

pub type SessionLayer = SessionManagerLayer<MemoryStore, SignedCookie>;

/// Cookie policy: strict in production, relaxed for local development.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    secure: bool,
    same_site: SameSite,
    expiry: Duration,
    name: &'static str,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        if is_production() {
            Self {
                secure: true,
                same_site: SameSite::Strict,
                expiry: Duration::hours(2),
                name: "__Host-session",
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Lax,
                expiry: Duration::days(7),
                name: "session",
            }
        }
    }

    pub fn create_layer(&self, store: MemoryStore) -> SessionLayer {
        SessionManagerLayer::new(store)
            .with_secure(self.secure)
            .with_http_only(true)
            .with_same_site(self.same_site)
            .with_name(self.name)
            .with_expiry(Expiry::OnInactivity(self.expiry))
            .with_signed(signing_key())
    }
}

/// Refuses to start a production instance without a usable session secret.
pub fn validate_production_config() {
    if !is_production() {
        return;
    }
    let secret =
        env::var("SESSION_SECRET").expect("SESSION_SECRET must be set when ENVIRONMENT=production");
    if secret_bytes(&secret).len() < 64 {
        panic!("SESSION_SECRET must decode to at least 64 bytes");
    }
}

fn is_production() -> bool {
    env::var("ENVIRONMENT").map(|v| v == "production").unwrap_or(false)
}

/// Signing key for the session cookie. A configured secret is stretched to
/// the 64 bytes `Key` requires; without one, each process gets an ephemeral
/// key and sessions do not survive a restart.
fn signing_key() -> Key {
    match env::var("SESSION_SECRET") {
        Ok(secret) if !secret.is_empty() => {
            let bytes = secret_bytes(&secret);
            if bytes.len() >= 64 {
                Key::from(&bytes[..64])
            } else {
                Key::from(Sha512::digest(&bytes).as_slice())
            }
        }
        _ => {
            tracing::warn!("SESSION_SECRET not set; using an ephemeral signing key");
            Key::generate()
        }
    }
}

/// The secret may arrive base64-encoded or raw.
fn secret_bytes(secret: &str) -> Vec<u8> {
    BASE64
        .decode(secret.as_bytes())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}
