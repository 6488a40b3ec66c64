use std::collections::HashMap;

use async_trait::async_trait;
use rand::Rng;
use rand::rngs::OsRng;
use tokio::sync::Mutex;

/// Generates a 6-digit decimal passcode drawn uniformly from
/// [100000, 999999].
pub fn generate_code() -> String {
    OsRng.gen_range(100_000u32..=999_999).to_string()
}

/// Shared passcode state keyed by phone number.
///
/// At most one entry per phone; `set` overwrites. Verification goes through
/// `consume`, which must be atomic with respect to concurrent callers for the
/// same phone so a code is usable exactly once.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Stores `code` for `phone`, replacing any previous entry.
    async fn set(&self, phone: &str, code: String);

    /// Read-only lookup of the current code for `phone`.
    async fn get(&self, phone: &str) -> Option<String>;

    /// Compare-and-remove. Returns true when the stored code matched and the
    /// entry was deleted; a mismatch leaves the entry in place for retry.
    async fn consume(&self, phone: &str, code: &str) -> bool;
}

#[derive(Default)]
pub struct InMemoryOtpStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn set(&self, phone: &str, code: String) {
        self.entries.lock().await.insert(phone.to_string(), code);
    }

    async fn get(&self, phone: &str) -> Option<String> {
        self.entries.lock().await.get(phone).cloned()
    }

    async fn consume(&self, phone: &str, code: &str) -> bool {
        // Lookup, comparison and removal under a single lock hold so two
        // concurrent verifications cannot both win the same code.
        let mut entries = self.entries.lock().await;
        match entries.get(phone) {
            Some(expected) if expected == code => {
                entries.remove(phone);
                true
            }
            _ => false,
        }
    }
}
