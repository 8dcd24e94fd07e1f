use crate::clock::{Clock, SystemClock};
use crate::Generator;
use linkfast_core::base62::{self, SHORT_CODE_LENGTH};
use linkfast_core::ShortCode;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Derives codes from a SHA-256 digest of the URL and a nanosecond timestamp.
///
/// The digest input is the URL followed by the decimal timestamp. The first
/// eight digest bytes are mapped onto the base62 alphabet. Timestamps are
/// forced to be strictly increasing per generator, so two calls never hash
/// the same input even when the clock has not advanced in between.
#[derive(Debug)]
pub struct HashGenerator<C = SystemClock> {
    clock: C,
    last_stamp: AtomicU64,
}

impl HashGenerator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for HashGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> HashGenerator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last_stamp: AtomicU64::new(0),
        }
    }

    fn next_stamp(&self) -> u64 {
        let now = u64::try_from(self.clock.now().as_nanosecond()).unwrap_or(0);
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(previous.saturating_add(1))
    }
}

impl<C: Clock + 'static> Generator for HashGenerator<C> {
    fn generate(&self, original_url: &str) -> ShortCode {
        let stamp = self.next_stamp();

        let mut hasher = Sha256::new();
        hasher.update(original_url.as_bytes());
        hasher.update(stamp.to_string().as_bytes());
        let digest = hasher.finalize();

        let mut head = [0u8; SHORT_CODE_LENGTH];
        head.copy_from_slice(&digest[..SHORT_CODE_LENGTH]);
        base62::encode_bytes(&head)
    }
}
