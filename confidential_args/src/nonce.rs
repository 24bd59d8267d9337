//! Caller-side nonce helpers.
//!
//! The encoder takes nonces as given. Freshness is the caller's responsibility,
//! and these helpers are how a caller meets it.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use log::warn;
use rand::Rng;

use crate::error::NonceReuseError;

/// Draw a random 128-bit nonce.
pub fn fresh_nonce<R: Rng>(rng: &mut R) -> u128 {
    rng.random()
}

/// Remembers which nonces were used for which encryption context.
#[derive(Debug, Clone)]
pub struct NonceTracker<K> {
    seen: HashSet<(K, u128)>,
}

impl<K> Default for NonceTracker<K> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Display> NonceTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `nonce` for `context`, failing if the pair was recorded before.
    pub fn record(&mut self, context: K, nonce: u128) -> Result<(), NonceReuseError> {
        let message = context.to_string();
        if !self.seen.insert((context, nonce)) {
            warn!("Nonce {nonce:#x} reused for {message}");
            return Err(NonceReuseError {
                context: message,
                nonce,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
