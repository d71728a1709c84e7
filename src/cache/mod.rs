use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::ResultSet;

/// A memoized answer: the SQL the model produced and the rows it returned.
#[derive(Debug, Clone)]
pub struct CachedAnswer {
    pub sql: String,
    pub result: ResultSet,
}

struct CacheSlot {
    answer: CachedAnswer,
    expires_at: Instant,
}

/// Question-text keyed answer cache with per-entry expiry.
///
/// Keys are the raw question strings, case-sensitive and unnormalized, so
/// reworded or re-cased questions land in separate slots. Writers race on
/// the same key; the last set wins. Growth is bounded only by expiry.
pub struct QueryCache {
    entries: RwLock<HashMap<String, CacheSlot>>,
    ttl: Duration,
    enabled: bool,
}

impl QueryCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            enabled,
        }
    }

    pub async fn get(&self, question: &str) -> Option<CachedAnswer> {
        if !self.enabled {
            return None;
        }

        {
            let entries = self.entries.read().await;
            match entries.get(question) {
                Some(slot) if slot.expires_at > Instant::now() => {
                    return Some(slot.answer.clone());
                }
                Some(_) => {} // expired, fall through to drop it
                None => return None,
            }
        }

        debug!("Dropping expired cache entry for: {}", question);
        self.entries.write().await.remove(question);
        None
    }

    pub async fn set(&self, question: &str, answer: CachedAnswer) {
        if !self.enabled {
            return;
        }

        let slot = CacheSlot {
            answer,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(question.to_string(), slot);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
