//! Session-scoped transaction accumulation and analysis caching.
//!
//! One session per observed browsing context: intercepted transfer batches
//! accumulate into a deduplicated, insertion-ordered list of transaction
//! identifiers. Completed analyses are cached under the cluster they came
//! from so re-opening a cluster view needs no re-classification.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use uuid::Uuid;

use txlens::model::ResultBundle;
use txlens::payload::TransferBatch;

/// A completed classification run with its originating context.
#[derive(Debug, Clone)]
pub struct StoredAnalysis {
    pub results: ResultBundle,
    pub cluster: Option<String>,
    /// Raw transfer records known at analysis time, kept opaque.
    pub transfers: Value,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    hashes: Vec<String>,
    seen: HashSet<String>,
    transfers: Vec<Value>,
    /// Cluster context of the most recent observed batch.
    cluster: Option<String>,
    current: Option<StoredAnalysis>,
    cache: HashMap<String, StoredAnalysis>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            hashes: Vec::new(),
            seen: HashSet::new(),
            transfers: Vec::new(),
            cluster: None,
            current: None,
            cache: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Accumulate an observed batch. Idempotent under re-delivery of the
    /// same transaction identifier; returns the total known count.
    pub fn ingest(&mut self, batch: TransferBatch) -> usize {
        for hash in batch.hashes {
            if self.seen.insert(hash.clone()) {
                self.hashes.push(hash);
            }
        }
        if batch.cluster.is_some() {
            self.cluster = batch.cluster;
        }
        if let Value::Array(records) = batch.records {
            self.transfers.extend(records);
        }
        self.hashes.len()
    }

    /// Known transaction identifiers, in discovery order.
    pub fn hashes(&self) -> &[String] {
        &self.hashes
    }

    pub fn transaction_count(&self) -> usize {
        self.hashes.len()
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// Raw transfer records accumulated so far.
    pub fn transfers(&self) -> Value {
        Value::Array(self.transfers.clone())
    }

    /// Store a completed analysis as current and cache it under its cluster
    /// (falling back to the session id when no cluster was observed).
    pub fn store_analysis(&mut self, results: ResultBundle) -> StoredAnalysis {
        let stored = StoredAnalysis {
            results,
            cluster: self.cluster.clone(),
            transfers: self.transfers(),
        };
        let key = self
            .cluster
            .clone()
            .unwrap_or_else(|| self.id.to_string());
        self.cache.insert(key, stored.clone());
        self.current = Some(stored.clone());
        stored
    }

    pub fn current(&self) -> Option<StoredAnalysis> {
        self.current.clone()
    }

    pub fn cached(&self, cluster: &str) -> Option<StoredAnalysis> {
        self.cache.get(cluster).cloned()
    }

    /// Session-end lifecycle hook: fresh id, everything cleared.
    pub fn reset(&mut self) {
        *self = Session::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
