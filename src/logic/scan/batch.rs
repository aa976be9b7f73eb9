//! Batch Orchestrator
//!
//! Classifies every cookie independently (bounded fan-out on tokio tasks),
//! then aggregates. A scan is all-or-nothing: dropping the future aborts
//! the outstanding tasks and nothing partial is ever returned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::logic::config::RiskConfig;
use crate::logic::cookie::{
    normalize_value, removal_url, CookieId, CookieRecord, CookieStore, StoreError,
};
use crate::logic::model::PredictiveAdapter;
use crate::logic::threat::{self, ClassificationResult, RiskLevel, ScanContext};

// ============================================================================
// BATCH RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
    pub id: CookieId,
    /// Display bucket for the result (popup badge)
    pub level: RiskLevel,
    pub result: ClassificationResult,
}

impl ScanEntry {
    pub fn new(id: CookieId, result: ClassificationResult) -> Self {
        Self {
            id,
            level: result.level(),
            result,
        }
    }
}

/// Results for one scan, in input order, plus aggregate counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub entries: Vec<ScanEntry>,
    pub total: usize,
    pub malicious: usize,
    /// Suspicious but not malicious
    pub suspicious: usize,
}

impl BatchResult {
    pub fn from_entries(entries: Vec<ScanEntry>) -> Self {
        let malicious = entries.iter().filter(|e| e.result.is_malicious).count();
        let suspicious = entries
            .iter()
            .filter(|e| e.result.is_suspicious && !e.result.is_malicious)
            .count();

        Self {
            total: entries.len(),
            malicious,
            suspicious,
            entries,
        }
    }

    /// Result for a cookie identity (last one wins on duplicates)
    pub fn get(&self, id: &CookieId) -> Option<&ClassificationResult> {
        self.entries.iter().rev().find(|e| &e.id == id).map(|e| &e.result)
    }

    /// `(name, domain)` of malicious cookies, input order
    pub fn malicious_identities(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|e| e.result.is_malicious)
            .map(|e| (e.id.name.clone(), e.id.domain.clone()))
            .collect()
    }
}

// ============================================================================
// SCANNER
// ============================================================================

pub struct CookieScanner {
    adapter: Arc<PredictiveAdapter>,
    max_concurrency: usize,
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl CookieScanner {
    pub fn new(adapter: Arc<PredictiveAdapter>) -> Self {
        Self {
            adapter,
            max_concurrency: default_concurrency(),
        }
    }

    /// Scanner without a predictive backend
    pub fn rule_based(config: Arc<RiskConfig>) -> Self {
        Self::new(PredictiveAdapter::rule_based_only(config))
    }

    pub fn with_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn adapter(&self) -> &Arc<PredictiveAdapter> {
        &self.adapter
    }

    /// Classify every cookie and aggregate
    pub async fn scan(&self, cookies: &[CookieRecord], ctx: &ScanContext) -> BatchResult {
        if cookies.is_empty() {
            return BatchResult::default();
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let shared_ctx = Arc::new(ctx.clone());
        let mut tasks = JoinSet::new();

        for (index, cookie) in cookies.iter().cloned().enumerate() {
            let adapter = Arc::clone(&self.adapter);
            let ctx = Arc::clone(&shared_ctx);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = adapter.classify(&cookie, &ctx).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<ClassificationResult>> = vec![None; cookies.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => log::error!("Classification task failed: {}", e),
            }
        }

        let entries = cookies
            .iter()
            .zip(results)
            .map(|(cookie, result)| {
                // A lost task still gets a verdict
                let result =
                    result.unwrap_or_else(|| threat::classify(cookie, ctx, self.adapter.config()));
                ScanEntry::new(cookie.id(), result)
            })
            .collect();

        let batch = BatchResult::from_entries(entries);
        log::debug!(
            "Scanned {} cookies for {}: {} malicious, {} suspicious",
            batch.total,
            ctx.hostname,
            batch.malicious,
            batch.suspicious
        );
        batch
    }

    /// Normalize raw JSON cookies, then scan
    pub async fn scan_raw(&self, raw: &[Value], ctx: &ScanContext) -> BatchResult {
        let cookies: Vec<CookieRecord> = raw.iter().map(normalize_value).collect();
        self.scan(&cookies, ctx).await
    }

    /// Triage without page context (quick scorer), synchronous
    pub fn quick_scan(&self, cookies: &[CookieRecord]) -> BatchResult {
        let config = self.adapter.config();
        let entries = cookies
            .iter()
            .map(|cookie| ScanEntry::new(cookie.id(), threat::classify_quick(cookie, config)))
            .collect();
        BatchResult::from_entries(entries)
    }

    /// Identities the quick scorer flags as malicious (no page context)
    pub fn quick_block(&self, cookies: &[CookieRecord]) -> Vec<(String, String)> {
        self.quick_scan(cookies).malicious_identities()
    }

    /// Identities to remove; removal itself is the store's job
    pub async fn block_malicious(
        &self,
        cookies: &[CookieRecord],
        ctx: &ScanContext,
    ) -> Vec<(String, String)> {
        self.scan(cookies, ctx).await.malicious_identities()
    }

    /// Scan the store's cookies for `url` and remove the malicious ones.
    ///
    /// Returns the identities actually removed; individual removal
    /// failures are logged and skipped.
    pub async fn block_malicious_in(
        &self,
        store: &dyn CookieStore,
        url: &str,
    ) -> Result<Vec<(String, String)>, StoreError> {
        let raw = store.get_all(url)?;
        let cookies: Vec<CookieRecord> = raw.iter().map(normalize_value).collect();
        let ctx = ScanContext::from_url(url);

        let mut removed = Vec::new();
        for (name, domain) in self.block_malicious(&cookies, &ctx).await {
            match store.remove(&removal_url(&domain), &name) {
                Ok(()) => removed.push((name, domain)),
                Err(e) => log::warn!("Block failed: {}", e),
            }
        }

        log::info!("Blocked {} malicious cookies for {}", removed.len(), ctx.hostname);
        Ok(removed)
    }
}
