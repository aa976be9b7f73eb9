//! Predictive Model Adapter
//!
//! Wraps a `ScoringBackend` with fallback semantics:
//!
//! `Uninitialized → Loading → Ready | Failed`
//!
//! - Load failure ⇒ `Failed`, every later call uses the rule-based scorer.
//! - A single failed/timed-out inference ⇒ rule-based for that cookie only,
//!   state stays `Ready`.
//!
//! Calls are serialized on an async mutex. The timeout starts once the lock
//! is held, so queueing behind other cookies never counts against a call.
//! While a timed-out call is still running on the blocking pool, later calls
//! fall back immediately instead of queueing behind it.
//!
//! Nothing here ever returns an error to the caller.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::constants::MODEL_VERSION;
use crate::logic::config::{RiskConfig, SafetyConfig};
use crate::logic::cookie::CookieRecord;
use crate::logic::features::{extract, FeatureVector, LayoutInfo};
use crate::logic::threat::{self, ClassificationResult, Method, ScanContext};
use super::backend::{ModelError, ScoringBackend};

// ============================================================================
// STATE
// ============================================================================

const UNINITIALIZED: u8 = 0;
const LOADING: u8 = 1;
const READY: u8 = 2;
const FAILED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterState {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl From<u8> for AdapterState {
    fn from(raw: u8) -> Self {
        match raw {
            UNINITIALIZED => AdapterState::Uninitialized,
            LOADING => AdapterState::Loading,
            READY => AdapterState::Ready,
            _ => AdapterState::Failed,
        }
    }
}

/// Engine status for collaborators (popup stats, logs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub backend: String,
    pub model_version: String,
    pub state: AdapterState,
    /// Method new classifications will use
    pub method: Method,
    pub inference_count: u64,
    pub fallback_count: u64,
    pub avg_latency_ms: f32,
    /// Last load or inference error, if any
    pub last_error: Option<String>,
    /// Feature layout the backend is fed
    pub feature_layout: LayoutInfo,
}

type SharedBackend = Arc<Mutex<Box<dyn ScoringBackend>>>;

// ============================================================================
// ADAPTER
// ============================================================================

pub struct PredictiveAdapter {
    backend: Option<SharedBackend>,
    backend_name: String,
    state: AtomicU8,
    config: Arc<RiskConfig>,
    inference_count: AtomicU64,
    fallback_count: AtomicU64,
    latency_sum_us: AtomicU64,
    /// Set while a timed-out call still holds the backend
    stalled: Arc<AtomicBool>,
    last_error: RwLock<Option<String>>,
}

impl PredictiveAdapter {
    /// Adapter in `Uninitialized`; call `load` or `start_loading`
    pub fn new(backend: Box<dyn ScoringBackend>, config: Arc<RiskConfig>) -> Arc<Self> {
        let backend_name = backend.name().to_string();
        Arc::new(Self {
            backend: Some(Arc::new(Mutex::new(backend))),
            backend_name,
            state: AtomicU8::new(UNINITIALIZED),
            config,
            inference_count: AtomicU64::new(0),
            fallback_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            stalled: Arc::new(AtomicBool::new(false)),
            last_error: RwLock::new(None),
        })
    }

    /// Construct and begin loading in the background (needs a tokio runtime)
    pub fn spawn(backend: Box<dyn ScoringBackend>, config: Arc<RiskConfig>) -> Arc<Self> {
        let adapter = Self::new(backend, config);
        adapter.start_loading();
        adapter
    }

    /// No backend at all: permanently rule-based
    pub fn rule_based_only(config: Arc<RiskConfig>) -> Arc<Self> {
        Arc::new(Self {
            backend: None,
            backend_name: "none".to_string(),
            state: AtomicU8::new(FAILED),
            config,
            inference_count: AtomicU64::new(0),
            fallback_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            stalled: Arc::new(AtomicBool::new(false)),
            last_error: RwLock::new(None),
        })
    }

    /// Kick off `load` on the runtime; `None` if a load was already attempted
    pub fn start_loading(self: &Arc<Self>) -> Option<JoinHandle<AdapterState>> {
        if self.state() != AdapterState::Uninitialized {
            return None;
        }
        let adapter = Arc::clone(self);
        Some(tokio::spawn(async move { adapter.load().await }))
    }

    /// Run the single load attempt. Later calls return the current state.
    pub async fn load(&self) -> AdapterState {
        if self
            .state
            .compare_exchange(UNINITIALIZED, LOADING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return self.state();
        }

        let outcome = match self.backend.clone() {
            Some(backend) => {
                let mut guard = backend.lock_owned().await;
                tokio::task::spawn_blocking(move || guard.load())
                    .await
                    .unwrap_or_else(|e| {
                        Err(ModelError::BackendUnavailable(format!("load task panicked: {}", e)))
                    })
            }
            None => Err(ModelError::BackendUnavailable("no backend configured".to_string())),
        };

        let next = match outcome {
            Ok(()) => {
                log::info!("Predictive backend '{}' ready", self.backend_name);
                READY
            }
            Err(e) => {
                log::warn!(
                    "Predictive backend '{}' failed to load: {} - using rule-based scoring",
                    self.backend_name,
                    e
                );
                *self.last_error.write() = Some(e.to_string());
                FAILED
            }
        };

        self.state.store(next, Ordering::Release);
        AdapterState::from(next)
    }

    pub fn state(&self) -> AdapterState {
        AdapterState::from(self.state.load(Ordering::Acquire))
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    fn predictive_active(&self) -> bool {
        self.state() == AdapterState::Ready && SafetyConfig::is_predictive_enabled()
    }

    /// Classify one cookie: predictive when ready, rule-based otherwise
    pub async fn classify(&self, cookie: &CookieRecord, ctx: &ScanContext) -> ClassificationResult {
        if !self.predictive_active() {
            return threat::classify(cookie, ctx, &self.config);
        }

        let features = extract(cookie, ctx, &self.config);
        match self.infer(features.clone()).await {
            Ok(probability) => {
                ClassificationResult::predictive(probability, features, &self.config.thresholds)
            }
            Err(e) => {
                self.fallback_count.fetch_add(1, Ordering::Relaxed);
                log::debug!("Inference failed for {} ({}), using rule-based", cookie.id(), e);
                *self.last_error.write() = Some(e.to_string());
                threat::classify(cookie, ctx, &self.config)
            }
        }
    }

    /// One serialized, time-bounded backend call
    async fn infer(&self, features: FeatureVector) -> Result<f32, ModelError> {
        let backend = self.backend.clone().ok_or(ModelError::NotReady)?;
        if self.stalled.load(Ordering::SeqCst) {
            return Err(ModelError::Inference("backend busy with a timed-out call".to_string()));
        }

        let mut guard = backend.lock_owned().await;
        if self.stalled.load(Ordering::SeqCst) {
            return Err(ModelError::Inference("backend busy with a timed-out call".to_string()));
        }

        let timeout = self.config.inference_timeout();
        let start = Instant::now();
        let done = Arc::new(AtomicBool::new(false));
        let task = {
            let done = Arc::clone(&done);
            let stalled = Arc::clone(&self.stalled);
            tokio::task::spawn_blocking(move || {
                let result = guard.infer(&features);
                done.store(true, Ordering::SeqCst);
                stalled.store(false, Ordering::SeqCst);
                result
            })
        };

        let probability = match tokio::time::timeout(timeout, task).await {
            Err(_) => {
                // The call keeps running and holds the lock until it returns
                self.stalled.store(true, Ordering::SeqCst);
                if done.load(Ordering::SeqCst) {
                    self.stalled.store(false, Ordering::SeqCst);
                }
                return Err(ModelError::Timeout(timeout.as_millis() as u64));
            }
            Ok(Err(e)) => return Err(ModelError::Inference(format!("inference task panicked: {}", e))),
            Ok(Ok(result)) => result?,
        };

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::Inference(format!(
                "probability out of range: {}",
                probability
            )));
        }

        self.latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(probability)
    }

    pub fn status(&self) -> EngineStatus {
        let count = self.inference_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            backend: self.backend_name.clone(),
            model_version: MODEL_VERSION.to_string(),
            state: self.state(),
            method: if self.predictive_active() { Method::Predictive } else { Method::RuleBased },
            inference_count: count,
            fallback_count: self.fallback_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
            last_error: self.last_error.read().clone(),
            feature_layout: LayoutInfo::current(),
        }
    }
}
