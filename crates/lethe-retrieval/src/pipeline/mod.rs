//! RetrievalPipeline: classify → select → query → fuse → feed back.

pub mod request;
pub mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use lethe_adaptive::AdaptiveSelector;
use lethe_core::config::{LetheConfig, RetrievalConfig, RetrievalMode};
use lethe_core::constants::OUTCOME_RESULT_SATURATION;
use lethe_core::errors::ConfigError;
use lethe_core::traits::{IQueryEncoder, IRetrievalEngine};
use lethe_core::{EngineKind, EngineOutput, EngineQuery, LetheResult, RankedResult};
use lethe_decay::ForgettingScorer;
use lethe_graph::GraphStore;
use lethe_observability::{retrieval_span, selection_span, QueryLog, QueryLogEntry};

pub use request::{QueryRequest, QueryResponse};
pub use state::PipelineState;

use crate::forgetting::ForgettingEngine;
use crate::fusion::{fuse_basic, FusionEngine};
use crate::intent::QueryClassifier;
use crate::lexical::LexicalEngine;
use crate::similarity::{SimilarityEngine, VectorIndex};

/// Outcome confidence of a ranked list:
/// `0.7 * mean(score clamped to [0,1]) + 0.3 * min(1, n / 10)`, 0 when empty.
pub fn outcome_confidence(scores: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = scores.into_iter().fold((0.0, 0usize), |(sum, n), s| {
        let s = if s.is_finite() { s.clamp(0.0, 1.0) } else { 0.0 };
        (sum + s, n + 1)
    });
    if n == 0 {
        return 0.0;
    }
    0.7 * (sum / n as f64) + 0.3 * (n as f64 / OUTCOME_RESULT_SATURATION).min(1.0)
}

/// Outcome confidence of one engine's list, with each raw score mapped onto
/// [0,1] by that engine first.
pub fn engine_confidence(engine: &dyn IRetrievalEngine, output: &EngineOutput) -> f64 {
    outcome_confidence(output.candidates.iter().map(|c| engine.calibrate(c.raw_score)))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns the query control flow. Shared across threads behind an `Arc`.
pub struct RetrievalPipeline {
    graph: Arc<GraphStore>,
    classifier: QueryClassifier,
    engines: Vec<Arc<dyn IRetrievalEngine>>,
    selector: AdaptiveSelector<EngineKind>,
    fusion: FusionEngine,
    forgetting: Option<Arc<ForgettingEngine>>,
    config: RetrievalConfig,
    learning_rate: f64,
    query_log: Mutex<QueryLog>,
    queries: AtomicU64,
}

impl RetrievalPipeline {
    /// Pipeline over the given engines. Engines are registered in order; a
    /// second engine of an already registered kind is ignored.
    pub fn new(
        graph: Arc<GraphStore>,
        engines: Vec<Arc<dyn IRetrievalEngine>>,
        config: &LetheConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut kinds: Vec<EngineKind> = Vec::with_capacity(engines.len());
        let mut registered = Vec::with_capacity(engines.len());
        for engine in engines {
            let kind = engine.kind();
            if kinds.contains(&kind) {
                warn!(engine = %kind, "duplicate engine kind ignored");
                continue;
            }
            kinds.push(kind);
            registered.push(engine);
        }
        if registered.is_empty() {
            return Err(ConfigError::EmptyCandidateSet {
                name: "retrieval engines".to_string(),
            });
        }

        Ok(Self {
            graph,
            classifier: QueryClassifier::new(),
            engines: registered,
            selector: AdaptiveSelector::new(kinds, &config.selector)?,
            fusion: FusionEngine::new(config.retrieval.fusion_policy, &config.selector)?,
            forgetting: None,
            config: config.retrieval.clone(),
            learning_rate: config.selector.learning_rate,
            query_log: Mutex::new(QueryLog::with_capacity(config.observability.query_log_capacity)),
            queries: AtomicU64::new(0),
        })
    }

    /// The standard lexical + similarity + forgetting-weighted setup. Issue
    /// vectors are encoded with `encoder` up front.
    pub fn from_config(
        graph: Arc<GraphStore>,
        encoder: Arc<dyn IQueryEncoder>,
        config: &LetheConfig,
    ) -> LetheResult<Self> {
        let lexical = LexicalEngine::from_graph(&graph, &config.retrieval);
        let index = VectorIndex::build(&graph, encoder.as_ref())?;
        let similarity = Arc::new(SimilarityEngine::new(index, encoder));
        let scorer = ForgettingScorer::from_config(&config.forgetting)?;
        let forgetting = Arc::new(ForgettingEngine::new(
            graph.clone(),
            similarity.clone(),
            scorer,
            &config.retrieval,
        ));

        let engines: Vec<Arc<dyn IRetrievalEngine>> =
            vec![Arc::new(lexical), similarity, forgetting.clone()];
        Ok(Self::new(graph, engines, config)?.with_forgetting_engine(forgetting))
    }

    /// Attach the forgetting-weighted engine whose retention threshold is
    /// fed with outcomes of forgetting queries.
    pub fn with_forgetting_engine(mut self, engine: Arc<ForgettingEngine>) -> Self {
        self.forgetting = Some(engine);
        self
    }

    /// Run one query end to end.
    pub fn query(&self, request: &QueryRequest) -> QueryResponse {
        let started = Instant::now();
        let now = request.now.unwrap_or_else(Utc::now);
        let top_k = request.top_k.unwrap_or(self.config.default_top_k);
        let query_type = self
            .classifier
            .classify_with_override(&request.text, request.query_type);

        let span = retrieval_span!(request.text, query_type);
        let _guard = span.enter();

        let engine_query = EngineQuery::new(request.text.clone(), top_k)
            .with_query_type(query_type)
            .at(now);

        let invoked: Vec<&Arc<dyn IRetrievalEngine>> = match self.config.mode {
            RetrievalMode::Single => {
                let choice = self.selector.select(query_type);
                let _selection = selection_span!(choice, query_type).entered();
                debug!(engine = %choice.arm, mode = %choice.mode, "engine selected");
                self.engine(choice.arm).into_iter().collect()
            }
            RetrievalMode::Hybrid => self.engines.iter().collect(),
        };

        let mut outputs: Vec<EngineOutput> = Vec::with_capacity(invoked.len());
        for engine in invoked {
            let engine_started = Instant::now();
            let output = engine.query_with(&engine_query);
            let latency = engine_started.elapsed();
            debug!(
                engine = %output.engine,
                hits = output.len(),
                degraded = output.degraded,
                "engine finished"
            );
            if !request.defer_feedback {
                let confidence = engine_confidence(engine.as_ref(), &output);
                if output.engine == EngineKind::Forgetting {
                    self.observe_forgetting(confidence);
                }
                self.selector.record_outcome(
                    output.engine,
                    query_type,
                    !output.is_empty(),
                    confidence,
                    latency,
                );
            }
            outputs.push(output);
        }

        let (fused, fusion) = if outputs.len() > 1 {
            let outcome = self
                .fusion
                .fuse(&outputs, |kind| self.selector.weight(kind), query_type, top_k);
            let fused = outcome.candidates.clone();
            (fused, Some(outcome))
        } else {
            (fuse_basic(&outputs, top_k), None)
        };

        let degraded = outputs.iter().any(|o| o.degraded);
        let mut reason = outputs.iter().find_map(|o| o.reason.clone());
        if fused.is_empty() && reason.is_none() {
            reason = Some("no candidates".to_string());
        }

        let results: Vec<RankedResult> = fused
            .into_iter()
            .map(|c| RankedResult {
                candidate_id: c.candidate_id,
                score: c.score,
                evidence_ids: c.evidence_ids,
                engine_used: c.engine,
                query_type,
                degraded_mode: degraded,
            })
            .collect();

        for result in &results {
            self.graph.record_access(&result.candidate_id, now);
        }

        let latency = started.elapsed();
        if let (Some(outcome), false) = (&fusion, request.defer_feedback) {
            let confidence = outcome_confidence(results.iter().map(|r| {
                self.engine(r.engine_used)
                    .map_or(0.0, |engine| engine.calibrate(r.score))
            }));
            self.fusion
                .record_outcome(outcome, query_type, !results.is_empty(), confidence, latency);
        }

        let engines: Vec<EngineKind> = outputs.iter().map(|o| o.engine).collect();
        let fusion_policy = fusion.as_ref().map(|f| f.policy);
        let mut entry =
            QueryLogEntry::new(&request.text, query_type, engines.clone(), latency, results.len())
                .with_degraded(degraded);
        if let Some(policy) = fusion_policy {
            entry = entry.with_fusion(policy);
        }
        lock(&self.query_log).record(entry);

        self.maybe_adapt_weights();

        info!(
            query_type = %query_type,
            engines = ?engines,
            results = results.len(),
            degraded,
            latency_us = latency.as_micros() as u64,
            "query served"
        );

        QueryResponse {
            results,
            query_type,
            engines,
            fusion_policy,
            fusion_selection: fusion.and_then(|f| f.selection),
            degraded,
            reason,
            latency,
        }
    }

    /// Record an externally judged outcome for a response, in place of the
    /// derived one. Pair with [`QueryRequest::with_deferred_feedback`];
    /// otherwise it is an additional sample.
    pub fn record_feedback(&self, response: &QueryResponse, confidence: f64) {
        let success = confidence > 0.0 && !response.results.is_empty();
        for &engine in &response.engines {
            self.selector.record_outcome(
                engine,
                response.query_type,
                success,
                confidence,
                response.latency,
            );
        }
        if let (Some(policy), Some(_)) = (response.fusion_policy, response.fusion_selection) {
            self.fusion.selector().record_outcome(
                policy,
                response.query_type,
                success,
                confidence,
                response.latency,
            );
        }
        if response.engines.contains(&EngineKind::Forgetting) {
            self.observe_forgetting(confidence);
        }
        debug!(query_type = %response.query_type, confidence, "feedback recorded");
    }

    fn observe_forgetting(&self, confidence: f64) {
        if let Some(engine) = &self.forgetting {
            let threshold = engine.observe(confidence);
            debug!(confidence, threshold, "retention threshold fed");
        }
    }

    /// Selector histories, weights and the retention threshold.
    pub fn save_state(&self) -> PipelineState {
        PipelineState {
            engine_selector: self.selector.export_state(),
            fusion_selector: self.fusion.selector().export_state(),
            forgetting_threshold: self.forgetting.as_ref().map(|f| f.threshold_state()),
        }
    }

    /// Resume from a saved state. The selectors keep their own configuration;
    /// entries for engines this pipeline does not have are skipped.
    pub fn load_state(&self, state: &PipelineState) {
        self.selector.restore_state(&state.engine_selector);
        self.fusion.selector().restore_state(&state.fusion_selector);
        if let (Some(engine), Some(threshold)) = (&self.forgetting, &state.forgetting_threshold) {
            engine.restore_threshold(threshold.clone());
        }
        info!(
            engine_keys = state.engine_selector.records.len(),
            fusion_keys = state.fusion_selector.records.len(),
            "pipeline state loaded"
        );
    }

    /// Forget everything learned; the graph and the query log are untouched.
    pub fn reset_state(&self) {
        self.selector.reset();
        self.fusion.selector().reset();
        if let Some(engine) = &self.forgetting {
            engine.reset_threshold();
        }
        info!("pipeline state reset");
    }

    fn maybe_adapt_weights(&self) {
        let served = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        if self.config.adapt_every == 0 || served % self.config.adapt_every != 0 {
            return;
        }
        match self.selector.adapt_weights(self.learning_rate) {
            Ok(weights) => debug!(served, weights = ?weights, "engine weights adapted"),
            Err(err) => warn!(error = %err, "weight adaptation skipped"),
        }
    }

    pub fn engine(&self, kind: EngineKind) -> Option<&Arc<dyn IRetrievalEngine>> {
        self.engines.iter().find(|e| e.kind() == kind)
    }

    /// Registered engine kinds in registration order.
    pub fn engine_kinds(&self) -> Vec<EngineKind> {
        self.engines.iter().map(|e| e.kind()).collect()
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    pub fn selector(&self) -> &AdaptiveSelector<EngineKind> {
        &self.selector
    }

    pub fn forgetting_engine(&self) -> Option<&Arc<ForgettingEngine>> {
        self.forgetting.as_ref()
    }

    pub fn fusion(&self) -> &FusionEngine {
        &self.fusion
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Copy of the query log.
    pub fn query_log(&self) -> QueryLog {
        lock(&self.query_log).clone()
    }

    pub fn queries_served(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Mean latency over the logged window.
    pub fn avg_latency(&self) -> Duration {
        lock(&self.query_log).avg_latency()
    }
}
