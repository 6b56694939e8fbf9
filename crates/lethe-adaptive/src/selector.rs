//! AdaptiveSelector: epsilon-greedy choice with per-key locks via DashMap.

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use lethe_core::config::SelectorConfig;
use lethe_core::constants::{ADAPTIVE_WEIGHT_MAX, ADAPTIVE_WEIGHT_MIN};
use lethe_core::errors::ConfigError;
use lethe_core::QueryType;

use crate::events::OutcomeEvent;
use crate::record::{OutcomeSample, PerformanceRecord};
use crate::state::ArmState;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Anything the selector can choose between.
pub trait Arm: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> Arm for T where T: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// How a choice was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Best mean confidence among exploiting arms.
    Exploit,
    /// Random non-best arm, taken with probability epsilon.
    Explore,
    /// No arm had enough history yet.
    Uniform,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exploit => "exploit",
            Self::Explore => "explore",
            Self::Uniform => "uniform",
        })
    }
}

/// Result of [`AdaptiveSelector::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineChoice<A> {
    pub arm: A,
    pub mode: SelectionMode,
}

impl<A: Display> fmt::Display for EngineChoice<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.arm, self.mode)
    }
}

/// Statistics for one key in a [`SelectorSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyStats<A> {
    pub arm: A,
    pub query_type: QueryType,
    pub count: usize,
    pub mean_confidence: f64,
    pub success_rate: f64,
    pub mean_latency: Duration,
    pub performance_score: f64,
    pub state: ArmState,
}

/// Point-in-time view of every key and weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorSnapshot<A> {
    /// Sorted by query type, then registration order.
    pub keys: Vec<KeyStats<A>>,
    /// In registration order.
    pub weights: Vec<(A, f64)>,
}

/// Window contents of one (arm, query type) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordState<A> {
    pub arm: A,
    pub query_type: QueryType,
    /// Oldest first.
    pub samples: Vec<OutcomeSample>,
}

/// Everything a selector has learned, plus the configuration it ran with.
/// Serialisable so a long-running service can persist and resume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorState<A> {
    pub config: SelectorConfig,
    pub records: Vec<RecordState<A>>,
    pub weights: Vec<(A, f64)>,
}

impl<A: Serialize> SelectorState<A> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<A: DeserializeOwned> SelectorState<A> {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

type Key<A> = (A, QueryType);

/// Epsilon-greedy selector over a fixed set of arms.
///
/// History is keyed by (arm, query type). Each key has its own lock, so
/// writers on different keys never block each other.
pub struct AdaptiveSelector<A: Arm> {
    arms: Vec<A>,
    restrictions: HashMap<QueryType, Vec<A>>,
    records: DashMap<Key<A>, Arc<Mutex<PerformanceRecord>>>,
    weights: Mutex<HashMap<A, f64>>,
    rng: Mutex<StdRng>,
    epsilon: f64,
    min_samples: usize,
    capacity: usize,
    config: SelectorConfig,
    events: broadcast::Sender<OutcomeEvent<A>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding one of these locks cannot leave the data
    // half-updated, so poisoning is ignored.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A: Arm> AdaptiveSelector<A> {
    /// Create a selector. The RNG is seeded from `config.seed`, or from OS
    /// entropy when unset.
    pub fn new(arms: Vec<A>, config: &SelectorConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(arms, config, rng)
    }

    /// Create a selector with an injected RNG.
    pub fn with_rng(
        arms: Vec<A>,
        config: &SelectorConfig,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&config.epsilon) {
            return Err(ConfigError::InvalidEpsilon {
                value: config.epsilon,
            });
        }
        if config.window_capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                name: "selector.window_capacity".to_string(),
                value: 0,
            });
        }
        if !(config.learning_rate > 0.0 && config.learning_rate <= 1.0) {
            return Err(ConfigError::InvalidLearningRate {
                value: config.learning_rate,
            });
        }

        let mut unique = Vec::with_capacity(arms.len());
        for arm in arms {
            if !unique.contains(&arm) {
                unique.push(arm);
            }
        }
        if unique.is_empty() {
            return Err(ConfigError::EmptyCandidateSet {
                name: "selector arms".to_string(),
            });
        }

        let weights = unique.iter().map(|a| (*a, 1.0)).collect();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            arms: unique,
            restrictions: HashMap::new(),
            records: DashMap::new(),
            weights: Mutex::new(weights),
            rng: Mutex::new(rng),
            epsilon: config.epsilon,
            min_samples: config.min_samples,
            capacity: config.window_capacity,
            config: config.clone(),
            events,
        })
    }

    /// Restrict the candidates for one query type. Unknown arms are ignored;
    /// the order follows registration order.
    pub fn restrict(&mut self, query_type: QueryType, candidates: &[A]) -> Result<(), ConfigError> {
        let allowed: Vec<A> = self
            .arms
            .iter()
            .copied()
            .filter(|a| candidates.contains(a))
            .collect();
        if allowed.is_empty() {
            return Err(ConfigError::EmptyCandidateSet {
                name: format!("query type {query_type}"),
            });
        }
        self.restrictions.insert(query_type, allowed);
        Ok(())
    }

    pub fn arms(&self) -> &[A] {
        &self.arms
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Candidates for a query type, in registration order.
    pub fn candidates(&self, query_type: QueryType) -> &[A] {
        self.restrictions
            .get(&query_type)
            .map(Vec::as_slice)
            .unwrap_or(&self.arms)
    }

    /// Pick an arm for a query type.
    ///
    /// Only keys in the Exploiting state compete for exploit; ties go to the
    /// earlier-registered arm. With probability epsilon a uniformly random
    /// other candidate is explored instead. When no candidate is exploiting
    /// yet the pick is uniform over all candidates.
    pub fn select(&self, query_type: QueryType) -> EngineChoice<A> {
        let candidates = self.candidates(query_type);

        let mut best: Option<(A, f64)> = None;
        for &arm in candidates {
            let Some(record) = self.record_handle(arm, query_type) else {
                continue;
            };
            let record = lock(&record);
            if ArmState::from_count(record.len(), self.min_samples) != ArmState::Exploiting {
                continue;
            }
            let mean = record.mean_confidence();
            if best.map_or(true, |(_, m)| mean > m) {
                best = Some((arm, mean));
            }
        }

        let mut rng = lock(&self.rng);
        let choice = match best {
            None => EngineChoice {
                arm: candidates[rng.gen_range(0..candidates.len())],
                mode: SelectionMode::Uniform,
            },
            Some((exploit, _)) => {
                let roll: f64 = rng.gen();
                if roll < self.epsilon && candidates.len() > 1 {
                    let others: Vec<A> = candidates
                        .iter()
                        .copied()
                        .filter(|a| *a != exploit)
                        .collect();
                    EngineChoice {
                        arm: others[rng.gen_range(0..others.len())],
                        mode: SelectionMode::Explore,
                    }
                } else {
                    EngineChoice {
                        arm: exploit,
                        mode: SelectionMode::Exploit,
                    }
                }
            }
        };
        debug!(query_type = %query_type, choice = %choice, "arm selected");
        choice
    }

    /// Append an outcome for (arm, query type) and publish it.
    pub fn record_outcome(
        &self,
        arm: A,
        query_type: QueryType,
        success: bool,
        confidence: f64,
        latency: Duration,
    ) {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        let handle = self
            .records
            .entry((arm, query_type))
            .or_insert_with(|| Arc::new(Mutex::new(PerformanceRecord::new(self.capacity))))
            .value()
            .clone();

        let window_len = {
            let mut record = lock(&handle);
            record.push(OutcomeSample {
                success,
                confidence,
                latency,
            });
            record.len()
        };

        // No subscribers is fine.
        let _ = self.events.send(OutcomeEvent {
            arm,
            query_type,
            success,
            confidence,
            latency,
            window_len,
            recorded_at: chrono::Utc::now(),
        });
    }

    /// Nudge every observed arm's weight toward its mean confidence relative
    /// to the global mean, clamped to [0.1, 2.0]. Returns the new weights.
    pub fn adapt_weights(&self, learning_rate: f64) -> Result<HashMap<A, f64>, ConfigError> {
        if !(learning_rate > 0.0 && learning_rate <= 1.0) {
            return Err(ConfigError::InvalidLearningRate {
                value: learning_rate,
            });
        }

        // Summed in registration order, then query-type order.
        let mut per_arm: Vec<(A, f64, usize)> = Vec::with_capacity(self.arms.len());
        for &arm in &self.arms {
            let (mut sum, mut n) = (0.0, 0usize);
            for query_type in QueryType::ALL {
                if let Some(record) = self.record_handle(arm, query_type) {
                    let record = lock(&record);
                    sum += record.confidence_sum();
                    n += record.len();
                }
            }
            per_arm.push((arm, sum, n));
        }

        let (total, count) = per_arm
            .iter()
            .fold((0.0, 0usize), |(s, c), (_, sum, n)| (s + sum, c + n));
        let mut weights = lock(&self.weights);
        if count == 0 || total <= 0.0 {
            return Ok(weights.clone());
        }
        let global_mean = total / count as f64;

        for (arm, sum, n) in per_arm {
            if n == 0 {
                continue;
            }
            let target = (sum / n as f64) / global_mean;
            let w = weights.entry(arm).or_insert(1.0);
            *w = (*w + learning_rate * (target - *w))
                .clamp(ADAPTIVE_WEIGHT_MIN, ADAPTIVE_WEIGHT_MAX);
        }
        debug!(global_mean, "adaptive weights updated");
        Ok(weights.clone())
    }

    /// Current multiplicative weight of an arm (1.0 if never adapted).
    pub fn weight(&self, arm: A) -> f64 {
        lock(&self.weights).get(&arm).copied().unwrap_or(1.0)
    }

    pub fn weights(&self) -> HashMap<A, f64> {
        lock(&self.weights).clone()
    }

    pub fn state(&self, arm: A, query_type: QueryType) -> ArmState {
        let count = self
            .record_handle(arm, query_type)
            .map(|r| lock(&r).len())
            .unwrap_or(0);
        ArmState::from_count(count, self.min_samples)
    }

    /// Copy of the record for a key, if it has ever been observed.
    pub fn record(&self, arm: A, query_type: QueryType) -> Option<PerformanceRecord> {
        self.record_handle(arm, query_type).map(|r| lock(&r).clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutcomeEvent<A>> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SelectorSnapshot<A> {
        let mut keys = Vec::new();
        for query_type in QueryType::ALL {
            for &arm in &self.arms {
                let Some(record) = self.record(arm, query_type) else {
                    continue;
                };
                keys.push(KeyStats {
                    arm,
                    query_type,
                    count: record.len(),
                    mean_confidence: record.mean_confidence(),
                    success_rate: record.success_rate(),
                    mean_latency: record.mean_latency(),
                    performance_score: record.performance_score(),
                    state: ArmState::from_count(record.len(), self.min_samples),
                });
            }
        }
        let weights = {
            let w = lock(&self.weights);
            self.arms
                .iter()
                .map(|a| (*a, w.get(a).copied().unwrap_or(1.0)))
                .collect()
        };
        SelectorSnapshot { keys, weights }
    }

    /// Records (registration order, then query type) and weights, with the
    /// configuration this selector was built from.
    pub fn export_state(&self) -> SelectorState<A> {
        let mut records = Vec::new();
        for &arm in &self.arms {
            for query_type in QueryType::ALL {
                if let Some(record) = self.record(arm, query_type) {
                    records.push(RecordState {
                        arm,
                        query_type,
                        samples: record.samples().copied().collect(),
                    });
                }
            }
        }
        let weights = {
            let w = lock(&self.weights);
            self.arms
                .iter()
                .map(|a| (*a, w.get(a).copied().unwrap_or(1.0)))
                .collect()
        };
        SelectorState {
            config: self.config.clone(),
            records,
            weights,
        }
    }

    /// Replace all history and weights with `state`. Entries for arms this
    /// selector does not know are skipped. Windows keep this selector's
    /// capacity, so an oversized saved window keeps its newest samples.
    /// Weights are clamped to the adaptive bounds; non-finite ones reset to 1.
    pub fn restore_state(&self, state: &SelectorState<A>) {
        self.records.clear();
        for saved in &state.records {
            if !self.arms.contains(&saved.arm) {
                continue;
            }
            let mut record = PerformanceRecord::new(self.capacity);
            for sample in &saved.samples {
                record.push(*sample);
            }
            self.records
                .insert((saved.arm, saved.query_type), Arc::new(Mutex::new(record)));
        }

        let mut weights = lock(&self.weights);
        *weights = self.arms.iter().map(|a| (*a, 1.0)).collect();
        for &(arm, weight) in &state.weights {
            if let Some(w) = weights.get_mut(&arm) {
                *w = if weight.is_finite() {
                    weight.clamp(ADAPTIVE_WEIGHT_MIN, ADAPTIVE_WEIGHT_MAX)
                } else {
                    1.0
                };
            }
        }
        debug!(keys = self.records.len(), "selector state restored");
    }

    /// A selector over `arms` configured and primed from `state`.
    pub fn from_state(arms: Vec<A>, state: &SelectorState<A>) -> Result<Self, ConfigError> {
        let selector = Self::new(arms, &state.config)?;
        selector.restore_state(state);
        Ok(selector)
    }

    /// Drop all history and return every weight to 1.
    pub fn reset(&self) {
        self.records.clear();
        *lock(&self.weights) = self.arms.iter().map(|a| (*a, 1.0)).collect();
        debug!("selector state reset");
    }

    fn record_handle(
        &self,
        arm: A,
        query_type: QueryType,
    ) -> Option<Arc<Mutex<PerformanceRecord>>> {
        self.records
            .get(&(arm, query_type))
            .map(|r| Arc::clone(r.value()))
    }
}
