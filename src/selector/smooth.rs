//! Smooth Weighted Round-Robin selector implementation

use parking_lot::Mutex;
use tracing::debug;

use crate::candidate::{Candidate, WeightConfig};
use crate::{Result, SwrrError};

/// Per-candidate accumulated weights, parallel to configuration order
///
/// Between selections the accumulators always sum to zero: each selection
/// distributes `total_weight` across all candidates and debits exactly
/// `total_weight` from the winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightState {
    current: Vec<i64>,
}

impl WeightState {
    fn zeroed(len: usize) -> Self {
        Self {
            current: vec![0; len],
        }
    }

    /// Accumulated weight per candidate, in configuration order
    pub fn current(&self) -> &[i64] {
        &self.current
    }

    /// Sum of all accumulators (zero between selections)
    pub fn sum(&self) -> i64 {
        self.current.iter().sum()
    }
}

/// Active configuration and its accumulator state, replaced as one unit
#[derive(Debug)]
struct Inner {
    config: WeightConfig,
    state: WeightState,
}

/// Smooth Weighted Round-Robin selector
///
/// Deterministic: the winner is a pure function of the configuration and the
/// accumulator state, with ties resolved to the candidate declared earliest.
/// `next()` and `reconfigure()` serialize on a single lock; the critical
/// section is pure arithmetic and never blocks on I/O.
///
/// Share one instance behind an `Arc` rather than cloning per caller, since
/// independent copies of the state would each restart the cycle and break
/// global proportionality.
#[derive(Debug)]
pub struct SmoothWeight {
    inner: Mutex<Option<Inner>>,
}

impl Default for SmoothWeight {
    fn default() -> Self {
        Self::new()
    }
}

impl SmoothWeight {
    /// Create an unconfigured selector
    ///
    /// `next()` fails with [`SwrrError::NotConfigured`] until a
    /// configuration is installed.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Create a selector from a pre-validated configuration
    pub fn with_config(config: WeightConfig) -> Self {
        let state = WeightState::zeroed(config.len());
        Self {
            inner: Mutex::new(Some(Inner { config, state })),
        }
    }

    /// Validate a candidate list and create a configured selector
    pub fn with_candidates(candidates: Vec<Candidate>) -> Result<Self> {
        Ok(Self::with_config(WeightConfig::new(candidates)?))
    }

    /// Select the next candidate and return its id
    ///
    /// Each call adds every candidate's base weight to its accumulator,
    /// picks the largest accumulator, and debits the winner by the total
    /// weight. Ties resolve to the candidate declared earliest.
    pub fn next(&self) -> Result<String> {
        let mut guard = self.inner.lock();
        let inner = guard.as_mut().ok_or(SwrrError::NotConfigured)?;

        let candidates = inner.config.candidates();
        let current = &mut inner.state.current;

        // Strict `>` keeps the earliest candidate on ties
        let mut winner = 0;
        for (i, candidate) in candidates.iter().enumerate() {
            current[i] += candidate.weight as i64;
            if current[i] > current[winner] {
                winner = i;
            }
        }
        current[winner] -= inner.config.total_weight();

        Ok(candidates[winner].id.clone())
    }

    /// Validate a candidate list and atomically install it, resetting all
    /// accumulators to zero
    ///
    /// On validation failure the active configuration and its state are
    /// left untouched.
    pub fn reconfigure(&self, candidates: Vec<Candidate>) -> Result<()> {
        let config = WeightConfig::new(candidates)?;
        self.install(config);
        Ok(())
    }

    /// Atomically install a pre-validated configuration with a zeroed state
    pub fn install(&self, config: WeightConfig) {
        let state = WeightState::zeroed(config.len());
        debug!(
            "Installing weight configuration: {} candidates, total weight {}",
            config.len(),
            config.total_weight()
        );
        let mut guard = self.inner.lock();
        *guard = Some(Inner { config, state });
    }

    /// Candidates of the active configuration, in declaration order
    pub fn candidates(&self) -> Vec<Candidate> {
        self.inner
            .lock()
            .as_ref()
            .map(|inner| inner.config.candidates().to_vec())
            .unwrap_or_default()
    }

    /// Total weight of the active configuration (0 when unconfigured)
    pub fn total_weight(&self) -> i64 {
        self.inner
            .lock()
            .as_ref()
            .map(|inner| inner.config.total_weight())
            .unwrap_or(0)
    }

    /// Snapshot of the accumulator state, `None` when unconfigured
    pub fn state(&self) -> Option<WeightState> {
        self.inner.lock().as_ref().map(|inner| inner.state.clone())
    }

    /// Number of candidates in the active configuration
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .as_ref()
            .map(|inner| inner.config.len())
            .unwrap_or(0)
    }

    /// Check if no configuration is active or the configuration is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn selector(weights: &[(&str, u32)]) -> SmoothWeight {
        let candidates = weights
            .iter()
            .map(|(id, w)| Candidate::new(*id, *w))
            .collect();
        SmoothWeight::with_candidates(candidates).unwrap()
    }

    fn pick(selector: &SmoothWeight, n: usize) -> Vec<String> {
        (0..n).map(|_| selector.next().unwrap()).collect()
    }

    fn counts(picks: &[String]) -> HashMap<String, usize> {
        picks.iter().fold(HashMap::new(), |mut acc, id| {
            *acc.entry(id.clone()).or_insert(0) += 1;
            acc
        })
    }

    #[test]
    fn test_next_unconfigured() {
        let selector = SmoothWeight::new();
        assert!(matches!(selector.next(), Err(SwrrError::NotConfigured)));
        assert!(selector.state().is_none());
        assert!(selector.is_empty());
    }

    #[test]
    fn test_single_candidate() {
        let selector = selector(&[("only", 3)]);
        for _ in 0..7 {
            assert_eq!(selector.next().unwrap(), "only");
        }
    }

    #[test]
    fn test_cycle_proportionality() {
        let selector = selector(&[("a", 5), ("b", 3), ("c", 2)]);

        // Exact counts over each full cycle of total_weight calls
        for _ in 0..3 {
            let picks = pick(&selector, 10);
            let counts = counts(&picks);
            assert_eq!(counts["a"], 5);
            assert_eq!(counts["b"], 3);
            assert_eq!(counts["c"], 2);
        }
    }

    #[test]
    fn test_zero_sum_invariant() {
        let selector = selector(&[("a", 5), ("b", 3), ("c", 2)]);
        for _ in 0..25 {
            selector.next().unwrap();
            assert_eq!(selector.state().unwrap().sum(), 0);
        }
    }

    #[test]
    fn test_determinism() {
        let first = selector(&[("a", 4), ("b", 2), ("c", 1)]);
        let second = selector(&[("a", 4), ("b", 2), ("c", 1)]);
        assert_eq!(pick(&first, 21), pick(&second, 21));
    }

    #[test]
    fn test_tie_break_order() {
        // Equal weights: the first call ties at effective {a: 1, b: 1} and
        // must resolve to the earliest declared candidate
        let selector = selector(&[("a", 1), ("b", 1)]);
        assert_eq!(selector.next().unwrap(), "a");
        assert_eq!(selector.next().unwrap(), "b");
        assert_eq!(selector.next().unwrap(), "a");
        assert_eq!(selector.next().unwrap(), "b");
    }

    #[test]
    fn test_known_sequence() {
        // The classic reference sequence for weights 4:2:1
        let selector = selector(&[("a", 4), ("b", 2), ("c", 1)]);
        let picks = pick(&selector, 7);
        assert_eq!(picks, vec!["a", "b", "a", "c", "a", "b", "a"]);
    }

    #[test]
    fn test_spread_bound() {
        // {a: 5, b: 1}: b lands mid-cycle instead of the naive
        // five-a-then-b burst, and a is never absent for more than
        // ceil(6 / 5) = 2 consecutive calls
        let selector = selector(&[("a", 5), ("b", 1)]);
        let picks = pick(&selector, 12);
        assert_eq!(
            picks,
            vec!["a", "a", "a", "b", "a", "a", "a", "a", "a", "b", "a", "a"]
        );

        let mut starved = 0;
        for id in &picks {
            if id == "a" {
                starved = 0;
            } else {
                starved += 1;
                assert!(starved <= 2, "a starved for {} consecutive calls", starved);
            }
        }
    }

    #[test]
    fn test_reconfigure_reset() {
        let selector = selector(&[("a", 5), ("b", 3), ("c", 2)]);
        pick(&selector, 4);

        selector
            .reconfigure(vec![Candidate::new("x", 2), Candidate::new("y", 1)])
            .unwrap();

        // State is zeroed, so the first effective values equal the base
        // weights exactly
        let state = selector.state().unwrap();
        assert_eq!(state.current(), &[0, 0]);
        assert_eq!(selector.total_weight(), 3);
        assert_eq!(pick(&selector, 3), vec!["x", "y", "x"]);
    }

    #[test]
    fn test_reconfigure_invalid_keeps_active() {
        let selector = selector(&[("a", 2), ("b", 1)]);
        assert_eq!(selector.next().unwrap(), "a");

        let err = selector.reconfigure(vec![]).unwrap_err();
        assert!(matches!(err, SwrrError::Config(_)));

        let err = selector
            .reconfigure(vec![Candidate::new("x", 0)])
            .unwrap_err();
        assert!(matches!(err, SwrrError::Config(_)));

        let err = selector
            .reconfigure(vec![Candidate::new("x", 1), Candidate::new("x", 2)])
            .unwrap_err();
        assert!(matches!(err, SwrrError::Config(_)));

        // The old configuration and its state survive: the sequence
        // continues exactly where it left off
        assert_eq!(pick(&selector, 2), vec!["b", "a"]);
        assert_eq!(selector.len(), 2);
    }

    #[test]
    fn test_concurrent_proportionality() {
        // The lock serializes selection steps, so any interleaving of
        // 1000 calls covers exactly 100 full cycles and the global counts
        // stay exactly proportional
        let selector = Arc::new(selector(&[("a", 5), ("b", 3), ("c", 2)]));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let selector = selector.clone();
                std::thread::spawn(move || pick(&selector, 250))
            })
            .collect();

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }

        let counts = counts(&all);
        assert_eq!(counts["a"], 500);
        assert_eq!(counts["b"], 300);
        assert_eq!(counts["c"], 200);
        assert_eq!(selector.state().unwrap().sum(), 0);
    }
}
