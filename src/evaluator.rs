//! Linear board evaluator and the weight mapping it consumes.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::heuristic::{self, BoardFeatures};

/// Maps a board to a scalar; higher is better for the player.
pub trait BoardEvaluator {
    fn evaluate(&self, board: Board) -> f64;
}

impl<E: BoardEvaluator + ?Sized> BoardEvaluator for &E {
    #[inline]
    fn evaluate(&self, board: Board) -> f64 { (**self).evaluate(board) }
}

/// The six weighted features, in a fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Empty,
    Max,
    Smooth,
    Mono,
    MergePotential,
    CornerMax,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Empty,
        Feature::Max,
        Feature::Smooth,
        Feature::Mono,
        Feature::MergePotential,
        Feature::CornerMax,
    ];

    /// Key used in [`Weights::params`].
    pub fn key(self) -> &'static str {
        match self {
            Feature::Empty => "f_empty",
            Feature::Max => "f_max",
            Feature::Smooth => "f_smooth",
            Feature::Mono => "f_mono",
            Feature::MergePotential => "f_mergePotential",
            Feature::CornerMax => "f_cornerMax",
        }
    }

    /// Older key accepted when [`Self::key`] is absent.
    pub fn legacy_key(self) -> &'static str {
        // Every canonical key is the legacy key behind an `f_` prefix.
        &self.key()[2..]
    }

    fn value(self, f: &BoardFeatures) -> f64 {
        match self {
            Feature::Empty => f.empty,
            Feature::Max => f.max_exponent,
            Feature::Smooth => f.smooth,
            Feature::Mono => f.mono,
            Feature::MergePotential => f.merge_potential,
            Feature::CornerMax => f.corner_max,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.key()) }
}

/// Named evaluator coefficients plus free-form metadata.
///
/// Field names match the JSON weight files (`createdAt` is camel-cased);
/// reading and writing those files is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub version: String,
    pub created_at: String,
    pub params: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, String>>,
}

impl Weights {
    pub fn new(version: impl Into<String>, params: BTreeMap<String, f64>) -> Self {
        Self {
            version: version.into(),
            created_at: now_unix_seconds().to_string(),
            params,
            meta: None,
        }
    }

    /// Hand-tuned starting point.
    ///
    /// ```
    /// use core_2048::evaluator::{Feature, Weights};
    /// let w = Weights::baseline();
    /// assert_eq!(w.get(Feature::Empty), 2.7);
    /// ```
    pub fn baseline() -> Self {
        let params = [
            (Feature::Empty, 2.7),
            (Feature::Max, 1.0),
            (Feature::Smooth, 0.1),
            (Feature::Mono, 1.0),
            (Feature::MergePotential, 0.7),
            (Feature::CornerMax, 0.5),
        ]
        .into_iter()
        .map(|(f, w)| (f.key().to_owned(), w))
        .collect();
        Self::new("baseline-v1", params)
    }

    /// Coefficient for `feature`, falling back to its legacy key, then to 0.
    pub fn get(&self, feature: Feature) -> f64 {
        self.params
            .get(feature.key())
            .or_else(|| self.params.get(feature.legacy_key()))
            .copied()
            .unwrap_or(0.0)
    }
}

fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Weighted sum of [`BoardFeatures`].
///
/// ```
/// use core_2048::board::Board;
/// use core_2048::evaluator::{BoardEvaluator, LinearEvaluator, Weights};
/// let eval = LinearEvaluator::new(Weights::baseline());
/// let open = Board::EMPTY.with_cell(0, 1);
/// let crowded = Board::from_cells([1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 0]);
/// assert!(eval.evaluate(open) > eval.evaluate(crowded));
/// ```
#[derive(Debug, Clone)]
pub struct LinearEvaluator {
    weights: Weights,
    coefficients: [f64; 6],
}

impl LinearEvaluator {
    pub fn new(weights: Weights) -> Self {
        heuristic::warm();
        let coefficients = Feature::ALL.map(|f| weights.get(f));
        Self { weights, coefficients }
    }

    #[inline]
    pub fn weights(&self) -> &Weights { &self.weights }
}

impl Default for LinearEvaluator { fn default() -> Self { Self::new(Weights::baseline()) } }

impl BoardEvaluator for LinearEvaluator {
    fn evaluate(&self, board: Board) -> f64 {
        let features = BoardFeatures::of(board);
        Feature::ALL
            .iter()
            .zip(self.coefficients)
            .map(|(f, w)| w * f.value(&features))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pairs: &[(&str, f64)]) -> Weights {
        Weights::new("test", pairs.iter().map(|&(k, v)| (k.to_owned(), v)).collect())
    }

    #[test]
    fn it_exposes_feature_keys() {
        let keys: Vec<_> = Feature::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys, ["f_empty", "f_max", "f_smooth", "f_mono", "f_mergePotential", "f_cornerMax"]);
        let legacy: Vec<_> = Feature::ALL.iter().map(|f| f.legacy_key()).collect();
        assert_eq!(legacy, ["empty", "max", "smooth", "mono", "mergePotential", "cornerMax"]);
    }

    #[test]
    fn it_falls_back_to_legacy_keys() {
        let w = weights(&[("f_empty", 1.5), ("empty", 9.0), ("cornerMax", 2.0)]);
        assert_eq!(w.get(Feature::Empty), 1.5);
        assert_eq!(w.get(Feature::CornerMax), 2.0);
        assert_eq!(w.get(Feature::Smooth), 0.0);
    }

    #[test]
    fn it_weights_single_features() {
        let b = Board::EMPTY.with_cell(0, 3).with_cell(1, 3).with_cell(6, 1);
        assert_eq!(LinearEvaluator::new(weights(&[("f_empty", 1.0)])).evaluate(b), 13.0);
        assert_eq!(LinearEvaluator::new(weights(&[("max", 2.0)])).evaluate(b), 6.0);
        assert_eq!(LinearEvaluator::new(weights(&[("f_mergePotential", 0.5)])).evaluate(b), 0.5);
        assert_eq!(LinearEvaluator::new(weights(&[("f_cornerMax", 1.0)])).evaluate(b), 3.0);
        assert_eq!(LinearEvaluator::new(weights(&[])).evaluate(b), 0.0);
    }

    #[test]
    fn it_combines_features_linearly() {
        let b = Board::from_cells([5, 4, 3, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        let f = BoardFeatures::of(b);
        let w = Weights::baseline();
        let expected = 2.7 * f.empty
            + 1.0 * f.max_exponent
            + 0.1 * f.smooth
            + 1.0 * f.mono
            + 0.7 * f.merge_potential
            + 0.5 * f.corner_max;
        let got = LinearEvaluator::new(w).evaluate(b);
        assert!((got - expected).abs() < 1e-9, "{got} != {expected}");
    }

    #[test]
    fn it_uses_weight_file_field_names() {
        let json = r#"{
            "version": "ga-7",
            "createdAt": "2024-01-01T00:00:00Z",
            "params": { "f_empty": 3.0, "mono": 1.25 },
            "meta": { "generation": "7" }
        }"#;
        let w: Weights = serde_json::from_str(json).unwrap();
        assert_eq!(w.version, "ga-7");
        assert_eq!(w.get(Feature::Mono), 1.25);
        assert_eq!(w.meta.as_ref().and_then(|m| m.get("generation")).map(String::as_str), Some("7"));

        let out = serde_json::to_value(Weights::baseline()).unwrap();
        assert!(out.get("createdAt").is_some());
        assert!(out.get("meta").is_none());
    }
}
