//! AdaBoost (Adaptive Boosting) implementation
//!
//! SAMME boosting over full decision trees: each round fits a tree on the
//! current sample weights and misclassified samples are weighted more
//! heavily in the next round.

use super::config::AdaBoostConfig;
use super::decision_tree::{class_index, DecisionTree};
use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// AdaBoost Classifier (SAMME variant, supports multi-class)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostClassifier {
    config: AdaBoostConfig,
    estimators: Vec<DecisionTree>,
    estimator_weights: Vec<f64>,
    estimator_errors: Vec<f64>,
    classes: Vec<f64>,
    n_features: usize,
    pub is_fitted: bool,
}

impl Default for AdaBoostClassifier {
    fn default() -> Self {
        Self::new(AdaBoostConfig::default())
    }
}

impl AdaBoostClassifier {
    pub fn new(config: AdaBoostConfig) -> Self {
        Self {
            config,
            estimators: Vec::new(),
            estimator_weights: Vec::new(),
            estimator_errors: Vec::new(),
            classes: Vec::new(),
            n_features: 0,
            is_fitted: false,
        }
    }

    pub fn config(&self) -> &AdaBoostConfig {
        &self.config
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::TrainingError("Cannot fit on zero samples".to_string()));
        }
        if self.config.n_estimators == 0 || self.config.learning_rate <= 0.0 {
            return Err(PipelineError::ConfigError(format!(
                "n_estimators must be > 0 and learning_rate > 0, got {} and {}",
                self.config.n_estimators, self.config.learning_rate
            )));
        }

        // Collect unique classes
        let mut classes: Vec<f64> = y.to_vec();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        classes.dedup();
        let n_classes = classes.len();
        self.classes = classes;
        self.n_features = x.ncols();

        self.estimators.clear();
        self.estimator_weights.clear();
        self.estimator_errors.clear();

        let seed = self.config.random_state.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut weights = Array1::from_elem(n_samples, 1.0 / n_samples as f64);

        for round in 0..self.config.n_estimators {
            let mut tree = DecisionTree::from_config(&self.config.tree);
            if tree.random_state.is_none() {
                tree.random_state = Some(rng.next_u64());
            }
            tree.fit_weighted(x, y, &weights)?;

            let predictions = tree.predict(x)?;
            let incorrect: Vec<bool> = predictions
                .iter()
                .zip(y.iter())
                .map(|(p, t)| (p - t).abs() > 1e-10)
                .collect();

            let total = weights.sum();
            let error = incorrect
                .iter()
                .zip(weights.iter())
                .filter(|(miss, _)| **miss)
                .map(|(_, w)| w)
                .sum::<f64>()
                / total;

            // Perfect fit: keep this tree alone and stop
            if error <= 0.0 {
                self.estimators.push(tree);
                self.estimator_weights.push(1.0);
                self.estimator_errors.push(0.0);
                debug!(round, "Base tree fits training data exactly, stopping early");
                break;
            }

            if error >= 1.0 - 1.0 / n_classes as f64 {
                if self.estimators.is_empty() {
                    return Err(PipelineError::TrainingError(format!(
                        "Base estimator is no better than random (weighted error {:.4})",
                        error
                    )));
                }
                warn!(round, error, "Base estimator no better than random, stopping");
                break;
            }

            // SAMME alpha for multi-class
            let alpha = self.config.learning_rate
                * (((1.0 - error) / error).ln() + (n_classes as f64 - 1.0).ln());

            self.estimators.push(tree);
            self.estimator_weights.push(alpha);
            self.estimator_errors.push(error);
            debug!(round, error, alpha, "Boosting round");

            if round + 1 == self.config.n_estimators {
                break;
            }

            // Update weights
            for (w, miss) in weights.iter_mut().zip(incorrect.iter()) {
                if *miss && *w > 0.0 {
                    *w *= alpha.exp();
                }
            }
            let w_sum = weights.sum();
            if !w_sum.is_finite() || w_sum <= 0.0 {
                warn!(round, "Sample weights degenerated, stopping");
                break;
            }
            weights /= w_sum;
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Weighted vote per class, normalized by the total estimator weight
    fn class_scores(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut scores = Array2::zeros((x.nrows(), self.classes.len()));
        for (tree, &alpha) in self.estimators.iter().zip(self.estimator_weights.iter()) {
            let preds = tree.predict(x)?;
            for (i, p) in preds.iter().enumerate() {
                scores[[i, class_index(&self.classes, *p)]] += alpha;
            }
        }

        let total: f64 = self.estimator_weights.iter().sum();
        if total > 0.0 {
            scores /= total;
        }
        Ok(scores)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let scores = self.class_scores(x)?;

        // Select class with highest weighted vote, first class on ties
        Ok(scores
            .rows()
            .into_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .fold(0, |best, (k, &s)| if s > row[best] { k } else { best });
                self.classes[best]
            })
            .collect())
    }

    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let scores = self.class_scores(x)?;
        let n_classes = self.classes.len();
        let mut proba = Array2::zeros(scores.raw_dim());

        for (i, row) in scores.rows().into_iter().enumerate() {
            let logits: Vec<f64> = if n_classes == 2 {
                let d = (row[1] - row[0]) / 2.0;
                vec![-d, d]
            } else {
                let denom = (n_classes as f64 - 1.0).max(1.0);
                row.iter().map(|s| s / denom).collect()
            };

            // Softmax normalization
            let max_score = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let exp_sum: f64 = logits.iter().map(|&s| (s - max_score).exp()).sum();
            for (j, &s) in logits.iter().enumerate() {
                proba[[i, j]] = (s - max_score).exp() / exp_sum;
            }
        }

        Ok(proba)
    }

    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let preds = self.predict(x)?;
        let correct = preds
            .iter()
            .zip(y.iter())
            .filter(|(p, a)| (*p - *a).abs() < 0.5)
            .count();
        Ok(correct as f64 / y.len().max(1) as f64)
    }

    /// Estimator-weighted mean of the tree importances
    pub fn feature_importances(&self) -> Option<Array1<f64>> {
        if !self.is_fitted || self.n_features == 0 {
            return None;
        }
        let total: f64 = self.estimator_weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut importances = Array1::zeros(self.n_features);
        for (tree, &alpha) in self.estimators.iter().zip(self.estimator_weights.iter()) {
            if let Some(imp) = tree.feature_importances() {
                importances.scaled_add(alpha / total, imp);
            }
        }
        Some(importances)
    }

    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn n_estimators_fitted(&self) -> usize {
        self.estimators.len()
    }

    pub fn estimator_weights(&self) -> &[f64] {
        &self.estimator_weights
    }

    pub fn estimator_errors(&self) -> &[f64] {
        &self.estimator_errors
    }
}
