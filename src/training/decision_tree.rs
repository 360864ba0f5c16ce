//! Sample-weighted CART classification tree

use super::config::{Criterion, TreeConfig};
use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree node. Children are indices into the tree's node arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with the majority class and the weighted class distribution
    Leaf {
        value: f64,
        distribution: Vec<f64>,
        n_samples: usize,
    },
    /// Internal node: `x[feature_idx] <= threshold` goes left, anything
    /// else (NaN included) goes right
    Split {
        feature_idx: usize,
        threshold: f64,
        left: usize,
        right: usize,
        n_samples: usize,
        impurity: f64,
    },
}

/// Best split candidate for one feature
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Training state shared by every node of one fit
struct FitContext<'a> {
    x: &'a Array2<f64>,
    y_idx: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
}

/// Node still to be built: its arena slot and the rows that reach it
struct PendingNode {
    slot: usize,
    indices: Vec<usize>,
    depth: usize,
}

/// Result of examining one pending node
enum NodeOutcome {
    Leaf(TreeNode),
    Split {
        candidate: SplitCandidate,
        left: Vec<usize>,
        right: Vec<usize>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Classification tree trained on optional sample weights.
///
/// The seed fixes the order in which features are scanned at each node, so
/// ties between equally good splits resolve the same way across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node arena, root at index 0; empty until fitted
    nodes: Vec<TreeNode>,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub criterion: Criterion,
    pub random_state: Option<u64>,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
    classes: Vec<f64>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::from_config(&TreeConfig::default())
    }
}

impl DecisionTree {
    pub fn from_config(config: &TreeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            min_samples_leaf: config.min_samples_leaf.max(1),
            criterion: config.criterion,
            random_state: config.random_state,
            n_features: 0,
            feature_importances: None,
            classes: Vec::new(),
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Fit with uniform sample weights
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let weights = Array1::from_elem(y.len(), 1.0);
        self.fit_weighted(x, y, &weights)
    }

    /// Fit the tree; `sample_weight` scales each row's contribution to the
    /// impurity and leaf votes
    pub fn fit_weighted(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_weight: &Array1<f64>,
    ) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() || n_samples != sample_weight.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y and sample_weight length = {}", n_samples),
                actual: format!("y = {}, sample_weight = {}", y.len(), sample_weight.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::TrainingError("Cannot fit a tree on zero samples".to_string()));
        }

        let mut classes: Vec<f64> = y.to_vec();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        classes.dedup();
        let y_idx: Vec<usize> = y.iter().map(|&v| class_index(&classes, v)).collect();

        self.n_features = n_features;
        self.classes = classes;

        let weights = sample_weight.to_vec();
        let ctx = FitContext {
            x,
            y_idx: &y_idx,
            weights: &weights,
            n_classes: self.classes.len(),
        };

        let seed = self.random_state.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();

        self.nodes = self.build_tree(&ctx, indices, &mut importances, &mut rng);

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    /// Grow the tree depth-first, left child before right, from an explicit
    /// work-list of pending nodes
    fn build_tree(
        &self,
        ctx: &FitContext<'_>,
        indices: Vec<usize>,
        importances: &mut [f64],
        rng: &mut ChaCha8Rng,
    ) -> Vec<TreeNode> {
        let placeholder = || TreeNode::Leaf {
            value: 0.0,
            distribution: Vec::new(),
            n_samples: 0,
        };

        let mut nodes = vec![placeholder()];
        let mut pending = vec![PendingNode { slot: 0, indices, depth: 0 }];

        while let Some(node) = pending.pop() {
            match self.examine_node(ctx, &node.indices, node.depth, importances, rng) {
                NodeOutcome::Leaf(leaf) => nodes[node.slot] = leaf,
                NodeOutcome::Split { candidate, left, right, n_samples, impurity } => {
                    let left_slot = nodes.len();
                    let right_slot = left_slot + 1;
                    nodes.push(placeholder());
                    nodes.push(placeholder());

                    nodes[node.slot] = TreeNode::Split {
                        feature_idx: candidate.feature_idx,
                        threshold: candidate.threshold,
                        left: left_slot,
                        right: right_slot,
                        n_samples,
                        impurity,
                    };

                    // Popped in reverse: the left subtree is finished first
                    pending.push(PendingNode { slot: right_slot, indices: right, depth: node.depth + 1 });
                    pending.push(PendingNode { slot: left_slot, indices: left, depth: node.depth + 1 });
                }
            }
        }
        nodes
    }

    fn examine_node(
        &self,
        ctx: &FitContext<'_>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
        rng: &mut ChaCha8Rng,
    ) -> NodeOutcome {
        let n_samples = indices.len();
        let counts = class_weights(ctx, indices);
        let node_weight: f64 = counts.iter().sum();
        let impurity = self.impurity(&counts);

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || counts.iter().filter(|&&w| w > 0.0).count() <= 1;

        if should_stop {
            return NodeOutcome::Leaf(self.leaf(&counts, n_samples));
        }

        let mut order: Vec<usize> = (0..ctx.x.ncols()).collect();
        order.shuffle(rng);

        let Some(candidate) = self.find_best_split(ctx, indices, &order, &counts, impurity) else {
            return NodeOutcome::Leaf(self.leaf(&counts, n_samples));
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| ctx.x[[i, candidate.feature_idx]] <= candidate.threshold);

        let left_counts = class_weights(ctx, &left);
        let right_counts = class_weights(ctx, &right);
        let left_weight: f64 = left_counts.iter().sum();
        let right_weight: f64 = right_counts.iter().sum();
        importances[candidate.feature_idx] += node_weight * impurity
            - left_weight * self.impurity(&left_counts)
            - right_weight * self.impurity(&right_counts);

        NodeOutcome::Split {
            candidate,
            left,
            right,
            n_samples,
            impurity,
        }
    }

    /// Scan features in `order` in parallel; the first candidate with the
    /// highest gain wins
    fn find_best_split(
        &self,
        ctx: &FitContext<'_>,
        indices: &[usize],
        order: &[usize],
        parent_counts: &[f64],
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let per_feature: Vec<Option<SplitCandidate>> = order
            .par_iter()
            .map(|&feature_idx| {
                self.best_split_for_feature(ctx, indices, feature_idx, parent_counts, parent_impurity)
            })
            .collect();

        per_feature
            .into_iter()
            .flatten()
            .fold(None, |best: Option<SplitCandidate>, cand| match best {
                Some(b) if b.gain >= cand.gain => Some(b),
                _ => Some(cand),
            })
    }

    fn best_split_for_feature(
        &self,
        ctx: &FitContext<'_>,
        indices: &[usize],
        feature_idx: usize,
        parent_counts: &[f64],
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let mut sorted: Vec<(f64, usize)> = indices
            .iter()
            .map(|&i| (ctx.x[[i, feature_idx]], i))
            .filter(|(v, _)| !v.is_nan())
            .collect();
        if sorted.len() < 2 {
            return None;
        }
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let total_weight: f64 = parent_counts.iter().sum();
        if total_weight <= 0.0 {
            return None;
        }

        // NaN rows never move left, so the right side starts with everything
        let mut left = vec![0.0; ctx.n_classes];
        let mut right = parent_counts.to_vec();
        let mut left_n = 0usize;
        let n = indices.len();

        let mut best: Option<SplitCandidate> = None;
        for pos in 0..sorted.len() - 1 {
            let (value, i) = sorted[pos];
            let w = ctx.weights[i];
            left[ctx.y_idx[i]] += w;
            right[ctx.y_idx[i]] -= w;
            left_n += 1;

            let next = sorted[pos + 1].0;
            if next <= value {
                continue;
            }
            if left_n < self.min_samples_leaf || n - left_n < self.min_samples_leaf {
                continue;
            }

            let left_weight: f64 = left.iter().sum();
            let right_weight: f64 = right.iter().sum::<f64>().max(0.0);
            let weighted = (left_weight * self.impurity(&left) + right_weight * self.impurity(&right))
                / total_weight;
            let gain = parent_impurity - weighted;

            if best.map_or(true, |b| gain > b.gain) {
                let mut threshold = value / 2.0 + next / 2.0;
                if threshold >= next || !threshold.is_finite() {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature_idx,
                    threshold,
                    gain,
                });
            }
        }
        best
    }

    fn impurity(&self, counts: &[f64]) -> f64 {
        let total: f64 = counts.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        match self.criterion {
            Criterion::Gini => {
                1.0 - counts
                    .iter()
                    .map(|&c| (c.max(0.0) / total).powi(2))
                    .sum::<f64>()
            }
            Criterion::Entropy => -counts
                .iter()
                .map(|&c| {
                    let p = c.max(0.0) / total;
                    if p > 0.0 { p * p.ln() } else { 0.0 }
                })
                .sum::<f64>(),
        }
    }

    fn leaf(&self, counts: &[f64], n_samples: usize) -> TreeNode {
        let total: f64 = counts.iter().sum();
        let distribution: Vec<f64> = if total > 0.0 {
            counts.iter().map(|&c| c / total).collect()
        } else {
            vec![1.0 / counts.len().max(1) as f64; counts.len()]
        };
        // First class wins ties
        let best = counts
            .iter()
            .enumerate()
            .fold(0, |best, (k, &c)| if c > counts[best] { k } else { best });

        TreeNode::Leaf {
            value: self.classes.get(best).copied().unwrap_or(0.0),
            distribution,
            n_samples,
        }
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_fitted(x)?;

        Ok(x.rows()
            .into_iter()
            .map(|row| match self.find_leaf(&row) {
                TreeNode::Leaf { value, .. } => *value,
                TreeNode::Split { .. } => unreachable!("find_leaf returns leaves"),
            })
            .collect())
    }

    /// Class probabilities, one column per entry of [`classes`](Self::classes)
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_fitted(x)?;

        let mut proba = Array2::zeros((x.nrows(), self.classes.len()));
        for (i, row) in x.rows().into_iter().enumerate() {
            if let TreeNode::Leaf { distribution, .. } = self.find_leaf(&row) {
                for (k, p) in distribution.iter().enumerate() {
                    proba[[i, k]] = *p;
                }
            }
        }
        Ok(proba)
    }

    fn find_leaf(&self, row: &ArrayView1<'_, f64>) -> &TreeNode {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    idx = if row[*feature_idx] <= *threshold { *left } else { *right };
                }
                leaf => return leaf,
            }
        }
    }

    fn check_fitted(&self, x: &Array2<f64>) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(PipelineError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(PipelineError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(())
    }

    /// Sorted class labels seen during fit
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get tree depth (a single leaf has depth 1)
    pub fn get_depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let TreeNode::Split { left, right, .. } = &self.nodes[idx] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    /// All nodes, root first
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}

/// Index of `value` among the sorted classes
pub(crate) fn class_index(classes: &[f64], value: f64) -> usize {
    classes
        .iter()
        .position(|&c| (c - value).abs() < 1e-10)
        .unwrap_or(0)
}

fn class_weights(ctx: &FitContext<'_>, indices: &[usize]) -> Vec<f64> {
    let mut counts = vec![0.0; ctx.n_classes];
    for &i in indices {
        counts[ctx.y_idx[i]] += ctx.weights[i];
    }
    counts
}
