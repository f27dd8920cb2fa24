//! Logistic scoring and the SGD update with L2 regularization.

use reverie_core::constants::{LOGIT_CLAMP, MAX_WEIGHT};
use reverie_core::models::{FeatureContributions, FeatureVector, FeatureWeights, TrainingExample};

const LOG_EPSILON: f64 = 1e-10;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Model inputs in weight order; the last slot is the bias input.
fn inputs(f: &FeatureVector) -> [f64; 8] {
    [
        f.semantic_similarity,
        f.topic_match_value(),
        f.file_overlap,
        f.type_match,
        -f.normalized_time_delta(),
        f.priority_score,
        -f.normalized_reference_count(),
        1.0,
    ]
}

pub fn contributions(f: &FeatureVector, w: &FeatureWeights) -> FeatureContributions {
    let x = inputs(f);
    FeatureContributions {
        semantic_similarity: x[0] * w.semantic_similarity,
        topic_match: x[1] * w.topic_match,
        file_overlap: x[2] * w.file_overlap,
        type_match: x[3] * w.type_match,
        time_decay: x[4] * w.time_decay,
        priority_boost: x[5] * w.priority_boost,
        reference_decay: x[6] * w.reference_decay,
        bias: w.bias,
    }
}

pub fn confidence(contrib: &FeatureContributions) -> f64 {
    sigmoid(contrib.logit().clamp(-LOGIT_CLAMP, LOGIT_CLAMP))
}

fn score(f: &FeatureVector, w: &FeatureWeights) -> f64 {
    confidence(&contributions(f, w))
}

/// One stochastic step on a single example.
fn step(w: FeatureWeights, example: &TrainingExample, lr: f64, reg: f64) -> FeatureWeights {
    let err = score(&example.features, &w) - if example.label { 1.0 } else { 0.0 };
    let x = inputs(&example.features);
    let cur = w.as_array();
    let next: Vec<f64> = cur
        .iter()
        .zip(x.iter())
        .map(|(wi, xi)| wi - lr * (err * xi + 2.0 * reg * wi))
        .collect();
    FeatureWeights {
        semantic_similarity: next[0],
        topic_match: next[1],
        file_overlap: next[2],
        type_match: next[3],
        time_decay: next[4],
        priority_boost: next[5],
        reference_decay: next[6],
        bias: next[7],
    }
    .clipped(MAX_WEIGHT)
}

/// Run `epochs` passes over `examples` starting from `start`.
pub fn fit(
    start: FeatureWeights,
    examples: &[TrainingExample],
    epochs: usize,
    lr: f64,
    reg: f64,
) -> FeatureWeights {
    let mut w = start;
    for _ in 0..epochs.max(1) {
        for example in examples {
            w = step(w, example, lr, reg);
        }
    }
    w
}

/// Mean binary cross-entropy and accuracy of `w` over `examples`.
pub fn evaluate(w: &FeatureWeights, examples: &[TrainingExample]) -> (f64, f64) {
    if examples.is_empty() {
        return (0.0, 0.0);
    }
    let mut loss = 0.0;
    let mut correct = 0usize;
    for example in examples {
        let p = score(&example.features, w);
        let y = if example.label { 1.0 } else { 0.0 };
        loss += -y * (p + LOG_EPSILON).ln() - (1.0 - y) * (1.0 - p + LOG_EPSILON).ln();
        if (p >= 0.5) == example.label {
            correct += 1;
        }
    }
    let n = examples.len() as f64;
    (loss / n, correct as f64 / n)
}
