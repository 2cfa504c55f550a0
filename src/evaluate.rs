use serde::Serialize;

use crate::models::{Prediction, ScoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl Confusion {
    pub fn record(&mut self, predicted_placed: bool, actually_placed: bool) {
        match (predicted_placed, actually_placed) {
            (true, true) => self.true_positive += 1,
            (true, false) => self.false_positive += 1,
            (false, false) => self.true_negative += 1,
            (false, true) => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }
}

// Percentages rounded to two decimals; undefined ratios report 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub labelled: usize,
    pub unlabelled: usize,
    pub confusion: Confusion,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

pub fn evaluate<'a, I>(pairs: I) -> Evaluation
where
    I: IntoIterator<Item = (&'a ScoreResult, Option<bool>)>,
{
    let mut confusion = Confusion::default();
    let mut unlabelled = 0usize;

    for (result, placed) in pairs {
        match placed {
            Some(actual) => confusion.record(result.prediction == Prediction::Placed, actual),
            None => unlabelled += 1,
        }
    }

    let tp = confusion.true_positive as f64;
    let accuracy = ratio(
        (confusion.true_positive + confusion.true_negative) as f64,
        confusion.total() as f64,
    );
    let precision = ratio(tp, (confusion.true_positive + confusion.false_positive) as f64);
    let recall = ratio(tp, (confusion.true_positive + confusion.false_negative) as f64);
    let f1_score = ratio(2.0 * precision * recall, precision + recall);

    Evaluation {
        labelled: confusion.total(),
        unlabelled,
        confusion,
        accuracy: percent(accuracy),
        precision: percent(precision),
        recall: percent(recall),
        f1_score: percent(f1_score),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn percent(value: f64) -> f64 {
    (value * 10_000.0).round() / 100.0
}
