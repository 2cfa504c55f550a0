use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::evaluate::Evaluation;
use crate::models::{PercentileBand, Prediction, ScoredStudent, Tier, TierSummary};
use crate::predictor::{Outcome, Source};

pub fn summarize_by_tier(scored: &[ScoredStudent]) -> Vec<TierSummary> {
    let mut map: HashMap<Tier, (usize, u32)> = HashMap::new();

    for student in scored {
        let entry = map.entry(student.result.tier).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += student.result.probability;
    }

    let mut summaries: Vec<TierSummary> = map
        .into_iter()
        .map(|(tier, (count, total_probability))| TierSummary {
            tier,
            count,
            avg_probability: if count == 0 {
                0.0
            } else {
                f64::from(total_probability) / count as f64
            },
        })
        .collect();

    summaries.sort_by_key(|summary| summary.tier);
    summaries
}

pub fn count_by_percentile(scored: &[ScoredStudent]) -> Vec<(PercentileBand, usize)> {
    PercentileBand::ALL
        .iter()
        .map(|band| {
            let count = scored
                .iter()
                .filter(|student| student.result.percentile == *band)
                .count();
            (*band, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

pub fn suggestion_areas(scored: &[ScoredStudent]) -> Vec<(String, usize)> {
    let mut map: HashMap<&str, usize> = HashMap::new();
    for student in scored {
        for suggestion in &student.result.suggestions {
            *map.entry(suggestion.area.as_str()).or_insert(0) += 1;
        }
    }

    let mut areas: Vec<(String, usize)> = map
        .into_iter()
        .map(|(area, count)| (area.to_string(), count))
        .collect();
    areas.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    areas
}

pub fn build_report(
    dataset: &str,
    generated_on: NaiveDate,
    scored: &[ScoredStudent],
    evaluation: Option<&Evaluation>,
) -> String {
    let summaries = summarize_by_tier(scored);
    let placed = scored
        .iter()
        .filter(|student| student.result.prediction == Prediction::Placed)
        .count();

    let mut output = String::new();

    let _ = writeln!(output, "# Placement Readiness Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} ({} students, {} predicted placed)",
        dataset,
        generated_on,
        scored.len(),
        placed
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Tier Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students in this dataset.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} students (avg probability {:.1}%)",
                summary.tier.as_str(),
                summary.count,
                summary.avg_probability
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Percentile Bands");

    let bands = count_by_percentile(scored);
    if bands.is_empty() {
        let _ = writeln!(output, "No students in this dataset.");
    } else {
        for (band, count) in bands {
            let _ = writeln!(output, "- {}: {} students", band.label(), count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Common Focus Areas");

    let areas = suggestion_areas(scored);
    if areas.is_empty() {
        let _ = writeln!(output, "No improvement suggestions raised.");
    } else {
        for (area, count) in areas.iter().take(5) {
            let _ = writeln!(output, "- {area}: {count} students");
        }
    }

    let mut lowest: Vec<&ScoredStudent> = scored.iter().collect();
    lowest.sort_by_key(|student| student.result.probability);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Students Needing Attention");

    if lowest.is_empty() {
        let _ = writeln!(output, "No students in this dataset.");
    } else {
        for student in lowest.iter().take(10) {
            let focus = student
                .result
                .suggestions
                .first()
                .map(|s| s.area.as_str())
                .unwrap_or("none");
            let _ = writeln!(
                output,
                "- {} probability {}% ({}), top focus: {}",
                student.label,
                student.result.probability,
                student.result.tier.as_str(),
                focus
            );
        }
    }

    if let Some(evaluation) = evaluation {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Heuristic vs Recorded Outcomes");
        if evaluation.labelled == 0 {
            let _ = writeln!(output, "No labelled rows to compare against.");
        } else {
            let _ = writeln!(
                output,
                "- Accuracy {:.2}%, precision {:.2}%, recall {:.2}%, F1 {:.2}% over {} labelled students",
                evaluation.accuracy,
                evaluation.precision,
                evaluation.recall,
                evaluation.f1_score,
                evaluation.labelled
            );
        }
    }

    output
}

pub fn render_card(outcome: &Outcome) -> String {
    let result = &outcome.result;
    let mut output = String::new();

    let _ = writeln!(
        output,
        "# {} {} ({}% placement probability)",
        result.tier_info.icon, result.prediction, result.probability
    );
    let _ = writeln!(
        output,
        "{} tier, {} of candidates. {}",
        result.tier_info.label,
        result.percentile.label(),
        result.tier_info.message
    );
    let source = match outcome.source {
        Source::Remote => "remote model",
        Source::Local => "local heuristic",
    };
    let _ = writeln!(output, "_Scored by the {source}._");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Strengths");
    if result.strengths.is_empty() {
        let _ = writeln!(output, "No standout strengths yet.");
    } else {
        for strength in &result.strengths {
            let _ = writeln!(output, "- {strength}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggestions");
    if result.suggestions.is_empty() {
        let _ = writeln!(output, "Nothing to improve. Keep it up.");
    } else {
        for suggestion in &result.suggestions {
            let _ = writeln!(
                output,
                "- [{:?}] {}: {} (impact: {})",
                suggestion.priority, suggestion.area, suggestion.message, suggestion.impact
            );
        }
    }

    output
}
