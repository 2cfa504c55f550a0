use tracing::debug;

use crate::models::{
    PercentileBand, Prediction, Priority, ScoreResult, StudentProfile, Suggestion, Tier, TierInfo,
};

pub const MIN_PROBABILITY: u32 = 5;
pub const MAX_PROBABILITY: u32 = 95;

#[derive(Debug, Default)]
struct Tally {
    critical: bool,
    penalty: u32,
    strengths: Vec<String>,
    suggestions: Vec<Suggestion>,
}

impl Tally {
    fn strength(&mut self, observation: impl Into<String>) {
        self.strengths.push(observation.into());
    }

    fn suggest(&mut self, area: &str, priority: Priority, message: impl Into<String>, impact: &str) {
        self.suggestions.push(Suggestion {
            area: area.to_string(),
            priority,
            message: message.into(),
            impact: impact.to_string(),
        });
    }

    fn critical_issue(&mut self, penalty: u32) {
        self.critical = true;
        self.penalty += penalty;
    }
}

/// Local placement estimate used when the remote model is unavailable.
///
/// Four factors are scored independently (backlogs 35, technical skill 30,
/// CGPA 25, soft skills 10). A factor below its hard threshold is a critical
/// issue and caps the total at `max(35 - 0.3 * penalty, 10)`.
pub fn score(profile: &StudentProfile) -> ScoreResult {
    let mut tally = Tally::default();

    let backlog_points = score_backlogs(profile.backlogs, &mut tally);
    let technical_points = score_technical(profile.technical_skill_score, &mut tally);
    let cgpa_points = score_cgpa(profile.cgpa, &mut tally);
    let soft_points = score_soft_skills(profile.soft_skill_score, &mut tally);

    let mut total = f64::from(backlog_points + technical_points + cgpa_points + soft_points);
    if tally.critical {
        total = total.min(capped_max(tally.penalty));
    }
    let probability = (total.round() as u32).clamp(MIN_PROBABILITY, MAX_PROBABILITY);

    debug!(
        backlog_points,
        technical_points,
        cgpa_points,
        soft_points,
        penalty = tally.penalty,
        critical = tally.critical,
        probability,
        "scored profile locally"
    );

    assemble(probability, tally.strengths, tally.suggestions)
}

pub fn assemble(
    probability: u32,
    strengths: Vec<String>,
    mut suggestions: Vec<Suggestion>,
) -> ScoreResult {
    suggestions.sort_by_key(|suggestion| suggestion.priority);
    let tier = classify_tier(probability);

    ScoreResult {
        probability,
        prediction: Prediction::from_probability(probability),
        tier,
        tier_info: tier_info(tier),
        percentile: percentile_band(probability),
        strengths,
        suggestions,
    }
}

pub fn capped_max(penalty: u32) -> f64 {
    // Worked in tenths of a point so caps like 24.5 stay exact.
    let tenths = (350 - 3 * i64::from(penalty)).max(100);
    tenths as f64 / 10.0
}

fn score_backlogs(backlogs: u32, tally: &mut Tally) -> u32 {
    match backlogs {
        0 => {
            tally.strength("No backlogs - clean academic record");
            35
        }
        1 => {
            tally.suggest(
                "Backlogs",
                Priority::High,
                "You have 1 active backlog. Clear it before placement season to stay eligible for more companies.",
                "High",
            );
            20
        }
        2 => {
            tally.suggest(
                "Backlogs",
                Priority::High,
                "You have 2 active backlogs. Many recruiters filter on backlogs, so clear them first.",
                "High",
            );
            10
        }
        count => {
            tally.critical_issue(40);
            tally.suggest(
                "Backlogs",
                Priority::Critical,
                format!(
                    "{count} backlogs put you below most recruiters' eligibility criteria. Clearing them is the biggest improvement available."
                ),
                "Very High",
            );
            0
        }
    }
}

fn score_technical(score: u32, tally: &mut Tally) -> u32 {
    match score {
        80.. => {
            tally.strength(format!("Strong technical skills ({score}/100)"));
            30
        }
        70..=79 => {
            tally.strength(format!("Good technical foundation ({score}/100)"));
            25
        }
        60..=69 => {
            tally.suggest(
                "Technical Skills",
                Priority::Medium,
                "Push your technical score past 70 with regular coding practice and project work.",
                "Medium",
            );
            18
        }
        50..=59 => {
            tally.suggest(
                "Technical Skills",
                Priority::High,
                "Technical skills need focused work: practise data structures, algorithms and core subjects.",
                "High",
            );
            10
        }
        _ => {
            tally.critical_issue(35);
            tally.suggest(
                "Technical Skills",
                Priority::Critical,
                format!(
                    "A technical skill score of {score}/100 is below the hiring threshold. Rebuild fundamentals with structured courses and daily coding practice."
                ),
                "Very High",
            );
            0
        }
    }
}

fn score_cgpa(cgpa: f64, tally: &mut Tally) -> u32 {
    if cgpa >= 8.5 {
        tally.strength(format!("Excellent CGPA ({cgpa})"));
        25
    } else if cgpa >= 8.0 {
        tally.strength(format!("Strong CGPA ({cgpa})"));
        22
    } else if cgpa >= 7.5 {
        18
    } else if cgpa >= 7.0 {
        tally.suggest(
            "CGPA",
            Priority::Medium,
            "Lifting your CGPA above 7.5 clears the cutoff used by most recruiters.",
            "Medium",
        );
        12
    } else {
        tally.critical_issue(30);
        tally.suggest(
            "CGPA",
            Priority::Critical,
            format!(
                "A CGPA of {cgpa} is below the common 7.0 eligibility cutoff. Focus on the remaining semesters to raise it."
            ),
            "Very High",
        );
        0
    }
}

// Below 50 adds to the penalty but is not a critical issue on its own, so
// it only lowers the cap when another factor already tripped it.
fn score_soft_skills(score: u32, tally: &mut Tally) -> u32 {
    match score {
        80.. => {
            tally.strength(format!("Great soft skills ({score}/100)"));
            10
        }
        60..=79 => 7,
        50..=59 => {
            tally.suggest(
                "Soft Skills",
                Priority::Medium,
                "Work on communication and teamwork through group projects, clubs and mock interviews.",
                "Medium",
            );
            4
        }
        _ => {
            tally.penalty += 10;
            tally.suggest(
                "Soft Skills",
                Priority::High,
                "Soft skills are holding you back in interviews. Practise presentations, group discussions and mock HR rounds.",
                "High",
            );
            0
        }
    }
}

pub fn classify_tier(probability: u32) -> Tier {
    match probability {
        80.. => Tier::Excellent,
        60..=79 => Tier::Good,
        40..=59 => Tier::Moderate,
        20..=39 => Tier::Low,
        _ => Tier::Critical,
    }
}

pub fn percentile_band(probability: u32) -> PercentileBand {
    match probability {
        80.. => PercentileBand::Top5,
        60..=79 => PercentileBand::Top15,
        40..=59 => PercentileBand::Top35,
        20..=39 => PercentileBand::Top60,
        _ => PercentileBand::Bottom40,
    }
}

pub fn tier_info(tier: Tier) -> TierInfo {
    match tier {
        Tier::Excellent => TierInfo {
            label: "Excellent",
            icon: "🌟",
            color_token: "emerald",
            message: "Outstanding profile. You are in a strong position for placement.",
        },
        Tier::Good => TierInfo {
            label: "Good",
            icon: "✅",
            color_token: "green",
            message: "Solid profile. A few refinements will make you a standout candidate.",
        },
        Tier::Moderate => TierInfo {
            label: "Moderate",
            icon: "⚡",
            color_token: "amber",
            message: "You have a fair chance. Work through the suggestions below to improve your odds.",
        },
        Tier::Low => TierInfo {
            label: "Low",
            icon: "⚠️",
            color_token: "orange",
            message: "Your profile needs work in several areas before placement season.",
        },
        Tier::Critical => TierInfo {
            label: "Critical",
            icon: "🚨",
            color_token: "red",
            message: "Critical gaps detected. Tackle the highest-priority suggestions first.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn profile(cgpa: f64, technical: u32, soft: u32, backlogs: u32) -> StudentProfile {
        StudentProfile {
            cgpa,
            technical_skill_score: technical,
            soft_skill_score: soft,
            backlogs,
            ..StudentProfile::default()
        }
    }

    #[test]
    fn top_profile_hits_upper_clamp() {
        let result = score(&profile(9.0, 90, 85, 0));
        assert_eq!(result.probability, 95);
        assert_eq!(result.tier, Tier::Excellent);
        assert_eq!(result.prediction, Prediction::Placed);
        assert_eq!(result.percentile, PercentileBand::Top5);
        assert_eq!(result.strengths.len(), 4);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn stacked_critical_issues_floor_the_score() {
        let result = score(&profile(6.5, 40, 45, 4));
        assert_eq!(result.probability, 5);
        assert_eq!(result.tier, Tier::Critical);
        assert_eq!(result.prediction, Prediction::NotPlaced);
        assert_eq!(result.percentile, PercentileBand::Bottom40);

        let priorities: Vec<Priority> = result.suggestions.iter().map(|s| s.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::Critical, Priority::Critical, Priority::Critical, Priority::High]
        );
        assert!(result.suggestions[0].message.starts_with("4 backlogs"));
        assert!(result.suggestions[1].message.contains("40/100"));
        assert!(result.suggestions[2].message.contains("6.5"));
    }

    #[test]
    fn middling_profile_sums_without_cap() {
        let result = score(&profile(7.2, 65, 70, 1));
        assert_eq!(result.probability, 57);
        assert_eq!(result.tier, Tier::Moderate);
        assert_eq!(result.prediction, Prediction::Placed);
        assert_eq!(result.percentile, PercentileBand::Top35);

        let areas: Vec<&str> = result.suggestions.iter().map(|s| s.area.as_str()).collect();
        assert_eq!(areas, vec!["Backlogs", "Technical Skills", "CGPA"]);
        assert_eq!(result.suggestions[0].priority, Priority::High);
    }

    #[test]
    fn single_critical_issue_caps_total() {
        // 0 + 30 + 25 + 10 = 65 raw, capped at 35 - 0.3 * 40 = 23.
        let result = score(&profile(9.0, 90, 85, 3));
        assert_eq!(result.probability, 23);
        assert_eq!(result.tier, Tier::Low);
    }

    #[test]
    fn half_point_caps_round_up() {
        // Technical critical only: penalty 35, cap 24.5.
        let result = score(&profile(9.0, 45, 85, 0));
        assert_eq!(capped_max(35), 24.5);
        assert_eq!(result.probability, 25);
    }

    #[test]
    fn weak_soft_skills_alone_do_not_cap() {
        // 35 + 30 + 25 + 0 = 90, no critical flag.
        let result = score(&profile(9.0, 90, 30, 0));
        assert_eq!(result.probability, 90);
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].priority, Priority::High);
    }

    #[test]
    fn weak_soft_skills_tighten_an_existing_cap() {
        let without = score(&profile(9.0, 90, 70, 3));
        let with = score(&profile(9.0, 90, 30, 3));
        assert_eq!(without.probability, 23);
        assert_eq!(with.probability, 20);
    }

    #[test]
    fn cap_never_drops_below_ten() {
        assert_eq!(capped_max(0), 35.0);
        assert_eq!(capped_max(40), 23.0);
        assert_eq!(capped_max(85), 10.0);
        assert_eq!(capped_max(115), 10.0);
    }

    #[test]
    fn zeroed_profile_is_worst_case() {
        let result = score(&StudentProfile::default());
        // No backlogs still earns 35, but penalty 75 caps the total at 12.5.
        assert_eq!(result.probability, 13);
        assert_eq!(result.tier, Tier::Critical);
    }

    #[test]
    fn cgpa_bands_follow_thresholds() {
        let points = |cgpa: f64| {
            let mut tally = Tally::default();
            score_cgpa(cgpa, &mut tally)
        };
        assert_eq!(points(10.0), 25);
        assert_eq!(points(8.5), 25);
        assert_eq!(points(8.49), 22);
        assert_eq!(points(8.0), 22);
        assert_eq!(points(7.99), 18);
        assert_eq!(points(7.5), 18);
        assert_eq!(points(7.0), 12);
        assert_eq!(points(6.99), 0);
    }

    #[test]
    fn tier_and_percentile_share_boundaries() {
        for (probability, tier, band) in [
            (95, Tier::Excellent, PercentileBand::Top5),
            (80, Tier::Excellent, PercentileBand::Top5),
            (79, Tier::Good, PercentileBand::Top15),
            (60, Tier::Good, PercentileBand::Top15),
            (59, Tier::Moderate, PercentileBand::Top35),
            (40, Tier::Moderate, PercentileBand::Top35),
            (39, Tier::Low, PercentileBand::Top60),
            (20, Tier::Low, PercentileBand::Top60),
            (19, Tier::Critical, PercentileBand::Bottom40),
            (5, Tier::Critical, PercentileBand::Bottom40),
        ] {
            assert_eq!(classify_tier(probability), tier, "tier at {probability}");
            assert_eq!(percentile_band(probability), band, "band at {probability}");
        }
    }

    #[test]
    fn assemble_sort_is_stable_within_priority() {
        let suggestion = |area: &str, priority| Suggestion {
            area: area.to_string(),
            priority,
            message: String::new(),
            impact: String::new(),
        };
        let result = assemble(
            42,
            Vec::new(),
            vec![
                suggestion("a", Priority::Low),
                suggestion("b", Priority::High),
                suggestion("c", Priority::Low),
                suggestion("d", Priority::High),
            ],
        );
        let areas: Vec<&str> = result.suggestions.iter().map(|s| s.area.as_str()).collect();
        assert_eq!(areas, vec!["b", "d", "a", "c"]);
    }

    fn any_profile() -> impl Strategy<Value = StudentProfile> {
        (0.0f64..=10.0, 0u32..=100, 0u32..=100, 0u32..=8)
            .prop_map(|(cgpa, technical, soft, backlogs)| profile(cgpa, technical, soft, backlogs))
    }

    proptest! {
        #[test]
        fn probability_stays_clamped(p in any_profile()) {
            let result = score(&p);
            prop_assert!((MIN_PROBABILITY..=MAX_PROBABILITY).contains(&result.probability));
        }

        #[test]
        fn prediction_matches_probability(p in any_profile()) {
            let result = score(&p);
            prop_assert_eq!(result.prediction == Prediction::Placed, result.probability >= 50);
        }

        #[test]
        fn scoring_is_idempotent(p in any_profile()) {
            prop_assert_eq!(score(&p), score(&p));
        }

        #[test]
        fn heavy_backlogs_cap_at_35(p in any_profile(), backlogs in 3u32..50) {
            let result = score(&StudentProfile { backlogs, ..p });
            prop_assert!(result.probability <= 35);
        }

        #[test]
        fn more_technical_skill_never_hurts(p in any_profile(), low in 0u32..=100, bump in 0u32..=100) {
            let high = (low + bump).min(100);
            let lower = score(&StudentProfile { technical_skill_score: low, ..p.clone() });
            let higher = score(&StudentProfile { technical_skill_score: high, ..p });
            prop_assert!(higher.probability >= lower.probability);
        }

        #[test]
        fn suggestions_are_priority_ordered(p in any_profile()) {
            let result = score(&p);
            prop_assert!(result.suggestions.windows(2).all(|w| w[0].priority <= w[1].priority));
        }
    }
}
