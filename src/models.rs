use std::fmt;

use serde::{Deserialize, Serialize};

/// Only `cgpa`, the two skill scores and `backlogs` feed the local
/// heuristic; the rest is carried so the remote service sees the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default, deserialize_with = "lenient::real")]
    pub ssc_percentage: f64,
    #[serde(default, deserialize_with = "lenient::real")]
    pub hsc_percentage: f64,
    #[serde(default, deserialize_with = "lenient::real")]
    pub degree_percentage: f64,
    #[serde(default, deserialize_with = "lenient::real")]
    pub cgpa: f64,
    #[serde(default, deserialize_with = "lenient::real")]
    pub entrance_exam_score: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub technical_skill_score: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub soft_skill_score: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub internship_count: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub live_projects: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub work_experience_months: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub certifications: u32,
    #[serde(default, deserialize_with = "lenient::real")]
    pub attendance_percentage: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub backlogs: u32,
    #[serde(default, deserialize_with = "lenient::text")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub extracurricular_activities: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Prediction {
    Placed,
    #[serde(rename = "Not Placed")]
    NotPlaced,
}

impl Prediction {
    pub fn from_probability(probability: u32) -> Self {
        if probability >= 50 {
            Prediction::Placed
        } else {
            Prediction::NotPlaced
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Prediction::Placed => "Placed",
            Prediction::NotPlaced => "Not Placed",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Moderate,
    Low,
    Critical,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::Moderate => "moderate",
            Tier::Low => "low",
            Tier::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierInfo {
    pub label: &'static str,
    pub icon: &'static str,
    pub color_token: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PercentileBand {
    #[serde(rename = "Top 5%")]
    Top5,
    #[serde(rename = "Top 15%")]
    Top15,
    #[serde(rename = "Top 35%")]
    Top35,
    #[serde(rename = "Top 60%")]
    Top60,
    #[serde(rename = "Bottom 40%")]
    Bottom40,
}

impl PercentileBand {
    pub const ALL: [PercentileBand; 5] = [
        PercentileBand::Top5,
        PercentileBand::Top15,
        PercentileBand::Top35,
        PercentileBand::Top60,
        PercentileBand::Bottom40,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PercentileBand::Top5 => "Top 5%",
            PercentileBand::Top15 => "Top 15%",
            PercentileBand::Top35 => "Top 35%",
            PercentileBand::Top60 => "Top 60%",
            PercentileBand::Bottom40 => "Bottom 40%",
        }
    }
}

// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Unrecognised labels rank with `Low` so they sort last.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Priority::Critical,
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default, deserialize_with = "lenient::text")]
    pub area: String,
    #[serde(default = "lowest_priority", deserialize_with = "lenient::priority")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub impact: String,
}

fn lowest_priority() -> Priority {
    Priority::Low
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub probability: u32,
    pub prediction: Prediction,
    pub tier: Tier,
    pub tier_info: TierInfo,
    pub percentile: PercentileBand,
    pub strengths: Vec<String>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone)]
pub struct ScoredStudent {
    pub label: String,
    pub placed: Option<bool>,
    pub result: ScoreResult,
}

#[derive(Debug, Clone)]
pub struct TierSummary {
    pub tier: Tier,
    pub count: usize,
    pub avg_probability: f64,
}

// Anything that is not a usable number becomes zero.
mod lenient {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};

    struct Numeric;

    impl<'de> Visitor<'de> for Numeric {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or numeric string")
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(if v.is_finite() { v } else { 0.0 })
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<f64, D::Error> {
            deserializer.deserialize_any(Numeric)
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<f64, A::Error> {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(0.0)
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<f64, A::Error> {
            while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
            Ok(0.0)
        }
    }

    struct Text;

    impl<'de> Visitor<'de> for Text {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.trim().to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
            deserializer.deserialize_any(Text)
        }
    }

    pub fn real<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(Numeric)
    }

    /// Truncates toward zero; negatives and NaN saturate to 0.
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        deserializer.deserialize_any(Numeric).map(|n| n as u32)
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(Text)
    }

    pub fn priority<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<super::Priority, D::Error> {
        text(deserializer).map(|label| super::Priority::from_label(&label))
    }
}
