use std::path::Path;

use anyhow::Context;

use crate::models::StudentProfile;

#[derive(Debug, Clone)]
pub struct DatasetRow {
    pub student_id: Option<String>,
    pub placed: Option<bool>,
    pub profile: StudentProfile,
}

pub fn load_csv(path: &Path) -> anyhow::Result<Vec<DatasetRow>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_rows(reader).with_context(|| format!("failed to read {}", path.display()))
}

pub fn read_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Vec<DatasetRow>> {
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let id_col = column("student_id");
    let status_col = column("placement_status");

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let profile: StudentProfile = record
            .deserialize(Some(&headers))
            .with_context(|| format!("invalid profile on data row {}", index + 1))?;

        let student_id = id_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let placed = status_col
            .and_then(|i| record.get(i))
            .and_then(parse_placement_status);

        rows.push(DatasetRow {
            student_id,
            placed,
            profile,
        });
    }

    Ok(rows)
}

pub fn parse_placement_status(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "placed" | "yes" | "true" => Some(true),
        "0" | "not placed" | "not_placed" | "no" | "false" => Some(false),
        _ => None,
    }
}

pub fn sample_profiles() -> Vec<(&'static str, StudentProfile)> {
    vec![
        (
            "Strong candidate",
            StudentProfile {
                ssc_percentage: 91.0,
                hsc_percentage: 88.5,
                degree_percentage: 84.0,
                cgpa: 9.0,
                entrance_exam_score: 82.0,
                technical_skill_score: 90,
                soft_skill_score: 85,
                internship_count: 2,
                live_projects: 3,
                work_experience_months: 6,
                certifications: 4,
                attendance_percentage: 93.0,
                backlogs: 0,
                gender: "Female".to_string(),
                extracurricular_activities: "Yes".to_string(),
            },
        ),
        (
            "At-risk candidate",
            StudentProfile {
                ssc_percentage: 58.0,
                hsc_percentage: 55.0,
                degree_percentage: 52.5,
                cgpa: 6.5,
                entrance_exam_score: 41.0,
                technical_skill_score: 40,
                soft_skill_score: 45,
                internship_count: 0,
                live_projects: 0,
                work_experience_months: 0,
                certifications: 0,
                attendance_percentage: 68.0,
                backlogs: 4,
                gender: "Male".to_string(),
                extracurricular_activities: "No".to_string(),
            },
        ),
        (
            "Borderline candidate",
            StudentProfile {
                ssc_percentage: 74.0,
                hsc_percentage: 71.0,
                degree_percentage: 69.0,
                cgpa: 7.2,
                entrance_exam_score: 63.0,
                technical_skill_score: 65,
                soft_skill_score: 70,
                internship_count: 1,
                live_projects: 1,
                work_experience_months: 0,
                certifications: 1,
                attendance_percentage: 81.0,
                backlogs: 1,
                gender: "Male".to_string(),
                extracurricular_activities: "Yes".to_string(),
            },
        ),
    ]
}
