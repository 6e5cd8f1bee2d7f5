use serde::Deserialize;

use crate::types::{lenient_timestamp_opt, Timestamp};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QualificationStep {
    pub step_number: u32,
    pub title: String,
    pub description: String,
    pub estimated_duration: String,
    pub requirements: Vec<String>,
    pub cost_estimate: String,
    pub resources: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QualificationPath {
    pub job_title: String,
    pub province: String,
    pub estimated_total_time: String,
    pub steps: Vec<QualificationStep>,
    pub summary: String,
    pub important_notes: Vec<String>,
    pub regulatory_bodies: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QualificationProgress {
    #[serde(default)]
    pub completed_steps: Vec<u32>,
    #[serde(default)]
    pub total_steps: u32,
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default, with = "lenient_timestamp_opt")]
    pub started_at: Option<Timestamp>,
    #[serde(default, with = "lenient_timestamp_opt")]
    pub last_updated: Option<Timestamp>,
}

impl QualificationProgress {
    pub fn is_step_completed(&self, step_number: u32) -> bool {
        self.completed_steps.contains(&step_number)
    }
}

/// A stored or freshly generated path together with its progress.
#[derive(Debug, Clone, Deserialize)]
pub struct QualificationRecord {
    pub qualification_path: QualificationPath,
    #[serde(default)]
    pub progress: QualificationProgress,
    /// Absent on the `generate` response.
    #[serde(default, with = "lenient_timestamp_opt")]
    pub generated_at: Option<Timestamp>,
}

/// Response of `PUT /api/qualifications/progress`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub message: String,
    pub progress: QualificationProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_response_without_generated_at_parses() {
        let json = r#"{
            "message": "Qualification path generated successfully",
            "qualification_path": {
                "job_title": "Nurse",
                "province": "ontario",
                "steps": [{"step_number": 1, "title": "Credential assessment"}]
            },
            "progress": {
                "completed_steps": [],
                "total_steps": 1,
                "completion_percentage": 0,
                "started_at": "2024-01-01T00:00:00.000001",
                "last_updated": "2024-01-01T00:00:00.000001"
            }
        }"#;
        let record: QualificationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.qualification_path.steps.len(), 1);
        assert_eq!(record.progress.total_steps, 1);
        assert!(record.generated_at.is_none());
        assert!(record.progress.started_at.is_some());
        assert!(!record.progress.is_step_completed(1));
    }
}
