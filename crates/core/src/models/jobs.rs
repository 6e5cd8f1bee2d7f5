use serde::{Deserialize, Serialize};

/// One posting from `/api/jobs/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    pub job_id: Option<String>,
    pub job_title: String,
    pub company_name: String,
    pub job_city: String,
    pub job_state: String,
    pub job_country: String,
    pub job_apply_link: String,
    pub job_description: String,
    pub job_employment_type: String,
    pub job_salary: String,
    pub job_posted_at: String,
    pub job_required_skills: Vec<String>,
    pub job_required_experience: String,
    pub job_required_education: String,
}

impl JobPosting {
    /// `City, State, Country` with empty parts dropped.
    pub fn location_label(&self) -> String {
        [&self.job_city, &self.job_state, &self.job_country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Query string of `/api/jobs/search`.
#[derive(Debug, Clone, Serialize)]
pub struct JobSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// 1-based page number.
    pub page: u32,
}

impl JobSearchQuery {
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            location: Some(location.into()),
            page: 1,
        }
    }

    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }

    /// The previous page, or `None` when already on the first.
    pub fn prev_page(&self) -> Option<Self> {
        (self.page > 1).then(|| Self {
            page: self.page - 1,
            ..self.clone()
        })
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobSearchPage {
    pub results: Vec<JobPosting>,
    pub total_results: u64,
    pub search_query: String,
    pub page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_never_goes_below_one() {
        let first = JobSearchQuery::new("Nurse", "ontario");
        assert!(first.prev_page().is_none());
        let second = first.next_page();
        assert_eq!(second.page, 2);
        assert_eq!(second.prev_page().map(|q| q.page), Some(1));
    }

    #[test]
    fn location_label_skips_blank_parts() {
        let job = JobPosting {
            job_city: "Toronto".into(),
            job_country: "CA".into(),
            ..Default::default()
        };
        assert_eq!(job.location_label(), "Toronto, CA");
    }
}
