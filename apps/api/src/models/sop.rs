use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Applicant data collected by the questionnaire.
///
/// Field names follow the client's camelCase JSON. A missing key deserializes to
/// the empty string, so optional fields never need `Option`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantProfile {
    pub full_name: String,
    pub email: String,
    pub target_university: String,
    pub target_program: String,
    pub current_education: String,
    pub gpa: String,
    pub work_experience: String,
    pub research_experience: String,
    pub extracurricular_activities: String,
    pub achievements: String,
    pub skills: String,
    pub career_goals: String,
    pub why_this_program: String,
    pub why_this_university: String,
    pub future_plans: String,
}

impl ApplicantProfile {
    /// Returns the JSON names of required fields that are blank.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("targetUniversity", &self.target_university),
            ("targetProgram", &self.target_program),
            ("careerGoals", &self.career_goals),
            ("whyThisProgram", &self.why_this_program),
            ("whyThisUniversity", &self.why_this_university),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A stored Statement of Purpose together with the profile it was generated from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SopRow {
    pub id: Uuid,
    /// Owner. Set once at creation and never rewritten.
    pub user_id: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub profile: ApplicantProfile,
    #[serde(rename = "generatedSOP")]
    pub generated_sop: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SopRow {
    /// Bumps `updated_at`, keeping it strictly after `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at + Duration::microseconds(1));
    }
}

/// Body of `POST /api/sop`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSop {
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    #[serde(rename = "generatedSOP", default)]
    pub generated_sop: Option<String>,
}

/// Partial update merged onto a stored document. Absent keys keep their value.
///
/// There is no owner or creation field here: unknown keys such as `userId`
/// are ignored on deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SopUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub target_university: Option<String>,
    pub target_program: Option<String>,
    pub current_education: Option<String>,
    pub gpa: Option<String>,
    pub work_experience: Option<String>,
    pub research_experience: Option<String>,
    pub extracurricular_activities: Option<String>,
    pub achievements: Option<String>,
    pub skills: Option<String>,
    pub career_goals: Option<String>,
    pub why_this_program: Option<String>,
    pub why_this_university: Option<String>,
    pub future_plans: Option<String>,
    #[serde(rename = "generatedSOP")]
    pub generated_sop: Option<String>,
}

impl SopUpdate {
    pub fn with_generated_sop(text: String) -> Self {
        SopUpdate {
            generated_sop: Some(text),
            ..Default::default()
        }
    }

    /// Merges the present fields onto `row`. Does not touch timestamps.
    pub fn apply_to(self, row: &mut SopRow) {
        fn merge(slot: &mut String, value: Option<String>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        let p = &mut row.profile;
        merge(&mut p.full_name, self.full_name);
        merge(&mut p.email, self.email);
        merge(&mut p.target_university, self.target_university);
        merge(&mut p.target_program, self.target_program);
        merge(&mut p.current_education, self.current_education);
        merge(&mut p.gpa, self.gpa);
        merge(&mut p.work_experience, self.work_experience);
        merge(&mut p.research_experience, self.research_experience);
        merge(
            &mut p.extracurricular_activities,
            self.extracurricular_activities,
        );
        merge(&mut p.achievements, self.achievements);
        merge(&mut p.skills, self.skills);
        merge(&mut p.career_goals, self.career_goals);
        merge(&mut p.why_this_program, self.why_this_program);
        merge(&mut p.why_this_university, self.why_this_university);
        merge(&mut p.future_plans, self.future_plans);
        if self.generated_sop.is_some() {
            row.generated_sop = self.generated_sop;
        }
    }
}
