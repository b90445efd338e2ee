use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::application::JobApplication;
use crate::models::candidate::{
    CandidateCourse, CandidateEducation, CandidateExperience, CandidateLanguage,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: String,
}

impl ExperiencePayload {
    pub fn into_experience(self, id: String) -> CandidateExperience {
        CandidateExperience {
            id,
            title: self.title,
            company: self.company,
            start_date: self.start_date,
            end_date: self.end_date,
            is_current: self.is_current,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperiencePayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current: Option<bool>,
    pub description: Option<String>,
}

impl UpdateExperiencePayload {
    pub fn apply(self, experience: &mut CandidateExperience) {
        if let Some(title) = self.title {
            experience.title = title;
        }
        if let Some(company) = self.company {
            experience.company = company;
        }
        if let Some(start_date) = self.start_date {
            experience.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            experience.end_date = Some(end_date);
        }
        if let Some(is_current) = self.is_current {
            experience.is_current = is_current;
            if is_current {
                experience.end_date = None;
            }
        }
        if let Some(description) = self.description {
            experience.description = description;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EducationPayload {
    #[validate(length(min = 1))]
    pub degree: String,
    #[validate(length(min = 1))]
    pub institution: String,
    #[serde(default)]
    pub completion_year: String,
    pub description: Option<String>,
}

impl EducationPayload {
    pub fn into_education(self, id: String) -> CandidateEducation {
        CandidateEducation {
            id,
            degree: self.degree,
            institution: self.institution,
            completion_year: self.completion_year,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEducationPayload {
    #[validate(length(min = 1))]
    pub degree: Option<String>,
    #[validate(length(min = 1))]
    pub institution: Option<String>,
    pub completion_year: Option<String>,
    pub description: Option<String>,
}

impl UpdateEducationPayload {
    pub fn apply(self, education: &mut CandidateEducation) {
        if let Some(degree) = self.degree {
            education.degree = degree;
        }
        if let Some(institution) = self.institution {
            education.institution = institution;
        }
        if let Some(year) = self.completion_year {
            education.completion_year = year;
        }
        if let Some(description) = self.description {
            education.description = Some(description);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub year: String,
}

impl CoursePayload {
    pub fn into_course(self, id: String) -> CandidateCourse {
        CandidateCourse {
            id,
            name: self.name,
            institution: self.institution,
            hours: self.hours,
            year: self.year,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub level: String,
    #[validate(range(max = 100))]
    #[serde(default)]
    pub proficiency: u8,
    pub certification: Option<String>,
}

impl LanguagePayload {
    pub fn into_language(self, id: String) -> CandidateLanguage {
        CandidateLanguage {
            id,
            name: self.name,
            level: self.level,
            proficiency: self.proficiency,
            certification: self.certification,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub cpf: String,
    pub completion: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStatistics {
    pub applications: u32,
    pub interviews: u32,
    /// Percentage of applications not rejected, rounded down.
    pub match_rate: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentApplicationsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplication {
    #[serde(flatten)]
    pub application: JobApplication,
    pub job_title: Option<String>,
}
