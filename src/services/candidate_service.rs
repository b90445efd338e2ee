use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::{types::Json, SqliteConnection, SqlitePool};

use crate::database::tx::WriteTx;
use crate::dto::candidate_dto::{
    CoursePayload, EducationPayload, ExperiencePayload, LanguagePayload, UpdateEducationPayload,
    UpdateExperiencePayload,
};
use crate::error::{Error, Result};
use crate::models::behavioral::BehavioralAnalysis;
use crate::models::candidate::{
    CandidateCourse, CandidateData, CandidateDocuments, CandidateEducation, CandidateExperience,
    CandidateLanguage, CandidatePersonalData, CandidateSkills,
};
use crate::utils::completion::calculate_profile_completion;
use crate::utils::document::{strip_non_digits, DocumentPolicy};
use crate::utils::{id::timestamp_id, time};

#[derive(Clone)]
pub struct CandidateService {
    pool: SqlitePool,
    policy: DocumentPolicy,
}

impl CandidateService {
    pub fn new(pool: SqlitePool, policy: DocumentPolicy) -> Self {
        Self { pool, policy }
    }

    pub async fn get_all(&self) -> Result<BTreeMap<String, CandidateData>> {
        let rows = sqlx::query_as::<_, (String, Json<CandidateData>)>(
            "SELECT cpf, data FROM candidates ORDER BY cpf",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(cpf, Json(data))| (cpf, data)).collect())
    }

    pub async fn get(&self, cpf: &str) -> Result<Option<CandidateData>> {
        let cpf = strip_non_digits(cpf);
        let row = sqlx::query_scalar::<_, Json<CandidateData>>(
            "SELECT data FROM candidates WHERE cpf = ?",
        )
        .bind(&cpf)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(data)| data))
    }

    pub async fn exists(&self, cpf: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM candidates WHERE cpf = ?")
            .bind(strip_non_digits(cpf))
            .fetch_one(&self.pool)
            .await?;
        Ok(found > 0)
    }

    /// Upserts the whole record under its normalized CPF.
    pub async fn save(&self, mut data: CandidateData) -> Result<CandidateData> {
        let cpf = strip_non_digits(&data.personal.cpf);
        if !self.policy.accepts_cpf(&cpf) {
            tracing::warn!(cpf = %cpf, "Rejected candidate record with invalid CPF");
            return Err(Error::BadRequest("Invalid CPF".to_string()));
        }
        data.personal.cpf = cpf.clone();

        match self.store(&cpf, data).await {
            Ok(saved) => {
                tracing::debug!(cpf = %cpf, "Candidate record saved");
                Ok(saved)
            }
            Err(e) => {
                tracing::error!(error = ?e, cpf = %cpf, "Failed to save candidate record");
                Err(e)
            }
        }
    }

    async fn store(&self, cpf: &str, data: CandidateData) -> Result<CandidateData> {
        let mut tx = WriteTx::begin(&self.pool).await?;
        let result = store_record(&mut tx, cpf, data).await;
        tx.finish(result).await
    }

    /// Replaces the personal block, creating an empty record on first use.
    pub async fn update_personal_data(
        &self,
        cpf: &str,
        mut personal: CandidatePersonalData,
    ) -> Result<CandidateData> {
        let cpf = strip_non_digits(cpf);
        if !self.policy.accepts_cpf(&cpf) {
            return Err(Error::BadRequest("Invalid CPF".to_string()));
        }
        personal.cpf = cpf.clone();

        let data = match self.get(&cpf).await? {
            Some(existing) => CandidateData {
                personal,
                ..existing
            },
            None => CandidateData::empty(personal),
        };
        self.save(data).await
    }

    pub async fn update_behavioral_analysis(
        &self,
        cpf: &str,
        mut analysis: BehavioralAnalysis,
    ) -> Result<CandidateData> {
        analysis.completed_at = Some(time::now());
        self.mutate(cpf, |data| {
            data.behavioral_analysis = Some(analysis);
            Ok(data.clone())
        })
        .await
    }

    pub async fn add_experience(
        &self,
        cpf: &str,
        payload: ExperiencePayload,
    ) -> Result<CandidateExperience> {
        let experience = payload.into_experience(timestamp_id());
        self.mutate(cpf, |data| {
            data.experiences.push(experience.clone());
            Ok(experience)
        })
        .await
    }

    pub async fn update_experience(
        &self,
        cpf: &str,
        experience_id: &str,
        patch: UpdateExperiencePayload,
    ) -> Result<CandidateExperience> {
        self.mutate(cpf, |data| {
            let experience = data
                .experiences
                .iter_mut()
                .find(|e| e.id == experience_id)
                .ok_or_else(|| Error::NotFound("Experience not found".to_string()))?;
            patch.apply(experience);
            Ok(experience.clone())
        })
        .await
    }

    /// Removing an unknown id leaves the record untouched.
    pub async fn delete_experience(&self, cpf: &str, experience_id: &str) -> Result<()> {
        self.mutate(cpf, |data| {
            data.experiences.retain(|e| e.id != experience_id);
            Ok(())
        })
        .await
    }

    pub async fn add_education(
        &self,
        cpf: &str,
        payload: EducationPayload,
    ) -> Result<CandidateEducation> {
        let education = payload.into_education(timestamp_id());
        self.mutate(cpf, |data| {
            data.education.push(education.clone());
            Ok(education)
        })
        .await
    }

    pub async fn update_education(
        &self,
        cpf: &str,
        education_id: &str,
        patch: UpdateEducationPayload,
    ) -> Result<CandidateEducation> {
        self.mutate(cpf, |data| {
            let education = data
                .education
                .iter_mut()
                .find(|e| e.id == education_id)
                .ok_or_else(|| Error::NotFound("Education not found".to_string()))?;
            patch.apply(education);
            Ok(education.clone())
        })
        .await
    }

    pub async fn delete_education(&self, cpf: &str, education_id: &str) -> Result<()> {
        self.mutate(cpf, |data| {
            data.education.retain(|e| e.id != education_id);
            Ok(())
        })
        .await
    }

    pub async fn add_course(&self, cpf: &str, payload: CoursePayload) -> Result<CandidateCourse> {
        let course = payload.into_course(timestamp_id());
        self.mutate(cpf, |data| {
            data.courses.push(course.clone());
            Ok(course)
        })
        .await
    }

    pub async fn delete_course(&self, cpf: &str, course_id: &str) -> Result<()> {
        self.mutate(cpf, |data| {
            data.courses.retain(|c| c.id != course_id);
            Ok(())
        })
        .await
    }

    pub async fn add_language(
        &self,
        cpf: &str,
        payload: LanguagePayload,
    ) -> Result<CandidateLanguage> {
        let language = payload.into_language(timestamp_id());
        self.mutate(cpf, |data| {
            data.languages.push(language.clone());
            Ok(language)
        })
        .await
    }

    pub async fn delete_language(&self, cpf: &str, language_id: &str) -> Result<()> {
        self.mutate(cpf, |data| {
            data.languages.retain(|l| l.id != language_id);
            Ok(())
        })
        .await
    }

    pub async fn update_skills(
        &self,
        cpf: &str,
        skills: CandidateSkills,
    ) -> Result<CandidateSkills> {
        self.mutate(cpf, |data| {
            data.skills = skills.clone();
            Ok(skills)
        })
        .await
    }

    pub async fn update_documents(
        &self,
        cpf: &str,
        documents: CandidateDocuments,
    ) -> Result<CandidateDocuments> {
        self.mutate(cpf, |data| {
            data.documents = documents.clone();
            Ok(documents)
        })
        .await
    }

    pub async fn profile_completion(&self, cpf: &str) -> Result<u8> {
        let data = self
            .get(cpf)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
        Ok(calculate_profile_completion(&data))
    }

    /// Loads, changes and writes back one record inside a single transaction.
    /// Timestamps are stamped before `apply` runs, so anything it clones out
    /// of the record matches what is stored.
    async fn mutate<T, F>(&self, cpf: &str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut CandidateData) -> Result<T>,
    {
        let cpf = strip_non_digits(cpf);
        let mut tx = WriteTx::begin(&self.pool).await?;
        let result = mutate_record(&mut tx, &cpf, apply).await;
        tx.finish(result).await
    }
}

async fn store_record(
    conn: &mut SqliteConnection,
    cpf: &str,
    mut data: CandidateData,
) -> Result<CandidateData> {
    let existing_created = sqlx::query_scalar::<_, DateTime<Utc>>(
        "SELECT created_at FROM candidates WHERE cpf = ?",
    )
    .bind(cpf)
    .fetch_optional(&mut *conn)
    .await?;

    let now = time::now();
    data.created_at = existing_created.or(data.created_at).or(Some(now));
    data.updated_at = Some(now);
    write_record(conn, cpf, &data).await?;
    Ok(data)
}

async fn mutate_record<T, F>(conn: &mut SqliteConnection, cpf: &str, apply: F) -> Result<T>
where
    F: FnOnce(&mut CandidateData) -> Result<T>,
{
    let mut data = fetch_record(conn, cpf)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

    let now = time::now();
    data.created_at = data.created_at.or(Some(now));
    data.updated_at = Some(now);
    let output = apply(&mut data)?;

    write_record(conn, cpf, &data).await.inspect_err(|e| {
        tracing::error!(error = ?e, cpf = %cpf, "Failed to update candidate record");
    })?;
    Ok(output)
}

async fn fetch_record(conn: &mut SqliteConnection, cpf: &str) -> Result<Option<CandidateData>> {
    let row = sqlx::query_scalar::<_, Json<CandidateData>>(
        "SELECT data FROM candidates WHERE cpf = ?",
    )
    .bind(cpf)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(|Json(data)| data))
}

async fn write_record(conn: &mut SqliteConnection, cpf: &str, data: &CandidateData) -> Result<()> {
    let now = time::now();
    sqlx::query(
        r#"
        INSERT INTO candidates (cpf, full_name, email, data, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(cpf) DO UPDATE SET
            full_name = excluded.full_name,
            email = excluded.email,
            data = excluded.data,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(cpf)
    .bind(&data.personal.full_name)
    .bind(&data.personal.email)
    .bind(Json(data))
    .bind(data.created_at.unwrap_or(now))
    .bind(data.updated_at.unwrap_or(now))
    .execute(&mut *conn)
    .await?;
    Ok(())
}
