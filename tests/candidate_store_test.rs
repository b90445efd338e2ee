mod common;

use common::{personal, seed_candidate, setup, setup_with, test_config, CANDIDATE_CPF};
use matchjobs_backend::{
    dto::candidate_dto::{
        CoursePayload, EducationPayload, ExperiencePayload, LanguagePayload,
        UpdateExperiencePayload,
    },
    error::Error,
    models::behavioral::BehavioralAnalysis,
    models::candidate::{CandidateData, CandidateSkills},
};
use tokio_test::{assert_err, assert_ok};

fn experience(title: &str) -> ExperiencePayload {
    ExperiencePayload {
        title: title.to_string(),
        company: "Globex".to_string(),
        start_date: "2021-01".to_string(),
        end_date: Some("2023-06".to_string()),
        is_current: false,
        description: "APIs e integrações".to_string(),
    }
}

#[tokio::test]
async fn save_normalizes_cpf_and_round_trips() {
    let state = setup().await;
    let data = CandidateData::empty(personal("123.456.789-01", "Maria Silva"));

    let saved = assert_ok!(state.candidate_service.save(data).await);
    assert_eq!(saved.personal.cpf, CANDIDATE_CPF);
    assert!(saved.created_at.is_some());

    let loaded = state
        .candidate_service
        .get("123.456.789-01")
        .await
        .unwrap()
        .expect("candidate stored");
    assert_eq!(saved, loaded);
    assert!(state.candidate_service.exists(CANDIDATE_CPF).await.unwrap());

    let all = state.candidate_service.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all.contains_key(CANDIDATE_CPF));
}

#[tokio::test]
async fn resave_keeps_original_creation_time() {
    let state = setup().await;
    let first = seed_candidate(&state, CANDIDATE_CPF, "Maria Silva").await;

    let mut changed = first.clone();
    changed.personal.about = "Backend developer".to_string();
    let second = state.candidate_service.save(changed).await.unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[tokio::test]
async fn short_cpf_is_rejected() {
    let state = setup().await;
    let result = state
        .candidate_service
        .save(CandidateData::empty(personal("123", "Sem Documento")))
        .await;
    assert!(matches!(result, Err(Error::BadRequest(_))));
    assert!(state.candidate_service.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn strict_policy_checks_digits() {
    let mut config = test_config();
    config.strict_document_checksum = true;
    let state = setup_with(config).await;

    let bad = state
        .candidate_service
        .save(CandidateData::empty(personal("12345678900", "Digito Errado")))
        .await;
    assert_err!(bad);

    let good = state
        .candidate_service
        .save(CandidateData::empty(personal("529.982.247-25", "Digito Certo")))
        .await;
    assert_eq!(assert_ok!(good).personal.cpf, "52998224725");

    // passes the length check but not the check digits
    let lenient_only = state
        .candidate_service
        .save(CandidateData::empty(personal(CANDIDATE_CPF, "Só Tamanho")))
        .await;
    assert!(matches!(lenient_only, Err(Error::BadRequest(_))));
}

#[tokio::test]
async fn personal_update_creates_missing_record() {
    let state = setup().await;
    let saved = state
        .candidate_service
        .update_personal_data(CANDIDATE_CPF, personal("", "Joana Souza"))
        .await
        .unwrap();
    assert_eq!(saved.personal.cpf, CANDIDATE_CPF);
    assert!(saved.experiences.is_empty());

    state
        .candidate_service
        .add_experience(CANDIDATE_CPF, experience("Dev"))
        .await
        .unwrap();
    let updated = state
        .candidate_service
        .update_personal_data(CANDIDATE_CPF, personal("", "Joana S. Souza"))
        .await
        .unwrap();
    assert_eq!(updated.personal.full_name, "Joana S. Souza");
    assert_eq!(updated.experiences.len(), 1);
}

#[tokio::test]
async fn sub_entities_get_distinct_ids() {
    let state = setup().await;
    seed_candidate(&state, CANDIDATE_CPF, "Maria Silva").await;

    let a = state
        .candidate_service
        .add_experience(CANDIDATE_CPF, experience("Estagiária"))
        .await
        .unwrap();
    let b = state
        .candidate_service
        .add_experience(CANDIDATE_CPF, experience("Desenvolvedora"))
        .await
        .unwrap();
    assert_ne!(a.id, b.id);

    let data = state.candidate_service.get(CANDIDATE_CPF).await.unwrap().unwrap();
    let titles: Vec<_> = data.experiences.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Estagiária", "Desenvolvedora"]);
}

#[tokio::test]
async fn update_and_delete_experience() {
    let state = setup().await;
    seed_candidate(&state, CANDIDATE_CPF, "Maria Silva").await;
    let exp = state
        .candidate_service
        .add_experience(CANDIDATE_CPF, experience("Dev"))
        .await
        .unwrap();

    let patch = UpdateExperiencePayload {
        title: Some("Dev Sênior".to_string()),
        is_current: Some(true),
        ..Default::default()
    };
    let updated = state
        .candidate_service
        .update_experience(CANDIDATE_CPF, &exp.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.title, "Dev Sênior");
    assert!(updated.is_current);
    assert_eq!(updated.end_date, None);
    assert_eq!(updated.company, "Globex");

    let missing = state
        .candidate_service
        .update_experience(CANDIDATE_CPF, "does-not-exist", UpdateExperiencePayload::default())
        .await;
    assert!(matches!(missing, Err(Error::NotFound(_))));

    // unknown ids are ignored
    assert_ok!(
        state
            .candidate_service
            .delete_experience(CANDIDATE_CPF, "does-not-exist")
            .await
    );
    assert_ok!(
        state
            .candidate_service
            .delete_experience(CANDIDATE_CPF, &exp.id)
            .await
    );
    let data = state.candidate_service.get(CANDIDATE_CPF).await.unwrap().unwrap();
    assert!(data.experiences.is_empty());
}

#[tokio::test]
async fn mutations_on_unknown_candidate_fail() {
    let state = setup().await;
    let result = state
        .candidate_service
        .add_experience("98765432100", experience("Dev"))
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    let completion = state.candidate_service.profile_completion("98765432100").await;
    assert!(matches!(completion, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn completion_tracks_filled_sections() {
    let state = setup().await;
    seed_candidate(&state, CANDIDATE_CPF, "Maria Silva").await;
    let base = state
        .candidate_service
        .profile_completion(CANDIDATE_CPF)
        .await
        .unwrap();
    assert_eq!(base, 40);

    let service = &state.candidate_service;
    service
        .add_experience(CANDIDATE_CPF, experience("Dev"))
        .await
        .unwrap();
    service
        .add_education(
            CANDIDATE_CPF,
            EducationPayload {
                degree: "Bacharelado em Computação".to_string(),
                institution: "USP".to_string(),
                completion_year: "2019".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    service
        .add_course(
            CANDIDATE_CPF,
            CoursePayload {
                name: "Rust avançado".to_string(),
                institution: "Alura".to_string(),
                hours: 40,
                year: "2024".to_string(),
            },
        )
        .await
        .unwrap();
    service
        .add_language(
            CANDIDATE_CPF,
            LanguagePayload {
                name: "Inglês".to_string(),
                level: "Avançado".to_string(),
                proficiency: 85,
                certification: None,
            },
        )
        .await
        .unwrap();
    service
        .update_skills(
            CANDIDATE_CPF,
            CandidateSkills {
                technical: vec!["Rust".to_string()],
                soft: vec![],
            },
        )
        .await
        .unwrap();

    // courses and languages do not count
    assert_eq!(service.profile_completion(CANDIDATE_CPF).await.unwrap(), 90);

    let saved = service
        .update_behavioral_analysis(CANDIDATE_CPF, BehavioralAnalysis::default())
        .await
        .unwrap();
    assert!(saved
        .behavioral_analysis
        .as_ref()
        .and_then(|a| a.completed_at)
        .is_some());
    assert_eq!(service.profile_completion(CANDIDATE_CPF).await.unwrap(), 100);

    let education_id = saved.education[0].id.clone();
    service
        .delete_education(CANDIDATE_CPF, &education_id)
        .await
        .unwrap();
    assert_eq!(service.profile_completion(CANDIDATE_CPF).await.unwrap(), 85);
}

#[tokio::test]
async fn behavioral_update_returns_the_stored_timestamps() {
    let state = setup().await;
    let seeded = seed_candidate(&state, CANDIDATE_CPF, "Maria Silva").await;

    let returned = state
        .candidate_service
        .update_behavioral_analysis(CANDIDATE_CPF, BehavioralAnalysis::default())
        .await
        .unwrap();
    let stored = state
        .candidate_service
        .get(CANDIDATE_CPF)
        .await
        .unwrap()
        .expect("candidate stored");

    assert_eq!(returned.updated_at, stored.updated_at);
    assert!(returned.updated_at >= seeded.updated_at);
    assert_eq!(returned, stored);
}
