#![allow(dead_code)]

use matchjobs_backend::{
    config::{Config, DEFAULT_GEMINI_API_BASE},
    database::pool::{create_pool, run_migrations},
    dto::job_dto::CreateJobPayload,
    models::candidate::{CandidateData, CandidatePersonalData},
    models::company::CompanyData,
    AppState,
};

pub const CANDIDATE_CPF: &str = "12345678901";
pub const COMPANY_CNPJ: &str = "11222333000181";
pub const JWT_SECRET: &str = "test_secret_key";

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_ttl_hours: 1,
        gemini_api_key: None,
        gemini_model: "gemini-1.5-flash".to_string(),
        gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        public_rps: 1_000,
        api_rps: 1_000,
        strict_document_checksum: false,
        allow_storage_reset: false,
    }
}

pub async fn setup_with(config: Config) -> AppState {
    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("pool");
    run_migrations(&pool).await.expect("migrations");
    AppState::new(pool, config).expect("state")
}

pub async fn setup() -> AppState {
    setup_with(test_config()).await
}

pub fn personal(cpf: &str, name: &str) -> CandidatePersonalData {
    CandidatePersonalData {
        cpf: cpf.to_string(),
        full_name: name.to_string(),
        birth_date: "1992-08-15".to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "11987654321".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        ..Default::default()
    }
}

pub async fn seed_candidate(state: &AppState, cpf: &str, name: &str) -> CandidateData {
    state
        .candidate_service
        .save(CandidateData::empty(personal(cpf, name)))
        .await
        .expect("seed candidate")
}

pub async fn seed_company(state: &AppState, cnpj: &str) -> CompanyData {
    state
        .company_service
        .save(CompanyData {
            cnpj: cnpj.to_string(),
            name: "Acme Tecnologia".to_string(),
            city: "Campinas".to_string(),
            email: "rh@acme.example.com".to_string(),
            ..Default::default()
        })
        .await
        .expect("seed company")
}

pub fn job_payload(title: &str, stages: &[&str]) -> CreateJobPayload {
    CreateJobPayload {
        title: title.to_string(),
        area: "Tecnologia".to_string(),
        contract_type: "CLT".to_string(),
        work_model: "Híbrido".to_string(),
        city: "Campinas".to_string(),
        salary: "R$ 8.000".to_string(),
        vacancies: 2,
        description: "Desenvolvimento de serviços backend".to_string(),
        requirements: "Rust, SQL".to_string(),
        benefits: Some("VR, plano de saúde".to_string()),
        stages: stages.iter().map(|s| s.to_string()).collect(),
        questions: vec!["Por que você quer trabalhar conosco?".to_string()],
    }
}
