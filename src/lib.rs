pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    ai_service::AIService, application_service::ApplicationService,
    candidate_service::CandidateService, company_service::CompanyService,
    job_service::JobService, maintenance_service::MaintenanceService,
    notification_service::NotificationService, user_service::UserService,
};
use crate::utils::document::DocumentPolicy;
use reqwest::Client;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub candidate_service: CandidateService,
    pub company_service: CompanyService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub user_service: UserService,
    pub notification_service: NotificationService,
    pub ai_service: AIService,
    pub maintenance_service: MaintenanceService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(90))
            .build()?;
        let policy = DocumentPolicy::new(config.strict_document_checksum);

        let candidate_service = CandidateService::new(pool.clone(), policy);
        let company_service = CompanyService::new(pool.clone(), policy);
        let job_service = JobService::new(pool.clone());
        let user_service = UserService::new(
            pool.clone(),
            policy,
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
        );
        let notification_service = NotificationService::new(pool.clone());
        let application_service = ApplicationService::new(
            pool.clone(),
            job_service.clone(),
            candidate_service.clone(),
            user_service.clone(),
            notification_service.clone(),
        );
        let ai_service = AIService::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_api_base.clone(),
            http_client,
        );
        let maintenance_service = MaintenanceService::new(pool.clone());

        Ok(Self {
            pool,
            config: Arc::new(config),
            candidate_service,
            company_service,
            job_service,
            application_service,
            user_service,
            notification_service,
            ai_service,
            maintenance_service,
        })
    }
}
