mod common;

use common::{seed_company, setup, setup_with, test_config, COMPANY_CNPJ};
use matchjobs_backend::{error::Error, models::company::CompanyData};
use tokio_test::assert_ok;

fn company(cnpj: &str, name: &str) -> CompanyData {
    CompanyData {
        cnpj: cnpj.to_string(),
        name: name.to_string(),
        city: "Campinas".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn formatted_cnpj_is_normalized() {
    let state = setup().await;
    let saved = assert_ok!(
        state
            .company_service
            .save(company("11.222.333/0001-81", "Acme Tecnologia"))
            .await
    );
    assert_eq!(saved.cnpj, COMPANY_CNPJ);
    assert!(saved.created_at.is_some());

    let loaded = state
        .company_service
        .get("11.222.333/0001-81")
        .await
        .unwrap()
        .expect("company stored");
    assert_eq!(saved, loaded);
}

#[tokio::test]
async fn invalid_cnpj_is_rejected() {
    let state = setup().await;
    let short = state.company_service.save(company("1122233300", "Curta")).await;
    assert!(matches!(short, Err(Error::BadRequest(_))));
    assert!(state.company_service.get_all().await.unwrap().is_empty());

    let mut config = test_config();
    config.strict_document_checksum = true;
    let strict = setup_with(config).await;
    let wrong_digits = strict
        .company_service
        .save(company("11222333000180", "Digito Errado"))
        .await;
    assert!(matches!(wrong_digits, Err(Error::BadRequest(_))));
    assert_ok!(strict.company_service.save(company(COMPANY_CNPJ, "Acme")).await);
}

#[tokio::test]
async fn resave_overwrites_in_place_and_keeps_creation_time() {
    let state = setup().await;
    let first = seed_company(&state, COMPANY_CNPJ).await;

    let mut changed = first.clone();
    changed.name = "Acme Tecnologia S.A.".to_string();
    changed.employee_count = "51-200".to_string();
    changed.created_at = None;
    let second = state.company_service.save(changed).await.unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);

    let all = state.company_service.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    let stored = &all[COMPANY_CNPJ];
    assert_eq!(stored.name, "Acme Tecnologia S.A.");
    assert_eq!(stored.employee_count, "51-200");
    assert_eq!(stored.city, "Campinas");
    assert_eq!(stored, &second);
}
