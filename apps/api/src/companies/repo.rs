use sqlx::PgPool;

use crate::models::company::{Company, NewCompany};

pub async fn create_company(pool: &PgPool, company: &NewCompany) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO companies (company_name, address, domain)
        VALUES ($1, $2, $3)
        RETURNING id, company_name, address, domain, created_at
        "#,
    )
    .bind(&company.company_name)
    .bind(&company.address)
    .bind(&company.domain)
    .fetch_one(pool)
    .await
}

pub async fn list_companies(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT id, company_name, address, domain, created_at FROM companies ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_company(pool: &PgPool, company_id: i64) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT id, company_name, address, domain, created_at FROM companies WHERE id = $1",
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
}
