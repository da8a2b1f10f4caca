// src/db/settings_repo.rs

use sqlx::{types::Json, PgPool};

use crate::{
    common::error::AppError,
    models::settings::{CompanySettings, MailSettings, ReceiptSettings, Settings},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Linha única (id = 1). Na primeira leitura grava os valores padrão.
    pub async fn get_or_create(&self) -> Result<Settings, AppError> {
        let existing = sqlx::query_as::<_, Settings>(
            "SELECT company, receipt, mail, updated_at FROM settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        if let Some(settings) = existing {
            return Ok(settings);
        }

        let settings = sqlx::query_as::<_, Settings>(
            r#"
            INSERT INTO settings (id, company, receipt, mail)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET id = settings.id
            RETURNING company, receipt, mail, updated_at
            "#,
        )
        .bind(Json(CompanySettings::default()))
        .bind(Json(ReceiptSettings::default()))
        .bind(Json(MailSettings::default()))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Configurações padrão criadas.");
        Ok(settings)
    }

    pub async fn save(&self, settings: &Settings) -> Result<Settings, AppError> {
        let saved = sqlx::query_as::<_, Settings>(
            r#"
            UPDATE settings
            SET company = $1, receipt = $2, mail = $3, updated_at = NOW()
            WHERE id = 1
            RETURNING company, receipt, mail, updated_at
            "#,
        )
        .bind(&settings.company)
        .bind(&settings.receipt)
        .bind(&settings.mail)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }
}
