// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "VantagePOS")]
    pub name: String,

    #[schema(example = "https://minhaloja.com/assets/logo.png")]
    pub logo: Option<String>,

    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: Option<String>,

    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "contato@minhaloja.com")]
    pub email: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub tax_id: Option<String>,

    pub website: Option<String>,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            name: "VantagePOS".into(),
            logo: None,
            address: None,
            phone: None,
            email: None,
            tax_id: None,
            website: None,
        }
    }
}

/// O que aparece impresso no cupom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSettings {
    pub show_company_name: bool,
    pub show_address: bool,
    pub show_phone: bool,
    pub show_tax_id: bool,
    pub show_date: bool,
    pub show_time: bool,
    #[schema(example = "Thank you for your business!")]
    pub footer_text: String,
    pub show_thank_you: bool,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            show_company_name: true,
            show_address: true,
            show_phone: true,
            show_tax_id: false,
            show_date: true,
            show_time: true,
            footer_text: "Thank you for your business!".into(),
            show_thank_you: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MailSettings {
    pub smtp_host: Option<String>,
    #[schema(example = 587)]
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    // Gravado no banco, mas removido das respostas (ver Settings::redacted)
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub from_email: Option<String>,
    pub from_name: Option<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_password: None,
            from_email: None,
            from_name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[schema(value_type = CompanySettings)]
    pub company: Json<CompanySettings>,
    #[schema(value_type = ReceiptSettings)]
    pub receipt: Json<ReceiptSettings>,
    #[schema(value_type = MailSettings)]
    pub mail: Json<MailSettings>,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    pub fn redacted(mut self) -> Self {
        self.mail.smtp_password = None;
        self
    }
}

/// Cada seção presente substitui a seção inteira; as ausentes ficam como estão.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(nested)]
    pub company: Option<CompanySettings>,
    pub receipt: Option<ReceiptSettings>,
    #[validate(nested)]
    pub mail: Option<MailSettings>,
}

impl UpdateSettingsRequest {
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(company) = self.company {
            settings.company = Json(company);
        }
        if let Some(receipt) = self.receipt {
            settings.receipt = Json(receipt);
        }
        if let Some(mut mail) = self.mail {
            // As respostas nunca trazem a senha; sem senha nova, mantém a gravada
            if mail.smtp_password.is_none() {
                mail.smtp_password = settings.mail.smtp_password.take();
            }
            settings.mail = Json(mail);
        }
    }
}
