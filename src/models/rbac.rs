// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Catálogo fechado de permissões. Cargos só podem referenciar estas strings.
pub const PERMISSIONS: &[&str] = &[
    "products.read", "products.create", "products.edit", "products.delete",
    "users.read", "users.create", "users.edit", "users.delete",
    "roles.read", "roles.create", "roles.edit", "roles.delete",
    "sales.read", "sales.create", "sales.edit", "sales.delete",
    "purchases.read", "purchases.create", "purchases.edit", "purchases.delete",
    "expenses.read", "expenses.create", "expenses.edit", "expenses.delete",
    "quotations.read", "quotations.create", "quotations.edit", "quotations.delete",
    "warehouses.read", "warehouses.create", "warehouses.edit", "warehouses.delete",
    "adjustments.read", "adjustments.create", "adjustments.edit", "adjustments.delete",
    "offers.read", "offers.create", "offers.edit", "offers.delete",
    "zbills.read", "zbills.create",
    "settings.read", "settings.edit",
];

pub fn is_known_permission(slug: &str) -> bool {
    PERMISSIONS.contains(&slug)
}

fn validate_permission_slugs(slugs: &Vec<String>) -> Result<(), ValidationError> {
    if let Some(unknown) = slugs.iter().find(|s| !is_known_permission(s)) {
        let mut err = ValidationError::new("unknown_permission");
        err.message = Some(format!("Permissão desconhecida: '{}'.", unknown).into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Manager")]
    pub name: String,

    #[schema(example = "Gestão de estoque e compras")]
    pub description: Option<String>,

    #[schema(example = json!(["products.read", "purchases.create"]))]
    pub permissions: Vec<String>,

    // Cargos de fábrica não podem ser editados nem excluídos
    pub is_preset: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn allows(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Estoquista")]
    pub name: String,

    #[schema(example = "Pode visualizar produtos e lançar ajustes")]
    pub description: Option<String>,

    #[validate(custom(function = "validate_permission_slugs"))]
    #[serde(default)]
    #[schema(example = json!(["products.read", "adjustments.create"]))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_permission_slugs"))]
    pub permissions: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_catalog() {
        assert!(is_known_permission("sales.create"));
        assert!(is_known_permission("zbills.create"));
        assert!(is_known_permission("offers.delete"));
        assert!(!is_known_permission("zbills.delete"));
        assert!(!is_known_permission("inventory:write"));
    }

    #[test]
    fn test_create_role_rejects_unknown_permission() {
        let payload = CreateRolePayload {
            name: "Estoquista".into(),
            description: None,
            permissions: vec!["products.read".into(), "rockets.launch".into()],
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("permissions"));
    }

    #[test]
    fn test_update_role_validates_permissions_when_present() {
        let ok = UpdateRolePayload { name: None, description: None, permissions: None };
        assert!(ok.validate().is_ok());

        let bad = UpdateRolePayload {
            name: None,
            description: None,
            permissions: Some(vec!["nope".into()]),
        };
        assert!(bad.validate().is_err());
    }
}
