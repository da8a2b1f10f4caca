// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião). O cargo do usuário é resolvido pelo nome a cada
/// requisição; alterações no cargo valem sem novo login.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        let required_perm = T::slug();

        let allowed = app_state
            .rbac_service
            .has_permission(&user.0.role, required_perm)
            .await?;

        if !allowed {
            tracing::debug!(user_id = %user.0.id, role = %user.0.role, required_perm, "Acesso negado");
            return Err(AppError::Forbidden(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                required_perm
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $slug:literal) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn slug() -> &'static str {
                $slug
            }
        }
    };
}

permission!(PermProductsRead, "products.read");
permission!(PermProductsCreate, "products.create");
permission!(PermProductsEdit, "products.edit");
permission!(PermProductsDelete, "products.delete");

permission!(PermUsersRead, "users.read");
permission!(PermUsersCreate, "users.create");
permission!(PermUsersEdit, "users.edit");
permission!(PermUsersDelete, "users.delete");

permission!(PermRolesRead, "roles.read");
permission!(PermRolesCreate, "roles.create");
permission!(PermRolesEdit, "roles.edit");
permission!(PermRolesDelete, "roles.delete");

permission!(PermSalesRead, "sales.read");
permission!(PermSalesCreate, "sales.create");

permission!(PermPurchasesRead, "purchases.read");
permission!(PermPurchasesCreate, "purchases.create");
permission!(PermPurchasesEdit, "purchases.edit");
permission!(PermPurchasesDelete, "purchases.delete");

permission!(PermExpensesRead, "expenses.read");
permission!(PermExpensesCreate, "expenses.create");
permission!(PermExpensesEdit, "expenses.edit");
permission!(PermExpensesDelete, "expenses.delete");

permission!(PermQuotationsRead, "quotations.read");
permission!(PermQuotationsCreate, "quotations.create");
permission!(PermQuotationsEdit, "quotations.edit");
permission!(PermQuotationsDelete, "quotations.delete");

permission!(PermWarehousesRead, "warehouses.read");
permission!(PermWarehousesCreate, "warehouses.create");
permission!(PermWarehousesEdit, "warehouses.edit");
permission!(PermWarehousesDelete, "warehouses.delete");

permission!(PermAdjustmentsRead, "adjustments.read");
permission!(PermAdjustmentsCreate, "adjustments.create");

permission!(PermOffersRead, "offers.read");
permission!(PermOffersCreate, "offers.create");
permission!(PermOffersEdit, "offers.edit");
permission!(PermOffersDelete, "offers.delete");

permission!(PermZBillsRead, "zbills.read");
permission!(PermZBillsCreate, "zbills.create");

permission!(PermSettingsRead, "settings.read");
permission!(PermSettingsEdit, "settings.edit");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rbac::is_known_permission;

    #[test]
    fn test_guard_slugs_exist_in_catalog() {
        let slugs = [
            PermProductsRead::slug(),
            PermProductsDelete::slug(),
            PermUsersEdit::slug(),
            PermRolesDelete::slug(),
            PermSalesCreate::slug(),
            PermPurchasesEdit::slug(),
            PermExpensesDelete::slug(),
            PermQuotationsEdit::slug(),
            PermWarehousesCreate::slug(),
            PermAdjustmentsCreate::slug(),
            PermOffersRead::slug(),
            PermOffersDelete::slug(),
            PermZBillsCreate::slug(),
            PermSettingsEdit::slug(),
        ];
        for slug in slugs {
            assert!(is_known_permission(slug), "{} fora do catálogo", slug);
        }
    }
}
