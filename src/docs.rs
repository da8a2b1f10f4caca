// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::register_staff,
        handlers::auth::list_users,
        handlers::auth::update_user,
        handlers::auth::delete_user,

        // --- RBAC ---
        handlers::rbac::list_permissions,
        handlers::rbac::list_roles,
        handlers::rbac::create_role,
        handlers::rbac::update_role,
        handlers::rbac::delete_role,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- INVENTORY ---
        handlers::inventory::list_products,
        handlers::inventory::list_low_stock,
        handlers::inventory::get_product,
        handlers::inventory::create_product,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,
        handlers::inventory::list_units,
        handlers::inventory::create_unit,
        handlers::inventory::update_unit,
        handlers::inventory::delete_unit,
        handlers::inventory::list_categories,
        handlers::inventory::create_category,
        handlers::inventory::update_category,
        handlers::inventory::delete_category,
        handlers::inventory::list_warehouses,
        handlers::inventory::create_warehouse,
        handlers::inventory::update_warehouse,
        handlers::inventory::delete_warehouse,
        handlers::inventory::list_adjustments,
        handlers::inventory::create_adjustment,

        // --- POS ---
        handlers::pos::checkout,
        handlers::pos::list_invoices,

        // --- Purchases ---
        handlers::purchases::list_purchases,
        handlers::purchases::create_purchase,
        handlers::purchases::update_purchase,
        handlers::purchases::delete_purchase,
        handlers::purchases::receive_purchase,
        handlers::purchases::cancel_purchase,

        // --- Quotations ---
        handlers::quotations::list_quotations,
        handlers::quotations::create_quotation,
        handlers::quotations::update_quotation,
        handlers::quotations::delete_quotation,
        handlers::quotations::update_quotation_status,

        // --- Offers ---
        handlers::offers::list_offers,
        handlers::offers::create_offer,
        handlers::offers::update_offer,
        handlers::offers::delete_offer,

        // --- FINANCE ---
        handlers::finance::list_expenses,
        handlers::finance::create_expense,
        handlers::finance::update_expense,
        handlers::finance::delete_expense,
        handlers::finance::generate_zbill,
        handlers::finance::list_zbills,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,

            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::RegisterStaffPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::CreateRolePayload,
            models::rbac::UpdateRolePayload,

            // --- Settings ---
            models::settings::CompanySettings,
            models::settings::ReceiptSettings,
            models::settings::MailSettings,
            models::settings::Settings,
            models::settings::UpdateSettingsRequest,

            // --- Catalog ---
            models::catalog::Variation,
            models::catalog::Product,
            models::catalog::VariationPayload,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,
            models::catalog::Unit,
            models::catalog::UnitPayload,
            models::catalog::Category,
            models::catalog::CategoryPayload,
            models::catalog::Warehouse,
            models::catalog::WarehousePayload,
            models::adjustment::AdjustmentKind,
            models::adjustment::AdjustmentReason,
            models::adjustment::Adjustment,
            models::adjustment::CreateAdjustmentPayload,

            // --- Sales ---
            models::sales::PaymentMethod,
            models::sales::InvoiceStatus,
            models::sales::InvoiceLine,
            models::sales::Invoice,
            models::sales::CartLine,
            models::sales::CheckoutPayload,

            // --- Purchases ---
            models::purchase::PurchaseStatus,
            models::purchase::PaymentStatus,
            models::purchase::Supplier,
            models::purchase::PurchaseLine,
            models::purchase::Purchase,
            models::purchase::PurchaseLinePayload,
            models::purchase::CreatePurchasePayload,
            models::purchase::UpdatePurchasePayload,

            // --- Quotations ---
            models::quotation::QuotationStatus,
            models::quotation::QuotationCustomer,
            models::quotation::QuotationLine,
            models::quotation::Quotation,
            models::quotation::QuotationLinePayload,
            models::quotation::CreateQuotationPayload,
            models::quotation::UpdateQuotationPayload,
            models::quotation::UpdateQuotationStatusPayload,

            // --- Offers ---
            models::offer::OfferType,
            models::offer::Offer,
            models::offer::CreateOfferPayload,
            models::offer::UpdateOfferPayload,

            // --- FINANCE ---
            models::expense::ExpenseCategory,
            models::expense::ExpensePaymentMethod,
            models::expense::ExpenseStatus,
            models::expense::Expense,
            models::expense::CreateExpensePayload,
            models::expense::UpdateExpensePayload,
            models::zbill::ZBill,
            models::zbill::GenerateZBillPayload,
        )
    ),
    tags(
        (name = "Health", description = "Estado do servidor"),
        (name = "Auth", description = "Autenticação, registro e redefinição de senha"),
        (name = "Users", description = "Dados do Usuário e gestão de funcionários"),
        (name = "RBAC", description = "Controle de Acesso (Cargos e Permissões)"),
        (name = "Settings", description = "Configurações da Loja"),
        (name = "Inventory", description = "Produtos, cadastros auxiliares e ajustes de estoque"),
        (name = "POS", description = "Frente de caixa e faturas"),
        (name = "Purchases", description = "Pedidos de compra a fornecedores"),
        (name = "Quotations", description = "Orçamentos para clientes"),
        (name = "Offers", description = "Ofertas especiais e cupons"),
        (name = "Finance", description = "Despesas e fechamento de caixa (Z-bill)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_routes() {
        let doc = ApiDoc::openapi();

        for path in ["/api/pos/checkout", "/api/zbills", "/api/purchases/{id}/receive", "/api/offers/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "{} ausente", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
