// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Account ---
        handlers::auth::login,
        handlers::auth::register_morador,
        handlers::auth::register_sindico,
        handlers::auth::register_gestor,
        handlers::auth::register_gestor_api,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Properties ---
        handlers::properties::list_properties,
        handlers::properties::get_property,
        handlers::properties::create_property,
        handlers::properties::edit_property,
        handlers::properties::update_status,
        handlers::properties::delete_property,

        // --- Contracts ---
        handlers::contracts::list_contracts,
        handlers::contracts::create_locatario,
        handlers::contracts::create_condomino,
        handlers::contracts::create_funcionario,
        handlers::contracts::contract_details,
        handlers::contracts::edit_contract,
        handlers::contracts::delete_contract,

        // --- Financial ---
        handlers::financial::financial_index,
        handlers::financial::upload_comprovante,
        handlers::documents::boleto_pdf,

        // --- Notice ---
        handlers::notice::notice_index,
        handlers::notice::notice_history,
        handlers::notice::solicitar,
        handlers::notice::iniciar,
        handlers::notice::iniciar_vistoria,
        handlers::notice::checklist,
        handlers::notice::view_checklist,
        handlers::notice::salvar_checklist,
        handlers::notice::upload_photo,
        handlers::notice::concluir_vistoria,
        handlers::notice::get_checklist_items,
        handlers::notice::get_notice_details,
    ),
    components(
        schemas(
            models::ActionResult,

            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterMoradorPayload,
            models::auth::RegisterSindicoPayload,
            models::auth::RegisterGestorPayload,
            models::auth::GestorApiRegistration,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            handlers::auth::RegisteredResponse,

            // --- Properties ---
            models::property::Occupancy,
            models::property::Property,
            models::property::PropertyPayload,
            models::property::UpdateOccupancyPayload,
            models::property::DeletePropertyPayload,
            models::property::PropertyListing,
            models::property::PropertyDetail,
            models::property::PropertyOption,

            // --- Contracts ---
            models::contract::ContractType,
            models::contract::Contract,
            models::contract::ContractListing,
            models::contract::ContractSaved,
            models::contract::ContractPayload,
            models::contract::EditContractPayload,
            models::contract::DeleteContractPayload,
            handlers::contracts::ContractDeleted,

            // --- Financial ---
            models::payment::PaymentStatus,
            models::payment::Payment,
            models::payment::PaymentView,
            models::payment::ChargeRow,
            models::payment::FinancialSummary,
            models::payment::FinancialOverview,
            models::payment::FinancialPage,
            models::payment::ProofUploaded,

            // --- Notice ---
            models::notice::NoticeStatus,
            models::notice::ItemStatus,
            models::notice::Notice,
            models::notice::ChecklistItem,
            models::notice::NoticeFoto,
            models::notice::ChecklistItemUpdate,
            models::notice::IniciarVistoriaPayload,
            models::notice::SolicitarVistoriaPayload,
            models::notice::StartInspectionResponse,
            models::notice::ItemIdsResponse,
            models::notice::ChecklistSaved,
            models::notice::PhotoUploaded,
            models::notice::ItemDetail,
            models::notice::FotoDetail,
            models::notice::NoticeDetails,
            models::notice::NoticeDetailsResponse,
            models::notice::NoticeSummary,
            models::notice::NoticeIndex,
            models::notice::NoticeHistory,
            models::notice::ChecklistView,
        )
    ),
    tags(
        (name = "Account", description = "Autenticação e Cadastro"),
        (name = "Properties", description = "Imóveis do condomínio"),
        (name = "Contracts", description = "Contratos de locatários, condôminos e funcionários"),
        (name = "Financial", description = "Cobranças mensais, comprovantes e boletos"),
        (name = "Notice", description = "Vistorias e checklist")
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
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        for path in ["/Account/Login", "/Properties", "/Contracts", "/Financial", "/Notice/UploadPhoto"] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente: {}", path);
        }
    }
}
