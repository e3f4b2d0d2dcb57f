// src/routes.rs

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

// Teto do corpo nas rotas de upload; o limite de 5 MB da foto é regra de negócio
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let account_routes = Router::new()
        .route("/Account/Login", post(handlers::auth::login))
        .route("/Account/RegisterMorador", post(handlers::auth::register_morador))
        .route("/Account/RegisterSindico", post(handlers::auth::register_sindico))
        .route("/Account/RegisterGestor", post(handlers::auth::register_gestor))
        .route("/api/account/register-gestor", post(handlers::auth::register_gestor_api));

    let user_routes = Router::new()
        .route("/Account/Me", get(handlers::auth::get_me))
        .route("/Account/Logout", post(handlers::auth::logout));

    let property_routes = Router::new()
        .route("/Properties", get(handlers::properties::list_properties))
        .route("/Properties/{id}", get(handlers::properties::get_property))
        .route("/Properties/Create", post(handlers::properties::create_property))
        .route("/Properties/Edit/{id}", post(handlers::properties::edit_property))
        .route("/Properties/AtualizarStatus/{id}", post(handlers::properties::update_status))
        .route("/Properties/Delete", post(handlers::properties::delete_property));

    let contract_routes = Router::new()
        .route("/Contracts", get(handlers::contracts::list_contracts))
        .route("/Contracts/CreateLocatario", post(handlers::contracts::create_locatario))
        .route("/Contracts/CreateCondomino", post(handlers::contracts::create_condomino))
        .route("/Contracts/CreateFuncionario", post(handlers::contracts::create_funcionario))
        .route("/Contracts/Details/{id}", get(handlers::contracts::contract_details))
        .route("/Contracts/Edit/{id}", post(handlers::contracts::edit_contract))
        .route("/Contracts/Delete", post(handlers::contracts::delete_contract));

    let financial_routes = Router::new()
        .route("/Financial", get(handlers::financial::financial_index))
        .route(
            "/Financial/UploadComprovante",
            post(handlers::financial::upload_comprovante).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/Financial/Boleto/{id}", get(handlers::documents::boleto_pdf));

    let notice_routes = Router::new()
        .route("/Notice", get(handlers::notice::notice_index))
        .route("/Notice/Historico", get(handlers::notice::notice_history))
        .route("/Notice/Solicitar", post(handlers::notice::solicitar))
        .route("/Notice/Iniciar/{id}", post(handlers::notice::iniciar))
        .route("/Notice/IniciarVistoria", post(handlers::notice::iniciar_vistoria))
        .route("/Notice/Checklist/{id}", get(handlers::notice::checklist))
        .route("/Notice/ViewChecklist/{id}", get(handlers::notice::view_checklist))
        .route("/Notice/SalvarChecklist/{id}", post(handlers::notice::salvar_checklist))
        .route(
            "/Notice/UploadPhoto",
            post(handlers::notice::upload_photo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/Notice/ConcluirVistoria/{id}", post(handlers::notice::concluir_vistoria))
        .route("/Notice/GetChecklistItems/{id}", get(handlers::notice::get_checklist_items))
        .route("/Notice/GetNoticeDetails/{id}", get(handlers::notice::get_notice_details));

    // Tudo abaixo exige Bearer token
    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(property_routes)
        .merge(contract_routes)
        .merge(financial_routes)
        .merge(notice_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let uploads_dir = Path::new(&app_state.settings.web_root).join("uploads");

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(account_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
