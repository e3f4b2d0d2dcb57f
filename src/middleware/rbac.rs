// src/middleware/rbac.rs

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::Role,
};

/// Ações protegidas por papel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Iniciar, salvar checklist, concluir, checklist editável
    ManageInspections,
    // Listagens e detalhes sem restrição de solicitante
    ViewAllInspections,
    RequestInspection,
    AttachInspectionPhoto,
    ManageProperties,
    ViewProperties,
    ManageContracts,
    ViewContracts,
    ViewFinancialOverview,
    // Enviar comprovante de qualquer cobrança (não só as próprias)
    UploadAnyPaymentProof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    // Chave i18n do motivo
    Deny(&'static str),
}

/// Política única de acesso por papel.
pub fn authorize(role: Role, action: Action) -> Decision {
    use Action::*;

    let gestor_only = matches!(action, ManageInspections | ViewFinancialOverview | UploadAnyPaymentProof);
    let staff_only = matches!(
        action,
        ViewAllInspections | ManageProperties | ManageContracts | ViewContracts
    );

    match role {
        Role::Gestor => Decision::Allow,
        _ if gestor_only => Decision::Deny("policy.requires_gestor"),
        Role::Sindico => Decision::Allow,
        Role::Morador if staff_only => Decision::Deny("policy.requires_staff"),
        Role::Morador => Decision::Allow,
    }
}

impl Decision {
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AppError::Forbidden(reason)),
        }
    }
}

pub fn ensure(role: Role, action: Action) -> Result<(), AppError> {
    authorize(role, action).into_result()
}

/// O Trait que liga um tipo-marcador a uma ação da política
pub trait PermissionDef: Send + Sync + 'static {
    fn action() -> Action;
}

/// Extractor que barra a requisição antes do handler quando o papel não tem acesso.
/// Quando passa, entrega o usuário já autorizado.
pub struct RequirePermission<T> {
    pub user: AuthenticatedUser,
    _marker: PhantomData<T>,
}

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        ensure(user.role, T::action()).map_err(|e| {
            let app_state = AppState::from_ref(state);
            let locale = Locale::from_headers(&parts.headers);
            tracing::warn!(user_id = %user.id, action = ?T::action(), "Acesso negado");
            e.to_api_error(&locale, &app_state.i18n_store)
        })?;

        Ok(RequirePermission {
            user,
            _marker: PhantomData,
        })
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermManageInspections;
impl PermissionDef for PermManageInspections {
    fn action() -> Action { Action::ManageInspections }
}

pub struct PermManageProperties;
impl PermissionDef for PermManageProperties {
    fn action() -> Action { Action::ManageProperties }
}

pub struct PermViewProperties;
impl PermissionDef for PermViewProperties {
    fn action() -> Action { Action::ViewProperties }
}

pub struct PermManageContracts;
impl PermissionDef for PermManageContracts {
    fn action() -> Action { Action::ManageContracts }
}

pub struct PermViewContracts;
impl PermissionDef for PermViewContracts {
    fn action() -> Action { Action::ViewContracts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::*;

    const ALL: [Action; 10] = [
        ManageInspections,
        ViewAllInspections,
        RequestInspection,
        AttachInspectionPhoto,
        ManageProperties,
        ViewProperties,
        ManageContracts,
        ViewContracts,
        ViewFinancialOverview,
        UploadAnyPaymentProof,
    ];

    #[test]
    fn gestor_may_do_everything() {
        for action in ALL {
            assert_eq!(authorize(Role::Gestor, action), Decision::Allow, "{action:?}");
        }
    }

    #[test]
    fn sindico_cannot_run_inspections_or_see_overview() {
        assert_eq!(
            authorize(Role::Sindico, ManageInspections),
            Decision::Deny("policy.requires_gestor")
        );
        assert_eq!(
            authorize(Role::Sindico, ViewFinancialOverview),
            Decision::Deny("policy.requires_gestor")
        );
        assert_eq!(authorize(Role::Sindico, ViewAllInspections), Decision::Allow);
        assert_eq!(authorize(Role::Sindico, ManageContracts), Decision::Allow);
    }

    #[test]
    fn morador_is_limited_to_own_records() {
        assert_eq!(
            authorize(Role::Morador, ManageInspections),
            Decision::Deny("policy.requires_gestor")
        );
        assert_eq!(
            authorize(Role::Morador, ViewAllInspections),
            Decision::Deny("policy.requires_staff")
        );
        assert_eq!(
            authorize(Role::Morador, ManageProperties),
            Decision::Deny("policy.requires_staff")
        );
        assert_eq!(authorize(Role::Morador, RequestInspection), Decision::Allow);
        assert_eq!(authorize(Role::Morador, AttachInspectionPhoto), Decision::Allow);
        assert_eq!(authorize(Role::Morador, ViewProperties), Decision::Allow);
    }

    #[test]
    fn denial_becomes_forbidden_error() {
        let err = ensure(Role::Morador, ManageContracts).unwrap_err();
        assert!(matches!(err, AppError::Forbidden("policy.requires_staff")));
    }
}
