// src/models/notice.rs

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        property::{unit_display, PropertyOption},
    },
};

// Checklist padrão de vistoria, na ordem em que é exibido
pub const CHECKLIST_TEMPLATE: [(&str, &str); 15] = [
    ("Sala", "Paredes e pintura"),
    ("Sala", "Piso e revestimento"),
    ("Sala", "Portas e janelas"),
    ("Sala", "Iluminação"),
    ("Cozinha", "Armários e bancadas"),
    ("Cozinha", "Pia e torneiras"),
    ("Cozinha", "Fogão e coifa"),
    ("Banheiro", "Vaso sanitário"),
    ("Banheiro", "Box e chuveiro"),
    ("Banheiro", "Pia e torneiras"),
    ("Quartos", "Paredes e pintura"),
    ("Quartos", "Armários embutidos"),
    ("Área de Serviço", "Tanque"),
    ("Área de Serviço", "Instalações elétricas"),
    ("Geral", "Chaves entregues"),
];

/// Pendente -> EmProgresso -> Resolvido. Resolvido não aceita mais alterações.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notice_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeStatus {
    #[default]
    Pendente,
    EmProgresso,
    Resolvido,
}

impl NoticeStatus {
    pub fn is_terminal(self) -> bool {
        self == NoticeStatus::Resolvido
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "item_status")]
pub enum ItemStatus {
    #[default]
    #[sqlx(rename = "NA")]
    #[serde(rename = "NA")]
    Na,
    #[sqlx(rename = "OK")]
    #[serde(rename = "OK")]
    Ok,
    #[sqlx(rename = "ATENCAO")]
    #[serde(rename = "Atenção")]
    Atencao,
    #[sqlx(rename = "CRITICO")]
    #[serde(rename = "Critico")]
    Critico,
}

impl FromStr for ItemStatus {
    type Err = String;

    // Aceita o nome com ou sem acento, em qualquer caixa, ou o código numérico 1..4
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "na" | "1" => Ok(ItemStatus::Na),
            "ok" | "2" => Ok(ItemStatus::Ok),
            "atenção" | "atencao" | "3" => Ok(ItemStatus::Atencao),
            "critico" | "crítico" | "4" => Ok(ItemStatus::Critico),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub solicitante_id: Uuid,
    pub gestor_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub status: NoticeStatus,
    pub data_criacao: DateTime<Utc>,
    pub data_conclusao: Option<DateTime<Utc>>,
}

impl Notice {
    pub fn ensure_open(&self) -> Result<(), AppError> {
        if self.status.is_terminal() {
            return Err(AppError::InspectionAlreadyConcluded);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    pub notice_id: Uuid,
    pub position: i32,
    pub categoria: String,
    pub descricao: String,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeFoto {
    pub id: Uuid,
    pub notice_id: Uuid,
    pub checklist_item_id: Option<Uuid>,
    pub foto_file: String,
    pub data_upload: DateTime<Utc>,
}

// Corpo de SalvarChecklist: [{ "Id": ..., "Status": "OK" }]
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChecklistItemUpdate {
    #[serde(rename = "Id", alias = "id")]
    pub id: Uuid,
    #[serde(rename = "Status", alias = "status")]
    pub status: Option<String>,
}

/// Filtra as alterações válidas: o item precisa pertencer à vistoria e o
/// status precisa ser reconhecido. O resto é ignorado em silêncio.
pub fn plan_checklist_updates(
    notice_items: &[ChecklistItem],
    updates: &[ChecklistItemUpdate],
) -> Vec<(Uuid, ItemStatus)> {
    let owned: HashSet<Uuid> = notice_items.iter().map(|item| item.id).collect();

    updates
        .iter()
        .filter(|u| owned.contains(&u.id))
        .filter_map(|u| {
            let status = u.status.as_deref()?.parse::<ItemStatus>().ok()?;
            Some((u.id, status))
        })
        .collect()
}

/// Aba inicial da tela de vistorias quando o cliente não pede uma.
pub fn default_tab(role: Role, requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(tab) if !tab.is_empty() => tab.to_string(),
        _ if role == Role::Gestor => "checklist".to_string(),
        _ => "historico".to_string(),
    }
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct IniciarVistoriaPayload {
    #[serde(rename = "PropertyId", alias = "propertyId")]
    pub property_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SolicitarVistoriaPayload {
    #[serde(rename = "PropertyId", alias = "propertyId", default)]
    pub property_id: Option<Uuid>,
}

// ---
// Respostas
// ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartInspectionResponse {
    pub success: bool,
    pub notice_id: Uuid,
    pub item_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemIdsResponse {
    pub success: bool,
    pub item_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSaved {
    pub success: bool,
    pub message: String,
    pub updated: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploaded {
    pub success: bool,
    pub file_path: String,
    pub file_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemDetail {
    pub id: Uuid,
    pub categoria: String,
    pub descricao: String,
    pub status: ItemStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FotoDetail {
    pub id: Uuid,
    pub foto_file: String,
    pub checklist_item_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeDetails {
    pub id: Uuid,
    pub status: NoticeStatus,
    pub itens: Vec<ItemDetail>,
    pub fotos: Vec<FotoDetail>,
}

impl NoticeDetails {
    pub fn new(notice: &Notice, items: Vec<ChecklistItem>, fotos: Vec<NoticeFoto>) -> Self {
        Self {
            id: notice.id,
            status: notice.status,
            itens: items
                .into_iter()
                .map(|i| ItemDetail {
                    id: i.id,
                    categoria: i.categoria,
                    descricao: i.descricao,
                    status: i.status,
                })
                .collect(),
            fotos: fotos
                .into_iter()
                .map(|f| FotoDetail {
                    id: f.id,
                    foto_file: f.foto_file,
                    checklist_item_id: f.checklist_item_id,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeDetailsResponse {
    pub success: bool,
    pub notice: NoticeDetails,
}

// Linha da listagem, já com nomes e contagens resolvidos no SQL
#[derive(Debug, Clone, FromRow)]
pub struct NoticeSummaryRow {
    #[sqlx(flatten)]
    pub notice: Notice,
    pub property_bloco: Option<String>,
    pub property_numero: Option<String>,
    pub solicitante_nome: String,
    pub gestor_nome: Option<String>,
    pub item_count: i64,
    pub foto_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeSummary {
    #[serde(flatten)]
    pub notice: Notice,
    pub property_display: Option<String>,
    pub solicitante_nome: String,
    pub gestor_nome: Option<String>,
    pub item_count: i64,
    pub foto_count: i64,
}

impl From<NoticeSummaryRow> for NoticeSummary {
    fn from(row: NoticeSummaryRow) -> Self {
        Self {
            property_display: row
                .property_numero
                .as_deref()
                .map(|numero| unit_display(row.property_bloco.as_deref(), numero)),
            notice: row.notice,
            solicitante_nome: row.solicitante_nome,
            gestor_nome: row.gestor_nome,
            item_count: row.item_count,
            foto_count: row.foto_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeIndex {
    pub active_tab: String,
    pub notices: Vec<NoticeSummary>,
    // Imóveis para o seletor de "iniciar vistoria"
    pub properties: Vec<PropertyOption>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeHistory {
    pub abertas: Vec<NoticeSummary>,
    pub concluidas: Vec<NoticeSummary>,
}

impl NoticeHistory {
    pub fn split(summaries: Vec<NoticeSummary>) -> Self {
        let (concluidas, abertas) = summaries
            .into_iter()
            .partition(|s| s.notice.status.is_terminal());
        Self { abertas, concluidas }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistView {
    pub notice: NoticeSummary,
    pub itens: Vec<ChecklistItem>,
    pub fotos: Vec<NoticeFoto>,
    pub read_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(notice_id: Uuid, position: i32) -> ChecklistItem {
        let (categoria, descricao) = CHECKLIST_TEMPLATE[position as usize];
        ChecklistItem {
            id: Uuid::new_v4(),
            notice_id,
            position,
            categoria: categoria.into(),
            descricao: descricao.into(),
            status: ItemStatus::Na,
        }
    }

    fn update(id: Uuid, status: &str) -> ChecklistItemUpdate {
        ChecklistItemUpdate {
            id,
            status: Some(status.into()),
        }
    }

    #[test]
    fn template_has_fifteen_items_in_room_order() {
        assert_eq!(CHECKLIST_TEMPLATE.len(), 15);
        assert_eq!(CHECKLIST_TEMPLATE[0], ("Sala", "Paredes e pintura"));
        assert_eq!(CHECKLIST_TEMPLATE[9], ("Banheiro", "Pia e torneiras"));
        assert_eq!(CHECKLIST_TEMPLATE[14], ("Geral", "Chaves entregues"));

        let rooms: Vec<&str> = CHECKLIST_TEMPLATE.iter().map(|(c, _)| *c).collect();
        let count = |room: &str| rooms.iter().filter(|r| **r == room).count();
        assert_eq!(count("Sala"), 4);
        assert_eq!(count("Cozinha"), 3);
        assert_eq!(count("Banheiro"), 3);
        assert_eq!(count("Quartos"), 2);
        assert_eq!(count("Área de Serviço"), 2);
        assert_eq!(count("Geral"), 1);
    }

    #[test]
    fn item_status_parses_leniently() {
        assert_eq!("ok".parse::<ItemStatus>(), Ok(ItemStatus::Ok));
        assert_eq!("ATENÇÃO".parse::<ItemStatus>(), Ok(ItemStatus::Atencao));
        assert_eq!("Atencao".parse::<ItemStatus>(), Ok(ItemStatus::Atencao));
        assert_eq!("Crítico".parse::<ItemStatus>(), Ok(ItemStatus::Critico));
        assert_eq!("4".parse::<ItemStatus>(), Ok(ItemStatus::Critico));
        assert!("quebrado".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn item_status_serializes_with_display_names() {
        assert_eq!(serde_json::to_string(&ItemStatus::Atencao).unwrap(), "\"Atenção\"");
        assert_eq!(serde_json::to_string(&ItemStatus::Na).unwrap(), "\"NA\"");
    }

    #[test]
    fn foreign_items_and_bad_statuses_are_skipped() {
        let notice = Uuid::new_v4();
        let items = vec![item(notice, 0), item(notice, 1)];
        let foreign = Uuid::new_v4();

        let plan = plan_checklist_updates(
            &items,
            &[
                update(items[0].id, "OK"),
                update(foreign, "Critico"),
                update(items[1].id, "talvez"),
                ChecklistItemUpdate {
                    id: items[1].id,
                    status: None,
                },
            ],
        );

        assert_eq!(plan, vec![(items[0].id, ItemStatus::Ok)]);
    }

    #[test]
    fn update_list_accepts_pascal_case() {
        let id = Uuid::new_v4();
        let body = format!(r#"[{{"Id":"{}","Status":"Atenção"}}]"#, id);
        let updates: Vec<ChecklistItemUpdate> = serde_json::from_str(&body).unwrap();
        assert_eq!(updates[0].id, id);
        assert_eq!(updates[0].status.as_deref(), Some("Atenção"));
    }

    #[test]
    fn concluded_notice_rejects_changes() {
        let mut notice = Notice {
            id: Uuid::new_v4(),
            solicitante_id: Uuid::new_v4(),
            gestor_id: None,
            property_id: None,
            status: NoticeStatus::EmProgresso,
            data_criacao: Utc::now(),
            data_conclusao: None,
        };
        assert!(notice.ensure_open().is_ok());

        notice.status = NoticeStatus::Resolvido;
        assert!(matches!(notice.ensure_open(), Err(AppError::InspectionAlreadyConcluded)));
    }

    #[test]
    fn default_tab_depends_on_role() {
        assert_eq!(default_tab(Role::Gestor, None), "checklist");
        assert_eq!(default_tab(Role::Sindico, Some("")), "historico");
        assert_eq!(default_tab(Role::Morador, Some("checklist")), "checklist");
    }

    #[test]
    fn summary_builds_property_display() {
        let row = NoticeSummaryRow {
            notice: Notice {
                id: Uuid::new_v4(),
                solicitante_id: Uuid::new_v4(),
                gestor_id: None,
                property_id: Some(Uuid::new_v4()),
                status: NoticeStatus::Pendente,
                data_criacao: Utc::now(),
                data_conclusao: None,
            },
            property_bloco: Some("B".into()),
            property_numero: Some("302".into()),
            solicitante_nome: "Ana".into(),
            gestor_nome: None,
            item_count: 0,
            foto_count: 0,
        };
        let summary = NoticeSummary::from(row);
        assert_eq!(summary.property_display.as_deref(), Some("B - 302"));
    }
}
