// src/models/property.rs

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::contract::Contract;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "occupancy_type", rename_all = "UPPERCASE")]
pub enum Occupancy {
    #[default]
    Vago,
    Ocupado,
    Alugado,
}

impl FromStr for Occupancy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vago" | "0" => Ok(Occupancy::Vago),
            "ocupado" | "1" => Ok(Occupancy::Ocupado),
            "alugado" | "2" => Ok(Occupancy::Alugado),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    #[schema(example = "B")]
    pub bloco: String,
    #[schema(example = "302")]
    pub numero: String,
    #[schema(example = "Apartamento")]
    pub tipo_imovel: Option<String>,
    pub occupancy: Occupancy,
    #[schema(example = "72.50")]
    pub area: Decimal,

    // As três formas de "dono" convivem; o nome exibido sai de `resolve_owner_name`
    pub owner_user_id: Option<Uuid>,
    pub owner_name: Option<String>,
    pub owner_ref: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// "Bloco - Número", ou só o número quando o bloco está vazio.
pub fn unit_display(bloco: Option<&str>, numero: &str) -> String {
    match bloco.map(str::trim) {
        Some(b) if !b.is_empty() => format!("{} - {}", b, numero),
        _ => numero.to_string(),
    }
}

impl Property {
    pub fn display(&self) -> String {
        unit_display(Some(&self.bloco), &self.numero)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Índice de nomes de usuários usado para resolver o dono de cada imóvel.
#[derive(Debug, Default, Clone)]
pub struct UserDirectory {
    by_id: HashMap<Uuid, String>,
    by_lower_name: HashMap<String, String>,
}

impl UserDirectory {
    pub fn new(entries: impl IntoIterator<Item = (Uuid, Option<String>)>) -> Self {
        let mut directory = Self::default();
        for (id, nome) in entries {
            if let Some(nome) = non_blank(nome.as_deref()) {
                directory.by_id.insert(id, nome.to_string());
                directory
                    .by_lower_name
                    .entry(nome.to_lowercase())
                    .or_insert_with(|| nome.to_string());
            }
        }
        directory
    }

    pub fn name_of(&self, id: Uuid) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&str> {
        self.by_lower_name.get(&name.trim().to_lowercase()).map(String::as_str)
    }
}

/// Nome do proprietário ou locatário informado no primeiro contrato do imóvel.
pub fn contract_owner_hint(contracts: &[Contract]) -> Option<String> {
    contracts
        .iter()
        .find_map(|c| {
            non_blank(c.proprietario_nome.as_deref()).or_else(|| non_blank(c.locatario_nome.as_deref()))
        })
        .map(str::to_string)
}

/// Precedência do nome exibido do dono:
/// 1. usuário vinculado; 2. nome livre; 3. identificador livre igual ao id de um usuário;
/// 4. identificador igual ao nome de um usuário (sem diferenciar maiúsculas);
/// 5. o identificador como está; 6. o nome vindo dos contratos do imóvel.
pub fn resolve_owner_name(
    property: &Property,
    directory: &UserDirectory,
    contract_hint: Option<&str>,
) -> Option<String> {
    if let Some(name) = property.owner_user_id.and_then(|id| directory.name_of(id)) {
        return Some(name.to_string());
    }

    if let Some(name) = non_blank(property.owner_name.as_deref()) {
        return Some(name.to_string());
    }

    if let Some(reference) = non_blank(property.owner_ref.as_deref()) {
        if let Some(name) = Uuid::parse_str(reference).ok().and_then(|id| directory.name_of(id)) {
            return Some(name.to_string());
        }
        if let Some(name) = directory.find_by_name(reference) {
            return Some(name.to_string());
        }
        return Some(reference.to_string());
    }

    non_blank(contract_hint).map(str::to_string)
}

/// Rótulo de tipo exibido na listagem: o tipo livre do imóvel, senão o tipo do contrato, senão "—".
pub fn contract_type_label(property: &Property, contracts: &[Contract]) -> String {
    if let Some(tipo) = non_blank(property.tipo_imovel.as_deref()) {
        return tipo.to_string();
    }
    contracts
        .first()
        .map(|c| c.kind.label().to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("A área não pode ser negativa.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPayload {
    #[validate(length(min = 1, message = "O bloco é obrigatório."))]
    pub bloco: String,
    #[validate(length(min = 1, message = "O número é obrigatório."))]
    pub numero: String,
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub area: Decimal,
    #[serde(default)]
    pub occupancy: Occupancy,
    pub tipo_imovel: Option<String>,
    /// Nome do proprietário; vincula ao usuário de mesmo nome quando existir.
    pub proprietario_nome: Option<String>,
    /// Identificador livre legado (id ou nome de usuário).
    pub proprietario_ref: Option<String>,
}

// Campos gravados em `properties`, já normalizados
#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub bloco: String,
    pub numero: String,
    pub tipo_imovel: Option<String>,
    pub occupancy: Occupancy,
    pub area: Decimal,
    pub owner_user_id: Option<Uuid>,
    pub owner_name: Option<String>,
    pub owner_ref: Option<String>,
}

impl PropertyRecord {
    /// Converte o formulário: textos em branco viram ausentes e o nome do
    /// proprietário é vinculado ao usuário de mesmo nome, se houver.
    pub fn from_payload(payload: &PropertyPayload, matched_owner: Option<Uuid>) -> Self {
        let clean = |v: &Option<String>| non_blank(v.as_deref()).map(str::to_string);
        let owner_name = clean(&payload.proprietario_nome);

        Self {
            bloco: payload.bloco.trim().to_string(),
            numero: payload.numero.trim().to_string(),
            tipo_imovel: clean(&payload.tipo_imovel),
            occupancy: payload.occupancy,
            area: payload.area,
            owner_user_id: owner_name.as_ref().and(matched_owner),
            owner_name,
            owner_ref: clean(&payload.proprietario_ref),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOccupancyPayload {
    // Texto livre: "Vago", "ocupado", "2"...
    #[schema(example = "Alugado")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    pub search_string: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeletePropertyPayload {
    #[serde(alias = "Id")]
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub owner_name: Option<String>,
    pub contract_type_label: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    pub owner_name: Option<String>,
    pub contracts: Vec<Contract>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOption {
    pub id: Uuid,
    pub bloco: String,
    pub numero: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contract::ContractType;

    fn property() -> Property {
        Property {
            id: Uuid::new_v4(),
            bloco: "A".into(),
            numero: "101".into(),
            tipo_imovel: None,
            occupancy: Occupancy::Ocupado,
            area: Decimal::new(7250, 2),
            owner_user_id: None,
            owner_name: None,
            owner_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contract(kind: ContractType, proprietario: Option<&str>, locatario: Option<&str>) -> Contract {
        Contract {
            id: Uuid::new_v4(),
            kind,
            nome: "Contrato".into(),
            locatario_nome: locatario.map(Into::into),
            proprietario_nome: proprietario.map(Into::into),
            property_id: None,
            data_inicio: None,
            data_fim: None,
            valor_mensal: None,
            cpf: None,
            telefone: None,
            email: None,
            unidade: None,
            tipo_condomino: None,
            cargo: None,
            turno: None,
            data_admissao: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn linked_user_wins_over_free_text() {
        let ana = Uuid::new_v4();
        let directory = UserDirectory::new([(ana, Some("Ana Paula".to_string()))]);
        let mut p = property();
        p.owner_user_id = Some(ana);
        p.owner_name = Some("Outro Nome".into());

        assert_eq!(resolve_owner_name(&p, &directory, Some("Contrato")), Some("Ana Paula".into()));
    }

    #[test]
    fn free_text_name_when_linked_user_has_no_name() {
        let ana = Uuid::new_v4();
        let directory = UserDirectory::new([(ana, None)]);
        let mut p = property();
        p.owner_user_id = Some(ana);
        p.owner_name = Some("José".into());

        assert_eq!(resolve_owner_name(&p, &directory, None), Some("José".into()));
    }

    #[test]
    fn reference_matching_user_id_resolves_to_that_user() {
        let bruno = Uuid::new_v4();
        let directory = UserDirectory::new([(bruno, Some("Bruno".to_string()))]);
        let mut p = property();
        p.owner_ref = Some(bruno.to_string());

        assert_eq!(resolve_owner_name(&p, &directory, None), Some("Bruno".into()));
    }

    #[test]
    fn reference_matching_user_name_ignores_case() {
        let directory = UserDirectory::new([(Uuid::new_v4(), Some("Carla Dias".to_string()))]);
        let mut p = property();
        p.owner_ref = Some("carla DIAS".into());

        assert_eq!(resolve_owner_name(&p, &directory, None), Some("Carla Dias".into()));
    }

    #[test]
    fn unknown_reference_is_shown_verbatim() {
        let directory = UserDirectory::default();
        let mut p = property();
        p.owner_ref = Some("Imobiliária XPTO".into());

        assert_eq!(resolve_owner_name(&p, &directory, Some("Contrato")), Some("Imobiliária XPTO".into()));
    }

    #[test]
    fn contracts_fill_in_when_property_has_no_owner() {
        let contracts = vec![
            contract(ContractType::LocatarioProprietario, None, Some("Locatário Silva")),
            contract(ContractType::LocatarioProprietario, Some("Dono Souza"), None),
        ];
        let hint = contract_owner_hint(&contracts);
        assert_eq!(hint.as_deref(), Some("Locatário Silva"));

        let p = property();
        assert_eq!(
            resolve_owner_name(&p, &UserDirectory::default(), hint.as_deref()),
            Some("Locatário Silva".into())
        );
    }

    #[test]
    fn no_owner_at_all() {
        assert_eq!(resolve_owner_name(&property(), &UserDirectory::default(), None), None);
    }

    #[test]
    fn type_label_prefers_property_then_contract() {
        let mut p = property();
        let contracts = vec![contract(ContractType::Funcionario, None, None)];
        assert_eq!(contract_type_label(&p, &contracts), "Funcionário");
        assert_eq!(contract_type_label(&p, &[]), "—");

        p.tipo_imovel = Some("Cobertura".into());
        assert_eq!(contract_type_label(&p, &contracts), "Cobertura");
    }

    #[test]
    fn record_links_owner_only_when_name_given() {
        let payload = PropertyPayload {
            bloco: " C ".into(),
            numero: "12".into(),
            area: Decimal::ZERO,
            occupancy: Occupancy::Vago,
            tipo_imovel: Some("   ".into()),
            proprietario_nome: None,
            proprietario_ref: None,
        };
        let record = PropertyRecord::from_payload(&payload, Some(Uuid::new_v4()));

        assert_eq!(record.bloco, "C");
        assert_eq!(record.tipo_imovel, None);
        assert_eq!(record.owner_user_id, None);
    }

    #[test]
    fn occupancy_parses_names_and_numbers() {
        assert_eq!("alugado".parse::<Occupancy>(), Ok(Occupancy::Alugado));
        assert_eq!("0".parse::<Occupancy>(), Ok(Occupancy::Vago));
        assert!("Demolido".parse::<Occupancy>().is_err());
    }

    #[test]
    fn unit_display_skips_empty_block() {
        assert_eq!(unit_display(Some(""), "12"), "12");
        assert_eq!(unit_display(Some("B"), "12"), "B - 12");
    }
}
