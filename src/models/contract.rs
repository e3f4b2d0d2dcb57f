// src/models/contract.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contract_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    LocatarioProprietario,
    Condomino,
    Funcionario,
}

impl ContractType {
    pub fn label(self) -> &'static str {
        match self {
            ContractType::LocatarioProprietario => "Locatário/Proprietário",
            ContractType::Condomino => "Condomínio",
            ContractType::Funcionario => "Funcionário",
        }
    }

    // Aba da interface onde o tipo é listado
    pub fn tab(self) -> &'static str {
        match self {
            ContractType::LocatarioProprietario => "contracts",
            ContractType::Condomino => "residents",
            ContractType::Funcionario => "employees",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ContractType,
    #[schema(example = "Contrato de locação - Apto 302")]
    pub nome: String,
    pub locatario_nome: Option<String>,
    pub proprietario_nome: Option<String>,
    pub property_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_inicio: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_fim: Option<NaiveDate>,
    #[schema(example = "2500.00")]
    pub valor_mensal: Option<Decimal>,

    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub unidade: Option<String>,
    pub tipo_condomino: Option<String>,

    pub cargo: Option<String>,
    pub turno: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_admissao: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem com o imóvel já resolvido
#[derive(Debug, Clone, FromRow)]
pub struct ContractWithProperty {
    #[sqlx(flatten)]
    pub contract: Contract,
    pub property_bloco: Option<String>,
    pub property_numero: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractListing {
    #[serde(flatten)]
    pub contract: Contract,
    pub property_display: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractSaved {
    pub success: bool,
    pub tab: String,
    pub contract: Contract,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub locatario_nome: Option<String>,
    pub proprietario_nome: Option<String>,
    pub property_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_inicio: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_fim: Option<NaiveDate>,
    pub valor_mensal: Option<Decimal>,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub unidade: Option<String>,
    pub tipo_condomino: Option<String>,
    pub cargo: Option<String>,
    pub turno: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_admissao: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditContractPayload {
    #[serde(rename = "type")]
    pub kind: ContractType,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ContractPayload,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ContractQuery {
    pub search_string: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ContractType>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteContractPayload {
    #[serde(alias = "Id")]
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_their_tabs() {
        assert_eq!(ContractType::LocatarioProprietario.tab(), "contracts");
        assert_eq!(ContractType::Condomino.tab(), "residents");
        assert_eq!(ContractType::Funcionario.tab(), "employees");
    }

    #[test]
    fn edit_payload_reads_kind_and_flattened_fields() {
        let payload: EditContractPayload = serde_json::from_str(
            r#"{"type":"Funcionario","nome":"Porteiro","cargo":"Portaria","turno":"Noite"}"#,
        )
        .unwrap();

        assert_eq!(payload.kind, ContractType::Funcionario);
        assert_eq!(payload.fields.cargo.as_deref(), Some("Portaria"));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn contract_payload_requires_a_name() {
        let payload: ContractPayload = serde_json::from_str(r#"{"nome":""}"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
