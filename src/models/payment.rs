// src/models/payment.rs

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::auth::Role;

// Valores fixos da cobrança mensal
pub const TAXA_CONDOMINIAL: Decimal = Decimal::from_parts(145_200, 0, 0, false, 2);
pub const FUNDO_RESERVA: Decimal = Decimal::from_parts(20_000, 0, 0, false, 2);
// Síndico paga 80% da taxa condominial (apenas na exibição)
pub const SINDICO_FACTOR: Decimal = Decimal::from_parts(8, 0, 0, false, 1);
pub const DUE_DAY: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum PaymentStatus {
    Pendente,
    Pago,
    Atrasado,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "11/2025")]
    pub mes_referencia: String,
    pub taxa_condominial: Decimal,
    pub fundo_reserva: Decimal,
    pub data_vencimento: NaiveDate,
    pub data_pagamento: Option<DateTime<Utc>>,
    pub comprovante_path: Option<String>,
    pub qr_code_pix: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn total(&self) -> Decimal {
        self.taxa_condominial + self.fundo_reserva
    }

    /// Status calculado na leitura. Nada é gravado de volta.
    /// `now` é o horário local de quem consulta.
    pub fn status_at(&self, now: NaiveDateTime) -> PaymentStatus {
        if self.data_pagamento.is_some() {
            return PaymentStatus::Pago;
        }
        if now > self.data_vencimento.and_time(NaiveTime::MIN) {
            PaymentStatus::Atrasado
        } else {
            PaymentStatus::Pendente
        }
    }
}

/// "MM/yyyy" do mês corrente.
pub fn reference_month(today: NaiveDate) -> String {
    today.format("%m/%Y").to_string()
}

pub fn due_date_for(today: NaiveDate) -> NaiveDate {
    today.with_day(DUE_DAY).unwrap_or(today)
}

// Cobrança a ser inserida para o mês de referência
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub user_id: Uuid,
    pub mes_referencia: String,
    pub taxa_condominial: Decimal,
    pub fundo_reserva: Decimal,
    pub data_vencimento: NaiveDate,
    pub qr_code_pix: String,
}

impl NewCharge {
    pub fn monthly(user_id: Uuid, today: NaiveDate, pix_payload: &str) -> Self {
        Self {
            user_id,
            mes_referencia: reference_month(today),
            taxa_condominial: TAXA_CONDOMINIAL,
            fundo_reserva: FUNDO_RESERVA,
            data_vencimento: due_date_for(today),
            qr_code_pix: pix_payload.to_string(),
        }
    }
}

/// Cobrança como aparece para quem consulta, com status e desconto aplicados.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mes_referencia: String,
    pub taxa_condominial: Decimal,
    pub fundo_reserva: Decimal,
    pub desconto: Option<Decimal>,
    pub total: Decimal,
    pub data_vencimento: NaiveDate,
    pub data_pagamento: Option<DateTime<Utc>>,
    pub comprovante_path: Option<String>,
    pub qr_code_pix: Option<String>,
    pub status: PaymentStatus,
}

impl PaymentView {
    pub fn for_role(payment: &Payment, role: Role, now: NaiveDateTime) -> Self {
        let (taxa, desconto) = match role {
            Role::Sindico => {
                let discounted = (payment.taxa_condominial * SINDICO_FACTOR).round_dp(2);
                (discounted, Some(payment.taxa_condominial - discounted))
            }
            _ => (payment.taxa_condominial, None),
        };

        Self {
            id: payment.id,
            user_id: payment.user_id,
            mes_referencia: payment.mes_referencia.clone(),
            taxa_condominial: taxa,
            fundo_reserva: payment.fundo_reserva,
            desconto,
            total: taxa + payment.fundo_reserva,
            data_vencimento: payment.data_vencimento,
            data_pagamento: payment.data_pagamento,
            comprovante_path: payment.comprovante_path.clone(),
            qr_code_pix: payment.qr_code_pix.clone(),
            status: payment.status_at(now),
        }
    }
}

// Linha da visão do gestor: cobrança + dados do pagador
#[derive(Debug, Clone, FromRow)]
pub struct PaymentWithPayer {
    #[sqlx(flatten)]
    pub payment: Payment,
    pub payer_email: String,
    pub payer_nome: Option<String>,
    pub payer_apartamento: Option<String>,
}

impl PaymentWithPayer {
    pub fn payer_name(&self) -> String {
        match self.payer_nome.as_deref().map(str::trim) {
            Some(nome) if !nome.is_empty() => nome.to_string(),
            _ => self.payer_email.clone(),
        }
    }

    pub fn apartment(&self) -> String {
        match self.payer_apartamento.as_deref().map(str::trim) {
            Some(apto) if !apto.is_empty() => apto.to_string(),
            _ => "-".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRow {
    #[serde(flatten)]
    pub charge: PaymentView,
    pub payer_name: String,
    pub apartment: String,
}

#[derive(Debug, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_expected: Decimal,
    pub total_received: Decimal,
    pub total_pending: Decimal,
    pub total_overdue: Decimal,
}

impl FinancialSummary {
    pub fn from_rows(rows: &[ChargeRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            let total = row.charge.total;
            acc.total_expected += total;
            match row.charge.status {
                PaymentStatus::Pago => acc.total_received += total,
                PaymentStatus::Pendente => acc.total_pending += total,
                PaymentStatus::Atrasado => acc.total_overdue += total,
            }
            acc
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    pub charges: Vec<ChargeRow>,
    pub summary: FinancialSummary,
}

/// Resposta de `GET /Financial`, conforme o papel de quem consulta.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum FinancialPage {
    Overview(FinancialOverview),
    OwnCharge { charge: PaymentView },
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProofUploaded {
    pub success: bool,
    pub message: String,
    pub comprovante_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn charge(due: NaiveDate, paid: bool) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mes_referencia: reference_month(due),
            taxa_condominial: TAXA_CONDOMINIAL,
            fundo_reserva: FUNDO_RESERVA,
            data_vencimento: due,
            data_pagamento: paid.then(Utc::now),
            comprovante_path: None,
            qr_code_pix: Some("000201PIXDATAAQUI".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn monthly_charge_uses_fixed_amounts_and_day_twenty() {
        let new = NewCharge::monthly(Uuid::new_v4(), date(2025, 3, 7), "pix");
        assert_eq!(new.mes_referencia, "03/2025");
        assert_eq!(new.data_vencimento, date(2025, 3, 20));
        assert_eq!(new.taxa_condominial + new.fundo_reserva, Decimal::new(165_200, 2));
    }

    #[test]
    fn unpaid_charge_is_overdue_only_after_due_midnight() {
        let p = charge(date(2025, 3, 20), false);
        let midnight = date(2025, 3, 20).and_time(NaiveTime::MIN);

        assert_eq!(p.status_at(midnight), PaymentStatus::Pendente);
        assert_eq!(
            p.status_at(midnight + chrono::Duration::seconds(1)),
            PaymentStatus::Atrasado
        );
        assert_eq!(
            p.status_at(date(2025, 3, 19).and_hms_opt(23, 0, 0).unwrap()),
            PaymentStatus::Pendente
        );
    }

    #[test]
    fn paid_charge_never_reverts() {
        let p = charge(date(2020, 1, 20), true);
        let much_later = date(2030, 1, 1).and_time(NaiveTime::MIN);
        assert_eq!(p.status_at(much_later), PaymentStatus::Pago);
    }

    #[test]
    fn sindico_sees_twenty_percent_off_the_fee() {
        let p = charge(date(2025, 3, 20), false);
        let now = date(2025, 3, 1).and_time(NaiveTime::MIN);

        let view = PaymentView::for_role(&p, Role::Sindico, now);
        assert_eq!(view.taxa_condominial, Decimal::new(116_160, 2));
        assert_eq!(view.desconto, Some(Decimal::new(29_040, 2)));
        assert_eq!(view.total, Decimal::new(136_160, 2));

        let morador = PaymentView::for_role(&p, Role::Morador, now);
        assert_eq!(morador.total, Decimal::new(165_200, 2));
        assert_eq!(morador.desconto, None);
    }

    #[test]
    fn summary_splits_totals_by_status() {
        let now = date(2025, 3, 25).and_time(NaiveTime::MIN);
        let rows: Vec<ChargeRow> = [
            charge(date(2025, 3, 20), true),
            charge(date(2025, 3, 20), false),
            charge(date(2025, 4, 20), false),
        ]
        .iter()
        .map(|p| ChargeRow {
            charge: PaymentView::for_role(p, Role::Morador, now),
            payer_name: "x".into(),
            apartment: "-".into(),
        })
        .collect();

        let summary = FinancialSummary::from_rows(&rows);
        let one = Decimal::new(165_200, 2);
        assert_eq!(summary.total_expected, one * Decimal::from(3));
        assert_eq!(summary.total_received, one);
        assert_eq!(summary.total_overdue, one);
        assert_eq!(summary.total_pending, one);
    }

    #[test]
    fn payer_falls_back_to_email_and_dash() {
        let row = PaymentWithPayer {
            payment: charge(date(2025, 3, 20), false),
            payer_email: "morador@x.com".into(),
            payer_nome: None,
            payer_apartamento: Some(" ".into()),
        };
        assert_eq!(row.payer_name(), "morador@x.com");
        assert_eq!(row.apartment(), "-");
    }
}
