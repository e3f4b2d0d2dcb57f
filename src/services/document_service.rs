// src/services/document_service.rs

use std::path::PathBuf;

use chrono::Local;
use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::payment::{PaymentStatus, PaymentView},
    services::billing_service::BillingService,
};

#[derive(Clone)]
pub struct DocumentService {
    billing: BillingService,
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(billing: BillingService, fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            billing,
            fonts_dir: fonts_dir.into(),
        }
    }

    /// Boleto em PDF da cobrança, com os valores que o usuário enxerga.
    pub async fn generate_boleto_pdf(&self, user: &AuthenticatedUser, payment_id: Uuid) -> Result<Vec<u8>, AppError> {
        let payment = self.billing.visible_charge(user, payment_id).await?;
        let view = PaymentView::for_role(&payment, user.role, Local::now().naive_local());

        let fonts_dir = self.fonts_dir.clone();
        let payer = user.name.clone();

        // genpdf é síncrono e faz E/S de fontes
        tokio::task::spawn_blocking(move || render_boleto(&view, &payer, &fonts_dir))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))?
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

fn status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pendente => "PENDENTE",
        PaymentStatus::Pago => "PAGO",
        PaymentStatus::Atrasado => "ATRASADO",
    }
}

pub fn render_boleto(view: &PaymentView, payer: &str, fonts_dir: &std::path::Path) -> Result<Vec<u8>, AppError> {
    // Carrega a fonte da pasta configurada
    let font_family = genpdf::fonts::from_files(fonts_dir, "Roboto", None)
        .map_err(|_| AppError::FontNotFound(format!("Fonte não encontrada em {}", fonts_dir.display())))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Boleto {}", view.mes_referencia));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(elements::Paragraph::new("CONDOHUB - TAXA CONDOMINIAL").styled(style::Style::new().bold().with_font_size(18)));
    doc.push(elements::Paragraph::new(format!("Referência: {}", view.mes_referencia)));
    doc.push(elements::Paragraph::new(format!("Pagador: {}", payer)));
    doc.push(elements::Paragraph::new(format!(
        "Vencimento: {}",
        view.data_vencimento.format("%d/%m/%Y")
    )));
    doc.push(elements::Paragraph::new(format!("Situação: {}", status_label(view.status))));
    doc.push(elements::Break::new(1.5));

    // --- VALORES ---
    let mut table = elements::TableLayout::new(vec![3, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Descrição").styled(style_bold))
        .element(elements::Paragraph::new("Valor").styled(style_bold))
        .push()
        .map_err(pdf_error)?;

    let mut lines = vec![("Taxa condominial".to_string(), view.taxa_condominial)];
    if let Some(desconto) = view.desconto {
        lines.push(("Desconto síndico (20%)".to_string(), -desconto));
    }
    lines.push(("Fundo de reserva".to_string(), view.fundo_reserva));

    for (label, value) in lines {
        table
            .row()
            .element(elements::Paragraph::new(label))
            .element(elements::Paragraph::new(format!("R$ {:.2}", value)))
            .push()
            .map_err(pdf_error)?;
    }

    doc.push(table);
    doc.push(elements::Break::new(1));

    let mut total_paragraph = elements::Paragraph::new(format!("TOTAL: R$ {:.2}", view.total));
    total_paragraph.set_alignment(genpdf::Alignment::Right);
    doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

    // --- PIX ---
    if let Some(payload) = view.qr_code_pix.as_deref().filter(|p| !p.is_empty()) {
        doc.push(elements::Break::new(2));
        doc.push(elements::Paragraph::new("PAGAMENTO VIA PIX").styled(style::Style::new().bold().with_font_size(12)));
        doc.push(elements::Paragraph::new(format!("Copia e cola: {}", payload)).styled(style::Style::new().with_font_size(8)));
        doc.push(elements::Break::new(1));

        let code = QrCode::new(payload.as_bytes()).map_err(pdf_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(pdf_error)?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);
    }

    // 3. Renderiza para Buffer (Memória)
    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_error)?;

    Ok(buffer)
}
