// src/services/quote_document_service.rs

use genpdf::{elements, style, Element};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProjectRepository, UserRepository},
    models::{
        auth::User,
        project::{can_view_quote, QuoteSheet},
    },
};

const COMPANY_NAME: &str = "LABEL PRINTING CO.";
const FONT_FAMILY: &str = "Roboto";

fn render_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

/// Monta o PDF do orçamento em memória. As fontes vêm de `font_dir`
/// (`Roboto-Regular.ttf`, `Roboto-Bold.ttf`, ...).
pub fn render_quote_pdf(
    font_dir: &str,
    sheet: &QuoteSheet,
    employee_name: Option<&str>,
) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(font_dir, FONT_FAMILY, None)
        .map_err(|_| AppError::FontNotFound(format!("{FONT_FAMILY} em {font_dir}")))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Quote {}", sheet.quote_id));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(elements::Paragraph::new(COMPANY_NAME).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(elements::Break::new(1.5));
    doc.push(elements::Paragraph::new("QUOTATION").styled(style::Style::new().bold().with_font_size(14)));
    doc.push(elements::Paragraph::new(format!("Date: {}", sheet.quoted_at.format("%Y-%m-%d"))));
    doc.push(elements::Paragraph::new(format!("Reference: {}", sheet.quote_id)));
    doc.push(elements::Break::new(1.5));

    // --- CLIENTE E PROJETO ---
    let bold = style::Style::new().bold();
    let mut table = elements::TableLayout::new(vec![1, 3]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let mut rows: Vec<(&str, String)> = vec![
        ("Customer", sheet.customer_name.clone()),
        ("Email", sheet.customer_email.clone().unwrap_or_else(|| "-".into())),
        ("Project", sheet.project_title.clone()),
    ];
    if let Some(description) = &sheet.project_description {
        rows.push(("Description", description.clone()));
    }
    if let Some(name) = employee_name {
        rows.push(("Handled by", name.to_string()));
    }

    for (label, value) in rows {
        table
            .row()
            .element(elements::Paragraph::new(label).styled(bold))
            .element(elements::Paragraph::new(value))
            .push()
            .map_err(render_error)?;
    }
    doc.push(table);
    doc.push(elements::Break::new(2));

    if let Some(details) = &sheet.details {
        doc.push(elements::Paragraph::new("Details").styled(bold));
        for line in details.lines() {
            doc.push(elements::Paragraph::new(line));
        }
        doc.push(elements::Break::new(1.5));
    }

    // --- TOTAL ---
    let mut total = elements::Paragraph::new(format!("TOTAL: HK$ {:.2}", sheet.amount));
    total.set_alignment(genpdf::Alignment::Right);
    doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(render_error)?;
    Ok(buffer)
}

#[derive(Clone)]
pub struct QuoteDocumentService {
    project_repo: ProjectRepository,
    user_repo: UserRepository,
    font_dir: String,
}

impl QuoteDocumentService {
    pub fn new(project_repo: ProjectRepository, user_repo: UserRepository, font_dir: String) -> Self {
        Self { project_repo, user_repo, font_dir }
    }

    /// Admin, o funcionário responsável ou o cliente dono do projeto.
    pub async fn quote_pdf(&self, user: &User, quote_id: Uuid) -> Result<Vec<u8>, AppError> {
        let sheet = self
            .project_repo
            .quote_sheet(quote_id)
            .await?
            .ok_or(AppError::QuoteNotFound)?;

        if !can_view_quote(user, &sheet) {
            return Err(AppError::Forbidden);
        }

        let employee_name = match sheet.assigned_employee_id {
            Some(id) => self.user_repo.find_by_id(id).await?.map(|e| e.name),
            None => None,
        };

        let pdf = render_quote_pdf(&self.font_dir, &sheet, employee_name.as_deref())?;
        tracing::info!("📄 PDF do orçamento {} gerado para {}", quote_id, user.id);
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn missing_fonts_are_reported() {
        let sheet = QuoteSheet {
            quote_id: Uuid::new_v4(),
            amount: Decimal::new(250000, 2),
            details: Some("1000 rolos".into()),
            quoted_at: Utc::now(),
            project_id: Uuid::new_v4(),
            project_title: "Rótulos".into(),
            project_description: None,
            customer_id: Uuid::new_v4(),
            customer_name: "Cliente".into(),
            customer_email: None,
            assigned_employee_id: None,
        };
        let err = render_quote_pdf("/nonexistent/fonts", &sheet, None).unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
