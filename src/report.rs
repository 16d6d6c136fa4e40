//! Downloadable snapshots of the admin user and order tables.
//!
//! Reports are read-only projections: they never touch stored state and
//! never include passwords. The JSON variant also carries the statistics
//! block shown above the table.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::admin::{OrderStats, UserStats};
use crate::domain::{Order, ShippingStatus, User};

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Comma separated.
    Csv,
    /// Semicolon separated with a byte-order mark, which spreadsheet
    /// applications in Spanish locales open without an import wizard.
    CsvExcel,
    Json,
}

impl ReportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv | Self::CsvExcel => "csv",
            Self::Json => "json",
        }
    }

    fn mime_type(self) -> &'static str {
        match self {
            Self::Csv | Self::CsvExcel => "text/csv;charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fixed-column projection of a record.
trait ReportRow: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

#[derive(Serialize)]
struct UserRow<'a> {
    run: &'a str,
    name: &'a str,
    surnames: &'a str,
    email: &'a str,
    phone: &'a str,
    region: &'a str,
    commune: &'a str,
    street: &'a str,
    #[serde(rename = "type")]
    user_type: String,
    discount: String,
}

impl<'a> From<&'a User> for UserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            run: &user.run,
            name: &user.name,
            surnames: &user.surnames,
            email: &user.email,
            phone: user.phone.as_deref().unwrap_or_default(),
            region: &user.address.region,
            commune: &user.address.commune,
            street: &user.address.street,
            user_type: user.user_type.to_string(),
            discount: user.discount.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

impl ReportRow for UserRow<'_> {
    const HEADERS: &'static [&'static str] = &[
        "RUN",
        "Nombre",
        "Apellidos",
        "Email",
        "Teléfono",
        "Región",
        "Comuna",
        "Dirección",
        "Tipo",
        "Descuento",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.run.to_string(),
            self.name.to_string(),
            self.surnames.to_string(),
            self.email.to_string(),
            self.phone.to_string(),
            self.region.to_string(),
            self.commune.to_string(),
            self.street.to_string(),
            self.user_type.clone(),
            self.discount.clone(),
        ]
    }
}

fn status_label(status: ShippingStatus) -> &'static str {
    match status {
        ShippingStatus::Pending => "Pendiente",
        ShippingStatus::Processing => "Procesando",
        ShippingStatus::Shipped => "Enviado",
        ShippingStatus::Delivered => "Entregado",
        ShippingStatus::Cancelled => "Cancelado",
    }
}

#[derive(Serialize)]
struct OrderRow<'a> {
    order_number: &'a str,
    user_run: &'a str,
    date: String,
    units: u32,
    total: u64,
    status: &'static str,
}

impl<'a> From<&'a Order> for OrderRow<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            order_number: &order.order_number,
            user_run: &order.user_run,
            date: order.date.format("%Y-%m-%d %H:%M").to_string(),
            units: order.units(),
            total: order.total,
            status: status_label(order.shipping_status),
        }
    }
}

impl ReportRow for OrderRow<'_> {
    const HEADERS: &'static [&'static str] = &["Número", "RUN", "Fecha", "Unidades", "Total", "Estado"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.order_number.to_string(),
            self.user_run.to_string(),
            self.date.clone(),
            self.units.to_string(),
            self.total.to_string(),
            self.status.to_string(),
        ]
    }
}

fn escape(field: &str, delimiter: char) -> String {
    if field.contains(|c: char| c == delimiter || matches!(c, '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn delimited<R: ReportRow>(rows: &[R], delimiter: char) -> String {
    let separator = delimiter.to_string();
    let mut out = String::new();
    let header: Vec<String> = R::HEADERS.iter().map(|h| escape(h, delimiter)).collect();
    out.push_str(&header.join(&separator));
    out.push_str("\r\n");
    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| escape(c, delimiter)).collect();
        out.push_str(&cells.join(&separator));
        out.push_str("\r\n");
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a, S, R> {
    generated_on: NaiveDate,
    stats: &'a S,
    rows: &'a [R],
}

fn render<R: ReportRow, S: Serialize>(
    name: &str,
    rows: &[R],
    stats: &S,
    format: ReportFormat,
    on: NaiveDate,
) -> Result<ReportFile, ReportError> {
    let contents = match format {
        ReportFormat::Csv => delimited(rows, ','),
        ReportFormat::CsvExcel => format!("{UTF8_BOM}{}", delimited(rows, ';')),
        ReportFormat::Json => serde_json::to_string_pretty(&JsonReport {
            generated_on: on,
            stats,
            rows,
        })?,
    };
    Ok(ReportFile {
        file_name: format!("reporte_{name}_{}.{}", on.format("%Y-%m-%d"), format.extension()),
        mime_type: format.mime_type(),
        contents,
    })
}

/// `users` is the filtered view; `stats` usually covers every account.
pub fn export_users(
    users: &[User],
    stats: &UserStats,
    format: ReportFormat,
    on: NaiveDate,
) -> Result<ReportFile, ReportError> {
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    render("usuarios", &rows, stats, format, on)
}

pub fn export_orders(
    orders: &[Order],
    stats: &OrderStats,
    format: ReportFormat,
    on: NaiveDate,
) -> Result<ReportFile, ReportError> {
    let rows: Vec<OrderRow> = orders.iter().map(OrderRow::from).collect();
    render("ordenes", &rows, stats, format, on)
}
