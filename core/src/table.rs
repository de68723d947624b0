//! Table column configuration and row rendering.
//!
//! # Design
//! A column is either `Scalar` (read one field of the record's JSON form) or
//! `Derived` (compute the cell from the whole record). The kind is decided
//! when the column is declared and resolved once per row at render time.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Entity, Page, SystemError, User};

pub enum ColumnKind<T> {
    Scalar(&'static str),
    Derived(Box<dyn Fn(&T) -> String + Send + Sync>),
}

pub struct Column<T> {
    pub title: &'static str,
    pub kind: ColumnKind<T>,
}

impl<T> Column<T> {
    pub fn scalar(title: &'static str, field: &'static str) -> Self {
        Self {
            title,
            kind: ColumnKind::Scalar(field),
        }
    }

    pub fn derived<F>(title: &'static str, derive: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            title,
            kind: ColumnKind::Derived(Box::new(derive)),
        }
    }
}

/// Display text of a JSON value: strings verbatim, null as empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Header row followed by one row per record.
pub struct RenderedTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

pub fn render<T: Serialize>(records: &[T], columns: &[Column<T>]) -> Result<RenderedTable, serde_json::Error> {
    // Only scalar columns need the JSON form.
    let needs_json = columns.iter().any(|c| matches!(c.kind, ColumnKind::Scalar(_)));
    let rows = records
        .iter()
        .map(|record| -> Result<Vec<String>, serde_json::Error> {
            let json = if needs_json {
                Some(serde_json::to_value(record)?)
            } else {
                None
            };
            Ok(columns
                .iter()
                .map(|column| match &column.kind {
                    ColumnKind::Scalar(field) => cell_text(json.as_ref().and_then(|j| j.get(*field))),
                    ColumnKind::Derived(derive) => derive(record),
                })
                .collect())
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RenderedTable {
        headers: columns.iter().map(|c| c.title).collect(),
        rows,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index.
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl Pagination {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            page: page.number,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    /// One-based "Page X of Y" label.
    pub fn label(&self) -> String {
        format!("Page {} of {}", u64::from(self.page) + 1, self.total_pages.max(1))
    }
}

pub fn user_columns() -> Vec<Column<User>> {
    vec![
        Column::scalar("ID", "id"),
        Column::derived("Name", User::full_name),
        Column::scalar("Email", "email"),
        Column::derived("Phone", |u: &User| {
            u.phone_number
                .as_deref()
                .map(|p| crate::format::format_phone(p, " "))
                .unwrap_or_default()
        }),
        Column::scalar("Role", "role"),
        Column::scalar("Status", "status"),
    ]
}

pub fn entity_columns() -> Vec<Column<Entity>> {
    vec![
        Column::scalar("ID", "id"),
        Column::scalar("Name", "name"),
        Column::scalar("TIN", "tinNumber"),
        Column::scalar("Email", "email"),
        Column::scalar("Phone", "phoneNumber"),
        Column::scalar("Type", "entityType"),
        Column::scalar("Status", "status"),
    ]
}

pub fn system_error_columns() -> Vec<Column<SystemError>> {
    vec![
        Column::scalar("ID", "id"),
        Column::derived("Request", |e: &SystemError| {
            match (e.method.as_deref(), e.path.as_deref()) {
                (Some(m), Some(p)) => format!("{m} {p}"),
                (None, Some(p)) => p.to_string(),
                _ => String::new(),
            }
        }),
        Column::scalar("Status", "statusCode"),
        Column::scalar("Message", "message"),
        Column::scalar("Date", "createdAt"),
    ]
}
