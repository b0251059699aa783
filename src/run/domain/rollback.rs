//! Conservative derivation of rollback statements.
//!
//! Only statements whose effect can be undone exactly from the statement
//! text or from a pre-image of the affected rows get a rollback:
//!
//! - a plain `INSERT` with an explicit column list and literal `VALUES`
//!   rows is undone by deleting on its first column;
//! - a single-table `UPDATE` or `DELETE` with a `WHERE` clause and no joins,
//!   `USING`, `ORDER BY` or `LIMIT` is undone from the rows captured by
//!   `SELECT * FROM <table> WHERE <same condition>` before the statement.
//!
//! Everything else yields no rollback.

use super::RowMap;
use crate::task::domain::QueryType;
use serde_json::Value;
use sqlparser::ast::{
    Assignment, Delete, Expr, FromTable, Insert, SetExpr, Statement, TableFactor,
    TableWithJoins, UnaryOperator, Value as SqlValue,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

/// How a statement can be rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackPlan {
    /// No exact rollback can be derived.
    Unsupported,
    /// The rollback is known before execution.
    Ready(String),
    /// The rollback is rendered from rows captured before execution.
    PreImage(PreImagePlan),
}

/// Which statement a pre-image rollback undoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackKind {
    /// Rows were modified; restore their captured values.
    RestoreUpdated,
    /// Rows were removed; insert them again.
    ReinsertDeleted,
}

/// Pre-image capture and rendering for an `UPDATE` or `DELETE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreImagePlan {
    table: String,
    select_sql: String,
    kind: RollbackKind,
    assigned_columns: Vec<String>,
}

impl RollbackPlan {
    /// Plans the rollback for `sql`, which must be a single statement of the
    /// declared `query_type`.
    #[must_use]
    pub fn for_statement(query_type: QueryType, sql: &str) -> Self {
        let Ok(mut statements) = Parser::parse_sql(&MySqlDialect {}, sql) else {
            return Self::Unsupported;
        };
        if statements.len() != 1 {
            return Self::Unsupported;
        }
        let Some(statement) = statements.pop() else {
            return Self::Unsupported;
        };

        match (query_type, statement) {
            (QueryType::Insert, Statement::Insert(insert)) => plan_insert(&insert),
            (
                QueryType::Update,
                Statement::Update {
                    table,
                    assignments,
                    from,
                    selection,
                    ..
                },
            ) => plan_update(&table, &assignments, from.as_ref(), selection.as_ref()),
            (QueryType::Delete, Statement::Delete(delete)) => plan_delete(&delete),
            _ => Self::Unsupported,
        }
    }

    /// Returns the pre-image plan, if the rollback needs one.
    #[must_use]
    pub const fn pre_image(&self) -> Option<&PreImagePlan> {
        match self {
            Self::PreImage(plan) => Some(plan),
            Self::Unsupported | Self::Ready(_) => None,
        }
    }
}

impl PreImagePlan {
    /// Returns the `SELECT` that captures the affected rows.
    #[must_use]
    pub fn select_sql(&self) -> &str {
        &self.select_sql
    }

    /// Returns the capture query bounded to one row beyond `row_limit`, so
    /// an over-limit capture is detectable without reading the whole table.
    #[must_use]
    pub fn capture_sql(&self, row_limit: usize) -> String {
        format!("{} LIMIT {}", self.select_sql, row_limit.saturating_add(1))
    }

    /// Returns the statement kind being undone.
    #[must_use]
    pub const fn kind(&self) -> RollbackKind {
        self.kind
    }

    /// Renders rollback statements from the captured rows, one per row.
    ///
    /// Returns `None` when no rows were captured, when a row cannot be
    /// addressed by its first column, or when the `UPDATE` itself assigned
    /// that first column.
    #[must_use]
    pub fn render(&self, rows: &[RowMap]) -> Option<String> {
        let first_row = rows.first()?;
        let statements = match self.kind {
            RollbackKind::RestoreUpdated => {
                let (key_column, _) = first_row.iter().next()?;
                if self
                    .assigned_columns
                    .contains(&normalize_column(key_column))
                {
                    return None;
                }
                rows.iter()
                    .map(|row| self.restore_row(key_column, row))
                    .collect::<Option<Vec<_>>>()?
            }
            RollbackKind::ReinsertDeleted => rows
                .iter()
                .map(|row| self.reinsert_row(row))
                .collect::<Option<Vec<_>>>()?,
        };
        Some(statements.join("\n"))
    }

    fn restore_row(&self, key_column: &str, row: &RowMap) -> Option<String> {
        let key = row.get(key_column).filter(|value| !value.is_null())?;
        let assignments = row
            .iter()
            .map(|(column, value)| format!("{} = {}", quote_identifier(column), sql_literal(value)))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!(
            "UPDATE {} SET {} WHERE {} = {};",
            self.table,
            assignments,
            quote_identifier(key_column),
            sql_literal(key)
        ))
    }

    fn reinsert_row(&self, row: &RowMap) -> Option<String> {
        if row.is_empty() {
            return None;
        }
        let columns = row
            .keys()
            .map(String::as_str)
            .map(quote_identifier)
            .collect::<Vec<_>>()
            .join(", ");
        let values = row.values().map(sql_literal).collect::<Vec<_>>().join(", ");
        Some(format!(
            "INSERT INTO {} ({columns}) VALUES ({values});",
            self.table
        ))
    }
}

fn plan_insert(insert: &Insert) -> RollbackPlan {
    if insert.ignore || insert.replace_into || insert.on.is_some() {
        return RollbackPlan::Unsupported;
    }
    let Some(first_column) = insert.columns.first() else {
        return RollbackPlan::Unsupported;
    };
    let Some(source) = insert.source.as_deref() else {
        return RollbackPlan::Unsupported;
    };
    let SetExpr::Values(values) = source.body.as_ref() else {
        return RollbackPlan::Unsupported;
    };

    let mut keys = Vec::with_capacity(values.rows.len());
    for row in &values.rows {
        if row.len() != insert.columns.len() {
            return RollbackPlan::Unsupported;
        }
        match row.first() {
            Some(value) if is_literal(value) => keys.push(render_literal(value)),
            _ => return RollbackPlan::Unsupported,
        }
    }
    if keys.is_empty() {
        return RollbackPlan::Unsupported;
    }

    RollbackPlan::Ready(format!(
        "DELETE FROM {} WHERE {} IN ({});",
        insert.table_name,
        first_column,
        keys.join(", ")
    ))
}

fn plan_update(
    table: &TableWithJoins,
    assignments: &[Assignment],
    from: Option<&TableWithJoins>,
    selection: Option<&Expr>,
) -> RollbackPlan {
    if from.is_some() {
        return RollbackPlan::Unsupported;
    }
    let condition = selection.filter(|expr| renders_faithfully(expr));
    let (Some(condition), Some(name)) = (condition, single_table(table)) else {
        return RollbackPlan::Unsupported;
    };
    let assigned_columns = assignments
        .iter()
        .filter_map(|assignment| {
            let rendered = assignment.to_string();
            rendered
                .split_once(" = ")
                .map(|(target, _)| normalize_column(target))
        })
        .collect();

    RollbackPlan::PreImage(PreImagePlan {
        table: name,
        select_sql: format!("SELECT * FROM {} WHERE {condition}", table.relation),
        kind: RollbackKind::RestoreUpdated,
        assigned_columns,
    })
}

fn plan_delete(delete: &Delete) -> RollbackPlan {
    let (FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables)) = &delete.from;
    let unsupported = !delete.tables.is_empty()
        || delete.using.is_some()
        || delete.limit.is_some()
        || !delete.order_by.is_empty()
        || tables.len() != 1;
    if unsupported {
        return RollbackPlan::Unsupported;
    }
    let condition = delete.selection.as_ref().filter(|expr| renders_faithfully(expr));
    let (Some(condition), Some(table)) = (condition, tables.first()) else {
        return RollbackPlan::Unsupported;
    };
    let Some(name) = single_table(table) else {
        return RollbackPlan::Unsupported;
    };

    RollbackPlan::PreImage(PreImagePlan {
        table: name,
        select_sql: format!("SELECT * FROM {} WHERE {condition}", table.relation),
        kind: RollbackKind::ReinsertDeleted,
        assigned_columns: Vec::new(),
    })
}

/// Returns the table name when `table` is one plain table without joins.
fn single_table(table: &TableWithJoins) -> Option<String> {
    if !table.joins.is_empty() {
        return None;
    }
    match &table.relation {
        TableFactor::Table { name, .. } => Some(name.to_string()),
        _ => None,
    }
}

fn is_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Value(
            SqlValue::Number(..)
            | SqlValue::SingleQuotedString(_)
            | SqlValue::DoubleQuotedString(_)
            | SqlValue::Boolean(_)
            | SqlValue::Null,
        ) => true,
        Expr::UnaryOp {
            op: UnaryOperator::Minus | UnaryOperator::Plus,
            expr: operand,
        } => matches!(operand.as_ref(), Expr::Value(SqlValue::Number(..))),
        _ => false,
    }
}

/// Renders a literal accepted by [`is_literal`] in MySQL syntax.
///
/// String literals are re-quoted from their parsed text, since the parser
/// drops backslash escapes that its `Display` output does not restore.
fn render_literal(expr: &Expr) -> String {
    match expr {
        Expr::Value(SqlValue::SingleQuotedString(text) | SqlValue::DoubleQuotedString(text)) => {
            quote_string(text)
        }
        other => other.to_string(),
    }
}

/// Returns whether `expr` prints back to text MySQL reads the same way.
///
/// A backslash in the printed form comes from an unescaped string literal
/// and would be read back as the start of an escape sequence.
fn renders_faithfully(expr: &Expr) -> bool {
    !expr.to_string().contains('\\')
}

/// Reduces a possibly qualified, quoted column reference to its bare
/// lower-case name.
fn normalize_column(raw: &str) -> String {
    let last = raw.rsplit('.').next().unwrap_or(raw);
    last.trim()
        .trim_matches(|ch| matches!(ch, '`' | '"'))
        .to_lowercase()
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn quote_string(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
}

/// Renders a captured JSON value as a MySQL literal.
fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_owned(),
        Value::Bool(true) => "TRUE".to_owned(),
        Value::Bool(false) => "FALSE".to_owned(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => quote_string(text),
        Value::Array(_) | Value::Object(_) => quote_string(&value.to_string()),
    }
}
