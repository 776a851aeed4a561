//! Query builder: filter parameters to parameterized SQL fragments.
//!
//! Fields arrive in parameter naming and are mapped to columns through the
//! entity descriptor. Every value is bound; only validated identifiers and
//! integers are written into the SQL text.

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::{FilterField, FilterValue, PaginationParam, QueryOption, SortField};
use taskhub_entity::lifecycle::STATUS_ACTIVE;
use taskhub_entity::record::EntityDescriptor;

use crate::dialect::Dialect;

/// Fragments for a filtered select and its matching count.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// `WHERE ... GROUP BY ... ORDER BY ... LIMIT ... OFFSET ...`, each part
    /// present only when needed, with a leading space.
    pub query_ext: String,
    /// Arguments for `query_ext`.
    pub query_args: Vec<FilterValue>,
    /// The `WHERE` clause alone, for `SELECT COUNT(*)`.
    pub count_ext: String,
    /// Arguments for `count_ext`.
    pub count_args: Vec<FilterValue>,
}

/// Fragment for a partial update: ` SET ... WHERE ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltUpdate {
    pub set_ext: String,
    pub args: Vec<FilterValue>,
}

/// Column list and placeholders for an insert.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltInsert {
    /// `(a, b, c) VALUES (?, ?, ?)`.
    pub values_ext: String,
    pub args: Vec<FilterValue>,
}

/// Builds SQL fragments for one entity.
#[derive(Debug, Clone, Copy)]
pub struct SqlQueryBuilder<'a> {
    dialect: Dialect,
    descriptor: &'a EntityDescriptor,
    option: QueryOption,
}

/// Tracks bound arguments and hands out matching placeholders.
struct Binder {
    dialect: Dialect,
    args: Vec<FilterValue>,
}

impl Binder {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            args: Vec::new(),
        }
    }

    fn bind(&mut self, value: FilterValue) -> String {
        self.args.push(value);
        self.dialect.placeholder(self.args.len())
    }

    fn bind_list(&mut self, values: &[i64]) -> String {
        values
            .iter()
            .map(|v| self.bind(FilterValue::Integer(*v)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> SqlQueryBuilder<'a> {
    /// Creates a builder for `descriptor`'s table.
    pub fn new(dialect: Dialect, descriptor: &'a EntityDescriptor, option: &QueryOption) -> Self {
        Self {
            dialect,
            descriptor,
            option: *option,
        }
    }

    /// Builds the select and count fragments for a filter.
    pub fn build(&self, fields: &[FilterField], pagination: &PaginationParam) -> AppResult<BuiltQuery> {
        let mut binder = Binder::new(self.dialect);
        let where_clause = self.where_clause(fields, &mut binder)?;
        let query_args = binder.args;

        let count_ext = where_clause.clone();
        let count_args = query_args.clone();

        let mut query_ext = where_clause;

        if !pagination.group_by.is_empty() {
            let columns = pagination
                .group_by
                .iter()
                .map(|name| self.column(name, "group by"))
                .collect::<AppResult<Vec<_>>>()?;
            query_ext.push_str(&format!(" GROUP BY {}", columns.join(", ")));
        }

        if !pagination.sort_by.is_empty() {
            let orders = pagination
                .sort_by
                .iter()
                .map(|descriptor| {
                    let sort = SortField::parse(descriptor).ok_or_else(|| {
                        AppError::query_build(format!("Malformed sort descriptor '{descriptor}'"))
                    })?;
                    let column = self.column(&sort.field, "sort by")?;
                    Ok(format!("{column} {}", sort.direction.as_sql()))
                })
                .collect::<AppResult<Vec<_>>>()?;
            query_ext.push_str(&format!(" ORDER BY {}", orders.join(", ")));
        }

        if !pagination.disable_limit {
            let offset = pagination.offset().ok_or_else(|| {
                AppError::query_build(format!("Page {} is out of range", pagination.page))
            })?;
            query_ext.push_str(&format!(
                " LIMIT {} OFFSET {offset}",
                pagination.effective_limit()
            ));
        }

        Ok(BuiltQuery {
            query_ext,
            query_args,
            count_ext,
            count_args,
        })
    }

    /// Builds ` SET ... WHERE ...` from the present update fields and the
    /// select filter.
    ///
    /// An empty `SET` or an empty `WHERE` is rejected as a bad request: the
    /// first would be a syntax error, the second would touch every row.
    pub fn build_update(&self, update: &[FilterField], select: &[FilterField]) -> AppResult<BuiltUpdate> {
        if update.is_empty() {
            return Err(AppError::bad_request(format!(
                "Update of {} has no fields to set",
                self.descriptor.name
            )));
        }

        let mut binder = Binder::new(self.dialect);
        let mut assignments = Vec::with_capacity(update.len());
        for field in update {
            let column = self.field_column(field.field)?;
            if let FilterValue::IntegerList(_) = field.value {
                return Err(AppError::query_build(format!(
                    "Cannot assign a list to column '{column}'"
                )));
            }
            let placeholder = binder.bind(field.value.clone());
            assignments.push(format!("{column} = {placeholder}"));
        }

        let where_clause = self.where_clause(select, &mut binder)?;
        if where_clause.is_empty() {
            return Err(AppError::bad_request(format!(
                "Update of {} has no selection",
                self.descriptor.name
            )));
        }

        Ok(BuiltUpdate {
            set_ext: format!(" SET {}{where_clause}", assignments.join(", ")),
            args: binder.args,
        })
    }

    /// Builds the column list and placeholders of an insert.
    pub fn build_insert(&self, fields: &[FilterField]) -> AppResult<BuiltInsert> {
        if fields.is_empty() {
            return Err(AppError::query_build(format!(
                "Insert into {} has no columns",
                self.descriptor.table
            )));
        }

        let mut binder = Binder::new(self.dialect);
        let mut columns = Vec::with_capacity(fields.len());
        let mut placeholders = Vec::with_capacity(fields.len());
        for field in fields {
            columns.push(self.field_column(field.field)?);
            placeholders.push(binder.bind(field.value.clone()));
        }

        Ok(BuiltInsert {
            values_ext: format!(
                "({}) VALUES ({})",
                columns.join(", "),
                placeholders.join(", ")
            ),
            args: binder.args,
        })
    }

    fn where_clause(&self, fields: &[FilterField], binder: &mut Binder) -> AppResult<String> {
        let mut conditions = Vec::with_capacity(fields.len() + 1);

        for field in fields {
            let column = self.field_column(field.field)?;
            let condition = match &field.value {
                FilterValue::IntegerList(values) if values.is_empty() => {
                    return Err(AppError::query_build(format!(
                        "Empty list for field '{}'",
                        field.field
                    )));
                }
                FilterValue::IntegerList(values) => {
                    format!("{column} IN ({})", binder.bind_list(values))
                }
                value => format!("{column} = {}", binder.bind(value.clone())),
            };
            conditions.push(condition);
        }

        if self.option.is_active {
            let placeholder = binder.bind(FilterValue::Integer(STATUS_ACTIVE));
            conditions.push(format!("status = {placeholder}"));
        }

        if conditions.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WHERE {}", conditions.join(" AND ")))
        }
    }

    fn field_column(&self, field: &str) -> AppResult<&'static str> {
        self.descriptor.column_for(field).ok_or_else(|| {
            AppError::query_build(format!(
                "Unknown field '{field}' for {}",
                self.descriptor.name
            ))
        })
    }

    fn column(&self, name: &str, clause: &str) -> AppResult<&'static str> {
        self.descriptor.resolve(name).ok_or_else(|| {
            AppError::query_build(format!(
                "Cannot {clause} unknown column '{name}' of {}",
                self.descriptor.name
            ))
        })
    }
}
