//! Fluent construction of parameterized SQL statements.

use crate::error::{Result, ValidationError};
use crate::value::QueryValue;

use super::compiler;
use super::types::{
    Assignment, Comparison, Connector, JoinClause, JoinKind, OrderByClause, QueryKind,
    RelationalQuery, SortDirection, WhereCondition,
};

/// Chainable builder for SELECT, INSERT, UPDATE and DELETE statements.
///
/// Every method takes the builder by value and returns it, so calls chain
/// freely. Methods that can reject their input return `Result<Self>` and
/// slot into a chain with `?`. The builder is `Clone`, which makes it cheap
/// to keep a base query around and branch variants off it.
///
/// Values are never spliced into the statement text. Each bound value
/// becomes a `?` placeholder, and [`build`](QueryBuilder::build) returns the
/// parameters in placeholder order.
///
/// # Example
///
/// ```
/// use queryforge::{Comparison, QueryBuilder};
///
/// let query = QueryBuilder::new()
///     .select(["id", "name"])
///     .from("users")?
///     .where_("age", Comparison::Gt, 18)
///     .order_by_desc("created_at")
///     .limit(20)?
///     .build()?;
///
/// assert_eq!(
///     query.text,
///     "SELECT id, name FROM users WHERE age > ? ORDER BY created_at DESC LIMIT 20"
/// );
/// assert_eq!(query.parameters.len(), 1);
/// # Ok::<(), queryforge::ValidationError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) kind: QueryKind,
    pub(crate) table: Option<String>,
    pub(crate) distinct: bool,
    pub(crate) projection: Vec<String>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<WhereCondition>,
    pub(crate) group_by: Vec<String>,
    pub(crate) having: Vec<WhereCondition>,
    pub(crate) order_by: Vec<OrderByClause>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) assignments: Vec<Assignment>,
}

impl QueryBuilder {
    /// Starts an empty SELECT builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends columns to the projection. Passing `"*"` alone resets the
    /// projection to a bare star.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.len() == 1 && fields[0] == "*" {
            self.projection = fields;
        } else {
            self.projection.extend(fields);
        }
        self
    }

    /// Deduplicates result rows with `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Names the table to read from.
    pub fn from(mut self, table: impl Into<String>) -> Result<Self> {
        self.table = Some(checked_identifier(table, "table name")?);
        Ok(self)
    }

    /// Adds an `INNER JOIN` with a raw `ON` condition.
    pub fn join(self, table: impl Into<String>, condition: impl Into<String>) -> Result<Self> {
        self.add_join(table, condition, JoinKind::Inner)
    }

    /// Alias for [`join`](QueryBuilder::join).
    pub fn inner_join(
        self,
        table: impl Into<String>,
        condition: impl Into<String>,
    ) -> Result<Self> {
        self.add_join(table, condition, JoinKind::Inner)
    }

    /// Adds a `LEFT JOIN`.
    pub fn left_join(
        self,
        table: impl Into<String>,
        condition: impl Into<String>,
    ) -> Result<Self> {
        self.add_join(table, condition, JoinKind::Left)
    }

    /// Adds a `RIGHT JOIN`.
    pub fn right_join(
        self,
        table: impl Into<String>,
        condition: impl Into<String>,
    ) -> Result<Self> {
        self.add_join(table, condition, JoinKind::Right)
    }

    /// Adds a `FULL OUTER JOIN`.
    pub fn full_outer_join(
        self,
        table: impl Into<String>,
        condition: impl Into<String>,
    ) -> Result<Self> {
        self.add_join(table, condition, JoinKind::FullOuter)
    }

    /// Adds a condition, AND-joined to whatever precedes it.
    ///
    /// The multi-value comparisons (`In`, `NotIn`, `Between`) expect a list
    /// value; prefer [`where_in`](QueryBuilder::where_in),
    /// [`where_not_in`](QueryBuilder::where_not_in) and
    /// [`where_between`](QueryBuilder::where_between), which shape the list
    /// for you. A `Between` condition whose value is not a two-element list
    /// fails at [`build`](QueryBuilder::build).
    pub fn where_(
        self,
        field: impl Into<String>,
        comparison: Comparison,
        value: impl Into<QueryValue>,
    ) -> Self {
        let value = if comparison.takes_value() {
            Some(value.into())
        } else {
            None
        };
        self.push_where(field, comparison, value)
    }

    /// Shorthand for an equality condition.
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.where_(field, Comparison::Eq, value)
    }

    /// Adds a condition OR-joined to the previous one. The OR binds to the
    /// condition added immediately before this call; on an empty condition
    /// list it behaves exactly like [`where_`](QueryBuilder::where_).
    pub fn or_where(
        mut self,
        field: impl Into<String>,
        comparison: Comparison,
        value: impl Into<QueryValue>,
    ) -> Self {
        if let Some(last) = self.wheres.last_mut() {
            last.connector = Connector::Or;
        }
        self.where_(field, comparison, value)
    }

    /// Shorthand for an OR-joined equality condition.
    pub fn or_where_eq(self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.or_where(field, Comparison::Eq, value)
    }

    /// Adds `field IN (...)` with one placeholder per value.
    pub fn where_in<I, T>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push_where(field, Comparison::In, Some(QueryValue::List(values)))
    }

    /// Adds `field NOT IN (...)` with one placeholder per value.
    pub fn where_not_in<I, T>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push_where(field, Comparison::NotIn, Some(QueryValue::List(values)))
    }

    /// Adds `field BETWEEN ? AND ?` binding the two bounds in order.
    pub fn where_between(
        self,
        field: impl Into<String>,
        min: impl Into<QueryValue>,
        max: impl Into<QueryValue>,
    ) -> Self {
        let bounds = QueryValue::List(vec![min.into(), max.into()]);
        self.push_where(field, Comparison::Between, Some(bounds))
    }

    /// Adds `field IS NULL`. Binds nothing.
    pub fn where_null(self, field: impl Into<String>) -> Self {
        self.push_where(field, Comparison::IsNull, None)
    }

    /// Adds `field IS NOT NULL`. Binds nothing.
    pub fn where_not_null(self, field: impl Into<String>) -> Self {
        self.push_where(field, Comparison::IsNotNull, None)
    }

    /// Appends columns to the `GROUP BY` list.
    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Adds a `HAVING` condition, AND-joined to whatever precedes it.
    pub fn having(
        mut self,
        field: impl Into<String>,
        comparison: Comparison,
        value: impl Into<QueryValue>,
    ) -> Self {
        let value = if comparison.takes_value() {
            Some(value.into())
        } else {
            None
        };
        self.having.push(WhereCondition {
            field: field.into(),
            comparison,
            value,
            connector: Connector::And,
        });
        self
    }

    /// Appends an `ORDER BY` entry.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderByClause {
            field: field.into(),
            direction,
        });
        self
    }

    /// Shorthand for an ascending `ORDER BY` entry.
    pub fn order_by_asc(self, field: impl Into<String>) -> Self {
        self.order_by(field, SortDirection::Asc)
    }

    /// Shorthand for a descending `ORDER BY` entry.
    pub fn order_by_desc(self, field: impl Into<String>) -> Self {
        self.order_by(field, SortDirection::Desc)
    }

    /// Caps the number of returned rows.
    pub fn limit(mut self, count: i64) -> Result<Self> {
        if count < 0 {
            return Err(ValidationError::NegativeBound {
                what: "LIMIT",
                value: count,
            });
        }
        self.limit = Some(count);
        Ok(self)
    }

    /// Skips rows before the first returned one.
    pub fn offset(mut self, count: i64) -> Result<Self> {
        if count < 0 {
            return Err(ValidationError::NegativeBound {
                what: "OFFSET",
                value: count,
            });
        }
        self.offset = Some(count);
        Ok(self)
    }

    /// Switches the builder to an INSERT targeting `table`.
    pub fn insert_into(mut self, table: impl Into<String>) -> Result<Self> {
        self.kind = QueryKind::Insert;
        self.table = Some(checked_identifier(table, "table name")?);
        Ok(self)
    }

    /// Switches the builder to an UPDATE targeting `table`.
    pub fn update(mut self, table: impl Into<String>) -> Result<Self> {
        self.kind = QueryKind::Update;
        self.table = Some(checked_identifier(table, "table name")?);
        Ok(self)
    }

    /// Switches the builder to a DELETE targeting `table`.
    pub fn delete_from(mut self, table: impl Into<String>) -> Result<Self> {
        self.kind = QueryKind::Delete;
        self.table = Some(checked_identifier(table, "table name")?);
        Ok(self)
    }

    /// Records a column/value pair for INSERT or UPDATE.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.assignments.push(Assignment {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Renders the statement. Returns the SQL text, the bound parameters in
    /// placeholder order, the statement kind and a cost estimate.
    pub fn build(self) -> Result<RelationalQuery> {
        let query = compiler::compile(&self)?;
        tracing::debug!(
            kind = query.kind.as_sql(),
            table = self.table.as_deref().unwrap_or(""),
            parameters = query.parameters.len(),
            cost = query.estimated_cost,
            "built relational query"
        );
        Ok(query)
    }

    fn add_join(
        mut self,
        table: impl Into<String>,
        condition: impl Into<String>,
        kind: JoinKind,
    ) -> Result<Self> {
        self.joins.push(JoinClause {
            table: checked_identifier(table, "join table")?,
            condition: checked_identifier(condition, "join condition")?,
            kind,
        });
        Ok(self)
    }

    fn push_where(
        mut self,
        field: impl Into<String>,
        comparison: Comparison,
        value: Option<QueryValue>,
    ) -> Self {
        self.wheres.push(WhereCondition {
            field: field.into(),
            comparison,
            value,
            connector: Connector::And,
        });
        self
    }
}

fn checked_identifier(raw: impl Into<String>, what: &'static str) -> Result<String> {
    let raw = raw.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyIdentifier { what });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_renders_projection_and_table() {
        let query = QueryBuilder::new()
            .select(["id", "name"])
            .from("users")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT id, name FROM users");
        assert_eq!(query.kind, QueryKind::Select);
        assert!(query.parameters.is_empty());
    }

    #[test]
    fn test_select_star_resets_projection() {
        let query = QueryBuilder::new()
            .select(["id"])
            .select(["*"])
            .from("users")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM users");
    }

    #[test]
    fn test_select_star_among_fields_appends() {
        let query = QueryBuilder::new()
            .select(["id", "*"])
            .from("users")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT id, * FROM users");
    }

    #[test]
    fn test_distinct_renders_after_select() {
        let query = QueryBuilder::new()
            .select(["country"])
            .distinct()
            .from("users")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT DISTINCT country FROM users");
    }

    #[test]
    fn test_parameters_follow_placeholder_order() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_("age", Comparison::Gt, 18)
            .where_eq("name", "John")
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM users WHERE age > ? AND name = ?");
        assert_eq!(
            query.parameters,
            vec![QueryValue::Integer(18), QueryValue::String("John".into())]
        );
        assert_eq!(query.placeholder_count(), query.parameters.len());
    }

    #[test]
    fn test_or_where_flips_previous_connector() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_eq("role", "admin")
            .or_where_eq("role", "owner")
            .where_("active", Comparison::Eq, true)
            .build()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM users WHERE role = ? OR role = ? AND active = ?"
        );
    }

    #[test]
    fn test_or_where_on_empty_list_acts_like_where() {
        let with_or = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .or_where_eq("id", 1)
            .build()
            .unwrap();
        let with_and = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_eq("id", 1)
            .build()
            .unwrap();
        assert_eq!(with_or.text, with_and.text);
    }

    #[test]
    fn test_where_in_expands_placeholders() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_in("id", [1, 2, 3])
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM users WHERE id IN (?, ?, ?)");
        assert_eq!(
            query.parameters,
            vec![
                QueryValue::Integer(1),
                QueryValue::Integer(2),
                QueryValue::Integer(3)
            ]
        );
    }

    #[test]
    fn test_where_in_empty_list_renders_empty_parens() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_in("id", Vec::<i64>::new())
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM users WHERE id IN ()");
        assert!(query.parameters.is_empty());
    }

    #[test]
    fn test_where_not_in_renders_not_in() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_not_in("status", ["banned", "deleted"])
            .build()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM users WHERE status NOT IN (?, ?)"
        );
        assert_eq!(query.parameters.len(), 2);
    }

    #[test]
    fn test_where_between_binds_bounds_in_order() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("orders")
            .unwrap()
            .where_between("total", 10, 100)
            .build()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM orders WHERE total BETWEEN ? AND ?"
        );
        assert_eq!(
            query.parameters,
            vec![QueryValue::Integer(10), QueryValue::Integer(100)]
        );
    }

    #[test]
    fn test_between_through_where_requires_two_values() {
        let err = QueryBuilder::new()
            .select(["*"])
            .from("orders")
            .unwrap()
            .where_("total", Comparison::Between, 5)
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::BetweenBounds { got: 1 });

        let query = QueryBuilder::new()
            .select(["*"])
            .from("orders")
            .unwrap()
            .where_("total", Comparison::Between, vec![10, 100])
            .build()
            .unwrap();
        assert_eq!(query.placeholder_count(), query.parameters.len());
    }

    #[test]
    fn test_null_tests_bind_nothing() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_null("deleted_at")
            .where_not_null("email")
            .build()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM users WHERE deleted_at IS NULL AND email IS NOT NULL"
        );
        assert!(query.parameters.is_empty());
    }

    #[test]
    fn test_like_binds_pattern() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .where_("name", Comparison::Like, "%John%")
            .build()
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM users WHERE name LIKE ?");
        assert_eq!(
            query.parameters,
            vec![QueryValue::String("%John%".into())]
        );
    }

    #[test]
    fn test_full_select_clause_order() {
        let query = QueryBuilder::new()
            .select(["u.id", "COUNT(o.id)"])
            .from("users u")
            .unwrap()
            .left_join("orders o", "o.user_id = u.id")
            .unwrap()
            .where_("u.active", Comparison::Eq, true)
            .group_by(["u.id"])
            .having("COUNT(o.id)", Comparison::Gt, 5)
            .order_by_desc("u.id")
            .limit(10)
            .unwrap()
            .offset(20)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT u.id, COUNT(o.id) FROM users u \
             LEFT JOIN orders o ON o.user_id = u.id \
             WHERE u.active = ? \
             GROUP BY u.id \
             HAVING COUNT(o.id) > ? \
             ORDER BY u.id DESC \
             LIMIT 10 OFFSET 20"
        );
        assert_eq!(query.parameters.len(), 2);
    }

    #[test]
    fn test_join_kinds_render_keywords() {
        let query = QueryBuilder::new()
            .select(["*"])
            .from("a")
            .unwrap()
            .inner_join("b", "b.a_id = a.id")
            .unwrap()
            .right_join("c", "c.a_id = a.id")
            .unwrap()
            .full_outer_join("d", "d.a_id = a.id")
            .unwrap()
            .build()
            .unwrap();
        assert!(query.text.contains("INNER JOIN b ON b.a_id = a.id"));
        assert!(query.text.contains("RIGHT JOIN c ON c.a_id = a.id"));
        assert!(query.text.contains("FULL OUTER JOIN d ON d.a_id = a.id"));
    }

    #[test]
    fn test_build_without_table_fails() {
        let err = QueryBuilder::new().select(["*"]).build().unwrap_err();
        assert_eq!(err, ValidationError::MissingTable);
    }

    #[test]
    fn test_build_without_projection_fails() {
        let err = QueryBuilder::new()
            .from("users")
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyProjection);
    }

    #[test]
    fn test_blank_table_name_rejected() {
        let err = QueryBuilder::new().from("   ").unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyIdentifier { what: "table name" }
        );
    }

    #[test]
    fn test_blank_join_condition_rejected() {
        let err = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .join("orders", "")
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyIdentifier {
                what: "join condition"
            }
        );
    }

    #[test]
    fn test_negative_limit_rejected() {
        let err = QueryBuilder::new().limit(-1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeBound {
                what: "LIMIT",
                value: -1
            }
        );
    }

    #[test]
    fn test_negative_offset_rejected() {
        let err = QueryBuilder::new().offset(-5).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeBound {
                what: "OFFSET",
                value: -5
            }
        );
    }

    #[test]
    fn test_insert_renders_columns_and_values() {
        let query = QueryBuilder::new()
            .insert_into("users")
            .unwrap()
            .set("name", "Ada")
            .set("age", 36)
            .build()
            .unwrap();
        assert_eq!(query.text, "INSERT INTO users (name, age) VALUES (?, ?)");
        assert_eq!(query.kind, QueryKind::Insert);
        assert_eq!(
            query.parameters,
            vec![QueryValue::String("Ada".into()), QueryValue::Integer(36)]
        );
    }

    #[test]
    fn test_insert_without_assignments_fails() {
        let err = QueryBuilder::new()
            .insert_into("users")
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::NoAssignments { kind: "INSERT" });
    }

    #[test]
    fn test_update_binds_set_params_before_where_params() {
        let query = QueryBuilder::new()
            .update("users")
            .unwrap()
            .set("name", "Ada")
            .set("active", false)
            .where_eq("id", 7)
            .build()
            .unwrap();
        assert_eq!(
            query.text,
            "UPDATE users SET name = ?, active = ? WHERE id = ?"
        );
        assert_eq!(
            query.parameters,
            vec![
                QueryValue::String("Ada".into()),
                QueryValue::Bool(false),
                QueryValue::Integer(7)
            ]
        );
    }

    #[test]
    fn test_update_without_assignments_fails() {
        let err = QueryBuilder::new()
            .update("users")
            .unwrap()
            .where_eq("id", 7)
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::NoAssignments { kind: "UPDATE" });
    }

    #[test]
    fn test_delete_with_and_without_conditions() {
        let bare = QueryBuilder::new()
            .delete_from("sessions")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(bare.text, "DELETE FROM sessions");
        assert_eq!(bare.kind, QueryKind::Delete);

        let scoped = QueryBuilder::new()
            .delete_from("sessions")
            .unwrap()
            .where_("expires_at", Comparison::Lt, 1700000000)
            .build()
            .unwrap();
        assert_eq!(scoped.text, "DELETE FROM sessions WHERE expires_at < ?");
    }

    #[test]
    fn test_clone_branches_independently() {
        let base = QueryBuilder::new()
            .select(["*"])
            .from("events")
            .unwrap()
            .where_eq("tenant", "acme");

        let recent = base.clone().order_by_desc("at").build().unwrap();
        let errors = base.where_eq("level", "error").build().unwrap();

        assert_eq!(
            recent.text,
            "SELECT * FROM events WHERE tenant = ? ORDER BY at DESC"
        );
        assert_eq!(
            errors.text,
            "SELECT * FROM events WHERE tenant = ? AND level = ?"
        );
    }

    #[test]
    fn test_cost_grows_with_joins_and_sorts() {
        let plain = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .build()
            .unwrap();
        let heavy = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .join("orders", "orders.user_id = users.id")
            .unwrap()
            .join("items", "items.order_id = orders.id")
            .unwrap()
            .order_by_asc("users.id")
            .build()
            .unwrap();
        assert_eq!(plain.estimated_cost, 1.0);
        assert_eq!(heavy.estimated_cost, 6.5);
    }

    #[test]
    fn test_small_limit_halves_cost() {
        let capped = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .join("orders", "orders.user_id = users.id")
            .unwrap()
            .limit(10)
            .unwrap()
            .build()
            .unwrap();
        let uncapped = QueryBuilder::new()
            .select(["*"])
            .from("users")
            .unwrap()
            .join("orders", "orders.user_id = users.id")
            .unwrap()
            .limit(500)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(capped.estimated_cost, 1.5);
        assert_eq!(uncapped.estimated_cost, 3.0);
    }
}
