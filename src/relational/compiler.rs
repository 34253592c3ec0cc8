/// Clause lists → SQL text.
///
/// Renders the builder's recorded clauses into a single SQL string with `?`
/// placeholders. Bound values are pushed into the parameter list at the
/// moment their placeholder is written, so parameter order always matches
/// placeholder order regardless of the order the builder methods ran in.
use crate::error::{Result, ValidationError};
use crate::value::QueryValue;

use super::builder::QueryBuilder;
use super::types::{Comparison, QueryKind, RelationalQuery, WhereCondition};

/// Render a builder into its finished statement.
pub(crate) fn compile(builder: &QueryBuilder) -> Result<RelationalQuery> {
    let mut parameters = Vec::new();
    let text = match builder.kind {
        QueryKind::Select => compile_select(builder, &mut parameters)?,
        QueryKind::Insert => compile_insert(builder, &mut parameters)?,
        QueryKind::Update => compile_update(builder, &mut parameters)?,
        QueryKind::Delete => compile_delete(builder, &mut parameters)?,
    };
    Ok(RelationalQuery {
        text,
        parameters,
        kind: builder.kind,
        estimated_cost: estimate_cost(builder),
    })
}

fn required_table(builder: &QueryBuilder) -> Result<&str> {
    builder.table.as_deref().ok_or(ValidationError::MissingTable)
}

fn compile_select(builder: &QueryBuilder, params: &mut Vec<QueryValue>) -> Result<String> {
    let table = required_table(builder)?;
    if builder.projection.is_empty() {
        return Err(ValidationError::EmptyProjection);
    }

    let mut parts = Vec::new();

    // SELECT [DISTINCT]
    let mut select_clause = String::from("SELECT ");
    if builder.distinct {
        select_clause.push_str("DISTINCT ");
    }
    select_clause.push_str(&builder.projection.join(", "));
    parts.push(select_clause);

    // FROM
    parts.push(format!("FROM {}", table));

    // JOINs
    for join in &builder.joins {
        parts.push(format!(
            "{} {} ON {}",
            join.kind.as_sql(),
            join.table,
            join.condition
        ));
    }

    // WHERE
    if !builder.wheres.is_empty() {
        parts.push(format!(
            "WHERE {}",
            compile_conditions(&builder.wheres, params)?
        ));
    }

    // GROUP BY
    if !builder.group_by.is_empty() {
        parts.push(format!("GROUP BY {}", builder.group_by.join(", ")));
    }

    // HAVING
    if !builder.having.is_empty() {
        parts.push(format!(
            "HAVING {}",
            compile_conditions(&builder.having, params)?
        ));
    }

    // ORDER BY
    if !builder.order_by.is_empty() {
        let orders: Vec<String> = builder
            .order_by
            .iter()
            .map(|order| format!("{} {}", order.field, order.direction.as_sql()))
            .collect();
        parts.push(format!("ORDER BY {}", orders.join(", ")));
    }

    // LIMIT / OFFSET
    if let Some(limit) = builder.limit {
        parts.push(format!("LIMIT {}", limit));
    }
    if let Some(offset) = builder.offset {
        parts.push(format!("OFFSET {}", offset));
    }

    Ok(parts.join(" "))
}

fn compile_insert(builder: &QueryBuilder, params: &mut Vec<QueryValue>) -> Result<String> {
    let table = required_table(builder)?;
    if builder.assignments.is_empty() {
        return Err(ValidationError::NoAssignments { kind: "INSERT" });
    }

    let columns: Vec<&str> = builder
        .assignments
        .iter()
        .map(|assignment| assignment.column.as_str())
        .collect();
    let placeholders = vec!["?"; builder.assignments.len()].join(", ");
    params.extend(
        builder
            .assignments
            .iter()
            .map(|assignment| assignment.value.clone()),
    );

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    ))
}

fn compile_update(builder: &QueryBuilder, params: &mut Vec<QueryValue>) -> Result<String> {
    let table = required_table(builder)?;
    if builder.assignments.is_empty() {
        return Err(ValidationError::NoAssignments { kind: "UPDATE" });
    }

    // SET binds before WHERE, matching placeholder order in the text.
    let sets: Vec<String> = builder
        .assignments
        .iter()
        .map(|assignment| {
            params.push(assignment.value.clone());
            format!("{} = ?", assignment.column)
        })
        .collect();

    let mut parts = vec![format!("UPDATE {} SET {}", table, sets.join(", "))];
    if !builder.wheres.is_empty() {
        parts.push(format!(
            "WHERE {}",
            compile_conditions(&builder.wheres, params)?
        ));
    }
    Ok(parts.join(" "))
}

fn compile_delete(builder: &QueryBuilder, params: &mut Vec<QueryValue>) -> Result<String> {
    let table = required_table(builder)?;
    let mut parts = vec![format!("DELETE FROM {}", table)];
    if !builder.wheres.is_empty() {
        parts.push(format!(
            "WHERE {}",
            compile_conditions(&builder.wheres, params)?
        ));
    }
    Ok(parts.join(" "))
}

/// Join condition fragments with each condition's stored connector. The
/// connector on conditions[i] sits between fragments i and i + 1, which is
/// what lets `or_where` retarget the junction after the fact.
fn compile_conditions(
    conditions: &[WhereCondition],
    params: &mut Vec<QueryValue>,
) -> Result<String> {
    let mut sql = String::new();
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            sql.push(' ');
            sql.push_str(conditions[i - 1].connector.as_sql());
            sql.push(' ');
        }
        sql.push_str(&compile_condition(condition, params)?);
    }
    Ok(sql)
}

fn compile_condition(condition: &WhereCondition, params: &mut Vec<QueryValue>) -> Result<String> {
    let sql = match condition.comparison {
        Comparison::IsNull | Comparison::IsNotNull => {
            format!("{} {}", condition.field, condition.comparison.as_sql())
        }
        Comparison::In | Comparison::NotIn => {
            let bound = flatten_into(condition.value.as_ref(), params);
            let placeholders = vec!["?"; bound].join(", ");
            format!(
                "{} {} ({})",
                condition.field,
                condition.comparison.as_sql(),
                placeholders
            )
        }
        Comparison::Between => {
            // The fragment always has two placeholders, so anything but two
            // bound values would desynchronize text and parameters.
            let bound = flatten_into(condition.value.as_ref(), params);
            if bound != 2 {
                return Err(ValidationError::BetweenBounds { got: bound });
            }
            format!("{} BETWEEN ? AND ?", condition.field)
        }
        _ => {
            if let Some(value) = &condition.value {
                params.push(value.clone());
            }
            format!("{} {} ?", condition.field, condition.comparison.as_sql())
        }
    };
    Ok(sql)
}

/// Push a multi-valued binding as individual parameters. Returns how many
/// were pushed so IN lists can size their placeholder group.
fn flatten_into(value: Option<&QueryValue>, params: &mut Vec<QueryValue>) -> usize {
    match value {
        Some(QueryValue::List(items)) => {
            params.extend(items.iter().cloned());
            items.len()
        }
        Some(other) => {
            params.push(other.clone());
            1
        }
        None => 0,
    }
}

/// Rough execution cost for a built statement. Starts at 1.0; adds 2.0 per
/// join, 0.5 per WHERE condition and 1.5 per ORDER BY entry; adds 2.0 when
/// grouping; halves when a LIMIT under 100 caps the result set. Rounded to
/// one decimal place.
pub(crate) fn estimate_cost(builder: &QueryBuilder) -> f64 {
    let mut cost = 1.0;
    cost += 2.0 * builder.joins.len() as f64;
    cost += 0.5 * builder.wheres.len() as f64;
    cost += 1.5 * builder.order_by.len() as f64;
    if !builder.group_by.is_empty() {
        cost += 2.0;
    }
    if matches!(builder.limit, Some(limit) if limit < 100) {
        cost *= 0.5;
    }
    (cost * 10.0).round() / 10.0
}
