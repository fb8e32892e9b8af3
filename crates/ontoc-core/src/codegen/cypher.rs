//! Cypher generation rules, one per statement variant.

use super::expr::{render_expr, time_window_expr};
use crate::ast::{
    AggregateFunction, AggregateStatement, ComputeStatement, EnrichStatement, LoadStatement,
    NormalizeStatement, Program, Statement, UnitConvertStatement, ValidateStatement,
};

/// Generates Cypher query text for an entire program.
///
/// Blocks are emitted in statement order and joined with a blank line.
/// Generation is total: any parsed program produces output, never an error.
#[must_use]
pub fn generate(program: &Program) -> String {
    generate_blocks(program).join("\n\n")
}

/// Generates one self-contained Cypher block per statement, in order.
#[must_use]
pub fn generate_blocks(program: &Program) -> Vec<String> {
    program.statements.iter().map(generate_statement).collect()
}

/// Generates the Cypher block for a single statement.
fn generate_statement(stmt: &Statement) -> String {
    match stmt {
        Statement::Load(s) => generate_load(s),
        Statement::Normalize(s) => generate_normalize(s),
        Statement::Aggregate(s) => generate_aggregate(s),
        Statement::UnitConvert(s) => generate_unit_convert(s),
        Statement::Enrich(s) => generate_enrich(s),
        Statement::Compute(s) => generate_compute(s),
        Statement::Validate(s) => generate_validate(s),
    }
}

/// Returns true if the column map follows the factory naming convention:
/// a `factory` source column or a `factory_id` target field marks rows
/// that belong to a physical site and get linked to a factory entity.
fn follows_factory_convention(stmt: &LoadStatement) -> bool {
    stmt.column_map.contains_key("factory")
        || stmt.column_map.values().any(|dst| dst.as_str() == "factory_id")
}

/// `LOAD_CSV`: load clause, optional factory entity, node construction
/// from the column map, optional linking relationship.
fn generate_load(stmt: &LoadStatement) -> String {
    let mut lines = vec![format!("// LOAD_CSV: {} AS {}", stmt.path, stmt.node_label)];
    lines.push(format!(
        "LOAD CSV WITH HEADERS FROM \"file:///{}\" AS row",
        stmt.path
    ));
    lines.push(String::from("WITH row"));

    let links_factory = follows_factory_convention(stmt);
    if links_factory {
        lines.push(String::from("MERGE (f:factory { id: row.factory })"));
    }

    let fields: Vec<String> = stmt
        .column_map
        .iter()
        .map(|(src, dst)| format!("  {dst}: row.{src}"))
        .collect();
    lines.push(format!("CREATE (m:{} {{", stmt.node_label));
    lines.push(fields.join(",\n"));
    lines.push(String::from("})"));

    if links_factory {
        lines.push(String::from("MERGE (m)-[:AT_FACTORY]->(f);"));
    } else {
        lines.push(String::from(";"));
    }

    lines.join("\n")
}

/// `NORMALIZE`: one independent match-filter-assign block per
/// (property, old value) pair, in declaration order.
fn generate_normalize(stmt: &NormalizeStatement) -> String {
    let mut lines = vec![format!("// NORMALIZE: {}", stmt.node_label)];

    for (property, mappings) in stmt.normalizations.iter() {
        for (old_value, new_value) in mappings.iter() {
            lines.push(format!("MATCH (n:{})", stmt.node_label));
            lines.push(format!("WHERE n.{property} = '{old_value}'"));
            lines.push(format!("SET n.{property} = '{new_value}';"));
            lines.push(String::new());
        }
    }

    lines.join("\n").trim_end().to_string()
}

/// `AGGREGATE`: grouped projection over the group-by keys (plus the time
/// window as an implicit extra key), one projection term per aggregation
/// clause, node construction, and the factory link when the grouping keys
/// follow the naming convention.
fn generate_aggregate(stmt: &AggregateStatement) -> String {
    let mut lines = vec![format!(
        "// AGGREGATE: {} -> {}",
        stmt.source_label, stmt.target_label
    )];
    lines.push(format!("MATCH (m:{})", stmt.source_label));

    let mut with_parts: Vec<String> = stmt
        .group_by
        .iter()
        .map(|field| format!("  m.{field} AS {field}"))
        .collect();

    if let Some(tw) = &stmt.time_window {
        let truncation = time_window_expr(&tw.mode, &format!("m.{}", tw.source_field));
        with_parts.push(format!("  {truncation} AS {}", tw.target_field));
    }

    for agg in &stmt.aggregations {
        let field = agg.field.as_deref().unwrap_or_default();
        match agg.function {
            AggregateFunction::Sum => {
                with_parts.push(format!("  SUM(m.{field}) AS {}", agg.alias));
            }
            AggregateFunction::Count => {
                if agg.field.is_some() {
                    with_parts.push(format!("  COUNT(m.{field}) AS {}", agg.alias));
                } else {
                    with_parts.push(format!("  COUNT(*) AS {}", agg.alias));
                }
            }
            AggregateFunction::First => {
                // Stable pick-the-earliest policy
                with_parts.push(format!("  COLLECT(m.{field})[0] AS {}", agg.alias));
            }
        }
    }

    lines.push(String::from("WITH"));
    lines.push(with_parts.join(",\n"));

    let mut create_fields: Vec<String> = stmt
        .group_by
        .iter()
        .map(|field| format!("  {field}: {field}"))
        .collect();
    for agg in &stmt.aggregations {
        create_fields.push(format!("  {}: {}", agg.alias, agg.alias));
    }
    if let Some(tw) = &stmt.time_window {
        create_fields.push(format!("  {}: {}", tw.target_field, tw.target_field));
    }

    lines.push(format!("CREATE (a:{} {{", stmt.target_label));
    lines.push(create_fields.join(",\n"));
    lines.push(String::from("})"));

    // Same naming convention as LOAD_CSV, keyed on the group-by list
    if stmt.group_by.iter().any(|field| field == "factory_id") {
        lines.push(String::from("WITH a"));
        lines.push(String::from("MATCH (f:factory { id: a.factory_id })"));
        lines.push(String::from("MERGE (a)-[:AT_FACTORY]->(f);"));
    } else {
        lines.push(String::from(";"));
    }

    lines.join("\n")
}

/// `UNIT_CONVERT`: structural skeleton only. The conversion table is never
/// loaded; placeholder comments mark where factor lookup and value scaling
/// would go.
fn generate_unit_convert(stmt: &UnitConvertStatement) -> String {
    let mut lines = vec![format!(
        "// UNIT_CONVERT: {}.{} FROM {} TO {}",
        stmt.node_label, stmt.field, stmt.from_unit, stmt.to_unit
    )];
    lines.push(format!(
        "// Note: Load conversion factors from {}",
        stmt.conversion_table
    ));
    lines.push(String::from(
        "// This is a placeholder - actual implementation requires loading the conversion table",
    ));
    lines.push(format!("MATCH (n:{})", stmt.node_label));
    lines.push(format!("WHERE n.unit = '{}'", stmt.from_unit));
    lines.push(String::from("// MERGE with conversion factor table here"));
    lines.push(format!(
        "// SET n.{} = n.{} * conversion_factor",
        stmt.field, stmt.field
    ));
    lines.push(format!("SET n.unit = '{}';", stmt.to_unit));

    lines.join("\n")
}

/// `ENRICH`: join condition on the match key, node construction from
/// generated expressions, fixed linking relationship back to the source.
fn generate_enrich(stmt: &EnrichStatement) -> String {
    let mut lines = vec![format!(
        "// ENRICH: {} WITH {}",
        stmt.source_label, stmt.factor_table
    )];
    lines.push(format!(
        "MATCH (a:{}), (ef:{})",
        stmt.source_label, stmt.factor_table
    ));
    lines.push(format!(
        "WHERE a.{} = ef.{}",
        stmt.match_key, stmt.match_key
    ));

    let fields: Vec<String> = stmt
        .output_fields
        .iter()
        .map(|(name, expr)| format!("  {name}: {}", render_expr(expr, None)))
        .collect();
    lines.push(format!("CREATE (e:{} {{", stmt.target_label));
    lines.push(fields.join(",\n"));
    lines.push(String::from("})"));
    lines.push(String::from("MERGE (e)-[:FROM_ACTIVITY]->(a);"));

    lines.join("\n")
}

/// `COMPUTE`: grouped projection plus the evaluated expression, then a
/// merge keyed on the first group-by field only.
fn generate_compute(stmt: &ComputeStatement) -> String {
    let mut lines = vec![format!(
        "// COMPUTE: {} FOR {}",
        stmt.field_name, stmt.source_label
    )];
    lines.push(format!("MATCH (e:{})", stmt.source_label));

    let group_by: Vec<String> = stmt
        .group_by
        .iter()
        .map(|field| format!("e.{field}"))
        .collect();
    lines.push(format!(
        "WITH {}, {} AS {}",
        group_by.join(", "),
        render_expr(&stmt.expression, Some("e")),
        stmt.field_name
    ));

    // The merge key is the first group-by field, even when several are
    // declared
    let merge_key = stmt
        .group_by
        .first()
        .map(String::as_str)
        .unwrap_or_default();
    lines.push(format!(
        "MERGE (g:{} {{ {merge_key}: e.{merge_key} }})",
        stmt.target_label
    ));
    lines.push(format!("SET g.{} = {};", stmt.field_name, stmt.field_name));

    lines.join("\n")
}

/// `VALIDATE`: structural skeleton only. The rule name is embedded as a
/// comment and never evaluated.
fn generate_validate(stmt: &ValidateStatement) -> String {
    let mut lines = vec![format!(
        "// VALIDATE: {} WITH {}",
        stmt.node_label, stmt.rule_name
    )];
    lines.push(format!("// Validation rule: {}", stmt.rule_name));
    lines.push(format!("MATCH (n:{})", stmt.node_label));
    lines.push(format!(
        "// Add validation logic based on rule: {}",
        stmt.rule_name
    ));
    lines.push(String::from("RETURN n;"));

    lines.join("\n")
}
