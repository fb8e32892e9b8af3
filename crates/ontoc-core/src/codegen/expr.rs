//! Expression rendering and identifier-alias resolution.

use crate::ast::{ConcatPart, Expr};

/// Resolves an identifier against the fixed alias table.
///
/// Dotted identifiers with a recognized prefix map to the single-letter
/// variables the statement rules bind: source/activity-like (`activity`,
/// `a`) to `a`, factor/reference-like (`emission_factor`, `ef`, `factor`)
/// to `ef`, result-like (`emission`, `e`) to `e`. An unrecognized prefix
/// passes through unchanged. A plain identifier is qualified with the
/// context alias when one is supplied.
fn render_identifier(name: &str, context: Option<&str>) -> String {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.as_slice() {
        [prefix, field] => match *prefix {
            "activity" | "a" => format!("a.{field}"),
            "emission_factor" | "ef" | "factor" => format!("ef.{field}"),
            "emission" | "e" => format!("e.{field}"),
            _ => name.to_string(),
        },
        [plain] => match context {
            Some(alias) => format!("{alias}.{plain}"),
            None => name.to_string(),
        },
        _ => name.to_string(),
    }
}

/// Renders an expression tree to Cypher text.
///
/// `context` is the row variable bound by the surrounding statement rule
/// (e.g. `e` for `COMPUTE`); unqualified identifiers and function-call
/// arguments are prefixed with it. Binary operations are always fully
/// parenthesized.
pub fn render_expr(expr: &Expr, context: Option<&str>) -> String {
    match expr {
        Expr::Identifier(name) => render_identifier(name, context),
        Expr::Number(number) => number.to_string(),
        Expr::String(value) => format!("'{value}'"),
        Expr::Binary { left, op, right } => format!(
            "({} {} {})",
            render_expr(left, context),
            op.as_str(),
            render_expr(right, context)
        ),
        Expr::FunctionCall { name, argument } => {
            let argument = match context {
                Some(alias) if !argument.contains('.') => format!("{alias}.{argument}"),
                _ => argument.clone(),
            };
            format!("{}({argument})", name.to_uppercase())
        }
        Expr::Concatenation(parts) => parts
            .iter()
            .map(|part| match part {
                ConcatPart::String(value) => format!("'{value}'"),
                ConcatPart::Identifier(name) => render_identifier(name, context),
            })
            .collect::<Vec<_>>()
            .join(" + "),
    }
}

/// Renders the truncation expression for a time-window mode.
///
/// Modes are case-insensitive and accepted in singular or plural form.
/// Any unrecognized mode falls back to the monthly template.
pub fn time_window_expr(mode: &str, field: &str) -> String {
    match mode.to_ascii_lowercase().as_str() {
        "daily" | "day" => format!("date.truncate('day', datetime({field}))"),
        "yearly" | "year" => format!("date.truncate('year', datetime({field}))"),
        "weekly" | "week" => format!("date.truncate('week', datetime({field}))"),
        "hourly" | "hour" => format!("datetime.truncate('hour', datetime({field}))"),
        // monthly, month, and the fallback for everything else
        _ => format!("date.truncate('month', datetime({field}))"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Number};

    #[test]
    fn test_alias_table_roles() {
        let render = |name: &str| render_expr(&Expr::Identifier(name.into()), None);
        assert_eq!(render("activity.id"), "a.id");
        assert_eq!(render("a.value"), "a.value");
        assert_eq!(render("emission_factor.scope"), "ef.scope");
        assert_eq!(render("ef.factor"), "ef.factor");
        assert_eq!(render("factor.co2"), "ef.co2");
        assert_eq!(render("emission.value"), "e.value");
        assert_eq!(render("e.scope"), "e.scope");
    }

    #[test]
    fn test_unrecognized_prefix_passes_through() {
        let expr = Expr::Identifier(String::from("warehouse.id"));
        assert_eq!(render_expr(&expr, None), "warehouse.id");
    }

    #[test]
    fn test_plain_identifier_context_prefix() {
        let expr = Expr::Identifier(String::from("value"));
        assert_eq!(render_expr(&expr, Some("e")), "e.value");
        assert_eq!(render_expr(&expr, None), "value");
    }

    #[test]
    fn test_number_and_string_rendering() {
        assert_eq!(render_expr(&Expr::Number(Number::Integer(3)), None), "3");
        assert_eq!(render_expr(&Expr::Number(Number::Float(1.5)), None), "1.5");
        assert_eq!(
            render_expr(&Expr::String(String::from("kwh")), None),
            "'kwh'"
        );
    }

    #[test]
    fn test_binary_op_always_parenthesized() {
        let expr = Expr::Binary {
            left: Box::new(Expr::Binary {
                left: Box::new(Expr::Identifier(String::from("activity.value"))),
                op: BinaryOp::Mul,
                right: Box::new(Expr::Identifier(String::from("ef.factor"))),
            }),
            op: BinaryOp::Div,
            right: Box::new(Expr::Number(Number::Integer(1000))),
        };
        assert_eq!(render_expr(&expr, None), "((a.value * ef.factor) / 1000)");
    }

    #[test]
    fn test_function_call_uppercases_and_prefixes() {
        let expr = Expr::FunctionCall {
            name: String::from("sum"),
            argument: String::from("value"),
        };
        assert_eq!(render_expr(&expr, Some("e")), "SUM(e.value)");
        assert_eq!(render_expr(&expr, None), "SUM(value)");

        // An already-qualified argument is passed through verbatim
        let qualified = Expr::FunctionCall {
            name: String::from("sum"),
            argument: String::from("x.value"),
        };
        assert_eq!(render_expr(&qualified, Some("e")), "SUM(x.value)");
    }

    #[test]
    fn test_concatenation_parts_join() {
        let expr = Expr::Concatenation(vec![
            ConcatPart::String(String::from("em_")),
            ConcatPart::Identifier(String::from("activity.id")),
        ]);
        assert_eq!(render_expr(&expr, None), "'em_' + a.id");
    }

    #[test]
    fn test_time_window_modes() {
        assert_eq!(
            time_window_expr("monthly", "m.time"),
            "date.truncate('month', datetime(m.time))"
        );
        assert_eq!(
            time_window_expr("day", "m.time"),
            "date.truncate('day', datetime(m.time))"
        );
        assert_eq!(
            time_window_expr("YEARLY", "m.time"),
            "date.truncate('year', datetime(m.time))"
        );
        assert_eq!(
            time_window_expr("week", "m.time"),
            "date.truncate('week', datetime(m.time))"
        );
        assert_eq!(
            time_window_expr("hourly", "m.time"),
            "datetime.truncate('hour', datetime(m.time))"
        );
    }

    #[test]
    fn test_unknown_time_window_mode_falls_back_to_monthly() {
        assert_eq!(
            time_window_expr("quarterly", "m.time"),
            time_window_expr("monthly", "m.time")
        );
    }
}
