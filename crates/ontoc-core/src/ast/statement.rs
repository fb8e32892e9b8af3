//! Statement AST types.

use super::expression::Expr;

/// An insertion-ordered map from names to values.
///
/// Declaration order is preserved end-to-end so generated output is
/// deterministic. Inserting a duplicate key keeps the original position and
/// silently takes the newer value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a key/value pair, overwriting the value in place if the key
    /// is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Aggregation function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AggregateFunction {
    /// Numeric sum of a field.
    Sum,
    /// Row count, or field count when a field is given.
    Count,
    /// First-seen value of a field.
    First,
}

impl AggregateFunction {
    /// Returns the DSL-facing name of the function.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Count => "count",
            Self::First => "first",
        }
    }
}

/// One aggregation clause of an `AGGREGATE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregationClause {
    /// The aggregation function.
    pub function: AggregateFunction,
    /// The field to aggregate; `AGG_COUNT()` legally omits it.
    pub field: Option<String>,
    /// The output field name.
    pub alias: String,
}

/// Time-window specification for an `AGGREGATE` statement.
///
/// The window acts as an implicit extra grouping key: the source field is
/// truncated to the window granularity and stored under the target field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeWindow {
    /// Window mode (e.g., `monthly`, `daily`); unrecognized modes fall back
    /// to monthly at generation time.
    pub mode: String,
    /// The timestamp field to truncate.
    pub source_field: String,
    /// The field the truncated value is stored under.
    pub target_field: String,
}

/// A `LOAD_CSV` statement: loads CSV rows into graph nodes.
///
/// # Examples
///
/// ```text
/// LOAD_CSV "level1.csv" AS measurement
///   MAP_COLUMNS { factory -> factory_id, product -> product_id }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoadStatement {
    /// Source CSV path.
    pub path: String,
    /// Label of the created nodes.
    pub node_label: String,
    /// Ordered source-column to target-field mapping.
    pub column_map: OrderedMap<String>,
}

/// A `NORMALIZE` statement: rewrites property values in place.
///
/// # Examples
///
/// ```text
/// NORMALIZE measurement {
///   fuel: { "gass": "gas", "electricty": "electricity" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NormalizeStatement {
    /// Label of the nodes to normalize.
    pub node_label: String,
    /// Property name to (old value → new value) mapping, both levels ordered.
    pub normalizations: OrderedMap<OrderedMap<String>>,
}

/// An `AGGREGATE` statement: groups nodes and materializes aggregates.
///
/// # Examples
///
/// ```text
/// AGGREGATE measurement
///   BY [factory_id, product_id]
///   INTO activity
///   AGG_SUM(value) AS value
///   TAKE_FIRST(unit) AS unit
///   TIME_WINDOW monthly FROM time INTO time_window
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregateStatement {
    /// Label of the nodes to aggregate.
    pub source_label: String,
    /// Grouping keys, order-significant.
    pub group_by: Vec<String>,
    /// Label of the created nodes.
    pub target_label: String,
    /// Aggregation clauses in declared order; may be empty.
    pub aggregations: Vec<AggregationClause>,
    /// Optional time-window specification.
    pub time_window: Option<TimeWindow>,
}

/// A `UNIT_CONVERT` statement.
///
/// The conversion table is referenced by name only and never loaded;
/// generation emits a structural skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnitConvertStatement {
    /// Label of the nodes to convert.
    pub node_label: String,
    /// The field holding the value.
    pub field: String,
    /// Current unit.
    pub from_unit: String,
    /// Target unit.
    pub to_unit: String,
    /// Name of the conversion-factor table.
    pub conversion_table: String,
}

/// An `ENRICH` statement: joins nodes against a factor table and creates
/// enriched nodes from generated expressions.
///
/// # Examples
///
/// ```text
/// ENRICH activity WITH emission_factor
///   MATCH ON fuel
///   OUTPUT emission AS {
///     id: "em_" + activity.id,
///     value: activity.value * emission_factor.factor
///   }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnrichStatement {
    /// Label of the nodes to enrich.
    pub source_label: String,
    /// The factor table to join against.
    pub factor_table: String,
    /// The key both sides are matched on.
    pub match_key: String,
    /// Label of the created nodes.
    pub target_label: String,
    /// Ordered output-field to expression mapping.
    pub output_fields: OrderedMap<Expr>,
}

/// A `COMPUTE` statement: evaluates one aggregate expression per group and
/// merges it onto a target node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComputeStatement {
    /// Name of the computed field.
    pub field_name: String,
    /// Label of the nodes the expression ranges over.
    pub source_label: String,
    /// Grouping keys; only the first is used as the merge key.
    pub group_by: Vec<String>,
    /// Label of the merged node.
    pub target_label: String,
    /// The aggregate expression.
    pub expression: Expr,
}

/// A `VALIDATE` statement.
///
/// The rule name is an opaque string; generation emits a structural
/// skeleton and never evaluates the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidateStatement {
    /// Label of the nodes to validate.
    pub node_label: String,
    /// The rule name, uninterpreted.
    pub rule_name: String,
}

/// A top-level DSL statement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Statement {
    /// `LOAD_CSV`
    Load(LoadStatement),
    /// `NORMALIZE`
    Normalize(NormalizeStatement),
    /// `AGGREGATE`
    Aggregate(AggregateStatement),
    /// `UNIT_CONVERT`
    UnitConvert(UnitConvertStatement),
    /// `ENRICH`
    Enrich(EnrichStatement),
    /// `COMPUTE`
    Compute(ComputeStatement),
    /// `VALIDATE`
    Validate(ValidateStatement),
}

/// Root node representing an entire DSL program.
///
/// Statement order is significant and preserved end-to-end; it determines
/// the order of generated output blocks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Program {
    /// The statements in source order.
    pub statements: Vec<Statement>,
}
