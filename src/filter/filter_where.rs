use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::{is_identifier, quote_identifier, FilterOp, FilterWhereOptions};

/// Compiles a JSON where-clause into a parameterised SQL condition.
///
/// ```json
/// { "$or": [
///     { "author_id": "..." },
///     { "$exists": { "from": "relationships",
///                    "where": { "subject_id": { "$col": "notes.author_id" }, "following": true } } }
/// ] }
/// ```
///
/// Placeholders are numbered from `starting_param_index + 1` across every
/// nesting level, so the result can be appended to an existing parameter list.
pub struct FilterWhere<'a> {
    options: &'a FilterWhereOptions,
    param_values: Vec<Value>,
    param_offset: usize,
}

impl<'a> FilterWhere<'a> {
    pub fn new(starting_param_index: usize, options: &'a FilterWhereOptions) -> Self {
        Self {
            options,
            param_values: vec![],
            param_offset: starting_param_index,
        }
    }

    pub fn generate(
        where_data: &Value,
        starting_param_index: usize,
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = FilterWhere::new(starting_param_index, options);
        let sql = filter_where.clause(where_data, 0)?;
        Ok((sql, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) | Value::String(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be object or string".to_string())),
        }
    }

    fn clause(&mut self, where_data: &Value, depth: u32) -> Result<String, FilterError> {
        if depth > self.options.max_nested_depth {
            return Err(FilterError::TooDeep(self.options.max_nested_depth));
        }

        match where_data {
            Value::Null => Ok("1=1".to_string()),
            Value::Object(obj) => {
                let mut parts = vec![];
                for (key, value) in obj {
                    if key.starts_with('$') {
                        parts.push(self.logical(key, value, depth)?);
                    } else {
                        parts.extend(self.field(key, value)?);
                    }
                }
                Ok(if parts.is_empty() { "1=1".to_string() } else { parts.join(" AND ") })
            }
            Value::String(s) => {
                if !self.options.allow_raw_sql {
                    return Err(FilterError::InvalidWhereClause(
                        "Raw SQL queries are disabled in this environment".to_string(),
                    ));
                }
                tracing::warn!("Raw SQL predicate used: {}", s);
                Ok(format!("({})", s))
            }
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn logical(&mut self, op: &str, value: &Value, depth: u32) -> Result<String, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                if arr.is_empty() {
                    return Ok(if op == "$and" { "1=1" } else { "1=0" }.to_string());
                }
                let parts = arr
                    .iter()
                    .map(|v| self.clause(v, depth + 1).map(|sql| format!("({})", sql)))
                    .collect::<Result<Vec<_>, _>>()?;
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", parts.join(joiner)))
            }
            "$not" => Ok(format!("NOT ({})", self.clause(value, depth + 1)?)),
            "$exists" | "$nexists" => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires object", op)))?;
                let table = obj
                    .get("from")
                    .and_then(Value::as_str)
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires \"from\"", op)))?;
                if !is_identifier(table) {
                    return Err(FilterError::InvalidTableName(table.to_string()));
                }
                let inner = self.clause(obj.get("where").unwrap_or(&Value::Null), depth + 1)?;
                let sql = format!("EXISTS (SELECT 1 FROM \"{}\" WHERE {})", table, inner);
                Ok(if op == "$nexists" { format!("NOT {}", sql) } else { sql })
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn field(&mut self, field: &str, value: &Value) -> Result<Vec<String>, FilterError> {
        let column = quote_identifier(field)?;
        match value {
            Value::Object(obj) if column_ref(obj).is_some() => {
                Ok(vec![format!("{} = {}", column, self.operand(value)?)])
            }
            Value::Object(obj) => obj
                .iter()
                .map(|(op_key, op_val)| self.condition(&column, FilterOp::parse(op_key)?, op_val))
                .collect(),
            // Implicit equality: { field: value }
            _ => Ok(vec![self.condition(&column, FilterOp::Eq, value)?]),
        }
    }

    fn condition(&mut self, column: &str, op: FilterOp, data: &Value) -> Result<String, FilterError> {
        Ok(match op {
            FilterOp::Eq if data.is_null() => format!("{} IS NULL", column),
            FilterOp::Eq => format!("{} = {}", column, self.operand(data)?),
            FilterOp::Ne if data.is_null() => format!("{} IS NOT NULL", column),
            FilterOp::Ne => format!("{} <> {}", column, self.operand(data)?),
            FilterOp::Gt => format!("{} > {}", column, self.operand(data)?),
            FilterOp::Gte => format!("{} >= {}", column, self.operand(data)?),
            FilterOp::Lt => format!("{} < {}", column, self.operand(data)?),
            FilterOp::Lte => format!("{} <= {}", column, self.operand(data)?),
            FilterOp::Like => format!("{} LIKE {}", column, self.operand(data)?),
            FilterOp::ILike => format!("{} ILIKE {}", column, self.operand(data)?),
            FilterOp::Contains => format!("{} LIKE '%' || {} || '%'", column, self.operand(data)?),
            FilterOp::In | FilterOp::NIn => {
                let negate = op == FilterOp::NIn;
                match data {
                    Value::Array(values) if values.is_empty() => {
                        if negate { "1=1".to_string() } else { "1=0".to_string() }
                    }
                    Value::Array(values) => {
                        let params = self.params(values);
                        let keyword = if negate { "NOT IN" } else { "IN" };
                        format!("{} {} ({})", column, keyword, params.join(", "))
                    }
                    _ => {
                        let comparator = if negate { "<>" } else { "=" };
                        format!("{} {} {}", column, comparator, self.operand(data)?)
                    }
                }
            }
            FilterOp::Between => match data {
                Value::Array(values) if values.len() == 2 => {
                    let low = self.operand(&values[0])?;
                    let high = self.operand(&values[1])?;
                    format!("{} BETWEEN {} AND {}", column, low, high)
                }
                _ => {
                    return Err(FilterError::InvalidOperatorData(
                        "$between requires array with 2 values".to_string(),
                    ))
                }
            },
            FilterOp::Any => match data {
                Value::Array(values) if values.is_empty() => "1=0".to_string(),
                Value::Array(values) => format!("{} && ARRAY[{}]", column, self.params(values).join(", ")),
                _ => format!("{} && ARRAY[{}]", column, self.param(data.clone())),
            },
            FilterOp::All => match data {
                Value::Array(values) => format!("{} @> ARRAY[{}]", column, self.params(values).join(", ")),
                _ => format!("{} @> ARRAY[{}]", column, self.param(data.clone())),
            },
            FilterOp::Size => format!("array_length({}, 1) = {}", column, self.param(data.clone())),
        })
    }

    /// A bound parameter, or a quoted column for `{ "$col": "table.column" }`
    fn operand(&mut self, value: &Value) -> Result<String, FilterError> {
        match value {
            Value::Object(obj) => match column_ref(obj) {
                Some(reference) => quote_identifier(reference),
                None => Err(FilterError::InvalidOperatorData(format!("Unexpected object operand: {}", value))),
            },
            _ => Ok(self.param(value.clone())),
        }
    }

    fn params(&mut self, values: &[Value]) -> Vec<String> {
        values.iter().map(|v| self.param(v.clone())).collect()
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_offset + self.param_values.len())
    }
}

fn column_ref(obj: &Map<String, Value>) -> Option<&str> {
    if obj.len() != 1 {
        return None;
    }
    obj.get("$col").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sql(where_data: Value) -> (String, Vec<Value>) {
        FilterWhere::generate(&where_data, 0, &FilterWhereOptions::default()).unwrap()
    }

    #[test]
    fn implicit_equality_and_operators() {
        let (query, params) = sql(json!({ "author_id": "a", "id": { "$lt": 40 } }));
        assert_eq!(query, "\"author_id\" = $1 AND \"id\" < $2");
        assert_eq!(params, vec![json!("a"), json!(40)]);
    }

    #[test]
    fn nested_clauses_share_one_parameter_sequence() {
        let (query, params) = sql(json!({
            "$and": [
                { "$or": [ { "a": 1 }, { "b": 2 } ] },
                { "id": { "$gte": 10, "$lt": 50 } }
            ]
        }));
        assert_eq!(query, "((((\"a\" = $1) OR (\"b\" = $2))) AND (\"id\" >= $3 AND \"id\" < $4))");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn exists_subquery_with_column_reference() {
        let (query, params) = sql(json!({
            "$exists": {
                "from": "relationships",
                "where": { "subject_id": { "$col": "notes.author_id" }, "owner_id": "me", "following": true }
            }
        }));
        assert_eq!(
            query,
            "EXISTS (SELECT 1 FROM \"relationships\" WHERE \"following\" = $1 AND \"owner_id\" = $2 AND \"subject_id\" = \"notes\".\"author_id\")"
        );
        assert_eq!(params, vec![json!(true), json!("me")]);
    }

    #[test]
    fn starting_index_offsets_placeholders() {
        let (query, _) = FilterWhere::generate(&json!({ "a": 1 }), 3, &FilterWhereOptions::default()).unwrap();
        assert_eq!(query, "\"a\" = $4");
    }

    #[test]
    fn contains_wraps_param_or_column_in_wildcards() {
        let (query, params) = sql(json!({ "content": { "$contains": "spoiler" } }));
        assert_eq!(query, "\"content\" LIKE '%' || $1 || '%'");
        assert_eq!(params, vec![json!("spoiler")]);

        let (query, params) = sql(json!({
            "notes.content": { "$contains": { "$col": "filter_keywords.keyword" } }
        }));
        assert_eq!(
            query,
            "\"notes\".\"content\" LIKE '%' || \"filter_keywords\".\"keyword\" || '%'"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn empty_and_null_clauses() {
        assert_eq!(sql(json!({})).0, "1=1");
        assert_eq!(sql(json!({ "a": null })).0, "\"a\" IS NULL");
        assert_eq!(sql(json!({ "a": { "$in": [] } })).0, "1=0");
        assert_eq!(sql(json!({ "$or": [] })).0, "1=0");
    }

    #[test]
    fn raw_sql_follows_options() {
        let raw = json!("1 = 1");
        assert!(FilterWhere::generate(&raw, 0, &FilterWhereOptions::default()).is_err());
        let permissive = FilterWhereOptions { allow_raw_sql: true, ..FilterWhereOptions::default() };
        assert_eq!(FilterWhere::generate(&raw, 0, &permissive).unwrap().0, "(1 = 1)");
    }

    #[test]
    fn rejects_deep_nesting_and_bad_input() {
        let shallow = FilterWhereOptions { max_nested_depth: 1, ..FilterWhereOptions::default() };
        let deep = json!({ "$not": { "$not": { "a": 1 } } });
        assert!(matches!(FilterWhere::generate(&deep, 0, &shallow), Err(FilterError::TooDeep(1))));

        let bad_table = json!({ "$exists": { "from": "x; --", "where": {} } });
        assert!(matches!(
            FilterWhere::generate(&bad_table, 0, &FilterWhereOptions::default()),
            Err(FilterError::InvalidTableName(_))
        ));
        let bad_op = json!({ "a": { "$regex": "x" } });
        assert!(matches!(
            FilterWhere::generate(&bad_op, 0, &FilterWhereOptions::default()),
            Err(FilterError::UnsupportedOperator(_))
        ));
    }
}
