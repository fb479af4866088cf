use crate::store::{invalid_condition, unknown_argument, Store};

use recordkit_core::{
    schema::{Field, Model},
    stmt::{Attributes, Value},
    Result,
};

use std::cmp::Ordering;

const OPERATORS: &[&str] = &[
    "equals",
    "not",
    "in",
    "notIn",
    "lt",
    "lte",
    "gt",
    "gte",
    "contains",
    "startsWith",
    "endsWith",
];

/// Evaluates filters against stored rows.
pub(crate) struct Matcher<'a> {
    store: &'a Store,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(store: &'a Store) -> Matcher<'a> {
        Matcher { store }
    }

    /// Resolves every key of `filter` against `model`, descending into
    /// `AND`/`OR`/`NOT` and relation filters, without looking at any row.
    pub(crate) fn check(&self, model: &Model, filter: &Attributes) -> Result<()> {
        for (key, condition) in filter {
            if matches!(key.as_str(), "AND" | "OR" | "NOT") {
                for filter in filters(model, key, condition)? {
                    self.check(model, filter)?;
                }
                continue;
            }

            let field = model
                .field(key)
                .ok_or_else(|| unknown_argument(model, key))?;

            if field.is_relation() {
                self.check_relation(model, field, condition)?;
            }
        }

        Ok(())
    }

    fn check_relation(&self, model: &Model, field: &Field, condition: &Value) -> Result<()> {
        let target = self.store.model(&field.ty)?;

        let Value::Map(ops) = condition else {
            return match condition {
                Value::Null if !field.is_list => Ok(()),
                _ => Err(invalid_condition(model, &field.name)),
            };
        };

        let wrapped = if field.is_list {
            &["some", "every", "none"][..]
        } else if ops.contains_key("is") || ops.contains_key("isNot") {
            &["is", "isNot"][..]
        } else {
            return self.check(target, ops);
        };

        for (op, nested) in ops {
            if !wrapped.contains(&op.as_str()) {
                return Err(unknown_argument(model, op));
            }

            match nested {
                Value::Map(nested) => self.check(target, nested)?,
                Value::Null if !field.is_list => {}
                _ => return Err(invalid_condition(model, &field.name)),
            }
        }

        Ok(())
    }

    /// Every entry of `filter` must hold for `row`.
    pub(crate) fn matches(&self, model: &Model, row: &Attributes, filter: &Attributes) -> Result<bool> {
        for (key, condition) in filter {
            if !self.matches_entry(model, row, key, condition)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn matches_entry(
        &self,
        model: &Model,
        row: &Attributes,
        key: &str,
        condition: &Value,
    ) -> Result<bool> {
        match key {
            "AND" => {
                for filter in filters(model, key, condition)? {
                    if !self.matches(model, row, filter)? {
                        return Ok(false);
                    }
                }
                return Ok(true);
            }
            "OR" => {
                for filter in filters(model, key, condition)? {
                    if self.matches(model, row, filter)? {
                        return Ok(true);
                    }
                }
                return Ok(false);
            }
            "NOT" => {
                for filter in filters(model, key, condition)? {
                    if self.matches(model, row, filter)? {
                        return Ok(false);
                    }
                }
                return Ok(true);
            }
            _ => {}
        }

        let field = model
            .field(key)
            .ok_or_else(|| unknown_argument(model, key))?;

        if field.is_relation() {
            self.matches_relation(model, field, row, condition)
        } else {
            matches_scalar(model, row.get(key).unwrap_or(&Value::Null), condition)
        }
    }

    fn matches_relation(
        &self,
        model: &Model,
        field: &Field,
        row: &Attributes,
        condition: &Value,
    ) -> Result<bool> {
        let target = self.store.model(&field.ty)?;
        let related = self.store.related(model, field, row)?;

        if field.is_list {
            let Value::Map(ops) = condition else {
                return Err(invalid_condition(model, &field.name));
            };

            for (op, nested) in ops {
                let Value::Map(nested) = nested else {
                    return Err(invalid_condition(model, &field.name));
                };

                let mut hits = 0;
                for related in &related {
                    if self.matches(target, related, nested)? {
                        hits += 1;
                    }
                }

                let holds = match op.as_str() {
                    "some" => hits > 0,
                    "every" => hits == related.len(),
                    "none" => hits == 0,
                    _ => return Err(unknown_argument(model, op)),
                };

                if !holds {
                    return Ok(false);
                }
            }

            return Ok(true);
        }

        let related = related.first().copied();

        match condition {
            Value::Null => Ok(related.is_none()),
            Value::Map(ops) if ops.contains_key("is") || ops.contains_key("isNot") => {
                for (op, nested) in ops {
                    let holds = match (op.as_str(), nested, related) {
                        ("is", Value::Null, related) => related.is_none(),
                        ("isNot", Value::Null, related) => related.is_some(),
                        ("is", Value::Map(nested), Some(related)) => {
                            self.matches(target, related, nested)?
                        }
                        ("isNot", Value::Map(nested), Some(related)) => {
                            !self.matches(target, related, nested)?
                        }
                        ("is", Value::Map(_), None) => false,
                        ("isNot", Value::Map(_), None) => true,
                        _ => return Err(invalid_condition(model, &field.name)),
                    };

                    if !holds {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Value::Map(nested) => match related {
                Some(related) => self.matches(target, related, nested),
                None => Ok(false),
            },
            _ => Err(invalid_condition(model, &field.name)),
        }
    }
}

/// The filters of an `AND`/`OR`/`NOT` entry: one map or a list of maps.
fn filters<'v>(model: &Model, key: &str, condition: &'v Value) -> Result<Vec<&'v Attributes>> {
    match condition {
        Value::Map(filter) => Ok(vec![filter]),
        Value::List(items) => items
            .iter()
            .map(|item| item.as_map().ok_or_else(|| invalid_condition(model, key)))
            .collect(),
        _ => Err(invalid_condition(model, key)),
    }
}

fn matches_scalar(model: &Model, value: &Value, condition: &Value) -> Result<bool> {
    let ops = match condition {
        Value::Map(ops)
            if !ops.is_empty() && ops.keys().all(|op| OPERATORS.contains(&op.as_str())) =>
        {
            ops
        }
        _ => return Ok(loose_eq(value, condition)),
    };

    for (op, operand) in ops {
        let holds = match op.as_str() {
            "equals" => loose_eq(value, operand),
            "not" => !matches_scalar(model, value, operand)?,
            "in" => contains(operand, value),
            "notIn" => !contains(operand, value),
            "lt" => ordered(value, operand, |ord| ord == Ordering::Less),
            "lte" => ordered(value, operand, |ord| ord != Ordering::Greater),
            "gt" => ordered(value, operand, |ord| ord == Ordering::Greater),
            "gte" => ordered(value, operand, |ord| ord != Ordering::Less),
            "contains" => strings(value, operand, |s, pat| s.contains(pat)),
            "startsWith" => strings(value, operand, |s, pat| s.starts_with(pat)),
            "endsWith" => strings(value, operand, |s, pat| s.ends_with(pat)),
            _ => return Err(unknown_argument(model, op)),
        };

        if !holds {
            return Ok(false);
        }
    }

    Ok(true)
}

fn contains(list: &Value, value: &Value) -> bool {
    list.as_list()
        .is_some_and(|items| items.iter().any(|item| loose_eq(item, value)))
}

fn ordered(value: &Value, operand: &Value, check: impl Fn(Ordering) -> bool) -> bool {
    !value.is_null() && !operand.is_null() && check(compare(value, operand))
}

fn strings(value: &Value, operand: &Value, check: impl Fn(&str, &str) -> bool) -> bool {
    match (value.as_str(), operand.as_str()) {
        (Some(value), Some(operand)) => check(value, operand),
        _ => false,
    }
}

/// Equality that treats integers and floats of the same magnitude as equal.
pub(crate) fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::I64(_) | Value::F64(_), Value::I64(_) | Value::F64(_)) => {
            lhs.as_f64() == rhs.as_f64()
        }
        _ => lhs == rhs,
    }
}

/// Total order used by `orderBy` and the range operators. Values of
/// different kinds order by kind, nulls first.
pub(crate) fn compare(lhs: &Value, rhs: &Value) -> Ordering {
    match (lhs, rhs) {
        (Value::String(lhs), Value::String(rhs)) => lhs.cmp(rhs),
        (Value::Bool(lhs), Value::Bool(rhs)) => lhs.cmp(rhs),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(lhs), Some(rhs)) => lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal),
            _ => rank(lhs).cmp(&rank(rhs)),
        },
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::I64(_) | Value::F64(_) => 2,
        Value::String(_) => 3,
        Value::List(_) => 4,
        Value::Map(_) => 5,
    }
}
