use recordkit_core::{
    schema::{Field, FieldDefault},
    stmt::{Attributes, Value},
    Result,
};

use chrono::{SecondsFormat, Utc};

/// Rows of one model plus its autoincrement counter.
#[derive(Debug)]
pub(crate) struct Table {
    pub(crate) rows: Vec<Attributes>,
    next_id: i64,
}

impl Table {
    pub(crate) fn new() -> Table {
        Table {
            rows: vec![],
            next_id: 1,
        }
    }

    /// Generates the default for an absent field, if it has one.
    pub(crate) fn default_for(&mut self, field: &Field) -> Result<Option<Value>> {
        if field.is_updated_at {
            return Ok(Some(now()));
        }

        let value = match &field.default {
            None => return Ok(None),
            Some(FieldDefault::Literal(json)) => serde_json::from_value(json.clone())?,
            Some(FieldDefault::Function { name, .. }) => match name.as_str() {
                "autoincrement" => {
                    let id = self.next_id;
                    self.next_id += 1;
                    Value::I64(id)
                }
                "now" => now(),
                "uuid" | "cuid" => Value::String(uuid::Uuid::new_v4().to_string()),
                other => recordkit_core::bail!(
                    "unsupported default function `{other}()` on field `{}`",
                    field.name
                ),
            },
        };

        Ok(Some(value))
    }

    /// Keeps the autoincrement counter ahead of explicitly written ids.
    pub(crate) fn observe(&mut self, field: &Field, value: &Value) {
        if field.default_function() != Some("autoincrement") {
            return;
        }

        if let Some(id) = value.as_i64() {
            self.next_id = self.next_id.max(id + 1);
        }
    }
}

pub(crate) fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}
