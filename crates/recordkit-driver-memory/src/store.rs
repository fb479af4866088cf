use crate::{
    filter::{compare, loose_eq, Matcher},
    table::{self, Table},
};

use recordkit_core::{
    driver::{Direction, DriverError, DriverErrorCode, Operation, QueryOptions, Response},
    schema::{storage_accessor, Datamodel, Field, Model},
    stmt::{Attributes, Value},
    Error, Result,
};

use std::{cmp::Ordering, collections::HashMap};

/// Every table plus the implicit many-to-many links between rows.
#[derive(Debug)]
pub(crate) struct Store {
    datamodel: Datamodel,

    /// Tables keyed by model name
    tables: HashMap<String, Table>,

    /// Storage accessor, model name and `dbName` to model name
    accessors: HashMap<String, String>,

    links: Vec<Link>,
}

/// Two rows joined by an implicit many-to-many relation.
#[derive(Debug, Clone, PartialEq)]
struct Link {
    relation: String,
    left: (String, Value),
    right: (String, Value),
}

/// A `connect`/`disconnect` entry of a create or update payload.
#[derive(Debug)]
struct NestedWrite {
    field: Field,
    op: WriteOp,
    targets: Vec<Attributes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOp {
    Connect,
    Disconnect,
}

/// A many-to-many link change, resolved before the owning row is written.
#[derive(Debug)]
struct LinkWrite {
    relation: String,
    op: WriteOp,
    target: String,
    key: Value,
}

impl Store {
    pub(crate) fn new(datamodel: Datamodel) -> Store {
        let mut tables = HashMap::new();
        let mut accessors = HashMap::new();

        for model in &datamodel.models {
            tables.insert(model.name.clone(), Table::new());
            accessors.insert(model.name.clone(), model.name.clone());
            accessors.insert(storage_accessor(&model.name), model.name.clone());
            if let Some(db_name) = &model.db_name {
                accessors.insert(db_name.clone(), model.name.clone());
            }
        }

        Store {
            datamodel,
            tables,
            accessors,
            links: vec![],
        }
    }

    pub(crate) fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::FindMany(op) => {
                let model = self.resolve(&op.model)?;
                let rows = self.find_many(&model, &op.filter, &op.options)?;
                Ok(Response::rows(rows))
            }
            Operation::FindFirst(op) => {
                let model = self.resolve(&op.model)?;
                Ok(Response::Row(self.find_first(&model, &op.filter)?))
            }
            Operation::FindUnique(op) => {
                let model = self.resolve(&op.model)?;
                Ok(Response::Row(self.find_first(&model, &op.key)?))
            }
            Operation::Create(op) => {
                let model = self.resolve(&op.model)?;
                Ok(Response::row(self.create(&model, op.data)?))
            }
            Operation::Update(op) => {
                let model = self.resolve(&op.model)?;
                Ok(Response::row(self.update(&model, &op.key, op.data)?))
            }
            Operation::Delete(op) => {
                let model = self.resolve(&op.model)?;
                Ok(Response::row(self.delete(&model, &op.key)?))
            }
        }
    }

    fn resolve(&self, accessor: &str) -> Result<Model> {
        self.accessors
            .get(accessor)
            .and_then(|name| self.datamodel.model(name))
            .cloned()
            .ok_or_else(|| {
                DriverError::new(
                    DriverErrorCode::UnknownModel,
                    format!("unknown model `{accessor}`"),
                )
                .into()
            })
    }

    pub(crate) fn model(&self, name: &str) -> Result<&Model> {
        self.datamodel.model(name).ok_or_else(|| {
            DriverError::new(
                DriverErrorCode::UnknownModel,
                format!("unknown model `{name}`"),
            )
            .into()
        })
    }

    fn rows(&self, model: &str) -> &[Attributes] {
        self.tables
            .get(model)
            .map(|table| table.rows.as_slice())
            .unwrap_or_default()
    }

    fn table_mut(&mut self, model: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(model)
            .ok_or_else(|| recordkit_core::err!("no table for model `{model}`"))
    }

    fn find_many(
        &self,
        model: &Model,
        filter: &Attributes,
        options: &QueryOptions,
    ) -> Result<Vec<Attributes>> {
        for order in &options.order_by {
            if model.field(&order.field).map_or(true, Field::is_relation) {
                return Err(unknown_argument(model, &order.field));
            }
        }

        let matcher = Matcher::new(self);
        matcher.check(model, filter)?;

        let mut rows = vec![];

        for row in self.rows(&model.name) {
            if matcher.matches(model, row, filter)? {
                rows.push(row.clone());
            }
        }

        if !options.order_by.is_empty() {
            rows.sort_by(|lhs, rhs| {
                options
                    .order_by
                    .iter()
                    .map(|order| {
                        let ordering = compare(
                            lhs.get(&order.field).unwrap_or(&Value::Null),
                            rhs.get(&order.field).unwrap_or(&Value::Null),
                        );
                        match order.direction {
                            Direction::Asc => ordering,
                            Direction::Desc => ordering.reverse(),
                        }
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        Ok(rows
            .into_iter()
            .skip(options.skip.unwrap_or(0))
            .take(options.take.unwrap_or(usize::MAX))
            .collect())
    }

    fn find_first(&self, model: &Model, filter: &Attributes) -> Result<Option<Attributes>> {
        let matcher = Matcher::new(self);
        matcher.check(model, filter)?;

        for row in self.rows(&model.name) {
            if matcher.matches(model, row, filter)? {
                return Ok(Some(row.clone()));
            }
        }

        Ok(None)
    }

    fn position(&self, model: &Model, key: &Attributes) -> Result<Option<usize>> {
        let matcher = Matcher::new(self);
        matcher.check(model, key)?;

        for (index, row) in self.rows(&model.name).iter().enumerate() {
            if matcher.matches(model, row, key)? {
                return Ok(Some(index));
            }
        }

        Ok(None)
    }

    fn create(&mut self, model: &Model, data: Attributes) -> Result<Attributes> {
        let (mut values, writes) = split(model, data)?;
        self.connect_owned(model, &mut values, &writes)?;
        let links = self.resolve_links(model, &writes)?;

        let table = self.table_mut(&model.name)?;
        let mut row = Attributes::new();

        for field in model.scalar_fields() {
            let value = match values.shift_remove(&field.name) {
                Some(value) if value.is_null() && field.is_required => {
                    return Err(null_constraint(field))
                }
                Some(value) => {
                    table.observe(field, &value);
                    value
                }
                None => match table.default_for(field)? {
                    Some(value) => value,
                    None if field.is_required => return Err(missing_argument(field)),
                    None => Value::Null,
                },
            };

            row.insert(field.name.clone(), value);
        }

        self.check_unique(model, &row, None)?;
        self.table_mut(&model.name)?.rows.push(row.clone());
        self.apply_links(model, &row, links)?;

        Ok(row)
    }

    fn update(&mut self, model: &Model, key: &Attributes, data: Attributes) -> Result<Attributes> {
        let index = self
            .position(model, key)?
            .ok_or_else(|| Error::from(DriverError::record_not_found("Record to update not found.")))?;

        let (mut values, writes) = split(model, data)?;
        self.connect_owned(model, &mut values, &writes)?;
        let links = self.resolve_links(model, &writes)?;

        let mut row = self.rows(&model.name)[index].clone();

        for (name, value) in values {
            if let Some(field) = model.field(&name) {
                if value.is_null() && field.is_required {
                    return Err(null_constraint(field));
                }
            }
            row.insert(name, value);
        }

        for field in model.scalar_fields().filter(|field| field.is_updated_at) {
            row.insert(field.name.clone(), table::now());
        }

        self.check_unique(model, &row, Some(index))?;

        let table = self.table_mut(&model.name)?;
        for field in model.scalar_fields() {
            if let Some(value) = row.get(&field.name) {
                table.observe(field, value);
            }
        }
        table.rows[index] = row.clone();

        self.apply_links(model, &row, links)?;

        Ok(row)
    }

    fn delete(&mut self, model: &Model, key: &Attributes) -> Result<Attributes> {
        let index = self.position(model, key)?.ok_or_else(|| {
            Error::from(DriverError::record_not_found(
                "Record to delete does not exist.",
            ))
        })?;

        let row = self.table_mut(&model.name)?.rows.remove(index);

        if let Some(id) = id_field(model).ok().and_then(|id| row.get(id)) {
            let side = (model.name.clone(), id.clone());
            self.links
                .retain(|link| link.left != side && link.right != side);
        }

        Ok(row)
    }

    fn check_unique(&self, model: &Model, row: &Attributes, skip: Option<usize>) -> Result<()> {
        for field in model
            .scalar_fields()
            .filter(|field| field.is_unique || field.is_id)
        {
            let Some(value) = row.get(&field.name).filter(|value| !value.is_null()) else {
                continue;
            };

            let taken = self
                .rows(&model.name)
                .iter()
                .enumerate()
                .any(|(index, other)| {
                    Some(index) != skip
                        && other
                            .get(&field.name)
                            .is_some_and(|other| loose_eq(other, value))
                });

            if taken {
                return Err(DriverError::other(format!(
                    "Unique constraint failed on the fields: (`{}`)",
                    field.name
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Applies `connect`/`disconnect` on fields that hold the foreign key by
    /// writing the key columns.
    fn connect_owned(
        &self,
        model: &Model,
        values: &mut Attributes,
        writes: &[NestedWrite],
    ) -> Result<()> {
        for write in writes
            .iter()
            .filter(|write| !write.field.relation_from_fields.is_empty())
        {
            let field = &write.field;
            let pairs = field
                .relation_from_fields
                .iter()
                .zip(&field.relation_to_fields);

            match write.op {
                WriteOp::Connect => {
                    let [unique] = write.targets.as_slice() else {
                        return Err(invalid_condition(model, &field.name));
                    };

                    let target = self.model(&field.ty)?;
                    let related = self
                        .find_first(target, unique)?
                        .ok_or_else(|| not_connected(model, field))?;

                    for (from, to) in pairs {
                        values.insert(
                            from.clone(),
                            related.get(to).cloned().unwrap_or_default(),
                        );
                    }
                }
                WriteOp::Disconnect => {
                    for (from, _) in pairs {
                        values.insert(from.clone(), Value::Null);
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolves many-to-many `connect`/`disconnect` targets to their keys.
    fn resolve_links(&self, model: &Model, writes: &[NestedWrite]) -> Result<Vec<LinkWrite>> {
        let mut links = vec![];

        for write in writes
            .iter()
            .filter(|write| write.field.relation_from_fields.is_empty())
        {
            let field = &write.field;
            let target = self.model(&field.ty)?;
            let inverse = self.inverse(model, field)?;

            if !(field.is_list && inverse.is_list) {
                return Err(DriverError::other(format!(
                    "nested writes on `{}.{}` are only supported for many-to-many relations",
                    model.name, field.name
                ))
                .into());
            }

            let target_id = id_field(target)?;

            for unique in &write.targets {
                let related = self
                    .find_first(target, unique)?
                    .ok_or_else(|| not_connected(model, field))?;

                links.push(LinkWrite {
                    relation: relation_key(model, field),
                    op: write.op,
                    target: target.name.clone(),
                    key: related.get(target_id).cloned().unwrap_or_default(),
                });
            }
        }

        Ok(links)
    }

    fn apply_links(&mut self, model: &Model, row: &Attributes, links: Vec<LinkWrite>) -> Result<()> {
        if links.is_empty() {
            return Ok(());
        }

        let key = row.get(id_field(model)?).cloned().unwrap_or_default();

        for write in links {
            let link = Link {
                relation: write.relation,
                left: (model.name.clone(), key.clone()),
                right: (write.target, write.key),
            };

            match write.op {
                WriteOp::Connect => {
                    if !self.links.iter().any(|other| other.joins(&link)) {
                        self.links.push(link);
                    }
                }
                WriteOp::Disconnect => self.links.retain(|other| !other.joins(&link)),
            }
        }

        Ok(())
    }

    /// The field on the target model that forms the other side of `field`.
    fn inverse<'a>(&'a self, model: &Model, field: &Field) -> Result<&'a Field> {
        let target = self.model(&field.ty)?;

        target
            .fields
            .iter()
            .filter(|other| !(target.name == model.name && other.name == field.name))
            .find(|other| field.pairs_with(other, &model.name))
            .ok_or_else(|| {
                DriverError::other(format!(
                    "relation `{}.{}` has no inverse field",
                    model.name, field.name
                ))
                .into()
            })
    }

    /// Rows on the other side of relation `field` for `row`.
    pub(crate) fn related(
        &self,
        model: &Model,
        field: &Field,
        row: &Attributes,
    ) -> Result<Vec<&Attributes>> {
        let target = self.model(&field.ty)?;
        let rows = self.rows(&target.name);

        // The field holds the key: row[from] == related[to]
        if !field.relation_from_fields.is_empty() {
            let pairs: Vec<_> = field
                .relation_from_fields
                .iter()
                .zip(&field.relation_to_fields)
                .collect();

            return Ok(rows
                .iter()
                .filter(|related| joined(row, related, &pairs))
                .collect());
        }

        let inverse = self.inverse(model, field)?;

        if field.is_list && inverse.is_list {
            let key = row.get(id_field(model)?).unwrap_or(&Value::Null);
            let target_id = id_field(target)?;
            let relation = relation_key(model, field);
            let keys = self.linked_keys(&relation, &model.name, key, &target.name);

            return Ok(rows
                .iter()
                .filter(|related| {
                    related
                        .get(target_id)
                        .is_some_and(|id| keys.iter().any(|key| loose_eq(key, id)))
                })
                .collect());
        }

        // The inverse holds the key: related[from] == row[to]
        let pairs: Vec<_> = inverse
            .relation_from_fields
            .iter()
            .zip(&inverse.relation_to_fields)
            .collect();

        Ok(rows
            .iter()
            .filter(|related| joined(related, row, &pairs))
            .collect())
    }

    fn linked_keys(&self, relation: &str, model: &str, key: &Value, target: &str) -> Vec<&Value> {
        self.links
            .iter()
            .filter(|link| link.relation == relation)
            .filter_map(|link| {
                if link.left.0 == model && loose_eq(&link.left.1, key) && link.right.0 == target {
                    Some(&link.right.1)
                } else if link.right.0 == model
                    && loose_eq(&link.right.1, key)
                    && link.left.0 == target
                {
                    Some(&link.left.1)
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Link {
    fn joins(&self, other: &Link) -> bool {
        self.relation == other.relation
            && ((self.left == other.left && self.right == other.right)
                || (self.left == other.right && self.right == other.left))
    }
}

/// Separates scalar values from nested relation writes, rejecting unknown
/// fields.
fn split(model: &Model, data: Attributes) -> Result<(Attributes, Vec<NestedWrite>)> {
    let mut values = Attributes::new();
    let mut writes = vec![];

    for (name, value) in data {
        let field = model
            .field(&name)
            .ok_or_else(|| unknown_argument(model, &name))?;

        if !field.is_relation() {
            values.insert(name, value);
            continue;
        }

        let Value::Map(ops) = value else {
            return Err(invalid_condition(model, &name));
        };

        for (op, targets) in ops {
            let op = match op.as_str() {
                "connect" => WriteOp::Connect,
                "disconnect" => WriteOp::Disconnect,
                _ => {
                    return Err(DriverError::other(format!(
                        "unsupported nested write `{op}` on `{}.{name}`",
                        model.name
                    ))
                    .into())
                }
            };

            let targets = match targets {
                Value::Map(target) => vec![target],
                Value::List(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::Map(target) => Ok(target),
                        _ => Err(invalid_condition(model, &name)),
                    })
                    .collect::<Result<_>>()?,
                _ => return Err(invalid_condition(model, &name)),
            };

            writes.push(NestedWrite {
                field: field.clone(),
                op,
                targets,
            });
        }
    }

    Ok((values, writes))
}

fn joined(owner: &Attributes, referenced: &Attributes, pairs: &[(&String, &String)]) -> bool {
    pairs.iter().all(|(from, to)| {
        let key = owner.get(*from).unwrap_or(&Value::Null);
        !key.is_null() && referenced.get(*to).is_some_and(|value| loose_eq(key, value))
    })
}

fn id_field(model: &Model) -> Result<&str> {
    model
        .id_fields()
        .next()
        .map(|field| field.name.as_str())
        .ok_or_else(|| recordkit_core::err!("model `{}` has no id field", model.name))
}

/// Identifies the link set of a many-to-many relation.
fn relation_key(model: &Model, field: &Field) -> String {
    field.relation_name.clone().unwrap_or_else(|| {
        let mut names = [model.name.as_str(), field.ty.as_str()];
        names.sort_unstable();
        names.join("To")
    })
}

pub(crate) fn unknown_argument(model: &Model, name: &str) -> Error {
    DriverError::new(
        DriverErrorCode::UnknownArgument {
            field: name.to_string(),
        },
        format!("Unknown argument `{name}` for model `{}`.", model.name),
    )
    .into()
}

pub(crate) fn invalid_condition(model: &Model, name: &str) -> Error {
    DriverError::other(format!(
        "Invalid value for argument `{name}` of model `{}`.",
        model.name
    ))
    .into()
}

fn null_constraint(field: &Field) -> Error {
    DriverError::null_constraint(
        &field.name,
        format!("Argument `{}` must not be null.", field.name),
    )
    .into()
}

fn missing_argument(field: &Field) -> Error {
    DriverError::missing_argument(
        &field.name,
        format!("Argument `{}` is missing.", field.name),
    )
    .into()
}

fn not_connected(model: &Model, field: &Field) -> Error {
    DriverError::record_not_found(format!(
        "No '{}' record was found for a nested connect on relation '{}.{}'.",
        field.ty, model.name, field.name
    ))
    .into()
}
