//! Structural validator for screen spec documents
//!
//! Walks an untrusted document (parsed from JSON or YAML into
//! `serde_json::Value`) field by field in declaration order and stops at the
//! first violation. Unknown keys are ignored. No semantic cross-checks are
//! made: `rowKey` is not required to name a column, and `dataIndex` values
//! are not checked against any record shape.

use crate::error::{FieldPath, ValidationError, ValueKind};
use crate::types::{
    Action, ActionType, ApiEndpoints, Column, CreateForm, FieldComponent, FormField, Role,
    ScreenSpec, ScreenType, SearchSpec, TableSpec, WireEnum,
};
use serde_json::{Map, Value};

/// Screen spec validator
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecValidator;

impl SpecValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate a parsed document into a [`ScreenSpec`]
    ///
    /// # Errors
    /// Returns the first structural violation found.
    pub fn validate(&self, input: &Value) -> Result<ScreenSpec, ValidationError> {
        let root = Node::root(input).object()?;

        let id = root.string("id")?;
        let title = root.string("title")?;
        root.literal("type", ScreenType::DATA_SCREEN)?;

        let api = root.object("api")?;
        let api = ApiEndpoints {
            list: api.string("list")?,
            create: api.string("create")?,
            delete: api.string("delete")?,
        };

        let table = root.object("table")?;
        let table = TableSpec {
            row_key: table.string("rowKey")?,
            columns: table
                .array("columns")?
                .into_iter()
                .map(|node| column(&node.object()?))
                .collect::<Result<_, _>>()?,
        };

        let search = SearchSpec {
            placeholder: root.object("search")?.string("placeholder")?,
        };

        let form = root.object("createForm")?;
        let create_form = CreateForm {
            title: form.string("title")?,
            fields: form
                .array("fields")?
                .into_iter()
                .map(|node| form_field(&node.object()?))
                .collect::<Result<_, _>>()?,
        };

        let actions = root
            .array("actions")?
            .into_iter()
            .map(|node| action(&node.object()?))
            .collect::<Result<_, _>>()?;

        Ok(ScreenSpec {
            id,
            title,
            screen_type: ScreenType::DataScreen,
            api,
            table,
            search,
            create_form,
            actions,
        })
    }
}

/// Validate a parsed document with the default validator
///
/// # Errors
/// Returns the first structural violation found.
pub fn validate_screen_spec(input: &Value) -> Result<ScreenSpec, ValidationError> {
    SpecValidator::new().validate(input)
}

fn column(obj: &ObjectNode<'_>) -> Result<Column, ValidationError> {
    Ok(Column {
        key: obj.string("key")?,
        title: obj.string("title")?,
        data_index: obj.string("dataIndex")?,
    })
}

fn form_field(obj: &ObjectNode<'_>) -> Result<FormField, ValidationError> {
    Ok(FormField {
        name: obj.string("name")?,
        label: obj.string("label")?,
        component: obj.variant::<FieldComponent>("component")?,
        required: obj.bool_or("required", false)?,
    })
}

fn action(obj: &ObjectNode<'_>) -> Result<Action, ValidationError> {
    let action_type = obj.variant::<ActionType>("type")?;
    let label = obj.string("label")?;
    let role_required = match obj.optional("roleRequired") {
        None => None,
        Some(node) => Some(
            node.array()?
                .into_iter()
                .map(|role| role.variant::<Role>())
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(Action {
        action_type,
        label,
        role_required,
    })
}

/// Value with its location
struct Node<'a> {
    value: &'a Value,
    path: FieldPath,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: FieldPath::root(),
        }
    }

    fn mismatch(&self, expected: ValueKind) -> ValidationError {
        ValidationError::TypeMismatch {
            path: self.path.clone(),
            expected,
            found: ValueKind::of(self.value),
        }
    }

    fn object(&self) -> Result<ObjectNode<'a>, ValidationError> {
        match self.value {
            Value::Object(map) => Ok(ObjectNode {
                map,
                path: self.path.clone(),
            }),
            _ => Err(self.mismatch(ValueKind::Object)),
        }
    }

    fn array(&self) -> Result<Vec<Node<'a>>, ValidationError> {
        match self.value {
            Value::Array(items) => Ok(items
                .iter()
                .enumerate()
                .map(|(i, value)| Node {
                    value,
                    path: self.path.index(i),
                })
                .collect()),
            _ => Err(self.mismatch(ValueKind::Array)),
        }
    }

    fn str(&self) -> Result<&'a str, ValidationError> {
        self.value
            .as_str()
            .ok_or_else(|| self.mismatch(ValueKind::String))
    }

    fn variant<T: WireEnum>(&self) -> Result<T, ValidationError> {
        let raw = self.str()?;
        T::from_wire(raw).ok_or_else(|| ValidationError::InvalidVariant {
            path: self.path.clone(),
            allowed: T::VARIANTS,
            found: raw.to_string(),
        })
    }
}

/// Object with its location
struct ObjectNode<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> ObjectNode<'a> {
    fn optional(&self, key: &str) -> Option<Node<'a>> {
        self.map.get(key).map(|value| Node {
            value,
            path: self.path.key(key),
        })
    }

    fn required(&self, key: &str, expected: ValueKind) -> Result<Node<'a>, ValidationError> {
        self.optional(key)
            .ok_or_else(|| ValidationError::MissingField {
                path: self.path.key(key),
                expected,
            })
    }

    fn string(&self, key: &str) -> Result<String, ValidationError> {
        self.required(key, ValueKind::String)?
            .str()
            .map(str::to_string)
    }

    fn object(&self, key: &str) -> Result<ObjectNode<'a>, ValidationError> {
        self.required(key, ValueKind::Object)?.object()
    }

    fn array(&self, key: &str) -> Result<Vec<Node<'a>>, ValidationError> {
        self.required(key, ValueKind::Array)?.array()
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, ValidationError> {
        match self.optional(key) {
            None => Ok(default),
            Some(node) => node
                .value
                .as_bool()
                .ok_or_else(|| node.mismatch(ValueKind::Boolean)),
        }
    }

    fn variant<T: WireEnum>(&self, key: &str) -> Result<T, ValidationError> {
        self.required(key, ValueKind::String)?.variant()
    }

    fn literal(&self, key: &str, expected: &'static str) -> Result<(), ValidationError> {
        let node = self.required(key, ValueKind::String)?;
        let found = node.str()?;
        if found == expected {
            Ok(())
        } else {
            Err(ValidationError::InvalidLiteral {
                path: node.path,
                expected,
                found: found.to_string(),
            })
        }
    }
}
