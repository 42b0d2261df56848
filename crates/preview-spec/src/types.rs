//! Screen specification types
//!
//! Defines the validated, immutable shape of a data screen:
//! - API endpoint templates
//! - Table columns and row key
//! - Create form fields
//! - Role-gated actions

use crate::error::UnknownRole;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of string values used on the wire
///
/// Implemented by every enum the validator accepts from an untrusted document.
pub trait WireEnum: Sized + Copy + 'static {
    /// Accepted wire names, in declaration order
    const VARIANTS: &'static [&'static str];

    /// Parse from the exact wire name
    fn from_wire(value: &str) -> Option<Self>;

    /// Wire name of this variant
    fn as_wire(&self) -> &'static str;
}

/// Simulated user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access
    Admin,
    /// Regular user
    User,
    /// Read-only visitor
    Guest,
}

impl Role {
    /// All roles in declaration order
    pub const ALL: [Role; 3] = [Role::Admin, Role::User, Role::Guest];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.as_wire()
    }
}

impl WireEnum for Role {
    const VARIANTS: &'static [&'static str] = &["admin", "user", "guest"];

    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }

    fn as_wire(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_wire(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screen discriminator
///
/// Only one variant exists today; new screen kinds are added here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScreenType {
    /// Tabular CRUD screen
    #[serde(rename = "dataScreen")]
    DataScreen,
}

impl ScreenType {
    /// Literal tag expected in documents
    pub const DATA_SCREEN: &'static str = "dataScreen";
}

/// Endpoint templates used by a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiEndpoints {
    /// Listing endpoint
    pub list: String,
    /// Creation endpoint
    pub create: String,
    /// Deletion endpoint, containing an `:id` placeholder
    pub delete: String,
}

impl ApiEndpoints {
    /// Placeholder substituted with a record id in [`ApiEndpoints::delete`]
    pub const ID_PLACEHOLDER: &'static str = ":id";

    /// Deletion path for a concrete record
    #[must_use]
    pub fn delete_path(&self, id: &str) -> String {
        self.delete.replacen(Self::ID_PLACEHOLDER, id, 1)
    }
}

/// Table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column key
    pub key: String,
    /// Header text
    pub title: String,
    /// Record field displayed in this column
    pub data_index: String,
}

/// Table layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    /// Record field used as the row key
    pub row_key: String,
    /// Ordered columns
    pub columns: Vec<Column>,
}

/// Search box
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSpec {
    /// Placeholder text
    pub placeholder: String,
}

/// Form control kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldComponent {
    /// Free text input
    Input,
    /// Role picker
    Select,
}

impl WireEnum for FieldComponent {
    const VARIANTS: &'static [&'static str] = &["input", "select"];

    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "input" => Some(FieldComponent::Input),
            "select" => Some(FieldComponent::Select),
            _ => None,
        }
    }

    fn as_wire(&self) -> &'static str {
        match self {
            FieldComponent::Input => "input",
            FieldComponent::Select => "select",
        }
    }
}

/// Create form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Record field name
    pub name: String,
    /// Field label
    pub label: String,
    /// Control kind
    pub component: FieldComponent,
    /// Whether a value must be supplied (defaults to `false`)
    pub required: bool,
}

/// Create form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateForm {
    /// Modal title
    pub title: String,
    /// Ordered fields
    pub fields: Vec<FormField>,
}

/// Action kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    /// Opens the create form
    OpenModal,
    /// Deletes a row
    Delete,
    /// Submits the create form
    Submit,
    /// Reloads the list
    Refresh,
}

impl WireEnum for ActionType {
    const VARIANTS: &'static [&'static str] = &["openModal", "delete", "submit", "refresh"];

    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "openModal" => Some(ActionType::OpenModal),
            "delete" => Some(ActionType::Delete),
            "submit" => Some(ActionType::Submit),
            "refresh" => Some(ActionType::Refresh),
            _ => None,
        }
    }

    fn as_wire(&self) -> &'static str {
        match self {
            ActionType::OpenModal => "openModal",
            ActionType::Delete => "delete",
            ActionType::Submit => "submit",
            ActionType::Refresh => "refresh",
        }
    }
}

/// Screen action with optional role gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Action kind
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Button label
    pub label: String,
    /// Roles allowed to trigger the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_required: Option<Vec<Role>>,
}

impl Action {
    /// Check whether `role` may trigger this action
    ///
    /// An absent or empty `roleRequired` list allows every role.
    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        role_allowed(role, self.role_required.as_deref())
    }
}

/// Pointwise role gate shared by actions and screen models
#[inline]
#[must_use]
pub fn role_allowed(role: Role, required: Option<&[Role]>) -> bool {
    match required {
        None | Some([]) => true,
        Some(roles) => roles.contains(&role),
    }
}

/// Validated screen specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSpec {
    /// Screen identifier
    pub id: String,
    /// Screen title
    pub title: String,
    /// Screen discriminator
    #[serde(rename = "type")]
    pub screen_type: ScreenType,
    /// Endpoint templates
    pub api: ApiEndpoints,
    /// Table layout
    pub table: TableSpec,
    /// Search box
    pub search: SearchSpec,
    /// Create form
    pub create_form: CreateForm,
    /// Actions in document order
    pub actions: Vec<Action>,
}

impl ScreenSpec {
    /// First action of the given kind
    #[must_use]
    pub fn action(&self, action_type: ActionType) -> Option<&Action> {
        self.actions.iter().find(|a| a.action_type == action_type)
    }

    /// Serialize back into the document model
    ///
    /// # Errors
    /// Propagates `serde_json` serialization failures.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_wire_names() {
        assert_eq!("guest".parse::<Role>().unwrap(), Role::Guest);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn empty_role_gate_allows_everyone() {
        for role in Role::ALL {
            assert!(role_allowed(role, None));
            assert!(role_allowed(role, Some(&[])));
        }
        assert!(!role_allowed(Role::Guest, Some(&[Role::Admin, Role::User])));
    }

    #[test]
    fn delete_path_substitutes_placeholder_once() {
        let api = ApiEndpoints {
            list: "/api/users".to_string(),
            create: "/api/users".to_string(),
            delete: "/api/users/:id".to_string(),
        };
        assert_eq!(api.delete_path("u-1"), "/api/users/u-1");
    }

    #[test]
    fn action_serializes_type_tag() {
        let action = Action {
            action_type: ActionType::OpenModal,
            label: "Add".to_string(),
            role_required: None,
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value, serde_json::json!({"type": "openModal", "label": "Add"}));
    }
}
