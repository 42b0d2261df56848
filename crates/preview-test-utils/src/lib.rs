//! Testing utilities for the UI preview workspace
//!
//! Shared fixtures and setup helpers.

#![allow(missing_docs)]

use preview_mock::{MockConfig, MockServer};
use preview_spec::{
    Action, ActionType, ApiEndpoints, Column, CreateForm, FieldComponent, FormField, Role,
    ScreenSpec, ScreenType, SearchSpec, TableSpec,
};
use std::path::Path;
use std::sync::Arc;

pub mod fixtures {
    //! Spec documents as text, identical to the bundled `public/spec` assets

    pub const USER_LIST_JSON: &str = include_str!("../../../public/spec/user-list.screen.json");
    pub const USER_LIST_YAML: &str = include_str!("../../../public/spec/user-list.screen.yaml");

    /// Public path of the JSON document
    pub const USER_LIST_JSON_PATH: &str = "/spec/user-list.screen.json";
    /// Public path of the YAML document
    pub const USER_LIST_YAML_PATH: &str = "/spec/user-list.screen.yaml";
}

fn column(key: &str, title: &str) -> Column {
    Column {
        key: key.to_string(),
        title: title.to_string(),
        data_index: key.to_string(),
    }
}

fn field(name: &str, label: &str, component: FieldComponent, required: bool) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        component,
        required,
    }
}

fn action(action_type: ActionType, label: &str, roles: Option<Vec<Role>>) -> Action {
    Action {
        action_type,
        label: label.to_string(),
        role_required: roles,
    }
}

/// The user-list spec as a value, equal to what the fixtures validate to
pub fn sample_spec() -> ScreenSpec {
    ScreenSpec {
        id: "user-list".to_string(),
        title: "Users".to_string(),
        screen_type: ScreenType::DataScreen,
        api: ApiEndpoints {
            list: "/api/users".to_string(),
            create: "/api/users".to_string(),
            delete: "/api/users/:id".to_string(),
        },
        table: TableSpec {
            row_key: "id".to_string(),
            columns: vec![
                column("name", "Name"),
                column("email", "Email"),
                column("role", "Role"),
            ],
        },
        search: SearchSpec {
            placeholder: "Search by name, email or role".to_string(),
        },
        create_form: CreateForm {
            title: "Create user".to_string(),
            fields: vec![
                field("name", "Name", FieldComponent::Input, true),
                field("email", "Email", FieldComponent::Input, true),
                field("role", "Role", FieldComponent::Select, false),
            ],
        },
        actions: vec![
            action(
                ActionType::OpenModal,
                "New user",
                Some(vec![Role::Admin, Role::User]),
            ),
            action(ActionType::Submit, "Save", None),
            action(ActionType::Delete, "Delete", Some(vec![Role::Admin])),
            action(ActionType::Refresh, "Refresh", None),
        ],
    }
}

/// Mock server with default configuration and seed users
pub fn seeded_server() -> Arc<MockServer> {
    Arc::new(MockServer::new(&MockConfig::default()))
}

/// Mock server with the given active role
pub fn server_as(role: Role) -> Arc<MockServer> {
    let server = seeded_server();
    server.scenarios().set_role(role);
    server
}

/// Write both fixture documents under `<root>/spec/`
pub fn write_public_dir(root: &Path) -> std::io::Result<()> {
    let spec_dir = root.join("spec");
    std::fs::create_dir_all(&spec_dir)?;
    std::fs::write(spec_dir.join("user-list.screen.json"), fixtures::USER_LIST_JSON)?;
    std::fs::write(spec_dir.join("user-list.screen.yaml"), fixtures::USER_LIST_YAML)?;
    Ok(())
}
