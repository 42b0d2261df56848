//! Data-screen model and interactive session
//!
//! [`ScreenModel`] derives everything a generic data screen shows from a
//! validated [`ScreenSpec`]: permissions, labels, table cells, search and
//! form checks. [`ScreenSession`] drives the screen against the API.

use crate::error::{FormError, SessionError};
use preview_client::{ActivityLog, ApiClient, LogKind};
use preview_spec::{Action, ActionType, Column, FieldComponent, FormField, Role, ScreenSpec};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Label used when the create action has none
pub const DEFAULT_CREATE_LABEL: &str = "Create";
/// Label used when the delete action has none
pub const DEFAULT_DELETE_LABEL: &str = "Delete";

/// Screen derived from a spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenModel {
    spec: ScreenSpec,
}

impl ScreenModel {
    /// Create model for `spec`
    #[inline]
    #[must_use]
    pub fn new(spec: ScreenSpec) -> Self {
        Self { spec }
    }

    /// Underlying spec
    #[must_use]
    pub fn spec(&self) -> &ScreenSpec {
        &self.spec
    }

    /// First `openModal` action
    #[must_use]
    pub fn create_action(&self) -> Option<&Action> {
        self.spec.action(ActionType::OpenModal)
    }

    /// First `delete` action
    #[must_use]
    pub fn delete_action(&self) -> Option<&Action> {
        self.spec.action(ActionType::Delete)
    }

    /// Whether `role` may open the create form
    ///
    /// A spec without an `openModal` action places no restriction.
    #[must_use]
    pub fn can_create(&self, role: Role) -> bool {
        self.create_action().map_or(true, |a| a.permits(role))
    }

    /// Whether `role` may delete rows
    ///
    /// Also false when the spec has no delete endpoint.
    #[must_use]
    pub fn can_delete(&self, role: Role) -> bool {
        !self.spec.api.delete.is_empty() && self.delete_action().map_or(true, |a| a.permits(role))
    }

    /// Create button label
    #[must_use]
    pub fn create_label(&self) -> &str {
        label_or(self.create_action(), DEFAULT_CREATE_LABEL)
    }

    /// Delete button label
    #[must_use]
    pub fn delete_label(&self) -> &str {
        label_or(self.delete_action(), DEFAULT_DELETE_LABEL)
    }

    /// Delete endpoint for one record
    #[must_use]
    pub fn delete_path(&self, id: &str) -> String {
        self.spec.api.delete_path(id)
    }

    /// Extract rows from a listing body: `users`, else `items`, else none
    #[must_use]
    pub fn rows_from_payload(payload: &Value) -> Vec<Value> {
        ["users", "items"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default()
    }

    /// Rows whose JSON text contains `query`, ignoring case
    ///
    /// A blank query keeps every row.
    #[must_use]
    pub fn filter(rows: &[Value], query: &str) -> Vec<Value> {
        if query.trim().is_empty() {
            return rows.to_vec();
        }
        let needle = query.to_lowercase();
        rows.iter()
            .filter(|row| row.to_string().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Check create-form values against the spec's required fields
    ///
    /// # Errors
    /// `FormError::MissingField` for the first required field that is
    /// absent, null or an empty string.
    pub fn validate_form(&self, values: &Map<String, Value>) -> Result<(), FormError> {
        let missing = self
            .spec
            .create_form
            .fields
            .iter()
            .filter(|field| field.required)
            .find(|field| is_blank(values.get(&field.name)));

        match missing {
            Some(field) => Err(FormError::MissingField {
                name: field.name.clone(),
                label: field.label.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Choices offered by a form field (roles for `select`, none for `input`)
    #[must_use]
    pub fn field_options(field: &FormField) -> &'static [Role] {
        match field.component {
            FieldComponent::Select => &Role::ALL,
            FieldComponent::Input => &[],
        }
    }

    /// Column header texts
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.spec.table.columns.iter().map(|c| c.title.as_str()).collect()
    }

    /// Display text for one cell
    #[must_use]
    pub fn cell_text(row: &Value, column: &Column) -> String {
        match row.get(&column.data_index) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Table body: one line of cell texts per row
    #[must_use]
    pub fn table(&self, rows: &[Value]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| {
                self.spec
                    .table
                    .columns
                    .iter()
                    .map(|column| Self::cell_text(row, column))
                    .collect()
            })
            .collect()
    }

    /// Row key value of `row`
    #[must_use]
    pub fn row_key(&self, row: &Value) -> Option<String> {
        match row.get(&self.spec.table.row_key)? {
            Value::String(key) => Some(key.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

fn label_or<'a>(action: Option<&'a Action>, fallback: &'a str) -> &'a str {
    action
        .map(|a| a.label.as_str())
        .filter(|label| !label.is_empty())
        .unwrap_or(fallback)
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Interactive session over one screen
///
/// Holds the last listing and the current search text. Mutations are
/// refused locally when the active role is not allowed and are followed by
/// a fresh listing when they succeed.
#[derive(Debug)]
pub struct ScreenSession {
    model: ScreenModel,
    client: ApiClient,
    role: Role,
    rows: Vec<Value>,
    query: String,
}

impl ScreenSession {
    /// Open a session; records `open screen <id>` in the activity log
    #[must_use]
    pub fn open(model: ScreenModel, client: ApiClient, role: Role) -> Self {
        client.log().ui(format!("open screen {}", model.spec().id));
        Self {
            model,
            client,
            role,
            rows: Vec::new(),
            query: String::new(),
        }
    }

    /// Screen model
    #[must_use]
    pub fn model(&self) -> &ScreenModel {
        &self.model
    }

    /// Activity log shared with the client
    #[must_use]
    pub fn log(&self) -> &Arc<ActivityLog> {
        self.client.log()
    }

    /// Active role
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Switch the active role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Replace the search text
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Last listing, unfiltered
    #[must_use]
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Last listing filtered by the search text
    #[must_use]
    pub fn visible_rows(&self) -> Vec<Value> {
        ScreenModel::filter(&self.rows, &self.query)
    }

    /// Reload the listing
    ///
    /// # Errors
    /// `SessionError::Client` if the list call fails; rows are kept.
    pub async fn refresh(&mut self) -> Result<&[Value], SessionError> {
        let payload: Value = self.client.get(&self.model.spec().api.list).await?;
        self.rows = ScreenModel::rows_from_payload(&payload);
        tracing::debug!(screen = %self.model.spec().id, rows = self.rows.len(), "listing refreshed");
        Ok(&self.rows)
    }

    /// Submit the create form, then reload
    ///
    /// A failed reload does not fail the create.
    ///
    /// # Errors
    /// - `SessionError::NotPermitted` if the role may not create
    /// - `SessionError::Form` if a required field is missing
    /// - `SessionError::Client` if the create call fails
    pub async fn create(&mut self, values: Map<String, Value>) -> Result<Value, SessionError> {
        if !self.model.can_create(self.role) {
            return Err(SessionError::NotPermitted {
                action: self.model.create_label().to_string(),
                role: self.role,
            });
        }
        self.model.validate_form(&values)?;

        let body = Value::Object(values);
        self.client
            .log()
            .push(LogKind::Ui, "create submit", Some(body.clone()));
        let created: Value = self
            .client
            .post(&self.model.spec().api.create, &body)
            .await?;
        self.refresh_after("create").await;
        Ok(created)
    }

    /// Delete one record, then reload
    ///
    /// A failed reload does not fail the delete.
    ///
    /// # Errors
    /// - `SessionError::NotPermitted` if the role may not delete
    /// - `SessionError::Client` if the delete call fails
    pub async fn delete(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.model.can_delete(self.role) {
            return Err(SessionError::NotPermitted {
                action: self.model.delete_label().to_string(),
                role: self.role,
            });
        }
        self.client.log().ui(format!("delete clicked for {id}"));
        let _: Value = self.client.delete(&self.model.delete_path(id)).await?;
        self.refresh_after("delete").await;
        Ok(())
    }

    // The mutation already happened; a failed reload keeps the old rows
    // and is only logged.
    async fn refresh_after(&mut self, operation: &str) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(screen = %self.model.spec().id, operation, error = %e, "reload failed");
            self.client
                .log()
                .ui(format!("reload after {operation} failed: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_test_utils::sample_spec;
    use serde_json::json;

    fn model() -> ScreenModel {
        ScreenModel::new(sample_spec())
    }

    #[test]
    fn permissions_follow_role_required() {
        let model = model();
        assert!(model.can_create(Role::Admin));
        assert!(model.can_create(Role::User));
        assert!(!model.can_create(Role::Guest));
        assert!(model.can_delete(Role::Admin));
        assert!(!model.can_delete(Role::User));
    }

    #[test]
    fn missing_actions_allow_everyone() {
        let mut spec = sample_spec();
        spec.actions.clear();
        let model = ScreenModel::new(spec);
        assert!(model.can_create(Role::Guest));
        assert!(model.can_delete(Role::Guest));
        assert_eq!(model.create_label(), DEFAULT_CREATE_LABEL);
        assert_eq!(model.delete_label(), DEFAULT_DELETE_LABEL);
    }

    #[test]
    fn empty_delete_endpoint_disables_delete() {
        let mut spec = sample_spec();
        spec.api.delete = String::new();
        assert!(!ScreenModel::new(spec).can_delete(Role::Admin));
    }

    #[test]
    fn delete_path_substitutes_id() {
        assert_eq!(model().delete_path("u-7"), "/api/users/u-7");
    }

    #[test]
    fn rows_prefer_users_then_items() {
        let both = json!({ "users": [{"id": "a"}], "items": [{"id": "b"}] });
        assert_eq!(ScreenModel::rows_from_payload(&both), vec![json!({"id": "a"})]);

        let items = json!({ "items": [{"id": "b"}] });
        assert_eq!(ScreenModel::rows_from_payload(&items), vec![json!({"id": "b"})]);

        assert!(ScreenModel::rows_from_payload(&json!({ "ok": true })).is_empty());
    }

    #[test]
    fn filter_is_case_insensitive_over_whole_row() {
        let rows = vec![
            json!({"id": "u-1", "name": "Alice Johnson", "role": "admin"}),
            json!({"id": "u-2", "name": "Bob Smith", "role": "user"}),
        ];
        assert_eq!(ScreenModel::filter(&rows, "ALICE").len(), 1);
        assert_eq!(ScreenModel::filter(&rows, "admin").len(), 1);
        assert_eq!(ScreenModel::filter(&rows, "u-").len(), 2);
        assert_eq!(ScreenModel::filter(&rows, "   ").len(), 2);
        assert!(ScreenModel::filter(&rows, "zed").is_empty());
    }

    #[test]
    fn form_requires_required_fields() {
        let model = model();
        let mut values = Map::new();
        values.insert("name".to_string(), json!("Carol"));
        values.insert("email".to_string(), json!(""));

        let err = model.validate_form(&values).unwrap_err();
        assert_eq!(
            err,
            FormError::MissingField {
                name: "email".to_string(),
                label: "Email".to_string(),
            }
        );

        values.insert("email".to_string(), json!("carol@example.com"));
        assert!(model.validate_form(&values).is_ok());
    }

    #[test]
    fn table_cells_render_values() {
        let model = model();
        let rows = vec![json!({"name": "Alice", "email": null, "role": "admin"})];
        assert_eq!(model.headers(), ["Name", "Email", "Role"]);
        assert_eq!(model.table(&rows), vec![vec!["Alice", "", "admin"]]);
        assert_eq!(model.row_key(&json!({"id": 5})), Some("5".to_string()));
    }

    #[test]
    fn select_fields_offer_roles() {
        let spec = sample_spec();
        let role_field = spec
            .create_form
            .fields
            .iter()
            .find(|f| f.component == FieldComponent::Select)
            .unwrap();
        assert_eq!(ScreenModel::field_options(role_field), &Role::ALL);
    }
}
