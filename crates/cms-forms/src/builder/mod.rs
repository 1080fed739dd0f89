//! Form builder state machine
//!
//! Owns the schema under edit plus per-field view flags. Every transition
//! that changes the schema hands the new schema to the `on_change` listener;
//! the builder itself never persists and never rejects input. Duplicate names
//! and the other structural rules are caught by the validator at submit time.

pub mod clipboard;

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::domain::value_objects::{
    DefaultValue, FieldDefinition, FieldType, FieldValidation, FormSchema,
};

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};

/// Schema change listener
pub type ChangeListener = Box<dyn FnMut(&FormSchema) + Send>;

/// View flags for one field card; never serialized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldViewState {
    pub expanded: bool,
    pub show_validation: bool,
    pub editing_name: bool,
    pub name_draft: String,
}

/// Keys handled while a name is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEditKey {
    Enter,
    Escape,
}

/// Partial update of a field. `None` leaves the member untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub default_value: Option<DefaultValue>,
    pub options: Option<Vec<String>>,
    pub validation: Option<FieldValidation>,
}

impl FieldPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    fn apply(self, field: &mut FieldDefinition) {
        if let Some(name) = self.name {
            field.name = name;
        }
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(label) = self.label {
            field.label = label;
        }
        if self.placeholder.is_some() {
            field.placeholder = self.placeholder;
        }
        if self.required.is_some() {
            field.required = self.required;
        }
        if self.default_value.is_some() {
            field.default_value = self.default_value;
        }
        if self.options.is_some() {
            field.options = self.options;
        }
        if self.validation.is_some() {
            field.validation = self.validation;
        }
    }
}

/// Split comma-separated option text, trimming and dropping empty entries
pub fn parse_options(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

/// Interactive editor for one form schema
#[derive(Default)]
pub struct FormBuilder {
    schema: FormSchema,
    views: HashMap<String, FieldViewState>,
    show_preview: bool,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for FormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBuilder")
            .field("schema", &self.schema)
            .field("views", &self.views)
            .field("show_preview", &self.show_preview)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl FormBuilder {
    /// Start from an initial schema, or an empty one
    pub fn new(initial: Option<FormSchema>) -> Self {
        Self {
            schema: initial.unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Register the schema change listener
    pub fn on_change(mut self, listener: impl FnMut(&FormSchema) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Replace the schema with a new initial schema. Does not notify.
    pub fn load(&mut self, schema: FormSchema) {
        self.views
            .retain(|id, _| schema.fields().iter().any(|f| &f.id == id));
        self.schema = schema;
    }

    /// Append an empty field and return its id
    pub fn add_field(&mut self) -> String {
        let field = FieldDefinition::empty();
        let id = field.id.clone();
        self.schema.fields.push(field);
        self.notify();
        id
    }

    /// Merge `patch` into the field with `id`; unknown ids are ignored
    pub fn update_field(&mut self, id: &str, patch: FieldPatch) -> bool {
        let Some(field) = self.schema.field_mut(id) else {
            return false;
        };
        patch.apply(field);
        self.notify();
        true
    }

    pub fn remove_field(&mut self, id: &str) -> bool {
        let Some(index) = self.schema.position(id) else {
            return false;
        };
        self.schema.fields.remove(index);
        self.views.remove(id);
        self.notify();
        true
    }

    /// Move the dragged field (`active_id`) to the slot of `over_id`
    pub fn reorder(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.schema.position(active_id), self.schema.position(over_id))
        else {
            return false;
        };

        let field = self.schema.fields.remove(from);
        self.schema.fields.insert(to, field);
        self.notify();
        true
    }

    /// Replace a field's options from comma-separated text
    pub fn set_options_from_text(&mut self, id: &str, text: &str) -> bool {
        self.update_field(id, FieldPatch::default().options(parse_options(text)))
    }

    /// Pretty JSON of the current schema
    pub fn preview_json(&self) -> serde_json::Result<String> {
        self.schema.to_pretty_json()
    }

    /// Copy the pretty JSON to `clipboard`. Failures are logged, not returned.
    pub fn copy_schema(&self, clipboard: &mut dyn Clipboard) -> bool {
        let text = match self.preview_json() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to copy schema");
                return false;
            }
        };
        match clipboard.write_text(&text) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to copy schema");
                false
            }
        }
    }

    pub fn view(&self, id: &str) -> FieldViewState {
        self.views.get(id).cloned().unwrap_or_default()
    }

    pub fn show_preview(&self) -> bool {
        self.show_preview
    }

    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if let Some(view) = self.view_mut(id) {
            view.expanded = !view.expanded;
        }
    }

    pub fn toggle_validation(&mut self, id: &str) {
        if let Some(view) = self.view_mut(id) {
            view.show_validation = !view.show_validation;
        }
    }

    /// Enter name editing with the current name as the draft
    pub fn begin_name_edit(&mut self, id: &str) {
        let Some(name) = self.schema.field(id).map(|f| f.name.clone()) else {
            return;
        };
        if let Some(view) = self.view_mut(id) {
            view.editing_name = true;
            view.name_draft = name;
        }
    }

    pub fn set_name_draft(&mut self, id: &str, text: impl Into<String>) {
        if let Some(view) = self.view_mut(id) {
            view.name_draft = text.into();
        }
    }

    /// Save the trimmed draft; the schema only changes if the name differs
    pub fn commit_name_edit(&mut self, id: &str) {
        let Some(current) = self.schema.field(id).map(|f| f.name.clone()) else {
            return;
        };
        let draft = match self.view_mut(id) {
            Some(view) => {
                view.editing_name = false;
                view.name_draft.trim().to_string()
            }
            None => return,
        };
        if draft != current {
            self.update_field(id, FieldPatch::default().name(draft));
        }
    }

    pub fn cancel_name_edit(&mut self, id: &str) {
        let Some(name) = self.schema.field(id).map(|f| f.name.clone()) else {
            return;
        };
        if let Some(view) = self.view_mut(id) {
            view.name_draft = name;
            view.editing_name = false;
        }
    }

    /// Enter saves, Escape cancels
    pub fn name_edit_key(&mut self, id: &str, key: NameEditKey) {
        match key {
            NameEditKey::Enter => self.commit_name_edit(id),
            NameEditKey::Escape => self.cancel_name_edit(id),
        }
    }

    fn view_mut(&mut self, id: &str) -> Option<&mut FieldViewState> {
        self.schema.field(id)?;
        Some(self.views.entry(id.to_string()).or_default())
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.schema);
        }
    }
}
