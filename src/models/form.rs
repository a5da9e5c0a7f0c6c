/// Draft field addressed by UpdateDraftField
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
}

impl Field {
    /// The other field (form focus cycling)
    pub fn next(&self) -> Self {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Name,
        }
    }
}

/// Uncommitted form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    /// Id of the record being edited, None in create mode
    pub editing: Option<u64>,
}

impl Draft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn clear(&mut self) {
        *self = Draft::default();
    }
}

/// Mode of a visible form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u64),
}

/// Form visibility state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Hidden,
    Visible(FormMode),
}

impl FormState {
    pub fn is_visible(&self) -> bool {
        matches!(self, FormState::Visible(_))
    }

    /// Label of the confirm action ("Add" or "Edit")
    pub fn confirm_label(&self) -> &'static str {
        match self {
            FormState::Visible(FormMode::Edit(_)) => "Edit",
            _ => "Add",
        }
    }

    /// Title shown on the form modal
    pub fn title(&self) -> &'static str {
        match self {
            FormState::Visible(FormMode::Edit(_)) => "Edit period",
            _ => "Register period",
        }
    }
}
