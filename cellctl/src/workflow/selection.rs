//! "No selection" handling for picker fields.
//!
//! Pickers cannot hold an empty value, so each relational field of a form has a sentinel token
//! standing for "nothing selected". Sentinels are a form concern only: [`SelectField::parse`]
//! turns the raw control value into a [`Selection`], and only real ids ever reach storage.

use crate::workflow::validation::ValidationError;
use uuid::Uuid;

/// Picker fields and their sentinel tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectField {
    City,
    Neighborhood,
    Cell,
    Ministry,
    PipelineStage,
    ReferredBy,
    Leader,
}

impl SelectField {
    pub const ALL: [SelectField; 7] = [
        SelectField::City,
        SelectField::Neighborhood,
        SelectField::Cell,
        SelectField::Ministry,
        SelectField::PipelineStage,
        SelectField::ReferredBy,
        SelectField::Leader,
    ];

    pub fn sentinel(&self) -> &'static str {
        match self {
            SelectField::City => "no-city",
            SelectField::Neighborhood => "no-neighborhood",
            SelectField::Cell => "no-cell",
            SelectField::Ministry => "no-ministry",
            SelectField::PipelineStage => "no-stage",
            SelectField::ReferredBy => "no-referral",
            SelectField::Leader => "no-leader",
        }
    }

    /// Field name used in validation errors
    pub fn name(&self) -> &'static str {
        match self {
            SelectField::City => "city_id",
            SelectField::Neighborhood => "neighborhood",
            SelectField::Cell => "cell_id",
            SelectField::Ministry => "ministry_id",
            SelectField::PipelineStage => "pipeline_stage_id",
            SelectField::ReferredBy => "referred_by",
            SelectField::Leader => "leader_id",
        }
    }

    /// Whether a raw control value means "nothing selected"
    pub fn is_blank(&self, raw: &str) -> bool {
        let raw = raw.trim();
        raw.is_empty() || raw == self.sentinel()
    }

    /// Parse a raw control value. Blank or sentinel values are [`Selection::Unselected`];
    /// anything else must be a UUID.
    pub fn parse(&self, raw: &str) -> Result<Selection<Uuid>, ValidationError> {
        if self.is_blank(raw) {
            return Ok(Selection::Unselected);
        }
        Uuid::parse_str(raw.trim())
            .map(Selection::Selected)
            .map_err(|_| ValidationError::InvalidReference {
                field: self.name(),
                value: raw.to_string(),
            })
    }
}

/// Value of an optional relational field at the data layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection<T> {
    #[default]
    Unselected,
    Selected(T),
}

impl<T> Selection<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::Unselected, Selection::Selected)
    }
}

impl<T> From<Selection<T>> for Option<T> {
    fn from(selection: Selection<T>) -> Self {
        selection.into_option()
    }
}

/// Empty or whitespace-only text
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Free text that maps to NULL when blank
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
