use serde::Serialize;

use crate::layer::LayerName;

/// Lifecycle of the layer-data query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    /// Last fetch applied; quiescent until the next one.
    Applied,
    Failed(String),
}

/// Outcome of the most recent save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    /// None of the requested layers had features; no mutation was issued.
    NothingToSave,
    Saved { updated: usize },
    /// The server answered but reported an error for some files.
    PartialFailure(String),
    /// Transport failure; the user was alerted.
    Failed(String),
}

impl SaveStatus {
    /// Status line shown next to the save button.
    pub fn message(&self) -> Option<String> {
        match self {
            SaveStatus::Idle => None,
            SaveStatus::Saving => Some("Saving...".to_string()),
            SaveStatus::NothingToSave => Some("No files to save.".to_string()),
            SaveStatus::Saved { .. } => Some("All changes saved!".to_string()),
            SaveStatus::PartialFailure(msg) => Some(format!("Some files failed: {msg}")),
            SaveStatus::Failed(msg) => Some(format!("Save files failed: {msg}")),
        }
    }
}

/// Identifies one fetch so late results can be told apart from the newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(pub(crate) u64);

/// What a completed fetch did to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    /// Layers whose contents were replaced, with their new feature counts.
    pub applied: Vec<(LayerName, usize)>,
    /// Assets that could not be applied (unknown layer or unreadable GeoJSON).
    pub skipped: Vec<LayerName>,
    /// A newer fetch was issued before this one completed.
    pub superseded: bool,
}
