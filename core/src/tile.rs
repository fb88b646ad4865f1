use serde::{Deserialize, Serialize};

use crate::Label;

/// What the player is allowed to see on a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    /// Not part of the path, never traversable.
    Empty,
    /// Part of the path but its label is hidden.
    Obscured,
    Visible(Label),
}

impl CellView {
    pub const fn label(self) -> Option<Label> {
        match self {
            Self::Visible(label) => Some(label),
            Self::Empty | Self::Obscured => None,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Empty
    }
}
