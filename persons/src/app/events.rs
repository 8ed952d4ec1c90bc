use std::path::PathBuf;

use crate::consts::consts::PersonId;

/// Changes to the person list, handed to every subscriber of the app.
///
/// Front ends use these instead of observing individual person fields.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
    /// A person was appended at `index`
    Added { index: usize, id: PersonId },
    /// The person at `index` was edited in place
    Updated { index: usize, id: PersonId },
    /// The person previously at `index` was removed
    Removed { index: usize, id: PersonId },
    /// The whole list was replaced (initial data, open, new)
    Replaced { count: usize },
    /// The list was written to this file
    Saved(PathBuf),
}

impl ChangeEvent {
    /// Whether the list now differs from what is on disk
    pub fn marks_dirty(&self) -> bool {
        match self {
            ChangeEvent::Added { .. } | ChangeEvent::Updated { .. } | ChangeEvent::Removed { .. } => {
                true
            }
            ChangeEvent::Replaced { .. } | ChangeEvent::Saved(_) => false,
        }
    }
}

pub type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;
