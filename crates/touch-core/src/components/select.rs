use crate::finger::FingerId;
use crate::selectable::{SelectableId, SelectableRegistry};

/// What selecting an already selected entity does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReselectType {
    KeepSelected,
    Deselect,
    DeselectAndSelect,
    /// Select again, recording the new finger and refreshing recency.
    #[default]
    SelectAgain,
}

/// Turns picking results into selection changes.
///
/// Picking itself (raycasts, overlap tests) is left to the host, which
/// passes whatever entity it found, or `None`, to [`Select::select`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Select {
    /// Zero means unlimited.
    pub max_selectables: usize,
    pub reselect: ReselectType,
    /// Picking nothing clears the selection.
    pub auto_deselect: bool,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(
        &self,
        registry: &mut SelectableRegistry,
        finger: Option<FingerId>,
        candidate: Option<SelectableId>,
    ) {
        let Some(id) = candidate.filter(|id| registry.contains(*id)) else {
            if self.auto_deselect {
                registry.deselect_all();
            }
            return;
        };

        let hides = registry.config(id).is_some_and(|c| c.hide_with_finger);
        if hides && self.hidden_selection_exists(registry) {
            log::debug!("[select] {:?} blocked by a hidden selection", id);
            return;
        }

        if !registry.is_selected(id) {
            if self.max_selectables > 0 {
                registry.cull(self.max_selectables - 1);
            }
            _ = registry.select(id, finger);
            return;
        }

        match self.reselect {
            ReselectType::KeepSelected => {}
            ReselectType::Deselect => {
                _ = registry.deselect(id);
            }
            ReselectType::DeselectAndSelect => {
                _ = registry.deselect(id);
                if registry.contains(id) {
                    _ = registry.select(id, finger);
                }
            }
            ReselectType::SelectAgain => {
                _ = registry.select(id, finger);
            }
        }
    }

    pub fn deselect_all(&self, registry: &mut SelectableRegistry) {
        registry.deselect_all();
    }

    fn hidden_selection_exists(&self, registry: &SelectableRegistry) -> bool {
        registry.ids().any(|other| {
            registry.config(other).is_some_and(|c| c.hide_with_finger) && registry.is_selected(other)
        })
    }
}
