//! Selected task.

use tasktree::TaskId;

/// The task whose fields the details panel shows.
///
/// Selection is by canonical id, so it survives rebuilds of the forest as
/// long as the task is still loaded.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected_task: Option<TaskId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self { selected_task: None }
    }

    pub fn clear(&mut self) {
        self.selected_task = None;
    }

    pub fn selected_task(&self) -> Option<&TaskId> {
        self.selected_task.as_ref()
    }

    pub fn is_selected(&self, id: &TaskId) -> bool {
        self.selected_task.as_ref() == Some(id)
    }

    /// Selects `id`, or clears the selection when `id` is already selected.
    pub fn toggle_task(&mut self, id: TaskId) {
        if self.is_selected(&id) {
            self.selected_task = None;
        } else {
            self.selected_task = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_task() {
        let mut selection = SelectionState::new();
        selection.toggle_task(TaskId::from("1"));
        assert!(selection.is_selected(&TaskId::from("1")));
        selection.toggle_task(TaskId::from("2"));
        assert_eq!(selection.selected_task(), Some(&TaskId::from("2")));
        selection.toggle_task(TaskId::from("2"));
        assert_eq!(selection.selected_task(), None);
    }
}
