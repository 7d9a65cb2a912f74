use ratatui::widgets::TableState;

use crate::draft::{self, TaskDraft};
use crate::models::{resolve_id, Task};
use crate::session::Session;
use crate::toast::{ToastState, ToastType};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

/// Entries collected by the stepwise "Add Task" wizard, kept as raw text
/// until submit. Group and user are resolved against the session caches at
/// the end.
#[derive(Default)]
pub struct AddState {
    pub description: String,
    pub date: String,
    pub time: String,
    pub recurring: String,
    pub group: String,
    pub user: String,
    pub notes: String,
    // 0: Description, 1: Date, 2: Time, 3: Recurrence, 4: Group, 5: User, 6: Notes
    pub step: usize,
}

pub struct App {
    pub session: Session,
    pub toast: ToastState,
    /// Tasks currently on screen, filtered from the session cache.
    pub visible: Vec<Task>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    pub show_completed: bool,
}

impl App {
    /// Wraps an already-authorized session.
    pub fn new(session: Session) -> App {
        let mut app = App {
            session,
            toast: ToastState::new(),
            visible: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            show_completed: false,
        };
        app.reload_visible();
        app
    }

    /// Rebuilds the display list from the session cache and keeps the
    /// selection in range.
    pub fn reload_visible(&mut self) {
        let show_completed = self.show_completed;
        self.visible = self
            .session
            .tasks
            .iter()
            .filter(|t| show_completed || !t.completed)
            .cloned()
            .collect();

        if self.visible.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.visible.len() {
                self.state.select(Some(self.visible.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next task in the list.
    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.visible.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task in the list.
    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.visible.get(i))
    }

    /// Marks the selected task as complete, if it is assigned to the
    /// signed-in user.
    pub fn complete_selected(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        if !self.session.can_modify(&task) {
            self.toast.show(
                ToastType::Warning,
                format!("Task {} is assigned to another user.", task.id),
            );
            return;
        }
        if let Some((kind, message)) = self.session.complete_task(task.id) {
            self.toast.show(kind, message);
        }
        self.reload_visible();
    }

    /// Deletes the selected task, if it is assigned to the signed-in user.
    pub fn delete_selected(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        if !self.session.can_modify(&task) {
            self.toast.show(
                ToastType::Warning,
                format!("Task {} is assigned to another user.", task.id),
            );
            return;
        }
        if let Some((kind, message)) = self.session.delete_task(task.id) {
            self.toast.show(kind, message);
        }
        self.reload_visible();
    }

    /// Re-fetches the task list from the service.
    pub fn refresh(&mut self) {
        if let Err(err) = self.session.refresh_tasks() {
            self.toast.show(ToastType::Error, err.message());
        }
        self.reload_visible();
    }

    /// Toggles the visibility of completed tasks.
    pub fn toggle_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.reload_visible();
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Handles a confirmed line of input based on the current mode.
    pub fn handle_input(&mut self) {
        if self.input_mode == InputMode::Adding {
            self.handle_adding_input();
        }
    }

    /// Advances the "Add Task" wizard. Only the description is required;
    /// every other step may be confirmed empty.
    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                if !self.input_buffer.is_empty() {
                    self.add_state.description = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => {
                self.add_state.date = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => {
                self.add_state.time = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            3 => {
                self.add_state.recurring = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            4 => {
                self.add_state.group = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            5 => {
                self.add_state.user = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            6 => {
                self.add_state.notes = self.input_buffer.clone();
                self.input_buffer.clear();
                self.submit_add();
            }
            _ => {}
        }
    }

    /// Resolves the wizard entries, encodes the draft and submits it.
    /// Validation notices and the mutation outcome surface as toasts.
    fn submit_add(&mut self) {
        let add = std::mem::take(&mut self.add_state);
        self.input_mode = InputMode::Normal;

        let Some(profile) = self.session.profile.clone() else {
            self.toast
                .show(ToastType::Error, "Profile not loaded; try refreshing.".to_string());
            return;
        };

        let assigned_group = if add.group.is_empty() {
            None
        } else {
            match resolve_id(&self.session.groups, &add.group) {
                Some(id) => Some(id),
                None => {
                    self.toast
                        .show(ToastType::Error, format!("Unknown group '{}'.", add.group));
                    return;
                }
            }
        };
        let assigned_user = if add.user.is_empty() {
            None
        } else {
            match resolve_id(&self.session.users, &add.user) {
                Some(id) => Some(id),
                None => {
                    self.toast
                        .show(ToastType::Error, format!("Unknown user '{}'.", add.user));
                    return;
                }
            }
        };

        let task_draft = TaskDraft {
            description: add.description,
            notes: add.notes,
            date: add.date,
            time: add.time,
            recurring: add.recurring,
            assigned_group,
            assigned_user,
        };
        match draft::encode(&task_draft, &profile) {
            Ok(new_task) => {
                if let Some((kind, message)) = self.session.create_task(&new_task) {
                    self.toast.show(kind, message);
                }
                self.reload_visible();
            }
            Err(err) => {
                let (kind, message) = err.notice();
                self.toast.show(kind, message);
            }
        }
    }
}
