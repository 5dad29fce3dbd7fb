use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;

use crate::clock::{self, ClockTime, Period};
use crate::commands::{cmd_add, cmd_remove, cmd_toggle, AddInput};
use crate::config::Config;
use crate::dial::{self, DialMode};
use crate::grouping::{group_with, older_completed, UndatedPolicy, View};
use crate::models::AnnotatedTask;
use crate::storage::TaskStore;

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
    Picking,
    Confirming,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Pending,
    Completed,
    History,
}

impl ViewMode {
    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Pending => "Pending Tasks",
            ViewMode::Completed => "Completed Tasks",
            ViewMode::History => "Completed History",
        }
    }

    fn next(self) -> ViewMode {
        match self {
            ViewMode::Pending => ViewMode::Completed,
            ViewMode::Completed => ViewMode::History,
            ViewMode::History => ViewMode::Pending,
        }
    }
}

pub enum DisplayItem {
    Header(String, usize), // Title, count
    Task(AnnotatedTask),
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub description: Option<String>,
    pub due: Option<String>,
    pub step: usize, // 0: Name, 1: Description, 2: Due, then the time picker
}

/// State of the clock-face time picker.
pub struct TimePicker {
    pub time: ClockTime,
    pub mode: DialMode,
}

impl Default for TimePicker {
    fn default() -> Self {
        TimePicker { time: ClockTime::midnight(), mode: DialMode::Hours }
    }
}

impl TimePicker {
    /// Moves the selection `steps` marks around the face.
    pub fn step(&mut self, steps: i32) {
        let slot = dial::step_slot(dial::current_slot(self.mode, &self.time), steps);
        let value = dial::slot_value(self.mode, slot);
        let next = match self.mode {
            DialMode::Hours => self.time.with_hour12(value),
            DialMode::Minutes => self.time.with_minute(value),
        };
        if let Ok(t) = next {
            self.time = t;
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            DialMode::Hours => DialMode::Minutes,
            DialMode::Minutes => DialMode::Hours,
        };
    }

    pub fn set_period(&mut self, period: Period) {
        self.time = self.time.with_period(period);
    }
}

pub struct App {
    pub store: TaskStore,
    pub undated: UndatedPolicy,
    pub dial_radius: f64,
    pub display_items: Vec<DisplayItem>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    pub picker: TimePicker,
    pub pending_delete: Option<u64>,
    pub alert: Option<(String, String)>, // Title, message
    pub should_quit: bool,
}

impl App {
    /// Creates a new App instance over an opened store.
    pub fn new(store: TaskStore, cfg: &Config) -> App {
        let mut app = App {
            store,
            undated: cfg.undated,
            dial_radius: cfg.dial_radius,
            display_items: Vec::new(),
            state: TableState::default(),
            view_mode: ViewMode::Pending,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            picker: TimePicker::default(),
            pending_delete: None,
            alert: None,
            should_quit: false,
        };
        app.reload();
        app
    }

    /// Regroups the tasks for the current view.
    pub fn reload(&mut self) {
        self.reload_at(&Local::now());
    }

    pub fn reload_at(&mut self, now: &DateTime<Local>) {
        let buckets = match self.view_mode {
            ViewMode::Pending => group_with(self.store.list(), View::Pending, now, self.undated),
            ViewMode::Completed => group_with(self.store.list(), View::Completed, now, self.undated),
            ViewMode::History => {
                let older = older_completed(self.store.list(), now);
                group_with(&older, View::Completed, now, self.undated)
            }
        };

        self.display_items.clear();
        for bucket in buckets {
            self.display_items.push(DisplayItem::Header(bucket.title, bucket.tasks.len()));
            for t in bucket.tasks {
                self.display_items.push(DisplayItem::Task(t));
            }
        }

        if self.display_items.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.display_items.len() {
                self.state.select(Some(self.display_items.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Id of the task under the cursor, if the cursor is on a task row.
    pub fn selected_task_id(&self) -> Option<u64> {
        match self.state.selected().and_then(|i| self.display_items.get(i)) {
            Some(DisplayItem::Task(t)) => Some(t.task.id),
            _ => None,
        }
    }

    /// Selects the next item in the list.
    pub fn next(&mut self) {
        if self.display_items.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.display_items.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous item in the list.
    pub fn previous(&mut self) {
        if self.display_items.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.display_items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.next();
        self.state.select(None);
        self.reload();
    }

    /// Flips the selected task between pending and completed.
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task_id() else { return };
        if let Err(e) = cmd_toggle(&mut self.store, id, &Local::now()) {
            self.show_alert("Could not update task", e.to_string());
        }
        self.reload();
    }

    /// Asks for confirmation before deleting the selected task.
    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.pending_delete = Some(id);
            self.input_mode = InputMode::Confirming;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.input_mode = InputMode::Normal;
        if let Some(id) = self.pending_delete.take() {
            if let Err(e) = cmd_remove(&mut self.store, id, true) {
                self.show_alert("Could not delete task", e.to_string());
            }
        }
        self.reload();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn show_alert(&mut self, title: &str, message: String) {
        self.alert = Some((title.to_string(), message));
        self.input_mode = InputMode::Alert;
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        if self.view_mode != ViewMode::Pending { return; }
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Handles Enter in the "Add Task" wizard.
    pub fn handle_adding_input(&mut self) {
        let value = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => { // Name
                if value.is_empty() { return; }
                self.add_state.name = value;
            }
            1 => { // Description
                self.add_state.description = Some(value).filter(|d| !d.is_empty());
            }
            2 => { // Due
                if value.is_empty() {
                    self.finish_add(None);
                    return;
                }
                self.add_state.due = Some(value);
                self.picker = TimePicker::default();
                self.input_mode = InputMode::Picking;
            }
            _ => {}
        }
        self.add_state.step += 1;
        self.input_buffer.clear();
    }

    /// Creates the task from the wizard state and the picked time.
    pub fn finish_add(&mut self, time: Option<ClockTime>) {
        let input = AddInput {
            name: self.add_state.name.clone(),
            description: self.add_state.description.clone(),
            due: self.add_state.due.clone(),
            time: time.map(|t| clock::encode(&t)),
        };
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        if let Err(e) = cmd_add(&mut self.store, input, &Local::now(), true) {
            self.show_alert("Invalid task", e.to_string());
        }
        self.reload();
    }

    /// Dispatches one key press according to the current mode.
    pub fn on_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
                KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
                KeyCode::Char('a') => self.start_add(),
                KeyCode::Char('v') | KeyCode::Tab => self.toggle_view(),
                _ => {}
            },
            InputMode::Adding => match key.code {
                KeyCode::Enter => self.handle_adding_input(),
                KeyCode::Esc => {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                KeyCode::Char(c) => self.input_buffer.push(c),
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                _ => {}
            },
            InputMode::Picking => match key.code {
                KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => self.picker.step(1),
                KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => self.picker.step(-1),
                KeyCode::Tab => self.picker.toggle_mode(),
                KeyCode::Char('a') => self.picker.set_period(Period::Am),
                KeyCode::Char('p') => self.picker.set_period(Period::Pm),
                KeyCode::Char(' ') => self.picker.set_period(self.picker.time.period().toggled()),
                KeyCode::Enter => match self.picker.mode {
                    // Picking an hour moves on to the minutes.
                    DialMode::Hours => self.picker.mode = DialMode::Minutes,
                    DialMode::Minutes => self.finish_add(Some(self.picker.time)),
                },
                KeyCode::Char('c') | KeyCode::Esc => self.finish_add(None), // Clear / Cancel
                _ => {}
            },
            InputMode::Confirming => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Esc => self.cancel_delete(),
                _ => {}
            },
            InputMode::Alert => {
                self.alert = None;
                self.input_mode = InputMode::Normal;
            }
        }
    }
}
