//! # Taskday
//!
//! A personal task tracker for the terminal. Pending tasks are grouped by the
//! day they are due ("Today", "Tomorrow", "Mon, Jan 8", "No Date"), completed
//! tasks by how recently they were finished ("Today's completed",
//! "Yesterday's completed", "Previous days").
//!
//! ## Usage
//!
//! ```bash
//! # Interactive mode
//! taskday
//!
//! # Add a task due at 3:05 PM
//! taskday add "Call the plumber" --due 2025-12-01 --time "3:05 PM"
//!
//! # Pending tasks, grouped by day
//! taskday list
//!
//! # Complete, reopen, delete
//! taskday done 3
//! taskday undo 3
//! taskday remove 3
//!
//! # Tasks completed before yesterday
//! taskday history
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved as JSON in your local data directory
//! (`~/.local/share/taskday/tasks.json` on Linux). Set `TASKDAY_DB` or
//! `data-file` in `~/.config/taskday/config.toml` to use another file.

pub mod clock;
pub mod commands;
pub mod config;
pub mod dial;
pub mod grouping;
pub mod models;
pub mod storage;
pub mod tui;
