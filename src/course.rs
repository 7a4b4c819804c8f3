//! Course layout: `exercises/<topic>/src/main.rs` skeletons with numbered
//! `TODO` markers, paired with `solutions/<topic>/src/main.rs`.

pub mod layout;
pub mod todo;

pub use layout::{Course, LayoutIssue, Side, Topic, TopicReport};
pub use todo::{check_todo_order, header_doc, scan_todos, todo_count, TodoMarker, TodoOrderViolation};
