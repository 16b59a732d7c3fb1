//! Recurring chores: due-date buckets, recurrence text, grouping and rescheduling.
//!
//! Everything time-dependent takes `now` as an argument; nothing here reads
//! the system clock.

pub mod app;
pub mod calendar;
pub mod config;
pub mod model;
pub mod sync;
pub mod tasks;
pub mod theme;
pub mod ui;
