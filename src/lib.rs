//! Local-first todo list backend.
//!
//! [`todo_list::TodoList`] owns the task collection and its ordering and
//! selection rules, [`filter`] derives the visible list, and [`store`]
//! persists both tasks and app settings through a [`kv::KeyValueStore`].
//! The `routes_*` modules bind those operations to an HTTP API.

pub mod ai_client;
pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod kv;
pub mod logging;
pub mod models;
pub mod routes_ai;
pub mod routes_tasks;
pub mod routes_view;
pub mod store;
pub mod todo_list;
