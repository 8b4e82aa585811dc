// src/lib.rs

//! Terminal front-end for a remote nmap scanning service.

pub mod app;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod event;
pub mod keymap;
pub mod logging;
pub mod ui;
