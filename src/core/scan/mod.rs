//! Scan cursor management

pub mod controller;

pub use controller::CursorController;
