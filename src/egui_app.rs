//! Controller, state, and renderer for the egui UI.

pub mod controller;
pub mod state;
pub mod ui;
pub mod view_model;
