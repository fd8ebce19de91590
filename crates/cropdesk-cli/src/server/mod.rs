//! HTTP service exposing the image record store.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
