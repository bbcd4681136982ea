//! Read-only admin dashboard backend for a recommendation system
//!
//! Pages load whole Firestore collections, then search, paginate and render
//! them into JSON view models.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;
