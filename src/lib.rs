//! Quire - a reusable sectioned blog application
//!
//! Sections partition a single site blog; authenticated authors write
//! posts, staff manage every post, and readers browse what is published.

pub mod api;
pub mod config;
pub mod db;
pub mod forms;
pub mod models;
pub mod services;
