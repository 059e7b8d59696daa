//! User-management REST API library.
//!
//! Provides the authentication envelope (token codec, current-user
//! resolution, access policy) and the user CRUD service it protects.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod user;
