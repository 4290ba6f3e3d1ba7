//! User accounts, token authentication and per-user tags over HTTP.

pub mod db;
pub mod server;
pub mod services;
pub mod version;
pub mod web;
