//! piab: CRUD service for Prometheus alerts and Alertmanager receivers
//!
//! Records live in MongoDB. A generate call renders the collection into a
//! configuration file and asks the paired server to reload it.

pub mod config;
pub mod controller;
pub mod model;
pub mod server;
pub mod store;
