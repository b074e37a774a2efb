pub mod api;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod diagram;
pub mod error;
pub mod gesture;
pub mod inventory;
pub mod lenient;
pub mod record;
pub mod registry;
pub mod scan;
pub mod scorer;
// cmd and reports belong to the binary (main.rs).
