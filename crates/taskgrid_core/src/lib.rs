pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod remote;
pub mod source;
pub mod view;
