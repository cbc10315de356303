//! Core modules for confman's configuration tree and bookkeeping logs.

pub mod db;
pub mod document;
pub mod error;
pub mod experiment;
pub mod history;
pub mod name;
pub mod store;
pub mod time;
