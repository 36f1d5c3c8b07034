//! Askdata - Natural-Language Question Answering over a Redshift Warehouse
//!
//! This crate answers analytical questions by retrieving table-metadata
//! context from a vector index and driving a bounded reason/act agent loop
//! that drafts, validates, and executes SQL against the warehouse.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
