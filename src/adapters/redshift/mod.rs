//! Redshift adapter - warehouse access over a postgres connection pool.

mod rows;
mod warehouse;

pub use warehouse::RedshiftWarehouse;
