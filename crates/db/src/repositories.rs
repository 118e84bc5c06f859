//! SQL access to the `slots` and `appointments` tables.
//!
//! Every function takes any Postgres executor, so the same statements run
//! against the pool or inside a transaction.

pub mod appointment;
pub mod slot;
