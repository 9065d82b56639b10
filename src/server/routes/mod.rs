//! Route handlers module.

pub mod control;
pub mod health;
