//! Storage backend implementations.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | (always) | `parking_lot`-guarded tables, for development and tests |
//! | PostgreSQL | `postgres` | deadpool-postgres pool, parameterized SQL |

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;
