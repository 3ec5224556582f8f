//! Wire-facing response bodies.

pub mod responses;
