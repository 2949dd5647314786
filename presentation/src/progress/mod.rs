//! Progress reporting while the crew works

pub mod reporter;
