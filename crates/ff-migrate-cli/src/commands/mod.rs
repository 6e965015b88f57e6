//! CLI command implementations

pub(crate) mod common;
pub(crate) mod status;
pub(crate) mod up;
