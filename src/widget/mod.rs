//! Widget extension runtime: its own policy copy and timeline builder.

pub mod policy;
pub mod timeline;
