// src/common.rs

pub mod error;
pub mod extract;
pub mod serde_ext;
