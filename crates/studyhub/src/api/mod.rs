//! API route handlers

pub mod assays;
pub mod body;
pub mod error;
pub mod studies;
pub mod system;
pub mod viewset;
