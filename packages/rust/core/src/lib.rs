//! Core domain logic and pipeline orchestration for degreemap.
//!
//! This crate turns raw program markup into program records (requirement
//! resolution, semester templates, assembly) and ties the catalog client and
//! the assembler together into the end-to-end `scrape` workflow.

pub mod assembler;
pub mod pipeline;
pub mod resolver;
pub mod template;
