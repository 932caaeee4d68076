//! CLI subcommand implementations.

pub mod article;
pub mod articles;
pub mod categories;
pub mod contact;
pub mod editor;
pub mod homepage;
pub mod page;
pub mod picker;
pub mod section;
pub mod serve;
pub mod suggest;
pub mod zip;
