//! CLI subcommand implementations for the pagesift binary.

pub mod doctor;
pub mod scrape_cmd;
pub mod serve;
