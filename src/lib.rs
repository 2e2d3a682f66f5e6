pub mod aggregate;
pub mod cli;
pub mod date;
pub mod error;
pub mod filter;
pub mod git;
pub mod model;
pub mod render;
pub mod report;
pub mod scan;
pub mod serve;
pub mod util;
