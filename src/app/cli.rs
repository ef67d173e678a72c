use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "shopfront")]
#[command(version)]
#[command(about = "A terminal product catalog with favorites and product images", long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a default config file to the given path (or directory) and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<PathBuf>,

    /// TOML catalog file to display (overrides catalog.source)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Items per page (overrides catalog.page_size)
    #[arg(short, long, value_parser = parse_page_size)]
    pub page_size: Option<usize>,
}

/// Parse a strictly positive page size
fn parse_page_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid page size '{}': expected a positive number", s)),
    }
}
