mod data_file;
mod dataset;
mod matching;
mod pipeline;
mod report;

use anyhow::Result;
use data_file::Shape;
use dotenv::dotenv;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::LevelFilter;
use std::path::PathBuf;

#[macro_use]
extern crate log;

lazy_static! {
    static ref DATA_DIR: PathBuf =
        PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
    static ref REPORT_PATH: PathBuf =
        PathBuf::from(std::env::var("REPORT_PATH").unwrap_or_else(|_| "log.txt".to_string()));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // read .env
    dotenv().ok();

    // init logger
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    if log_level == "debug" {
        Builder::new()
            .filter(None, LevelFilter::Off)
            .filter(Some("au_match"), LevelFilter::Debug)
            .init();
    } else if log_level == "info" {
        Builder::new()
            .filter(None, LevelFilter::Off)
            .filter(Some("au_match"), LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }

    info!(
        "match queries in {} against their templates",
        DATA_DIR.display()
    );
    let elapsed = pipeline::run(&DATA_DIR, &REPORT_PATH, Shape::TEMPLATE).await?;
    println!("{}", report::format_time(elapsed));

    Ok(())
}
