use std::env::var;

use jira_reporter::run;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    if var("RUST_LOG").is_ok() {
        env_logger::init();
    }
    run().await
}
