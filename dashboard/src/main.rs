use anyhow::Result;

use dashboard::{settings::AppSettings, App};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = AppSettings::new()?;

    // Logging is initialized in App::run()
    App::new(settings).run().await?;

    Ok(())
}
