use budgetview_tui::{app::App, client::Client, config, error::Result, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;

    let client = Client::from_config(&config)?;
    tracing::info!(endpoint = %client.endpoint(), "starting budgetview");

    let mut app = App::new(client, &config)?;
    app.run().await?;
    Ok(())
}
