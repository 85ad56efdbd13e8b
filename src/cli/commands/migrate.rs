use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    // Connecting applies any pending migrations
    let store = Store::new(&config.general.database_url).await?;
    store.ping().await?;

    println!("Database is up to date: {}", config.general.database_url);
    Ok(())
}
