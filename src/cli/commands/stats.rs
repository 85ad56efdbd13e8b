use crate::config::Config;
use crate::db::Store;

pub async fn cmd_stats(config: &Config, limit: usize) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_url).await?;
    let counts = store.city_counts().await?;

    if counts.is_empty() {
        println!("No searches recorded yet.");
        return Ok(());
    }

    println!("Most searched cities:");
    println!("{:-<40}", "");

    for (rank, row) in counts.iter().take(limit).enumerate() {
        println!("{:>3}. {:<28} {:>5}", rank + 1, row.city_name, row.count);
    }

    Ok(())
}
