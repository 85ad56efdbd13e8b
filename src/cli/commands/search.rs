use crate::clients::open_meteo::OpenMeteoClient;
use crate::config::Config;

pub async fn cmd_search_city(config: &Config, query: &str) -> anyhow::Result<()> {
    let client = OpenMeteoClient::new(&config.weather)?;

    println!("Searching for: {query}");
    let cities = client.search_city(query).await?;

    if cities.is_empty() {
        println!("No matching cities.");
        return Ok(());
    }

    for city in cities {
        match city.coordinates() {
            Some((lat, lon)) => println!("• {} ({lat:.4}, {lon:.4})", city.display_name()),
            None => println!("• {}", city.display_name()),
        }
        if let Some(tz) = city.timezone.as_deref() {
            println!("  Timezone: {tz}");
        }
    }

    Ok(())
}
