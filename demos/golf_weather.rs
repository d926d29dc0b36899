//! Golf-booking search interest in 2024 versus Seoul precipitation.
//!
//! Needs `NAVER_CLIENT_ID` and `NAVER_CLIENT_SECRET`, read from the
//! environment or a `.env` file.

use polars::prelude::DataFrame;
use std::env;
use std::path::Path;
use trendwx::{DateRange, KeywordGroup, LocationSpec, Location, TrendWeather};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    configure_polars_display();

    let client = TrendWeather::from_env()?;
    let groups = vec![
        KeywordGroup::single("라운딩")?,
        KeywordGroup::single("골프 예약")?,
        KeywordGroup::single("골프 부킹")?,
        KeywordGroup::single("골프장")?,
    ];
    let range = DateRange::year(2024).ok_or("invalid year")?;

    println!("Fetching {} keyword groups over {}...", groups.len(), range);
    let analysis = client
        .analyze()
        .groups(&groups)
        .range(range)
        .location(LocationSpec::Point(Location::seoul()))
        .call()
        .await?;

    println!(
        "Joined {} records ({} trend dates, {} weather dates without a counterpart)",
        analysis.records.len(),
        analysis.join_stats.trend_dates_dropped,
        analysis.join_stats.weather_dates_dropped
    );

    let daily_path = Path::new("golf_trend_weather_daily_2024.csv");
    let summary_path = Path::new("golf_trend_weather_summary_2024.csv");
    analysis.write_csv(daily_path, summary_path)?;

    let summary: DataFrame = analysis.summary_frame()?;
    println!("{}", summary);
    match &analysis.correlation {
        Ok(r) => println!("Correlation between {} and search ratio: {:.3}", analysis.magnitude, r),
        Err(undefined) => println!("Correlation not computable: {}", undefined),
    }

    println!("- Daily merged CSV: {}", daily_path.display());
    println!("- Summary CSV:      {}", summary_path.display());
    Ok(())
}

fn configure_polars_display() {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
