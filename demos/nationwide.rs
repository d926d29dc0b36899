//! Averages weather over 19 South Korean cities and profiles how search
//! interest shifts with the weather category of the day.

use chrono::{Duration, Local};
use trendwx::{DateRange, KeywordGroup, LocationSpec, MagnitudeField, Period, TrendWeather};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let client = TrendWeather::from_env()?;
    let groups = vec![
        KeywordGroup::from_comma_separated("umbrella", "우산, 장우산")?,
        KeywordGroup::single("골프")?,
    ];
    let end = Local::now().date_naive() - Duration::days(1);
    let range = DateRange::last_days(end, 90).ok_or("invalid range")?;

    let analysis = client
        .analyze()
        .groups(&groups)
        .range(range)
        .location(LocationSpec::nationwide())
        .magnitude(MagnitudeField::Rain)
        .call()
        .await?;

    let coverage = &analysis.coverage;
    println!(
        "Weather averaged over {}/{} cities",
        coverage.succeeded.len(),
        coverage.attempted()
    );
    for failed in &coverage.failed {
        println!("  {} failed: {}", failed.name, failed.reason);
    }

    println!("\nDays per category:");
    for (category, days) in analysis.day_distribution() {
        println!("  {:<6} {:>3}", category, days);
    }

    println!("\nCategory profile:");
    for profile in analysis.category_profile() {
        let change = profile
            .change_vs_overall_pct
            .map(|pct| format!("{:+.1}%", pct))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:<6} mean {:>6.2} over {:>3} days ({})",
            profile.category, profile.mean_ratio, profile.days, change
        );
    }

    println!("\nWeekly trend:");
    for week in analysis.trend_by_period(Period::Week) {
        let rain = week
            .rain_sum
            .map(|mm| format!("{:.1} mm", mm))
            .unwrap_or_else(|| "n/a".to_string());
        println!("  {} mean {:>6.2}, rain {}", week.label, week.mean_ratio, rain);
    }

    println!("\nPer group:");
    let correlations = analysis.correlation_by_group();
    for (stats, correlation) in analysis.group_statistics().iter().zip(&correlations) {
        let r = match &correlation.coefficient {
            Ok(r) => format!(
                "r = {:.3} ({} {})",
                r,
                trendwx::CorrelationStrength::from_coefficient(*r),
                trendwx::CorrelationDirection::from_coefficient(*r)
            ),
            Err(undefined) => undefined.to_string(),
        };
        println!(
            "  {:<10} mean {:>6.2}, min {:>6.2}, max {:>6.2}; {}",
            stats.group, stats.mean, stats.min, stats.max, r
        );
    }

    Ok(())
}
