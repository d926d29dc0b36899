use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trendwx::{join, summarize, Thresholds, TrendPoint, WeatherPoint};

fn fixture() -> (Vec<TrendPoint>, Vec<WeatherPoint>) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let days: Vec<NaiveDate> = (0..366).map(|i| start + Duration::days(i)).collect();

    let weather = days
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let rain = (i % 7) as f64 * 1.5;
            let snow = if i < 60 { (i % 5) as f64 } else { 0.0 };
            WeatherPoint::new(*date, Some(rain + snow), Some(rain), Some(snow))
        })
        .collect();

    let trend = ["golf", "screen golf", "tennis", "ski", "camping"]
        .iter()
        .flat_map(|group| {
            days.iter()
                .enumerate()
                .map(move |(i, date)| TrendPoint::new(*date, *group, (i % 100) as f64))
        })
        .collect();

    (trend, weather)
}

fn bench_engine(c: &mut Criterion) {
    let (trend, weather) = fixture();
    let thresholds = Thresholds::default();
    let joined = join(&trend, &weather, &thresholds);

    c.bench_function("join_year_5_groups", |b| {
        b.iter(|| join(black_box(&trend), black_box(&weather), &thresholds))
    });
    c.bench_function("summarize_year_5_groups", |b| {
        b.iter(|| summarize(black_box(&joined.records)))
    });
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
