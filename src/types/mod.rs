pub mod date_range;
pub mod day_category;
pub mod location;
pub mod merged_record;
pub mod summary;
pub mod trend_point;
pub mod weather_point;
