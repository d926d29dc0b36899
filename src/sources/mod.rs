pub mod config;
pub mod error;
pub mod multi_location;
pub mod naver;
pub mod open_meteo;
pub mod request_cache;
