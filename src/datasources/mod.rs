pub mod openmeteo;

pub use openmeteo::{DailyWeather, OpenMeteoClient};
