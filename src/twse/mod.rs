pub mod client;

pub use client::{DailyHistory, StockDayResponse, TwseClient};
