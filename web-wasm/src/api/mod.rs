//! 検出サービスAPI

pub mod detection;

pub use detection::DetectionApi;
