pub mod config;
pub mod error;
pub mod evaluate;
pub mod models;
pub mod predict;
pub mod recommend;
pub mod similarity;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use models::*;
pub use predict::Orientation;
pub use store::{IdIndex, RatingMatrix, Surface, NOT_COMPUTED, UNRATED};

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
