use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::RatingScale;
use crate::predict::factorization::DEFAULT_K_FACTORS;
use crate::predict::neighborhood::DEFAULT_K_NEIGHBORS;
use crate::recommend::DEFAULT_TOP_N;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub neighborhood: NeighborhoodConfig,
    pub factorization: FactorizationConfig,
    pub recommend: RecommendConfig,
    pub scale: ScaleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodConfig {
    pub k_neighbors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorizationConfig {
    pub k_factors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub top_n: usize,
    pub exclude_rated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub min_rating: f64,
    pub max_rating: f64,
}

impl ScaleConfig {
    pub fn rating_scale(&self) -> Result<RatingScale> {
        RatingScale::new(self.min_rating, self.max_rating)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            neighborhood: NeighborhoodConfig {
                k_neighbors: DEFAULT_K_NEIGHBORS,
            },
            factorization: FactorizationConfig {
                k_factors: DEFAULT_K_FACTORS,
            },
            recommend: RecommendConfig {
                top_n: DEFAULT_TOP_N,
                exclude_rated: true,
            },
            scale: ScaleConfig {
                min_rating: 1.0,
                max_rating: 5.0,
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("RECSYS"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Rejects zero-valued knobs and inverted rating bounds.
    ///
    /// `k_factors` is additionally checked against the matrix shape when a
    /// factorization run starts, since the shape is not known here.
    pub fn validate(&self) -> Result<()> {
        if self.neighborhood.k_neighbors == 0 {
            return Err(Error::ZeroParameter { name: "k_neighbors" });
        }
        if self.factorization.k_factors == 0 {
            return Err(Error::ZeroParameter { name: "k_factors" });
        }
        if self.recommend.top_n == 0 {
            return Err(Error::ZeroParameter { name: "top_n" });
        }
        self.scale.rating_scale()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.neighborhood.k_neighbors, 10);
        assert_eq!(config.factorization.k_factors, 20);
        assert!(config.recommend.exclude_rated);
    }

    #[test]
    fn test_validate_rejects_zero_knobs() {
        let mut config = Config::default();
        config.recommend.top_n = 0;
        assert_eq!(
            config.validate().unwrap_err(),
            Error::ZeroParameter { name: "top_n" }
        );

        let mut config = Config::default();
        config.scale.max_rating = 0.5;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidRatingScale { .. })
        ));
    }
}
