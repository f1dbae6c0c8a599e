pub mod csv_source;
pub mod generator;

pub use csv_source::CsvOrderSource;
pub use generator::RandomOrderSource;

use crate::config::RunConfig;
use crate::domain::model::Order;
use crate::domain::ports::OrderSource;
use crate::utils::error::Result;

/// The source selected by a run configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Random(RandomOrderSource),
    Csv(CsvOrderSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &RunConfig) -> Self {
        match &config.source.input {
            Some(path) => ConfiguredSource::Csv(CsvOrderSource::new(path.clone())),
            None => ConfiguredSource::Random(RandomOrderSource::new(config.generator.clone())),
        }
    }
}

impl OrderSource for ConfiguredSource {
    fn load(&self) -> Result<Vec<Order>> {
        match self {
            ConfiguredSource::Random(source) => source.load(),
            ConfiguredSource::Csv(source) => source.load(),
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfiguredSource::Random(source) => source.describe(),
            ConfiguredSource::Csv(source) => source.describe(),
        }
    }
}
