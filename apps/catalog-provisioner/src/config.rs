use core_config::FromEnv;
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Provisioner configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb: MongoConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;

        Ok(Self {
            mongodb,
            environment,
        })
    }
}
