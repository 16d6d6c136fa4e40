use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use super::SystemError;
use crate::cart::pricing::{FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};
use crate::cart::ShippingPolicy;
use crate::domain::Discount;

pub const CONFIG_FILE: &str = "junimo.yaml";
pub const ENV_PREFIX: &str = "JUNIMO_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON file per store key.
    pub data_dir: PathBuf,
    /// Keep everything in memory; nothing survives the process.
    pub in_memory: bool,
    pub free_shipping_threshold: u64,
    pub flat_shipping_fee: u64,
    /// Discount granted to academic email domains at registration.
    pub academic_discount_percent: u8,
    pub channel_buffer: usize,
    pub latest_orders_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("junimo-data"),
            in_memory: false,
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: FLAT_SHIPPING_FEE,
            academic_discount_percent: 15,
            channel_buffer: 32,
            latest_orders_limit: 5,
        }
    }
}

impl StoreConfig {
    /// Defaults, then the YAML file at `path` if present, then `JUNIMO_*`
    /// environment variables.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, SystemError> {
        let config: Self = figment.extract().map_err(|e| SystemError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load() -> Result<Self, SystemError> {
        Self::from_figment(&Self::figment(CONFIG_FILE))
    }

    /// Memory-backed configuration for tests and demos.
    pub fn in_memory() -> Self {
        Self {
            in_memory: true,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), SystemError> {
        if self.channel_buffer == 0 {
            return Err(SystemError::Config("channel_buffer must be positive".into()));
        }
        self.academic_discount()?;
        Ok(())
    }

    pub fn academic_discount(&self) -> Result<Discount, SystemError> {
        Discount::percent(self.academic_discount_percent).ok_or_else(|| {
            SystemError::Config(format!(
                "academic_discount_percent must be at most 100, got {}",
                self.academic_discount_percent
            ))
        })
    }

    pub fn shipping_policy(&self) -> ShippingPolicy {
        ShippingPolicy {
            flat_fee: self.flat_shipping_fee,
            free_threshold: self.free_shipping_threshold,
        }
    }
}
