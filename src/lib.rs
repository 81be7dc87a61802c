pub mod config;
pub mod core;
pub mod errors;
pub mod seasons;
pub mod thermostat;


pub use crate::config::{BalancePointBasis, EstimationConfig, IndoorReference};
pub use crate::core::balance_point::DegreeDayEstimate;
pub use crate::core::degree_days::{Granularity, Mode};
pub use crate::core::demand::{
    get_cooling_demand, get_cooling_demand_with_config, get_heating_demand,
    get_heating_demand_with_config, Demand, DemandMethod,
};
pub use crate::core::timeseries::{SeasonMask, TimeSeries};
pub use crate::errors::{DemandError, DemandResult};
pub use crate::seasons::Season;
pub use crate::thermostat::{EquipmentType, Thermostat};
