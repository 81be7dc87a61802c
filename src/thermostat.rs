use crate::core::timeseries::TimeSeries;
use crate::core::units::is_plausible_hourly_runtime;
use crate::errors::{DemandError, DemandResult};
use crate::seasons::{cooling_seasons, heating_seasons, Season};
use indexmap::IndexMap;
use strum::Display;
use tracing::{debug, warn};

pub const SS_HEAT_PUMP_HEATING: &str = "ss_heat_pump_heating";
pub const SS_HEAT_PUMP_COOLING: &str = "ss_heat_pump_cooling";
pub const AUXILIARY_HEAT: &str = "auxiliary_heat";
pub const EMERGENCY_HEAT: &str = "emergency_heat";
pub const SS_HEATING: &str = "ss_heating";
pub const SS_CENTRAL_AC: &str = "ss_central_ac";

/// HVAC equipment configurations, numbered as thermostat telemetry reports them.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum EquipmentType {
    /// e.g. multi-zone, multi-stage or modulating equipment; not used for regression
    Other = 0,
    HeatPumpWithAuxiliaryHeat = 1,
    HeatPumpWithoutAuxiliaryHeat = 2,
    HeatingWithCentralAc = 3,
    HeatingWithoutCentralAc = 4,
    CentralAcWithoutHeating = 5,
}

impl EquipmentType {
    /// Runtime column that measures heating demand for this equipment.
    pub fn heating_column(&self) -> Option<&'static str> {
        match self {
            EquipmentType::HeatPumpWithAuxiliaryHeat
            | EquipmentType::HeatPumpWithoutAuxiliaryHeat => Some(SS_HEAT_PUMP_HEATING),
            EquipmentType::HeatingWithCentralAc | EquipmentType::HeatingWithoutCentralAc => {
                Some(SS_HEATING)
            }
            EquipmentType::Other | EquipmentType::CentralAcWithoutHeating => None,
        }
    }

    /// Runtime column that measures cooling demand for this equipment.
    pub fn cooling_column(&self) -> Option<&'static str> {
        match self {
            EquipmentType::HeatPumpWithAuxiliaryHeat
            | EquipmentType::HeatPumpWithoutAuxiliaryHeat => Some(SS_HEAT_PUMP_COOLING),
            EquipmentType::HeatingWithCentralAc | EquipmentType::CentralAcWithoutHeating => {
                Some(SS_CENTRAL_AC)
            }
            EquipmentType::Other | EquipmentType::HeatingWithoutCentralAc => None,
        }
    }

    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![];
        columns.extend(self.heating_column());
        columns.extend(self.cooling_column());
        if *self == EquipmentType::HeatPumpWithAuxiliaryHeat {
            columns.extend([AUXILIARY_HEAT, EMERGENCY_HEAT]);
        }
        columns
    }
}

impl TryFrom<u8> for EquipmentType {
    type Error = DemandError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => EquipmentType::Other,
            1 => EquipmentType::HeatPumpWithAuxiliaryHeat,
            2 => EquipmentType::HeatPumpWithoutAuxiliaryHeat,
            3 => EquipmentType::HeatingWithCentralAc,
            4 => EquipmentType::HeatingWithoutCentralAc,
            5 => EquipmentType::CentralAcWithoutHeating,
            _ => return Err(DemandError::InvalidEquipmentType(value)),
        })
    }
}

/// Hourly telemetry for one thermostat. Every series shares the index of `temperature_in`.
#[derive(Clone, Debug)]
pub struct Thermostat {
    id: String,
    equipment_type: EquipmentType,
    temperature_in: TimeSeries,
    temperature_setpoint: TimeSeries,
    temperature_out: TimeSeries,
    runtimes: IndexMap<String, TimeSeries>,
}

impl Thermostat {
    /// Construct a thermostat record
    ///
    /// Arguments:
    /// * `id` - identifier for the thermostat
    /// * `equipment_type` - HVAC configuration, which decides the runtime columns it must have
    /// * `temperature_in` - indoor temperature in °F; its index is the reference index
    /// * `temperature_setpoint` - thermostat setpoint in °F
    /// * `temperature_out` - outdoor temperature in °F
    /// * `runtimes` - seconds run per hour, keyed by column name (e.g. "ss_heat_pump_cooling")
    pub fn new(
        id: impl Into<String>,
        equipment_type: EquipmentType,
        temperature_in: TimeSeries,
        temperature_setpoint: TimeSeries,
        temperature_out: TimeSeries,
        runtimes: IndexMap<String, TimeSeries>,
    ) -> DemandResult<Self> {
        temperature_in.ensure_aligned(&temperature_setpoint, "temperature_setpoint")?;
        temperature_in.ensure_aligned(&temperature_out, "temperature_out")?;
        for (column, runtime) in &runtimes {
            temperature_in.ensure_aligned(runtime, column)?;
        }
        if let Some(missing) = equipment_type
            .required_columns()
            .into_iter()
            .find(|column| !runtimes.contains_key(*column))
        {
            return Err(DemandError::MissingColumn(missing.to_string()));
        }

        let id = id.into();
        for (column, runtime) in &runtimes {
            let implausible = runtime
                .values()
                .iter()
                .filter(|seconds| seconds.is_finite() && !is_plausible_hourly_runtime(**seconds))
                .count();
            if implausible > 0 {
                warn!(
                    thermostat = %id,
                    column = %column,
                    implausible,
                    "Runtime values outside 0-3600 seconds per hour"
                );
            }
        }

        debug!(
            thermostat = %id,
            %equipment_type,
            hours = temperature_in.len(),
            columns = runtimes.len(),
            "Loaded thermostat"
        );

        Ok(Self {
            id,
            equipment_type,
            temperature_in,
            temperature_setpoint,
            temperature_out,
            runtimes,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn equipment_type(&self) -> EquipmentType {
        self.equipment_type
    }

    pub fn temperature_in(&self) -> &TimeSeries {
        &self.temperature_in
    }

    pub fn temperature_setpoint(&self) -> &TimeSeries {
        &self.temperature_setpoint
    }

    pub fn temperature_out(&self) -> &TimeSeries {
        &self.temperature_out
    }

    pub fn runtime(&self, column: &str) -> Option<&TimeSeries> {
        self.runtimes.get(column)
    }

    pub fn heating_runtime(&self) -> Option<&TimeSeries> {
        self.equipment_type
            .heating_column()
            .and_then(|column| self.runtime(column))
    }

    pub fn cooling_runtime(&self) -> Option<&TimeSeries> {
        self.equipment_type
            .cooling_column()
            .and_then(|column| self.runtime(column))
    }

    /// Heating seasons in chronological order; none for equipment without heating.
    pub fn get_heating_seasons(&self) -> Vec<Season> {
        self.heating_runtime().map_or_else(Vec::new, |runtime| {
            heating_seasons(&self.temperature_in, &self.temperature_out, runtime)
        })
    }

    /// Cooling seasons in chronological order; none for equipment without cooling.
    pub fn get_cooling_seasons(&self) -> Vec<Season> {
        self.cooling_runtime().map_or_else(Vec::new, |runtime| {
            cooling_seasons(&self.temperature_in, &self.temperature_out, runtime)
        })
    }
}
