use crate::config::{EstimationConfig, IndoorReference};
use crate::core::balance_point::{optimize, DegreeDayEstimate};
use crate::core::degree_days::{Granularity, Mode};
use crate::core::timeseries::TimeSeries;
use crate::errors::{DemandError, DemandResult};
use crate::seasons::Season;
use crate::thermostat::Thermostat;
use strum::{Display, EnumString, IntoStaticStr};
use tracing::debug;

#[derive(Clone, Copy, Debug, Display, EnumString, Eq, IntoStaticStr, PartialEq)]
pub enum DemandMethod {
    #[strum(serialize = "deltaT")]
    DeltaT,
    #[strum(serialize = "dailyavgHDD")]
    DailyAvgHdd,
    #[strum(serialize = "dailyavgCDD")]
    DailyAvgCdd,
    #[strum(serialize = "hourlysumHDD")]
    HourlySumHdd,
    #[strum(serialize = "hourlysumCDD")]
    HourlySumCdd,
}

impl DemandMethod {
    pub fn parse(method: &str) -> DemandResult<Self> {
        method
            .parse()
            .map_err(|_| DemandError::UnknownMethod(method.to_string()))
    }

    /// Degree-day aggregation used by the method, or `None` for the raw temperature difference.
    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            DemandMethod::DeltaT => None,
            DemandMethod::DailyAvgHdd | DemandMethod::DailyAvgCdd => {
                Some(Granularity::DailyAverage)
            }
            DemandMethod::HourlySumHdd | DemandMethod::HourlySumCdd => {
                Some(Granularity::HourlySum)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Demand {
    /// Indoor minus outdoor temperature at each season timestamp. Cooling is not negated.
    DeltaT(TimeSeries),
    DegreeDay(DegreeDayEstimate),
}

impl Demand {
    pub fn as_delta_t(&self) -> Option<&TimeSeries> {
        match self {
            Demand::DeltaT(delta_t) => Some(delta_t),
            Demand::DegreeDay(_) => None,
        }
    }

    pub fn as_degree_day(&self) -> Option<&DegreeDayEstimate> {
        match self {
            Demand::DeltaT(_) => None,
            Demand::DegreeDay(estimate) => Some(estimate),
        }
    }
}

/// Heating demand over a season.
///
/// Arguments:
/// * `thermostat` - telemetry to estimate from
/// * `season` - heating season selecting the timestamps to use
/// * `method` - one of "deltaT", "dailyavgHDD" or "hourlysumHDD" (the CDD spellings pick the
///              same aggregation; heating is implied by this function)
/// * `column_name` - runtime column holding observed heating demand; required for all but
///                   "deltaT"
pub fn get_heating_demand(
    thermostat: &Thermostat,
    season: &Season,
    method: &str,
    column_name: Option<&str>,
) -> DemandResult<Demand> {
    get_heating_demand_with_config(
        thermostat,
        season,
        method,
        column_name,
        &EstimationConfig::default(),
    )
}

/// Cooling demand over a season. See [`get_heating_demand`] for the arguments.
pub fn get_cooling_demand(
    thermostat: &Thermostat,
    season: &Season,
    method: &str,
    column_name: Option<&str>,
) -> DemandResult<Demand> {
    get_cooling_demand_with_config(
        thermostat,
        season,
        method,
        column_name,
        &EstimationConfig::default(),
    )
}

pub fn get_heating_demand_with_config(
    thermostat: &Thermostat,
    season: &Season,
    method: &str,
    column_name: Option<&str>,
    config: &EstimationConfig,
) -> DemandResult<Demand> {
    estimate_demand(
        thermostat,
        season,
        DemandMethod::parse(method)?,
        column_name,
        Mode::Heating,
        config,
    )
}

pub fn get_cooling_demand_with_config(
    thermostat: &Thermostat,
    season: &Season,
    method: &str,
    column_name: Option<&str>,
    config: &EstimationConfig,
) -> DemandResult<Demand> {
    estimate_demand(
        thermostat,
        season,
        DemandMethod::parse(method)?,
        column_name,
        Mode::Cooling,
        config,
    )
}

pub fn estimate_demand(
    thermostat: &Thermostat,
    season: &Season,
    method: DemandMethod,
    column_name: Option<&str>,
    mode: Mode,
    config: &EstimationConfig,
) -> DemandResult<Demand> {
    let mask = season.mask();
    let temp_in = thermostat.temperature_in().masked(mask)?;
    let temp_out = thermostat.temperature_out().masked(mask)?;

    debug!(
        thermostat = thermostat.id(),
        equipment_type = %thermostat.equipment_type(),
        season = season.name(),
        %method,
        %mode,
        hours = temp_in.len(),
        "Estimating demand"
    );

    let Some(granularity) = method.granularity() else {
        return Ok(Demand::DeltaT(
            temp_in.zip_with(&temp_out, |inside, outside| inside - outside)?,
        ));
    };

    let column_name = column_name.ok_or_else(|| {
        DemandError::MissingColumn(format!("no runtime column given for method {method}"))
    })?;
    let observed = thermostat
        .runtime(column_name)
        .ok_or_else(|| DemandError::MissingColumn(column_name.to_string()))?
        .masked(mask)?;
    let indoor_reference = match config.indoor_reference {
        IndoorReference::TemperatureIn => temp_in,
        IndoorReference::Setpoint => thermostat.temperature_setpoint().masked(mask)?,
    };

    Ok(Demand::DegreeDay(optimize(
        &temp_out,
        &indoor_reference,
        &observed,
        mode,
        granularity,
        config,
    )?))
}
