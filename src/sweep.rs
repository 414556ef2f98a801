//! Recalculating a saturation scenario while varying one parameter.
//!
//! Each parameter has a preset list of options to sweep over, used when the caller doesn't supply
//! their own values.
use crate::calculator::CalculationError;
use crate::calculator::saturation::{self, SaturationResult};
use crate::scenario::SaturationScenario;
use crate::units::{Dimensionless, Distance, Mass};
use crate::vehicle::VehicleProfileMap;
use itertools::Itertools;
use log::info;

/// A numeric parameter of a [`SaturationScenario`] which can be swept
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SweepParameter {
    /// `max_vehicle_payload`
    MaxVehiclePayload,
    /// `recovery_truck_load`
    RecoveryTruckLoad,
    /// `avg_cartridge_saturation`
    AvgCartridgeSaturation,
    /// `sorbent_to_carbon_ratio`
    SorbentToCarbonRatio,
    /// `packaging_fraction`
    PackagingFraction,
    /// `full_cartridge_weight`
    FullCartridgeWeight,
    /// `base_cartridge_weight`
    BaseCartridgeWeight,
    /// `max_carbon_ratio`
    MaxCarbonRatio,
    /// `recovery_distance`
    RecoveryDistance,
    /// `distribution_distance`
    DistributionDistance,
}

impl SweepParameter {
    /// The default values to sweep over
    pub fn options(self) -> &'static [f64] {
        match self {
            Self::MaxVehiclePayload => &[1700.0, 1814.0, 2500.0],
            Self::RecoveryTruckLoad => &[0.50, 0.75, 1.0],
            Self::AvgCartridgeSaturation => &[0.70, 0.85, 1.0],
            Self::SorbentToCarbonRatio => &[1.0, 2.8, 3.3, 4.0, 5.0, 6.7],
            Self::PackagingFraction => &[0.05, 0.10, 0.20],
            Self::FullCartridgeWeight => &[5.0, 10.0, 15.0, 20.0],
            Self::BaseCartridgeWeight => &[0.5, 1.0, 2.0],
            Self::MaxCarbonRatio => &[0.05, 0.08, 0.11, 0.14, 0.17],
            Self::RecoveryDistance | Self::DistributionDistance => &[10.0, 25.0, 50.0, 100.0],
        }
    }

    /// The value of this parameter in the given scenario
    pub fn get(self, scenario: &SaturationScenario) -> f64 {
        match self {
            Self::MaxVehiclePayload => scenario.max_vehicle_payload.value(),
            Self::RecoveryTruckLoad => scenario.recovery_truck_load.value(),
            Self::AvgCartridgeSaturation => scenario.avg_cartridge_saturation.value(),
            Self::SorbentToCarbonRatio => scenario.sorbent_to_carbon_ratio.value(),
            Self::PackagingFraction => scenario.packaging_fraction.value(),
            Self::FullCartridgeWeight => scenario.full_cartridge_weight.value(),
            Self::BaseCartridgeWeight => scenario.base_cartridge_weight.value(),
            Self::MaxCarbonRatio => scenario.max_carbon_ratio.value(),
            Self::RecoveryDistance => scenario.recovery_distance.value(),
            Self::DistributionDistance => scenario.distribution_distance.value(),
        }
    }

    /// A copy of the scenario with this parameter set to `value`
    pub fn with_value(self, scenario: &SaturationScenario, value: f64) -> SaturationScenario {
        let mut scenario = scenario.clone();
        match self {
            Self::MaxVehiclePayload => scenario.max_vehicle_payload = Mass(value),
            Self::RecoveryTruckLoad => scenario.recovery_truck_load = Dimensionless(value),
            Self::AvgCartridgeSaturation => {
                scenario.avg_cartridge_saturation = Dimensionless(value);
            }
            Self::SorbentToCarbonRatio => scenario.sorbent_to_carbon_ratio = Dimensionless(value),
            Self::PackagingFraction => scenario.packaging_fraction = Dimensionless(value),
            Self::FullCartridgeWeight => scenario.full_cartridge_weight = Mass(value),
            Self::BaseCartridgeWeight => scenario.base_cartridge_weight = Mass(value),
            Self::MaxCarbonRatio => scenario.max_carbon_ratio = Dimensionless(value),
            Self::RecoveryDistance => scenario.recovery_distance = Distance(value),
            Self::DistributionDistance => scenario.distribution_distance = Distance(value),
        }

        scenario
    }
}

/// The result of calculating a scenario for one value of the swept parameter
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    /// The value of the swept parameter
    pub value: f64,
    /// The calculation result for this value
    pub result: SaturationResult,
}

/// Recalculate a scenario for each of the given values of a parameter.
///
/// # Arguments
///
/// * `scenario` - The scenario providing values for the parameters which are not swept
/// * `parameter` - The parameter to vary
/// * `values` - The values to use for `parameter`
/// * `vehicles` - Available vehicle profiles
///
/// # Returns
///
/// One [`SweepPoint`] per value, in the same order, or the first error encountered
pub fn sweep(
    scenario: &SaturationScenario,
    parameter: SweepParameter,
    values: &[f64],
    vehicles: &VehicleProfileMap,
) -> Result<Vec<SweepPoint>, CalculationError> {
    info!("Sweeping {parameter} over [{}]", values.iter().join(", "));

    values
        .iter()
        .map(|&value| {
            let scenario = parameter.with_value(scenario, value);
            saturation::calculate(&scenario, vehicles).map(|result| SweepPoint { value, result })
        })
        .collect()
}
