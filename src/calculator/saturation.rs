//! The saturation formula set.
//!
//! The recovery vehicle collects as many cartridges as fit within its payload limit (scaled by how
//! full the trip is). Each cartridge holds a fraction of its maximum carbon content according to
//! its saturation. The distribution trip then delivers enough fresh sorbent, plus packaging, to
//! capture the same mass of carbon again.
//!
//! All masses of captured and emitted carbon are elemental carbon.
use super::{CalculationError, RoiRatio, check_finite};
use crate::emissions::{TripEmissions, round_trip_emissions};
use crate::scenario::SaturationScenario;
use crate::units::{Dimensionless, Mass};
use crate::vehicle::{VehicleProfileMap, find_vehicle};
use log::debug;
use serde::Serialize;

/// The result of a saturation calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaturationResult {
    /// The number of fully saturated cartridges the vehicle could carry
    pub max_possible_cartridges: u32,
    /// The number of cartridges on the recovery trip
    pub actual_number_of_cartridges: u32,
    /// Carbon held by a fully saturated cartridge
    pub max_carbon_per_cartridge: Mass,
    /// Carbon held by a cartridge at the average saturation
    pub actual_carbon_per_cartridge: Mass,
    /// Weight of all cartridges collected on the recovery trip
    pub total_recovery_payload: Mass,
    /// Weight of fresh sorbent and packaging delivered on the distribution trip
    pub total_distribution_payload: Mass,
    /// Carbon returned to the hub by the recovery trip
    pub total_carbon_captured: Mass,
    /// Fuel consumption and emissions of the recovery trip
    pub recovery_trip: TripEmissions,
    /// Fuel consumption and emissions of the distribution trip
    pub distribution_trip: TripEmissions,
    /// Carbon emitted by the recovery trip
    pub recovery_emissions: Mass,
    /// Carbon emitted by the distribution trip
    pub distribution_emissions: Mass,
    /// Carbon emitted by both trips
    pub total_carbon_emissions: Mass,
    /// Ratio of carbon captured to carbon emitted
    pub roi_ratio: RoiRatio,
}

/// Round a non-negative number of cartridges down to a whole number
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_cartridges(name: &str, count: Dimensionless) -> Result<u32, CalculationError> {
    let count = count.value().floor();
    if !(0.0..=f64::from(u32::MAX)).contains(&count) {
        return Err(CalculationError::InvalidInput(format!(
            "{name} is out of range (got {count})"
        )));
    }

    Ok(count as u32)
}

/// Calculate a scenario using the saturation formula set.
///
/// The vehicle's payload capacity is taken from the scenario's `max_vehicle_payload` rather than
/// from the vehicle profile.
pub fn calculate(
    params: &SaturationScenario,
    vehicles: &VehicleProfileMap,
) -> Result<SaturationResult, CalculationError> {
    params.validate()?;
    let vehicle = find_vehicle(vehicles, &params.vehicle_type)?
        .with_max_payload(params.max_vehicle_payload);
    vehicle.validate()?;

    let max_possible_cartridges = whole_cartridges(
        "max_possible_cartridges",
        params.max_vehicle_payload / params.full_cartridge_weight,
    )?;
    let actual_number_of_cartridges = whole_cartridges(
        "actual_number_of_cartridges",
        Dimensionless::from(max_possible_cartridges) * params.recovery_truck_load,
    )?;
    let cartridges = Dimensionless::from(actual_number_of_cartridges);
    debug!(
        "{actual_number_of_cartridges} of {max_possible_cartridges} possible cartridges collected"
    );

    // Carbon captured
    let max_contents_weight = params.full_cartridge_weight - params.base_cartridge_weight;
    let max_carbon_per_cartridge = max_contents_weight * params.max_carbon_ratio;
    let actual_carbon_per_cartridge = max_carbon_per_cartridge * params.avg_cartridge_saturation;
    let total_carbon_captured = cartridges * actual_carbon_per_cartridge;

    // Payloads
    let actual_contents_weight = max_contents_weight * params.avg_cartridge_saturation;
    let reclaimed_cartridge_weight = params.base_cartridge_weight + actual_contents_weight;
    let total_recovery_payload = cartridges * reclaimed_cartridge_weight;
    let total_distribution_payload = total_carbon_captured
        * params.sorbent_to_carbon_ratio
        * (Dimensionless(1.0) + params.packaging_fraction);

    // Emissions
    let recovery_trip =
        round_trip_emissions(total_recovery_payload, params.recovery_distance, &vehicle);
    let distribution_trip = round_trip_emissions(
        total_distribution_payload,
        params.distribution_distance,
        &vehicle,
    );
    let recovery_emissions = recovery_trip.carbon_emitted();
    let distribution_emissions = distribution_trip.carbon_emitted();
    let total_carbon_emissions = recovery_emissions + distribution_emissions;

    check_finite(&[
        ("max_carbon_per_cartridge", max_carbon_per_cartridge),
        ("actual_carbon_per_cartridge", actual_carbon_per_cartridge),
        ("total_carbon_captured", total_carbon_captured),
        ("total_recovery_payload", total_recovery_payload),
        ("total_distribution_payload", total_distribution_payload),
        ("recovery_emissions", recovery_emissions),
        ("distribution_emissions", distribution_emissions),
        ("total_carbon_emissions", total_carbon_emissions),
    ])?;
    let roi_ratio = RoiRatio::new(total_carbon_captured, total_carbon_emissions)?;

    Ok(SaturationResult {
        max_possible_cartridges,
        actual_number_of_cartridges,
        max_carbon_per_cartridge,
        actual_carbon_per_cartridge,
        total_recovery_payload,
        total_distribution_payload,
        total_carbon_captured,
        recovery_trip,
        distribution_trip,
        recovery_emissions,
        distribution_emissions,
        total_carbon_emissions,
        roi_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, saturation_scenario, vehicles};
    use crate::units::Distance;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_calculate_default_scenario(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        let result = calculate(&saturation_scenario, &vehicles).unwrap();
        assert_eq!(result.max_possible_cartridges, 181);
        assert_eq!(result.actual_number_of_cartridges, 135);
        assert_approx_eq!(Mass, result.max_carbon_per_cartridge, Mass(1.26));
        assert_approx_eq!(Mass, result.actual_carbon_per_cartridge, Mass(1.071));
        assert_approx_eq!(
            Mass,
            result.total_carbon_captured,
            Mass(144.585),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Mass,
            result.total_recovery_payload,
            Mass(1167.75),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Mass,
            result.total_distribution_payload,
            Mass(524.84355),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Dimensionless,
            result.recovery_trip.payload_fraction,
            Dimensionless(0.321_871_554_575_523_6),
            epsilon = 1e-12
        );
        assert_approx_eq!(
            Mass,
            result.recovery_emissions,
            Mass(6.713_464_474_055_543),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Mass,
            result.distribution_emissions,
            Mass(6.340_370_864_340_436),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Mass,
            result.total_carbon_emissions,
            Mass(13.053_835_338_395_977),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            f64,
            result.roi_ratio.value(),
            11.076_055_140_263_955,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_calculate_zero_distance(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        let scenario = SaturationScenario {
            recovery_distance: Distance(0.0),
            distribution_distance: Distance(0.0),
            ..saturation_scenario
        };
        let result = calculate(&scenario, &vehicles).unwrap();
        assert_eq!(result.total_carbon_emissions, Mass(0.0));
        assert!(result.total_carbon_captured > Mass(0.0));
        assert_eq!(result.roi_ratio, RoiRatio::Unbounded);
    }

    #[rstest]
    fn test_calculate_empty_truck(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        let scenario = SaturationScenario {
            recovery_truck_load: Dimensionless(0.0),
            ..saturation_scenario
        };
        let result = calculate(&scenario, &vehicles).unwrap();
        assert_eq!(result.actual_number_of_cartridges, 0);
        assert_eq!(result.total_carbon_captured, Mass(0.0));
        assert_eq!(result.total_distribution_payload, Mass(0.0));

        // The truck still has to drive, so the ratio is zero
        assert!(result.total_carbon_emissions > Mass(0.0));
        assert_eq!(result.roi_ratio, RoiRatio::Finite(Dimensionless(0.0)));
    }

    #[rstest]
    fn test_calculate_uses_scenario_payload_capacity(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        let scenario = SaturationScenario {
            max_vehicle_payload: Mass(2500.0),
            ..saturation_scenario
        };
        let result = calculate(&scenario, &vehicles).unwrap();
        assert_eq!(result.max_possible_cartridges, 250);
        assert_eq!(
            result.recovery_trip.payload_fraction,
            result.recovery_trip.payload / Mass(2500.0)
        );
    }

    #[rstest]
    fn test_calculate_distance_monotonic(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        let mut last_recovery = Mass(0.0);
        let mut last_distribution = Mass(0.0);
        for distance in [0.0, 10.0, 25.0, 50.0, 100.0] {
            let scenario = SaturationScenario {
                recovery_distance: Distance(distance),
                distribution_distance: Distance(distance),
                ..saturation_scenario.clone()
            };
            let result = calculate(&scenario, &vehicles).unwrap();
            assert!(result.recovery_emissions >= last_recovery);
            assert!(result.distribution_emissions >= last_distribution);
            last_recovery = result.recovery_emissions;
            last_distribution = result.distribution_emissions;
        }
    }

    #[rstest]
    fn test_calculate_zero_payload_capacity(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        let scenario = SaturationScenario {
            max_vehicle_payload: Mass(0.0),
            ..saturation_scenario
        };
        assert_error!(
            calculate(&scenario, &vehicles),
            "Invalid configuration: Maximum payload capacity must be a finite number greater than \
            zero (got 0)"
        );
    }

    #[rstest]
    fn test_calculate_too_many_cartridges(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        let scenario = SaturationScenario {
            max_vehicle_payload: Mass(1e12),
            full_cartridge_weight: Mass(1e-3),
            base_cartridge_weight: Mass(0.0),
            ..saturation_scenario
        };
        assert!(matches!(
            calculate(&scenario, &vehicles),
            Err(CalculationError::InvalidInput(_))
        ));
    }

    #[rstest]
    fn test_calculate_payload_overflow(
        saturation_scenario: SaturationScenario,
        vehicles: VehicleProfileMap,
    ) {
        // Each parameter is finite, but the distribution payload is not
        let scenario = SaturationScenario {
            sorbent_to_carbon_ratio: Dimensionless(1e308),
            ..saturation_scenario
        };
        assert_error!(
            calculate(&scenario, &vehicles),
            "Invalid input: total_distribution_payload is too large to represent (got inf)"
        );
    }
}
