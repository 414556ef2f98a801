//! The mass-fraction formula set.
//!
//! A fixed number of cartridges is collected. The material in each cartridge is split between
//! carbon and the rest according to a fixed carbon-to-material mass ratio. Captured carbon and
//! transport emissions are both reported as CO2.
use super::{CalculationError, RoiRatio, check_finite};
use crate::emissions::{CARBON_MASS_FRACTION_IN_CO2, TripEmissions, round_trip_emissions};
use crate::scenario::MassFractionScenario;
use crate::units::{Dimensionless, Mass};
use crate::vehicle::{VehicleProfileMap, find_vehicle};
use serde::Serialize;

/// The result of a mass-fraction calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassFractionResult {
    /// The number of cartridges collected
    pub num_cartridges: u32,
    /// Carbon held by a single cartridge
    pub carbon_per_cartridge: Mass,
    /// Carbon held by all cartridges
    pub total_carbon_captured: Mass,
    /// CO2 equivalent to the carbon held by all cartridges
    pub total_captured_co2: Mass,
    /// Weight of all cartridges collected on the recovery trip
    pub total_recovery_payload: Mass,
    /// Weight of fresh sorbent and packaging delivered on the distribution trip
    pub total_distribution_payload: Mass,
    /// Fuel consumption and emissions of the recovery trip
    pub recovery_trip: TripEmissions,
    /// Fuel consumption and emissions of the distribution trip
    pub distribution_trip: TripEmissions,
    /// CO2 emitted by the recovery trip
    pub recovery_emissions: Mass,
    /// CO2 emitted by the distribution trip
    pub distribution_emissions: Mass,
    /// CO2 emitted by both trips
    pub total_emissions: Mass,
    /// Ratio of CO2 captured to CO2 emitted
    pub final_ratio: RoiRatio,
}

/// Calculate a scenario using the mass-fraction formula set.
///
/// Both trips cover the scenario's `distance` and use the vehicle profile's payload capacity.
pub fn calculate(
    params: &MassFractionScenario,
    vehicles: &VehicleProfileMap,
) -> Result<MassFractionResult, CalculationError> {
    params.validate()?;
    let vehicle = find_vehicle(vehicles, &params.vehicle_type)?;

    let cartridges = Dimensionless::from(params.num_cartridges);
    let ratio = params.carbon_material_ratio;
    let carbon_per_cartridge = params.material_weight * ratio / (ratio + Dimensionless(1.0));
    let total_carbon_captured = cartridges * carbon_per_cartridge;
    let total_captured_co2 = total_carbon_captured / CARBON_MASS_FRACTION_IN_CO2;

    let total_recovery_payload =
        cartridges * (params.cartridge_weight + params.material_weight);
    let total_distribution_payload = total_carbon_captured
        * params.sorbent_carbon_ratio
        * (Dimensionless(1.0) + params.packaging_fraction);

    let recovery_trip = round_trip_emissions(total_recovery_payload, params.distance, vehicle);
    let distribution_trip =
        round_trip_emissions(total_distribution_payload, params.distance, vehicle);
    let recovery_emissions = recovery_trip.co2_emitted;
    let distribution_emissions = distribution_trip.co2_emitted;
    let total_emissions = recovery_emissions + distribution_emissions;

    check_finite(&[
        ("carbon_per_cartridge", carbon_per_cartridge),
        ("total_carbon_captured", total_carbon_captured),
        ("total_captured_co2", total_captured_co2),
        ("total_recovery_payload", total_recovery_payload),
        ("total_distribution_payload", total_distribution_payload),
        ("recovery_emissions", recovery_emissions),
        ("distribution_emissions", distribution_emissions),
        ("total_emissions", total_emissions),
    ])?;
    let final_ratio = RoiRatio::new(total_captured_co2, total_emissions)?;

    Ok(MassFractionResult {
        num_cartridges: params.num_cartridges,
        carbon_per_cartridge,
        total_carbon_captured,
        total_captured_co2,
        total_recovery_payload,
        total_distribution_payload,
        recovery_trip,
        distribution_trip,
        recovery_emissions,
        distribution_emissions,
        total_emissions,
        final_ratio,
    })
}
