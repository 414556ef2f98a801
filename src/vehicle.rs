//! Vehicles used to transport cartridges and sorbent, and their fuel-economy characteristics.
use crate::calculator::CalculationError;
use crate::units::{EmissionFactor, FuelEconomy, Mass};
use indexmap::IndexMap;
use serde::Serialize;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use unicase::UniCase;

/// The name of the vehicle which is selected if a scenario doesn't specify one
pub const DEFAULT_VEHICLE_TYPE: &str = "Gasoline Truck";

/// The type of fuel (or energy) consumed by a vehicle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, DeserializeLabeledStringEnum, SerializeLabeledStringEnum,
)]
pub enum FuelType {
    /// Fuel is measured in gallons
    #[string = "gasoline"]
    Gasoline,
    /// Fuel is measured in kWh
    #[string = "electric"]
    Electric,
}

impl FuelType {
    /// The unit in which fuel of this type is measured
    pub fn unit(self) -> &'static str {
        match self {
            Self::Gasoline => "gal",
            Self::Electric => "kWh",
        }
    }
}

/// Describes how much fuel a vehicle consumes and how much it emits in doing so.
///
/// Efficiencies are given in miles per unit of fuel (see [`FuelType::unit`]). The efficiency of a
/// partially loaded vehicle is interpolated linearly between the unloaded and loaded values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleProfile {
    /// Fuel economy when carrying no payload
    pub unloaded_efficiency: FuelEconomy,
    /// Fuel economy when carrying the maximum payload
    pub loaded_efficiency: FuelEconomy,
    /// The maximum payload the vehicle can carry
    pub max_payload_capacity: Mass,
    /// Mass of CO2-equivalent emitted per unit of fuel consumed
    pub emission_factor: EmissionFactor,
    /// The type of fuel consumed
    pub fuel_type: FuelType,
}

impl VehicleProfile {
    /// A copy of this profile with a different maximum payload capacity
    pub fn with_max_payload(&self, max_payload_capacity: Mass) -> Self {
        Self {
            max_payload_capacity,
            ..self.clone()
        }
    }

    /// Check that the profile can be used for calculations without producing NaN or infinities
    pub fn validate(&self) -> Result<(), CalculationError> {
        if !(self.max_payload_capacity.is_finite() && self.max_payload_capacity > Mass(0.0)) {
            return Err(CalculationError::InvalidConfiguration(format!(
                "Maximum payload capacity must be a finite number greater than zero (got {})",
                self.max_payload_capacity
            )));
        }

        for (name, efficiency) in [
            ("Unloaded efficiency", self.unloaded_efficiency),
            ("Loaded efficiency", self.loaded_efficiency),
        ] {
            if !(efficiency.is_finite() && efficiency > FuelEconomy(0.0)) {
                return Err(CalculationError::InvalidConfiguration(format!(
                    "{name} must be a finite number greater than zero (got {efficiency})"
                )));
            }
        }

        if !(self.emission_factor.is_finite() && self.emission_factor >= EmissionFactor(0.0)) {
            return Err(CalculationError::InvalidConfiguration(format!(
                "Emission factor must be a finite, non-negative number (got {})",
                self.emission_factor
            )));
        }

        Ok(())
    }
}

/// A map of vehicle profiles, keyed by vehicle name
pub type VehicleProfileMap = IndexMap<String, VehicleProfile>;

/// The vehicles available to scenarios.
///
/// No payload capacity is published for the Electric Van, so 1500 kg is assumed. Saturation
/// scenarios are unaffected, as they take the capacity from `max_vehicle_payload`.
pub fn builtin_vehicle_profiles() -> VehicleProfileMap {
    [
        (
            "Gasoline Truck".to_string(),
            VehicleProfile {
                unloaded_efficiency: FuelEconomy(20.0),
                loaded_efficiency: FuelEconomy(14.0),
                max_payload_capacity: Mass(1814.0),
                emission_factor: EmissionFactor(8.89),
                fuel_type: FuelType::Gasoline,
            },
        ),
        (
            "Electric Van".to_string(),
            VehicleProfile {
                unloaded_efficiency: FuelEconomy(2.2),
                loaded_efficiency: FuelEconomy(1.7),
                max_payload_capacity: Mass(1500.0),
                emission_factor: EmissionFactor(0.583),
                fuel_type: FuelType::Electric,
            },
        ),
    ]
    .into_iter()
    .collect()
}

/// Look up a vehicle by name (ignoring case) and check that its profile is usable.
///
/// # Arguments
///
/// * `vehicles` - Available vehicle profiles
/// * `name` - The name of the vehicle type
///
/// # Returns
///
/// The matching profile or [`CalculationError::InvalidConfiguration`] if it is missing or invalid
pub fn find_vehicle<'a>(
    vehicles: &'a VehicleProfileMap,
    name: &str,
) -> Result<&'a VehicleProfile, CalculationError> {
    let needle = UniCase::new(name);
    let (_, profile) = vehicles
        .iter()
        .find(|(id, _)| UniCase::new(id.as_str()) == needle)
        .ok_or_else(|| {
            CalculationError::InvalidConfiguration(format!("Unknown vehicle type: {name}"))
        })?;

    profile.validate().map_err(|err| match err {
        CalculationError::InvalidConfiguration(msg) => {
            CalculationError::InvalidConfiguration(format!("Vehicle type {name}: {msg}"))
        }
        other => other,
    })?;

    Ok(profile)
}
