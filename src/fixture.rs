//! Fixtures for tests

use crate::calculator::CalculationResult;
use crate::scenario::{MassFractionScenario, SaturationScenario};
use crate::vehicle::{VehicleProfile, VehicleProfileMap, builtin_vehicle_profiles};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!($result.unwrap_err().to_string(), $msg);
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn vehicles() -> VehicleProfileMap {
    builtin_vehicle_profiles()
}

#[fixture]
pub fn gasoline_truck(vehicles: VehicleProfileMap) -> VehicleProfile {
    vehicles["Gasoline Truck"].clone()
}

#[fixture]
pub fn electric_van(vehicles: VehicleProfileMap) -> VehicleProfile {
    vehicles["Electric Van"].clone()
}

#[fixture]
pub fn saturation_scenario() -> SaturationScenario {
    SaturationScenario::default()
}

#[fixture]
pub fn mass_fraction_scenario() -> MassFractionScenario {
    MassFractionScenario::default()
}

/// Assert that every reported quantity is finite and non-negative, apart from an unbounded ROI
pub fn assert_quantities_finite_non_negative(result: &CalculationResult) {
    for quantity in result.quantities() {
        // The ROI ratio is the only dimensionless quantity
        if quantity.unit.is_empty() && result.roi_ratio().is_unbounded() {
            assert_eq!(quantity.value, f64::INFINITY);
            continue;
        }

        assert!(
            quantity.value.is_finite() && quantity.value >= 0.0,
            "{} is {}",
            quantity.name,
            quantity.value
        );
    }
}
