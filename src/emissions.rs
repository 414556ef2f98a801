//! Emissions from the vehicle trips needed to move cartridges and sorbent around.
use crate::units::{Dimensionless, Distance, Fuel, FuelEconomy, Mass};
use crate::vehicle::VehicleProfile;
use log::trace;
use serde::Serialize;

/// The mass fraction of carbon in CO2 (12.011 / 44.009)
pub const CARBON_MASS_FRACTION_IN_CO2: Dimensionless = Dimensionless(0.2729);

/// The breakdown of a single trip's fuel consumption and emissions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripEmissions {
    /// The payload used to interpolate fuel economy
    pub payload: Mass,
    /// The payload as a fraction of the vehicle's capacity, clamped to at most 1
    pub payload_fraction: Dimensionless,
    /// Fuel economy after adjusting for payload
    pub adjusted_efficiency: FuelEconomy,
    /// Fuel (or electricity) consumed over the trip
    pub fuel_consumed: Fuel,
    /// Mass of CO2-equivalent emitted over the trip
    pub co2_emitted: Mass,
}

impl TripEmissions {
    /// Mass of elemental carbon emitted over the trip
    pub fn carbon_emitted(&self) -> Mass {
        self.co2_emitted * CARBON_MASS_FRACTION_IN_CO2
    }
}

/// Calculate the emissions of a vehicle travelling a given distance with a given payload.
///
/// The vehicle's fuel economy is interpolated linearly between its unloaded and loaded ratings
/// according to how full it is. Payloads beyond the vehicle's capacity are treated as a full load.
///
/// The vehicle profile must already have been validated (see [`VehicleProfile::validate`]).
pub fn trip_emissions(payload: Mass, distance: Distance, vehicle: &VehicleProfile) -> TripEmissions {
    let payload_fraction = (payload / vehicle.max_payload_capacity).min(Dimensionless(1.0));
    let efficiency_range = vehicle.loaded_efficiency - vehicle.unloaded_efficiency;
    let adjusted_efficiency = vehicle.unloaded_efficiency + efficiency_range * payload_fraction;
    let fuel_consumed = distance / adjusted_efficiency;
    let co2_emitted = fuel_consumed * vehicle.emission_factor;

    trace!(
        "Trip of {distance} mi with {payload} kg payload: fraction {payload_fraction}, \
        {fuel_consumed} {} consumed, {co2_emitted} kg CO2e emitted",
        vehicle.fuel_type.unit()
    );

    TripEmissions {
        payload,
        payload_fraction,
        adjusted_efficiency,
        fuel_consumed,
        co2_emitted,
    }
}

/// Calculate the emissions of a round trip which delivers (or collects) a total payload.
///
/// The vehicle is loaded on one leg and empty on the other, so half of the total payload is used
/// as the average payload over the whole distance.
pub fn round_trip_emissions(
    total_payload: Mass,
    distance: Distance,
    vehicle: &VehicleProfile,
) -> TripEmissions {
    trip_emissions(total_payload / Dimensionless(2.0), distance, vehicle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{electric_van, gasoline_truck};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0, 20.0)]
    #[case(907.0, 0.5, 17.0)]
    #[case(1814.0, 1.0, 14.0)]
    #[case(5000.0, 1.0, 14.0)] // clamped to a full load
    fn test_trip_emissions_interpolation(
        gasoline_truck: VehicleProfile,
        #[case] payload: f64,
        #[case] expected_fraction: f64,
        #[case] expected_efficiency: f64,
    ) {
        let trip = trip_emissions(Mass(payload), Distance(50.0), &gasoline_truck);
        assert_eq!(trip.payload_fraction, Dimensionless(expected_fraction));
        assert_approx_eq!(
            FuelEconomy,
            trip.adjusted_efficiency,
            FuelEconomy(expected_efficiency)
        );
        assert_approx_eq!(Fuel, trip.fuel_consumed, Fuel(50.0 / expected_efficiency));
        assert_approx_eq!(
            Mass,
            trip.co2_emitted,
            Mass(50.0 / expected_efficiency * 8.89)
        );
    }

    #[rstest]
    fn test_trip_emissions_electric(electric_van: VehicleProfile) {
        let trip = trip_emissions(Mass(0.0), Distance(22.0), &electric_van);
        assert_approx_eq!(Fuel, trip.fuel_consumed, Fuel(10.0), epsilon = 1e-12);
        assert_approx_eq!(Mass, trip.co2_emitted, Mass(5.83), epsilon = 1e-12);
    }

    #[rstest]
    fn test_trip_emissions_zero_distance(gasoline_truck: VehicleProfile) {
        let trip = trip_emissions(Mass(1000.0), Distance(0.0), &gasoline_truck);
        assert_eq!(trip.fuel_consumed, Fuel(0.0));
        assert_eq!(trip.co2_emitted, Mass(0.0));
    }

    #[rstest]
    fn test_trip_emissions_monotonic_in_distance(gasoline_truck: VehicleProfile) {
        let mut last = Mass(0.0);
        for distance in [0.0, 10.0, 25.0, 50.0, 100.0] {
            let emitted =
                trip_emissions(Mass(600.0), Distance(distance), &gasoline_truck).co2_emitted;
            assert!(emitted >= last);
            last = emitted;
        }
    }

    #[rstest]
    fn test_round_trip_emissions_halves_payload(gasoline_truck: VehicleProfile) {
        let round_trip = round_trip_emissions(Mass(1814.0), Distance(50.0), &gasoline_truck);
        assert_eq!(round_trip.payload, Mass(907.0));
        assert_eq!(
            round_trip,
            trip_emissions(Mass(907.0), Distance(50.0), &gasoline_truck)
        );
    }

    #[test]
    fn test_carbon_emitted() {
        let trip = TripEmissions {
            payload: Mass(0.0),
            payload_fraction: Dimensionless(0.0),
            adjusted_efficiency: FuelEconomy(20.0),
            fuel_consumed: Fuel(1.0),
            co2_emitted: Mass(10.0),
        };
        assert_approx_eq!(Mass, trip.carbon_emitted(), Mass(2.729));
    }
}
