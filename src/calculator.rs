//! The carbon accounting calculator.
//!
//! Two formula sets are provided. They model cartridge contents differently and report results on
//! different bases (elemental carbon vs CO2):
//!
//! * [`FormulaSet::Saturation`]: see [`saturation`]
//! * [`FormulaSet::MassFraction`]: see [`mass_fraction`]
//!
//! Every calculation is a pure function of the scenario and the vehicle profiles supplied.
use crate::scenario::Scenario;
use crate::units::{Dimensionless, Mass};
use crate::vehicle::VehicleProfileMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod mass_fraction;
pub mod saturation;
use mass_fraction::MassFractionResult;
use saturation::SaturationResult;

/// An error which prevents a scenario from being calculated
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum CalculationError {
    /// A vehicle profile is missing or unusable
    #[display("Invalid configuration: {_0}")]
    InvalidConfiguration(String),
    /// A scenario parameter is outside of its domain
    #[display("Invalid input: {_0}")]
    InvalidInput(String),
}

/// This is needed so that `CalculationError` can be treated like standard errors are.
impl std::error::Error for CalculationError {}

/// Check that derived masses haven't overflowed (or become NaN).
///
/// Parameters are validated individually, so very large (but finite) inputs can still combine into
/// a non-finite result.
pub(crate) fn check_finite(masses: &[(&str, Mass)]) -> Result<(), CalculationError> {
    for &(name, mass) in masses {
        if !mass.is_finite() {
            return Err(CalculationError::InvalidInput(format!(
                "{name} is too large to represent (got {mass})"
            )));
        }
    }

    Ok(())
}

/// The named sets of formulae which the calculator can use
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormulaSet {
    /// Saturation-based cartridge loading, reported as elemental carbon
    Saturation,
    /// Fixed mass-fraction split of cartridge contents, reported as CO2
    MassFraction,
}

/// The ratio of mass captured to mass emitted by transport.
///
/// If nothing is emitted, the ratio is unbounded, even if nothing was captured either.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoiRatio {
    /// A finite ratio
    Finite(Dimensionless),
    /// Transport emitted nothing
    Unbounded,
}

impl RoiRatio {
    /// Calculate the ratio of `captured` to `emitted`.
    ///
    /// Fails with [`CalculationError::InvalidInput`] if either mass is not finite or the division
    /// overflows.
    pub fn new(captured: Mass, emitted: Mass) -> Result<Self, CalculationError> {
        check_finite(&[("captured mass", captured), ("emitted mass", emitted)])?;
        if emitted == Mass(0.0) {
            return Ok(Self::Unbounded);
        }

        let ratio = captured / emitted;
        if !ratio.is_finite() {
            return Err(CalculationError::InvalidInput(format!(
                "ROI ratio is too large to represent \
                ({captured} kg captured, {emitted} kg emitted)"
            )));
        }

        Ok(Self::Finite(ratio))
    }

    /// The ratio as an `f64` (`f64::INFINITY` if unbounded)
    pub fn value(self) -> f64 {
        match self {
            Self::Finite(ratio) => ratio.value(),
            Self::Unbounded => f64::INFINITY,
        }
    }

    /// Whether transport emitted nothing
    pub fn is_unbounded(self) -> bool {
        self == Self::Unbounded
    }

    /// How good this ratio is
    pub fn rating(self) -> RoiRating {
        match self {
            Self::Unbounded => RoiRating::Great,
            Self::Finite(Dimensionless(ratio)) if ratio >= 20.0 => RoiRating::Great,
            Self::Finite(Dimensionless(ratio)) if ratio >= 5.0 => RoiRating::Good,
            Self::Finite(Dimensionless(ratio)) if ratio >= 1.0 => RoiRating::Okay,
            Self::Finite(_) => RoiRating::Bad,
        }
    }
}

impl fmt::Display for RoiRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(ratio) => fmt::Display::fmt(ratio, f),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

impl Serialize for RoiRatio {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// A qualitative rating of an [`RoiRatio`].
///
/// Anything below 1 means transport emits more than is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RoiRating {
    /// Ratio below 1
    Bad,
    /// Ratio of at least 1
    Okay,
    /// Ratio of at least 5
    Good,
    /// Ratio of at least 20
    Great,
}

/// A single named output quantity, used for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    /// Name of the quantity
    pub name: &'static str,
    /// Value of the quantity
    pub value: f64,
    /// The unit the value is expressed in
    pub unit: &'static str,
}

impl Quantity {
    fn new(name: &'static str, value: impl Into<f64>, unit: &'static str) -> Self {
        Self {
            name,
            value: value.into(),
            unit,
        }
    }
}

/// The result of calculating a [`Scenario`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationResult {
    /// Result of the saturation formula set
    Saturation(SaturationResult),
    /// Result of the mass-fraction formula set
    MassFraction(MassFractionResult),
}

impl CalculationResult {
    /// The formula set used to produce this result
    pub fn formula_set(&self) -> FormulaSet {
        match self {
            Self::Saturation(_) => FormulaSet::Saturation,
            Self::MassFraction(_) => FormulaSet::MassFraction,
        }
    }

    /// Total mass captured, on the basis used by the formula set (carbon or CO2)
    pub fn captured(&self) -> Mass {
        match self {
            Self::Saturation(result) => result.total_carbon_captured,
            Self::MassFraction(result) => result.total_captured_co2,
        }
    }

    /// Total mass emitted by transport, on the same basis as [`Self::captured`]
    pub fn total_emissions(&self) -> Mass {
        match self {
            Self::Saturation(result) => result.total_carbon_emissions,
            Self::MassFraction(result) => result.total_emissions,
        }
    }

    /// Ratio of captured to emitted mass
    pub fn roi_ratio(&self) -> RoiRatio {
        match self {
            Self::Saturation(result) => result.roi_ratio,
            Self::MassFraction(result) => result.final_ratio,
        }
    }

    /// The intermediate and final quantities of the calculation, in reporting order
    pub fn quantities(&self) -> Vec<Quantity> {
        match self {
            Self::Saturation(result) => vec![
                Quantity::new(
                    "max_possible_cartridges",
                    result.max_possible_cartridges,
                    "units",
                ),
                Quantity::new(
                    "actual_number_of_cartridges",
                    result.actual_number_of_cartridges,
                    "units",
                ),
                Quantity::new("total_recovery_payload", result.total_recovery_payload, "kg"),
                Quantity::new(
                    "total_distribution_payload",
                    result.total_distribution_payload,
                    "kg",
                ),
                Quantity::new("total_carbon_captured", result.total_carbon_captured, "kg C"),
                Quantity::new("recovery_emissions", result.recovery_emissions, "kg C"),
                Quantity::new(
                    "distribution_emissions",
                    result.distribution_emissions,
                    "kg C",
                ),
                Quantity::new("total_carbon_emissions", result.total_carbon_emissions, "kg C"),
                Quantity::new("roi_ratio", result.roi_ratio.value(), ""),
            ],
            Self::MassFraction(result) => vec![
                Quantity::new("num_cartridges", result.num_cartridges, "units"),
                Quantity::new("carbon_per_cartridge", result.carbon_per_cartridge, "kg C"),
                Quantity::new("total_recovery_payload", result.total_recovery_payload, "kg"),
                Quantity::new(
                    "total_distribution_payload",
                    result.total_distribution_payload,
                    "kg",
                ),
                Quantity::new("total_carbon_captured", result.total_carbon_captured, "kg C"),
                Quantity::new("total_captured_co2", result.total_captured_co2, "kg CO2"),
                Quantity::new("recovery_emissions", result.recovery_emissions, "kg CO2"),
                Quantity::new(
                    "distribution_emissions",
                    result.distribution_emissions,
                    "kg CO2",
                ),
                Quantity::new("total_emissions", result.total_emissions, "kg CO2"),
                Quantity::new("final_ratio", result.final_ratio.value(), ""),
            ],
        }
    }
}

/// Calculate a scenario with the formula set it selects.
///
/// # Arguments
///
/// * `scenario` - The scenario parameters
/// * `vehicles` - Available vehicle profiles
///
/// # Returns
///
/// The calculation result, or an error if the scenario is invalid or its vehicle is unusable.
/// Validation happens before any arithmetic.
pub fn calculate(
    scenario: &Scenario,
    vehicles: &VehicleProfileMap,
) -> Result<CalculationResult, CalculationError> {
    debug!(
        "Calculating {} scenario for vehicle type {}",
        scenario.formula_set(),
        scenario.vehicle_type()
    );

    let result = match scenario {
        Scenario::Saturation(params) => {
            CalculationResult::Saturation(saturation::calculate(params, vehicles)?)
        }
        Scenario::MassFraction(params) => {
            CalculationResult::MassFraction(mass_fraction::calculate(params, vehicles)?)
        }
    };

    debug!(
        "Captured {} kg, emitted {} kg, ROI ratio {}",
        result.captured(),
        result.total_emissions(),
        result.roi_ratio()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, assert_quantities_finite_non_negative, vehicles};
    use crate::scenario::{MassFractionScenario, SaturationScenario};
    use crate::units::Distance;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(10.0, 2.0, RoiRatio::Finite(Dimensionless(5.0)))]
    #[case(0.0, 2.0, RoiRatio::Finite(Dimensionless(0.0)))]
    #[case(10.0, 0.0, RoiRatio::Unbounded)]
    #[case(0.0, 0.0, RoiRatio::Unbounded)]
    fn test_roi_ratio_new(#[case] captured: f64, #[case] emitted: f64, #[case] expected: RoiRatio) {
        assert_eq!(RoiRatio::new(Mass(captured), Mass(emitted)).unwrap(), expected);
    }

    #[rstest]
    #[case(1e300, 1e-300)]
    #[case(f64::INFINITY, 2.0)]
    #[case(10.0, f64::NAN)]
    fn test_roi_ratio_new_not_finite(#[case] captured: f64, #[case] emitted: f64) {
        assert!(matches!(
            RoiRatio::new(Mass(captured), Mass(emitted)),
            Err(CalculationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(&[("a", Mass(1.0)), ("b", Mass(0.0))]).is_ok());
        assert_error!(
            check_finite(&[("a", Mass(1.0)), ("b", Mass(f64::INFINITY))]),
            "Invalid input: b is too large to represent (got inf)"
        );
    }

    #[test]
    fn test_roi_ratio_value() {
        assert_eq!(RoiRatio::Unbounded.value(), f64::INFINITY);
        assert!(RoiRatio::Unbounded.is_unbounded());
        assert_eq!(RoiRatio::Finite(Dimensionless(2.5)).value(), 2.5);
        assert!(!RoiRatio::Finite(Dimensionless(2.5)).is_unbounded());
    }

    #[rstest]
    #[case(0.5, RoiRating::Bad)]
    #[case(1.0, RoiRating::Okay)]
    #[case(4.99, RoiRating::Okay)]
    #[case(5.0, RoiRating::Good)]
    #[case(19.9, RoiRating::Good)]
    #[case(20.0, RoiRating::Great)]
    fn test_roi_rating(#[case] ratio: f64, #[case] expected: RoiRating) {
        assert_eq!(RoiRatio::Finite(Dimensionless(ratio)).rating(), expected);
    }

    #[test]
    fn test_roi_rating_unbounded() {
        assert_eq!(RoiRatio::Unbounded.rating(), RoiRating::Great);
        assert_eq!(RoiRating::Great.to_string(), "great");
    }

    #[test]
    fn test_roi_ratio_display() {
        assert_eq!(format!("{:.1}", RoiRatio::Finite(Dimensionless(11.07))), "11.1");
        assert_eq!(RoiRatio::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn test_formula_set_names() {
        for formula_set in FormulaSet::iter() {
            assert_eq!(
                FormulaSet::from_str(&formula_set.to_string()).unwrap(),
                formula_set
            );
        }
        assert_eq!(FormulaSet::MassFraction.to_string(), "mass_fraction");
    }

    #[rstest]
    fn test_calculate_dispatch(vehicles: VehicleProfileMap) {
        for formula_set in FormulaSet::iter() {
            let result = calculate(&Scenario::from(formula_set), &vehicles).unwrap();
            assert_eq!(result.formula_set(), formula_set);
            assert!(result.captured() > Mass(0.0));
            assert!(result.total_emissions() > Mass(0.0));
            assert_approx_eq!(
                f64,
                result.roi_ratio().value(),
                (result.captured() / result.total_emissions()).value()
            );
        }
    }

    #[rstest]
    fn test_calculate_idempotent(vehicles: VehicleProfileMap) {
        let scenario = Scenario::from(FormulaSet::Saturation);
        assert_eq!(
            calculate(&scenario, &vehicles).unwrap(),
            calculate(&scenario, &vehicles).unwrap()
        );
    }

    #[rstest]
    fn test_calculate_invalid_input_before_vehicle(vehicles: VehicleProfileMap) {
        let scenario = Scenario::Saturation(SaturationScenario {
            vehicle_type: "Hovercraft".to_string(),
            recovery_distance: Distance(-1.0),
            ..SaturationScenario::default()
        });
        assert!(matches!(
            calculate(&scenario, &vehicles),
            Err(CalculationError::InvalidInput(_))
        ));
    }

    #[rstest]
    fn test_calculate_unknown_vehicle(vehicles: VehicleProfileMap) {
        let scenario = Scenario::MassFraction(MassFractionScenario {
            vehicle_type: "Hovercraft".to_string(),
            ..MassFractionScenario::default()
        });
        assert_error!(
            calculate(&scenario, &vehicles),
            "Invalid configuration: Unknown vehicle type: Hovercraft"
        );
    }

    #[rstest]
    fn test_default_quantities_finite_non_negative(vehicles: VehicleProfileMap) {
        for formula_set in FormulaSet::iter() {
            let result = calculate(&Scenario::from(formula_set), &vehicles).unwrap();
            assert_quantities_finite_non_negative(&result);
        }

        // Zero distance is only allowed an infinite ROI ratio
        let scenario = Scenario::MassFraction(MassFractionScenario {
            distance: Distance(0.0),
            ..MassFractionScenario::default()
        });
        let result = calculate(&scenario, &vehicles).unwrap();
        assert!(result.roi_ratio().is_unbounded());
        assert_quantities_finite_non_negative(&result);
    }

    #[rstest]
    fn test_quantities(vehicles: VehicleProfileMap) {
        let result = calculate(&Scenario::from(FormulaSet::Saturation), &vehicles).unwrap();
        let quantities = result.quantities();
        assert_eq!(quantities[0].name, "max_possible_cartridges");
        assert_eq!(quantities[0].value, 181.0);
        assert_eq!(quantities.last().unwrap().value, result.roi_ratio().value());
    }
}
