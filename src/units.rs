//! This module defines the physical quantities used by the calculator and the arithmetic allowed
//! between them.
//!
//! Masses are in kilograms and distances in miles. Fuel is measured in whatever unit the vehicle
//! burns (gallons of gasoline or kWh of electricity), so fuel economy and emission factors are
//! expressed per unit of that fuel.

macro_rules! base_unit_struct {
    ($name:ident) => {
        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite (i.e. not infinite or NaN)
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Returns the smaller of two values
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                float_cmp::ApproxEq::approx_eq(self.0, other.0, margin)
            }
        }

        impl From<$name> for f64 {
            fn from(val: $name) -> Self {
                val.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Represents a dimensionless quantity (ratios, fractions and counts).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::Sub,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);
base_unit_struct!(Dimensionless);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<u32> for Dimensionless {
    fn from(val: u32) -> Self {
        Self(f64::from(val))
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            derive_more::Add,
            derive_more::Sub,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);
        base_unit_struct!($name);

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::ops::Div<$name> for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Mass);
unit_struct!(Distance);
unit_struct!(Fuel);

// Derived quantities
unit_struct!(FuelEconomy);
unit_struct!(EmissionFactor);

// Division rules
impl_div!(Distance, FuelEconomy, Fuel);
impl_div!(Distance, Fuel, FuelEconomy);

// Multiplication rules
impl_mul!(Fuel, EmissionFactor, Mass);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_fuel_from_distance_and_economy() {
        let fuel = Distance(50.0) / FuelEconomy(20.0);
        assert_eq!(fuel, Fuel(2.5));
        assert_eq!(Distance(50.0) / fuel, FuelEconomy(20.0));
    }

    #[test]
    fn test_mass_from_fuel_and_emission_factor() {
        let mass = Fuel(2.0) * EmissionFactor(8.89);
        assert_approx_eq!(Mass, mass, Mass(17.78));
        assert_eq!(EmissionFactor(8.89) * Fuel(2.0), mass);
    }

    #[test]
    fn test_mass_ratio_is_dimensionless() {
        assert_eq!(Mass(907.0) / Mass(1814.0), Dimensionless(0.5));
    }

    #[test]
    fn test_min() {
        assert_eq!(Dimensionless(1.5).min(Dimensionless(1.0)), Dimensionless(1.0));
        assert_eq!(Mass(2.0).min(Mass(3.0)), Mass(2.0));
    }

    #[test]
    fn test_deserialise_transparent() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            mass: Mass,
        }

        let wrapper: Wrapper = toml::from_str("mass = 10.5").unwrap();
        assert_eq!(wrapper.mass, Mass(10.5));
    }
}
