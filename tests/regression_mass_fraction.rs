//! A regression test for the "mass_fraction" example
use regression::run_regression_test;

#[test]
fn test_regression_mass_fraction() {
    run_regression_test("mass_fraction");
}
