//! A regression test for the "electric_van" example
use regression::run_regression_test;

#[test]
fn test_regression_electric_van() {
    run_regression_test("electric_van");
}
