//! End-to-end calculation invariants exercised through the public API:
//! worked examples, bracket resolution, dual accounting, loud conversion
//! failures, and all-or-nothing category commitment.

use std::collections::BTreeMap;

use ghg_core::{
    aggregate, Category, CategoryResult, CategoryTotal, ElectricityCalculator, ElectricityRow,
    FireSuppressionCalculator, FireSuppressionMethod, FireSuppressionRow, MobileCalculator,
    MobileRow, OffsetsCalculator, OffsetsRow, PurchasedGasesCalculator, PurchasedGasesRow,
    ReferenceData, RefrigerationCalculator, RefrigerationMethod, RefrigerationRow, ScopeBucket,
    StationaryCalculator, StationaryRow, UnitClass, UnitTable,
};

fn results_from(items: Vec<CategoryResult>) -> BTreeMap<Category, CategoryResult> {
    items.into_iter().map(|r| (r.category, r)).collect()
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ghg_core=debug")
        .try_init();
}

#[test]
fn kerosene_thousand_gallons_worked_example() {
    init_logging();
    let calc = StationaryCalculator::new(ReferenceData::builtin_shared());
    let out = calc.calculate(vec![StationaryRow::new("Kerosene", "1000", "gal")]);

    // 10150 kg CO2 + 0.41 kg CH4 x 25 + 0.08 kg N2O x 298 = 10184.09 kg
    let co2e_t = out.rows[0].co2e_t.unwrap();
    assert!((co2e_t - 10.18409).abs() < 1e-9);
    match out.result.unwrap().total {
        CategoryTotal::Single { co2e_t } => assert!((co2e_t - 10.18409).abs() < 1e-9),
        other => panic!("expected single total, got {other:?}"),
    }
}

#[test]
fn model_year_resolves_the_bracket_and_misses_mean_zero_gases() {
    init_logging();
    let calc = MobileCalculator::new(ReferenceData::builtin_shared());

    // 2010 falls in the 2006-2016 passenger car bracket.
    let with_gases = MobileRow::on_road("Passenger Cars - Gasoline", "2010", "100", "gal", "1000");
    let with_gases = calc.calculate(vec![with_gases]).rows.remove(0);

    // 1960 predates every bracket: CO2 only, no CH4/N2O contribution.
    let no_gases = MobileRow::on_road("Passenger Cars - Gasoline", "1960", "100", "gal", "1000");
    let no_gases = calc.calculate(vec![no_gases]).rows.remove(0);

    let co2_only = 100.0 * 8887.0 / 1000.0 / 1000.0;
    assert!((no_gases.co2e_t.unwrap() - co2_only).abs() < 1e-9);
    assert!(with_gases.co2e_t.unwrap() > no_gases.co2e_t.unwrap());
}

#[test]
fn market_factors_diverge_from_the_grid_average() {
    init_logging();
    let calc = ElectricityCalculator::new(ReferenceData::builtin_shared());

    let contracted = ElectricityRow::new("US Average", "1000", "MWh")
        .with_market_factors("100", "0.01", "0.001");
    let out = calc.calculate(vec![contracted]);
    let row = &out.rows[0];
    assert!(row.market_co2e_t.unwrap() < row.location_co2e_t.unwrap());

    // Without supplier factors the market side equals the location side.
    let default = calc
        .calculate(vec![ElectricityRow::new("US Average", "1000", "MWh")])
        .rows
        .remove(0);
    assert!((default.market_co2e_t.unwrap() - default.location_co2e_t.unwrap()).abs() < 1e-12);
}

#[test]
fn refrigeration_and_fire_screening_formulas_differ() {
    init_logging();
    let data = ReferenceData::builtin_shared();

    let mut fridge = RefrigerationRow::for_gas("HFC-134a");
    fridge.operating_capacity_kg = "100".to_string();
    fridge.months_in_operation = "6".to_string();
    let fridge_t = RefrigerationCalculator::new(data.clone())
        .calculate(RefrigerationMethod::Screening, vec![fridge])
        .rows[0]
        .co2e_t
        .unwrap();

    let mut fire = FireSuppressionRow::for_agent("HFC-134a");
    fire.equipment_count = "100".to_string();
    fire.mass_released_kg = "6".to_string();
    let fire_t = FireSuppressionCalculator::new(data)
        .calculate(FireSuppressionMethod::Screening, vec![fire])
        .rows[0]
        .co2e_t
        .unwrap();

    // 50 kg prorated capacity vs 600 kg released, both at GWP 1300.
    assert!((fridge_t - 65.0).abs() < 1e-9);
    assert!((fire_t - 780.0).abs() < 1e-9);
}

#[test]
fn conversions_fail_loudly_instead_of_passing_zero() {
    init_logging();
    let units = UnitTable::builtin();
    let err = units
        .convert(1.0, "gal", "kg", UnitClass::Mass)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown mass unit: gal");

    // A fuel quoted in the wrong unit family is a row error, not a zero.
    let calc = StationaryCalculator::new(ReferenceData::builtin_shared());
    let out = calc.calculate(vec![StationaryRow::new("Natural Gas", "100", "gal")]);
    assert_eq!(
        out.rows[0].error.as_deref(),
        Some("unit must be one of: scf, ft3, m3, L")
    );
    assert!(out.result.is_none());
}

#[test]
fn one_bad_row_withholds_the_whole_category() {
    init_logging();
    let calc = StationaryCalculator::new(ReferenceData::builtin_shared());
    let out = calc.calculate(vec![
        StationaryRow::new("Kerosene", "1000", "gal"),
        StationaryRow::new("", "-3", "gal"),
    ]);

    assert!(out.rows[0].co2e_t.is_some());
    assert_eq!(
        out.rows[1].error.as_deref(),
        Some("fuel is required; quantity must be greater than zero")
    );
    assert!(out.result.is_none());

    // Fixing the row commits the category.
    let fixed = calc.calculate(vec![
        StationaryRow::new("Kerosene", "1000", "gal"),
        StationaryRow::new("Natural Gas", "3", "scf"),
    ]);
    assert!(fixed.result.is_some());
}

#[test]
fn over_offset_scope_floors_on_display_but_not_in_the_grand_total() {
    init_logging();
    let data = ReferenceData::builtin_shared();

    // 100000 kg of purchased CO2 is exactly 100 t CO2e.
    let gross = PurchasedGasesCalculator::new(data.clone())
        .calculate(vec![PurchasedGasesRow::new(
            "Carbon dioxide (CO2)",
            "100000",
            "kg",
        )]);
    let offsets = OffsetsCalculator::new(data).calculate(vec![OffsetsRow::new(
        "Carbon Offsets",
        ScopeBucket::Scope1,
        "150",
    )]);

    let report = aggregate(&results_from(vec![
        gross.result.unwrap(),
        offsets.result.unwrap(),
    ]));
    assert!((report.scope1.gross_t - 100.0).abs() < 1e-6);
    assert!((report.scope1.net_t + 50.0).abs() < 1e-6);
    assert_eq!(report.scope1.displayed_net_t(), 0.0);
    assert!((report.total_net_t + 50.0).abs() < 1e-6);
    assert_eq!(report.displayed_total_t(), 0.0);
}

#[test]
fn biomass_fuels_report_biogenic_co2_beside_the_scopes() {
    init_logging();
    let data = ReferenceData::builtin_shared();
    let out = StationaryCalculator::new(data).calculate(vec![StationaryRow::new(
        "Wood and Wood Residuals",
        "2",
        "short ton",
    )]);
    let result = out.result.unwrap();
    let biogenic = result.biogenic_co2_t.unwrap();
    assert!(biogenic > 0.0);

    let report = aggregate(&results_from(vec![result]));
    assert!((report.biogenic_stationary_t - biogenic).abs() < 1e-12);
    // The CO2e total already includes the biomass row; biogenic is
    // supplemental, not an addend.
    match report.categories[&Category::StationaryCombustion] {
        CategoryTotal::Single { co2e_t } => {
            assert!((report.scope1.gross_t - co2e_t).abs() < 1e-12)
        }
        ref other => panic!("expected single total, got {other:?}"),
    }
}
