//! Integration tests: feature engineering on raw HR records

mod common;

use attrition_pipeline::error::PipelineError;
use attrition_pipeline::feature_engineering::{
    extract_label, FeatureEngineer, DERIVED_COLUMNS, LABEL_COLUMN,
};
use common::{floats, raw_records, strings, with_ints, with_strs};
use polars::prelude::*;
use std::collections::HashSet;

#[test]
fn test_label_yes_is_one_everything_else_zero() {
    let raw = with_strs(
        raw_records(5),
        "Attrition",
        &[Some("Yes"), Some("No"), Some("yes"), None, Some(" Yes")],
    );

    let y = extract_label(&raw, LABEL_COLUMN).unwrap();
    assert_eq!(y.to_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0]);

    let engineered = FeatureEngineer::new().transform(&raw).unwrap();
    assert_eq!(
        floats(&engineered, "Attrition"),
        vec![Some(1.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0)]
    );
}

#[test]
fn test_ordinal_codes_map_to_labels() {
    let raw = raw_records(4);
    let raw = with_ints(raw, "EnvironmentSatisfaction", &[1, 2, 3, 4]);
    let raw = with_ints(raw, "PerformanceRating", &[1, 2, 3, 4]);
    let raw = with_ints(raw, "WorkLifeBalance", &[1, 2, 3, 4]);
    let engineered = FeatureEngineer::new().transform(&raw).unwrap();

    let expect = |labels: [&str; 4]| -> Vec<Option<String>> {
        labels.iter().map(|s| Some(s.to_string())).collect()
    };
    assert_eq!(
        strings(&engineered, "EnvironmentSatisfaction"),
        expect(["Low", "Medium", "High", "Very High"])
    );
    assert_eq!(
        strings(&engineered, "PerformanceRating"),
        expect(["Low", "Good", "Excellent", "Outstanding"])
    );
    assert_eq!(
        strings(&engineered, "WorkLifeBalance"),
        expect(["Bad", "Good", "Better", "Best"])
    );

    for column in ["JobInvolvement", "JobSatisfaction", "RelationshipSatisfaction"] {
        let raw = with_ints(raw_records(4), column, &[1, 2, 3, 4]);
        let labels = strings(&FeatureEngineer::new().transform(&raw).unwrap(), column);
        let distinct: HashSet<_> = labels.iter().collect();
        assert_eq!(distinct.len(), 4, "{} mapping is not injective", column);
    }
}

#[test]
fn test_out_of_range_ordinal_is_missing() {
    let raw = with_ints(raw_records(3), "JobSatisfaction", &[0, 5, 2]);
    let engineered = FeatureEngineer::new().transform(&raw).unwrap();
    assert_eq!(
        strings(&engineered, "JobSatisfaction"),
        vec![None, None, Some("Medium".to_string())]
    );
}

#[test]
fn test_second_pass_leaves_derived_columns_unchanged() {
    let raw = raw_records(30);
    let engineer = FeatureEngineer::new();
    let once = engineer.transform(&raw).unwrap();

    // Re-add the columns the first pass dropped
    let mut readded = once.clone();
    for name in ["EmployeeCount", "Over18", "StandardHours", "EmployeeNumber"] {
        readded
            .with_column(raw.column(name).unwrap().clone())
            .unwrap();
    }
    let twice = engineer.transform(&readded).unwrap();

    assert_eq!(once.get_column_names(), twice.get_column_names());
    for name in DERIVED_COLUMNS {
        assert_eq!(floats(&once, name), floats(&twice, name), "{} changed", name);
    }
    for name in ["AgeGroup", "DistanceGroup", "JobSatisfaction"] {
        assert_eq!(strings(&once, name), strings(&twice, name), "{} changed", name);
    }
    assert_eq!(floats(&once, "Attrition"), floats(&twice, "Attrition"));
}

#[test]
fn test_derived_values_and_dropped_columns() {
    let raw = raw_records(1);
    let raw = with_ints(raw, "MonthlyIncome", &[5000]);
    let raw = with_ints(raw, "DailyRate", &[1000]);
    let raw = with_ints(raw, "MonthlyRate", &[20000]);
    let raw = with_ints(raw, "TotalWorkingYears", &[10]);
    let raw = with_ints(raw, "NumCompaniesWorked", &[4]);
    let raw = with_ints(raw, "YearsAtCompany", &[0]);
    let raw = with_ints(raw, "YearsSinceLastPromotion", &[0]);
    let raw = with_ints(raw, "Age", &[30]);
    let raw = with_ints(raw, "DistanceFromHome", &[0]);

    let engineered = FeatureEngineer::new().transform(&raw).unwrap();

    assert_eq!(floats(&engineered, "IncomePerYear"), vec![Some(60000.0)]);
    assert_eq!(floats(&engineered, "DailyRateToMonthlyRateRatio"), vec![Some(0.05)]);
    assert_eq!(floats(&engineered, "AvgYearsPerCompany"), vec![Some(2.0)]);
    assert_eq!(floats(&engineered, "PromotionRate"), vec![Some(0.0)]);

    // Right-closed bins: 30 is in (18, 30], 0 is outside (0, 5]
    assert_eq!(strings(&engineered, "AgeGroup"), vec![Some("18-30".to_string())]);
    assert_eq!(strings(&engineered, "DistanceGroup"), vec![None]);

    let names: Vec<String> = engineered
        .get_column_names()
        .iter()
        .map(|c| c.to_string())
        .collect();
    for dropped in ["EmployeeCount", "Over18", "StandardHours", "EmployeeNumber"] {
        assert!(!names.contains(&dropped.to_string()));
    }
    assert_eq!(engineered.width(), 35 - 4 + 9 + 2);
}

#[test]
fn test_validate_reports_every_missing_input() {
    let raw = raw_records(2)
        .drop("MonthlyRate")
        .unwrap()
        .drop("YearsAtCompany")
        .unwrap();

    let engineer = FeatureEngineer::new();
    match engineer.validate(&raw) {
        Err(PipelineError::MissingColumns(cols)) => {
            assert_eq!(cols, vec!["MonthlyRate".to_string(), "YearsAtCompany".to_string()]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
    assert!(engineer.validate(&raw_records(2)).is_ok());
}
