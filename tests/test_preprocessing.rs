//! Integration tests: column routing and the fitted preprocessor

mod common;

use attrition_pipeline::feature_engineering::{
    FeatureEngineer, DEFAULT_CATEGORICAL_COLUMNS, DEFAULT_ORDINAL_COLUMNS, LABEL_COLUMN,
};
use attrition_pipeline::preprocessing::{ColumnPartition, ColumnRouter, Preprocessor};
use attrition_pipeline::utils::column_names;
use common::{raw_records, with_strs};
use polars::prelude::*;

fn engineered(n: usize) -> DataFrame {
    FeatureEngineer::new().transform(&raw_records(n)).unwrap()
}

fn default_partition(df: &DataFrame) -> ColumnPartition {
    ColumnRouter::new(&DEFAULT_CATEGORICAL_COLUMNS, &DEFAULT_ORDINAL_COLUMNS)
        .route(&column_names(df), LABEL_COLUMN)
}

#[test]
fn test_partition_covers_engineered_columns() {
    let df = engineered(20);
    let columns = column_names(&df);
    let partition = default_partition(&df);

    assert!(partition.is_complete(&columns, LABEL_COLUMN));
    assert_eq!(partition.len(), columns.len() - 1);
    assert_eq!(partition.categorical.len(), 15);
    assert_eq!(partition.numeric.len(), 26);
    assert!(!partition.numeric.contains(&LABEL_COLUMN.to_string()));
    assert!(partition.numeric.contains(&"Education".to_string()));
    assert_eq!(partition.numeric.last().map(String::as_str), Some("TrainingPerYear"));
}

#[test]
fn test_transform_is_deterministic() {
    let df = engineered(40);
    let partition = default_partition(&df);
    let mut pre = Preprocessor::new();
    pre.fit(&df, &partition).unwrap();

    let first = pre.transform(&df).unwrap();
    let second = pre.transform(&df).unwrap();

    assert_eq!(first.shape(), second.shape());
    assert!(first
        .iter()
        .zip(second.iter())
        .all(|(a, b)| a.to_bits() == b.to_bits()));
    assert_eq!(first.ncols(), pre.feature_names().len());
}

#[test]
fn test_numeric_block_is_standardized() {
    let df = engineered(40);
    let partition = default_partition(&df);
    let mut pre = Preprocessor::new();
    let x = pre.fit_transform(&df, &partition).unwrap();

    for j in 0..partition.numeric.len() {
        let column = x.column(j);
        let mean = column.mean().unwrap();
        assert!(mean.abs() < 1e-9, "{} has mean {}", partition.numeric[j], mean);
    }
}

#[test]
fn test_unseen_category_gives_zero_block() {
    let train = engineered(30);
    let partition = default_partition(&train);
    let mut pre = Preprocessor::new();
    pre.fit(&train, &partition).unwrap();

    let raw = with_strs(raw_records(2), "Department", &[Some("Legal"), Some("Sales")]);
    let test = FeatureEngineer::new().transform(&raw).unwrap();
    let x = pre.transform(&test).unwrap();

    let department: Vec<usize> = pre
        .feature_names()
        .iter()
        .enumerate()
        .filter(|(_, name)| name.starts_with("Department_"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(department.len(), 3);

    assert!(department.iter().all(|&j| x[[0, j]] == 0.0));
    assert_eq!(department.iter().map(|&j| x[[1, j]]).sum::<f64>(), 1.0);
}

#[test]
fn test_feature_names_follow_partition_order() {
    let df = engineered(12);
    let partition = default_partition(&df);
    let mut pre = Preprocessor::new();
    pre.fit(&df, &partition).unwrap();

    let names = pre.feature_names();
    assert_eq!(names[..partition.numeric.len()], partition.numeric[..]);
    let first_onehot = &names[partition.numeric.len()];
    assert!(first_onehot.starts_with("Department_"), "got {}", first_onehot);
    assert!(names.last().unwrap().starts_with("WorkLifeBalance_"));
}
