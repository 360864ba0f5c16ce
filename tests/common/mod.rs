//! Shared fixtures: synthetic raw HR records with all 35 columns

#![allow(dead_code)]

use polars::prelude::*;

const DEPARTMENTS: [&str; 3] = ["Sales", "Research & Development", "Human Resources"];
const FIELDS: [&str; 4] = ["Life Sciences", "Medical", "Marketing", "Technical Degree"];
const ROLES: [&str; 4] = ["Sales Executive", "Research Scientist", "Laboratory Technician", "Manager"];
const TRAVEL: [&str; 3] = ["Travel_Rarely", "Travel_Frequently", "Non-Travel"];
const MARITAL: [&str; 3] = ["Single", "Married", "Divorced"];

fn pick<'a>(values: &[&'a str], i: usize) -> &'a str {
    values[i % values.len()]
}

/// `n` deterministic raw records; every third employee has left
pub fn raw_records(n: usize) -> DataFrame {
    let idx: Vec<usize> = (0..n).collect();
    let int = |f: &dyn Fn(usize) -> i64| -> Vec<i64> { idx.iter().map(|&i| f(i)).collect() };
    let text = |f: &dyn Fn(usize) -> &'static str| -> Vec<&'static str> { idx.iter().map(|&i| f(i)).collect() };

    df!(
        "Age" => int(&|i| 19 + ((i * 7) % 42) as i64),
        "Attrition" => text(&|i| if i % 3 == 0 { "Yes" } else { "No" }),
        "BusinessTravel" => text(&|i| pick(&TRAVEL, i)),
        "DailyRate" => int(&|i| 300 + ((i * 137) % 1100) as i64),
        "Department" => text(&|i| pick(&DEPARTMENTS, i)),
        "DistanceFromHome" => int(&|i| 1 + ((i * 5) % 29) as i64),
        "Education" => int(&|i| 1 + (i % 5) as i64),
        "EducationField" => text(&|i| pick(&FIELDS, i)),
        "EmployeeCount" => int(&|_| 1),
        "EmployeeNumber" => int(&|i| 1000 + i as i64),
        "EnvironmentSatisfaction" => int(&|i| 1 + (i % 4) as i64),
        "Gender" => text(&|i| if i % 2 == 0 { "Male" } else { "Female" }),
        "HourlyRate" => int(&|i| 30 + ((i * 11) % 70) as i64),
        "JobInvolvement" => int(&|i| 1 + ((i + 1) % 4) as i64),
        "JobLevel" => int(&|i| 1 + (i % 5) as i64),
        "JobRole" => text(&|i| pick(&ROLES, i)),
        "JobSatisfaction" => int(&|i| 1 + ((i + 2) % 4) as i64),
        "MaritalStatus" => text(&|i| pick(&MARITAL, i)),
        "MonthlyIncome" => int(&|i| 2000 + ((i * 523) % 15000) as i64),
        "MonthlyRate" => int(&|i| 2500 + ((i * 911) % 20000) as i64),
        "NumCompaniesWorked" => int(&|i| (i % 9) as i64),
        "Over18" => text(&|_| "Y"),
        "OverTime" => text(&|i| if i % 3 == 0 { "Yes" } else { "No" }),
        "PercentSalaryHike" => int(&|i| 11 + (i % 14) as i64),
        "PerformanceRating" => int(&|i| 3 + (i % 2) as i64),
        "RelationshipSatisfaction" => int(&|i| 1 + ((i + 3) % 4) as i64),
        "StandardHours" => int(&|_| 80),
        "StockOptionLevel" => int(&|i| (i % 4) as i64),
        "TotalWorkingYears" => int(&|i| (i % 30) as i64),
        "TrainingTimesLastYear" => int(&|i| (i % 7) as i64),
        "WorkLifeBalance" => int(&|i| 1 + ((i * 3) % 4) as i64),
        "YearsAtCompany" => int(&|i| (i % 20) as i64),
        "YearsInCurrentRole" => int(&|i| (i % 20) as i64 / 2),
        "YearsSinceLastPromotion" => int(&|i| (i % 20) as i64 / 3),
        "YearsWithCurrManager" => int(&|i| (i % 20) as i64 / 2)
    )
    .unwrap()
}

/// Replace (or add) an integer column
pub fn with_ints(mut df: DataFrame, name: &str, values: &[i64]) -> DataFrame {
    df.with_column(Series::new(name.into(), values)).unwrap();
    df
}

/// Replace (or add) a nullable string column
pub fn with_strs(mut df: DataFrame, name: &str, values: &[Option<&str>]) -> DataFrame {
    df.with_column(Series::new(name.into(), values)).unwrap();
    df
}

/// Column values as `f64`, missing as `None`
pub fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Column values as strings, missing as `None`
pub fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}
