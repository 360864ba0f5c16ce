//! Raw HR record schema and the fixed lookup tables used by the engineer

/// Binary departure-status column
pub const LABEL_COLUMN: &str = "Attrition";

/// Value of the label column that marks a departure
pub const POSITIVE_LABEL: &str = "Yes";

/// All 35 columns of a raw employee record, in file order
pub const RAW_COLUMNS: [&str; 35] = [
    "Age",
    "Attrition",
    "BusinessTravel",
    "DailyRate",
    "Department",
    "DistanceFromHome",
    "Education",
    "EducationField",
    "EmployeeCount",
    "EmployeeNumber",
    "EnvironmentSatisfaction",
    "Gender",
    "HourlyRate",
    "JobInvolvement",
    "JobLevel",
    "JobRole",
    "JobSatisfaction",
    "MaritalStatus",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "Over18",
    "OverTime",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StandardHours",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
];

/// Numeric raw columns read by the derived features and bins
pub const DERIVATION_INPUTS: [&str; 14] = [
    "Age",
    "DailyRate",
    "DistanceFromHome",
    "HourlyRate",
    "JobLevel",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
];

/// Constant-valued or identifier columns removed after engineering
pub const DROP_COLUMNS: [&str; 4] = ["EmployeeCount", "Over18", "StandardHours", "EmployeeNumber"];

const SATISFACTION: [&str; 4] = ["Low", "Medium", "High", "Very High"];
const PERFORMANCE: [&str; 4] = ["Low", "Good", "Excellent", "Outstanding"];
const BALANCE: [&str; 4] = ["Bad", "Good", "Better", "Best"];

/// Ordinal 1-4 codes and their labels (index 0 holds the label for code 1)
pub const ORDINAL_MAPPINGS: [(&str, [&str; 4]); 6] = [
    ("EnvironmentSatisfaction", SATISFACTION),
    ("JobInvolvement", SATISFACTION),
    ("JobSatisfaction", SATISFACTION),
    ("PerformanceRating", PERFORMANCE),
    ("RelationshipSatisfaction", SATISFACTION),
    ("WorkLifeBalance", BALANCE),
];

/// Additive guard used by the career/tenure ratios
pub const DENOMINATOR_EPSILON: f64 = 0.001;

/// Right-closed age bin edges; `(18, 30]` is the first bin
pub const AGE_BIN_EDGES: [f64; 6] = [18.0, 30.0, 40.0, 50.0, 60.0, 70.0];
pub const AGE_BIN_LABELS: [&str; 5] = ["18-30", "30-40", "40-50", "50-60", "60+"];

/// Right-closed commute distance bin edges; `(0, 5]` is the first bin
pub const DISTANCE_BIN_EDGES: [f64; 5] = [0.0, 5.0, 10.0, 20.0, 30.0];
pub const DISTANCE_BIN_LABELS: [&str; 4] = ["0-5", "5-10", "10-20", "20+"];

/// Derived numeric columns, in the order they are appended
pub const DERIVED_COLUMNS: [&str; 9] = [
    "IncomePerYear",
    "DailyRateToMonthlyRateRatio",
    "HourlyRateToMonthlyRateRatio",
    "AvgYearsPerCompany",
    "PromotionRate",
    "RoleStability",
    "CareerGrowth",
    "ManagerStability",
    "TrainingPerYear",
];

pub const AGE_GROUP_COLUMN: &str = "AgeGroup";
pub const DISTANCE_GROUP_COLUMN: &str = "DistanceGroup";

/// Default one-hot columns with nominal values
pub const DEFAULT_CATEGORICAL_COLUMNS: [&str; 9] = [
    "Department",
    "EducationField",
    "Gender",
    "JobRole",
    "MaritalStatus",
    "OverTime",
    "AgeGroup",
    "DistanceGroup",
    "BusinessTravel",
];

/// Default one-hot columns holding ordinal labels
pub const DEFAULT_ORDINAL_COLUMNS: [&str; 6] = [
    "EnvironmentSatisfaction",
    "JobInvolvement",
    "JobSatisfaction",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "WorkLifeBalance",
];

/// Label for an ordinal code, `None` outside 1-4 or for fractional codes
pub fn ordinal_label(labels: &[&'static str; 4], code: f64) -> Option<&'static str> {
    if code.fract() != 0.0 || !(1.0..=4.0).contains(&code) {
        return None;
    }
    labels.get(code as usize - 1).copied()
}

/// Right-closed binning: `value` falls in bin `i` when
/// `edges[i] < value <= edges[i + 1]`
pub fn bin_label(value: f64, edges: &[f64], labels: &[&'static str]) -> Option<&'static str> {
    edges
        .windows(2)
        .zip(labels.iter())
        .find(|(w, _)| value > w[0] && value <= w[1])
        .map(|(_, label)| *label)
}

/// Position of a column in the raw schema, used to order error reports
pub fn raw_position(name: &str) -> usize {
    RAW_COLUMNS
        .iter()
        .position(|c| *c == name)
        .unwrap_or(RAW_COLUMNS.len())
}
