//! Data preprocessing module
//!
//! - Static column routing (numeric vs. categorical/ordinal)
//! - Standard scaling with frozen statistics
//! - One-hot encoding tolerant of unseen categories
//! - A column transformer stacking both blocks into the model matrix

mod encoder;
mod pipeline;
pub mod router;
mod scaler;

pub use encoder::{HandleUnknown, OneHotEncoder, MISSING_CATEGORY};
pub use pipeline::Preprocessor;
pub use router::{ColumnPartition, ColumnRouter};
pub use scaler::StandardScaler;
