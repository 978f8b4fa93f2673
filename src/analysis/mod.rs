//! # Analysis Module
//!
//! Descriptive statistics over the response table. Every function takes the
//! table explicitly and recomputes from scratch.
pub(crate) mod aggregate;
pub(crate) mod distribution;

pub use aggregate::columns_mean;
pub use aggregate::grouped_theme_mean;
pub use aggregate::overall_average;
pub use aggregate::overall_trend;
pub use aggregate::question_mean;
pub use aggregate::single_question_mean;
pub use aggregate::RetrospectiveMean;
pub use distribution::score_distribution;
pub use distribution::BoxStats;
pub use distribution::RetrospectiveDistribution;
