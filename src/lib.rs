//! # u-abtest
//!
//! Two-sample A/B test decision procedure: verify the assumptions of the
//! parametric tests, choose a valid test, run it, and report the decision.
//!
//! The crate operates on raw `f64` observations of one metric for a control
//! and a test group. Loading data and presenting results are handled by
//! collaborators behind the [`sample::DataSource`] and [`report::Reporter`]
//! traits.
//!
//! ## Modules
//!
//! - [`sample`] — Groups, samples, and data sources
//! - [`summary`] — Per-group descriptive statistics
//! - [`assumptions`] — Normality (Shapiro-Wilk) and variance homogeneity (Levene)
//! - [`selection`] — Decision table choosing Student, Welch, or Mann-Whitney
//! - [`runner`] — Executing the chosen test
//! - [`pipeline`] — End-to-end analysis of one metric
//! - [`report`] — Text and JSON reporters
//! - [`testing`] — Numerical test kernels
//! - [`config`] — Significance level and checker settings
//! - [`error`] — Error taxonomy
//!
//! ## Example
//!
//! ```
//! use u_abtest::config::AnalysisConfig;
//! use u_abtest::pipeline::analyze;
//! use u_abtest::report::{Reporter, TextReporter};
//! use u_abtest::sample::SampleSet;
//!
//! let set = SampleSet::new(
//!     "Purchase",
//!     vec![520.0, 498.0, 560.0, 610.0, 470.0, 530.0, 505.0, 585.0],
//!     vec![540.0, 575.0, 512.0, 600.0, 498.0, 620.0, 555.0, 530.0],
//! )
//! .unwrap();
//!
//! let analysis = analyze(&set, &AnalysisConfig::default()).unwrap();
//! let mut reporter = TextReporter::new(Vec::new());
//! reporter.report(&analysis).unwrap();
//! ```
//!
//! ## Design Philosophy
//!
//! - **Explicit alpha**: the significance level is a parameter of every check
//! - **Pure core**: computation, routing, and rendering are separate layers
//! - **Research-backed**: all algorithms reference academic literature

pub mod assumptions;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod sample;
pub mod selection;
pub mod summary;
pub mod testing;

pub use error::{AbTestError, Result};
