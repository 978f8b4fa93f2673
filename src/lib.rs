//! # Retrospective Dashboard
//!
//! Analysis engine for multi-sheet workbooks of retrospective survey responses.
//! Every sheet is one retrospective; the responses of all sheets are concatenated
//! into a single table and analysed on demand.
//!
//! ## Features
//!
//! - **Workbook loading**: Reads `.xlsx`/`.xlsm` packages from disk or from memory,
//!   resolving every cell once into a number, a text or a missing value
//! - **Aggregation**: Per-retrospective theme and question means (mean of column
//!   means), an overall trend line, reference averages and box-plot statistics
//! - **Written reflections**: Long-form column detection, response cleaning,
//!   lexicon-based sentiment polarity, top-n ranking and word-cloud frequencies
//! - **Layout warnings**: Question groups are positional; headers that drift
//!   between sheets are reported instead of silently mis-grouped
//!
//! ## Example
//!
//! ```no_run
//! use retro_dashboard::{Dashboard, Selection, Tab, WorkbookSource};
//!
//! let dashboard = Dashboard::open(&WorkbookSource::path("retrospectives.xlsx"))?;
//! let report = dashboard.report(&Selection::default(), Tab::All)?;
//! println!("{report}");
//! # Ok::<(), retro_dashboard::RetroError>(())
//! ```
pub mod analysis;
pub mod dashboard;
mod error;
mod helpers;
pub mod spreadsheet;
pub mod survey;
pub mod text;

pub use dashboard::Dashboard;
pub use dashboard::Report;
pub use dashboard::Selection;
pub use dashboard::Session;
pub use dashboard::Tab;
pub use dashboard::View;
pub use error::RetroError;
pub use helpers::reader::WorkbookSource;
pub use survey::RetrospectiveFilter;
