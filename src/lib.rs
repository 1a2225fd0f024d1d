//! pedot-dash - Interactive dashboard for the PEDOT:PSS coating experiment
//!
//! The dashboard loads the high-throughput experiment table once, then serves
//! a single page showing the table, a "Download Dataset" button, a workflow
//! schematic, and a scatter plot whose axes are picked from two dropdowns.
//!
//! # Overview
//!
//! The experiment varies seven coating parameters (additive concentrations,
//! coating speed and temperature, post-processing solvent and conditions) and
//! measures film coverage and conductivity. The x-axis dropdown offers the
//! parameters, the y-axis dropdown the two outcomes.
//!
//! # Quick Start
//!
//! ```no_run
//! use pedot_dash::{update_graph, AxisSelection, Dataset};
//!
//! let dataset = Dataset::from_path("PEDOT_experiment.csv")?;
//! let figure = update_graph(&dataset, &AxisSelection::default())?;
//!
//! println!("{}: {} points", figure.title(), figure.point_count());
//! # Ok::<(), pedot_dash::DashError>(())
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: CSV loading and write-back
//! - [`schema`]: parameter/output column names and the axis selection
//! - [`figure`]: scatter-plot figure for an axis selection
//! - [`download`]: CSV payload for the download button
//! - [`view`]: the HTML page
//! - [`serve`]: HTTP routes

pub mod config;
pub mod dataset;
pub mod download;
pub mod error;
pub mod figure;
pub mod schema;
pub mod serve;
pub mod view;

pub use config::ServerConfig;
pub use dataset::{Cell, Dataset};
pub use download::{download_dataset, DownloadPayload};
pub use error::{DashError, Result};
pub use figure::{update_graph, Figure};
pub use schema::{AxisSelection, OUTPUT_COLUMNS, PARAMETER_COLUMNS};
