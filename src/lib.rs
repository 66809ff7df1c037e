//! metric-showcase: headless core of a business metrics showcase page.
//!
//! Datasets are mapped to backend-agnostic render frames (a donut chart for
//! the revenue mix, a bar/line chart for growth), and a scroll observer
//! drives the navigation chrome. Hosts paint frames through any `Renderer`.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod scroll;
pub mod telemetry;

pub use api::{PageComposer, PageConfig};
pub use error::{ChartError, ChartResult};
