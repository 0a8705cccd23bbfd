//! Physical layout engine for a hardware-description compilation pipeline
//!
//! Turns a validated circuit intermediate representation (components, pads,
//! nets, layer stack, design rules) into a geometrically concrete board
//! layout: force-directed placement, multi-layer maze routing, continuous
//! design-rule checking, and post-routing power distribution analysis,
//! sequenced by an explicit stage state machine.
//!
//! The crate neither parses a description language nor emits manufacturing
//! files; it consumes [`ir::BoardIr`] and produces a
//! [`db::LayoutSnapshot`] plus a [`pipeline::DiagnosticReport`].
//!
//! ```no_run
//! use layout_engine::ir::BoardIr;
//! use layout_engine::pipeline::{CancelToken, LayoutPipeline, PipelineConfig};
//!
//! let ir = BoardIr::new(50.0, 50.0);
//! let pipeline = LayoutPipeline::new(PipelineConfig::new());
//! let result = pipeline
//!     .run(&ir, &Default::default(), &CancelToken::new())
//!     .expect("construction");
//! println!("{:?}", result.report.state);
//! ```

pub mod db;
pub mod drc;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod pipeline;
pub mod place;
pub mod power;
pub mod route;

pub use db::{LayoutDb, LayoutSnapshot, RuleSet};
pub use drc::{run_batch_drc, run_incremental_drc, RuleKind, Severity, Violation};
pub use error::{LayoutError, Result};
pub use ir::{BoardIr, LayoutHints};
pub use pipeline::{
    CancelToken, DiagnosticReport, LayoutPipeline, PipelineConfig, PipelineResult, PipelineState,
};
