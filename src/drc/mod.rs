//! Design rule checking
//!
//! Pure evaluation over a layout database snapshot; never mutates. R-tree
//! candidate filtering keeps pair scans sub-quadratic, rayon parallelizes
//! the per-layer work.
//!
//! # Submodules
//! - `types` - violations and rule kinds
//! - `connectivity` - union-find electrical continuity
//! - `checks` - clearance, width, and thermal checks
//! - `runners` - batch and incremental entry points

pub mod checks;
pub mod connectivity;
pub mod runners;
pub mod types;

pub use connectivity::net_is_connected;
pub use runners::{check_continuity, run_batch_drc, run_incremental_drc};
pub use types::{sort_violations, RuleKind, Severity, Violation};
