//! Layout pipeline orchestration
//!
//! Sequences placement, routing, and power analysis over one layout
//! database under the fixed priority policy, running a batch DRC pass at
//! every forward transition. The stage machine is explicit so termination
//! is bounded and testable:
//!
//! `Initialized -> Placed -> Routed -> PowerValidated -> Complete`
//!
//! with `Failed(reason)` reachable from any state and `Cancelled` returned
//! with the best-committed snapshot when the caller's token fires. Blocking
//! violations at a boundary loop back one stage a bounded number of times
//! before surfacing as a failure.

use crate::db::{LayoutDb, NetStatus, NetStatusReportEntry, RuleSet};
use crate::drc::{run_batch_drc, sort_violations, RuleKind, Severity, Violation};
use crate::error::{LayoutError, Result};
use crate::ir::{BoardIr, LayoutHints};
use crate::place::{place, PlacementOutcome, PlacerConfig};
use crate::power;
use crate::route::{route, RouterConfig, RoutingOutcome};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation: a flag the caller may set plus an optional
/// deadline, checked between iterations and net attempts
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Why a run failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FailureReason {
    Geometry(String),
    /// Blocking rule violations survived the stage retry budget
    RuleViolations { retries: usize, count: usize },
}

/// Pipeline stage machine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PipelineState {
    Initialized,
    Placed,
    Routed,
    PowerValidated,
    Complete,
    Failed(FailureReason),
    Cancelled,
}

/// Pipeline configuration: the rule set plus every phase's knobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub rules: RuleSet,
    pub placer: PlacerConfig,
    pub router: RouterConfig,
    /// How many times a stage may loop back on blocking violations
    pub max_stage_retries: usize,
    /// Power re-route rounds before reporting a capacity violation
    pub power_escalation_rounds: usize,
    /// Treat power capacity shortfalls as blocking
    pub power_hard_rule: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfig {
    /// Conservative defaults
    pub fn new() -> Self {
        Self {
            rules: RuleSet::default(),
            placer: PlacerConfig::default(),
            router: RouterConfig::default(),
            max_stage_retries: 2,
            power_escalation_rounds: 2,
            power_hard_rule: false,
        }
    }

    /// Lower iteration budgets for quick feedback loops
    pub fn fast() -> Self {
        Self {
            placer: PlacerConfig {
                max_iterations: 100,
                ..Default::default()
            },
            router: RouterConfig {
                max_net_retries: 1,
                ..Default::default()
            },
            ..Self::new()
        }
    }
}

/// Wall time spent in one phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseTiming {
    pub phase: String,
    pub millis: f64,
}

/// Everything downstream consumers need to judge the run
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub state: PipelineState,
    /// Final violation list in the contractual order
    pub violations: Vec<Violation>,
    pub nets: Vec<NetStatusReportEntry>,
    pub placement: Option<PlacementOutcome>,
    pub routing: Option<RoutingOutcome>,
    pub power_escalations: usize,
    pub warnings: Vec<String>,
    pub timings: Vec<PhaseTiming>,
}

impl DiagnosticReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The final database plus its diagnostic report
pub struct PipelineResult {
    pub db: LayoutDb,
    pub report: DiagnosticReport,
}

/// The single entry point consumed by the surrounding compiler
pub struct LayoutPipeline {
    config: PipelineConfig,
}

impl LayoutPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline. `Err` is returned only when the database
    /// cannot be constructed at all; every later problem lands in the
    /// report with a terminal state.
    pub fn run(
        &self,
        ir: &BoardIr,
        hints: &LayoutHints,
        cancel: &CancelToken,
    ) -> Result<PipelineResult> {
        let mut db = LayoutDb::from_ir(ir, self.config.rules.clone())?;
        let mut runner = StageRunner {
            config: &self.config,
            hints,
            cancel,
            report: DiagnosticReport {
                state: PipelineState::Initialized,
                violations: Vec::new(),
                nets: Vec::new(),
                placement: None,
                routing: None,
                power_escalations: 0,
                warnings: Vec::new(),
                timings: Vec::new(),
            },
        };

        runner.drive(&mut db);
        runner.report.nets = db.snapshot().nets;

        log::info!("[pipeline] finished in state {:?}", runner.report.state);
        Ok(PipelineResult {
            db,
            report: runner.report,
        })
    }
}

struct StageRunner<'a> {
    config: &'a PipelineConfig,
    hints: &'a LayoutHints,
    cancel: &'a CancelToken,
    report: DiagnosticReport,
}

impl StageRunner<'_> {
    fn drive(&mut self, db: &mut LayoutDb) {
        // Sanity gate before placement: the outline must at least hold the
        // combined footprint area at zero spacing
        if let Err(e) = check_capacity(db) {
            self.report.state = PipelineState::Failed(FailureReason::Geometry(e.to_string()));
            return;
        }

        if !self.place_stage(db) {
            return;
        }
        if !self.route_stage(db) {
            return;
        }
        if !self.power_stage(db) {
            return;
        }

        // Final whole-board check gates Complete; power findings from the
        // escalation path stay in the report alongside it
        let mut violations = self.timed("final-drc", || run_batch_drc(db));
        let blocking = count_blocking(&violations);
        self.report.violations.append(&mut violations);
        sort_violations(&mut self.report.violations);
        self.report.state = if blocking > 0 {
            PipelineState::Failed(FailureReason::RuleViolations {
                retries: self.config.max_stage_retries,
                count: blocking,
            })
        } else {
            PipelineState::Complete
        };
    }

    fn place_stage(&mut self, db: &mut LayoutDb) -> bool {
        for retry in 0..=self.config.max_stage_retries {
            if self.check_cancelled() {
                return false;
            }

            // Perturb the scatter seed on loop-back so a retry explores a
            // different configuration
            let mut placer = self.config.placer.clone();
            placer.seed = placer.seed.wrapping_add(retry as u64);

            let (hints, cancel) = (self.hints, self.cancel);
            let outcome = self.timed("placement", || place(db, &placer, hints, cancel));
            match outcome {
                Ok(outcome) => {
                    if !outcome.converged && !self.cancel.is_cancelled() {
                        let warning = LayoutError::PlacementNonConvergence {
                            iterations: outcome.iterations,
                            residual: outcome.residual,
                        };
                        self.report
                            .warnings
                            .push(format!("{}; best snapshot committed", warning));
                    }
                    self.report.placement = Some(outcome);
                }
                Err(e) => {
                    self.report.state =
                        PipelineState::Failed(FailureReason::Geometry(e.to_string()));
                    return false;
                }
            }

            if self.check_cancelled() {
                return false;
            }

            let violations = self.timed("placement-drc", || run_batch_drc(db));
            let blocking = count_blocking(&violations);
            if blocking == 0 {
                self.report.state = PipelineState::Placed;
                return true;
            }
            log::warn!(
                "[pipeline] {} blocking violations after placement (retry {}/{})",
                blocking,
                retry,
                self.config.max_stage_retries
            );
            if retry == self.config.max_stage_retries {
                self.report.violations = violations;
                self.report.state = PipelineState::Failed(FailureReason::RuleViolations {
                    retries: retry,
                    count: blocking,
                });
                return false;
            }
        }
        false
    }

    fn route_stage(&mut self, db: &mut LayoutDb) -> bool {
        for retry in 0..=self.config.max_stage_retries {
            if self.check_cancelled() {
                return false;
            }

            let (config, hints, cancel) = (self.config, self.hints, self.cancel);
            let outcome = self.timed("routing", || route(db, &config.router, hints, cancel));
            let cancelled = outcome.cancelled;
            for name in &outcome.unrouted {
                self.report.warnings.push(
                    LayoutError::RoutingFailure {
                        net_name: name.clone(),
                    }
                    .to_string(),
                );
            }
            for group in &outcome.length_mismatches {
                self.report.warnings.push(format!(
                    "differential pair {} outside length tolerance",
                    group
                ));
            }
            merge_routing(&mut self.report.routing, outcome);

            if cancelled || self.check_cancelled() {
                self.report.state = PipelineState::Cancelled;
                return false;
            }

            let violations = self.timed("routing-drc", || run_batch_drc(db));
            let blocking = count_blocking(&violations);
            if blocking == 0 {
                self.report.state = PipelineState::Routed;
                return true;
            }

            if retry == self.config.max_stage_retries {
                self.report.violations = violations;
                self.report.state = PipelineState::Failed(FailureReason::RuleViolations {
                    retries: retry,
                    count: blocking,
                });
                return false;
            }

            // Loop back: rip up the nets involved in blocking violations and
            // let the router try them again against the updated board
            let mut ripped = 0;
            for v in violations.iter().filter(|v| v.severity == Severity::Error) {
                for name in &v.nets {
                    if let Some(net) = db.net_by_name(name) {
                        if net.status == NetStatus::Routed {
                            let id = net.id;
                            let _ = db.remove_net_routing(id);
                            ripped += 1;
                        }
                    }
                }
            }
            log::warn!(
                "[pipeline] {} blocking violations after routing; ripped up {} nets (retry {}/{})",
                blocking,
                ripped,
                retry,
                self.config.max_stage_retries
            );
            if ripped == 0 {
                // Nothing to rip up means routing cannot fix it
                self.report.violations = violations;
                self.report.state = PipelineState::Failed(FailureReason::RuleViolations {
                    retries: retry,
                    count: blocking,
                });
                return false;
            }
        }
        false
    }

    fn power_stage(&mut self, db: &mut LayoutDb) -> bool {
        for round in 0..=self.config.power_escalation_rounds {
            if self.check_cancelled() {
                return false;
            }

            let findings = self.timed("power-analysis", || power::analyze(db));
            let insufficient: Vec<_> =
                findings.into_iter().filter(|f| !f.sufficient()).collect();
            if insufficient.is_empty() {
                self.report.state = PipelineState::PowerValidated;
                return true;
            }

            if round < self.config.power_escalation_rounds {
                // Escalate: raise the width floor and hand the nets back to
                // the router
                self.report.power_escalations += 1;
                for finding in &insufficient {
                    db.raise_net_min_width(finding.net, finding.required_width);
                    let _ = db.remove_net_routing(finding.net);
                    log::info!(
                        "[pipeline] re-routing power net '{}' at {:.3} mm minimum width",
                        finding.net_name,
                        finding.required_width
                    );
                }
                let (config, hints, cancel) = (self.config, self.hints, self.cancel);
                let outcome =
                    self.timed("power-reroute", || route(db, &config.router, hints, cancel));
                if outcome.cancelled {
                    merge_routing(&mut self.report.routing, outcome);
                    self.report.state = PipelineState::Cancelled;
                    return false;
                }
                merge_routing(&mut self.report.routing, outcome);
                continue;
            }

            // Escalation budget spent: report instead of silently accepting
            // an under-sized path
            let severity = if self.config.power_hard_rule {
                Severity::Error
            } else {
                Severity::Warning
            };
            for finding in &insufficient {
                let location = db.pad_position(db.net(finding.net).pads[0]);
                self.report.violations.push(Violation {
                    rule: RuleKind::PowerCapacity,
                    severity,
                    location,
                    entities: Vec::new(),
                    nets: vec![finding.net_name.clone()],
                    measured: finding.actual_min_width,
                    required: finding.required_width,
                    detail: format!(
                        "power net '{}' carries {:.2} A but its narrowest path is {:.3} mm ({:.3} mm required)",
                        finding.net_name,
                        finding.current_a,
                        finding.actual_min_width,
                        finding.required_width
                    ),
                });
                self.report.warnings.push(
                    LayoutError::PowerCapacityViolation {
                        net_name: finding.net_name.clone(),
                        required_mm: finding.required_width,
                        actual_mm: finding.actual_min_width,
                    }
                    .to_string(),
                );
            }
            if self.config.power_hard_rule {
                self.report.state = PipelineState::Failed(FailureReason::RuleViolations {
                    retries: self.config.power_escalation_rounds,
                    count: insufficient.len(),
                });
                return false;
            }
            self.report.state = PipelineState::PowerValidated;
            return true;
        }
        false
    }

    fn check_cancelled(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            self.report.state = PipelineState::Cancelled;
            true
        } else {
            false
        }
    }

    fn timed<T>(&mut self, phase: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.report.timings.push(PhaseTiming {
            phase: phase.to_string(),
            millis: start.elapsed().as_secs_f64() * 1000.0,
        });
        out
    }
}

/// Accumulate routing outcomes across loop-backs and power re-routes
fn merge_routing(slot: &mut Option<RoutingOutcome>, mut new: RoutingOutcome) {
    match slot {
        None => *slot = Some(new),
        Some(acc) => {
            // Re-routed nets supersede their earlier unrouted entries
            let rerouted: Vec<String> = new
                .per_net
                .iter()
                .filter(|s| s.routed)
                .map(|s| s.net.clone())
                .collect();
            acc.unrouted.retain(|n| !rerouted.contains(n));
            acc.routed += new.routed;
            acc.total_attempts += new.total_attempts;
            acc.per_net.append(&mut new.per_net);
            acc.cancelled |= new.cancelled;
            acc.unrouted.append(&mut new.unrouted);
            acc.length_mismatches.append(&mut new.length_mismatches);
        }
    }
}

fn count_blocking(violations: &[Violation]) -> usize {
    violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count()
}

/// The outline must hold the combined footprint area even at zero spacing
fn check_capacity(db: &LayoutDb) -> Result<()> {
    let available = db.outline().area();
    let required: f32 = db
        .components()
        .iter()
        .map(|c| c.local_bounds(db.pads()).area())
        .sum();
    if required > available {
        return Err(LayoutError::BoardTooSmall {
            required_mm2: required,
            available_mm2: available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());

        let cloned = CancelToken::new();
        let other = cloned.clone();
        other.cancel();
        assert!(cloned.is_cancelled(), "clones share the flag");
    }

    #[test]
    fn test_deadline_token() {
        let token = CancelToken::with_deadline(Duration::from_secs(3600));
        assert!(!token.is_cancelled());
        let expired = CancelToken::with_deadline(Duration::from_nanos(1));
        std::thread::sleep(Duration::from_millis(1));
        assert!(expired.is_cancelled());
    }
}
