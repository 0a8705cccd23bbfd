// End-to-end pipeline tests: the stage machine, capacity gating,
// cancellation, and the diagnostic report.
use layout_engine::geometry::{PadShape, Placement, Point};
use layout_engine::ir::{BoardIr, ComponentDef, NetClass, NetDef, PadDef};
use layout_engine::pipeline::{
    CancelToken, FailureReason, LayoutPipeline, PipelineConfig, PipelineState,
};

fn corner_pad_part(name: &str, half: f32, pinned: Option<Placement>) -> ComponentDef {
    ComponentDef {
        name: name.into(),
        pads: vec![
            PadDef {
                pin: "1".into(),
                offset: Point::new(-half, -half),
                shape: PadShape::Circle { diameter: 0.4 },
                layers: vec![0],
            },
            PadDef {
                pin: "2".into(),
                offset: Point::new(half, half),
                shape: PadShape::Circle { diameter: 0.4 },
                layers: vec![0],
            },
        ],
        pinned,
        thermal: Default::default(),
    }
}

/// A board with zero components and zero nets completes with an empty
/// violation list.
#[test]
fn test_empty_board_completes() {
    let ir = BoardIr::new(50.0, 50.0);
    let result = LayoutPipeline::new(PipelineConfig::new())
        .run(&ir, &Default::default(), &CancelToken::new())
        .unwrap();

    assert_eq!(result.report.state, PipelineState::Complete);
    assert!(result.report.violations.is_empty());
    assert!(result.report.nets.is_empty());
}

/// An outline too small for the combined pinned footprints fails with a
/// geometry error before placement begins.
#[test]
fn test_board_too_small_fails_before_placement() {
    // Two 4.4 x 4.4 mm pinned footprints need ~39 mm2; a 5x5 board has 25.
    // Their pads interleave without overlapping, so construction succeeds
    // and the capacity gate is what trips.
    let mut ir_small = BoardIr::new(5.0, 5.0);
    ir_small.components.push(ComponentDef {
        pads: vec![
            PadDef {
                pin: "1".into(),
                offset: Point::new(-2.0, -2.0),
                shape: PadShape::Circle { diameter: 0.4 },
                layers: vec![0],
            },
            PadDef {
                pin: "2".into(),
                offset: Point::new(2.0, 2.0),
                shape: PadShape::Circle { diameter: 0.4 },
                layers: vec![0],
            },
        ],
        name: "J1".into(),
        pinned: Some(Placement::new(2.5, 2.5, 0.0)),
        thermal: Default::default(),
    });
    ir_small.components.push(ComponentDef {
        pads: vec![
            PadDef {
                pin: "1".into(),
                offset: Point::new(2.0, -2.0),
                shape: PadShape::Circle { diameter: 0.4 },
                layers: vec![0],
            },
            PadDef {
                pin: "2".into(),
                offset: Point::new(-2.0, 2.0),
                shape: PadShape::Circle { diameter: 0.4 },
                layers: vec![0],
            },
        ],
        name: "J2".into(),
        pinned: Some(Placement::new(2.5, 2.5, 0.0)),
        thermal: Default::default(),
    });

    let result = LayoutPipeline::new(PipelineConfig::new())
        .run(&ir_small, &Default::default(), &CancelToken::new())
        .unwrap();

    match &result.report.state {
        PipelineState::Failed(FailureReason::Geometry(msg)) => {
            assert!(msg.contains("too small"), "unexpected message: {}", msg);
        }
        other => panic!("expected geometry failure, got {:?}", other),
    }
    assert!(
        result.report.placement.is_none(),
        "must fail before placement begins"
    );
}

/// A pre-cancelled token stops the pipeline with partial results instead of
/// rolling back.
#[test]
fn test_cancellation_returns_partial() {
    let mut ir = BoardIr::new(50.0, 50.0);
    ir.components
        .push(corner_pad_part("R1", 1.0, Some(Placement::new(10.0, 10.0, 0.0))));
    ir.components
        .push(corner_pad_part("R2", 1.0, Some(Placement::new(40.0, 40.0, 0.0))));
    ir.nets.push(NetDef {
        name: "N".into(),
        class: NetClass::General,
        pads: vec![("R1".into(), "2".into()), ("R2".into(), "1".into())],
        constraints: Default::default(),
    });

    let token = CancelToken::new();
    token.cancel();
    let result = LayoutPipeline::new(PipelineConfig::new())
        .run(&ir, &Default::default(), &token)
        .unwrap();

    assert_eq!(result.report.state, PipelineState::Cancelled);
}

/// The full state machine lands on Complete for a routable board, with the
/// report serializable for downstream tooling.
#[test]
fn test_report_serializes() {
    let mut ir = BoardIr::new(50.0, 50.0);
    ir.components
        .push(corner_pad_part("R1", 1.0, Some(Placement::new(10.0, 25.0, 0.0))));
    ir.components
        .push(corner_pad_part("R2", 1.0, Some(Placement::new(40.0, 25.0, 0.0))));
    ir.nets.push(NetDef {
        name: "N".into(),
        class: NetClass::General,
        pads: vec![("R1".into(), "2".into()), ("R2".into(), "1".into())],
        constraints: Default::default(),
    });

    let result = LayoutPipeline::new(PipelineConfig::new())
        .run(&ir, &Default::default(), &CancelToken::new())
        .unwrap();

    assert_eq!(result.report.state, PipelineState::Complete);
    let json = result.report.to_json().unwrap();
    assert!(json.contains("\"Complete\""));
    assert!(json.contains("\"N\""));
    assert!(!result.report.timings.is_empty());

    // The snapshot carries the routed geometry for manufacturing output
    let snapshot = result.db.snapshot();
    assert_eq!(snapshot.nets.len(), 1);
    assert!(!snapshot.segments.is_empty());
    let snapshot_json = serde_json::to_string(&snapshot).unwrap();
    assert!(snapshot_json.contains("segments"));
}

/// Placement on unpinned components commits everything inside the outline
/// and the pipeline reaches Complete.
#[test]
fn test_unpinned_components_place_and_route() {
    let mut ir = BoardIr::new(60.0, 60.0);
    for i in 0..6 {
        ir.components
            .push(corner_pad_part(&format!("U{}", i), 1.0, None));
    }
    // A small daisy chain
    for i in 0..5 {
        ir.nets.push(NetDef {
            name: format!("n{}", i),
            class: NetClass::General,
            pads: vec![
                (format!("U{}", i), "2".into()),
                (format!("U{}", i + 1), "1".into()),
            ],
            constraints: Default::default(),
        });
    }

    let result = LayoutPipeline::new(PipelineConfig::new())
        .run(&ir, &Default::default(), &CancelToken::new())
        .unwrap();

    assert_eq!(result.report.state, PipelineState::Complete, "warnings: {:?}", result.report.warnings);
    let outline = result.db.outline();
    for comp in result.db.components() {
        assert!(comp.committed, "component '{}' left uncommitted", comp.name);
        assert!(
            outline.contains_rect(&result.db.component_bounds(comp.id)),
            "component '{}' escaped the outline",
            comp.name
        );
    }
    let placement = result.report.placement.as_ref().unwrap();
    assert!(placement.iterations > 0);
}

/// Identical input and seed produce identical placements.
#[test]
fn test_placement_determinism() {
    let mut ir = BoardIr::new(60.0, 60.0);
    for i in 0..5 {
        ir.components
            .push(corner_pad_part(&format!("U{}", i), 1.0, None));
    }
    ir.nets.push(NetDef {
        name: "n0".into(),
        class: NetClass::General,
        pads: vec![("U0".into(), "2".into()), ("U3".into(), "1".into())],
        constraints: Default::default(),
    });

    let run = || {
        LayoutPipeline::new(PipelineConfig::new())
            .run(&ir, &Default::default(), &CancelToken::new())
            .unwrap()
    };
    let first = run();
    let second = run();

    for (a, b) in first
        .db
        .components()
        .iter()
        .zip(second.db.components().iter())
    {
        assert_eq!(a.name, b.name);
        assert!(
            (a.placement.x - b.placement.x).abs() < 1e-6
                && (a.placement.y - b.placement.y).abs() < 1e-6,
            "component '{}' placed differently across runs",
            a.name
        );
    }
}

/// Pinned components never move.
#[test]
fn test_pinned_components_stay_fixed() {
    let mut ir = BoardIr::new(60.0, 60.0);
    let fixed = Placement::new(5.0, 30.0, 0.0);
    ir.components.push(corner_pad_part("J1", 1.0, Some(fixed)));
    for i in 0..3 {
        ir.components
            .push(corner_pad_part(&format!("U{}", i), 1.0, None));
    }
    ir.nets.push(NetDef {
        name: "n".into(),
        class: NetClass::General,
        pads: vec![("J1".into(), "2".into()), ("U1".into(), "1".into())],
        constraints: Default::default(),
    });

    let result = LayoutPipeline::new(PipelineConfig::new())
        .run(&ir, &Default::default(), &CancelToken::new())
        .unwrap();

    assert_eq!(result.report.state, PipelineState::Complete);
    let j1 = result.db.component_by_name("J1").unwrap();
    assert_eq!(j1.placement, fixed);
}

/// Hinted positions bias the initial configuration.
#[test]
fn test_hints_bias_placement() {
    use layout_engine::LayoutHints;

    let mut ir = BoardIr::new(60.0, 60.0);
    ir.components.push(corner_pad_part("U0", 1.0, None));
    ir.components.push(corner_pad_part("U1", 1.0, None));

    let hints = LayoutHints {
        positions: vec![
            ("U0".into(), Placement::new(10.0, 10.0, 0.0)),
            ("U1".into(), Placement::new(50.0, 50.0, 0.0)),
        ],
        corridors: Vec::new(),
    };

    let result = LayoutPipeline::new(PipelineConfig::new())
        .run(&ir, &hints, &CancelToken::new())
        .unwrap();

    assert_eq!(result.report.state, PipelineState::Complete);
    // No nets pull the parts anywhere, so they should settle near the hints
    let u0 = result.db.component_by_name("U0").unwrap().placement;
    let u1 = result.db.component_by_name("U1").unwrap().placement;
    assert!((u0.x - 10.0).abs() < 5.0 && (u0.y - 10.0).abs() < 5.0);
    assert!((u1.x - 50.0).abs() < 5.0 && (u1.y - 50.0).abs() < 5.0);
}
