// Design-rule checker scenario tests: clearance measurement, report
// ordering, idempotence, and continuity classification.
use layout_engine::db::{FeatureId, LayoutDb};
use layout_engine::drc::{run_batch_drc, RuleKind, Severity};
use layout_engine::geometry::{PadShape, Placement, Point};
use layout_engine::ir::{BoardIr, ComponentDef, NetClass, NetDef, PadDef};
use layout_engine::RuleSet;

fn single_pad_part(name: &str, x: f32, y: f32, diameter: f32) -> ComponentDef {
    ComponentDef {
        name: name.into(),
        pads: vec![PadDef {
            pin: "1".into(),
            offset: Point::new(0.0, 0.0),
            shape: PadShape::Circle { diameter },
            layers: vec![0],
        }],
        pinned: Some(Placement::new(x, y, 0.0)),
        thermal: Default::default(),
    }
}

fn net(name: &str, class: NetClass, pads: &[(&str, &str)]) -> NetDef {
    NetDef {
        name: name.into(),
        class,
        pads: pads
            .iter()
            .map(|(c, p)| (c.to_string(), p.to_string()))
            .collect(),
        constraints: Default::default(),
    }
}

/// Two pads 0.1 mm apart under a 0.2 mm clearance rule: exactly one
/// clearance violation referencing both pads with the measured distance.
#[test]
fn test_two_pads_clearance_scenario() {
    let mut ir = BoardIr::new(20.0, 20.0);
    // 1.0 mm circles with centers 1.1 mm apart leave a 0.1 mm gap
    ir.components.push(single_pad_part("C1", 5.0, 5.0, 1.0));
    ir.components.push(single_pad_part("C2", 6.1, 5.0, 1.0));
    ir.nets.push(net("A", NetClass::General, &[("C1", "1")]));
    ir.nets.push(net("B", NetClass::General, &[("C2", "1")]));

    let rules = RuleSet {
        signal_clearance: 0.2,
        ..Default::default()
    };
    let db = LayoutDb::from_ir(&ir, rules).unwrap();
    let violations = run_batch_drc(&db);

    assert_eq!(violations.len(), 1, "got {:?}", violations);
    let v = &violations[0];
    assert_eq!(v.rule, RuleKind::Clearance);
    assert_eq!(v.severity, Severity::Error);
    assert!((v.measured - 0.1).abs() < 1e-3, "measured {}", v.measured);
    assert!((v.required - 0.2).abs() < 1e-6);
    assert_eq!(v.nets, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(v.entities.len(), 2);
    assert!(v
        .entities
        .iter()
        .all(|e| matches!(e, FeatureId::Pad(_))));
}

/// The same snapshot checked twice yields the identical violation list.
#[test]
fn test_batch_drc_idempotent() {
    let mut ir = BoardIr::new(20.0, 20.0);
    ir.components.push(single_pad_part("C1", 5.0, 5.0, 1.0));
    ir.components.push(single_pad_part("C2", 6.1, 5.0, 1.0));
    ir.components.push(single_pad_part("C3", 6.1, 6.1, 1.0));
    ir.nets.push(net("A", NetClass::General, &[("C1", "1")]));
    ir.nets.push(net("B", NetClass::General, &[("C2", "1")]));
    ir.nets.push(net("C", NetClass::General, &[("C3", "1")]));

    let rules = RuleSet {
        signal_clearance: 0.2,
        ..Default::default()
    };
    let db = LayoutDb::from_ir(&ir, rules).unwrap();

    let first = run_batch_drc(&db);
    let second = run_batch_drc(&db);
    assert!(!first.is_empty());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap(),
        "batch DRC must be idempotent over an unchanged snapshot"
    );
}

/// Power nets get the finer clearance threshold.
#[test]
fn test_power_clearance_threshold() {
    let mut ir = BoardIr::new(20.0, 20.0);
    // 0.25 mm gap: fine for 0.15 signal clearance, violates 0.30 power
    ir.components.push(single_pad_part("C1", 5.0, 5.0, 1.0));
    ir.components.push(single_pad_part("C2", 6.25, 5.0, 1.0));
    ir.nets.push(net("VCC", NetClass::Power, &[("C1", "1")]));
    ir.nets.push(net("SIG", NetClass::General, &[("C2", "1")]));

    let db = LayoutDb::from_ir(&ir, RuleSet::default()).unwrap();
    let violations = run_batch_drc(&db);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, RuleKind::Clearance);
    assert!((violations[0].required - 0.30).abs() < 1e-6);
}

/// A disconnected multi-pad net reports as unrouted, not as clearance.
#[test]
fn test_disconnected_net_reports_unrouted() {
    let mut ir = BoardIr::new(20.0, 20.0);
    ir.components.push(single_pad_part("C1", 5.0, 5.0, 1.0));
    ir.components.push(single_pad_part("C2", 15.0, 15.0, 1.0));
    ir.nets
        .push(net("N1", NetClass::General, &[("C1", "1"), ("C2", "1")]));

    let db = LayoutDb::from_ir(&ir, RuleSet::default()).unwrap();
    let violations = run_batch_drc(&db);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, RuleKind::Unrouted);
    assert_eq!(violations[0].severity, Severity::Warning);
    assert_eq!(violations[0].nets, vec!["N1".to_string()]);
    assert_eq!(violations[0].entities.len(), 2);
}

/// Violations come out sorted by rule kind, then net name, then location.
#[test]
fn test_violation_ordering_contract() {
    let mut ir = BoardIr::new(30.0, 30.0);
    // Two clearance pairs plus one disconnected net
    ir.components.push(single_pad_part("C1", 5.0, 5.0, 1.0));
    ir.components.push(single_pad_part("C2", 6.1, 5.0, 1.0));
    ir.components.push(single_pad_part("C3", 20.0, 20.0, 1.0));
    ir.components.push(single_pad_part("C4", 21.1, 20.0, 1.0));
    ir.components.push(single_pad_part("C5", 5.0, 25.0, 1.0));
    ir.components.push(single_pad_part("C6", 25.0, 25.0, 1.0));
    ir.nets.push(net("aa", NetClass::General, &[("C1", "1")]));
    ir.nets.push(net("ab", NetClass::General, &[("C2", "1")]));
    ir.nets.push(net("zz", NetClass::General, &[("C3", "1")]));
    ir.nets.push(net("zy", NetClass::General, &[("C4", "1")]));
    ir.nets
        .push(net("mm", NetClass::General, &[("C5", "1"), ("C6", "1")]));

    let rules = RuleSet {
        signal_clearance: 0.2,
        ..Default::default()
    };
    let db = LayoutDb::from_ir(&ir, rules).unwrap();
    let violations = run_batch_drc(&db);

    assert_eq!(violations.len(), 3);
    // Clearance sorts before unrouted; 'aa' pair before 'zy' pair
    assert_eq!(violations[0].rule, RuleKind::Clearance);
    assert_eq!(violations[0].nets[0], "aa");
    assert_eq!(violations[1].rule, RuleKind::Clearance);
    assert_eq!(violations[1].nets[0], "zy");
    assert_eq!(violations[2].rule, RuleKind::Unrouted);
}

/// A heat source too close to a heat-sensitive part trips the thermal rule.
#[test]
fn test_thermal_spacing() {
    use layout_engine::ir::ThermalTag;

    let two_pin = |name: &str, x: f32, y: f32, thermal: ThermalTag| ComponentDef {
        name: name.into(),
        pads: vec![
            PadDef {
                pin: "1".into(),
                offset: Point::new(-1.0, 0.0),
                shape: PadShape::Rectangle {
                    width: 0.8,
                    height: 0.8,
                },
                layers: vec![0],
            },
            PadDef {
                pin: "2".into(),
                offset: Point::new(1.0, 0.0),
                shape: PadShape::Rectangle {
                    width: 0.8,
                    height: 0.8,
                },
                layers: vec![0],
            },
        ],
        pinned: Some(Placement::new(x, y, 0.0)),
        thermal,
    };

    let mut ir = BoardIr::new(30.0, 30.0);
    ir.components.push(two_pin(
        "Q1",
        10.0,
        10.0,
        ThermalTag::Source { power_w: 2.5 },
    ));
    ir.components
        .push(two_pin("U1", 10.0, 11.5, ThermalTag::Sensitive));

    let db = LayoutDb::from_ir(&ir, RuleSet::default()).unwrap();
    let violations = run_batch_drc(&db);

    let thermal: Vec<_> = violations
        .iter()
        .filter(|v| v.rule == RuleKind::Thermal)
        .collect();
    assert_eq!(thermal.len(), 1, "got {:?}", violations);
    assert!(thermal[0].measured < thermal[0].required);
    assert!(thermal[0].detail.contains("Q1"));
    assert!(thermal[0].detail.contains("U1"));

    // The same pair far apart is clean
    let mut ir_far = BoardIr::new(30.0, 30.0);
    ir_far.components.push(two_pin(
        "Q1",
        5.0,
        5.0,
        ThermalTag::Source { power_w: 2.5 },
    ));
    ir_far
        .components
        .push(two_pin("U1", 25.0, 25.0, ThermalTag::Sensitive));
    let db_far = LayoutDb::from_ir(&ir_far, RuleSet::default()).unwrap();
    assert!(run_batch_drc(&db_far)
        .iter()
        .all(|v| v.rule != RuleKind::Thermal));
}

/// Incremental DRC over the touched region finds what batch finds there.
#[test]
fn test_incremental_matches_batch_in_region() {
    use layout_engine::db::LayerId;
    use layout_engine::geometry::Rect;

    let mut ir = BoardIr::new(20.0, 20.0);
    ir.components.push(single_pad_part("C1", 5.0, 5.0, 1.0));
    ir.components.push(single_pad_part("C2", 6.1, 5.0, 1.0));
    ir.nets.push(net("A", NetClass::General, &[("C1", "1")]));
    ir.nets.push(net("B", NetClass::General, &[("C2", "1")]));

    let rules = RuleSet {
        signal_clearance: 0.2,
        ..Default::default()
    };
    let db = LayoutDb::from_ir(&ir, rules).unwrap();

    let region = Rect::new(Point::new(4.0, 4.0), Point::new(7.0, 6.0));
    let incremental = layout_engine::run_incremental_drc(&db, LayerId(0), &region);
    assert_eq!(incremental.len(), 1);
    assert_eq!(incremental[0].rule, RuleKind::Clearance);

    let far_region = Rect::new(Point::new(15.0, 15.0), Point::new(18.0, 18.0));
    let empty = layout_engine::run_incremental_drc(&db, LayerId(0), &far_region);
    assert!(empty.is_empty());
}
