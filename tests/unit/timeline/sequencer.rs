use super::*;
use crate::animation::props::PropertyValues;
use crate::surface::style::StyleSurface;
use crate::timeline::segment::{Placement, Segment};

fn pv(pairs: &[(StyleChannel, f64)]) -> PropertyValues {
    pairs.iter().copied().collect()
}

fn get(stage: &Stage, id: &str, channel: StyleChannel) -> Option<f64> {
    stage.get(&TargetId::from(id)).and_then(|s| s.channel(channel))
}

fn fade_out_timeline() -> Rc<Timeline> {
    Rc::new(
        Timeline::builder(1000.0)
            .push(
                Segment::from_to(
                    "card",
                    pv(&[(StyleChannel::Opacity, 1.0)]),
                    pv(&[(StyleChannel::Opacity, 0.0)]),
                )
                .ease(Ease::Linear)
                .duration(1000.0)
                .at(Placement::Absolute(0.0)),
            )
            .unwrap()
            .build()
            .unwrap(),
    )
}

#[test]
fn linear_fade_hits_midpoint_and_end() {
    let mut stage = Stage::new().with("card", StyleSurface::default());
    let seq = Sequencer::bind(fade_out_timeline(), &stage).unwrap();

    seq.apply(Progress::new(0.5), &mut stage);
    let v = get(&stage, "card", StyleChannel::Opacity).unwrap();
    assert!((v - 0.5).abs() < 1e-9);

    seq.apply(Progress::ONE, &mut stage);
    assert_eq!(get(&stage, "card", StyleChannel::Opacity), Some(0.0));
}

#[test]
fn unstarted_segment_holds_its_from_values() {
    let tl = Rc::new(
        Timeline::builder(1000.0)
            .push(
                Segment::to("a", pv(&[(StyleChannel::TranslateX, 100.0)]))
                    .ease(Ease::Linear)
                    .duration(300.0)
                    .at(Placement::Absolute(0.0)),
            )
            .unwrap()
            .push(
                Segment::from_to(
                    "b",
                    pv(&[(StyleChannel::Scale, 0.5)]),
                    pv(&[(StyleChannel::Scale, 2.0)]),
                )
                .ease(Ease::Linear)
                .duration(100.0)
                .at(Placement::AfterPreviousEnd(200.0)),
            )
            .unwrap()
            .build()
            .unwrap(),
    );
    assert_eq!(tl.segments()[1].start, 500.0);
    assert_eq!(tl.duration(), 600.0);

    let mut stage = Stage::new()
        .with("a", StyleSurface::default())
        .with("b", StyleSurface::default());
    let seq = Sequencer::bind(tl, &stage).unwrap();

    for i in 0..=49 {
        // scrub = p * 600 < 500
        let p = Progress::new(f64::from(i) / 60.0);
        seq.apply(p, &mut stage);
        assert_eq!(get(&stage, "b", StyleChannel::Scale), Some(0.5), "at {i}");
    }
    seq.apply(Progress::ONE, &mut stage);
    assert_eq!(get(&stage, "b", StyleChannel::Scale), Some(2.0));
}

#[test]
fn implicit_from_chains_through_earlier_segments() {
    // phone: scale 0.7 -> 1, then to 1.5, then back to 1.
    let tl = Rc::new(
        Timeline::builder(4500.0)
            .push(
                Segment::from_to(
                    "phone",
                    pv(&[(StyleChannel::Scale, 0.7)]),
                    pv(&[(StyleChannel::Scale, 1.0)]),
                )
                .ease(Ease::Linear)
                .duration(1.0)
                .at(Placement::Absolute(0.0)),
            )
            .unwrap()
            .push(
                Segment::to("phone", pv(&[(StyleChannel::Scale, 1.5)]))
                    .ease(Ease::Linear)
                    .duration(1.0)
                    .at(Placement::AfterPreviousEnd(0.0)),
            )
            .unwrap()
            .push(
                Segment::to("phone", pv(&[(StyleChannel::Scale, 1.0)]))
                    .ease(Ease::Linear)
                    .duration(1.0)
                    .at(Placement::AfterPreviousEnd(0.0)),
            )
            .unwrap()
            .build()
            .unwrap(),
    );
    let stage = Stage::new().with("phone", StyleSurface::default());
    let seq = Sequencer::bind(tl, &stage).unwrap();
    let phone = TargetId::from("phone");
    let at = |p: f64| seq.value_at(&phone, StyleChannel::Scale, Progress::new(p)).unwrap();

    assert!((at(0.0) - 0.7).abs() < 1e-9);
    assert!((at(1.0 / 3.0) - 1.0).abs() < 1e-9);
    assert!((at(0.5) - 1.25).abs() < 1e-9);
    assert!((at(2.0 / 3.0) - 1.5).abs() < 1e-9);
    assert!((at(1.0) - 1.0).abs() < 1e-9);
}

#[test]
fn implicit_from_starts_at_captured_style() {
    let tl = Rc::new(
        Timeline::builder(100.0)
            .push(
                Segment::to("card", pv(&[(StyleChannel::TranslateY, 0.0)]))
                    .ease(Ease::Linear)
                    .duration(1.0)
                    .at(Placement::Absolute(0.0)),
            )
            .unwrap()
            .build()
            .unwrap(),
    );
    let stage = Stage::new().with(
        "card",
        StyleSurface::default().with_channel(StyleChannel::TranslateY, 80.0),
    );
    let seq = Sequencer::bind(tl, &stage).unwrap();
    let card = TargetId::from("card");
    assert_eq!(
        seq.value_at(&card, StyleChannel::TranslateY, Progress::ZERO),
        Some(80.0)
    );
    assert_eq!(
        seq.value_at(&card, StyleChannel::TranslateY, Progress::new(0.25)),
        Some(60.0)
    );
}

#[test]
fn apply_is_idempotent_and_reversible() {
    let mut stage = Stage::new().with("card", StyleSurface::default());
    let seq = Sequencer::bind(fade_out_timeline(), &stage).unwrap();

    let steps: Vec<Progress> = (0..=20).map(|i| Progress::new(f64::from(i) / 20.0)).collect();
    let mut forward = Vec::new();
    for p in &steps {
        seq.apply(*p, &mut stage);
        let once = get(&stage, "card", StyleChannel::Opacity);
        seq.apply(*p, &mut stage);
        assert_eq!(get(&stage, "card", StyleChannel::Opacity), once);
        forward.push(once);
    }
    for (p, expected) in steps.iter().zip(&forward).rev() {
        seq.apply(*p, &mut stage);
        assert_eq!(get(&stage, "card", StyleChannel::Opacity), *expected);
    }
}

#[test]
fn revert_restores_baseline_and_clears_untouched() {
    let tl = Rc::new(
        Timeline::builder(100.0)
            .push(
                Segment::to(
                    "card",
                    pv(&[(StyleChannel::Opacity, 0.0), (StyleChannel::Scale, 3.0)]),
                )
                .at(Placement::Absolute(0.0)),
            )
            .unwrap()
            .build()
            .unwrap(),
    );
    let mut stage = Stage::new().with(
        "card",
        StyleSurface::default().with_channel(StyleChannel::Scale, 1.2),
    );
    let seq = Sequencer::bind(tl, &stage).unwrap();
    seq.apply(Progress::ONE, &mut stage);
    assert_eq!(get(&stage, "card", StyleChannel::Opacity), Some(0.0));

    seq.revert(&mut stage);
    assert_eq!(get(&stage, "card", StyleChannel::Opacity), None);
    assert_eq!(get(&stage, "card", StyleChannel::Scale), Some(1.2));
}

#[test]
fn unknown_target_fails_binding() {
    let stage = Stage::new();
    let err = Sequencer::bind(fade_out_timeline(), &stage).unwrap_err();
    assert!(matches!(err, ScrollpinError::Validation(_)));
    assert!(err.to_string().contains("card"));
}

#[test]
fn later_overlapping_segment_takes_over_channel() {
    let tl = Rc::new(
        Timeline::builder(100.0)
            .push(
                Segment::from_to(
                    "card",
                    pv(&[(StyleChannel::TranslateX, 0.0)]),
                    pv(&[(StyleChannel::TranslateX, 100.0)]),
                )
                .ease(Ease::Linear)
                .duration(10.0)
                .at(Placement::Absolute(0.0)),
            )
            .unwrap()
            .push(
                Segment::from_to(
                    "card",
                    pv(&[(StyleChannel::TranslateX, -50.0)]),
                    pv(&[(StyleChannel::TranslateX, -50.0)]),
                )
                .duration(0.0)
                .at(Placement::AfterPreviousStart(5.0)),
            )
            .unwrap()
            .build()
            .unwrap(),
    );
    let stage = Stage::new().with("card", StyleSurface::default());
    let seq = Sequencer::bind(tl, &stage).unwrap();
    let card = TargetId::from("card");
    // duration 10: p=0.4 -> scrub 4 (first key), p=0.6 -> scrub 6 (second key)
    assert_eq!(
        seq.value_at(&card, StyleChannel::TranslateX, Progress::new(0.4)),
        Some(40.0)
    );
    assert_eq!(
        seq.value_at(&card, StyleChannel::TranslateX, Progress::new(0.6)),
        Some(-50.0)
    );
}

#[test]
fn implicit_from_picks_up_a_still_running_segment() {
    // scale 1 -> 2 over [0, 1), then `to` 3 starting half way through.
    let tl = Rc::new(
        Timeline::builder(100.0)
            .push(
                Segment::from_to(
                    "card",
                    pv(&[(StyleChannel::Scale, 1.0)]),
                    pv(&[(StyleChannel::Scale, 2.0)]),
                )
                .ease(Ease::Linear)
                .duration(1.0)
                .at(Placement::Absolute(0.0)),
            )
            .unwrap()
            .push(
                Segment::to("card", pv(&[(StyleChannel::Scale, 3.0)]))
                    .ease(Ease::Linear)
                    .duration(1.0)
                    .at(Placement::AfterPreviousStart(0.5)),
            )
            .unwrap()
            .build()
            .unwrap(),
    );
    assert_eq!(tl.duration(), 1.5);
    let stage = Stage::new().with("card", StyleSurface::default());
    let seq = Sequencer::bind(tl, &stage).unwrap();
    let card = TargetId::from("card");
    let at = |scrub: f64| {
        seq.value_at(&card, StyleChannel::Scale, Progress::new(scrub / 1.5))
            .unwrap()
    };

    let before = at(0.4999);
    let after = at(0.5);
    assert!((after - before).abs() < 1e-3, "{before} -> {after}");
    assert!((after - 1.5).abs() < 1e-9);
    assert!((at(1.0) - 2.25).abs() < 1e-9);
    assert!((at(1.5) - 3.0).abs() < 1e-9);
}

#[test]
fn shared_channel_is_restored_by_whichever_sequencer_reverts_last() {
    let fade_from = |v: f64| {
        Rc::new(
            Timeline::builder(100.0)
                .push(
                    Segment::from_to(
                        "card",
                        pv(&[(StyleChannel::Opacity, v)]),
                        pv(&[(StyleChannel::Opacity, 0.0)]),
                    )
                    .at(Placement::Absolute(0.0)),
                )
                .unwrap()
                .build()
                .unwrap(),
        )
    };
    let card = TargetId::from("card");
    let mut stage = Stage::new().with("card", StyleSurface::default());

    let first = Sequencer::bind(fade_from(0.8), &stage).unwrap();
    first.apply(Progress::ZERO, &mut stage);
    let second = Sequencer::bind(fade_from(0.6), &stage).unwrap();
    second.apply(Progress::ZERO, &mut stage);
    assert_eq!(stage.original(&card, StyleChannel::Opacity), None);
    assert_eq!(stage.holders(&card, StyleChannel::Opacity), 2);

    first.revert(&mut stage);
    assert_eq!(get(&stage, "card", StyleChannel::Opacity), Some(0.6));
    second.revert(&mut stage);
    assert_eq!(get(&stage, "card", StyleChannel::Opacity), None);
    assert_eq!(stage.holders(&card, StyleChannel::Opacity), 0);
}

#[test]
fn revert_without_apply_leaves_stage_alone() {
    let mut stage = Stage::new().with(
        "card",
        StyleSurface::default().with_channel(StyleChannel::Opacity, 0.3),
    );
    let seq = Sequencer::bind(fade_out_timeline(), &stage).unwrap();
    seq.revert(&mut stage);
    assert_eq!(get(&stage, "card", StyleChannel::Opacity), Some(0.3));

    seq.apply(Progress::ONE, &mut stage);
    seq.revert(&mut stage);
    seq.revert(&mut stage);
    assert_eq!(get(&stage, "card", StyleChannel::Opacity), Some(0.3));
}
