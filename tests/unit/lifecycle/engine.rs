use super::*;
use crate::animation::ease::Ease;
use crate::animation::props::{PropertyValues, StyleChannel};
use crate::scroll::source::{NativeScroll, ScrollBackend, SmoothScroll};
use crate::surface::style::{PinLayout, StyleSurface};
use crate::timeline::segment::{Placement, Segment};

struct Rig {
    backend: Rc<dyn ScrollBackend>,
    engine: Engine,
}

impl Rig {
    fn new(width: f64) -> Self {
        Self::with_backend(Rc::new(NativeScroll::new(20_000.0)), width)
    }

    fn with_backend(backend: Rc<dyn ScrollBackend>, width: f64) -> Self {
        let adapter = ScrollAdapter::new(Some(Rc::clone(&backend)), width, 800.0).shared();
        let stage = Stage::new()
            .with("hero", StyleSurface::new(Rect::new(0.0, 1000.0, width, 1800.0)))
            .with("card", StyleSurface::default())
            .shared();
        let engine = Engine::from_config(&EngineConfig::default(), adapter, stage).unwrap();
        Self { backend, engine }
    }

    fn scroll_to(&self, y: f64) {
        self.engine.scroll().seek(y);
        self.engine.scroll().notify_scroll();
    }

    fn channel(&self, id: &str, channel: StyleChannel) -> Option<f64> {
        self.engine
            .stage()
            .borrow()
            .get(&TargetId::from(id))
            .and_then(|s| s.channel(channel))
    }

    fn pin(&self) -> PinLayout {
        self.engine
            .stage()
            .borrow()
            .get(&TargetId::from("hero"))
            .map(|s| s.pin_layout())
            .unwrap()
    }
}

fn one(channel: StyleChannel, v: f64) -> PropertyValues {
    PropertyValues::new().with(channel, v)
}

fn fade(distance: f64) -> Timeline {
    Timeline::builder(distance)
        .push(
            Segment::from_to(
                "card",
                one(StyleChannel::Opacity, 1.0),
                one(StyleChannel::Opacity, 0.0),
            )
            .ease(Ease::Linear)
            .duration(1.0)
            .at(Placement::Absolute(0.0)),
        )
        .unwrap()
        .build()
        .unwrap()
}

fn grow(distance: f64) -> Timeline {
    Timeline::builder(distance)
        .push(
            Segment::to("card", one(StyleChannel::Scale, 2.0))
                .ease(Ease::Linear)
                .duration(1.0)
                .at(Placement::Absolute(0.0)),
        )
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn progress_and_pin_follow_scroll() {
    let rig = Rig::new(1280.0);
    let handle = rig.engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();
    assert!(!handle.is_static());
    assert_eq!(handle.variant().as_deref(), Some("desktop"));

    assert_eq!(handle.state(), PinState::Unpinned);
    assert_eq!(handle.progress(), Progress::ZERO);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(1.0));
    assert_eq!(rig.pin(), PinLayout::Flow);

    rig.scroll_to(1500.0);
    assert_eq!(handle.state(), PinState::Pinned);
    assert_eq!(handle.progress().get(), 0.5);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.5));
    assert_eq!(rig.pin(), PinLayout::Fixed { top: 0.0 });

    rig.scroll_to(2500.0);
    assert_eq!(handle.state(), PinState::Released);
    assert_eq!(handle.progress(), Progress::ONE);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.0));
    assert_eq!(rig.pin(), PinLayout::Released { y: 1000.0 });

    rig.scroll_to(0.0);
    assert_eq!(handle.state(), PinState::Unpinned);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(1.0));
}

#[test]
fn mount_syncs_to_current_offset() {
    let rig = Rig::new(1280.0);
    rig.engine.scroll().seek(1250.0);
    let handle = rig.engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();
    assert_eq!(handle.progress().get(), 0.25);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.75));
}

#[test]
fn detach_reverts_and_is_idempotent() {
    let rig = Rig::new(1280.0);
    let handle = rig.engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();
    rig.scroll_to(1500.0);

    handle.detach();
    assert_eq!(rig.channel("card", StyleChannel::Opacity), None);
    assert_eq!(rig.pin(), PinLayout::Flow);

    // No longer driven.
    rig.scroll_to(1800.0);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), None);

    let dropped = rig.engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();
    rig.scroll_to(1200.0);
    drop(dropped);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), None);
    assert_eq!(rig.pin(), PinLayout::Flow);
}

#[test]
fn class_change_rebuilds_without_residue() {
    let rig = Rig::new(1280.0);
    let factory = Responsive::new()
        .variant("desktop", timeline_fn(|_| Ok(fade(1000.0))))
        .variant("mobile", timeline_fn(|_| Ok(grow(500.0))));
    let handle = rig.engine.attach("hero", factory).unwrap();

    rig.scroll_to(1500.0);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.5));

    rig.engine.resize(375.0, 800.0);
    assert_eq!(handle.variant().as_deref(), Some("mobile"));
    assert_eq!(rig.channel("card", StyleChannel::Opacity), None);
    assert_eq!(handle.timeline().unwrap().scroll_distance(), 500.0);
    assert_eq!(handle.state(), PinState::Released);
    assert_eq!(rig.channel("card", StyleChannel::Scale), Some(2.0));

    rig.engine.resize(1280.0, 800.0);
    assert_eq!(handle.variant().as_deref(), Some("desktop"));
    assert_eq!(rig.channel("card", StyleChannel::Scale), None);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.5));
}

#[test]
fn class_without_variant_stays_static() {
    let rig = Rig::new(375.0);
    let factory = Responsive::new().variant("desktop", timeline_fn(|_| Ok(fade(1000.0))));
    let handle = rig.engine.attach("hero", factory).unwrap();
    assert!(handle.is_static());
    rig.scroll_to(1500.0);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), None);

    rig.engine.resize(1280.0, 800.0);
    assert!(!handle.is_static());
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.5));
}

#[test]
fn mount_failure_returns_error_and_writes_nothing() {
    let rig = Rig::new(1280.0);
    let err = rig
        .engine
        .attach(
            "hero",
            timeline_fn(|_| {
                Timeline::builder(1000.0)
                    .push(Segment::to("card", one(StyleChannel::Opacity, 0.0)).at(Placement::Absolute(0.0)))?
                    .push(Segment::to("ghost", one(StyleChannel::Opacity, 0.0)))?
                    .build()
            }),
        )
        .unwrap_err();
    assert!(err.to_string().contains("ghost"));
    assert_eq!(rig.channel("card", StyleChannel::Opacity), None);
    assert_eq!(rig.pin(), PinLayout::Flow);

    let err = rig
        .engine
        .attach("nowhere", timeline_fn(|_| Ok(fade(1000.0))))
        .unwrap_err();
    assert!(matches!(err, ScrollpinError::Validation(_)));
}

#[test]
fn rebuild_failure_is_recorded_and_static() {
    let rig = Rig::new(1280.0);
    let factory = Responsive::new()
        .variant("desktop", timeline_fn(|_| Ok(fade(1000.0))))
        .variant(
            "mobile",
            timeline_fn(|_| Err(ScrollpinError::validation("mobile layout not ready"))),
        );
    let handle = rig.engine.attach("hero", factory).unwrap();
    rig.scroll_to(1500.0);

    rig.engine.resize(375.0, 800.0);
    assert!(handle.is_static());
    assert!(handle.last_error().unwrap().contains("mobile layout not ready"));
    assert_eq!(rig.channel("card", StyleChannel::Opacity), None);
    assert_eq!(rig.pin(), PinLayout::Flow);

    rig.engine.resize(1280.0, 800.0);
    assert_eq!(handle.last_error(), None);
    assert!(!handle.is_static());
}

#[test]
fn unavailable_source_degrades_to_static() {
    let stage = Stage::new()
        .with("hero", StyleSurface::new(Rect::new(0.0, 1000.0, 1280.0, 1800.0)))
        .with("card", StyleSurface::default())
        .shared();
    let engine = Engine::from_config(
        &EngineConfig::default(),
        ScrollAdapter::disabled(1280.0, 800.0).shared(),
        Rc::clone(&stage),
    )
    .unwrap();
    let handle = engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();
    assert!(handle.is_static());
    assert_eq!(handle.state(), PinState::Unpinned);
    engine.scroll().notify_scroll();
    assert!(
        stage
            .borrow()
            .get(&TargetId::from("card"))
            .unwrap()
            .channel(StyleChannel::Opacity)
            .is_none()
    );
    handle.detach();
}

#[test]
fn reduced_motion_jumps_to_end_without_pinning() {
    let rig = Rig::new(1280.0);
    let Rig { backend, engine } = rig;
    let rig = Rig {
        backend,
        engine: engine.with_reduced_motion(ReducedMotion::JumpToEnd),
    };
    let handle = rig.engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();
    assert!(handle.is_static());
    assert_eq!(handle.progress(), Progress::ONE);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.0));

    rig.scroll_to(1500.0);
    assert_eq!(rig.pin(), PinLayout::Flow);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.0));
}

#[test]
fn smooth_scroll_counter_translates_the_pin() {
    let smooth = Rc::new(SmoothScroll::new(20_000.0, Default::default()));
    let rig = Rig::with_backend(smooth.clone(), 1280.0);
    let _handle = rig.engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();

    smooth.scroll_to(1600.0);
    while smooth.tick() {
        rig.engine.scroll().notify_scroll();
    }
    rig.engine.scroll().notify_scroll();
    assert_eq!(rig.backend.read(), 1600.0);
    assert_eq!(rig.pin(), PinLayout::Transform { y: 600.0 });
}

#[test]
fn refresh_rebuilds_against_new_layout() {
    let rig = Rig::new(1280.0);
    let handle = rig.engine.attach("hero", timeline_fn(|_| Ok(fade(1000.0)))).unwrap();
    rig.scroll_to(1500.0);
    assert_eq!(handle.state(), PinState::Pinned);

    rig.engine.stage().borrow_mut().insert(
        "hero",
        StyleSurface::new(Rect::new(0.0, 2000.0, 1280.0, 2800.0)),
    );
    rig.engine.scroll().refresh();
    assert_eq!(handle.state(), PinState::Unpinned);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(1.0));
}

#[test]
fn factory_sees_viewport_and_trigger() {
    let rig = Rig::new(1280.0);
    let _handle = rig
        .engine
        .attach(
            "hero",
            timeline_fn(|ctx| {
                assert_eq!(ctx.variant, Some("desktop"));
                assert_eq!(ctx.trigger.as_str(), "hero");
                assert_eq!(ctx.trigger_box.y0, 1000.0);
                assert!(ctx.stage.contains(&TargetId::from("card")));
                Ok(fade(ctx.viewport.height() * 2.0))
            }),
        )
        .unwrap();
    rig.scroll_to(1800.0);
    assert_eq!(rig.channel("card", StyleChannel::Opacity), Some(0.5));
}
