use scrollpin::{
    Engine, EngineConfig, Rect, ResponsiveDef, ScrollAdapter, SmoothScrollConfig, Stage,
    StyleChannel, StyleSurface, TargetId,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let def = ResponsiveDef::from_json(include_str!("../tests/data/phone_scroll.json"))?;
    let stage = Stage::new()
        .with("services", StyleSurface::new(Rect::new(0.0, 800.0, 1280.0, 1600.0)))
        .with("phone", StyleSurface::default())
        .with("copy", StyleSurface::default())
        .with("screen", StyleSurface::default())
        .shared();
    let config = EngineConfig {
        smooth_scroll: Some(SmoothScrollConfig::default()),
        ..EngineConfig::default()
    };
    config.validate()?;
    let adapter = ScrollAdapter::new(Some(config.scroll_backend(8000.0)), 1280.0, 800.0).shared();
    let engine = Engine::from_config(&config, adapter, stage)?;
    let section = engine.attach("services", def)?;

    let phone = TargetId::from("phone");
    for y in (0..=6000).step_by(500) {
        engine.scroll().seek(f64::from(y));
        engine.scroll().notify_scroll();
        let stage = engine.stage().borrow();
        let Some(surface) = stage.get(&phone) else {
            continue;
        };
        println!(
            "scroll {y:>5}: {:?} p={:.3} scale={:.3} opacity={:.3}",
            section.state(),
            section.progress().get(),
            surface.channel(StyleChannel::Scale).unwrap_or(1.0),
            surface.channel(StyleChannel::Opacity).unwrap_or(1.0),
        );
    }

    engine.resize(375.0, 800.0);
    println!("after resize: variant={:?}", section.variant());
    section.detach();
    Ok(())
}
