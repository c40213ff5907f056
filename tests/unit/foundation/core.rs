use super::*;

#[test]
fn scroll_offset_collapses_invalid_readings() {
    assert_eq!(ScrollOffset::new(-12.0), ScrollOffset::ZERO);
    assert_eq!(ScrollOffset::new(f64::NAN), ScrollOffset::ZERO);
    assert_eq!(ScrollOffset::new(f64::INFINITY), ScrollOffset::ZERO);
    assert_eq!(ScrollOffset::new(250.0).get(), 250.0);
}

#[test]
fn progress_clamps_outside_span() {
    let p = |s: f64| Progress::from_scroll(ScrollOffset::new(s), 100.0, 1000.0).get();
    assert_eq!(p(0.0), 0.0);
    assert_eq!(p(100.0), 0.0);
    assert_eq!(p(600.0), 0.5);
    assert_eq!(p(1100.0), 1.0);
    assert_eq!(p(5000.0), 1.0);
}

#[test]
fn zero_distance_is_a_step() {
    let p = |s: f64| Progress::from_scroll(ScrollOffset::new(s), 300.0, 0.0).get();
    assert_eq!(p(299.0), 0.0);
    assert_eq!(p(300.0), 1.0);
}

#[test]
fn progress_new_handles_nan() {
    assert_eq!(Progress::new(f64::NAN), Progress::ZERO);
    assert_eq!(Progress::new(3.0), Progress::ONE);
}

#[test]
fn viewport_rect_is_origin_anchored() {
    let r = viewport_rect(1280.0, 720.0);
    assert_eq!(r.x0, 0.0);
    assert_eq!(r.y0, 0.0);
    assert_eq!(r.width(), 1280.0);
    assert_eq!(r.height(), 720.0);
}
