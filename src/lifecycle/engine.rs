use crate::breakpoint::evaluator::BreakpointEvaluator;
use crate::config::{EngineConfig, ReducedMotion};
use crate::events::listeners::Subscription;
use crate::foundation::core::{Progress, Rect, ScrollOffset};
use crate::foundation::error::{ScrollpinError, ScrollpinResult};
use crate::pin::controller::{PinController, PinState};
use crate::scroll::adapter::ScrollAdapter;
use crate::surface::stage::{SharedStage, Stage, TargetId};
use crate::timeline::segment::Timeline;
use crate::timeline::sequencer::Sequencer;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Everything a [`TimelineFactory`] may look at while building.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    /// Active viewport class, if any predicate matched.
    pub variant: Option<&'a str>,
    /// Viewport box at build time.
    pub viewport: Rect,
    /// Trigger element key.
    pub trigger: &'a TargetId,
    /// Trigger element layout box.
    pub trigger_box: Rect,
    /// Stage, for reading element geometry (function-valued properties).
    pub stage: &'a Stage,
}

impl fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("variant", &self.variant)
            .field("viewport", &self.viewport)
            .field("trigger", &self.trigger)
            .field("trigger_box", &self.trigger_box)
            .finish_non_exhaustive()
    }
}

/// Builds the timeline for the active viewport class.
///
/// Called on mount, on every class change and on every refresh. Returning `Ok(None)` mounts
/// nothing; the section stays static until the next rebuild.
pub trait TimelineFactory {
    /// Build a fresh timeline for `ctx`.
    fn build(&self, ctx: &BuildContext<'_>) -> ScrollpinResult<Option<Timeline>>;
}

/// Closure-backed [`TimelineFactory`], see [`timeline_fn`].
#[derive(Clone, Copy)]
pub struct TimelineFn<F>(F);

/// Wrap a closure that always builds a timeline.
///
/// The closure runs again on every rebuild, so element-dependent values (widths, heights) are
/// re-measured each time.
pub fn timeline_fn<F>(f: F) -> TimelineFn<F>
where
    F: Fn(&BuildContext<'_>) -> ScrollpinResult<Timeline>,
{
    TimelineFn(f)
}

impl<F> TimelineFactory for TimelineFn<F>
where
    F: Fn(&BuildContext<'_>) -> ScrollpinResult<Timeline>,
{
    fn build(&self, ctx: &BuildContext<'_>) -> ScrollpinResult<Option<Timeline>> {
        (self.0)(ctx).map(Some)
    }
}

impl<F> fmt::Debug for TimelineFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TimelineFn(..)")
    }
}

/// One factory per viewport class.
///
/// ```
/// use scrollpin::{Responsive, Timeline, timeline_fn};
///
/// let factory = Responsive::new()
///     .variant("desktop", timeline_fn(|_| Timeline::builder(4500.0).build()))
///     .variant("mobile", timeline_fn(|_| Timeline::builder(2000.0).build()));
/// assert_eq!(factory.variants().collect::<Vec<_>>(), ["desktop", "mobile"]);
/// ```
#[derive(Default)]
pub struct Responsive {
    variants: Vec<(String, Box<dyn TimelineFactory>)>,
}

impl Responsive {
    /// No variants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the factory for `name`.
    pub fn variant(mut self, name: impl Into<String>, factory: impl TimelineFactory + 'static) -> Self {
        let name = name.into();
        self.variants.retain(|(n, _)| *n != name);
        self.variants.push((name, Box::new(factory)));
        self
    }

    /// Registered class names.
    pub fn variants(&self) -> impl Iterator<Item = &str> + '_ {
        self.variants.iter().map(|(n, _)| n.as_str())
    }
}

impl TimelineFactory for Responsive {
    fn build(&self, ctx: &BuildContext<'_>) -> ScrollpinResult<Option<Timeline>> {
        let Some(variant) = ctx.variant else {
            return Ok(None);
        };
        match self.variants.iter().find(|(n, _)| n == variant) {
            Some((_, factory)) => factory.build(ctx),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Responsive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.variants()).finish()
    }
}

/// Scroll-driven section orchestrator.
///
/// The engine owns no sections: each [`attach`](Self::attach) returns a [`SectionHandle`] that
/// keeps its section alive and tears it down when detached or dropped.
pub struct Engine {
    scroll: Rc<ScrollAdapter>,
    breakpoints: Rc<BreakpointEvaluator>,
    stage: SharedStage,
    reduced_motion: ReducedMotion,
}

impl Engine {
    /// Engine over injected collaborators.
    pub fn new(
        scroll: Rc<ScrollAdapter>,
        breakpoints: Rc<BreakpointEvaluator>,
        stage: SharedStage,
    ) -> Self {
        Self {
            scroll,
            breakpoints,
            stage,
            reduced_motion: ReducedMotion::Animate,
        }
    }

    /// Engine with breakpoints and policies from `config`.
    ///
    /// Breakpoints are registered in order and evaluated against the adapter's viewport.
    pub fn from_config(
        config: &EngineConfig,
        scroll: Rc<ScrollAdapter>,
        stage: SharedStage,
    ) -> ScrollpinResult<Self> {
        config.validate()?;
        let breakpoints = Rc::new(BreakpointEvaluator::new());
        for bp in &config.breakpoints {
            breakpoints.register(bp.name.clone(), bp.query);
        }
        breakpoints.evaluate(scroll.bounding_box().width());
        Ok(Self::new(scroll, breakpoints, stage).with_reduced_motion(config.reduced_motion))
    }

    /// Set the reduced-motion policy for sections attached afterwards.
    pub fn with_reduced_motion(mut self, policy: ReducedMotion) -> Self {
        self.reduced_motion = policy;
        self
    }

    /// Scroll adapter.
    pub fn scroll(&self) -> &Rc<ScrollAdapter> {
        &self.scroll
    }

    /// Breakpoint evaluator.
    pub fn breakpoints(&self) -> &Rc<BreakpointEvaluator> {
        &self.breakpoints
    }

    /// Animated surfaces.
    pub fn stage(&self) -> &SharedStage {
        &self.stage
    }

    /// Reduced-motion policy.
    pub fn reduced_motion(&self) -> ReducedMotion {
        self.reduced_motion
    }

    /// Host-side: the viewport was resized. Re-evaluates breakpoints, then refreshes so
    /// every section rebuilds against the new layout.
    pub fn resize(&self, width: f64, height: f64) {
        self.scroll.set_viewport(width, height);
        self.breakpoints.evaluate(width);
        self.scroll.refresh();
    }

    /// Mount a section triggered by `trigger`.
    ///
    /// Builds the timeline for the current viewport class, binds it and syncs it to the current
    /// scroll offset. A failing build reverts everything and returns the error. Without a
    /// usable scroll source the section stays static.
    #[tracing::instrument(skip_all, fields(trigger = tracing::field::Empty))]
    pub fn attach(
        &self,
        trigger: impl Into<TargetId>,
        factory: impl TimelineFactory + 'static,
    ) -> ScrollpinResult<SectionHandle> {
        let trigger = trigger.into();
        tracing::Span::current().record("trigger", tracing::field::display(&trigger));

        let section = Rc::new_cyclic(|this| {
            RefCell::new(Section {
                this: this.clone(),
                trigger,
                factory: Box::new(factory),
                scroll: Rc::clone(&self.scroll),
                breakpoints: Rc::clone(&self.breakpoints),
                stage: Rc::clone(&self.stage),
                reduced_motion: self.reduced_motion,
                variant: None,
                binding: None,
                last_error: None,
                breakpoint_sub: None,
                refresh_sub: None,
                progress: Progress::ZERO,
                state: PinState::Unpinned,
            })
        });

        if !self.scroll.is_available() {
            tracing::warn!("scroll source unavailable; section stays static");
            return Ok(SectionHandle {
                section: Some(section),
            });
        }

        let weak = Rc::downgrade(&section);
        let breakpoint_sub = self.breakpoints.on_change(move |change| {
            if let Some(section) = weak.upgrade() {
                tracing::debug!(
                    previous = ?change.previous,
                    current = ?change.current,
                    "rebuilding section for viewport class"
                );
                section.borrow_mut().rebuild();
            }
        });
        let weak = Rc::downgrade(&section);
        let refresh_sub = self.scroll.on_refresh(move |_| {
            if let Some(section) = weak.upgrade() {
                section.borrow_mut().rebuild();
            }
        });

        let mounted = {
            let mut s = section.borrow_mut();
            s.breakpoint_sub = Some(breakpoint_sub);
            s.refresh_sub = Some(refresh_sub);
            s.mount()
        };
        let mut handle = SectionHandle {
            section: Some(section),
        };
        if let Err(e) = mounted {
            handle.teardown();
            return Err(e);
        }
        Ok(handle)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("scroll", &self.scroll)
            .field("breakpoints", &self.breakpoints)
            .field("reduced_motion", &self.reduced_motion)
            .finish_non_exhaustive()
    }
}

struct Binding {
    sequencer: Sequencer,
    // `None` under reduced motion.
    pin: Option<PinController>,
    scroll_sub: Option<Subscription>,
    last: Option<Progress>,
}

struct Section {
    this: Weak<RefCell<Section>>,
    trigger: TargetId,
    factory: Box<dyn TimelineFactory>,
    scroll: Rc<ScrollAdapter>,
    breakpoints: Rc<BreakpointEvaluator>,
    stage: SharedStage,
    reduced_motion: ReducedMotion,

    variant: Option<String>,
    binding: Option<Binding>,
    last_error: Option<ScrollpinError>,
    breakpoint_sub: Option<Subscription>,
    refresh_sub: Option<Subscription>,
    progress: Progress,
    state: PinState,
}

impl Section {
    /// Build and bind for the current class. Nothing is written to the stage unless every
    /// fallible step succeeded.
    fn mount(&mut self) -> ScrollpinResult<()> {
        let variant = self.breakpoints.current();
        let viewport = self.scroll.bounding_box();
        self.variant = variant.clone();

        let prepared = {
            let stage = self.stage.borrow();
            let trigger_box = stage
                .get(&self.trigger)
                .map(|s| s.layout_box())
                .ok_or_else(|| {
                    ScrollpinError::validation(format!("unknown trigger '{}'", self.trigger))
                })?;
            let ctx = BuildContext {
                variant: variant.as_deref(),
                viewport,
                trigger: &self.trigger,
                trigger_box,
                stage: &stage,
            };
            match self.factory.build(&ctx)? {
                None => None,
                Some(timeline) => {
                    let timeline = Rc::new(timeline);
                    let sequencer = Sequencer::bind(Rc::clone(&timeline), &stage)?;
                    let pin = match self.reduced_motion {
                        ReducedMotion::JumpToEnd => None,
                        ReducedMotion::Animate => {
                            Some(self.pin_controller(&timeline, &stage, trigger_box, viewport)?)
                        }
                    };
                    Some((sequencer, pin))
                }
            }
        };

        let Some((sequencer, pin)) = prepared else {
            tracing::debug!(variant = ?self.variant, "no timeline for viewport class; section static");
            return Ok(());
        };

        tracing::info!(
            variant = ?self.variant,
            segments = sequencer.timeline().segments().len(),
            distance = sequencer.timeline().scroll_distance(),
            "section mounted"
        );

        if pin.is_none() {
            sequencer.apply(Progress::ONE, &mut self.stage.borrow_mut());
            self.progress = Progress::ONE;
            self.binding = Some(Binding {
                sequencer,
                pin: None,
                scroll_sub: None,
                last: Some(Progress::ONE),
            });
            return Ok(());
        }

        let weak = self.this.clone();
        let scroll_sub = self.scroll.on_scroll(move |offset| {
            if let Some(section) = weak.upgrade() {
                section.borrow_mut().sync(*offset);
            }
        });
        self.binding = Some(Binding {
            sequencer,
            pin,
            scroll_sub: Some(scroll_sub),
            last: None,
        });
        let offset = self.scroll.read();
        self.sync(offset);
        Ok(())
    }

    fn pin_controller(
        &self,
        timeline: &Rc<Timeline>,
        stage: &Stage,
        trigger_box: Rect,
        viewport: Rect,
    ) -> ScrollpinResult<PinController> {
        let start = timeline.start().pin_start(trigger_box, viewport);
        let target = timeline
            .pin_target()
            .cloned()
            .unwrap_or_else(|| self.trigger.clone());
        let pin_box = if timeline.pinned() {
            stage.get(&target).map(|s| s.layout_box()).ok_or_else(|| {
                ScrollpinError::validation(format!("unknown pin target '{target}'"))
            })?
        } else {
            trigger_box
        };
        Ok(PinController::new(
            timeline,
            target,
            start,
            pin_box.y0 - start,
            self.scroll.pin_type(),
        ))
    }

    fn sync(&mut self, offset: ScrollOffset) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        let Some(pin) = binding.pin.as_mut() else {
            return;
        };
        let mut stage = self.stage.borrow_mut();
        let Some(update) = pin.update(offset, &mut stage) else {
            return;
        };
        if binding.last != Some(update.progress) {
            binding.sequencer.apply(update.progress, &mut stage);
            binding.last = Some(update.progress);
        }
        self.progress = update.progress;
        self.state = update.state;
    }

    /// Unsubscribe from scroll, release the pin and restore styles.
    fn revert(&mut self) {
        let Some(binding) = self.binding.take() else {
            return;
        };
        drop(binding.scroll_sub);
        let mut stage = self.stage.borrow_mut();
        if let Some(mut pin) = binding.pin {
            pin.release(&mut stage);
        }
        binding.sequencer.revert(&mut stage);
        self.progress = Progress::ZERO;
        self.state = PinState::Unpinned;
    }

    fn rebuild(&mut self) {
        self.revert();
        match self.mount() {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::error!(trigger = %self.trigger, variant = ?self.variant, error = %e, "section rebuild failed; staying static");
                self.last_error = Some(e);
            }
        }
    }

    fn teardown(&mut self) {
        self.breakpoint_sub.take();
        self.refresh_sub.take();
        self.revert();
    }
}

/// Owner of one mounted section.
///
/// Dropping the handle detaches the section.
#[must_use = "dropping the handle detaches the section"]
pub struct SectionHandle {
    section: Option<Rc<RefCell<Section>>>,
}

impl SectionHandle {
    /// Revert every style the section wrote, release its pin and unsubscribe.
    pub fn detach(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(section) = self.section.take() {
            let mut s = section.borrow_mut();
            tracing::debug!(trigger = %s.trigger, "section detached");
            s.teardown();
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Section) -> T) -> Option<T> {
        self.section.as_ref().map(|s| f(&s.borrow()))
    }

    /// Pin state after the last scroll event.
    pub fn state(&self) -> PinState {
        self.read(|s| s.state).unwrap_or_default()
    }

    /// Progress after the last scroll event.
    pub fn progress(&self) -> Progress {
        self.read(|s| s.progress).unwrap_or_default()
    }

    /// Viewport class the current timeline was built for.
    pub fn variant(&self) -> Option<String> {
        self.read(|s| s.variant.clone()).flatten()
    }

    /// `true` when scrolling does not drive the section: no timeline for the current class,
    /// reduced motion, a failed rebuild or no scroll source.
    pub fn is_static(&self) -> bool {
        self.read(|s| {
            s.binding
                .as_ref()
                .is_none_or(|b| b.scroll_sub.is_none())
        })
        .unwrap_or(true)
    }

    /// Timeline currently bound, if any.
    pub fn timeline(&self) -> Option<Rc<Timeline>> {
        self.read(|s| {
            s.binding
                .as_ref()
                .map(|b| Rc::clone(b.sequencer.timeline()))
        })
        .flatten()
    }

    /// Message of the error that left the section static on its last rebuild.
    pub fn last_error(&self) -> Option<String> {
        self.read(|s| s.last_error.as_ref().map(ToString::to_string))
            .flatten()
    }
}

impl Drop for SectionHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for SectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionHandle")
            .field("attached", &self.section.is_some())
            .field("state", &self.state())
            .field("progress", &self.progress())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/engine.rs"]
mod tests;
