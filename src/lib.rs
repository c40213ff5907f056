//! Scrollpin is a scroll-scrubbed timeline engine.
//!
//! A section of the page is pinned to the viewport while a choreographed timeline advances in
//! lockstep with scroll distance, then the page resumes normal scrolling. Each section can carry
//! several responsive variants (e.g. `desktop` / `mobile`) selected by viewport width.
//!
//! # Pipeline overview
//!
//! 1. **Build**: a [`TimelineFactory`] turns the active viewport class into an immutable
//!    [`Timeline`] (segments with resolved start offsets).
//! 2. **Bind**: a [`Sequencer`] resolves implicit `from` values against the original styles
//!    the [`Stage`] keeps for every held channel.
//! 3. **Drive**: on every scroll event the [`PinController`] converts the scroll offset into a
//!    [`Progress`] and pin state, and the sequencer applies interpolated values.
//! 4. **Revert**: breakpoint changes and detach restore every touched style and release the pin.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: all state lives behind `Rc`/`RefCell`; callbacks run synchronously
//!   inside the host's scroll and resize events.
//! - **Scrub, not play**: applying the same progress twice yields identical styles.
//! - **Injected collaborators**: the scroll backend, breakpoints and surfaces are passed in,
//!   never looked up globally.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod breakpoint;
mod config;
mod events;
mod foundation;
mod lifecycle;
mod pin;
mod scroll;
mod surface;
mod timeline;

pub use animation::ease::Ease;
pub use animation::props::{Lerp, PropertyValues, StyleChannel};
pub use breakpoint::evaluator::{BreakpointChange, BreakpointEvaluator, Predicate};
pub use breakpoint::media::MediaQuery;
pub use config::{BreakpointDef, EngineConfig, ReducedMotion, SmoothScrollConfig};
pub use events::listeners::{Listeners, Subscription};
pub use foundation::core::{Progress, Rect, ScrollOffset, viewport_rect};
pub use foundation::error::{ScrollpinError, ScrollpinResult};
pub use lifecycle::engine::{
    BuildContext, Engine, Responsive, SectionHandle, TimelineFactory, TimelineFn, timeline_fn,
};
pub use pin::controller::{PinController, PinState, PinUpdate};
pub use scroll::adapter::ScrollAdapter;
pub use scroll::source::{NativeScroll, PinType, ScrollBackend, SmoothScroll};
pub use surface::stage::{SharedStage, Stage, TargetId};
pub use surface::style::{PinLayout, StyleSurface, Surface};
pub use timeline::def::{LengthDef, ResponsiveDef, SegmentDef, TimelineDef};
pub use timeline::segment::{
    Anchor, DEFAULT_DURATION, Placement, ResolvedSegment, Segment, Timeline, TimelineBuilder,
    TriggerStart,
};
pub use timeline::sequencer::Sequencer;
