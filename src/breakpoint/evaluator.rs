use crate::breakpoint::media::MediaQuery;
use crate::events::listeners::{Listeners, Subscription};
use std::cell::{Cell, RefCell};
use std::fmt;

/// Viewport-width predicate attached to a class name.
pub enum Predicate {
    /// Media query.
    Media(MediaQuery),
    /// Arbitrary width test.
    Custom(Box<dyn Fn(f64) -> bool>),
}

impl Predicate {
    /// Wrap a closure.
    pub fn custom(f: impl Fn(f64) -> bool + 'static) -> Self {
        Self::Custom(Box::new(f))
    }

    /// Evaluate against a viewport width.
    pub fn matches(&self, width: f64) -> bool {
        match self {
            Self::Media(q) => q.matches(width),
            Self::Custom(f) => f(width),
        }
    }
}

impl From<MediaQuery> for Predicate {
    fn from(q: MediaQuery) -> Self {
        Self::Media(q)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Media(q) => write!(f, "Media({q})"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A real crossing from one viewport class to another.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointChange {
    /// Class before the crossing (`None` when nothing matched).
    pub previous: Option<String>,
    /// Class after the crossing (`None` when nothing matches).
    pub current: Option<String>,
    /// Width that triggered the change.
    pub width: f64,
}

/// Ordered list of named predicates; the first registered match is the active class.
///
/// Overlapping predicates are not an error: the earliest registration wins and the overlap is
/// logged at debug level.
pub struct BreakpointEvaluator {
    entries: RefCell<Vec<(String, Predicate)>>,
    current: RefCell<Option<String>>,
    width: Cell<Option<f64>>,
    listeners: Listeners<BreakpointChange>,
}

impl BreakpointEvaluator {
    /// Evaluator with no classes.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            current: RefCell::new(None),
            width: Cell::new(None),
            listeners: Listeners::new(),
        }
    }

    /// Append a class. If a width has already been evaluated, it is re-evaluated.
    pub fn register(&self, name: impl Into<String>, predicate: impl Into<Predicate>) {
        self.entries
            .borrow_mut()
            .push((name.into(), predicate.into()));
        if let Some(w) = self.width.get() {
            self.evaluate(w);
        }
    }

    /// Active class name.
    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    /// Last evaluated width.
    pub fn width(&self) -> Option<f64> {
        self.width.get()
    }

    /// Register for class changes.
    pub fn on_change(&self, callback: impl FnMut(&BreakpointChange) + 'static) -> Subscription {
        self.listeners.subscribe(callback)
    }

    /// Classify `width` without changing state.
    pub fn classify(&self, width: f64) -> Option<String> {
        let entries = self.entries.borrow();
        let mut matched = entries.iter().filter(|(_, p)| p.matches(width));
        let first = matched.next().map(|(name, _)| name.clone());
        if let Some(first) = &first {
            let shadowed: Vec<&str> = matched.map(|(name, _)| name.as_str()).collect();
            if !shadowed.is_empty() {
                tracing::debug!(width, active = %first, ?shadowed, "breakpoints overlap; first match wins");
            }
        }
        first
    }

    /// Evaluate `width`; notifies listeners only when the active class changes.
    pub fn evaluate(&self, width: f64) {
        if !width.is_finite() {
            tracing::warn!(width, "ignoring non-finite viewport width");
            return;
        }
        self.width.set(Some(width));

        let next = self.classify(width);
        let previous = {
            let mut current = self.current.borrow_mut();
            if *current == next {
                return;
            }
            std::mem::replace(&mut *current, next.clone())
        };

        tracing::debug!(width, ?previous, current = ?next, "viewport class changed");
        self.listeners.emit(&BreakpointChange {
            previous,
            current: next,
            width,
        });
    }
}

impl Default for BreakpointEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BreakpointEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointEvaluator")
            .field("entries", &self.entries.borrow())
            .field("current", &self.current.borrow())
            .field("width", &self.width.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/breakpoint/evaluator.rs"]
mod tests;
