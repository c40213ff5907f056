use crate::animation::props::StyleChannel;
use crate::surface::style::Surface;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Key of a surface on the [`Stage`].
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Wrap a key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for TargetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stage shared between the host and every mounted section.
///
/// Hosts must not hold a borrow across a call that dispatches scroll or resize events.
pub type SharedStage = Rc<RefCell<Stage>>;

/// Untouched value of one channel while at least one sequencer animates it.
#[derive(Clone, Copy, Debug)]
struct HeldStyle {
    original: Option<f64>,
    holders: usize,
}

/// Keyed set of surfaces that timelines address by [`TargetId`].
#[derive(Default)]
pub struct Stage {
    surfaces: BTreeMap<TargetId, Box<dyn Surface>>,
    held: BTreeMap<(TargetId, StyleChannel), HeldStyle>,
}

impl Stage {
    /// Empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a [`SharedStage`].
    pub fn shared(self) -> SharedStage {
        Rc::new(RefCell::new(self))
    }

    /// Builder-style insert.
    pub fn with(mut self, id: impl Into<TargetId>, surface: impl Surface + 'static) -> Self {
        self.insert(id, surface);
        self
    }

    /// Insert or replace a surface, returning the previous one.
    pub fn insert(
        &mut self,
        id: impl Into<TargetId>,
        surface: impl Surface + 'static,
    ) -> Option<Box<dyn Surface>> {
        self.surfaces.insert(id.into(), Box::new(surface))
    }

    /// Remove a surface.
    pub fn remove(&mut self, id: &TargetId) -> Option<Box<dyn Surface>> {
        self.surfaces.remove(id)
    }

    /// Borrow a surface.
    pub fn get(&self, id: &TargetId) -> Option<&dyn Surface> {
        self.surfaces.get(id).map(|s| s.as_ref())
    }

    /// Mutably borrow a surface.
    pub fn get_mut(&mut self, id: &TargetId) -> Option<&mut (dyn Surface + 'static)> {
        self.surfaces.get_mut(id).map(|s| s.as_mut())
    }

    /// Return `true` when `id` is present.
    pub fn contains(&self, id: &TargetId) -> bool {
        self.surfaces.contains_key(id)
    }

    /// Keys in order.
    pub fn ids(&self) -> impl Iterator<Item = &TargetId> + '_ {
        self.surfaces.keys()
    }

    /// Value `channel` of `id` had before any live sequencer wrote to it.
    pub fn original(&self, id: &TargetId, channel: StyleChannel) -> Option<f64> {
        match self.held.get(&(id.clone(), channel)) {
            Some(held) => held.original,
            None => self.get(id).and_then(|s| s.channel(channel)),
        }
    }

    /// Number of live sequencers animating `channel` of `id`.
    pub fn holders(&self, id: &TargetId, channel: StyleChannel) -> usize {
        self.held
            .get(&(id.clone(), channel))
            .map_or(0, |held| held.holders)
    }

    /// Record the current value as the original on first hold.
    pub(crate) fn hold(&mut self, id: &TargetId, channel: StyleChannel) {
        let current = self.get(id).and_then(|s| s.channel(channel));
        self.held
            .entry((id.clone(), channel))
            .or_insert(HeldStyle {
                original: current,
                holders: 0,
            })
            .holders += 1;
    }

    /// Drop one hold; the last one restores the original value.
    pub(crate) fn release(&mut self, id: &TargetId, channel: StyleChannel) {
        let key = (id.clone(), channel);
        let Some(held) = self.held.get_mut(&key) else {
            return;
        };
        held.holders = held.holders.saturating_sub(1);
        if held.holders > 0 {
            return;
        }
        let original = held.original;
        self.held.remove(&key);
        let Some(surface) = self.get_mut(id) else {
            return;
        };
        match original {
            Some(v) => surface.set_channel(channel, v),
            None => surface.clear_channel(channel),
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("surfaces", &self.surfaces.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/stage.rs"]
mod tests;
