use crate::animation::ease::Ease;
use crate::animation::props::{Lerp, StyleChannel};
use crate::foundation::core::Progress;
use crate::foundation::error::{ScrollpinError, ScrollpinResult};
use crate::surface::stage::{Stage, TargetId};
use crate::timeline::segment::Timeline;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
struct TrackKey {
    start: f64,
    duration: f64,
    from: f64,
    to: f64,
    ease: Ease,
}

impl TrackKey {
    fn value_at(&self, scrub: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let local = ((scrub - self.start) / self.duration).clamp(0.0, 1.0);
        f64::lerp(&self.from, &self.to, self.ease.apply(local))
    }
}

/// Every key animating one channel of one target, sorted by start.
#[derive(Clone, Debug)]
struct ChannelTrack {
    target: TargetId,
    channel: StyleChannel,
    keys: Vec<TrackKey>,
}

impl ChannelTrack {
    // The latest-started key governs; before the first key starts its `from` holds.
    fn value_at(&self, scrub: f64) -> f64 {
        let governing = self.keys.partition_point(|k| k.start <= scrub);
        match governing.checked_sub(1) {
            Some(i) => self.keys[i].value_at(scrub),
            None => self.keys[0].from,
        }
    }
}

/// Applies a [`Timeline`] to the [`Stage`] for a given progress.
///
/// Binding resolves implicit `from` values once against the stage's original styles, so
/// `apply` is a pure function of progress: O(segments), idempotent and reversible.
///
/// The first `apply` holds every touched channel on the [`Stage`]; `revert` drops those
/// holds. Sequencers sharing a channel restore it only when the last one reverts, in any
/// order.
#[derive(Debug)]
pub struct Sequencer {
    timeline: Rc<Timeline>,
    tracks: Vec<ChannelTrack>,
    holding: Cell<bool>,
}

impl Sequencer {
    /// Resolve `timeline` against the original styles on `stage`.
    ///
    /// Fails with [`ScrollpinError::Validation`] when a segment targets a surface missing
    /// from the stage.
    pub fn bind(timeline: Rc<Timeline>, stage: &Stage) -> ScrollpinResult<Self> {
        let mut order: Vec<usize> = (0..timeline.segments().len()).collect();
        order.sort_by(|&a, &b| {
            timeline.segments()[a]
                .start
                .total_cmp(&timeline.segments()[b].start)
        });

        let mut tracks: Vec<ChannelTrack> = Vec::new();
        let mut track_idx: BTreeMap<(TargetId, StyleChannel), usize> = BTreeMap::new();
        let mut initial: Vec<f64> = Vec::new();

        for i in order {
            let rs = &timeline.segments()[i];
            let seg = &rs.segment;
            if !stage.contains(&seg.target) {
                return Err(ScrollpinError::validation(format!(
                    "unknown target '{}'",
                    seg.target
                )));
            }

            let mut channels: Vec<StyleChannel> = seg.to.channels().collect();
            if let Some(from) = &seg.from {
                channels.extend(from.channels().filter(|c| seg.to.get(*c).is_none()));
            }

            for channel in channels {
                let key = (seg.target.clone(), channel);
                let idx = match track_idx.get(&key) {
                    Some(&idx) => idx,
                    None => {
                        let original = stage.original(&seg.target, channel);
                        initial.push(original.unwrap_or_else(|| channel.identity()));
                        tracks.push(ChannelTrack {
                            target: seg.target.clone(),
                            channel,
                            keys: Vec::new(),
                        });
                        track_idx.insert(key, tracks.len() - 1);
                        tracks.len() - 1
                    }
                };

                // Implicit `from` is whatever the channel shows when this segment starts,
                // including mid-way through an earlier segment that is still running.
                let from = match seg.from.as_ref().and_then(|f| f.get(channel)) {
                    Some(v) => v,
                    None if tracks[idx].keys.is_empty() => initial[idx],
                    None => tracks[idx].value_at(rs.start),
                };
                let to = seg.to.get(channel).unwrap_or(from);
                tracks[idx].keys.push(TrackKey {
                    start: rs.start,
                    duration: seg.duration,
                    from,
                    to,
                    ease: seg.ease,
                });
            }
        }

        tracing::debug!(
            segments = timeline.segments().len(),
            tracks = tracks.len(),
            duration = timeline.duration(),
            "sequencer bound"
        );
        Ok(Self {
            timeline,
            tracks,
            holding: Cell::new(false),
        })
    }

    /// Timeline this sequencer applies.
    pub fn timeline(&self) -> &Rc<Timeline> {
        &self.timeline
    }

    /// Scrub position (timeline units) for `progress`.
    pub fn scrub_position(&self, progress: Progress) -> f64 {
        progress.get() * self.timeline.duration()
    }

    /// Value `channel` of `target` takes at `progress`, if the timeline animates it.
    pub fn value_at(&self, target: &TargetId, channel: StyleChannel, progress: Progress) -> Option<f64> {
        let scrub = self.scrub_position(progress);
        self.tracks
            .iter()
            .find(|t| &t.target == target && t.channel == channel)
            .map(|t| t.value_at(scrub))
    }

    /// Write every animated channel for `progress`. Surfaces removed from the stage since
    /// binding are skipped.
    pub fn apply(&self, progress: Progress, stage: &mut Stage) {
        if !self.holding.replace(true) {
            for track in &self.tracks {
                stage.hold(&track.target, track.channel);
            }
        }
        let scrub = self.scrub_position(progress);
        for track in &self.tracks {
            let Some(surface) = stage.get_mut(&track.target) else {
                continue;
            };
            surface.set_channel(track.channel, track.value_at(scrub));
        }
    }

    /// Release every touched channel. Channels no other sequencer holds go back to their
    /// original value, or are cleared when they had none.
    pub fn revert(&self, stage: &mut Stage) {
        if !self.holding.replace(false) {
            return;
        }
        for track in &self.tracks {
            stage.release(&track.target, track.channel);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sequencer.rs"]
mod tests;
