//! Timelines: parallel tween tracks plus one-shot cues.
//!
//! Each timeline keeps its own clock, so any number can run side by side.
//! Tracks write straight into `SceneState`; cues are returned to the caller,
//! which decides what they mean. Advancing is explicit (no callbacks).

use nalgebra::Vector3;

use crate::phase::Trigger;
use crate::scene::{MeshKind, SceneState};
use crate::tween::{Ease, Tween};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Channel {
    Rotation(MeshKind),
    Scale(MeshKind),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Track {
    Vector {
        channel: Channel,
        tween: Tween<Vector3<f32>>,
    },
    FoldIntensity(Tween<f32>),
}

impl Track {
    fn end_time(&self) -> f32 {
        match self {
            Track::Vector { tween, .. } => tween.end_time(),
            Track::FoldIntensity(tween) => tween.end_time(),
        }
    }

    fn apply(&self, t: f32, scene: &mut SceneState) {
        match self {
            Track::Vector { channel, tween } => {
                let v = tween.at(t).value;
                match *channel {
                    Channel::Rotation(kind) => scene.mesh_mut(kind).transform.rotation = v,
                    Channel::Scale(kind) => scene.mesh_mut(kind).transform.scale = v,
                }
            }
            Track::FoldIntensity(tween) => scene.fold_intensity = tween.at(t).value,
        }
    }
}

/// What a cue does when it fires.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CueAction {
    /// Hide the shape, show the facet forms, arm the scrambler uniform.
    RevealFacets,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Cue {
    /// Fraction of the timeline's total duration.
    at: f32,
    action: CueAction,
    fired: bool,
}

/// Result of advancing a timeline by one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineStep {
    pub fired: Vec<CueAction>,
    /// True on the frame the timeline reaches its end (and every frame after).
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    name: &'static str,
    elapsed: f32,
    tracks: Vec<Track>,
    cues: Vec<Cue>,
    on_complete: Option<Trigger>,
}

impl Timeline {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            elapsed: 0.0,
            tracks: Vec::new(),
            cues: Vec::new(),
            on_complete: None,
        }
    }

    /// Trigger to raise once the timeline completes.
    pub fn then(mut self, trigger: Trigger) -> Self {
        self.on_complete = Some(trigger);
        self
    }

    #[inline]
    pub fn on_complete(&self) -> Option<Trigger> {
        self.on_complete
    }

    /// Tween a mesh's rotation from its current value.
    pub fn rotate(
        mut self,
        scene: &SceneState,
        kind: MeshKind,
        to: [f32; 3],
        duration: f32,
        ease: Ease,
    ) -> Self {
        let from = scene.mesh(kind).transform.rotation;
        self.tracks.push(Track::Vector {
            channel: Channel::Rotation(kind),
            tween: Tween::new(from, Vector3::from(to), duration, ease),
        });
        self
    }

    /// Tween a mesh's scale (uniformly) from its current value.
    pub fn scale(
        mut self,
        scene: &SceneState,
        kind: MeshKind,
        to: f32,
        duration: f32,
        ease: Ease,
    ) -> Self {
        let from = scene.mesh(kind).transform.scale;
        self.tracks.push(Track::Vector {
            channel: Channel::Scale(kind),
            tween: Tween::new(from, Vector3::repeat(to), duration, ease),
        });
        self
    }

    pub fn fold_intensity(mut self, from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        self.tracks
            .push(Track::FoldIntensity(Tween::new(from, to, duration, ease)));
        self
    }

    /// Schedule `action` once elapsed time crosses `fraction` of the total duration.
    pub fn cue(mut self, fraction: f32, action: CueAction) -> Self {
        self.cues.push(Cue {
            at: fraction,
            action,
            fired: false,
        });
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Longest track end time.
    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .map(Track::end_time)
            .fold(0.0, f32::max)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration()
    }

    /// Advance by `dt`, write every track into `scene` and collect due cues.
    pub fn advance(&mut self, dt: f32, scene: &mut SceneState) -> TimelineStep {
        self.elapsed += dt.max(0.0);
        let t = self.elapsed;
        for track in &self.tracks {
            track.apply(t, scene);
        }
        let duration = self.duration();
        let mut fired = Vec::new();
        for cue in self.cues.iter_mut().filter(|c| !c.fired) {
            if t >= cue.at * duration {
                cue.fired = true;
                fired.push(cue.action);
            }
        }
        TimelineStep {
            fired,
            completed: t >= duration,
        }
    }
}
