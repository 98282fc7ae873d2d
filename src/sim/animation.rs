//! Phase-based sprite animation sequencing
//!
//! A logical entity state maps to a clip of up to three phases (start, loop,
//! end). Each phase is an inclusive frame range derived from two numbered
//! asset paths; the sprite for frame N is the path with N substituted back
//! in. The `Animator` is the per-entity cursor that walks a clip one tick at
//! a time. Pure state-transition logic - no assets, no I/O.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sub-segment of a state's frame timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Loop,
    End,
}

/// Inclusive sprite-frame range backed by numbered asset files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRange {
    /// Path up to the frame number, e.g. `"sprites/goblin/run/"`
    prefix: String,
    /// Path after the frame number, e.g. `".png"`
    suffix: String,
    pub lo: u32,
    pub hi: u32,
}

impl FrameRange {
    /// Derive a range from two asset paths carrying trailing frame numbers.
    ///
    /// The order of the two paths is irrelevant: the range is always
    /// `[min, max]` inclusive. Returns `None` if either path has no trailing
    /// number.
    pub fn from_paths(a: &str, b: &str) -> Option<Self> {
        let (prefix, suffix, na) = split_frame_path(a)?;
        let (_, _, nb) = split_frame_path(b)?;
        Some(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            lo: na.min(nb),
            hi: na.max(nb),
        })
    }

    /// Number of frames in the range (at least 1)
    pub fn len(&self) -> u32 {
        self.hi - self.lo + 1
    }

    /// Index of the last frame, relative to the range start
    pub fn last_index(&self) -> u32 {
        self.hi - self.lo
    }

    /// Asset path for a frame index relative to the range start.
    /// Out-of-range indices clamp to the last frame.
    pub fn sprite_path(&self, index: u32) -> String {
        let frame = (self.lo + index.min(self.last_index())).min(self.hi);
        format!("{}{}{}", self.prefix, frame, self.suffix)
    }
}

/// Split `"sprites/run/12.png"` into `("sprites/run/", ".png", 12)`
fn split_frame_path(path: &str) -> Option<(&str, &str, u32)> {
    let stem_end = path.rfind('.').unwrap_or(path.len());
    let (stem, suffix) = path.split_at(stem_end);
    let digits_start = stem
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    let digits = &stem[digits_start..];
    if digits.is_empty() {
        return None;
    }
    let number = digits.parse().ok()?;
    Some((&stem[..digits_start], suffix, number))
}

/// Up to three phases for one logical state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateClip {
    pub start: Option<FrameRange>,
    #[serde(rename = "loop")]
    pub loop_phase: Option<FrameRange>,
    pub end: Option<FrameRange>,
}

impl StateClip {
    pub fn phase(&self, phase: Phase) -> Option<&FrameRange> {
        match phase {
            Phase::Start => self.start.as_ref(),
            Phase::Loop => self.loop_phase.as_ref(),
            Phase::End => self.end.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.loop_phase.is_none() && self.end.is_none()
    }
}

/// Raw JSON shape of one descriptor entry: phase name -> two asset paths
#[derive(Debug, Deserialize)]
struct RawPhases {
    start: Option<[String; 2]>,
    #[serde(rename = "loop")]
    loop_phase: Option<[String; 2]>,
    end: Option<[String; 2]>,
}

/// Registry of clips keyed by logical state name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationBook {
    clips: HashMap<String, StateClip>,
}

impl AnimationBook {
    /// Parse a JSON descriptor: `{state: {start?, loop?, end?: [pathA, pathB]}}`.
    ///
    /// Phases whose frame range cannot be derived are dropped with a warning;
    /// sequencing continues with whatever phases remain.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, RawPhases> = serde_json::from_str(json)?;
        let mut clips = HashMap::with_capacity(raw.len());
        for (state, phases) in raw {
            let clip = StateClip {
                start: parse_phase(&state, "start", phases.start.as_ref()),
                loop_phase: parse_phase(&state, "loop", phases.loop_phase.as_ref()),
                end: parse_phase(&state, "end", phases.end.as_ref()),
            };
            clips.insert(state, clip);
        }
        Ok(Self { clips })
    }

    pub fn insert(&mut self, state: impl Into<String>, clip: StateClip) {
        self.clips.insert(state.into(), clip);
    }

    pub fn clip(&self, state: &str) -> Option<&StateClip> {
        self.clips.get(state)
    }
}

fn parse_phase(state: &str, name: &str, paths: Option<&[String; 2]>) -> Option<FrameRange> {
    let [a, b] = paths?;
    let range = FrameRange::from_paths(a, b);
    if range.is_none() {
        log::warn!("animation '{state}': unparsable {name} phase ({a}, {b}), skipping");
    }
    range
}

/// Per-entity animation cursor walking a `StateClip`
///
/// Phase order is start -> loop -> end. The loop phase repeats whole
/// iterations; the caller's end-loop signal is sampled when a loop pass
/// completes, so the loop always shows at least one full iteration before
/// the end phase begins. Absent phases are skipped, never stalled on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    pub phase: Phase,
    /// Frame index within the current phase, from 0
    pub frame: u32,
    /// Ticks per frame advance
    pub frame_delay: u32,
    counter: u32,
}

impl Animator {
    pub fn new(frame_delay: u32) -> Self {
        Self {
            phase: Phase::Start,
            frame: 0,
            frame_delay: frame_delay.max(1),
            counter: 0,
        }
    }

    /// Back to the first phase, first frame
    pub fn reset(&mut self) {
        self.phase = Phase::Start;
        self.frame = 0;
        self.counter = 0;
    }

    /// Advance one tick against `clip`.
    ///
    /// `end_loop` signals that the loop phase should stop repeating. Returns
    /// true when the clip has completed: the end phase finished, or nothing
    /// remained to play. The caller reacts by clearing its attack/skill flags
    /// and switching back to a baseline state.
    pub fn advance(&mut self, clip: &StateClip, end_loop: bool) -> bool {
        // The cursor may sit on an absent phase (sparse clip); hop forward
        // before ticking so it never stalls.
        if clip.phase(self.phase).is_none() && !self.enter_next(clip) {
            return true;
        }

        self.counter += 1;
        if self.counter < self.frame_delay {
            return false;
        }
        self.counter = 0;

        let Some(range) = clip.phase(self.phase) else {
            return true;
        };
        if self.frame < range.last_index() {
            self.frame += 1;
            return false;
        }

        // Last frame of the current phase shown; decide what follows.
        match self.phase {
            Phase::Start => !self.enter_next(clip),
            Phase::Loop if !end_loop => {
                self.frame = 0;
                false
            }
            Phase::Loop => !self.enter_next(clip),
            Phase::End => true,
        }
    }

    /// Move to the next phase present in the clip. Returns false when the
    /// clip is exhausted (frame index stays clamped on the last frame).
    fn enter_next(&mut self, clip: &StateClip) -> bool {
        let order: &[Phase] = match self.phase {
            Phase::Start => &[Phase::Loop, Phase::End],
            Phase::Loop => &[Phase::End],
            Phase::End => &[],
        };
        for &phase in order {
            if clip.phase(phase).is_some() {
                self.phase = phase;
                self.frame = 0;
                self.counter = 0;
                return true;
            }
        }
        false
    }

    /// Asset path for the current tick. A cursor sitting on an absent phase
    /// (sparse clip, before its first advance) falls through to the first
    /// frame of the next present phase; `None` only for an empty clip.
    pub fn sprite_path(&self, clip: &StateClip) -> Option<String> {
        if let Some(range) = clip.phase(self.phase) {
            return Some(range.sprite_path(self.frame));
        }
        let order: &[Phase] = match self.phase {
            Phase::Start => &[Phase::Loop, Phase::End],
            Phase::Loop => &[Phase::End],
            Phase::End => &[],
        };
        order
            .iter()
            .find_map(|&phase| clip.phase(phase))
            .map(|range| range.sprite_path(0))
    }

    /// Absolute frame number within the clip's file numbering, used for
    /// active-damage-window checks.
    pub fn absolute_frame(&self, clip: &StateClip) -> Option<u32> {
        clip.phase(self.phase)
            .map(|r| (r.lo + self.frame).min(r.hi))
    }
}
