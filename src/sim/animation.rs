//! Sprite animation timing
//!
//! Frames advance on elapsed wall-clock time rather than per call, so the
//! animation speed does not depend on how often the host ticks.

use serde::{Deserialize, Serialize};

/// Damage ratio above which frames play at double speed
pub const DISTRESS_THRESHOLD: f32 = 0.5;

/// How the frame index behaves after the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameMode {
    /// Wrap back to frame 0
    Loop,
    /// Count up to `frame_count` and stop there (finished)
    Once,
}

/// Per-entity frame timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    /// Nominal time each frame stays on screen (ms)
    pub frame_duration: f64,
    /// Current frame index
    pub frame: u32,
    /// Frames in the sprite strip
    pub frame_count: u32,
    pub mode: FrameMode,
    /// Timestamp of the last frame swap, unset until the first update
    last_frame: Option<f64>,
}

impl Animation {
    pub fn looping(frame_duration: f64, frame_count: u32) -> Self {
        Self::new(frame_duration, frame_count, FrameMode::Loop)
    }

    pub fn once(frame_duration: f64, frame_count: u32) -> Self {
        Self::new(frame_duration, frame_count, FrameMode::Once)
    }

    fn new(frame_duration: f64, frame_count: u32, mode: FrameMode) -> Self {
        Self {
            frame_duration,
            frame: 0,
            frame_count: frame_count.max(1),
            mode,
            last_frame: None,
        }
    }

    /// Timestamp of the last frame swap (None before the first update)
    pub fn last_frame(&self) -> Option<f64> {
        self.last_frame
    }

    /// Advance on an undamaged owner. Returns true if the frame changed.
    pub fn update(&mut self, timestamp: f64) -> bool {
        self.update_with_damage(timestamp, 0.0)
    }

    /// Advance at a rate that depends on the owner's current damage ratio.
    ///
    /// The ratio is read fresh on every call; nothing about it is cached.
    pub fn update_with_damage(&mut self, timestamp: f64, damage_ratio: f32) -> bool {
        let Some(last) = self.last_frame else {
            self.last_frame = Some(timestamp);
            return false;
        };

        // Clock went backwards: start timing again from here
        if timestamp < last {
            self.last_frame = Some(timestamp);
            return false;
        }

        if self.is_finished() || timestamp - last < self.effective_duration(damage_ratio) {
            return false;
        }

        self.frame = match self.mode {
            FrameMode::Loop => (self.frame + 1) % self.frame_count,
            FrameMode::Once => self.frame + 1,
        };
        self.last_frame = Some(timestamp);
        true
    }

    /// Frame duration after the distress speed-up
    pub fn effective_duration(&self, damage_ratio: f32) -> f64 {
        if damage_ratio > DISTRESS_THRESHOLD {
            self.frame_duration / 2.0
        } else {
            self.frame_duration
        }
    }

    /// One-shot animation has played its final frame
    pub fn is_finished(&self) -> bool {
        self.mode == FrameMode::Once && self.frame >= self.frame_count
    }

    /// Horizontal offset of the current frame in a sprite strip
    pub fn sprite_offset(&self, unit: f32) -> f32 {
        self.frame.min(self.frame_count - 1) as f32 * unit
    }
}
