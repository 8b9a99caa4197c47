//! Sound effects and background music
//!
//! Effects are fire-and-forget: every play rewinds the clip to the start.
//! Music is a single looping track the player can switch on and off. A clip
//! that fails to load or play is skipped silently and never stalls the game.

#[cfg(target_arch = "wasm32")]
use web_sys::HtmlAudioElement;

use crate::GameConfig;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ship fired
    Shoot,
    /// Alien hit
    Explode,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 2] = [SoundEffect::Shoot, SoundEffect::Explode];

    /// Asset path served next to the page
    pub fn path(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "snd/shoot.wav",
            SoundEffect::Explode => "snd/explode.wav",
        }
    }

    /// Sound triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot { .. } => Some(SoundEffect::Shoot),
            GameEvent::AlienHit { .. } => Some(SoundEffect::Explode),
            _ => None,
        }
    }
}

/// Looping background track
pub const MUSIC_PATH: &str = "bgm/action_mid.ogg";

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    clips: Vec<(SoundEffect, HtmlAudioElement)>,
    #[cfg(target_arch = "wasm32")]
    music: Option<HtmlAudioElement>,
    volume: f32,
    music_volume: f32,
    music_enabled: bool,
    muted: bool,
}

impl AudioManager {
    /// Load every clip. Clips that can't be created are left out.
    pub fn new(volume: f32) -> Self {
        #[cfg(target_arch = "wasm32")]
        let clips = SoundEffect::ALL
            .iter()
            .filter_map(|&effect| match HtmlAudioElement::new_with_src(effect.path()) {
                Ok(clip) => Some((effect, clip)),
                Err(_) => {
                    log::warn!("Failed to load {} - sound disabled", effect.path());
                    None
                }
            })
            .collect();

        #[cfg(target_arch = "wasm32")]
        let music = match HtmlAudioElement::new_with_src(MUSIC_PATH) {
            Ok(track) => {
                track.set_loop(true);
                Some(track)
            }
            Err(_) => {
                log::warn!("Failed to load {} - music disabled", MUSIC_PATH);
                None
            }
        };

        let mut manager = Self {
            #[cfg(target_arch = "wasm32")]
            clips,
            #[cfg(target_arch = "wasm32")]
            music,
            volume: 0.0,
            music_volume: 0.0,
            music_enabled: false,
            muted: false,
        };
        manager.set_volume(volume);
        manager
    }

    /// Build from config volumes; music starts if the config enables it
    pub fn from_config(config: &GameConfig) -> Self {
        let mut manager = Self::new(config.effective_volume());
        manager.set_music_volume(config.effective_music_volume());
        manager.set_music_enabled(config.music);
        manager
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        #[cfg(target_arch = "wasm32")]
        for (_, clip) in &self.clips {
            clip.set_volume(self.volume as f64);
        }
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        #[cfg(target_arch = "wasm32")]
        if let Some(track) = &self.music {
            track.set_volume(self.music_volume as f64);
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sync_music();
    }

    /// Whether the player wants music on
    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    /// Switch music on or off
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        self.sync_music();
    }

    /// Flip music and return the new state
    pub fn toggle_music(&mut self) -> bool {
        self.set_music_enabled(!self.music_enabled);
        log::info!("Music {}", if self.music_enabled { "on" } else { "off" });
        self.music_enabled
    }

    /// Music volume after mute and the on/off switch
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.music_volume
        }
    }

    /// Start or pause the track to match the current state
    fn sync_music(&self) {
        let playing = self.effective_music_volume() > 0.0;

        #[cfg(target_arch = "wasm32")]
        if let Some(track) = &self.music {
            if playing {
                // Browsers refuse playback before the first user gesture
                if track.play().is_err() {
                    log::debug!("Music not ready, skipped");
                }
            } else if track.pause().is_err() {
                log::debug!("Music pause failed");
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        log::trace!("music playing: {}", playing);
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play a sound effect from the start
    pub fn play(&self, effect: SoundEffect) {
        if self.effective_volume() <= 0.0 {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let Some((_, clip)) = self.clips.iter().find(|(e, _)| *e == effect) else {
                return;
            };
            clip.set_current_time(0.0);
            if clip.play().is_err() {
                log::debug!("{:?} not ready, skipped", effect);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        log::trace!("play {:?}", effect);
    }

    /// Play whatever sounds a batch of events calls for
    pub fn handle_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WeaponKind;

    #[test]
    fn test_events_map_to_sounds() {
        let shot = GameEvent::Shot {
            instigator: 1,
            weapon: WeaponKind::Beam,
        };
        let hit = GameEvent::AlienHit {
            alien: 3,
            destroyed: false,
        };
        assert_eq!(SoundEffect::for_event(&shot), Some(SoundEffect::Shoot));
        assert_eq!(SoundEffect::for_event(&hit), Some(SoundEffect::Explode));
        assert_eq!(SoundEffect::for_event(&GameEvent::Paused), None);
    }

    #[test]
    fn test_volume_clamped_and_muted() {
        let mut audio = AudioManager::new(3.0);
        assert_eq!(audio.effective_volume(), 1.0);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
        // Playing while muted is a no-op
        audio.play(SoundEffect::Explode);
    }

    #[test]
    fn test_music_toggle() {
        let mut audio = AudioManager::from_config(&GameConfig::default());
        assert!(audio.music_enabled());
        assert!((audio.effective_music_volume() - 0.2).abs() < 1e-6);

        assert!(!audio.toggle_music());
        assert_eq!(audio.effective_music_volume(), 0.0);
        assert!(audio.toggle_music());

        audio.set_muted(true);
        assert!(audio.music_enabled());
        assert_eq!(audio.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_music_off_in_config() {
        let config = GameConfig {
            music: false,
            ..Default::default()
        };
        let audio = AudioManager::from_config(&config);
        assert!(!audio.music_enabled());
        assert_eq!(audio.effective_music_volume(), 0.0);
    }
}
