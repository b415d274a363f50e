//! Playback state machine
//!
//! Drives the stream screen: loading → ready → playing ↔ paused →
//! (error | ended). Switching sources resets to loading from any prior
//! state. Embedded sources delegate playback to the provider and only
//! track a coarse loaded flag; native sources track position, duration,
//! volume, and rate directly.
//!
//! All timing is cooperative: methods take `Instant` arguments and the UI
//! tick advances controls auto-hide and the simulated ad overlay.

use std::fmt;
use std::time::{Duration, Instant};

use crate::models::StreamingSource;

/// On-screen controls hide after this much inactivity while playing
pub const CONTROLS_HIDE_AFTER: Duration = Duration::from_secs(3);
/// Simulated ad appears this long after the player becomes ready
pub const AD_DELAY: Duration = Duration::from_secs(3);
/// Simulated ad auto-dismisses after this long on screen
pub const AD_DURATION: Duration = Duration::from_secs(5);

// =============================================================================
// Player State
// =============================================================================

/// Playback lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// Connecting to the selected source
    Loading,
    /// Source connected, not yet playing
    Ready,
    Playing,
    Paused,
    Ended,
    /// Media failure; recoverable by re-selecting a source
    Error(String),
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerState::Loading => write!(f, "Loading..."),
            PlayerState::Ready => write!(f, "Ready"),
            PlayerState::Playing => write!(f, "▶ Playing"),
            PlayerState::Paused => write!(f, "⏸ Paused"),
            PlayerState::Ended => write!(f, "Ended"),
            PlayerState::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

// =============================================================================
// Native Playback
// =============================================================================

/// Transport state for sources our own player drives
#[derive(Debug, Clone, PartialEq)]
pub struct NativePlayback {
    pub position: Duration,
    pub duration: Duration,
    pub volume: f32,
    pub rate: f32,
}

impl NativePlayback {
    pub fn new(duration: Duration) -> Self {
        Self {
            position: Duration::ZERO,
            duration,
            volume: 1.0,
            rate: 1.0,
        }
    }

    /// Seek by a signed number of seconds, clamped to the media bounds
    pub fn seek_by(&mut self, secs: i64) {
        let pos = self.position.as_secs() as i64 + secs;
        let pos = pos.clamp(0, self.duration.as_secs() as i64);
        self.position = Duration::from_secs(pos as u64);
    }

    pub fn seek_to(&mut self, position: Duration) {
        self.position = position.min(self.duration);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(0.25, 2.0);
    }

    /// Progress as 0.0..=1.0
    pub fn progress(&self) -> f32 {
        if self.duration.as_secs() == 0 {
            0.0
        } else {
            self.position.as_secs_f32() / self.duration.as_secs_f32()
        }
    }
}

// =============================================================================
// Ad Overlay
// =============================================================================

/// Simulated ad overlay lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdState {
    Hidden,
    /// Scheduled, not yet shown
    Pending { since: Instant },
    Visible { since: Instant },
}

// =============================================================================
// Player Session
// =============================================================================

/// State for one playback screen: selected source, lifecycle state,
/// controls visibility, and the ad overlay.
#[derive(Debug)]
pub struct PlayerSession {
    pub title: String,
    sources: Vec<StreamingSource>,
    selected: usize,
    state: PlayerState,
    /// Coarse loaded signal for embedded sources
    embed_loaded: bool,
    /// Transport state, present only for native sources past loading
    pub native: Option<NativePlayback>,
    controls_visible: bool,
    last_activity: Instant,
    ad: AdState,
}

impl PlayerSession {
    /// Start a playback session over the resolved sources, beginning with
    /// the first one in loading state.
    pub fn new(title: impl Into<String>, sources: Vec<StreamingSource>, now: Instant) -> Self {
        let state = if sources.is_empty() {
            PlayerState::Error("No streaming sources available".to_string())
        } else {
            PlayerState::Loading
        };

        Self {
            title: title.into(),
            sources,
            selected: 0,
            state,
            embed_loaded: false,
            native: None,
            controls_visible: true,
            last_activity: now,
            ad: AdState::Hidden,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn sources(&self) -> &[StreamingSource] {
        &self.sources
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn current_source(&self) -> Option<&StreamingSource> {
        self.sources.get(self.selected)
    }

    /// Whether the selected source is driven by our native player
    pub fn is_native(&self) -> bool {
        self.current_source().map(|s| s.is_native).unwrap_or(false)
    }

    /// Coarse loaded signal; only meaningful for embedded sources
    pub fn embed_loaded(&self) -> bool {
        self.embed_loaded
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn ad_visible(&self) -> bool {
        matches!(self.ad, AdState::Visible { .. })
    }

    /// Non-selected sources, offered as recovery targets from error
    pub fn alternates(&self) -> Vec<(usize, &StreamingSource)> {
        self.sources
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.selected)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Switch to another source. Always transitions through loading,
    /// regardless of prior state, and clears any error.
    pub fn select_source(&mut self, idx: usize, now: Instant) {
        if idx >= self.sources.len() {
            return;
        }
        self.selected = idx;
        self.state = PlayerState::Loading;
        self.embed_loaded = false;
        self.native = None;
        self.ad = AdState::Hidden;
        self.activity(now);
    }

    /// Re-select the current source after a failure
    pub fn retry(&mut self, now: Instant) {
        let idx = self.selected;
        self.select_source(idx, now);
    }

    /// The selected source finished connecting. Native sources get a
    /// transport with the reported duration; embedded ones just flip the
    /// loaded flag. Schedules the simulated ad.
    pub fn ready(&mut self, duration: Option<Duration>, now: Instant) {
        if self.state != PlayerState::Loading {
            return;
        }
        self.state = PlayerState::Ready;
        if self.is_native() {
            self.native = Some(NativePlayback::new(
                duration.unwrap_or(Duration::from_secs(0)),
            ));
        } else {
            self.embed_loaded = true;
        }
        self.ad = AdState::Pending { since: now };
    }

    pub fn play(&mut self, now: Instant) {
        if matches!(self.state, PlayerState::Ready | PlayerState::Paused) {
            self.state = PlayerState::Playing;
            self.activity(now);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
            self.activity(now);
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        match self.state {
            PlayerState::Playing => self.pause(now),
            PlayerState::Ready | PlayerState::Paused => self.play(now),
            _ => {}
        }
    }

    /// Playback ran off the end of the media
    pub fn ended(&mut self) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Ended;
            self.controls_visible = true;
        }
    }

    /// Any media failure lands here. The error screen offers the
    /// alternate sources for recovery.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = PlayerState::Error(message.into());
        self.embed_loaded = false;
        self.native = None;
        self.ad = AdState::Hidden;
        self.controls_visible = true;
    }

    // -------------------------------------------------------------------------
    // Controls, Ads, Timers
    // -------------------------------------------------------------------------

    /// Register user activity: controls come back and the hide timer resets
    pub fn activity(&mut self, now: Instant) {
        self.controls_visible = true;
        self.last_activity = now;
    }

    pub fn dismiss_ad(&mut self) {
        self.ad = AdState::Hidden;
    }

    /// Advance cooperative timers. Controls auto-hide only while playing;
    /// the ad overlay shows after its delay and dismisses after its
    /// duration.
    pub fn tick(&mut self, now: Instant) {
        if self.state == PlayerState::Playing
            && self.controls_visible
            && now.duration_since(self.last_activity) >= CONTROLS_HIDE_AFTER
        {
            self.controls_visible = false;
        }

        match self.ad {
            AdState::Pending { since } if now.duration_since(since) >= AD_DELAY => {
                self.ad = AdState::Visible { since: now };
            }
            AdState::Visible { since } if now.duration_since(since) >= AD_DURATION => {
                self.ad = AdState::Hidden;
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Native Transport Controls
    // -------------------------------------------------------------------------

    /// Seek by signed seconds. Embedded sources delegate transport to the
    /// provider, so this is a no-op for them.
    pub fn seek_by(&mut self, secs: i64, now: Instant) {
        if let Some(native) = self.native.as_mut() {
            native.seek_by(secs);
            self.activity(now);
        }
    }

    pub fn adjust_volume(&mut self, delta: f32, now: Instant) {
        if let Some(native) = self.native.as_mut() {
            native.set_volume(native.volume + delta);
            self.activity(now);
        }
    }

    pub fn adjust_rate(&mut self, delta: f32, now: Instant) {
        if let Some(native) = self.native.as_mut() {
            native.set_rate(native.rate + delta);
            self.activity(now);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
