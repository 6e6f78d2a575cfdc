use std::time::Duration;

use popform_schema::{DisplayConfig, DisplayMode, DisplayTrigger};

/// Lifecycle of a form's visibility on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Hidden,
    Visible,
    Dismissed,
    Submitted,
}

/// Host listener a trigger needs while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    Timer,
    Scroll,
    ExitIntent,
}

/// Scroll depth, as a fraction of page height, that fires a scroll trigger.
pub const SCROLL_THRESHOLD: f64 = 0.5;

/// Explicit state machine replacing mount/unmount hook side effects:
/// `attach` arms the trigger, host events feed in, `detach` cancels.
/// After the first visibility transition, or any terminal transition, the
/// trigger never re-arms within the same mount lifetime.
#[derive(Debug, Clone)]
pub struct DisplayController {
    config: DisplayConfig,
    phase: DisplayPhase,
    armed: bool,
    waited: Duration,
}

impl DisplayController {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            phase: DisplayPhase::Hidden,
            armed: false,
            waited: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == DisplayPhase::Visible
    }

    pub fn overlay(&self) -> bool {
        self.config.overlay
    }

    /// Arms the trigger on mount. Inline forms and immediate triggers
    /// become visible right away and need no listener.
    pub fn attach(&mut self) -> Option<Listener> {
        if self.phase != DisplayPhase::Hidden {
            return None;
        }
        if self.config.mode.is_inline() {
            self.phase = DisplayPhase::Visible;
            return None;
        }
        self.armed = true;
        match self.config.trigger {
            DisplayTrigger::Immediate | DisplayTrigger::Unknown => {
                self.show();
                None
            }
            DisplayTrigger::Delay => Some(Listener::Timer),
            DisplayTrigger::Scroll => Some(Listener::Scroll),
            DisplayTrigger::ExitIntent => Some(Listener::ExitIntent),
        }
    }

    /// Cancels any pending timer and drops listeners. A detached controller
    /// never transitions to visible.
    pub fn detach(&mut self) {
        self.armed = false;
    }

    /// Feeds elapsed wall-clock time toward a delay trigger.
    pub fn elapsed(&mut self, delta: Duration) {
        if !self.trigger_active(DisplayTrigger::Delay) {
            return;
        }
        self.waited += delta;
        if self.waited >= Duration::from_secs(self.config.delay_seconds) {
            self.show();
        }
    }

    /// Reports scroll depth as a fraction of page height in `0.0..=1.0`.
    pub fn scrolled(&mut self, fraction: f64) {
        if self.trigger_active(DisplayTrigger::Scroll) && fraction >= SCROLL_THRESHOLD {
            self.show();
        }
    }

    /// Reports an about-to-leave signal.
    pub fn exit_intent(&mut self) {
        if self.trigger_active(DisplayTrigger::ExitIntent) {
            self.show();
        }
    }

    /// User-initiated close. Terminal, and distinct from submitted.
    pub fn dismiss(&mut self) {
        if self.phase != DisplayPhase::Submitted {
            self.phase = DisplayPhase::Dismissed;
            self.armed = false;
        }
    }

    pub fn submitted(&mut self) {
        self.phase = DisplayPhase::Submitted;
        self.armed = false;
    }

    fn trigger_active(&self, trigger: DisplayTrigger) -> bool {
        self.armed && self.phase == DisplayPhase::Hidden && self.config.trigger == trigger
    }

    fn show(&mut self) {
        self.phase = DisplayPhase::Visible;
        // Listeners detach after the first transition.
        self.armed = false;
    }
}

/// Human label matching the builder preview badge, e.g. "Popup · after 3s".
/// Inline forms have no label.
pub fn display_label(config: &DisplayConfig) -> Option<String> {
    let mode = match config.mode {
        DisplayMode::Popup => "Popup",
        DisplayMode::SlideLeft => "Slide from left",
        DisplayMode::SlideRight => "Slide from right",
        DisplayMode::SlideBottom => "Slide from bottom",
        DisplayMode::Inline | DisplayMode::Unknown => return None,
    };
    let trigger = match config.trigger {
        DisplayTrigger::Immediate | DisplayTrigger::Unknown => "on page load".to_string(),
        DisplayTrigger::Delay => format!("after {}s", config.delay_seconds),
        DisplayTrigger::Scroll => "on scroll".to_string(),
        DisplayTrigger::ExitIntent => "on exit intent".to_string(),
    };
    Some(format!("{mode} · {trigger}"))
}
