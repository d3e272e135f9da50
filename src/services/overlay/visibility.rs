//! Presentation-mode and auto-hide state machine.
//!
//! The machine is a pure transition core: it owns the mode and the two
//! independent flags, and answers every event with the list of side effects
//! the owner must execute (arming and cancelling the grace and auto-hide
//! timers, notifying the host of mode changes). Timer wakeups come back in
//! as events, so the whole thing is testable without any clock.
//!
//! Two deliberately asymmetric rules, kept exactly as the widget behaves:
//! a pointer-enter while the minimize grace timer is armed cancels the
//! pending minimize but performs none of the usual enter effects, while a
//! drag in progress suppresses only the leave-side arming.

use super::types::PresentationMode;

/// External stimulus handled by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// Pointer entered the card.
    PointerEnter,
    /// Pointer left the card.
    PointerLeave,
    /// The minimize grace timer fired.
    GraceElapsed,
    /// The auto-hide idle timer fired.
    AutoHideElapsed,
    /// A qualifying interaction happened (pointer-down, button click).
    Interaction,
    /// A drag began.
    DragStarted,
    /// A drag ended.
    DragEnded,
    /// The host toggled full suppression.
    SetHidden(bool),
}

/// Side effect the owner must execute after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Arm the minimize grace timer (cancelling any pending one first).
    ArmGrace,
    /// Cancel the minimize grace timer.
    CancelGrace,
    /// Arm the auto-hide idle timer (cancelling any pending one first).
    ArmAutoHide,
    /// Cancel the auto-hide idle timer.
    CancelAutoHide,
    /// The presentation mode changed; forward to the host.
    ModeChanged(PresentationMode),
}

/// The minimized/hover machine with its hidden and auto-hidden flags.
#[derive(Debug)]
pub struct VisibilityMachine {
    mode: PresentationMode,
    hidden: bool,
    auto_hidden: bool,
    grace_armed: bool,
    auto_hide_armed: bool,
    dragging: bool,
}

impl Default for VisibilityMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityMachine {
    /// Machine in its startup state: minimized, visible, not dimmed.
    pub fn new() -> Self {
        Self {
            mode: PresentationMode::Minimized,
            hidden: false,
            auto_hidden: false,
            grace_armed: false,
            auto_hide_armed: false,
            dragging: false,
        }
    }

    /// Current presentation mode.
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Whether the host has fully suppressed the overlay.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Whether inactivity has dimmed the minimized card.
    pub fn auto_hidden(&self) -> bool {
        self.auto_hidden
    }

    /// Apply one event and return the effects to execute, in order.
    pub fn handle(&mut self, event: VisibilityEvent) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            VisibilityEvent::PointerEnter => {
                if self.grace_armed {
                    // Re-entry during the grace period: the pending minimize
                    // must not fire, but the enter is otherwise ignored, so
                    // it can neither reopen hover nor reset auto-hide.
                    self.grace_armed = false;
                    effects.push(Effect::CancelGrace);
                } else {
                    self.interaction(&mut effects);
                    if self.mode == PresentationMode::Minimized && !self.hidden {
                        self.enter_mode(PresentationMode::Hover, &mut effects);
                    }
                }
            }
            VisibilityEvent::PointerLeave => {
                // A drag in progress must never auto-minimize.
                if !self.dragging {
                    self.grace_armed = true;
                    effects.push(Effect::CancelGrace);
                    effects.push(Effect::ArmGrace);
                }
            }
            VisibilityEvent::GraceElapsed => {
                // A stale wakeup that lost the race against a cancel is
                // ignored rather than minimizing out of order.
                if self.grace_armed {
                    self.grace_armed = false;
                    if self.mode != PresentationMode::Minimized {
                        self.enter_mode(PresentationMode::Minimized, &mut effects);
                    }
                }
            }
            VisibilityEvent::AutoHideElapsed => {
                if self.auto_hide_armed {
                    self.auto_hide_armed = false;
                    self.auto_hidden = true;
                }
            }
            VisibilityEvent::Interaction => {
                self.interaction(&mut effects);
            }
            VisibilityEvent::DragStarted => {
                self.dragging = true;
            }
            VisibilityEvent::DragEnded => {
                self.dragging = false;
            }
            VisibilityEvent::SetHidden(hidden) => {
                self.hidden = hidden;
                if hidden {
                    self.auto_hidden = false;
                    self.auto_hide_armed = false;
                    effects.push(Effect::CancelAutoHide);
                } else {
                    self.interaction(&mut effects);
                }
            }
        }

        effects
    }

    /// A qualifying interaction clears the dim state and restarts the idle
    /// countdown, which only runs while minimized.
    fn interaction(&mut self, effects: &mut Vec<Effect>) {
        if self.hidden {
            return;
        }
        self.auto_hidden = false;
        self.auto_hide_armed = false;
        effects.push(Effect::CancelAutoHide);
        if self.mode == PresentationMode::Minimized {
            self.auto_hide_armed = true;
            effects.push(Effect::ArmAutoHide);
        }
    }

    fn enter_mode(&mut self, mode: PresentationMode, effects: &mut Vec<Effect>) {
        self.mode = mode;
        effects.push(Effect::ModeChanged(mode));
        self.auto_hide_armed = false;
        effects.push(Effect::CancelAutoHide);
        match mode {
            PresentationMode::Hover => {
                self.auto_hidden = false;
            }
            PresentationMode::Minimized => {
                if !self.hidden {
                    self.auto_hide_armed = true;
                    effects.push(Effect::ArmAutoHide);
                }
            }
        }
    }
}
