use std::fmt;
use std::time::Duration;

use log::debug;

use crate::target::Target;
use crate::timer::{OneShotTimer, TimerToken};

/// Delay between an activation and the panel being shown.
pub const DEFAULT_WARP_DELAY: Duration = Duration::from_millis(1000);

/// Delay before the loading screen gives way to the scene.
pub const DEFAULT_SPLASH_DURATION: Duration = Duration::from_millis(2500);

/// Fixed durations used by the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub warp: Duration,
    pub splash: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            warp: DEFAULT_WARP_DELAY,
            splash: DEFAULT_SPLASH_DURATION,
        }
    }
}

/// Committed UI state observed by the scene and the info panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    active_target: Option<Target>,
    is_warping: bool,
    visible_panel: Option<Target>,
}

impl UiState {
    pub fn active_target(&self) -> Option<&Target> {
        self.active_target.as_ref()
    }

    pub fn is_warping(&self) -> bool {
        self.is_warping
    }

    pub fn visible_panel(&self) -> Option<&Target> {
        self.visible_panel.as_ref()
    }

    pub fn is_active(&self, target: &Target) -> bool {
        self.active_target.as_ref() == Some(target)
    }

    pub fn phase(&self) -> Phase<'_> {
        match (&self.active_target, self.is_warping) {
            (None, _) => Phase::Idle,
            (Some(target), true) => Phase::Warping(target),
            (Some(target), false) => Phase::Settled(target),
        }
    }
}

/// Named view of the three state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'a> {
    Idle,
    Warping(&'a Target),
    Settled(&'a Target),
}

impl fmt::Display for Phase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Warping(target) => write!(f, "warping to {target}"),
            Phase::Settled(target) => write!(f, "showing {target}"),
        }
    }
}

/// Outcome of feeding an event into the [`UiStateMachine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new target became active and the warp timer was armed.
    WarpStarted(Target),
    /// The warp for this target completed and its panel is visible.
    Settled(Target),
    /// The active target was activated again and the UI returned to idle.
    ToggledOff(Target),
    /// A close request reset the UI to idle.
    Closed,
}

#[derive(Debug)]
struct PendingWarp {
    token: TimerToken,
    target: Target,
}

/// Sole writer of [`UiState`].
///
/// Activation and close requests update the state synchronously. The warp
/// completion is deferred to [`UiStateMachine::advance`], which the host loop
/// calls once per tick with the current time.
#[derive(Debug)]
pub struct UiStateMachine {
    state: UiState,
    warp_delay: Duration,
    timer: OneShotTimer,
    pending: Option<PendingWarp>,
}

impl Default for UiStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_WARP_DELAY)
    }
}

impl UiStateMachine {
    pub fn new(warp_delay: Duration) -> Self {
        Self {
            state: UiState::default(),
            warp_delay,
            timer: OneShotTimer::new(),
            pending: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn warp_delay(&self) -> Duration {
        self.warp_delay
    }

    /// Deadline of the pending warp completion, if any.
    pub fn pending_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Handles a click on a crystal or the About Me affordance.
    pub fn activate(&mut self, label: Target, now: Duration) -> Transition {
        if self.state.is_active(&label) {
            debug!("toggling off {label}");
            self.reset();
            return Transition::ToggledOff(label);
        }

        let token = self.timer.schedule(now, self.warp_delay);
        self.state = UiState {
            active_target: Some(label.clone()),
            is_warping: true,
            visible_panel: None,
        };
        self.pending = Some(PendingWarp {
            token,
            target: label.clone(),
        });
        debug!("warping to {label}, settles at {:?}", now + self.warp_delay);
        Transition::WarpStarted(label)
    }

    /// Handles the panel's close request. Closing an idle UI is a no-op.
    pub fn close(&mut self) -> Transition {
        if self.state.active_target.is_some() {
            debug!("closing {:?}", self.state.active_target);
        }
        self.reset();
        Transition::Closed
    }

    /// Applies a due warp completion. Returns the transition it caused.
    pub fn advance(&mut self, now: Duration) -> Option<Transition> {
        let fired = self.timer.poll(now)?;
        let pending = self.pending.take()?;
        if pending.token != fired || !self.state.is_active(&pending.target) {
            debug!("dropping superseded warp completion for {}", pending.target);
            return None;
        }

        self.state.is_warping = false;
        self.state.visible_panel = Some(pending.target.clone());
        debug!("settled on {}", pending.target);
        Some(Transition::Settled(pending.target))
    }

    fn reset(&mut self) {
        self.timer.cancel();
        self.pending = None;
        self.state = UiState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn assert_invariants(state: &UiState) {
        if state.is_warping() {
            assert_eq!(state.visible_panel(), None, "panel visible mid-warp");
        }
        if let Some(panel) = state.visible_panel() {
            assert_eq!(state.active_target(), Some(panel), "panel/target mismatch");
        }
    }

    fn settled_on(target: Target) -> UiStateMachine {
        let mut machine = UiStateMachine::default();
        machine.activate(target, ms(0));
        machine.advance(ms(1_000));
        machine
    }

    #[test]
    fn starts_idle() {
        let machine = UiStateMachine::default();
        assert_eq!(machine.state().phase(), Phase::Idle);
        assert_eq!(machine.state(), &UiState::default());
    }

    #[test]
    fn activation_warps_then_settles() {
        let mut machine = UiStateMachine::default();
        let transition = machine.activate(Target::CONTACT, ms(0));
        assert_eq!(transition, Transition::WarpStarted(Target::CONTACT));
        let state = machine.state();
        assert_eq!(state.active_target(), Some(&Target::CONTACT));
        assert!(state.is_warping());
        assert_eq!(state.visible_panel(), None);

        assert_eq!(machine.advance(ms(999)), None);
        assert!(machine.state().is_warping());

        assert_eq!(
            machine.advance(ms(1_000)),
            Some(Transition::Settled(Target::CONTACT))
        );
        let state = machine.state();
        assert_eq!(state.active_target(), Some(&Target::CONTACT));
        assert!(!state.is_warping());
        assert_eq!(state.visible_panel(), Some(&Target::CONTACT));
        assert_eq!(state.phase(), Phase::Settled(&Target::CONTACT));
    }

    #[test]
    fn reactivating_settled_target_toggles_off() {
        let mut machine = settled_on(Target::PROJECTS);
        let transition = machine.activate(Target::PROJECTS, ms(1_500));
        assert_eq!(transition, Transition::ToggledOff(Target::PROJECTS));
        assert_eq!(machine.state(), &UiState::default());
        assert_eq!(machine.pending_deadline(), None);
        assert_eq!(machine.advance(ms(10_000)), None);
        assert_eq!(machine.state(), &UiState::default());
    }

    #[test]
    fn reactivating_during_warp_never_settles() {
        let mut machine = UiStateMachine::default();
        machine.activate(Target::SKILLS, ms(0));
        machine.activate(Target::SKILLS, ms(200));
        assert_eq!(machine.state().phase(), Phase::Idle);
        assert_eq!(machine.advance(ms(1_000)), None);
        assert_eq!(machine.advance(ms(5_000)), None);
        assert_eq!(machine.state().phase(), Phase::Idle);
    }

    #[test]
    fn close_from_settled_returns_to_idle() {
        let mut machine = settled_on(Target::CONTACT);
        assert_eq!(machine.close(), Transition::Closed);
        assert_eq!(machine.state(), &UiState::default());
    }

    #[test]
    fn close_is_idempotent() {
        let mut machine = settled_on(Target::CONTACT);
        machine.close();
        let once = machine.state().clone();
        machine.close();
        assert_eq!(machine.state(), &once);
        assert_eq!(machine.state().phase(), Phase::Idle);
    }

    #[test]
    fn close_during_warp_suppresses_completion() {
        let mut machine = UiStateMachine::default();
        machine.activate(Target::ABOUT_ME, ms(0));
        machine.close();
        assert_eq!(machine.state().phase(), Phase::Idle);
        assert_eq!(machine.advance(ms(1_000)), None);
        assert_eq!(machine.advance(ms(2_000)), None);
        assert_eq!(machine.state(), &UiState::default());
    }

    #[test]
    fn later_activation_supersedes_pending_warp() {
        let mut machine = UiStateMachine::default();
        machine.activate(Target::PROJECTS, ms(0));
        machine.activate(Target::CONTACT, ms(400));

        assert_eq!(machine.advance(ms(1_000)), None);
        let state = machine.state();
        assert_eq!(state.active_target(), Some(&Target::CONTACT));
        assert!(state.is_warping());
        assert_eq!(state.visible_panel(), None);

        assert_eq!(
            machine.advance(ms(1_400)),
            Some(Transition::Settled(Target::CONTACT))
        );
        assert_eq!(machine.state().visible_panel(), Some(&Target::CONTACT));
    }

    #[test]
    fn switching_from_settled_hides_panel_immediately() {
        let mut machine = settled_on(Target::PROJECTS);
        machine.activate(Target::SKILLS, ms(2_000));
        let state = machine.state();
        assert_eq!(state.visible_panel(), None);
        assert_eq!(state.phase(), Phase::Warping(&Target::SKILLS));
    }

    #[test]
    fn reopening_after_close_uses_fresh_deadline() {
        let mut machine = UiStateMachine::default();
        machine.activate(Target::CONTACT, ms(0));
        machine.close();
        machine.activate(Target::CONTACT, ms(600));
        assert_eq!(machine.advance(ms(1_000)), None);
        assert!(machine.state().is_warping());
        assert_eq!(
            machine.advance(ms(1_600)),
            Some(Transition::Settled(Target::CONTACT))
        );
    }

    #[test]
    fn unknown_targets_still_warp_and_settle() {
        let mut machine = UiStateMachine::default();
        let blog = Target::new("Blog");
        machine.activate(blog.clone(), ms(0));
        assert_eq!(machine.advance(ms(1_000)), Some(Transition::Settled(blog)));
    }

    #[test]
    fn invariants_hold_across_event_sequences() {
        let mut machine = UiStateMachine::default();
        let targets = [
            Target::PROJECTS,
            Target::CONTACT,
            Target::PROJECTS,
            Target::ABOUT_ME,
            Target::ABOUT_ME,
            Target::SKILLS,
        ];
        let mut now = ms(0);
        for (step, target) in targets.iter().cycle().take(40).enumerate() {
            match step % 5 {
                0 | 2 => {
                    machine.activate(target.clone(), now);
                }
                1 => now += ms(1_200),
                3 => now += ms(300),
                _ => {
                    machine.close();
                }
            }
            machine.advance(now);
            assert_invariants(machine.state());
        }
    }

    #[test]
    fn custom_warp_delay_is_respected() {
        let mut machine = UiStateMachine::new(ms(250));
        machine.activate(Target::PROJECTS, ms(10));
        assert_eq!(machine.pending_deadline(), Some(ms(260)));
        assert_eq!(
            machine.advance(ms(260)),
            Some(Transition::Settled(Target::PROJECTS))
        );
    }

    #[test]
    fn phase_describes_state() {
        let mut machine = UiStateMachine::default();
        assert_eq!(machine.state().phase().to_string(), "idle");
        machine.activate(Target::CONTACT, ms(0));
        assert_eq!(machine.state().phase().to_string(), "warping to Contact");
        machine.advance(ms(1_000));
        assert_eq!(machine.state().phase().to_string(), "showing Contact");
    }
}
