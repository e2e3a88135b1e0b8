//! Deciding which way the snake should go before each tick
use crate::engine::{choose_direction, ControlMode, Direction, GameState, Settings};
use crate::policy::{FeedClosed, PolicyFeed, Prediction};
use enum_dispatch::enum_dispatch;
use std::path::Path;

#[enum_dispatch]
pub(crate) trait Steer {
    /// Return the direction to request for the upcoming tick, or `None` to
    /// leave the pending direction alone
    fn steer(&mut self, state: &GameState, settings: &Settings) -> Option<Direction>;
}

#[enum_dispatch(Steer)]
#[derive(Debug)]
pub(crate) enum Controller {
    Keyboard,
    Autopilot,
    External,
}

impl Controller {
    /// Construct the controller for the given mode.  `policy` is where the
    /// external policy's predictions are read from.
    pub(crate) fn for_mode(mode: ControlMode, policy: Option<&Path>) -> Controller {
        match mode {
            ControlMode::Menu | ControlMode::Manual => Keyboard.into(),
            ControlMode::Autonomous => Autopilot.into(),
            ControlMode::ExternalPolicy => External::connect(policy).into(),
        }
    }
}

/// The human steers by key presses, which go straight to the session
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Keyboard;

impl Steer for Keyboard {
    fn steer(&mut self, _state: &GameState, _settings: &Settings) -> Option<Direction> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Autopilot;

impl Steer for Autopilot {
    fn steer(&mut self, state: &GameState, settings: &Settings) -> Option<Direction> {
        Some(choose_direction(state, settings))
    }
}

/// Follows predictions from an external policy.  When no usable prediction
/// has arrived for the upcoming tick, the autopilot steers instead.
#[derive(Debug, Default)]
pub(crate) struct External {
    feed: Option<PolicyFeed>,

    /// A prediction tagged for a tick that has not happened yet
    held: Option<Prediction>,
}

impl External {
    fn connect(policy: Option<&Path>) -> External {
        let Some(path) = policy else {
            log::warn!("No prediction source configured; the autopilot will steer");
            return External::default();
        };
        match PolicyFeed::spawn(path.to_owned()) {
            Ok(feed) => External::new(feed),
            Err(e) => {
                log::error!("Failed to start prediction reader: {e}");
                External::default()
            }
        }
    }

    pub(crate) fn new(feed: PolicyFeed) -> External {
        External {
            feed: Some(feed),
            held: None,
        }
    }
}

impl Steer for External {
    fn steer(&mut self, state: &GameState, settings: &Settings) -> Option<Direction> {
        if let Some(feed) = self.feed.as_ref() {
            match feed.latest() {
                Ok(Some(p)) => self.held = Some(p),
                Ok(None) => (),
                Err(FeedClosed) => {
                    log::warn!("Prediction feed closed; the autopilot will steer");
                    self.feed = None;
                }
            }
        }
        match self.held.take() {
            Some(p) if p.tick.is_none_or(|t| t == state.ticks) => return Some(p.direction),
            Some(p) if p.tick > Some(state.ticks) => self.held = Some(p),
            Some(p) => log::debug!(
                "Discarding stale prediction for tick {:?} at tick {}",
                p.tick,
                state.ticks
            ),
            None => (),
        }
        Some(choose_direction(state, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::session;
    use std::sync::mpsc::{channel, Sender};

    fn external() -> (External, Sender<Prediction>) {
        let (sender, receiver) = channel();
        (External::new(PolicyFeed::new(receiver)), sender)
    }

    fn predict(sender: &Sender<Prediction>, tick: Option<u64>, direction: Direction) {
        sender.send(Prediction { tick, direction }).unwrap();
    }

    #[test]
    fn keyboard_leaves_direction_alone() {
        let s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((0, 0)));
        assert_eq!(Controller::from(Keyboard).steer(s.state(), s.settings()), None);
    }

    #[test]
    fn autopilot_matches_choose_direction() {
        let s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((5, 9)));
        let mut c = Controller::for_mode(ControlMode::Autonomous, None);
        assert_eq!(c.steer(s.state(), s.settings()), Some(Direction::Down));
    }

    #[test]
    fn external_follows_prediction() {
        // The autopilot would go right, toward the food
        let s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((8, 5)));
        let (mut ext, sender) = external();
        predict(&sender, Some(0), Direction::Up);
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Up));
        // Used once, then back to the autopilot
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Right));
    }

    #[test]
    fn external_untagged_prediction() {
        let s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((8, 5)));
        let (mut ext, sender) = external();
        predict(&sender, None, Direction::Down);
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Down));
    }

    #[test]
    fn external_newest_prediction_wins() {
        let s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((8, 5)));
        let (mut ext, sender) = external();
        predict(&sender, Some(0), Direction::Up);
        predict(&sender, Some(0), Direction::Down);
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Down));
    }

    #[test]
    fn external_discards_stale_prediction() {
        let mut s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((8, 5)));
        let _ = s.tick();
        let _ = s.tick();
        let (mut ext, sender) = external();
        predict(&sender, Some(1), Direction::Up);
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Right));
    }

    #[test]
    fn external_holds_early_prediction() {
        let mut s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((8, 5)));
        let (mut ext, sender) = external();
        predict(&sender, Some(1), Direction::Up);
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Right));
        let _ = s.tick();
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Up));
    }

    #[test]
    fn external_without_feed_uses_autopilot() {
        let s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((5, 9)));
        let mut c = Controller::for_mode(ControlMode::ExternalPolicy, None);
        assert_eq!(c.steer(s.state(), s.settings()), Some(Direction::Down));
    }

    #[test]
    fn external_survives_closed_feed() {
        let s = session(10, 10, &[(4, 5), (5, 5)], Direction::Right, Some((5, 9)));
        let (mut ext, sender) = external();
        predict(&sender, Some(0), Direction::Up);
        drop(sender);
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Up));
        assert_eq!(ext.steer(s.state(), s.settings()), Some(Direction::Down));
        assert!(ext.feed.is_none());
    }

    #[test]
    fn controller_per_mode() {
        assert!(matches!(
            Controller::for_mode(ControlMode::Manual, None),
            Controller::Keyboard(_)
        ));
        assert!(matches!(
            Controller::for_mode(ControlMode::Autonomous, None),
            Controller::Autopilot(_)
        ));
        assert!(matches!(
            Controller::for_mode(ControlMode::ExternalPolicy, None),
            Controller::External(_)
        ));
    }
}
