//! Reading action predictions produced by an out-of-process policy
use crate::engine::Direction;
use crate::util::error_chain;
use serde::Deserialize;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use thiserror::Error;

/// A direction suggested by the external policy.
///
/// Each prediction is one line of JSON, e.g.:
///
/// ```text
/// {"tick": 17, "action": 3}
/// {"action": "left"}
/// ```
///
/// `action` is either an action index (0 = up, 1 = down, 2 = left, 3 =
/// right) or a direction name.  `tick`, if given, is the value of the game's
/// tick counter that the prediction was computed for; predictions for
/// earlier ticks are discarded.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawPrediction")]
pub(crate) struct Prediction {
    pub(crate) tick: Option<u64>,
    pub(crate) direction: Direction,
}

impl std::str::FromStr for Prediction {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Prediction, PolicyError> {
        serde_json::from_str(s).map_err(|source| PolicyError::Parse {
            line: s.to_owned(),
            source,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct RawPrediction {
    #[serde(default)]
    tick: Option<u64>,
    action: RawAction,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
enum RawAction {
    Index(u8),
    Name(Direction),
}

impl TryFrom<RawPrediction> for Prediction {
    type Error = PolicyError;

    fn try_from(value: RawPrediction) -> Result<Prediction, PolicyError> {
        let direction = match value.action {
            RawAction::Index(i) => Direction::from_index(i).ok_or(PolicyError::ActionIndex(i))?,
            RawAction::Name(d) => d,
        };
        Ok(Prediction {
            tick: value.tick,
            direction,
        })
    }
}

/// Parse predictions from `reader` one line at a time and send them down
/// `sender`.  Blank lines are ignored and lines that fail to parse are
/// logged and skipped.
///
/// Returns once the input is exhausted or nobody is listening any more.
///
/// # Errors
///
/// Returns `Err` if reading from `reader` fails.
pub(crate) fn read_predictions<B: BufRead>(
    reader: B,
    sender: &Sender<Prediction>,
) -> Result<(), PolicyError> {
    for line in reader.lines() {
        let line = line.map_err(PolicyError::Read)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Prediction>() {
            Ok(p) => {
                if sender.send(p).is_err() {
                    log::debug!("Prediction receiver hung up; no longer reading");
                    return Ok(());
                }
            }
            Err(e) => log::warn!("Skipping prediction: {}", error_chain(&e)),
        }
    }
    Ok(())
}

/// The receiving end of a background thread that reads predictions from a
/// file or named pipe
#[derive(Debug)]
pub(crate) struct PolicyFeed {
    receiver: Receiver<Prediction>,
}

impl PolicyFeed {
    /// Start reading predictions from `path` in a new thread.  The file is
    /// opened by the thread, as opening a named pipe blocks until a writer
    /// shows up.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the thread could not be spawned.
    pub(crate) fn spawn(path: PathBuf) -> io::Result<PolicyFeed> {
        let (sender, receiver) = channel();
        std::thread::Builder::new()
            .name("policy-feed".into())
            .spawn(move || {
                log::info!("Reading predictions from {}", path.display());
                let r = fs_err::File::open(&path)
                    .map_err(PolicyError::Read)
                    .and_then(|fp| read_predictions(BufReader::new(fp), &sender));
                match r {
                    Ok(()) => log::info!("Prediction input {} closed", path.display()),
                    Err(e) => log::error!("{}", error_chain(&e)),
                }
            })?;
        Ok(PolicyFeed { receiver })
    }

    #[cfg(test)]
    pub(crate) fn new(receiver: Receiver<Prediction>) -> PolicyFeed {
        PolicyFeed { receiver }
    }

    /// Return the most recent prediction received since the last call, if
    /// any, discarding older ones.
    ///
    /// # Errors
    ///
    /// Returns `Err(FeedClosed)` once the reader has stopped and every
    /// prediction it sent has been consumed.
    pub(crate) fn latest(&self) -> Result<Option<Prediction>, FeedClosed> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(p) => latest = Some(p),
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    return if latest.is_some() {
                        Ok(latest)
                    } else {
                        Err(FeedClosed)
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("prediction feed closed")]
pub(crate) struct FeedClosed;

#[derive(Debug, Error)]
pub(crate) enum PolicyError {
    #[error("action index {0} out of range; expected 0 through 3")]
    ActionIndex(u8),
    #[error("failed to parse prediction {line:?}")]
    Parse {
        line: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read predictions")]
    Read(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;
    use std::io::Write;

    #[rstest]
    #[case(r#"{"tick": 17, "action": 3}"#, Some(17), Direction::Right)]
    #[case(r#"{"action": 0}"#, None, Direction::Up)]
    #[case(r#"{"action": "left"}"#, None, Direction::Left)]
    #[case(r#"{"tick": 0, "action": "down"}"#, Some(0), Direction::Down)]
    fn parse_prediction(
        #[case] line: &str,
        #[case] tick: Option<u64>,
        #[case] direction: Direction,
    ) {
        assert_eq!(
            line.parse::<Prediction>().unwrap(),
            Prediction { tick, direction }
        );
    }

    #[rstest]
    #[case(r#"{"action": 4}"#)]
    #[case(r#"{"action": "sideways"}"#)]
    #[case(r#"{"tick": 3}"#)]
    #[case(r#"{"tick": -1, "action": 1}"#)]
    #[case("up")]
    fn parse_bad_prediction(#[case] line: &str) {
        assert!(line.parse::<Prediction>().is_err());
    }

    #[test]
    fn read_skips_bad_lines() {
        let input = "{\"action\": 1}\n\nnonsense\n  {\"tick\": 5, \"action\": \"up\"}  \n";
        let (sender, receiver) = channel();
        read_predictions(Cursor::new(input), &sender).unwrap();
        drop(sender);
        assert_eq!(
            receiver.iter().collect::<Vec<_>>(),
            [
                Prediction {
                    tick: None,
                    direction: Direction::Down
                },
                Prediction {
                    tick: Some(5),
                    direction: Direction::Up
                },
            ]
        );
    }

    #[test]
    fn read_stops_when_receiver_is_gone() {
        let (sender, receiver) = channel();
        drop(receiver);
        let input = "{\"action\": 1}\n{\"action\": 2}\n";
        assert!(read_predictions(Cursor::new(input), &sender).is_ok());
    }

    #[test]
    fn latest_keeps_newest() {
        let (sender, receiver) = channel();
        let feed = PolicyFeed::new(receiver);
        assert_eq!(feed.latest(), Ok(None));
        for (tick, direction) in [(1, Direction::Up), (2, Direction::Left)] {
            sender
                .send(Prediction {
                    tick: Some(tick),
                    direction,
                })
                .unwrap();
        }
        assert_eq!(
            feed.latest(),
            Ok(Some(Prediction {
                tick: Some(2),
                direction: Direction::Left
            }))
        );
        assert_eq!(feed.latest(), Ok(None));
        drop(sender);
        assert_eq!(feed.latest(), Err(FeedClosed));
    }

    #[test]
    fn spawn_reads_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{{\"tick\": 0, \"action\": \"right\"}}").unwrap();
        writeln!(tmp, "{{\"tick\": 1, \"action\": 1}}").unwrap();
        tmp.flush().unwrap();
        let feed = PolicyFeed::spawn(tmp.path().to_owned()).unwrap();
        let mut got = Vec::new();
        while let Ok(p) = feed.receiver.recv() {
            got.push(p);
        }
        assert_eq!(
            got,
            [
                Prediction {
                    tick: Some(0),
                    direction: Direction::Right
                },
                Prediction {
                    tick: Some(1),
                    direction: Direction::Down
                },
            ]
        );
    }
}
