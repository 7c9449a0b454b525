//! Ping walk
//!
//! A walk pings a list of devices one after another. It is cancelled
//! cooperatively: the token is checked before each ping, so a cancel takes
//! effect once the in-flight ping has completed and never interrupts it.

use std::future::Future;

use crate::models::PingStatus;

pub use tokio_util::sync::CancellationToken;

/// Tally of a finished (or cancelled) walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Pings that completed, whatever their outcome
    pub pinged: usize,
    pub pong: usize,
    pub fail: usize,
    /// Pings whose request itself failed
    pub errors: usize,
    /// Whether the walk stopped before the last target
    pub cancelled: bool,
}

/// Ping every target in order until done or cancelled.
///
/// `on_result` sees each result as soon as its ping resolves, including the
/// ping that was in flight when the token was cancelled.
pub async fn walk<'a, T, E, P, Fut, R>(
    targets: &'a [T],
    token: &CancellationToken,
    mut ping: P,
    mut on_result: R,
) -> WalkReport
where
    P: FnMut(&'a T) -> Fut,
    Fut: Future<Output = Result<PingStatus, E>>,
    R: FnMut(&'a T, &Result<PingStatus, E>),
{
    let mut report = WalkReport::default();

    for target in targets {
        if token.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let result = ping(target).await;
        report.pinged += 1;
        match &result {
            Ok(PingStatus::Pong) => report.pong += 1,
            Ok(PingStatus::Fail) => report.fail += 1,
            Err(_) => report.errors += 1,
        }
        on_result(target, &result);
    }

    report
}

/// A walk started by [`WalkSwitch::toggle`]
#[derive(Debug, Clone)]
pub struct WalkRun {
    pub id: u64,
    pub token: CancellationToken,
}

/// What pressing the walk toggle did
#[derive(Debug, Clone)]
pub enum Toggle {
    /// No walk was running; the caller should drive this one
    Started(WalkRun),
    /// The running walk was asked to stop after its current ping
    Stopping,
}

#[derive(Debug, Default)]
enum SwitchState {
    #[default]
    Idle,
    Running(WalkRun),
}

/// State behind the walk on/off button
///
/// A cancelled walk keeps the switch busy until it reports back through
/// [`WalkSwitch::finish`], so two walks never overlap.
#[derive(Debug, Default)]
pub struct WalkSwitch {
    state: SwitchState,
    next_id: u64,
}

impl WalkSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) -> Toggle {
        match &self.state {
            SwitchState::Idle => {
                self.next_id += 1;
                let run = WalkRun {
                    id: self.next_id,
                    token: CancellationToken::new(),
                };
                self.state = SwitchState::Running(run.clone());
                Toggle::Started(run)
            }
            SwitchState::Running(run) => {
                run.token.cancel();
                Toggle::Stopping
            }
        }
    }

    /// Mark run `id` as done. Returns `false` for a run that is not the
    /// current one.
    pub fn finish(&mut self, id: u64) -> bool {
        match &self.state {
            SwitchState::Running(run) if run.id == id => {
                self.state = SwitchState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SwitchState::Running(_))
    }

    /// Running, but asked to stop
    pub fn is_stopping(&self) -> bool {
        matches!(&self.state, SwitchState::Running(run) if run.token.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[test]
    fn test_walk_pings_every_target_in_order() {
        let token = CancellationToken::new();
        let targets = vec![1, 2, 3];
        let seen = RefCell::new(Vec::new());

        let report = block_on(walk(
            &targets,
            &token,
            |n| {
                seen.borrow_mut().push(*n);
                let n = *n;
                async move {
                    if n == 2 {
                        Ok::<_, String>(PingStatus::Fail)
                    } else {
                        Ok(PingStatus::Pong)
                    }
                }
            },
            |_, _| {},
        ));

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert_eq!(
            report,
            WalkReport {
                pinged: 3,
                pong: 2,
                fail: 1,
                errors: 0,
                cancelled: false,
            }
        );
    }

    #[test]
    fn test_cancel_mid_ping_lets_current_ping_finish() {
        let token = CancellationToken::new();
        let targets = vec!["a", "b", "c"];
        let results = RefCell::new(Vec::new());

        let report = block_on(walk(
            &targets,
            &token,
            |_| {
                // The toggle is pressed while this ping is in flight.
                let token = token.clone();
                async move {
                    token.cancel();
                    Ok::<_, String>(PingStatus::Pong)
                }
            },
            |target, result| results.borrow_mut().push((*target, result.clone())),
        ));

        assert_eq!(*results.borrow(), vec![("a", Ok(PingStatus::Pong))]);
        assert_eq!(report.pinged, 1);
        assert!(report.cancelled);
    }

    #[test]
    fn test_request_errors_are_counted_and_walk_continues() {
        let token = CancellationToken::new();
        let targets = vec![1, 2];

        let report = block_on(walk(
            &targets,
            &token,
            |n| {
                let n = *n;
                async move {
                    if n == 1 {
                        Err("connection refused".to_string())
                    } else {
                        Ok(PingStatus::Pong)
                    }
                }
            },
            |_, _| {},
        ));

        assert_eq!(report.errors, 1);
        assert_eq!(report.pong, 1);
        assert_eq!(report.pinged, 2);
    }

    #[test]
    fn test_switch_lifecycle() {
        let mut switch = WalkSwitch::new();
        assert!(!switch.is_running());

        let run = match switch.toggle() {
            Toggle::Started(run) => run,
            Toggle::Stopping => panic!("idle switch should start a walk"),
        };
        assert!(switch.is_running());
        assert!(!switch.is_stopping());

        assert!(matches!(switch.toggle(), Toggle::Stopping));
        assert!(run.token.is_cancelled());
        assert!(switch.is_stopping());

        // Pressing again while stopping does not start a second walk.
        assert!(matches!(switch.toggle(), Toggle::Stopping));

        assert!(!switch.finish(run.id + 1));
        assert!(switch.finish(run.id));
        assert!(!switch.is_running());

        match switch.toggle() {
            Toggle::Started(next) => {
                assert_ne!(next.id, run.id);
                assert!(!next.token.is_cancelled());
                assert!(!switch.finish(run.id));
                assert!(switch.is_running());
            }
            Toggle::Stopping => panic!("finished switch should start again"),
        }
    }
}
