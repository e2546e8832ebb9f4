//! Auto-play
//!
//! [`AutoPlayController`] is the synchronous part: an on/off flag, the cached
//! request and a `tick` that performs one spin. [`AutoPlayRunner`] schedules
//! ticks on a tokio timer and listens on a watch channel, so turning auto-play
//! off always lands before the next scheduled spin.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use rand::rngs::StdRng;
use tokio::sync::watch;

use crate::config::AutoPlayConfig;
use crate::error::SpinError;
use crate::events::GameEvent;
use crate::request::SpinRequest;
use crate::session::{GameSession, SharedSession, SpinReport};

/// Why auto-play switched itself off
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoPlayStop {
    /// No validated request to repeat yet
    NoRequest,
    /// The repeated request failed validation
    Rejected(SpinError),
}

/// Result of one auto-play tick
#[derive(Debug, Clone, PartialEq)]
pub enum AutoPlayTick {
    /// Auto-play is off; nothing happened
    Idle,
    /// One spin was played
    Spun(Box<SpinReport>),
    /// Auto-play turned itself off
    Stopped(AutoPlayStop),
}

/// Auto-play state machine
#[derive(Debug, Clone)]
pub struct AutoPlayController {
    enabled: bool,
    request: Option<SpinRequest>,
    delay: Duration,
}

impl AutoPlayController {
    pub fn new(config: &AutoPlayConfig) -> Self {
        Self {
            enabled: false,
            request: None,
            delay: config.spin_delay(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached request parameters
    pub fn request(&self) -> Option<SpinRequest> {
        self.request
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Override the delay between spins
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Flip auto-play; returns the new state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        log::info!("[AutoPlay] {}", if self.enabled { "enabled" } else { "disabled" });
        self.enabled
    }

    pub fn stop(&mut self) {
        self.enabled = false;
    }

    /// Play one spin with the last validated request.
    ///
    /// Turns itself off when there is no request to repeat or the request no
    /// longer validates.
    pub fn tick<R: Rng>(&mut self, session: &mut GameSession<R>) -> AutoPlayTick {
        if !self.enabled {
            return AutoPlayTick::Idle;
        }

        let Some(request) = session.last_request().or(self.request) else {
            log::warn!("[AutoPlay] no validated request to repeat, stopping");
            self.stop();
            return AutoPlayTick::Stopped(AutoPlayStop::NoRequest);
        };
        self.request = Some(request);

        match session.spin(request) {
            Ok(report) => AutoPlayTick::Spun(Box::new(report)),
            Err(err) => {
                log::info!("[AutoPlay] stopping: {}", err);
                self.stop();
                AutoPlayTick::Stopped(AutoPlayStop::Rejected(err))
            }
        }
    }
}

/// Runner lifecycle signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerSignal {
    Paused,
    Running,
    Shutdown,
}

/// Drives an [`AutoPlayController`] against a shared session on a tokio timer
pub struct AutoPlayRunner<R: Rng = StdRng> {
    session: SharedSession<R>,
    controller: Mutex<AutoPlayController>,
    signal_tx: watch::Sender<RunnerSignal>,
}

impl<R: Rng + Send + 'static> AutoPlayRunner<R> {
    pub fn new(session: SharedSession<R>) -> Self {
        let controller = AutoPlayController::new(&session.lock().config().auto_play);
        let (signal_tx, _) = watch::channel(RunnerSignal::Paused);
        Self {
            session,
            controller: Mutex::new(controller),
            signal_tx,
        }
    }

    /// Override the delay between spins
    pub fn with_delay(self, delay: Duration) -> Self {
        self.controller.lock().set_delay(delay);
        self
    }

    pub fn session(&self) -> &SharedSession<R> {
        &self.session
    }

    pub fn is_enabled(&self) -> bool {
        self.controller.lock().is_enabled()
    }

    /// Flip auto-play; returns the new state
    pub fn toggle(&self) -> bool {
        // flag and signal change together under the controller lock
        let enabled = {
            let mut controller = self.controller.lock();
            let enabled = controller.toggle();
            self.signal(if enabled {
                RunnerSignal::Running
            } else {
                RunnerSignal::Paused
            });
            enabled
        };
        self.session
            .lock()
            .push_event(GameEvent::AutoPlayToggled { enabled });
        enabled
    }

    /// End [`run`](Self::run)
    pub fn shutdown(&self) {
        self.controller.lock().stop();
        self.signal_tx.send_replace(RunnerSignal::Shutdown);
    }

    /// Shutdown is final; later signals are dropped
    fn signal(&self, next: RunnerSignal) {
        self.signal_tx.send_if_modified(|current| {
            if *current == RunnerSignal::Shutdown || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    /// Spin every `delay` while enabled; returns the number of spins played
    /// once [`shutdown`](Self::shutdown) is called.
    pub async fn run<F>(&self, mut on_tick: F) -> u64
    where
        F: FnMut(&AutoPlayTick),
    {
        let mut signal_rx = self.signal_tx.subscribe();
        let mut spins = 0u64;

        loop {
            let signal = *signal_rx.borrow_and_update();
            match signal {
                RunnerSignal::Shutdown => break,
                RunnerSignal::Paused => {
                    if signal_rx.changed().await.is_err() {
                        break;
                    }
                    continue;
                }
                RunnerSignal::Running => {}
            }

            let tick = {
                let mut session = self.session.lock();
                let tick = self.controller.lock().tick(&mut session);
                if matches!(tick, AutoPlayTick::Stopped(_)) {
                    session.push_event(GameEvent::AutoPlayToggled { enabled: false });
                }
                tick
            };
            if matches!(tick, AutoPlayTick::Stopped(_)) {
                // a toggle may already have re-enabled the controller
                let controller = self.controller.lock();
                if !controller.is_enabled() {
                    self.signal(RunnerSignal::Paused);
                }
            }
            on_tick(&tick);

            match tick {
                AutoPlayTick::Spun(_) => spins += 1,
                AutoPlayTick::Idle | AutoPlayTick::Stopped(_) => continue,
            }

            let delay = self.controller.lock().delay();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = signal_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        log::debug!("[AutoPlay] runner finished after {} spins", spins);
        spins
    }
}

/// Shared runner handle
pub type SharedRunner<R = StdRng> = Arc<AutoPlayRunner<R>>;
