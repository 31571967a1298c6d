//! Background input pump feeding the ordered event queue.
//!
//! A Tokio task reads `crossterm::EventStream`, translates key presses into
//! the virtual-key model and injects them through an [`EventInjector`]. The
//! line editor itself stays synchronous and blocks on the queue. While the
//! shared [`InputFlags`] are paused (a child process owns the terminal) the
//! stream is dropped so nothing competes with the child for stdin.
//!
//! Interrupt signals never touch editor state: the forwarder turns each one
//! into a synthetic Ctrl-C key event on the same queue.

mod key_token;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use core_events::{Event, EventInjector, InputFlags, KeyEvent};
use crossterm::event::{Event as CEvent, EventStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, trace};

/// How often a paused pump re-checks whether it may read again.
const PAUSE_POLL: Duration = Duration::from_millis(25);

#[derive(Clone, Debug)]
pub struct InputShutdown {
    notify: Arc<Notify>,
}

impl InputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    Running,
    ShutdownSignal,
    QueueClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Running => "running",
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::QueueClosed => "queue_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct InputPump<S, F> {
    make_stream: F,
    injector: EventInjector,
    flags: Arc<InputFlags>,
    shutdown: Arc<Notify>,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
    _stream: std::marker::PhantomData<fn() -> S>,
}

impl<S, F> InputPump<S, F>
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
    F: FnMut() -> S,
{
    async fn run(mut self) {
        info!(target: "input", "pump_started");
        let mut stream: Option<S> = None;
        let mut tick = tokio::time::interval(PAUSE_POLL);
        self.exit_reason = ExitReason::StreamEnded;
        loop {
            if self.flags.is_paused() {
                if stream.take().is_some() {
                    debug!(target: "input", "pump_paused");
                }
                tokio::select! {
                    biased;
                    _ = self.shutdown.notified() => {
                        self.exit_reason = ExitReason::ShutdownSignal;
                        break;
                    }
                    _ = tick.tick() => continue,
                }
            }
            if stream.is_none() {
                debug!(target: "input", "pump_reading");
                stream = Some((self.make_stream)());
            }
            let Some(active) = stream.as_mut() else {
                continue;
            };
            let next = tokio::select! {
                biased;
                _ = self.shutdown.notified() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                item = active.next() => item,
                _ = tick.tick() => continue,
            };
            let Some(result) = next else {
                break;
            };
            match result {
                Ok(ev) => {
                    if !self.forward(ev) {
                        self.exit_reason = ExitReason::QueueClosed;
                        break;
                    }
                }
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    break;
                }
            }
        }
        info!(
            target: "input",
            reason = self.exit_reason.as_str(),
            error = ?self.stream_error,
            "pump_stopped"
        );
        if !matches!(self.exit_reason, ExitReason::ShutdownSignal | ExitReason::QueueClosed) {
            // Let the editor observe the end of input instead of blocking forever.
            self.injector.inject(Event::Shutdown);
        }
    }

    /// Translate and enqueue one terminal event. Returns `false` once the
    /// consumer has gone away.
    fn forward(&self, ev: CEvent) -> bool {
        match ev {
            CEvent::Key(key) => match key_token::map_key_event(&key) {
                Some(k) => {
                    trace!(target: "input", vk = k.virtual_key, "key");
                    self.injector.inject_key(k)
                }
                None => true,
            },
            CEvent::Resize(w, h) => {
                trace!(target: "input", w, h, "resize");
                self.injector.inject(Event::Resize(w, h))
            }
            CEvent::FocusGained => {
                self.flags.set_focused(true);
                true
            }
            CEvent::FocusLost => {
                self.flags.set_focused(false);
                true
            }
            CEvent::Paste(text) => {
                trace!(target: "input", len = text.len(), "paste");
                text.chars()
                    .filter(|c| !c.is_control())
                    .all(|c| self.injector.inject_key(KeyEvent::char(c)))
            }
            CEvent::Mouse(_) => true,
        }
    }
}

/// Spawn the pump over `crossterm::EventStream`. Must be called from within
/// a Tokio runtime.
pub fn spawn_input_pump(
    injector: EventInjector,
    flags: Arc<InputFlags>,
) -> (JoinHandle<()>, InputShutdown) {
    spawn_input_pump_with(EventStream::new, injector, flags)
}

/// Spawn the pump over an arbitrary event stream. `make_stream` is invoked
/// again each time reading resumes after a pause.
pub fn spawn_input_pump_with<S, F>(
    make_stream: F,
    injector: EventInjector,
    flags: Arc<InputFlags>,
) -> (JoinHandle<()>, InputShutdown)
where
    S: Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
    F: FnMut() -> S + Send + 'static,
{
    let notify = Arc::new(Notify::new());
    let pump = InputPump {
        make_stream,
        injector,
        flags,
        shutdown: notify.clone(),
        exit_reason: ExitReason::Running,
        stream_error: None,
        _stream: std::marker::PhantomData,
    };
    let handle = tokio::spawn(async move {
        let span = tracing::debug_span!(target: "input", "input_pump");
        let _enter = span.enter();
        pump.run().await;
    });
    (handle, InputShutdown { notify })
}

/// Turn interrupt signals into synthetic Ctrl-C key events.
///
/// While a child process owns the terminal it receives the interrupt itself,
/// so nothing is injected then.
pub fn spawn_interrupt_forwarder(
    injector: EventInjector,
    flags: Arc<InputFlags>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                debug!(target: "input", ?e, "interrupt_listener_failed");
                return;
            }
            if flags.is_paused() {
                trace!(target: "input", "interrupt_for_child");
                continue;
            }
            debug!(target: "input", "interrupt_forwarded");
            if !injector.inject_key(KeyEvent::interrupt()) {
                return;
            }
        }
    })
}
