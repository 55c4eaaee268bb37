//! Tokio runtime integration
//!
//! A viewport is not shareable: every mutation must happen on one logical
//! thread. [`spawn_viewport`] moves it into a task that owns it and serializes
//! commands and timer ticks through a single channel. [`TokioScheduler`] backs
//! the scheduler seam with `tokio::time::interval` tasks that post ticks back
//! to that channel.

use crate::animation::{Scheduler, TimerHandle, TimerSlot};
use crate::core::builder::ViewportBuilder;
use crate::core::viewport::{ViewState, Viewport};
use crate::input::NavCommand;
use crate::rendering::MapRenderer;
use crate::MapError;
use fxhash::FxHashMap;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Messages processed by the task owning a viewport
#[derive(Debug)]
pub enum Command {
    Nav(NavCommand),
    Tick(TimerHandle),
    Snapshot(oneshot::Sender<ViewState>),
    Shutdown,
}

/// Scheduler whose timers are tokio interval tasks
pub struct TokioScheduler {
    tx: mpsc::WeakUnboundedSender<Command>,
    tasks: FxHashMap<TimerHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Ticks are posted to `tx` without keeping the channel alive
    pub fn new(tx: &mpsc::UnboundedSender<Command>) -> Self {
        Self {
            tx: tx.downgrade(),
            tasks: FxHashMap::default(),
            next_id: 0,
        }
    }

    pub fn active_timers(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn set_interval(&mut self, slot: TimerSlot, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let tx = self.tx.clone();
        // tokio panics on a zero period
        let period = period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(tx) = tx.upgrade() else {
                    break;
                };
                if tx.send(Command::Tick(handle)).is_err() {
                    break;
                }
            }
        });

        log::trace!("{:?} timer {:?} every {:?}", slot, handle, period);
        self.tasks.insert(handle, task);
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("active", &self.tasks.len())
            .finish()
    }
}

/// Cloneable sender side of a spawned viewport
#[derive(Debug, Clone)]
pub struct ViewportHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl ViewportHandle {
    pub fn send(&self, command: NavCommand) -> crate::Result<()> {
        self.tx
            .send(Command::Nav(command))
            .map_err(|_| MapError::ViewportClosed.into())
    }

    /// Current view, after every command sent before this call was applied
    pub async fn snapshot(&self) -> crate::Result<ViewState> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot(reply))
            .map_err(|_| MapError::ViewportClosed)?;
        rx.await.map_err(|_| MapError::ViewportClosed.into())
    }

    /// Asks the owner to stop; pending commands before this one are still applied
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub type SpawnedViewport<R> = Viewport<R, TokioScheduler>;

/// Builds a viewport and moves it into a task that owns it.
///
/// Must be called from within a tokio runtime. The task ends on
/// [`ViewportHandle::shutdown`] or once every handle is dropped, stopping all
/// animations and returning the viewport.
pub fn spawn_viewport<R>(
    builder: ViewportBuilder,
    renderer: R,
) -> crate::Result<(ViewportHandle, JoinHandle<SpawnedViewport<R>>)>
where
    R: MapRenderer + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let viewport = builder.build(renderer, TokioScheduler::new(&tx))?;
    let task = tokio::spawn(run_viewport(viewport, rx));
    Ok((ViewportHandle { tx }, task))
}

async fn run_viewport<R: MapRenderer>(
    mut viewport: SpawnedViewport<R>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) -> SpawnedViewport<R> {
    log::debug!("viewport task started");
    while let Some(command) = rx.recv().await {
        match command {
            Command::Nav(nav) => viewport.handle(nav),
            Command::Tick(handle) => viewport.tick(handle),
            Command::Snapshot(reply) => {
                let _ = reply.send(viewport.state());
            }
            Command::Shutdown => break,
        }
    }
    viewport.stop_animations();
    log::debug!("viewport task stopped");
    viewport
}
