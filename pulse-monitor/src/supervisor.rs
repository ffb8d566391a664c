//! Poll supervision
//!
//! The supervisor owns the registry of active poll tasks and is the only
//! place that mutates it: commands and task-completion notices are both
//! consumed by its sequential `select!` loop, so the registry needs no
//! locking. One full-poll slot is tracked at a time; status polls are
//! registered per instance id.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::events::{EventSender, PollCommand};
use crate::poller::{InstancePoller, StatusPoller};
use pulse_client::InstanceApi;
use pulse_core::domain::instance::{InstanceDetails, InstanceId};

/// Cancellation capability for one running poll task
///
/// Created at spawn, removed from the registry when the task terminates.
/// The epoch distinguishes a replacement task from the one it replaced, so
/// a stale completion notice never evicts a live handle.
struct PollHandle {
    epoch: u64,
    token: CancellationToken,
    #[allow(dead_code)]
    task: JoinHandle<()>,
}

impl PollHandle {
    fn cancel(&self) {
        self.token.cancel();
    }
}

/// Completion notice sent by a poll task as it exits
enum PollDone {
    Full { id: InstanceId, epoch: u64 },
    Status { id: InstanceId, epoch: u64 },
}

/// Manages the set of active poll tasks
pub struct PollSupervisor {
    api: Arc<dyn InstanceApi>,
    events: EventSender,
    interval: std::time::Duration,
    commands: mpsc::UnboundedReceiver<PollCommand>,
    done_tx: mpsc::UnboundedSender<PollDone>,
    done_rx: mpsc::UnboundedReceiver<PollDone>,
    next_epoch: u64,
    /// The single tracked full poll, if one is live
    full_poll: Option<(InstanceId, PollHandle)>,
    /// Active status polls keyed by instance id
    status_polls: HashMap<InstanceId, PollHandle>,
}

impl PollSupervisor {
    /// Creates a supervisor and the command handle used to drive it
    pub fn new(
        api: Arc<dyn InstanceApi>,
        events: EventSender,
        interval: std::time::Duration,
    ) -> (Self, mpsc::UnboundedSender<PollCommand>) {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        let supervisor = Self {
            api,
            events,
            interval,
            commands,
            done_tx,
            done_rx,
            next_epoch: 0,
            full_poll: None,
            status_polls: HashMap::new(),
        };

        (supervisor, command_tx)
    }

    /// Runs the supervision loop until the command channel closes.
    ///
    /// On shutdown every live poll task is cancelled; the tasks wind down
    /// cooperatively at their next suspension point.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(done) = self.done_rx.recv() => self.reap(done),
            }
        }

        info!("Command channel closed, cancelling all active polls");
        if let Some((_, handle)) = &self.full_poll {
            handle.cancel();
        }
        for handle in self.status_polls.values() {
            handle.cancel();
        }
    }

    fn handle_command(&mut self, cmd: PollCommand) {
        match cmd {
            PollCommand::StartFilePoll(instance) => self.start_file_poll(instance),
            PollCommand::StartStatusPoll(batch) => {
                for instance in batch {
                    self.start_status_poll(instance);
                }
            }
            PollCommand::StopFilePoll => {
                match &self.full_poll {
                    Some((id, handle)) => {
                        debug!("Stopping full poll for instance {}", id);
                        handle.cancel();
                    }
                    None => debug!("No full poll to stop"),
                }
            }
            PollCommand::StopStatusPoll(id) => {
                match self.status_polls.get(&id) {
                    Some(handle) => {
                        debug!("Stopping status poll for instance {}", id);
                        handle.cancel();
                    }
                    None => debug!("No active status poll for instance {}", id),
                }
            }
        }
    }

    fn start_file_poll(&mut self, instance: InstanceDetails) {
        // One tracked full poll at a time: a restart replaces the old task
        if let Some((old_id, handle)) = self.full_poll.take() {
            debug!("Replacing tracked full poll for instance {}", old_id);
            handle.cancel();
        }

        let id = instance.id;
        let epoch = self.bump_epoch();
        let token = CancellationToken::new();
        let poller = InstancePoller::new(Arc::clone(&self.api), self.events.clone(), self.interval);
        let done = self.done_tx.clone();

        info!("Starting full poll for instance {}", id);

        let task = {
            let token = token.clone();
            tokio::spawn(async move {
                poller.run(instance, token).await;
                let _ = done.send(PollDone::Full { id, epoch });
            })
        };

        self.full_poll = Some((id, PollHandle { epoch, token, task }));
    }

    fn start_status_poll(&mut self, instance: InstanceDetails) {
        let id = instance.id;
        if let Some(handle) = self.status_polls.remove(&id) {
            debug!("Replacing status poll for instance {}", id);
            handle.cancel();
        }

        let epoch = self.bump_epoch();
        let token = CancellationToken::new();
        let poller = StatusPoller::new(Arc::clone(&self.api), self.events.clone(), self.interval);
        let done = self.done_tx.clone();

        info!("Starting status poll for instance {}", id);

        let task = {
            let token = token.clone();
            tokio::spawn(async move {
                poller.run(instance, token).await;
                let _ = done.send(PollDone::Status { id, epoch });
            })
        };

        self.status_polls
            .insert(id, PollHandle { epoch, token, task });
    }

    /// Removes the registry entry of a task that has terminated
    fn reap(&mut self, done: PollDone) {
        match done {
            PollDone::Full { id, epoch } => {
                if matches!(&self.full_poll, Some((_, handle)) if handle.epoch == epoch) {
                    debug!("Full poll for instance {} terminated", id);
                    self.full_poll = None;
                }
            }
            PollDone::Status { id, epoch } => {
                if matches!(self.status_polls.get(&id), Some(handle) if handle.epoch == epoch) {
                    debug!("Status poll for instance {} terminated", id);
                    self.status_polls.remove(&id);
                }
            }
        }
    }

    fn bump_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }
}
