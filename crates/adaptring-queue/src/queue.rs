//! The coordinator task that owns the ring buffer.

use crate::controller::{Command, CommandRequest, StatsRequest};
#[cfg(debug_assertions)]
use crate::invariants::{
    debug_assert_drained_before_close, debug_assert_forward_transition,
    debug_assert_offer_from_ring,
};
use crate::receiver::Demand;
use crate::sender::Submission;
use crate::state::{QueueState, QueueStats};
use adaptring_rs::RingBuffer;
use std::collections::VecDeque;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

// =============================================================================
// COORDINATION PROTOCOL
// =============================================================================
//
// One task owns the `RingBuffer` outright; nothing else ever touches it, so no
// lock guards it. Each loop iteration waits on whichever of four branches is
// ready first:
//
//   (a) input    - receive a submission, enqueue it, then acknowledge it so
//                  the producer's send completes only once the item is in
//                  the ring; or observe input closure
//   (b) demands  - park a consumer's request, count a confirmed delivery, or
//                  put a withdrawn item back at the front of the ring
//   (c) stats    - answer a snapshot request
//   (d) commands - apply set_min / set_max / grow / shrink / clear
//
// After every branch, parked requests are served from the front of the ring.
// An item leaves the ring only when a consumer is known to be waiting for it.
// Until then it stays visible to stats and subject to clear/resize.
//
// ## Cancellation
//
// Abandoned work is skipped, never half-applied:
//
// - a submission or command whose reply receiver is gone is discarded
// - a parked request whose receiver is gone is passed over
// - an item delivered to a request that was withdrawn comes back as
//   `Demand::Return` (or as the `Err` of the failed send) and is restored
//
// A delivery counts as in flight until its receiver confirms it
// (`Demand::Received`) or returns it.
//
// ## Termination
//
// Input closure disables (a) for good. The other branches keep running until
// the ring is empty and no delivery is in flight; then the task returns,
// dropping the parked requests (consumers see `None`) and both administrative
// receivers (controller calls fail with `QueueClosed`).
//
// If every receiver is dropped, nothing can be delivered any more. The task
// keeps accepting input and answering the controller until the input closes,
// then discards what is left.
//
// =============================================================================

/// Background coordinator for one adaptive queue.
pub(crate) struct AdaptiveQueue<T> {
    ring: RingBuffer<T>,
    input: mpsc::Receiver<Submission<T>>,
    demands: mpsc::UnboundedReceiver<Demand<T>>,
    stats: mpsc::Receiver<StatsRequest>,
    commands: mpsc::Receiver<CommandRequest>,
    /// Consumers waiting for an item, oldest first.
    waiting: VecDeque<oneshot::Sender<T>>,
    /// Deliveries not yet confirmed or returned by their receiver.
    in_flight: usize,
    state: QueueState,
}

impl<T: Send + 'static> AdaptiveQueue<T> {
    pub(crate) fn new(
        ring: RingBuffer<T>,
        input: mpsc::Receiver<Submission<T>>,
        demands: mpsc::UnboundedReceiver<Demand<T>>,
        stats: mpsc::Receiver<StatsRequest>,
        commands: mpsc::Receiver<CommandRequest>,
    ) -> Self {
        Self {
            ring,
            input,
            demands,
            stats,
            commands,
            waiting: VecDeque::new(),
            in_flight: 0,
            state: QueueState::Open,
        }
    }

    /// Runs until the input has closed and every buffered item is delivered.
    pub(crate) async fn run(mut self) {
        let mut input_open = true;
        let mut consumer_gone = false;
        let mut stats_open = true;
        let mut commands_open = true;

        debug!(
            min = self.ring.min(),
            max = self.ring.max(),
            "adaptive queue started"
        );

        loop {
            if !input_open && (consumer_gone || (self.ring.is_empty() && self.in_flight == 0)) {
                break;
            }

            tokio::select! {
                submission = self.input.recv(), if input_open => match submission {
                    Some(submission) => self.accept(submission),
                    None => {
                        input_open = false;
                        if self.ring.is_empty() && self.in_flight == 0 {
                            self.transition(QueueState::Closed);
                        } else {
                            self.transition(QueueState::Draining);
                        }
                    }
                },
                demand = self.demands.recv(), if !consumer_gone => match demand {
                    Some(demand) => self.handle_demand(demand),
                    None => {
                        consumer_gone = true;
                        self.in_flight = 0;
                        debug!(buffered = self.ring.len(), "all queue receivers dropped");
                    }
                },
                request = self.stats.recv(), if stats_open => match request {
                    Some(reply) => {
                        let snapshot = QueueStats {
                            ring: self.ring.stats(),
                            state: self.state,
                        };
                        if reply.send(snapshot).is_err() {
                            trace!("stats request abandoned by caller");
                        }
                    }
                    None => stats_open = false,
                },
                request = self.commands.recv(), if commands_open => match request {
                    Some(request) => self.apply(request),
                    None => {
                        commands_open = false;
                        trace!("command path closed");
                    }
                },
                else => break,
            }

            self.serve();
        }

        #[cfg(debug_assertions)]
        debug_assert_drained_before_close!(
            input_open,
            self.ring.len() + self.in_flight,
            consumer_gone
        );

        if self.state != QueueState::Closed {
            self.transition(QueueState::Closed);
        }

        let stats = self.ring.stats();
        debug!(
            enqueued = stats.enqueued,
            dequeued = stats.dequeued,
            dropped = stats.dropped,
            discarded = stats.len,
            "adaptive queue stopped"
        );
    }

    /// Enqueues a submitted item and releases its producer.
    fn accept(&mut self, submission: Submission<T>) {
        let Submission { item, ack } = submission;

        match ack {
            Some(ack) if ack.is_closed() => {
                trace!("send abandoned by producer, item discarded");
            }
            Some(ack) => {
                self.ring.enqueue(item);
                if ack.send(()).is_err() {
                    trace!("producer dropped while its item was being enqueued");
                }
            }
            None => self.ring.enqueue(item),
        }
    }

    fn handle_demand(&mut self, demand: Demand<T>) {
        match demand {
            Demand::Take(reply) => {
                // Withdrawn requests pile up while the ring is empty; shed them here.
                self.waiting.retain(|waiter| !waiter.is_closed());
                self.waiting.push_back(reply);
            }
            Demand::Received => {
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            Demand::Return(item) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.ring.restore(item);
                trace!(buffered = self.ring.len(), "withdrawn item restored to front");
            }
        }
    }

    /// Hands front items to waiting consumers while both are available.
    fn serve(&mut self) {
        while !self.ring.is_empty() {
            let Some(reply) = self.waiting.pop_front() else {
                return;
            };

            // A request whose receiver is gone was never taken; the item stays.
            if reply.is_closed() {
                trace!("item request abandoned by receiver");
                continue;
            }

            let item = self.ring.dequeue();
            #[cfg(debug_assertions)]
            debug_assert_offer_from_ring!(item.is_some());

            let Some(item) = item else {
                return;
            };
            match reply.send(item) {
                Ok(()) => self.in_flight += 1,
                Err(item) => {
                    // Withdrawn between the check and the send.
                    self.ring.restore(item);
                    trace!("receiver withdrew while an item was in flight");
                }
            }
        }
    }

    fn apply(&mut self, request: CommandRequest) {
        let CommandRequest { command, reply } = request;

        if reply.is_closed() {
            trace!(?command, "command abandoned by caller, skipped");
            return;
        }

        let removed = match command {
            Command::SetMin(min) => {
                self.ring.set_min(min);
                0
            }
            Command::SetMax(max) => {
                self.ring.set_max(max);
                0
            }
            Command::Grow(n) => {
                self.ring.grow(n);
                0
            }
            Command::Shrink(n) => {
                self.ring.shrink(n);
                0
            }
            Command::Clear => self.ring.clear(),
        };

        trace!(
            ?command,
            len = self.ring.len(),
            cap = self.ring.capacity(),
            "command applied"
        );

        if reply.send(removed).is_err() {
            trace!(?command, "command reply dropped by caller");
        }
    }

    fn transition(&mut self, to: QueueState) {
        #[cfg(debug_assertions)]
        debug_assert_forward_transition!(self.state, to);

        debug!(from = %self.state, to = %to, buffered = self.ring.len(), "queue state changed");
        self.state = to;
    }
}
