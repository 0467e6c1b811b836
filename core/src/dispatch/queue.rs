//! Producer/consumer command channel
//!
//! Any thread may hold a [`CommandSender`]; exactly one thread owns the
//! matching [`CommandReceiver`]. Sends never block and the channel is
//! unbounded (commands are tiny and arrive at slider-drag rates).

use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::command::{Envelope, PendingCommand};
use crate::clock::SharedClock;

/// A message on the dispatcher channel.
///
/// `C` carries host-specific control requests (shutdown, snapshots) so they
/// are ordered with respect to indicator commands.
#[derive(Debug)]
pub enum Message<C> {
    Post(Envelope),
    Control(C),
}

/// Result of a non-blocking receive
#[derive(Debug)]
pub enum Received<C> {
    Message(Message<C>),
    Empty,
    /// Every sender is gone
    Closed,
}

/// Clonable producer handle.
pub struct CommandSender<C> {
    tx: UnboundedSender<Message<C>>,
    clock: SharedClock,
}

impl<C> Clone for CommandSender<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<C> CommandSender<C> {
    /// Enqueue `command` for the dispatcher thread.
    ///
    /// Returns `false` if the dispatcher has shut down.
    pub fn post(&self, command: PendingCommand) -> bool {
        let envelope = Envelope::immediate(command, self.clock.now());
        self.tx.send(Message::Post(envelope)).is_ok()
    }

    /// Enqueue `command` to run no earlier than `delay` from now.
    pub fn post_delayed(&self, command: PendingCommand, delay: Duration) -> bool {
        let envelope = Envelope::delayed(command, self.clock.now(), delay);
        self.tx.send(Message::Post(envelope)).is_ok()
    }

    /// Enqueue a host control request behind every command posted so far.
    pub fn control(&self, request: C) -> bool {
        self.tx.send(Message::Control(request)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}

/// Single-consumer end of the command channel.
pub struct CommandReceiver<C> {
    rx: UnboundedReceiver<Message<C>>,
}

impl<C> CommandReceiver<C> {
    pub fn try_recv(&mut self) -> Received<C> {
        match self.rx.try_recv() {
            Ok(message) => Received::Message(message),
            Err(TryRecvError::Empty) => Received::Empty,
            Err(TryRecvError::Disconnected) => Received::Closed,
        }
    }

    pub async fn recv(&mut self) -> Option<Message<C>> {
        self.rx.recv().await
    }
}

/// Create a command channel whose envelopes are stamped by `clock`.
pub fn channel<C>(clock: SharedClock) -> (CommandSender<C>, CommandReceiver<C>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx, clock }, CommandReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use edgeline_types::Edge;

    fn expect_post<C>(received: Received<C>) -> Envelope {
        match received {
            Received::Message(Message::Post(env)) => env,
            _ => panic!("expected a posted command"),
        }
    }

    #[test]
    fn posts_are_stamped_and_ordered() {
        let clock = ManualClock::new();
        let (tx, mut rx) = channel::<()>(clock.shared());

        assert!(tx.post(PendingCommand::set_width(Edge::Left, 10)));
        clock.advance_ms(5);
        assert!(tx.post_delayed(PendingCommand::hide(Edge::Left), Duration::from_millis(700)));

        let first = expect_post(rx.try_recv());
        assert_eq!(first.posted_at, Duration::ZERO);
        assert_eq!(first.deadline, None);

        let second = expect_post(rx.try_recv());
        assert_eq!(second.posted_at, Duration::from_millis(5));
        assert_eq!(second.deadline, Some(Duration::from_millis(705)));

        assert!(matches!(rx.try_recv(), Received::Empty));
    }

    #[test]
    fn posts_from_other_threads_arrive() {
        let clock = ManualClock::new();
        let (tx, mut rx) = channel::<()>(clock.shared());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let tx = tx.clone();
                std::thread::spawn(move || tx.post(PendingCommand::set_width(Edge::Right, i)))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let mut count = 0;
        while let Received::Message(_) = rx.try_recv() {
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn dropping_receiver_closes_channel() {
        let (tx, rx) = channel::<()>(ManualClock::new().shared());
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.post(PendingCommand::hide(Edge::Left)));
    }

    #[test]
    fn dropping_senders_reports_closed() {
        let (tx, mut rx) = channel::<()>(ManualClock::new().shared());
        tx.control(());
        drop(tx);
        assert!(matches!(rx.try_recv(), Received::Message(Message::Control(()))));
        assert!(matches!(rx.try_recv(), Received::Closed));
    }

    #[tokio::test]
    async fn recv_waits_for_post() {
        let clock = ManualClock::new();
        let (tx, mut rx) = channel::<()>(clock.shared());

        let producer = tokio::spawn(async move {
            tokio::task::yield_now().await;
            tx.post(PendingCommand::set_width(Edge::Left, 24))
        });

        match rx.recv().await {
            Some(Message::Post(env)) => {
                assert_eq!(env.command, PendingCommand::set_width(Edge::Left, 24));
            }
            _ => panic!("expected a posted command"),
        }
        assert!(producer.await.unwrap());
        assert!(rx.recv().await.is_none());
    }
}
