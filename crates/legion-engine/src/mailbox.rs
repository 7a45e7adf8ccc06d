//! Single-slot command hand-off between producers and the control loop.
//!
//! Any thread may post; the control loop takes at most one command at the
//! start of each tick. A command posted before the previous one was taken
//! replaces it, so the loop always sees the most recent request.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::queue::ArrayQueue;
use legion_gait::MotionCommand;

/// Lock-free latest-wins mailbox.
///
/// # RT Safety
///
/// [`CommandMailbox::take`] is a single lock-free pop and never allocates.
///
/// # Examples
///
/// ```
/// use legion_engine::CommandMailbox;
/// use legion_gait::{CommandKind, MotionCommand};
///
/// let mailbox = CommandMailbox::new();
/// mailbox.post(MotionCommand::new(CommandKind::Forward));
/// mailbox.post(MotionCommand::new(CommandKind::Sit));
///
/// assert_eq!(mailbox.take().map(|c| c.kind), Some(CommandKind::Sit));
/// assert_eq!(mailbox.take(), None);
/// assert_eq!(mailbox.stats().superseded, 1);
/// ```
#[derive(Debug)]
pub struct CommandMailbox {
    slot: ArrayQueue<MotionCommand>,
    posted: AtomicU64,
    superseded: AtomicU64,
    taken: AtomicU64,
}

/// Mailbox counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MailboxStats {
    /// Commands posted
    pub posted: u64,
    /// Commands replaced before the loop took them
    pub superseded: u64,
    /// Commands delivered to the loop
    pub taken: u64,
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandMailbox {
    /// Empty mailbox.
    pub fn new() -> Self {
        Self {
            slot: ArrayQueue::new(1),
            posted: AtomicU64::new(0),
            superseded: AtomicU64::new(0),
            taken: AtomicU64::new(0),
        }
    }

    /// Leave a command for the next tick.
    ///
    /// Returns `true` if an untaken command was displaced.
    pub fn post(&self, command: MotionCommand) -> bool {
        self.posted.fetch_add(1, Ordering::Relaxed);
        let displaced = self.slot.force_push(command).is_some();
        if displaced {
            self.superseded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(kind = %command.kind, "unconsumed command superseded");
        }
        displaced
    }

    /// Remove the waiting command, if any.
    #[inline]
    pub fn take(&self) -> Option<MotionCommand> {
        let command = self.slot.pop();
        if command.is_some() {
            self.taken.fetch_add(1, Ordering::Relaxed);
        }
        command
    }

    /// Whether no command is waiting.
    pub fn is_empty(&self) -> bool {
        self.slot.is_empty()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> MailboxStats {
        MailboxStats {
            posted: self.posted.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            taken: self.taken.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use legion_gait::CommandKind;

    use super::*;

    #[test]
    fn test_empty_take_is_none() {
        let mailbox = CommandMailbox::new();
        assert!(mailbox.is_empty());
        assert_eq!(mailbox.take(), None);
        assert_eq!(mailbox.stats(), MailboxStats::default());
    }

    #[test]
    fn test_post_then_take_counts() {
        let mailbox = CommandMailbox::new();
        assert!(!mailbox.post(MotionCommand::new(CommandKind::TurnLeft).with_steps(2)));
        let command = mailbox.take();
        assert_eq!(command.and_then(|c| c.steps), Some(2));
        let stats = mailbox.stats();
        assert_eq!((stats.posted, stats.superseded, stats.taken), (1, 0, 1));
    }

    #[test]
    fn test_concurrent_producers_leave_one_command() {
        let mailbox = Arc::new(CommandMailbox::new());
        let producers: Vec<_> = (0..4)
            .map(|_| {
                let mailbox = Arc::clone(&mailbox);
                thread::spawn(move || {
                    for _ in 0..250 {
                        mailbox.post(MotionCommand::new(CommandKind::Forward));
                    }
                })
            })
            .collect();
        for producer in producers {
            assert!(producer.join().is_ok());
        }

        assert!(mailbox.take().is_some());
        assert!(mailbox.take().is_none());
        let stats = mailbox.stats();
        assert_eq!(stats.posted, 1_000);
        assert_eq!(stats.superseded, 999);
    }
}
