//! In-flight computation records for single-flight de-duplication.

use std::time::Duration;

use num_bigint::BigInt;
use parking_lot::{Condvar, Mutex};
use seqcalc_core::ctl::ComputeCtl;
use seqcalc_core::solver::SeqError;

/// Wake waiters at least this often so cancellation and deadlines are
/// noticed promptly even without a publish.
const WAIT_SLICE: Duration = Duration::from_millis(25);

/// One in-flight computation: a result slot plus a broadcast.
///
/// The leader publishes exactly once; every joiner observes the same
/// result. A joiner whose own request is cancelled or past its deadline
/// abandons the wait without touching the flight — the computation
/// keeps going for the others.
pub(crate) struct Flight {
    slot: Mutex<Option<Result<BigInt, SeqError>>>,
    done: Condvar,
}

impl Flight {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    /// Publish the leader's result and release all waiters.
    pub(crate) fn publish(&self, result: Result<BigInt, SeqError>) {
        let mut slot = self.slot.lock();
        debug_assert!(slot.is_none(), "a flight publishes exactly once");
        *slot = Some(result);
        self.done.notify_all();
    }

    /// Block until the leader publishes, or this waiter's control gives
    /// up first.
    pub(crate) fn wait(&self, ctl: &ComputeCtl) -> Result<BigInt, SeqError> {
        let mut slot = self.slot.lock();
        loop {
            if let Some(result) = slot.as_ref() {
                return result.clone();
            }
            ctl.check()?;
            let slice = ctl.remaining().map_or(WAIT_SLICE, |r| r.min(WAIT_SLICE));
            self.done.wait_for(&mut slot, slice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn publish_before_wait() {
        let flight = Flight::new();
        flight.publish(Ok(BigInt::from(55)));
        let got = flight.wait(&ComputeCtl::unbounded()).unwrap();
        assert_eq!(got, BigInt::from(55));
    }

    #[test]
    fn wait_observes_publish_from_other_thread() {
        let flight = Arc::new(Flight::new());
        let publisher = Arc::clone(&flight);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            publisher.publish(Ok(BigInt::from(89)));
        });
        let got = flight.wait(&ComputeCtl::unbounded()).unwrap();
        assert_eq!(got, BigInt::from(89));
        handle.join().unwrap();
    }

    #[test]
    fn failures_fan_out() {
        let flight = Flight::new();
        flight.publish(Err(SeqError::Computation("boom".into())));
        assert!(matches!(
            flight.wait(&ComputeCtl::unbounded()),
            Err(SeqError::Computation(_))
        ));
    }

    #[test]
    fn cancelled_waiter_gives_up() {
        let flight = Flight::new();
        let ctl = ComputeCtl::unbounded();
        ctl.token().cancel();
        assert!(matches!(flight.wait(&ctl), Err(SeqError::Cancelled)));
    }

    #[test]
    fn waiter_deadline_expires() {
        let flight = Flight::new();
        let ctl = ComputeCtl::with_timeout(Duration::from_millis(5));
        assert!(matches!(flight.wait(&ctl), Err(SeqError::Timeout(_))));
    }
}
