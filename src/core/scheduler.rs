// Cooperative timer scheduler
// Fires named cadences against an owned state in deadline order, one at a time

use tracing::debug;

type Handler<S> = Box<dyn FnMut(&mut S, i64) + Send>;

struct Cadence<S> {
    name: &'static str,
    period_ms: i64,
    next_due: i64,
    handler: Handler<S>,
}

/// Deterministic replacement for wall-clock intervals. Time only moves when
/// the caller advances it, so tests inject ticks instead of sleeping.
pub struct Scheduler<S> {
    cadences: Vec<Cadence<S>>,
    now: i64,
    fired: u64,
}

impl<S> Scheduler<S> {
    /// Start the clock at `start_ms`; the first firing of every cadence is
    /// one period later
    pub fn new(start_ms: i64) -> Self {
        Self {
            cadences: Vec::new(),
            now: start_ms,
            fired: 0,
        }
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    /// Total handler invocations so far
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn cadence_names(&self) -> Vec<&'static str> {
        self.cadences.iter().map(|c| c.name).collect()
    }

    /// Register a handler that runs every `period_ms`
    pub fn on_tick<F>(&mut self, name: &'static str, period_ms: u64, handler: F)
    where
        F: FnMut(&mut S, i64) + Send + 'static,
    {
        let period_ms = period_ms.max(1) as i64;
        self.cadences.push(Cadence {
            name,
            period_ms,
            next_due: self.now + period_ms,
            handler: Box::new(handler),
        });
    }

    /// Run every handler whose deadline is at or before `target_ms`, earliest
    /// first, ties broken by registration order. Each handler sees the clock
    /// at its own deadline and completes before the next one starts.
    pub fn advance_to(&mut self, state: &mut S, target_ms: i64) -> usize {
        let mut count = 0;

        loop {
            let next = self
                .cadences
                .iter()
                .enumerate()
                .filter(|(_, c)| c.next_due <= target_ms)
                .min_by_key(|(i, c)| (c.next_due, *i))
                .map(|(i, _)| i);

            let Some(index) = next else { break };

            let cadence = &mut self.cadences[index];
            let due = cadence.next_due;
            cadence.next_due += cadence.period_ms;
            self.now = due;
            (cadence.handler)(state, due);
            count += 1;
        }

        if target_ms > self.now {
            self.now = target_ms;
        }
        self.fired += count as u64;
        if count > 0 {
            debug!("⏱️  Scheduler fired {} handlers up to t={}", count, self.now);
        }
        count
    }

    /// Advance the clock by `elapsed_ms`
    pub fn advance(&mut self, state: &mut S, elapsed_ms: i64) -> usize {
        let target = self.now + elapsed_ms.max(0);
        self.advance_to(state, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<(&'static str, i64)>);

    #[test]
    fn test_fires_in_deadline_order() {
        let mut scheduler: Scheduler<Log> = Scheduler::new(0);
        scheduler.on_tick("slow", 300, |log, now| log.0.push(("slow", now)));
        scheduler.on_tick("fast", 100, |log, now| log.0.push(("fast", now)));

        let mut log = Log::default();
        let fired = scheduler.advance(&mut log, 300);

        assert_eq!(fired, 4);
        assert_eq!(
            log.0,
            vec![("fast", 100), ("fast", 200), ("slow", 300), ("fast", 300)]
        );
        assert_eq!(scheduler.now(), 300);
    }

    #[test]
    fn test_nothing_due() {
        let mut scheduler: Scheduler<Log> = Scheduler::new(1_000);
        scheduler.on_tick("price", 1_000, |log, now| log.0.push(("price", now)));
        let mut log = Log::default();
        assert_eq!(scheduler.advance(&mut log, 999), 0);
        assert_eq!(scheduler.advance(&mut log, 1), 1);
        assert_eq!(log.0, vec![("price", 2_000)]);
    }

    #[test]
    fn test_long_jump_catches_up() {
        let mut scheduler: Scheduler<u32> = Scheduler::new(0);
        scheduler.on_tick("income", 100, |count, _| *count += 1);
        let mut count = 0;
        scheduler.advance(&mut count, 10_000);
        assert_eq!(count, 100);
        assert_eq!(scheduler.fired(), 100);
    }
}
