//! Cooperative timer scheduler (frame clock driven)
//!
//! Заменяет engine timer handles: таймер = данные, не closure.
//! - `schedule(now, delay, period, action)` → `TimerHandle`
//! - владелец хранит handle и делает cancel перед заменой
//! - `pop_due(now)` выдаёт сработавшие таймеры по одному в порядке (due, insertion)
//! - repeating таймер перевзводится на `due + period`
//!
//! Никаких потоков: всё исполняется на том же логическом потоке, что и остальная
//! симуляция, внутри одного `advance` владельца.

/// Cancellation token returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledTimer<A> {
    handle: TimerHandle,
    due: f32,
    period: Option<f32>,
    action: A,
}

/// A timer that came due during [`Scheduler::pop_due`].
#[derive(Debug, Clone, PartialEq)]
pub struct DueTimer<A> {
    pub handle: TimerHandle,
    /// Scheduled fire time (may be earlier than the `now` passed to `pop_due`)
    pub due: f32,
    pub action: A,
}

#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    timers: Vec<ScheduledTimer<A>>,
    next_id: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` at `now + delay`.
    ///
    /// `period = Some(p)` with `p > 0` makes the timer repeating; a non-positive
    /// period degrades to a one-shot timer (zero period would never let time advance).
    pub fn schedule(&mut self, now: f32, delay: f32, period: Option<f32>, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        self.timers.push(ScheduledTimer {
            handle,
            due: now + delay.max(0.0),
            period: period.filter(|p| *p > 0.0),
            action,
        });

        handle
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.handle != handle);
        self.timers.len() != before
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|timer| timer.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<f32> {
        self.timers.iter().map(|timer| timer.due).min_by(f32::total_cmp)
    }

    /// Pops the earliest timer with `due <= now`.
    ///
    /// Call in a loop: callbacks dispatched between pops may schedule or cancel
    /// timers, and those changes are observed by the next pop.
    pub fn pop_due(&mut self, now: f32) -> Option<DueTimer<A>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)))
            .map(|(index, _)| index)?;

        let timer = &mut self.timers[index];
        let fired = DueTimer {
            handle: timer.handle,
            due: timer.due,
            action: timer.action.clone(),
        };

        // Period ниже точности f32 на этом due не двигает таймер: снимаем его
        match timer.period.map(|period| timer.due + period) {
            Some(next) if next > timer.due => timer.due = next,
            _ => {
                self.timers.remove(index);
            }
        }

        Some(fired)
    }
}
