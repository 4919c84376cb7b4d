//! SlidingNumber: an observable number whose transitions roll digit by digit.
//!
//! Methods:
//! - new, set, update, subscribe (writable-store contract)
//! - advance (host-driven timer pump; fires ticks every `duration / 9`)
//!
//! The store is single-threaded. Handles are cheap `Rc` clones so subscribers can
//! capture one (prefer [`SlidingNumber::downgrade`] to avoid a reference cycle) and
//! call back into the store. No `RefCell` borrow is held while user callbacks
//! (subscribers, easing, duration fns) run.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::config::{Convergence, Options};
use crate::digits::{check_value, compose, decompose, interpolate_digits};
use crate::easing::Easing;
use crate::error::SlidingNumberError;
use crate::ids::{IdAllocator, SubscriberId};

/// Ticks per transition. One per possible change of a single digit.
pub const STEPS: u8 = 9;

/// Slack when comparing accumulated time against tick deadlines (ms).
const TIME_EPSILON: f64 = 1e-6;

type Callback = Rc<dyn Fn(f64)>;

#[derive(Clone)]
struct Subscriber {
    id: SubscriberId,
    run: Callback,
}

/// In-flight transition. Dropping it is what releases the "timer".
#[derive(Debug)]
struct Transition {
    start_digits: Rc<[u8]>,
    end_digits: Rc<[u8]>,
    target: f64,
    sign: f64,
    /// Next step to emit, 1..=STEPS.
    step: u8,
    interval: f64,
    elapsed: f64,
    generation: u64,
}

impl Transition {
    /// Snapshot of what the current step needs, detached from the store.
    fn frame(&self, options: &Options) -> Frame {
        Frame {
            start_digits: self.start_digits.clone(),
            end_digits: self.end_digits.clone(),
            target: self.target,
            sign: self.sign,
            step: self.step,
            decimal_points: options.decimal_points,
            convergence: options.convergence,
            easing: options.easing.clone(),
        }
    }
}

/// Inputs for one emitted value. Evaluated with no store borrow held.
struct Frame {
    start_digits: Rc<[u8]>,
    end_digits: Rc<[u8]>,
    target: f64,
    sign: f64,
    step: u8,
    decimal_points: u32,
    convergence: Convergence,
    easing: Option<Rc<dyn Easing>>,
}

impl Frame {
    fn value(&self) -> f64 {
        if self.step >= STEPS && self.convergence == Convergence::Exact {
            return self.target;
        }
        let t = self.step as f64 / STEPS as f64;
        let eased = match &self.easing {
            Some(easing) => easing.ease(t),
            None => t,
        };
        let digits = interpolate_digits(&self.start_digits, &self.end_digits, eased);
        let magnitude = compose(&digits, self.decimal_points);
        if magnitude == 0.0 {
            0.0
        } else {
            self.sign * magnitude
        }
    }
}

struct Inner {
    value: f64,
    options: Options,
    transition: Option<Transition>,
    subscribers: Vec<Subscriber>,
    ids: IdAllocator,
    generation: u64,
}

impl Inner {
    fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }

    fn active_generation(&self) -> Option<u64> {
        self.transition.as_ref().map(|t| t.generation)
    }
}

/// Result of one [`SlidingNumber::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    /// Ticks fired (subscriber notification rounds).
    pub ticks: u32,
    /// A transition reached its final tick during this call.
    pub finished: bool,
}

/// Observable number animated one decimal digit at a time.
#[derive(Clone)]
pub struct SlidingNumber {
    inner: Rc<RefCell<Inner>>,
}

/// Non-owning handle to a [`SlidingNumber`], for capture inside subscribers.
#[derive(Clone)]
pub struct WeakSlidingNumber {
    inner: Weak<RefCell<Inner>>,
}

impl WeakSlidingNumber {
    pub fn upgrade(&self) -> Option<SlidingNumber> {
        self.inner.upgrade().map(|inner| SlidingNumber { inner })
    }
}

/// Removes one subscription. Calling it more than once is a no-op.
#[derive(Clone, Debug)]
pub struct Unsubscriber {
    store: Weak<RefCell<Inner>>,
    id: SubscriberId,
}

impl Unsubscriber {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn unsubscribe(&self) {
        if let Some(inner) = self.store.upgrade() {
            let mut inner = inner.borrow_mut();
            let before = inner.subscribers.len();
            inner.subscribers.retain(|s| s.id != self.id);
            if inner.subscribers.len() != before {
                log::trace!("sliding-number: unsubscribed {:?}", self.id);
            }
        }
    }
}

/// Factory mirroring the store-constructor style: `sliding_number(0.0, Options::default())`.
pub fn sliding_number(
    initial: f64,
    options: Options,
) -> Result<SlidingNumber, SlidingNumberError> {
    SlidingNumber::new(initial, options)
}

impl SlidingNumber {
    /// Create a store holding `initial`. Options are validated once here.
    pub fn new(initial: f64, options: Options) -> Result<Self, SlidingNumberError> {
        options.validate()?;
        check_value(initial, options.decimal_points)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                options,
                transition: None,
                subscribers: Vec::new(),
                ids: IdAllocator::new(),
                generation: 0,
            })),
        })
    }

    pub fn downgrade(&self) -> WeakSlidingNumber {
        WeakSlidingNumber {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current (possibly mid-transition) value.
    pub fn get(&self) -> f64 {
        self.inner.borrow().value
    }

    /// Target of the in-flight transition, if any.
    pub fn target(&self) -> Option<f64> {
        self.inner.borrow().transition.as_ref().map(|t| t.target)
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().transition.is_some()
    }

    pub fn decimal_points(&self) -> u32 {
        self.inner.borrow().options.decimal_points
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Start a transition to `target`, replacing any in-flight one.
    ///
    /// Nothing is emitted until the next [`advance`](Self::advance); the first tick
    /// fires once `duration / 9` ms have elapsed.
    pub fn set(&self, target: f64) -> Result<(), SlidingNumberError> {
        let (from, start_digits, end_digits, duration) = {
            let inner = self.inner.borrow();
            let dp = inner.options.decimal_points;
            let end_digits = decompose(target, dp)?;
            let from = inner.value;
            let start_digits = decompose(from, dp).unwrap_or_else(|err| {
                log::warn!("sliding-number: cannot decompose current value {from}: {err}; rolling from zero");
                vec![0; dp as usize + 1]
            });
            (from, start_digits, end_digits, inner.options.duration.clone())
        };

        // Duration fns are user code; no borrow is held while they run.
        let duration = duration.resolve(from, target);
        let interval = duration / STEPS as f64;

        let sign = if target != 0.0 {
            target.signum()
        } else if from != 0.0 {
            from.signum()
        } else {
            1.0
        };

        let mut inner = self.inner.borrow_mut();
        if let Some(prev) = inner.transition.take() {
            log::debug!(
                "sliding-number: preempting transition to {} at step {}",
                prev.target,
                prev.step
            );
        }
        inner.generation = inner.generation.wrapping_add(1);
        let generation = inner.generation;
        log::debug!(
            "sliding-number: {from} -> {target} over {duration}ms ({interval}ms/tick, {} digits)",
            start_digits.len().max(end_digits.len())
        );
        inner.transition = Some(Transition {
            start_digits: start_digits.into(),
            end_digits: end_digits.into(),
            target,
            sign,
            step: 1,
            interval,
            elapsed: 0.0,
            generation,
        });
        Ok(())
    }

    /// `set(f(current))`, with `f` evaluated immediately.
    pub fn update(&self, f: impl FnOnce(f64) -> f64) -> Result<(), SlidingNumberError> {
        let current = self.get();
        self.set(f(current))
    }

    /// Register `run`. It is called right away with the current value, then on every tick.
    pub fn subscribe(&self, run: impl Fn(f64) + 'static) -> Unsubscriber {
        let run: Callback = Rc::new(run);
        let (id, value) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.ids.alloc_subscriber();
            inner.subscribers.push(Subscriber {
                id,
                run: run.clone(),
            });
            (id, inner.value)
        };
        log::trace!("sliding-number: subscribed {id:?}");
        run(value);
        Unsubscriber {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Advance the transition clock by `dt` milliseconds, firing every tick due.
    ///
    /// A transition started by a subscriber during this call begins counting on
    /// the next call.
    pub fn advance(&self, dt: f64) -> Result<Advance, SlidingNumberError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SlidingNumberError::InvalidTimeStep { dt });
        }
        let mut report = Advance::default();
        let Some(generation) = self.inner.borrow().active_generation() else {
            return Ok(report);
        };
        let mut budget = dt;

        loop {
            {
                let mut inner = self.inner.borrow_mut();
                let Some(tr) = inner.transition.as_mut() else {
                    break;
                };
                if tr.generation != generation {
                    break;
                }
                let needed = (tr.interval - tr.elapsed).max(0.0);
                if needed > budget + TIME_EPSILON {
                    tr.elapsed += budget;
                    break;
                }
                budget = (budget - needed).max(0.0);
                tr.elapsed = 0.0;
            }

            let frame = {
                let inner = self.inner.borrow();
                let frame = match inner.transition.as_ref() {
                    Some(tr) if tr.generation == generation => tr.frame(&inner.options),
                    _ => break,
                };
                frame
            };
            // Easing is user code and may subscribe or re-target.
            let value = frame.value();

            let (subscribers, done) = {
                let mut inner = self.inner.borrow_mut();
                if inner.active_generation() != Some(generation) {
                    break;
                }
                inner.value = value;
                let done = match inner.transition.as_mut() {
                    Some(tr) => {
                        log::trace!("sliding-number: tick {}/{STEPS} -> {value}", tr.step);
                        tr.step += 1;
                        tr.step > STEPS
                    }
                    None => false,
                };
                if done {
                    inner.transition = None;
                    log::debug!("sliding-number: transition finished at {value}");
                }
                (inner.subscribers.clone(), done)
            };

            report.ticks += 1;
            report.finished |= done;
            self.notify(value, &subscribers);
            if done {
                break;
            }
        }
        Ok(report)
    }

    /// Call each snapshotted subscriber still registered, in registration order.
    fn notify(&self, value: f64, subscribers: &[Subscriber]) {
        for sub in subscribers {
            if self.inner.borrow().is_subscribed(sub.id) {
                (sub.run)(value);
            }
        }
    }
}

impl fmt::Debug for SlidingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SlidingNumber")
            .field("value", &inner.value)
            .field("options", &inner.options)
            .field("transition", &inner.transition)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}
