//! Vizij Sliding Number Core (engine-agnostic)
//!
//! An observable number that animates between values one decimal digit at a
//! time, like an odometer. Each transition runs exactly nine ticks; every digit
//! position interpolates independently (no carry), so neighbouring digits roll
//! out of step with each other.
//!
//! Time is driven by the host: call [`SlidingNumber::advance`] once per frame
//! with the elapsed milliseconds.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use vizij_sliding_number_core::{Options, SlidingNumber};
//!
//! let counter = SlidingNumber::new(0.0, Options::new().with_duration(90.0)).unwrap();
//! let frames = Rc::new(RefCell::new(Vec::new()));
//! let sink = frames.clone();
//! let _unsub = counter.subscribe(move |v| sink.borrow_mut().push(v));
//!
//! counter.set(9.0).unwrap();
//! counter.advance(90.0).unwrap();
//! assert_eq!(*frames.borrow(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
//! ```

pub mod config;
pub mod digits;
pub mod easing;
pub mod error;
pub mod ids;
pub mod store;

// Re-exports for consumers (adapters)
pub use config::{Config, Convergence, DurationSpec, Options, DEFAULT_DURATION_MS};
pub use digits::{compose, decompose, interpolate_digit, interpolate_digits, MAX_DECIMAL_POINTS};
pub use easing::{Easing, EasingPreset};
pub use error::SlidingNumberError;
pub use ids::SubscriberId;
pub use store::{sliding_number, Advance, SlidingNumber, Unsubscriber, WeakSlidingNumber, STEPS};
