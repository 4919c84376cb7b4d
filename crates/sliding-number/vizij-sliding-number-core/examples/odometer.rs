//! Print the frames of a few counter transitions.
//!
//! `cargo run -p vizij-sliding-number-core --example odometer`

use vizij_sliding_number_core::{Config, EasingPreset, Options, SlidingNumber, SlidingNumberError};

fn main() -> Result<(), SlidingNumberError> {
    let cfg = Config {
        duration_ms: 450.0,
        easing: Some(EasingPreset::CubicInOut),
        decimal_points: 2,
        ..Config::default()
    };
    let counter = SlidingNumber::new(0.0, Options::from(cfg))?;
    let dp = counter.decimal_points() as usize;
    let _unsub = counter.subscribe(move |v| println!("  {v:>12.dp$}"));

    for target in [1.23, 19.99, 20.0, 1234.56, 7.0] {
        println!("-> {target}");
        counter.set(target)?;
        // ~60fps host loop
        while counter.is_animating() {
            counter.advance(1000.0 / 60.0)?;
        }
    }
    Ok(())
}
