use js_sys::{Function, Reflect};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_sliding_number_core::{
    Advance, Convergence, Easing, EasingPreset, Options, SlidingNumber, SlidingNumberError,
};

/// Svelte-compatible writable store whose transitions roll digit by digit.
///
/// The host drives time: call `advance(dtMs)` from a `requestAnimationFrame` loop.
#[wasm_bindgen]
pub struct VizijSlidingNumber {
    core: SlidingNumber,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn core_error(err: SlidingNumberError) -> JsError {
    JsError::new(&err.to_string())
}

fn get_field(obj: &JsValue, key: &str) -> Result<JsValue, JsError> {
    Reflect::get(obj, &JsValue::from_str(key))
        .map_err(|e| JsError::new(&format!("options.{key} read error: {e:?}")))
}

/// JS easing callback `(t) => eased`. Throws or non-numbers fall back to linear.
struct JsEasing {
    f: Function,
}

impl Easing for JsEasing {
    fn ease(&self, t: f64) -> f64 {
        match self.f.call1(&JsValue::UNDEFINED, &JsValue::from_f64(t)) {
            Ok(val) => val.as_f64().unwrap_or_else(|| {
                log::warn!("sliding-number: easing returned a non-number for t={t}; using t");
                t
            }),
            Err(e) => {
                log::warn!("sliding-number: easing threw {e:?}; using t");
                t
            }
        }
    }
}

/// JS duration callback `(from, to) => ms`. Failures resolve to NaN, which the
/// core clamps to 0.
fn js_duration(f: Function) -> impl Fn(f64, f64) -> f64 {
    move |from, to| {
        match f.call2(
            &JsValue::UNDEFINED,
            &JsValue::from_f64(from),
            &JsValue::from_f64(to),
        ) {
            Ok(val) => val.as_f64().unwrap_or(f64::NAN),
            Err(e) => {
                log::warn!("sliding-number: duration fn threw {e:?}");
                f64::NAN
            }
        }
    }
}

/// Build core Options from `{ duration, easing, decimalPoints, convergence }`.
fn parse_options(options: &JsValue) -> Result<Options, JsError> {
    let mut opts = Options::new();
    if jsvalue_is_undefined_or_null(options) {
        return Ok(opts);
    }
    if !options.is_object() {
        return Err(JsError::new("options must be an object"));
    }

    let duration = get_field(options, "duration")?;
    if let Some(f) = duration.dyn_ref::<Function>() {
        opts = opts.with_duration_fn(js_duration(f.clone()));
    } else if let Some(ms) = duration.as_f64() {
        opts = opts.with_duration(ms);
    } else if !jsvalue_is_undefined_or_null(&duration) {
        return Err(JsError::new(
            "options.duration must be a number or a (from, to) => number function",
        ));
    }

    let easing = get_field(options, "easing")?;
    if let Some(f) = easing.dyn_ref::<Function>() {
        opts = opts.with_easing(JsEasing { f: f.clone() });
    } else if let Some(name) = easing.as_string() {
        let preset = EasingPreset::from_name(&name)
            .ok_or_else(|| JsError::new(&format!("unknown easing preset: {name}")))?;
        opts = opts.with_easing_preset(preset);
    } else if easing.is_object() {
        let preset: EasingPreset = swb::from_value(easing)
            .map_err(|e| JsError::new(&format!("easing preset error: {e}")))?;
        opts = opts.with_easing_preset(preset);
    } else if !jsvalue_is_undefined_or_null(&easing) {
        return Err(JsError::new(
            "options.easing must be a function, a preset name or a preset object",
        ));
    }

    let decimal_points = get_field(options, "decimalPoints")?;
    if let Some(dp) = decimal_points.as_f64() {
        if !dp.is_finite() || dp < 0.0 || dp.fract() != 0.0 || dp > u32::MAX as f64 {
            return Err(JsError::new(&format!(
                "options.decimalPoints must be a non-negative integer, got {dp}"
            )));
        }
        opts = opts.with_decimal_points(dp as u32);
    } else if !jsvalue_is_undefined_or_null(&decimal_points) {
        return Err(JsError::new("options.decimalPoints must be a number"));
    }

    let convergence = get_field(options, "convergence")?;
    if !jsvalue_is_undefined_or_null(&convergence) {
        let convergence: Convergence = swb::from_value(convergence)
            .map_err(|e| JsError::new(&format!("options.convergence error: {e}")))?;
        opts = opts.with_convergence(convergence);
    }

    Ok(opts)
}

#[wasm_bindgen]
impl VizijSlidingNumber {
    /// Create a store. `options` may be undefined/null for defaults.
    /// Example:
    ///   new VizijSlidingNumber(0, { duration: 400, easing: "cubic_out", decimalPoints: 2 })
    #[wasm_bindgen(constructor)]
    pub fn new(initial: f64, options: JsValue) -> Result<VizijSlidingNumber, JsError> {
        console_error_panic_hook::set_once();
        let opts = parse_options(&options)?;
        let core = SlidingNumber::new(initial, opts).map_err(core_error)?;
        Ok(VizijSlidingNumber { core })
    }

    /// Start a transition to `value`.
    #[wasm_bindgen]
    pub fn set(&self, value: f64) -> Result<(), JsError> {
        self.core.set(value).map_err(core_error)
    }

    /// Start a transition to `updater(current)`.
    #[wasm_bindgen]
    pub fn update(&self, updater: Function) -> Result<(), JsError> {
        let current = JsValue::from_f64(self.core.get());
        let next = updater
            .call1(&JsValue::UNDEFINED, &current)
            .map_err(|e| JsError::new(&format!("update callback threw: {e:?}")))?;
        let next = next
            .as_f64()
            .ok_or_else(|| JsError::new("update callback must return a number"))?;
        self.core.set(next).map_err(core_error)
    }

    /// Register `run(value)`; it is called immediately with the current value.
    /// Returns the unsubscribe function.
    #[wasm_bindgen]
    pub fn subscribe(&self, run: Function) -> Function {
        let unsub = self.core.subscribe(move |v| {
            if let Err(e) = run.call1(&JsValue::UNDEFINED, &JsValue::from_f64(v)) {
                log::warn!("sliding-number: subscriber threw {e:?}");
            }
        });
        Closure::<dyn Fn()>::new(move || unsub.unsubscribe())
            .into_js_value()
            .unchecked_into::<Function>()
    }

    /// Current value.
    #[wasm_bindgen]
    pub fn get(&self) -> f64 {
        self.core.get()
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.core.is_animating()
    }

    #[wasm_bindgen(js_name = subscriberCount)]
    pub fn subscriber_count(&self) -> u32 {
        self.core.subscriber_count() as u32
    }

    /// Step the transition clock by `dt_ms`. Returns `{ ticks, finished }`.
    #[wasm_bindgen]
    pub fn advance(&self, dt_ms: f64) -> Result<JsValue, JsError> {
        let report: Advance = self.core.advance(dt_ms).map_err(core_error)?;
        swb::to_value(&report).map_err(|e| JsError::new(&format!("advance output error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
