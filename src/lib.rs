use anyhow::anyhow;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod bit_set;
mod error;
pub mod index;
mod parse;
mod sample;

pub use bit_set::{BitSet, Bits, MAX_CAPACITY, Members};
pub use error::BitSetError;
pub use parse::parse_binary_str;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[derive(Serialize)]
pub struct Summary {
    pub capacity: usize,
    pub count: usize,
    pub members: Vec<usize>,
}

impl From<&BitSet> for Summary {
    fn from(set: &BitSet) -> Self {
        Self {
            capacity: set.capacity(),
            count: set.count(),
            members: set.members().collect(),
        }
    }
}

/// `BitSet` as seen from JavaScript.
#[wasm_bindgen(js_name = BitSet)]
pub struct JsBitSet(BitSet);

#[wasm_bindgen(js_class = BitSet)]
#[allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]
impl JsBitSet {
    #[wasm_bindgen(constructor)]
    pub fn new(capacity: f64, members: JsValue) -> Result<JsBitSet, JsValue> {
        let capacity = index::capacity_from_f64(capacity).map_err(to_js_error)?;
        let values = decode_numbers(members).map_err(to_js_error)?;
        let positions = index::positions_from_f64(&values, capacity).map_err(to_js_error)?;
        BitSet::new(capacity, positions)
            .map(JsBitSet)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.0.count()
    }

    pub fn insert(&mut self, position: f64) -> Result<bool, JsValue> {
        let position =
            index::position_from_f64(position, self.0.capacity()).map_err(to_js_error)?;
        self.0.insert(position).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = insertMany)]
    pub fn insert_many(&mut self, members: JsValue) -> Result<(), JsValue> {
        let values = decode_numbers(members).map_err(to_js_error)?;
        let positions =
            index::positions_from_f64(&values, self.0.capacity()).map_err(to_js_error)?;
        self.0.insert_many(positions).map_err(to_js_error)
    }

    /// Takes a `BigInt`, bit 0 being position 0. Negative masks are
    /// rejected rather than wrapped.
    #[wasm_bindgen(js_name = insertMask)]
    pub fn insert_mask(&mut self, mask: JsValue) -> Result<(), JsValue> {
        let mask = decode_mask(mask).map_err(to_js_error)?;
        let words = index::mask_words_from_i128(mask).map_err(to_js_error)?;
        self.0.insert_mask_words(&words).map_err(to_js_error)
    }

    pub fn contains(&self, position: f64) -> bool {
        index::contains_f64(&self.0, position)
    }

    pub fn get(&self, position: f64) -> Result<bool, JsValue> {
        let position =
            index::position_from_f64(position, self.0.capacity()).map_err(to_js_error)?;
        self.0.get(position).map_err(to_js_error)
    }

    pub fn members(&self) -> Result<JsValue, JsValue> {
        let members: Vec<usize> = self.0.members().collect();
        serde_wasm_bindgen::to_value(&members)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize members: {e}")))
    }

    /// Ascending 0/1 flags, position 0 first.
    pub fn bits(&self) -> Vec<u8> {
        self.0.bits().map(u8::from).collect()
    }

    /// Most-significant first; the last character is position 0.
    #[wasm_bindgen(js_name = toBinaryString)]
    pub fn to_binary_string(&self) -> String {
        self.0.to_binary_string()
    }

    #[wasm_bindgen(js_name = toMask)]
    pub fn to_mask(&self) -> Option<u64> {
        self.0.to_mask()
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_display_string(&self) -> String {
        self.0.to_string()
    }

    pub fn summary(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&Summary::from(&self.0))
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize summary: {e}")))
    }
}

impl From<JsBitSet> for BitSet {
    fn from(set: JsBitSet) -> Self {
        set.0
    }
}

#[wasm_bindgen(js_name = parseBitSet)]
#[allow(clippy::missing_errors_doc)]
pub fn parse_bit_set(text: &str) -> Result<JsBitSet, JsValue> {
    parse_binary_str(text).map(JsBitSet).map_err(to_js_error)
}

#[wasm_bindgen(js_name = randomBitSet)]
#[allow(clippy::missing_errors_doc)]
pub fn random_bit_set(capacity: f64, samples: f64) -> Result<JsBitSet, JsValue> {
    let capacity = index::capacity_from_f64(capacity).map_err(to_js_error)?;
    let samples = index::count_from_f64(samples).map_err(to_js_error)?;
    let mut rng = sample::seeded_rng().map_err(to_js_error)?;
    BitSet::random(capacity, samples, &mut rng)
        .map(JsBitSet)
        .map_err(to_js_error)
}

fn decode_numbers(value: JsValue) -> anyhow::Result<Vec<f64>> {
    // Missing members means an empty set
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| anyhow!("Failed to deserialize members: {e}"))
}

fn decode_mask(value: JsValue) -> anyhow::Result<i128> {
    serde_wasm_bindgen::from_value(value).map_err(|e| anyhow!("Failed to deserialize mask: {e}"))
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}
