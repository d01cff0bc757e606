use js_sys::{Float32Array, Function};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use prismatic_core::{Config, Engine, Inputs, Outputs, ShaderId, UniformName, UniformSink};

#[wasm_bindgen]
pub struct PrismaticMorph {
    core: Engine,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Forwards uniform writes to a JS callback `(name, value) => void`.
struct JsUniformSink {
    f: Function,
}

impl UniformSink for JsUniformSink {
    fn write(&mut self, name: UniformName, value: f32) {
        let name = JsValue::from_str(name.as_str());
        let value = JsValue::from_f64(f64::from(value));
        // A throwing callback must not poison the frame for other shader refs.
        let _ = self.f.call2(&JsValue::UNDEFINED, &name, &value);
    }
}

#[wasm_bindgen]
impl PrismaticMorph {
    /// Create a new engine. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new PrismaticMorph({ seed: 7, swarm: { particles_per_vertex: 30 } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PrismaticMorph, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let core = Engine::new(cfg).map_err(|e| JsError::new(&format!("engine error: {e}")))?;
        Ok(PrismaticMorph { core })
    }

    /// Register a shader material. `writer(name: string, value: number)` is
    /// called once per uniform immediately and then whenever a value changes.
    /// Returns a handle for `unregister_shader`.
    #[wasm_bindgen(js_name = register_shader)]
    pub fn register_shader(&mut self, writer: Function) -> u32 {
        self.core
            .register_shader(Box::new(JsUniformSink { f: writer }))
            .0
    }

    #[wasm_bindgen(js_name = unregister_shader)]
    pub fn unregister_shader(&mut self, id: u32) -> bool {
        self.core.unregister_shader(ShaderId(id))
    }

    /// Step by dt (seconds) with inputs JSON. Returns Outputs JSON.
    /// Particle positions are not included; read them with `particle_positions`
    /// when `particles_dirty` is set.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out: &Outputs = self.core.update(dt, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Flat xyz particle buffer from the last update, ready for a position attribute.
    #[wasm_bindgen(js_name = particle_positions)]
    pub fn particle_positions(&self) -> Float32Array {
        Float32Array::from(self.core.outputs().particle_positions.as_slice())
    }

    #[wasm_bindgen]
    pub fn phase(&self) -> String {
        self.core.phase().name().to_string()
    }

    /// Link behind a label sprite, looked up by its (case-insensitive) title.
    #[wasm_bindgen(js_name = label_link)]
    pub fn label_link(&self, name: &str) -> Result<String, JsError> {
        self.core
            .label(name)
            .map(|spec| spec.link.clone())
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
