//! WebAssembly bindings for shader program building.
//!
//! Exposes the program builder to JavaScript over a `WebGLRenderingContext`.
//!
//! ## Example
//!
//! ```js
//! import { initShaders, createShaders } from 'shade-wasm';
//!
//! const gl = canvas.getContext('webgl');
//!
//! // Build, validate and activate; throws with a numbered source dump on failure
//! initShaders(gl, VERTEX_SHADER, FRAGMENT_SHADER);
//! const aPosition = gl.getAttribLocation(gl.program, 'aPosition');
//!
//! // Build a second program without activating it
//! const cube = createShaders(gl, VERTEX_SHADER_CUBE, FRAGMENT_SHADER_CUBE);
//! gl.useProgram(cube);
//! ```

use wasm_bindgen::prelude::*;
use web_sys::{WebGlProgram, WebGlRenderingContext};

use shade_core::{dump_source, parse_info_log};
use shade_program::{BuildOptions, ProgramBuilder};

mod context;
mod types;

pub use context::*;
pub use types::*;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
}

/// Build a program, make it current and store it as `gl.program`.
///
/// Throws an `Error` whose message is the full diagnostic on failure.
#[wasm_bindgen(js_name = initShaders)]
pub fn init_shaders(
    gl: WebGlRenderingContext,
    vertex: &str,
    fragment: &str,
) -> Result<WebGlProgram, JsError> {
    let mut context = WebGlContext::new(gl);
    let program = shade_program::init_shaders(&mut context, vertex, fragment)
        .map_err(|e| JsError::new(&e.to_string()))?
        .into_handle();

    // Render code reads attribute and uniform locations from `gl.program`.
    if js_sys::Reflect::set(context.gl(), &JsValue::from_str("program"), &program).is_err() {
        log::warn!("Could not expose the program as gl.program");
    }

    Ok(program)
}

/// Build a program without making it current, unless `options.activate` is set.
#[wasm_bindgen(js_name = createShaders)]
pub fn create_shaders(
    gl: WebGlRenderingContext,
    vertex: &str,
    fragment: &str,
    options: JsValue,
) -> Result<WebGlProgram, JsError> {
    let options = read_options(options, BuildOptions::new().with_activate(false))?;
    let mut context = WebGlContext::new(gl);

    ProgramBuilder::new(vertex, fragment)
        .with_options(options)
        .build(&mut context)
        .map(|program| program.into_handle())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Check that a shader pair builds, without keeping anything.
///
/// Every shader and program created for the check is deleted again and the
/// current program is left untouched. Returns `null` when the program builds,
/// or a diagnostic object with `kind`, `stage`, `message`, `log`, `sourceDump`
/// and parsed `entries`.
#[wasm_bindgen(js_name = checkShaders)]
pub fn check_shaders(
    gl: WebGlRenderingContext,
    vertex: &str,
    fragment: &str,
) -> Result<JsValue, JsError> {
    let mut context = WebGlContext::new(gl);

    match ProgramBuilder::new(vertex, fragment).check(&mut context) {
        Ok(_) => Ok(JsValue::NULL),
        Err(err) => serde_wasm_bindgen::to_value(&DiagnosticJs::from(&err))
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e))),
    }
}

/// Render shader source with right-aligned line numbers.
#[wasm_bindgen(js_name = dumpShaderSrc)]
pub fn dump_shader_src(source: &str) -> String {
    dump_source(source)
}

/// Parse a compiler or linker info log into `{ severity, source, line, column, message }` objects.
#[wasm_bindgen(js_name = parseInfoLog)]
pub fn parse_info_log_js(log: &str) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&parse_info_log(log))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn read_options(options: JsValue, defaults: BuildOptions) -> Result<BuildOptions, JsError> {
    if options.is_undefined() || options.is_null() {
        return Ok(defaults);
    }
    let options: BuildOptionsJs = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?;
    Ok(options.merge_into(defaults))
}
