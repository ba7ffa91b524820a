//! [`GraphicsContext`] over a browser WebGL context.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGlProgram, WebGlRenderingContext as Gl, WebGlShader,
    WebGlUniformLocation,
};

use shade_core::{ContextError, GraphicsContext, ShaderStage};

/// A WebGL 1 rendering context.
#[derive(Debug, Clone)]
pub struct WebGlContext {
    gl: Gl,
}

impl WebGlContext {
    pub fn new(gl: Gl) -> Self {
        Self { gl }
    }

    /// Get the `webgl` context of a canvas.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsError> {
        let gl = canvas
            .get_context("webgl")
            .map_err(|_| JsError::new("Failed to get webgl context"))?
            .ok_or_else(|| JsError::new("WebGL is not available"))?
            .dyn_into::<Gl>()
            .map_err(|_| JsError::new("Failed to cast to WebGLRenderingContext"))?;
        Ok(Self::new(gl))
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn into_inner(self) -> Gl {
        self.gl
    }
}

fn stage_constant(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => Gl::VERTEX_SHADER,
        ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
    }
}

impl GraphicsContext for WebGlContext {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type UniformLocation = WebGlUniformLocation;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<WebGlShader, ContextError> {
        self.gl
            .create_shader(stage_constant(stage))
            .ok_or_else(|| ContextError::ShaderCreation {
                stage,
                reason: "createShader returned null".to_string(),
            })
    }

    fn shader_source(&mut self, shader: &WebGlShader, source: &str) {
        self.gl.shader_source(shader, source);
    }

    fn compile_shader(&mut self, shader: &WebGlShader) {
        self.gl.compile_shader(shader);
    }

    fn shader_compile_status(&self, shader: &WebGlShader) -> bool {
        self.gl
            .get_shader_parameter(shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> String {
        self.gl.get_shader_info_log(shader).unwrap_or_default()
    }

    fn create_program(&mut self) -> Result<WebGlProgram, ContextError> {
        self.gl
            .create_program()
            .ok_or_else(|| ContextError::ProgramCreation {
                reason: "createProgram returned null".to_string(),
            })
    }

    fn delete_shader(&mut self, shader: &WebGlShader) {
        self.gl.delete_shader(Some(shader));
    }

    fn attach_shader(&mut self, program: &WebGlProgram, shader: &WebGlShader) {
        self.gl.attach_shader(program, shader);
    }

    fn link_program(&mut self, program: &WebGlProgram) {
        self.gl.link_program(program);
    }

    fn validate_program(&mut self, program: &WebGlProgram) {
        self.gl.validate_program(program);
    }

    fn program_link_status(&self, program: &WebGlProgram) -> bool {
        self.gl
            .get_program_parameter(program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_validate_status(&self, program: &WebGlProgram) -> bool {
        self.gl
            .get_program_parameter(program, Gl::VALIDATE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> String {
        self.gl.get_program_info_log(program).unwrap_or_default()
    }

    fn delete_program(&mut self, program: &WebGlProgram) {
        self.gl.delete_program(Some(program));
    }

    fn set_current_program(&mut self, program: Option<&WebGlProgram>) {
        self.gl.use_program(program);
    }

    fn attribute_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        // -1 means no such active attribute
        u32::try_from(self.gl.get_attrib_location(program, name)).ok()
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }
}
