//! Throwaway builds that leave no objects behind.

use shade_core::{ContextError, GraphicsContext, ShaderStage};

/// Wraps a context and remembers every object created through it, so a
/// trial build can be torn down whether it succeeded or not.
pub(crate) struct Scratch<'a, C: GraphicsContext> {
    inner: &'a mut C,
    shaders: Vec<C::Shader>,
    programs: Vec<C::Program>,
}

impl<'a, C: GraphicsContext> Scratch<'a, C> {
    pub(crate) fn new(inner: &'a mut C) -> Self {
        Self {
            inner,
            shaders: Vec::new(),
            programs: Vec::new(),
        }
    }

    /// Delete everything created so far, programs first.
    pub(crate) fn release(self) {
        for program in &self.programs {
            self.inner.delete_program(program);
        }
        for shader in &self.shaders {
            self.inner.delete_shader(shader);
        }
        log::debug!(
            "Released {} program(s) and {} shader(s)",
            self.programs.len(),
            self.shaders.len()
        );
    }
}

impl<C: GraphicsContext> GraphicsContext for Scratch<'_, C> {
    type Shader = C::Shader;
    type Program = C::Program;
    type UniformLocation = C::UniformLocation;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<C::Shader, ContextError> {
        let shader = self.inner.create_shader(stage)?;
        self.shaders.push(shader.clone());
        Ok(shader)
    }

    fn shader_source(&mut self, shader: &C::Shader, source: &str) {
        self.inner.shader_source(shader, source);
    }

    fn compile_shader(&mut self, shader: &C::Shader) {
        self.inner.compile_shader(shader);
    }

    fn shader_compile_status(&self, shader: &C::Shader) -> bool {
        self.inner.shader_compile_status(shader)
    }

    fn shader_info_log(&self, shader: &C::Shader) -> String {
        self.inner.shader_info_log(shader)
    }

    fn create_program(&mut self) -> Result<C::Program, ContextError> {
        let program = self.inner.create_program()?;
        self.programs.push(program.clone());
        Ok(program)
    }

    fn delete_shader(&mut self, shader: &C::Shader) {
        self.inner.delete_shader(shader);
    }

    fn attach_shader(&mut self, program: &C::Program, shader: &C::Shader) {
        self.inner.attach_shader(program, shader);
    }

    fn link_program(&mut self, program: &C::Program) {
        self.inner.link_program(program);
    }

    fn validate_program(&mut self, program: &C::Program) {
        self.inner.validate_program(program);
    }

    fn program_link_status(&self, program: &C::Program) -> bool {
        self.inner.program_link_status(program)
    }

    fn program_validate_status(&self, program: &C::Program) -> bool {
        self.inner.program_validate_status(program)
    }

    fn program_info_log(&self, program: &C::Program) -> String {
        self.inner.program_info_log(program)
    }

    fn delete_program(&mut self, program: &C::Program) {
        self.inner.delete_program(program);
    }

    fn set_current_program(&mut self, program: Option<&C::Program>) {
        self.inner.set_current_program(program);
    }

    fn attribute_location(&self, program: &C::Program, name: &str) -> Option<u32> {
        self.inner.attribute_location(program, name)
    }

    fn uniform_location(&self, program: &C::Program, name: &str) -> Option<C::UniformLocation> {
        self.inner.uniform_location(program, name)
    }
}
