//! Linked programs.

use std::fmt;

use smallvec::SmallVec;

use shade_core::GraphicsContext;

use crate::compiler::CompiledShader;

/// Outcome of validating a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub passed: bool,
    /// Program info log read after validation. Usually empty when `passed`.
    pub log: String,
}

impl ValidationReport {
    pub(crate) fn query<C: GraphicsContext>(context: &C, program: &C::Program) -> Self {
        Self {
            passed: context.program_validate_status(program),
            log: context.program_info_log(program),
        }
    }
}

/// A program whose stages compiled, linked and (per policy) validated.
///
/// The program and its attached shaders belong to the context. Releasing them
/// is up to the caller.
pub struct LinkedProgram<C: GraphicsContext> {
    handle: C::Program,
    shaders: SmallVec<[CompiledShader<C>; 2]>,
    validation: ValidationReport,
}

impl<C: GraphicsContext> LinkedProgram<C> {
    pub(crate) fn new(
        handle: C::Program,
        shaders: SmallVec<[CompiledShader<C>; 2]>,
        validation: ValidationReport,
    ) -> Self {
        Self {
            handle,
            shaders,
            validation,
        }
    }

    pub fn handle(&self) -> &C::Program {
        &self.handle
    }

    pub fn into_handle(self) -> C::Program {
        self.handle
    }

    /// Delete the program and its attached shaders from `context`.
    pub fn delete(self, context: &mut C) {
        context.delete_program(&self.handle);
        for shader in &self.shaders {
            context.delete_shader(shader.handle());
        }
    }

    /// Shaders attached to the program, vertex first.
    pub fn shaders(&self) -> &[CompiledShader<C>] {
        &self.shaders
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    /// Make this program current on `context`.
    pub fn activate(&self, context: &mut C) {
        context.set_current_program(Some(&self.handle));
    }

    /// Location of a vertex attribute in this program.
    pub fn attribute_location(&self, context: &C, name: &str) -> Option<u32> {
        context.attribute_location(&self.handle, name)
    }

    /// Location of a uniform in this program.
    pub fn uniform_location(&self, context: &C, name: &str) -> Option<C::UniformLocation> {
        context.uniform_location(&self.handle, name)
    }
}

impl<C: GraphicsContext> Clone for LinkedProgram<C> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            shaders: self.shaders.clone(),
            validation: self.validation.clone(),
        }
    }
}

impl<C: GraphicsContext> fmt::Debug for LinkedProgram<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedProgram")
            .field("handle", &self.handle)
            .field("shaders", &self.shaders)
            .field("validation", &self.validation)
            .finish()
    }
}
