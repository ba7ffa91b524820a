//! The graphics context boundary.
//!
//! Everything the program builder does goes through [`GraphicsContext`]. A
//! backend implements it over a concrete API (WebGL, an in-memory recorder
//! for tests, ...). Calls that create objects or change context state take
//! `&mut self`, so exclusive access to the context is enforced at compile time.

use std::fmt::Debug;

use crate::errors::ContextError;
use crate::stage::ShaderStage;

/// Graphics API operations needed to compile, link and activate a program.
pub trait GraphicsContext {
    /// Backend shader object handle.
    type Shader: Clone + Debug;

    /// Backend program object handle.
    type Program: Clone + Debug;

    /// Backend uniform location handle.
    type UniformLocation: Clone + Debug;

    /// Create an empty shader object for a stage.
    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, ContextError>;

    /// Replace the source text of a shader object.
    fn shader_source(&mut self, shader: &Self::Shader, source: &str);

    /// Compile the current source of a shader object.
    fn compile_shader(&mut self, shader: &Self::Shader);

    /// Whether the last compilation of the shader succeeded.
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;

    /// Compiler output for the shader. May be empty on some backends.
    fn shader_info_log(&self, shader: &Self::Shader) -> String;

    /// Create an empty program object.
    fn create_program(&mut self) -> Result<Self::Program, ContextError>;

    /// Delete a shader object. Attached shaders are freed once their program is.
    fn delete_shader(&mut self, shader: &Self::Shader);

    fn attach_shader(&mut self, program: &Self::Program, shader: &Self::Shader);

    fn link_program(&mut self, program: &Self::Program);

    fn validate_program(&mut self, program: &Self::Program);

    /// Whether the last link of the program succeeded.
    fn program_link_status(&self, program: &Self::Program) -> bool;

    /// Whether the last validation of the program succeeded.
    fn program_validate_status(&self, program: &Self::Program) -> bool;

    /// Linker or validator output for the program.
    fn program_info_log(&self, program: &Self::Program) -> String;

    fn delete_program(&mut self, program: &Self::Program);

    /// Make `program` the one used by subsequent draw calls, or clear it with `None`.
    fn set_current_program(&mut self, program: Option<&Self::Program>);

    /// Location of a vertex attribute, `None` if the program has no such active attribute.
    fn attribute_location(&self, program: &Self::Program, name: &str) -> Option<u32>;

    /// Location of a uniform, `None` if the program has no such active uniform.
    fn uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
}
