//! Shader program building.
//!
//! Compiles a vertex and a fragment shader against a [`GraphicsContext`],
//! links them into a program, validates it and makes it current. Any failure
//! comes back as a [`BuildError`] whose `Display` output is ready to print.
//!
//! # Example
//!
//! ```ignore
//! use shade_program::init_shaders;
//!
//! let program = init_shaders(&mut gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
//! let position = program.attribute_location(&gl, "aPosition");
//! ```

mod compiler;
mod linker;
mod options;
mod program;
mod scratch;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use compiler::{compile, CompiledShader};
pub use linker::{link, link_with_options, ProgramBuilder};
pub use options::{BuildOptions, ValidationPolicy};
pub use program::{LinkedProgram, ValidationReport};

pub use shade_core::{
    dump_source, BuildError, ContextError, DiagnosticKind, GraphicsContext, Result, ShaderSource,
    ShaderStage,
};

/// Build, validate and activate a program from raw vertex and fragment text.
///
/// This is the one-call entry point for render code: on success the returned
/// program is already the context's current program.
pub fn init_shaders<C: GraphicsContext>(
    context: &mut C,
    vertex: &str,
    fragment: &str,
) -> Result<LinkedProgram<C>> {
    link(
        context,
        &ShaderSource::vertex(vertex),
        &ShaderSource::fragment(fragment),
    )
}
