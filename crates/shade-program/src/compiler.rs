//! Single-stage shader compilation.

use std::fmt;

use shade_core::{BuildError, GraphicsContext, Result, ShaderSource, ShaderStage};

/// A shader object that compiled successfully.
///
/// The handle stays owned by the context; nothing here deletes it.
pub struct CompiledShader<C: GraphicsContext> {
    stage: ShaderStage,
    handle: C::Shader,
}

impl<C: GraphicsContext> CompiledShader<C> {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn handle(&self) -> &C::Shader {
        &self.handle
    }

    pub fn into_handle(self) -> C::Shader {
        self.handle
    }
}

impl<C: GraphicsContext> Clone for CompiledShader<C> {
    fn clone(&self) -> Self {
        Self {
            stage: self.stage,
            handle: self.handle.clone(),
        }
    }
}

impl<C: GraphicsContext> fmt::Debug for CompiledShader<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledShader")
            .field("stage", &self.stage)
            .field("handle", &self.handle)
            .finish()
    }
}

/// Compile one shader stage.
///
/// Fails with [`BuildError::Compile`] when the context reports a failed
/// compilation; the error carries the info log and a numbered dump of the
/// source. Blank sources are rejected before the context is touched.
pub fn compile<C: GraphicsContext>(
    context: &mut C,
    source: &ShaderSource,
) -> Result<CompiledShader<C>> {
    let stage = source.stage();
    if source.is_blank() {
        return Err(BuildError::EmptySource { stage });
    }

    let shader = context.create_shader(stage)?;
    context.shader_source(&shader, source.text());
    context.compile_shader(&shader);

    let info_log = context.shader_info_log(&shader);
    if !context.shader_compile_status(&shader) {
        log::debug!("{} shader failed to compile", stage);
        return Err(BuildError::compile(stage, info_log, source.text()));
    }

    if !info_log.trim().is_empty() {
        log::warn!("{} shader compiled with warnings:\n{}", stage, info_log.trim_end());
    }
    log::debug!("Compiled {} shader", stage);

    Ok(CompiledShader {
        stage,
        handle: shader,
    })
}
