//! Program linking.
//!
//! Linking is all-or-nothing: the vertex stage is compiled first, and if it
//! fails the fragment stage is never compiled. A program handle is only
//! returned once both stages compiled and the link succeeded.

use smallvec::smallvec;

use shade_core::{BuildError, GraphicsContext, Result, ShaderSource};

use crate::compiler::compile;
use crate::options::{BuildOptions, ValidationPolicy};
use crate::program::{LinkedProgram, ValidationReport};
use crate::scratch::Scratch;

/// Compile, link, validate and activate a program with default options.
pub fn link<C: GraphicsContext>(
    context: &mut C,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
) -> Result<LinkedProgram<C>> {
    link_with_options(context, vertex, fragment, &BuildOptions::default())
}

/// Compile, link and validate a program.
///
/// Steps run in this order: compile vertex, compile fragment, create program,
/// attach both shaders, link, validate, check link status, check validation
/// status. With `options.activate` the program is then made current on the
/// context, which is the only shared state this touches besides creating
/// objects.
pub fn link_with_options<C: GraphicsContext>(
    context: &mut C,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
    options: &BuildOptions,
) -> Result<LinkedProgram<C>> {
    let vertex_shader = compile(context, vertex)?;
    let fragment_shader = compile(context, fragment)?;

    let program = context.create_program()?;
    context.attach_shader(&program, vertex_shader.handle());
    context.attach_shader(&program, fragment_shader.handle());

    context.link_program(&program);
    context.validate_program(&program);

    if !context.program_link_status(&program) {
        let info_log = context.program_info_log(&program);
        log::debug!("Program failed to link");
        return Err(BuildError::link(info_log));
    }

    let validation = ValidationReport::query(context, &program);
    if !validation.passed {
        match options.validation {
            ValidationPolicy::Ignore => {}
            ValidationPolicy::Warn => {
                log::warn!("Program validation failed:\n{}", validation.log.trim_end());
            }
            ValidationPolicy::Deny => return Err(BuildError::validation(validation.log)),
        }
    }

    if options.activate {
        context.set_current_program(Some(&program));
    }
    log::debug!("Linked program {:?}", program);

    Ok(LinkedProgram::new(
        program,
        smallvec![vertex_shader, fragment_shader],
        validation,
    ))
}

/// Builds programs from raw stage text with fixed options.
///
/// Useful when a renderer keeps several programs around and switches between
/// them: build each with `activate(false)`, then call
/// [`LinkedProgram::activate`] before drawing.
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    vertex: ShaderSource,
    fragment: ShaderSource,
    options: BuildOptions,
}

impl ProgramBuilder {
    /// Create a builder for the given vertex and fragment text.
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: ShaderSource::vertex(vertex),
            fragment: ShaderSource::fragment(fragment),
            options: BuildOptions::default(),
        }
    }

    /// Replace all build options.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Set whether the built program becomes current.
    pub fn activate(mut self, activate: bool) -> Self {
        self.options.activate = activate;
        self
    }

    /// Set the validation policy.
    pub fn validation(mut self, policy: ValidationPolicy) -> Self {
        self.options.validation = policy;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the program on `context`.
    pub fn build<C: GraphicsContext>(&self, context: &mut C) -> Result<LinkedProgram<C>> {
        link_with_options(context, &self.vertex, &self.fragment, &self.options)
    }

    /// Build the program as a trial run and delete every object it created.
    ///
    /// The current program is left alone regardless of `activate`. Returns the
    /// validation outcome on success.
    pub fn check<C: GraphicsContext>(&self, context: &mut C) -> Result<ValidationReport> {
        let options = self.options.clone().with_activate(false);
        let mut scratch = Scratch::new(context);
        let result = link_with_options(&mut scratch, &self.vertex, &self.fragment, &options)
            .map(|program| program.validation().clone());
        scratch.release();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_shaders;
    use crate::testing::{Call, TestContext, TestProgram, TestShader, TestUniformLocation};
    use shade_core::{ContextError, DiagnosticKind, ShaderStage};

    const VERTEX: &str = "void main(){gl_Position=vec4(0.0);}";
    const FRAGMENT: &str = "void main(){gl_FragColor=vec4(1.0);}";
    const FRAGMENT_TYPO: &str = "void main(){gl_FragColor=undefinedVar;}";

    fn sources() -> (ShaderSource, ShaderSource) {
        (ShaderSource::vertex(VERTEX), ShaderSource::fragment(FRAGMENT))
    }

    #[test]
    fn test_link_success_activates_program() {
        let mut gl = TestContext::new();
        let (vs, fs) = sources();
        let program = link(&mut gl, &vs, &fs).unwrap();

        assert_eq!(*program.handle(), TestProgram(0));
        assert_eq!(gl.current_program(), Some(TestProgram(0)));
        assert!(program.validation().passed);
        assert_eq!(program.shaders().len(), 2);
        assert_eq!(program.shaders()[0].stage(), ShaderStage::Vertex);
        assert_eq!(program.shaders()[1].stage(), ShaderStage::Fragment);
    }

    #[test]
    fn test_link_step_order() {
        let mut gl = TestContext::new();
        let (vs, fs) = sources();
        link(&mut gl, &vs, &fs).unwrap();

        assert_eq!(
            gl.calls(),
            &[
                Call::CreateShader(ShaderStage::Vertex),
                Call::ShaderSource(TestShader(0)),
                Call::CompileShader(TestShader(0)),
                Call::CreateShader(ShaderStage::Fragment),
                Call::ShaderSource(TestShader(1)),
                Call::CompileShader(TestShader(1)),
                Call::CreateProgram,
                Call::AttachShader(TestProgram(0), TestShader(0)),
                Call::AttachShader(TestProgram(0), TestShader(1)),
                Call::LinkProgram(TestProgram(0)),
                Call::ValidateProgram(TestProgram(0)),
                Call::UseProgram(Some(TestProgram(0))),
            ]
        );
        assert_eq!(
            gl.attached_stages(TestProgram(0)),
            vec![ShaderStage::Vertex, ShaderStage::Fragment]
        );
    }

    #[test]
    fn test_vertex_failure_skips_fragment() {
        let mut gl = TestContext::new().reject_identifier("badVertexVar");
        let vs = ShaderSource::vertex("void main(){gl_Position=badVertexVar;}");
        let fs = ShaderSource::fragment(FRAGMENT);
        let err = link(&mut gl, &vs, &fs).unwrap_err();

        assert_eq!(err.kind(), DiagnosticKind::Compile);
        assert_eq!(err.stage(), Some(ShaderStage::Vertex));
        assert_eq!(gl.shader_count(), 1);
        assert_eq!(gl.program_count(), 0);
        assert!(!gl.calls().contains(&Call::CreateShader(ShaderStage::Fragment)));
        assert_eq!(gl.current_program(), None);
    }

    #[test]
    fn test_fragment_typo_is_compile_error() {
        let mut gl = TestContext::new().reject_identifier("undefinedVar");
        let err = init_shaders(&mut gl, VERTEX, FRAGMENT_TYPO).unwrap_err();

        assert_eq!(err.kind(), DiagnosticKind::Compile);
        assert_eq!(err.stage(), Some(ShaderStage::Fragment));
        assert!(err.to_string().contains("Shader compilation failed"));
        assert_eq!(
            err.source_dump(),
            Some("  1 void main(){gl_FragColor=undefinedVar;}")
        );
        assert_eq!(gl.program_count(), 0);
        assert_eq!(gl.current_program(), None);

        insta::assert_snapshot!("fragment_typo_diagnostic", err.to_string());
    }

    #[test]
    fn test_link_failure() {
        let mut gl = TestContext::new().with_link_error("Varyings are not matched: vColor");
        let (vs, fs) = sources();
        let err = link(&mut gl, &vs, &fs).unwrap_err();

        assert_eq!(
            err,
            BuildError::Link {
                log: "Varyings are not matched: vColor".to_string()
            }
        );
        assert_eq!(err.to_string(), "Program link failed\n\nVaryings are not matched: vColor");
        assert_eq!(err.source_dump(), None);
        assert_eq!(gl.current_program(), None);
        // validation still ran before the link status was checked
        assert!(gl.calls().contains(&Call::ValidateProgram(TestProgram(0))));
    }

    #[test]
    fn test_validation_failure_keeps_program_unless_denied() {
        for policy in [ValidationPolicy::Warn, ValidationPolicy::Ignore] {
            let mut gl = TestContext::new().with_validation_error("sampler type mismatch");
            let program = ProgramBuilder::new(VERTEX, FRAGMENT)
                .validation(policy)
                .build(&mut gl)
                .unwrap();

            assert!(!program.validation().passed);
            assert_eq!(program.validation().log, "sampler type mismatch");
            assert_eq!(gl.current_program(), Some(TestProgram(0)));
        }
    }

    #[test]
    fn test_validation_deny_fails_build() {
        let mut gl = TestContext::new().with_validation_error("sampler type mismatch");
        let err = ProgramBuilder::new(VERTEX, FRAGMENT)
            .validation(ValidationPolicy::Deny)
            .build(&mut gl)
            .unwrap_err();

        assert_eq!(err.kind(), DiagnosticKind::Validation);
        assert_eq!(
            err.to_string(),
            "Program validation failed\n\nsampler type mismatch"
        );
        assert_eq!(gl.current_program(), None);
    }

    #[test]
    fn test_program_creation_failure() {
        let mut gl = TestContext::new().with_program_creation_error("out of memory");
        let (vs, fs) = sources();
        let err = link(&mut gl, &vs, &fs).unwrap_err();

        assert_eq!(
            err,
            BuildError::Context(ContextError::ProgramCreation {
                reason: "out of memory".to_string()
            })
        );
    }

    #[test]
    fn test_build_without_activation_then_switch() {
        let mut gl = TestContext::new();
        let first = ProgramBuilder::new(VERTEX, FRAGMENT)
            .activate(false)
            .build(&mut gl)
            .unwrap();
        let second = ProgramBuilder::new(VERTEX, FRAGMENT)
            .activate(false)
            .build(&mut gl)
            .unwrap();

        assert_eq!(gl.current_program(), None);

        second.activate(&mut gl);
        assert_eq!(gl.current_program(), Some(*second.handle()));
        first.activate(&mut gl);
        assert_eq!(gl.current_program(), Some(*first.handle()));
    }

    #[test]
    fn test_locations_after_link() {
        let vertex = "attribute vec2 aPosition;\n\
                      attribute vec3 aColor;\n\
                      uniform mat4 uModelMatrix;\n\
                      varying vec3 vColor;\n\
                      void main() { vColor = aColor; gl_Position = uModelMatrix * vec4(aPosition, 0.0, 1.0); }";
        let fragment = "precision mediump float;\n\
                        varying vec3 vColor;\n\
                        uniform float uScale;\n\
                        void main() { gl_FragColor = vec4(vColor * uScale, 1.0); }";
        let mut gl = TestContext::new();
        let program = init_shaders(&mut gl, vertex, fragment).unwrap();

        assert_eq!(program.attribute_location(&gl, "aPosition"), Some(0));
        assert_eq!(program.attribute_location(&gl, "aColor"), Some(1));
        assert_eq!(program.attribute_location(&gl, "aNormal"), None);
        assert_eq!(
            program.uniform_location(&gl, "uScale"),
            Some(TestUniformLocation {
                program: TestProgram(0),
                index: 1
            })
        );
    }

    #[test]
    fn test_link_is_repeatable_on_fresh_contexts() {
        let (vs, fs) = sources();
        let mut first_gl = TestContext::new();
        let mut second_gl = TestContext::new();

        let first = link(&mut first_gl, &vs, &fs).unwrap();
        let second = link(&mut second_gl, &vs, &fs).unwrap();

        assert_eq!(first.handle(), second.handle());
        assert_eq!(first_gl.calls(), second_gl.calls());
    }

    #[test]
    fn test_builder_options() {
        let options = BuildOptions::new().with_activate(false);
        let builder = ProgramBuilder::new(VERTEX, FRAGMENT).with_options(options.clone());
        assert_eq!(builder.options(), &options);
    }

    #[test]
    fn test_check_releases_everything_on_success() {
        let mut gl = TestContext::new();
        let report = ProgramBuilder::new(VERTEX, FRAGMENT).check(&mut gl).unwrap();

        assert!(report.passed);
        assert_eq!(gl.shader_count(), 2);
        assert_eq!(gl.program_count(), 1);
        assert_eq!(gl.live_shader_count(), 0);
        assert_eq!(gl.live_program_count(), 0);
        assert_eq!(gl.current_program(), None);
        assert!(!gl.calls().iter().any(|c| matches!(c, Call::UseProgram(_))));
    }

    #[test]
    fn test_check_releases_compiled_shaders_on_failure() {
        let mut gl = TestContext::new().reject_identifier("undefinedVar");
        let err = ProgramBuilder::new(VERTEX, FRAGMENT_TYPO)
            .check(&mut gl)
            .unwrap_err();

        assert_eq!(err.kind(), DiagnosticKind::Compile);
        assert_eq!(err.stage(), Some(ShaderStage::Fragment));
        assert_eq!(gl.shader_count(), 2);
        assert_eq!(gl.live_shader_count(), 0);
        assert_eq!(gl.program_count(), 0);
    }

    #[test]
    fn test_check_releases_program_on_link_failure() {
        let mut gl = TestContext::new().with_link_error("Varyings are not matched");
        let err = ProgramBuilder::new(VERTEX, FRAGMENT)
            .check(&mut gl)
            .unwrap_err();

        assert_eq!(err.kind(), DiagnosticKind::Link);
        assert_eq!(gl.live_program_count(), 0);
        assert_eq!(gl.live_shader_count(), 0);
        let tail = &gl.calls()[gl.calls().len() - 3..];
        assert_eq!(
            tail,
            &[
                Call::DeleteProgram(TestProgram(0)),
                Call::DeleteShader(TestShader(0)),
                Call::DeleteShader(TestShader(1)),
            ]
        );
    }

    #[test]
    fn test_check_keeps_current_program() {
        let mut gl = TestContext::new();
        let program = init_shaders(&mut gl, VERTEX, FRAGMENT).unwrap();
        ProgramBuilder::new(VERTEX, FRAGMENT).check(&mut gl).unwrap();

        assert_eq!(gl.current_program(), Some(*program.handle()));
        assert_eq!(gl.live_program_count(), 1);
        assert_eq!(gl.live_shader_count(), 2);
    }

    #[test]
    fn test_delete_linked_program() {
        let mut gl = TestContext::new();
        let program = init_shaders(&mut gl, VERTEX, FRAGMENT).unwrap();
        program.delete(&mut gl);

        assert_eq!(gl.live_program_count(), 0);
        assert_eq!(gl.live_shader_count(), 0);
    }
}
