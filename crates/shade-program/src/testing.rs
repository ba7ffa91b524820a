//! In-memory graphics context for tests and benchmarks.
//!
//! [`TestContext`] records every state-changing call and fakes just enough of
//! a GLSL toolchain to exercise the builder: shaders compile unless they use a
//! rejected identifier, links fail on demand, and attribute/uniform locations
//! are assigned from declarations in the linked sources.

use shade_core::{ContextError, GraphicsContext, ShaderStage};

/// Shader object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestShader(pub u32);

/// Program object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestProgram(pub u32);

/// Uniform location handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestUniformLocation {
    pub program: TestProgram,
    pub index: u32,
}

/// State-changing calls, in the order they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateShader(ShaderStage),
    ShaderSource(TestShader),
    CompileShader(TestShader),
    DeleteShader(TestShader),
    CreateProgram,
    AttachShader(TestProgram, TestShader),
    LinkProgram(TestProgram),
    ValidateProgram(TestProgram),
    DeleteProgram(TestProgram),
    UseProgram(Option<TestProgram>),
}

#[derive(Debug, Clone)]
struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    deleted: bool,
    log: String,
}

#[derive(Debug, Clone, Default)]
struct ProgramState {
    attached: Vec<TestShader>,
    linked: bool,
    validated: bool,
    deleted: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

/// Recording graphics context.
#[derive(Debug, Clone, Default)]
pub struct TestContext {
    calls: Vec<Call>,
    shaders: Vec<ShaderState>,
    programs: Vec<ProgramState>,
    current: Option<TestProgram>,
    rejected_identifiers: Vec<String>,
    compile_warning: Option<String>,
    link_error: Option<String>,
    validation_error: Option<String>,
    shader_creation_error: Option<String>,
    program_creation_error: Option<String>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail compilation of any shader that mentions `identifier`, like an
    /// undeclared variable would.
    pub fn reject_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.rejected_identifiers.push(identifier.into());
        self
    }

    /// Report `log` from successful compilations.
    pub fn with_compile_warning(mut self, log: impl Into<String>) -> Self {
        self.compile_warning = Some(log.into());
        self
    }

    /// Fail every link with `log`.
    pub fn with_link_error(mut self, log: impl Into<String>) -> Self {
        self.link_error = Some(log.into());
        self
    }

    /// Fail every validation with `log`.
    pub fn with_validation_error(mut self, log: impl Into<String>) -> Self {
        self.validation_error = Some(log.into());
        self
    }

    /// Refuse to create shader objects.
    pub fn with_shader_creation_error(mut self, reason: impl Into<String>) -> Self {
        self.shader_creation_error = Some(reason.into());
        self
    }

    /// Refuse to create program objects.
    pub fn with_program_creation_error(mut self, reason: impl Into<String>) -> Self {
        self.program_creation_error = Some(reason.into());
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn current_program(&self) -> Option<TestProgram> {
        self.current
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Shaders created and not yet deleted.
    pub fn live_shader_count(&self) -> usize {
        self.shaders.iter().filter(|s| !s.deleted).count()
    }

    /// Programs created and not yet deleted.
    pub fn live_program_count(&self) -> usize {
        self.programs.iter().filter(|p| !p.deleted).count()
    }

    /// Stages of the shaders attached to `program`, in attach order.
    pub fn attached_stages(&self, program: TestProgram) -> Vec<ShaderStage> {
        self.program(program)
            .attached
            .iter()
            .map(|shader| self.shader(*shader).stage)
            .collect()
    }

    fn shader(&self, shader: TestShader) -> &ShaderState {
        &self.shaders[shader.0 as usize]
    }

    fn shader_mut(&mut self, shader: TestShader) -> &mut ShaderState {
        &mut self.shaders[shader.0 as usize]
    }

    fn program(&self, program: TestProgram) -> &ProgramState {
        &self.programs[program.0 as usize]
    }

    fn program_mut(&mut self, program: TestProgram) -> &mut ProgramState {
        &mut self.programs[program.0 as usize]
    }

    /// ANGLE-style log with one line per use of a rejected identifier.
    fn compile_errors(&self, source: &str) -> Option<String> {
        let mut log = String::new();
        for (i, line) in source.split('\n').enumerate() {
            for identifier in &self.rejected_identifiers {
                if line.contains(identifier.as_str()) {
                    log.push_str(&format!(
                        "ERROR: 0:{}: '{}' : undeclared identifier\n",
                        i + 1,
                        identifier
                    ));
                }
            }
        }
        (!log.is_empty()).then_some(log)
    }
}

/// Names declared with one of `qualifiers`, e.g. `attribute vec2 aPosition;`.
fn declared_names(source: &str, qualifiers: &[&str]) -> Vec<String> {
    source
        .split(';')
        .filter_map(|statement| {
            let words: Vec<&str> = statement.split_whitespace().collect();
            let qualifier = words.iter().position(|w| qualifiers.contains(w))?;
            // qualifier [precision] type name
            let name = words.last()?;
            (words.len() > qualifier + 2).then(|| name.to_string())
        })
        .collect()
}

impl GraphicsContext for TestContext {
    type Shader = TestShader;
    type Program = TestProgram;
    type UniformLocation = TestUniformLocation;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<TestShader, ContextError> {
        self.calls.push(Call::CreateShader(stage));
        if let Some(reason) = &self.shader_creation_error {
            return Err(ContextError::ShaderCreation {
                stage,
                reason: reason.clone(),
            });
        }
        self.shaders.push(ShaderState {
            stage,
            source: String::new(),
            compiled: false,
            deleted: false,
            log: String::new(),
        });
        Ok(TestShader(self.shaders.len() as u32 - 1))
    }

    fn shader_source(&mut self, shader: &TestShader, source: &str) {
        self.calls.push(Call::ShaderSource(*shader));
        self.shader_mut(*shader).source = source.to_string();
    }

    fn compile_shader(&mut self, shader: &TestShader) {
        self.calls.push(Call::CompileShader(*shader));
        let errors = self.compile_errors(&self.shader(*shader).source);
        let warning = self.compile_warning.clone();
        let state = self.shader_mut(*shader);
        match errors {
            Some(log) => {
                state.compiled = false;
                state.log = log;
            }
            None => {
                state.compiled = true;
                state.log = warning.unwrap_or_default();
            }
        }
    }

    fn shader_compile_status(&self, shader: &TestShader) -> bool {
        self.shader(*shader).compiled
    }

    fn shader_info_log(&self, shader: &TestShader) -> String {
        self.shader(*shader).log.clone()
    }

    fn create_program(&mut self) -> Result<TestProgram, ContextError> {
        self.calls.push(Call::CreateProgram);
        if let Some(reason) = &self.program_creation_error {
            return Err(ContextError::ProgramCreation {
                reason: reason.clone(),
            });
        }
        self.programs.push(ProgramState::default());
        Ok(TestProgram(self.programs.len() as u32 - 1))
    }

    fn delete_shader(&mut self, shader: &TestShader) {
        self.calls.push(Call::DeleteShader(*shader));
        self.shader_mut(*shader).deleted = true;
    }

    fn attach_shader(&mut self, program: &TestProgram, shader: &TestShader) {
        self.calls.push(Call::AttachShader(*program, *shader));
        self.program_mut(*program).attached.push(*shader);
    }

    fn link_program(&mut self, program: &TestProgram) {
        self.calls.push(Call::LinkProgram(*program));

        let attached = self.program(*program).attached.clone();
        let all_compiled = attached.iter().all(|s| self.shader(*s).compiled);
        let has_both = ShaderStage::ALL
            .iter()
            .all(|stage| attached.iter().any(|s| self.shader(*s).stage == *stage));

        let failure = if !all_compiled {
            Some("One or more attached shaders not successfully compiled".to_string())
        } else if !has_both {
            Some("Missing vertex or fragment shader".to_string())
        } else {
            self.link_error.clone()
        };

        let mut attributes = Vec::new();
        let mut uniforms = Vec::new();
        for shader in &attached {
            let state = self.shader(*shader);
            if state.stage == ShaderStage::Vertex {
                attributes.extend(declared_names(&state.source, &["attribute", "in"]));
            }
            for name in declared_names(&state.source, &["uniform"]) {
                if !uniforms.contains(&name) {
                    uniforms.push(name);
                }
            }
        }

        let state = self.program_mut(*program);
        state.linked = failure.is_none();
        state.log = failure.unwrap_or_default();
        if state.linked {
            state.attributes = attributes;
            state.uniforms = uniforms;
        }
    }

    fn validate_program(&mut self, program: &TestProgram) {
        self.calls.push(Call::ValidateProgram(*program));
        let error = self.validation_error.clone();
        let state = self.program_mut(*program);
        match error {
            Some(log) if state.linked => {
                state.validated = false;
                state.log = log;
            }
            _ => state.validated = state.linked,
        }
    }

    fn program_link_status(&self, program: &TestProgram) -> bool {
        self.program(*program).linked
    }

    fn program_validate_status(&self, program: &TestProgram) -> bool {
        self.program(*program).validated
    }

    fn program_info_log(&self, program: &TestProgram) -> String {
        self.program(*program).log.clone()
    }

    fn delete_program(&mut self, program: &TestProgram) {
        self.calls.push(Call::DeleteProgram(*program));
        self.program_mut(*program).deleted = true;
    }

    fn set_current_program(&mut self, program: Option<&TestProgram>) {
        self.calls.push(Call::UseProgram(program.copied()));
        self.current = program.copied();
    }

    fn attribute_location(&self, program: &TestProgram, name: &str) -> Option<u32> {
        self.program(*program)
            .attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn uniform_location(&self, program: &TestProgram, name: &str) -> Option<TestUniformLocation> {
        self.program(*program)
            .uniforms
            .iter()
            .position(|u| u == name)
            .map(|i| TestUniformLocation {
                program: *program,
                index: i as u32,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_names() {
        let src = "precision mediump float;\n\
                   attribute vec2 aPosition;\n\
                   attribute vec3 aColor;\n\
                   uniform mat4 uModelMatrix;\n\
                   uniform lowp float uScale;\n\
                   void main() {}";

        assert_eq!(declared_names(src, &["attribute"]), vec!["aPosition", "aColor"]);
        assert_eq!(declared_names(src, &["uniform"]), vec!["uModelMatrix", "uScale"]);
    }

    #[test]
    fn test_rejected_identifier_log_names_line() {
        let mut gl = TestContext::new().reject_identifier("undefinedVar");
        let shader = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(&shader, "void main() {\n  gl_FragColor = undefinedVar;\n}");
        gl.compile_shader(&shader);

        assert!(!gl.shader_compile_status(&shader));
        assert_eq!(
            gl.shader_info_log(&shader),
            "ERROR: 0:2: 'undefinedVar' : undeclared identifier\n"
        );
    }
}
