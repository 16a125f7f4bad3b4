//! Shader stage compilation and program linking
//!
//! Stages are parsed and validated with naga before any GPU object exists, so a
//! bad source is caught (and logged with its diagnostic) instead of tripping
//! wgpu's device error handler. Linking yields a [`ProgramState`] that is
//! checked before every draw.

use std::fmt;

use glam::Vec3;

use crate::scene::params::*;

use super::fireball_pipeline::Globals;
use super::quad::QUAD_POSITION_LOCATION;

/// Vertex entry point name
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point name
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Full-screen quad vertex stage
pub const VERTEX_SOURCE: &str = include_str!("shaders/fireball_vert.wgsl");
/// Fragment stage body; needs the constant prelude from [`scene_constants_wgsl`]
const FRAGMENT_BODY: &str = include_str!("shaders/fireball_frag.wgsl");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn entry_point(self) -> &'static str {
        match self {
            StageKind::Vertex => VERTEX_ENTRY,
            StageKind::Fragment => FRAGMENT_ENTRY,
        }
    }

    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// A stage that failed to compile
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader `{label}` failed to parse:\n{diagnostic}")]
    Parse {
        stage: StageKind,
        label: String,
        diagnostic: String,
    },
    #[error("{stage} shader `{label}` failed validation:\n{diagnostic}")]
    Validation {
        stage: StageKind,
        label: String,
        diagnostic: String,
    },
}

/// Why two stages could not be linked
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("{0} stage is missing")]
    MissingStage(StageKind),
    #[error("expected a {expected} stage, got {found} stage `{label}`")]
    WrongStage {
        expected: StageKind,
        found: StageKind,
        label: String,
    },
    #[error("{stage} stage `{label}` has no {stage} entry point `{entry_point}`")]
    MissingEntryPoint {
        stage: StageKind,
        label: String,
        entry_point: &'static str,
    },
    #[error("stage interface mismatch at @location({location}): {detail}")]
    InterfaceMismatch { location: u32, detail: String },
    #[error("resource @group({group}) @binding({binding}) in `{label}` does not match the globals layout: {detail}")]
    ResourceMismatch {
        label: String,
        group: u32,
        binding: u32,
        detail: String,
    },
    #[error("pipeline creation failed: {0}")]
    Pipeline(String),
}

/// A parsed and validated WGSL stage
#[derive(Debug)]
pub struct CompiledStage {
    kind: StageKind,
    label: String,
    source: String,
    module: naga::Module,
}

impl CompiledStage {
    pub fn compile(
        kind: StageKind,
        label: &str,
        source: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let source = source.into();

        let module =
            naga::front::wgsl::parse_str(&source).map_err(|e| ShaderError::Parse {
                stage: kind,
                label: label.to_string(),
                diagnostic: e.emit_to_string(&source),
            })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        validator
            .validate(&module)
            .map_err(|e| ShaderError::Validation {
                stage: kind,
                label: label.to_string(),
                diagnostic: e.emit_to_string(&source),
            })?;

        Ok(Self {
            kind,
            label: label.to_string(),
            source,
            module,
        })
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn entry_point(&self) -> Option<&naga::EntryPoint> {
        let name = self.kind.entry_point();
        let stage = self.kind.naga_stage();
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage)
    }

    /// `@location` inputs of the entry point with their types
    fn inputs(&self) -> Vec<(u32, naga::TypeInner)> {
        let mut out = Vec::new();
        if let Some(ep) = self.entry_point() {
            for arg in &ep.function.arguments {
                self.collect_locations(arg.ty, arg.binding.as_ref(), &mut out);
            }
        }
        out
    }

    /// `@location` outputs of the entry point with their types
    fn outputs(&self) -> Vec<(u32, naga::TypeInner)> {
        let mut out = Vec::new();
        if let Some(result) = self.entry_point().and_then(|ep| ep.function.result.as_ref()) {
            self.collect_locations(result.ty, result.binding.as_ref(), &mut out);
        }
        out
    }

    // Unbound values are structs whose members carry the bindings
    fn collect_locations(
        &self,
        ty: naga::Handle<naga::Type>,
        binding: Option<&naga::Binding>,
        out: &mut Vec<(u32, naga::TypeInner)>,
    ) {
        match binding {
            Some(naga::Binding::Location { location, .. }) => {
                out.push((*location, self.module.types[ty].inner.clone()));
            }
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &self.module.types[ty].inner {
                    for member in members {
                        self.collect_locations(member.ty, member.binding.as_ref(), out);
                    }
                }
            }
        }
    }

    /// Every bound resource must be the fragment-visible `Globals` uniform
    fn check_resources(&self) -> Result<(), ProgramError> {
        let globals_size = std::mem::size_of::<Globals>() as u32;
        for (_, var) in self.module.global_variables.iter() {
            let Some(rb) = &var.binding else {
                continue;
            };
            let mismatch = |detail: String| ProgramError::ResourceMismatch {
                label: self.label.clone(),
                group: rb.group,
                binding: rb.binding,
                detail,
            };
            if self.kind != StageKind::Fragment {
                return Err(mismatch(format!(
                    "only the fragment stage binds resources, found one in the {} stage",
                    self.kind
                )));
            }
            if (rb.group, rb.binding) != (0, 0) {
                return Err(mismatch("only @group(0) @binding(0) is bound".to_string()));
            }
            if var.space != naga::AddressSpace::Uniform {
                return Err(mismatch(format!("expected a uniform, found {:?}", var.space)));
            }
            match &self.module.types[var.ty].inner {
                naga::TypeInner::Struct { span, .. } if *span == globals_size => {}
                naga::TypeInner::Struct { span, .. } => {
                    return Err(mismatch(format!("expected {globals_size} bytes, found {span}")));
                }
                other => return Err(mismatch(format!("expected a struct, found {other:?}"))),
            }
        }
        Ok(())
    }
}

/// Compile one stage, logging the diagnostic and returning `None` on failure
pub fn compile_stage(
    kind: StageKind,
    label: &str,
    source: impl Into<String>,
) -> Option<CompiledStage> {
    match CompiledStage::compile(kind, label, source) {
        Ok(stage) => {
            log::info!("Compiled {} shader `{}`", kind, label);
            Some(stage)
        }
        Err(e) => {
            log::error!("{e}");
            None
        }
    }
}

/// A vertex and a fragment stage that fit together
#[derive(Debug)]
pub struct LinkedProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
}

impl LinkedProgram {
    pub fn vertex(&self) -> &CompiledStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledStage {
        &self.fragment
    }
}

/// Outcome of linking; an unusable program must never be drawn with
#[derive(Debug)]
pub enum ProgramState {
    Linked(LinkedProgram),
    Unusable(ProgramError),
}

fn check_stage(
    stage: Option<CompiledStage>,
    expected: StageKind,
) -> Result<CompiledStage, ProgramError> {
    let stage = stage.ok_or(ProgramError::MissingStage(expected))?;
    if stage.kind != expected {
        return Err(ProgramError::WrongStage {
            expected,
            found: stage.kind,
            label: stage.label,
        });
    }
    if stage.entry_point().is_none() {
        return Err(ProgramError::MissingEntryPoint {
            stage: expected,
            label: stage.label,
            entry_point: expected.entry_point(),
        });
    }
    stage.check_resources()?;
    Ok(stage)
}

/// The quad feeds the vertex stage and the vertex stage feeds every fragment input
fn check_interface(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<(), ProgramError> {
    let position = naga::TypeInner::Vector {
        size: naga::VectorSize::Bi,
        scalar: naga::Scalar::F32,
    };
    for (location, ty) in vertex.inputs() {
        if location != QUAD_POSITION_LOCATION {
            return Err(ProgramError::InterfaceMismatch {
                location,
                detail: format!("`{}` reads an attribute the quad buffer does not provide", vertex.label),
            });
        }
        if ty != position {
            return Err(ProgramError::InterfaceMismatch {
                location,
                detail: format!("`{}` reads {ty:?}, the quad buffer provides vec2<f32>", vertex.label),
            });
        }
    }

    let written = vertex.outputs();
    for (location, ty) in fragment.inputs() {
        match written.iter().find(|(l, _)| *l == location) {
            None => {
                return Err(ProgramError::InterfaceMismatch {
                    location,
                    detail: format!("`{}` never writes it", vertex.label),
                });
            }
            Some((_, out_ty)) if *out_ty != ty => {
                return Err(ProgramError::InterfaceMismatch {
                    location,
                    detail: format!(
                        "`{}` writes {out_ty:?}, `{}` reads {ty:?}",
                        vertex.label, fragment.label
                    ),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Link two (possibly failed) stages into a program
pub fn link_program(
    vertex: Option<CompiledStage>,
    fragment: Option<CompiledStage>,
) -> ProgramState {
    let linked = check_stage(vertex, StageKind::Vertex).and_then(|vertex| {
        let fragment = check_stage(fragment, StageKind::Fragment)?;
        check_interface(&vertex, &fragment)?;
        Ok(LinkedProgram { vertex, fragment })
    });

    match linked {
        Ok(program) => {
            log::info!(
                "Linked shader program ({} + {})",
                program.vertex.label,
                program.fragment.label
            );
            ProgramState::Linked(program)
        }
        Err(e) => {
            log::error!("Shader program link failed: {e}");
            ProgramState::Unusable(e)
        }
    }
}

// ============================================================================
// FIREBALL SOURCES
// ============================================================================

fn wgsl_f32(name: &str, value: f32) -> String {
    // Debug formatting always keeps a decimal point or exponent
    format!("const {name}: f32 = {value:?};\n")
}

fn wgsl_vec3(name: &str, v: Vec3) -> String {
    format!(
        "const {name}: vec3<f32> = vec3<f32>({:?}, {:?}, {:?});\n",
        v.x, v.y, v.z
    )
}

/// WGSL `const` declarations for every scene parameter
pub fn scene_constants_wgsl() -> String {
    let mut out = String::from("// Generated from scene::params\n");
    out.push_str(&wgsl_vec3("CAMERA_POS", CAMERA_POS));
    out.push_str(&wgsl_f32("FOCAL_LENGTH", FOCAL_LENGTH));
    out.push_str(&format!("const MAX_STEPS: u32 = {MAX_STEPS}u;\n"));
    out.push_str(&wgsl_f32("HIT_EPSILON", HIT_EPSILON));
    out.push_str(&wgsl_f32("MAX_DISTANCE", MAX_DISTANCE));
    out.push_str(&wgsl_f32("MISS_DISTANCE", MISS_DISTANCE));
    out.push_str(&wgsl_f32("NORMAL_EPSILON", NORMAL_EPSILON));

    out.push_str(&wgsl_f32("BASE_RADIUS", BASE_RADIUS));
    out.push_str(&wgsl_f32("PULSE_AMPLITUDE", PULSE_AMPLITUDE));
    out.push_str(&wgsl_f32("PULSE_FREQUENCY", PULSE_FREQUENCY));
    out.push_str(&wgsl_f32("GROWTH_RATE", GROWTH_RATE));
    out.push_str(&wgsl_f32("MAX_GROWTH", MAX_GROWTH));
    out.push_str(&wgsl_f32("STEM_SCALE", STEM_SCALE));
    out.push_str(&wgsl_f32("CAP_HEIGHT", CAP_HEIGHT));
    out.push_str(&wgsl_f32("NOISE_SCALE", NOISE_SCALE));
    out.push_str(&wgsl_f32("NOISE_SPEED", NOISE_SPEED));
    out.push_str(&wgsl_f32("NOISE_AMPLITUDE", NOISE_AMPLITUDE));

    out.push_str(&wgsl_vec3("LIGHT_DIR", LIGHT_DIR));
    out.push_str(&wgsl_f32("AMBIENT", AMBIENT));
    out.push_str(&wgsl_f32("HEAT_SPREAD", HEAT_SPREAD));
    out.push_str(&wgsl_vec3("HEAT_RED", HEAT_RED));
    out.push_str(&wgsl_vec3("HEAT_ORANGE", HEAT_ORANGE));
    out.push_str(&wgsl_vec3("HEAT_YELLOW", HEAT_YELLOW));
    out.push_str(&wgsl_vec3("HEAT_WHITE", HEAT_WHITE));
    out.push_str(&wgsl_f32("GLOW_STRENGTH", GLOW_STRENGTH));
    out.push_str(&wgsl_f32("GLOW_FALLOFF", GLOW_FALLOFF));
    out.push_str(&wgsl_vec3("GLOW_COLOR", GLOW_COLOR));
    out.push_str(&wgsl_f32("SHOCK_PERIOD", SHOCK_PERIOD));
    out.push_str(&wgsl_f32("SHOCK_MAX_RADIUS", SHOCK_MAX_RADIUS));
    out.push_str(&wgsl_f32("SHOCK_SHARPNESS", SHOCK_SHARPNESS));
    out.push_str(&wgsl_f32("SHOCK_STRENGTH", SHOCK_STRENGTH));
    out.push_str(&wgsl_vec3("SHOCK_COLOR", SHOCK_COLOR));
    out
}

/// Complete fragment stage source
pub fn fragment_source() -> String {
    format!("{}\n{}", scene_constants_wgsl(), FRAGMENT_BODY)
}

/// Compile both fireball stages and link them
pub fn build_fireball_program() -> ProgramState {
    let vertex = compile_stage(StageKind::Vertex, "fireball_vert", VERTEX_SOURCE);
    let fragment = compile_stage(StageKind::Fragment, "fireball_frag", fragment_source());
    link_program(vertex, fragment)
}
