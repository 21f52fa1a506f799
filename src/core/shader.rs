//! WGSL compilation and uniform reflection.
//!
//! Sources are parsed and validated with naga before they ever reach the
//! device, so diagnostics come with line/column context and the uniform
//! layout can be read straight from the IR. Reflection covers the single
//! `var<uniform>` at `@group(0) @binding(0)` each program declares.

use crate::error::EffectError;
use fnv::FnvHashMap;
use naga::{AddressSpace, ArraySize, ScalarKind, ShaderStage, TypeInner};

/// A validated shader stage and its naga IR.
#[derive(Debug)]
pub struct CompiledShader {
    pub label: &'static str,
    pub stage: ShaderStage,
    pub entry_point: String,
    pub module: naga::Module,
}

pub fn compile(
    label: &'static str,
    source: &'static str,
    stage: ShaderStage,
) -> Result<CompiledShader, EffectError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_error(label, stage, e.emit_to_string(source)))?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| compile_error(label, stage, e.emit_to_string(source)))?;
    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage)
        .map(|ep| ep.name.clone())
        .ok_or_else(|| compile_error(label, stage, format!("no {:?} entry point", stage)))?;
    Ok(CompiledShader {
        label,
        stage,
        entry_point,
        module,
    })
}

fn compile_error(label: &str, stage: ShaderStage, diagnostic: String) -> EffectError {
    EffectError::Compile {
        label: label.to_string(),
        stage: format!("{:?}", stage).to_lowercase(),
        diagnostic,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scalar {
    F32,
    I32,
    U32,
}

/// Location of one value inside a program's uniform block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformHandle {
    pub offset: u32,
    pub scalar: Scalar,
    pub components: u32,
}

/// Name → handle map for one program. Array members `name: array<T, N>`
/// are stored as `name[0]` .. `name[N-1]`.
#[derive(Clone, Debug, Default)]
pub struct UniformTable {
    size: u32,
    handles: FnvHashMap<String, UniformHandle>,
}

impl UniformTable {
    pub fn extract(module: &naga::Module) -> Self {
        let mut table = Self::default();
        for (_, var) in module.global_variables.iter() {
            let is_block = var.space == AddressSpace::Uniform
                && var
                    .binding
                    .as_ref()
                    .is_some_and(|b| b.group == 0 && b.binding == 0);
            if !is_block {
                continue;
            }
            match &module.types[var.ty].inner {
                TypeInner::Struct { members, span } => {
                    table.size = table.size.max(*span);
                    for m in members {
                        let Some(name) = m.name.as_deref() else {
                            continue;
                        };
                        if name.starts_with('_') {
                            continue;
                        }
                        table.insert_member(module, name, m.ty, m.offset);
                    }
                }
                other => {
                    if let (Some(name), Some((scalar, components))) = (var.name.as_deref(), leaf(other)) {
                        table.size = table.size.max(components * 4);
                        table.handles.insert(
                            name.to_string(),
                            UniformHandle {
                                offset: 0,
                                scalar,
                                components,
                            },
                        );
                    }
                }
            }
        }
        table
    }

    /// Merges the tables of both stages of a program.
    pub fn for_program(vertex: &naga::Module, fragment: &naga::Module) -> Self {
        let mut table = Self::extract(vertex);
        let frag = Self::extract(fragment);
        table.size = table.size.max(frag.size);
        table.handles.extend(frag.handles);
        table
    }

    fn insert_member(&mut self, module: &naga::Module, name: &str, ty: naga::Handle<naga::Type>, offset: u32) {
        match &module.types[ty].inner {
            TypeInner::Array {
                base,
                size: ArraySize::Constant(len),
                stride,
            } => {
                let Some((scalar, components)) = leaf(&module.types[*base].inner) else {
                    return;
                };
                for i in 0..len.get() {
                    self.handles.insert(
                        format!("{}[{}]", name, i),
                        UniformHandle {
                            offset: offset + i * stride,
                            scalar,
                            components,
                        },
                    );
                }
            }
            other => {
                if let Some((scalar, components)) = leaf(other) {
                    self.handles.insert(
                        name.to_string(),
                        UniformHandle {
                            offset,
                            scalar,
                            components,
                        },
                    );
                }
            }
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<UniformHandle> {
        self.handles.get(name).copied()
    }

    pub fn require(&self, program: &str, name: &str) -> Result<UniformHandle, EffectError> {
        self.get(name).ok_or_else(|| EffectError::MissingUniform {
            program: program.to_string(),
            name: name.to_string(),
        })
    }

    /// Block size in bytes, padded to the 16-byte uniform alignment.
    pub fn size(&self) -> u32 {
        self.size.max(16).next_multiple_of(16)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn new_block(&self) -> UniformBlock {
        UniformBlock::new(self.size())
    }
}

fn leaf(inner: &TypeInner) -> Option<(Scalar, u32)> {
    match *inner {
        TypeInner::Scalar(s) => Some((scalar_of(s)?, 1)),
        TypeInner::Vector { size, scalar } => Some((scalar_of(scalar)?, size as u32)),
        _ => None,
    }
}

fn scalar_of(s: naga::Scalar) -> Option<Scalar> {
    if s.width != 4 {
        return None;
    }
    match s.kind {
        ScalarKind::Float => Some(Scalar::F32),
        ScalarKind::Sint => Some(Scalar::I32),
        ScalarKind::Uint => Some(Scalar::U32),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    F32(f32),
    I32(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl UniformValue {
    fn components(&self) -> ([f32; 4], usize) {
        match *self {
            UniformValue::F32(v) => ([v, 0.0, 0.0, 0.0], 1),
            UniformValue::I32(v) => ([v as f32, 0.0, 0.0, 0.0], 1),
            UniformValue::Vec2([x, y]) => ([x, y, 0.0, 0.0], 2),
            UniformValue::Vec3([x, y, z]) => ([x, y, z, 0.0], 3),
            UniformValue::Vec4(v) => (v, 4),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::F32(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::I32(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<glam::Vec2> for UniformValue {
    fn from(v: glam::Vec2) -> Self {
        UniformValue::Vec2(v.to_array())
    }
}

/// CPU copy of a uniform buffer; flushed to the GPU once per pass.
#[derive(Clone, Debug)]
pub struct UniformBlock {
    words: Vec<u32>,
}

impl UniformBlock {
    pub fn new(size_bytes: u32) -> Self {
        Self {
            words: vec![0; (size_bytes as usize).div_ceil(4)],
        }
    }

    /// Writes `value` into every component of the slot; components the
    /// value lacks are zeroed, extra ones are dropped.
    pub fn set(&mut self, handle: UniformHandle, value: impl Into<UniformValue>) {
        let value = value.into();
        let (comps, n) = value.components();
        let base = (handle.offset / 4) as usize;
        for c in 0..handle.components as usize {
            let v = if c < n { comps[c] } else { 0.0 };
            let word = match (handle.scalar, value) {
                (Scalar::I32, UniformValue::I32(i)) if c == 0 => i as u32,
                (Scalar::F32, _) => v.to_bits(),
                (Scalar::I32, _) => (v as i32) as u32,
                (Scalar::U32, _) => v.max(0.0) as u32,
            };
            self.words[base + c] = word;
        }
    }

    pub fn get_f32(&self, handle: UniformHandle) -> [f32; 4] {
        let base = (handle.offset / 4) as usize;
        let mut out = [0.0; 4];
        for (c, slot) in out.iter_mut().enumerate().take(handle.components as usize) {
            *slot = f32::from_bits(self.words[base + c]);
        }
        out
    }

    pub fn get_i32(&self, handle: UniformHandle) -> i32 {
        self.words[(handle.offset / 4) as usize] as i32
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Overwrites every word; used by tests to detect unwritten slots.
    pub fn fill(&mut self, word: u32) {
        self.words.fill(word);
    }
}
