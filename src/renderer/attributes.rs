use log::debug;

use crate::renderer::backend::GraphicsBackend;

/// The vertex attribute semantics the renderer binds. Others are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    TexCoord0,
}

impl Semantic {
    pub const ALL: [Semantic; 3] = [Semantic::Position, Semantic::Normal, Semantic::TexCoord0];

    pub fn from_name(name: &str) -> Option<Semantic> {
        match name {
            "POSITION" => Some(Semantic::Position),
            "NORMAL" => Some(Semantic::Normal),
            "TEXCOORD_0" => Some(Semantic::TexCoord0),
            _ => None,
        }
    }

    /// The attribute name used in glTF primitives.
    pub fn name(self) -> &'static str {
        match self {
            Semantic::Position => "POSITION",
            Semantic::Normal => "NORMAL",
            Semantic::TexCoord0 => "TEXCOORD_0",
        }
    }

    /// The name of the vertex shader input this semantic is fed into.
    pub fn shader_input(self) -> &'static str {
        match self {
            Semantic::Position => "in_vertex",
            Semantic::Normal => "in_normal",
            Semantic::TexCoord0 => "in_texcoord",
        }
    }

    fn index(self) -> usize {
        match self {
            Semantic::Position => 0,
            Semantic::Normal => 1,
            Semantic::TexCoord0 => 2,
        }
    }
}

/// Shader input slots of the active program, per semantic. Must be resolved
/// again whenever another program is made active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSlots {
    slots: [Option<u32>; 3],
}

impl AttributeSlots {
    pub fn resolve<B: GraphicsBackend>(backend: &B) -> AttributeSlots {
        let mut slots = [None; 3];
        for semantic in Semantic::ALL {
            let slot = backend.attribute_location(semantic.shader_input());
            match slot {
                Some(slot) => debug!("{} -> {} at slot {slot}", semantic.name(), semantic.shader_input()),
                None => debug!("{} is not used by the shader program", semantic.name()),
            }
            slots[semantic.index()] = slot;
        }
        AttributeSlots { slots }
    }

    /// None when the shader doesn't take the attribute, in which case it's
    /// not bound.
    pub fn slot(&self, semantic: Semantic) -> Option<u32> {
        self.slots[semantic.index()]
    }
}
