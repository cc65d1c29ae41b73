//! Registry of the resource types an archive can declare.

/// Numeric resource type stored in bits 16..24 of a [`crate::types::LogicalRecord`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ResourceType {
    Invalid = 0,
    Mesh = 16,
    MeshFixups = 17,
    Skin = 18,
    Model = 24,
    Texture = 32,
    TextureBitmapData = 33,
    TextureMipBitmapData = 34,
    Material = 48,
    Shader = 49,
    Animation = 64,
    AnimationStream = 65,
    AnimationScr = 66,
    AnimationScrFixups = 67,
    Anm2Header = 68,
    Anm2Payload = 69,
    Anm2Fallback = 70,
    AnimGraphBank = 71,
    AnimGraphBankFixups = 72,
    AnimCustomResource = 73,
    AnimCustomResourceFixups = 74,
    GpuFx = 81,
    EnvprobeBin = 85,
    VoxelizerBin = 86,
    Area = 90,
    PrefabText = 96,
    Prefab = 97,
    PrefabFixups = 98,
    Sound = 101,
    Music = 102,
    Speech = 103,
    SfxStream = 104,
    SfxLocal = 105,
    VertexData = 240,
    IndexData = 241,
    GeometryData = 242,
    ClothData = 243,
    TinyObjects = 248,
    BuilderInformation = 255,
}

/// Static description of a [`ResourceType`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResourceTypeInfo {
    pub kind: ResourceType,
    /// Engine identifier, e.g. `EResType::Texture`
    pub name: &'static str,
    pub long_name: &'static str,
    pub short_name: &'static str,
    /// Human readable name, also used as the output directory
    pub display_name: &'static str,
    pub mem_category: u16,
    pub version: u16,
}

macro_rules! registry {
    ($((
        $kind:ident,
        $long:literal,
        $short:literal,
        $display:literal,
        $mem:literal,
        $version:literal
    )),+ $(,)?) => {
        const REGISTRY: &[ResourceTypeInfo] = &[
            $(ResourceTypeInfo {
                kind: ResourceType::$kind,
                name: concat!("EResType::", $display),
                long_name: $long,
                short_name: $short,
                display_name: $display,
                mem_category: $mem,
                version: $version,
            }),+
        ];
    };
}

registry! {
    (Invalid, "_INVALID_", "INVALID", "Invalid", 0, 1),
    (Mesh, "_MESH_", "MESH", "Mesh", 84, 60),
    (MeshFixups, "_MESH_FIXUPS_", "MESH_FIX", "MeshFixups", 84, 60),
    (Skin, "_SKIN_", "SKIN", "Skin", 85, 13),
    (Model, "_MODEL_", "MODEL", "Model", 83, 3),
    (Texture, "_TEXTURE_", "TEXTURE", "Texture", 109, 11),
    (TextureBitmapData, "_TEXTURE_BITMAP_DATA_", "BITMAP", "TextureBitmapData", 116, 11),
    (TextureMipBitmapData, "_TEXTURE_MIP_BITMAP_DATA_", "STRMBMP", "TextureMipBitmapData", 116, 11),
    (Material, "_MATERIAL_", "MATERIAL", "Material", 82, 13),
    (Shader, "_SHADER_", "SHADER", "Shader", 114, 13),
    (Animation, "_ANIMATION_", "ANIM", "Animation", 5, 4),
    (AnimationStream, "_ANIMATION_STREAM_", "ANIMSTRM", "AnimationStream", 5, 4),
    (AnimationScr, "_ANIMATION_SCR_", "ANIMSCR", "AnimationScr", 8, 4),
    (AnimationScrFixups, "_ANIMATION_SCRFIXUPS_", "ANIMSFIX", "AnimationScrFixups", 8, 4),
    (Anm2Header, "_ANM2_METADATA_", "ANM_META", "ANM2Header", 5, 2),
    (Anm2Payload, "_ANM2_PAYLOAD_", "ANM_DATA", "ANM2Payload", 5, 2),
    (Anm2Fallback, "_ANM2_FALLBACK_", "ANM_FLBK", "ANM2Fallback", 5, 2),
    (AnimGraphBank, "_ANIM_GRAPH_BANK_", "ANMGRAPH", "AnimGraphBank", 11, 140),
    (AnimGraphBankFixups, "_ANIM_GRAPH_BANK_FIXUPS_", "AGRPHFIX", "AnimGraphBankFixups", 11, 140),
    (AnimCustomResource, "_ANIM_CUSTOM_RESOURCE_", "ACSTMRES", "AnimCustomResource", 14, 4),
    (AnimCustomResourceFixups, "_ANIM_CUSTOM_RESOURCE_FIXUPS_", "ACRESFIX", "AnimCustomResourceFixups", 14, 4),
    (GpuFx, "_GPUFX_", "GPUFX", "GpuFx", 178, 2),
    (EnvprobeBin, "_ENV_BIN_", "ENV_BIN", "EnvprobeBin", 77, 2),
    (VoxelizerBin, "_VXL_BIN_", "VXL_BIN", "VoxelizerBin", 77, 2),
    (Area, "_AREA_", "AREA", "Area", 122, 2),
    (PrefabText, "_PREFAB_TEXT_", "PRFBTXT", "PrefabText", 148, 2),
    (Prefab, "_PREFAB_", "PREFAB", "Prefab", 148, 8),
    (PrefabFixups, "_PREFAB_DATA_FIXUPS_", "PRFBFXUP", "PrefabFixUps", 148, 8),
    (Sound, "_SOUND_", "SOUND", "Sound", 18, 2),
    (Music, "_SOUND_MUSIC_", "MUSIC", "Music", 18, 2),
    (Speech, "_SOUND_SPEECH_", "SPEECH", "Speech", 18, 2),
    (SfxStream, "_SOUND_STREAM_", "SNDSTRM", "SFX_stream", 18, 2),
    (SfxLocal, "_SOUND_LOCAL_", "SNDLOCAL", "SFX_local", 18, 2),
    (VertexData, "_VERTEX_DATA_", "VERTEXES", "VertexData", 115, 5),
    (IndexData, "_INDEX_DATA_", "INDEXES", "IndexData", 115, 4),
    (GeometryData, "_GEOMETRY_DATA_", "GEOMETRY", "GeometryData", 115, 4),
    (ClothData, "_CLOTH_DATA_", "CLOTH", "ClothData", 115, 2),
    (TinyObjects, "_TINY_OBJECTS_", "TINYOBJS", "TinyObjects", 75, 8),
    (BuilderInformation, "_BUILDER_INFORMATION_", "BUILDER", "BuilderInformation", 107, 2),
}

impl ResourceType {
    /// Look up a known type by its numeric code.
    pub fn from_code(code: u8) -> Option<ResourceType> {
        REGISTRY
            .iter()
            .find(|info| info.kind as u8 == code)
            .map(|info| info.kind)
    }

    /// Look up a known type by its engine identifier, ignoring case.
    pub fn by_name(name: &str) -> Option<ResourceType> {
        REGISTRY
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .map(|info| info.kind)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn info(self) -> &'static ResourceTypeInfo {
        // every variant has exactly one registry row
        REGISTRY
            .iter()
            .find(|info| info.kind == self)
            .unwrap_or(&REGISTRY[0])
    }

    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    /// Every registered type, in code order
    pub fn all() -> impl Iterator<Item = &'static ResourceTypeInfo> {
        REGISTRY.iter()
    }
}

/// Display name for a raw type code, `"Invalid"` when unknown.
pub fn display_name(code: u8) -> &'static str {
    ResourceType::from_code(code)
        .unwrap_or(ResourceType::Invalid)
        .display_name()
}
