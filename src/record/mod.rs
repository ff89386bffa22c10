//! Typed structured-field records.
//!
//! A record is one structured field of the print stream with its fields
//! already parsed. The byte-level decoder that produces records is not part
//! of this crate; see [`RecordSource`].

mod source;

pub use source::{write_json_lines, JsonRecordSource, RecordSource, VecSource};

use serde::{Deserialize, Serialize};

/// A structured field with parsed contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// BMM
    BeginMediumMap { name: String },
    /// MDD
    MediumDescriptor {
        x_unit_base: UnitBase,
        x_units_per_unit_base: u16,
        #[serde(default)]
        x_extent: Option<u32>,
        #[serde(default)]
        y_extent: Option<u32>,
    },
    /// EMM
    EndMediumMap,
    /// IMM
    InvokeMediumMap { name: String },
    /// PGP format 1
    PagePosition { x_origin: i32, y_origin: i32 },

    /// BCP
    BeginCodePage { name: String },
    /// CPC
    CodePageControl,
    /// CPD
    CodePageDescriptor,
    /// CPI
    CodePageIndex { entries: Vec<CodePageEntry> },
    /// ECP
    EndCodePage,

    /// BFN
    BeginFont {
        #[serde(default)]
        name: String,
    },
    /// FNC
    FontControl {
        pattern_technology: PatternTechnology,
        pattern_alignment: PatternAlignment,
        max_box_width: u32,
        max_box_height: u32,
    },
    /// FND
    FontDescriptor { nominal_vertical_size: i32 },
    /// FNO
    FontOrientation,
    /// FNP
    FontPosition { groups: Vec<FontPositionGroup> },
    /// FNI
    FontIndex { entries: Vec<FontIndexEntry> },
    /// FNM
    FontPatternsMap { entries: Vec<PatternMapEntry> },
    /// FNG
    FontPatterns { data: Vec<u8> },
    /// EFN
    EndFont,

    /// MCF format 2
    MapCodedFont { groups: Vec<MapCodedFontGroup> },

    /// BPG
    BeginPage {
        #[serde(default)]
        name: String,
    },
    /// PGD
    PageDescriptor,
    /// EPG
    EndPage,

    /// BIM
    BeginImageObject {
        #[serde(default)]
        name: String,
    },
    /// OBD
    ObjectAreaDescriptor,
    /// OBP
    ObjectAreaPosition { x_origin: i32, y_origin: i32 },
    /// IDD
    ImageDataDescriptor {
        width: u32,
        height: u32,
        #[serde(default)]
        bilevel_color: Option<ColorValue>,
    },
    /// IPD
    ImagePictureData { data: Vec<u8> },
    /// EIM
    EndImageObject,

    /// BPT
    BeginPresentationText,
    /// PTD format 2
    PresentationTextDescriptor,
    /// PTX
    PresentationTextData { controls: Vec<ControlSequence> },

    /// Any structured field this crate does not model.
    Unknown { type_id: u32 },
}

impl Record {
    /// Kind tag of the record.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::BeginMediumMap { .. } => RecordKind::BeginMediumMap,
            Record::MediumDescriptor { .. } => RecordKind::MediumDescriptor,
            Record::EndMediumMap => RecordKind::EndMediumMap,
            Record::InvokeMediumMap { .. } => RecordKind::InvokeMediumMap,
            Record::PagePosition { .. } => RecordKind::PagePosition,
            Record::BeginCodePage { .. } => RecordKind::BeginCodePage,
            Record::CodePageControl => RecordKind::CodePageControl,
            Record::CodePageDescriptor => RecordKind::CodePageDescriptor,
            Record::CodePageIndex { .. } => RecordKind::CodePageIndex,
            Record::EndCodePage => RecordKind::EndCodePage,
            Record::BeginFont { .. } => RecordKind::BeginFont,
            Record::FontControl { .. } => RecordKind::FontControl,
            Record::FontDescriptor { .. } => RecordKind::FontDescriptor,
            Record::FontOrientation => RecordKind::FontOrientation,
            Record::FontPosition { .. } => RecordKind::FontPosition,
            Record::FontIndex { .. } => RecordKind::FontIndex,
            Record::FontPatternsMap { .. } => RecordKind::FontPatternsMap,
            Record::FontPatterns { .. } => RecordKind::FontPatterns,
            Record::EndFont => RecordKind::EndFont,
            Record::MapCodedFont { .. } => RecordKind::MapCodedFont,
            Record::BeginPage { .. } => RecordKind::BeginPage,
            Record::PageDescriptor => RecordKind::PageDescriptor,
            Record::EndPage => RecordKind::EndPage,
            Record::BeginImageObject { .. } => RecordKind::BeginImageObject,
            Record::ObjectAreaDescriptor => RecordKind::ObjectAreaDescriptor,
            Record::ObjectAreaPosition { .. } => RecordKind::ObjectAreaPosition,
            Record::ImageDataDescriptor { .. } => RecordKind::ImageDataDescriptor,
            Record::ImagePictureData { .. } => RecordKind::ImagePictureData,
            Record::EndImageObject => RecordKind::EndImageObject,
            Record::BeginPresentationText => RecordKind::BeginPresentationText,
            Record::PresentationTextDescriptor => RecordKind::PresentationTextDescriptor,
            Record::PresentationTextData { .. } => RecordKind::PresentationTextData,
            Record::Unknown { .. } => RecordKind::Unknown,
        }
    }
}

/// Record kind tag, used to key handler tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    BeginMediumMap,
    MediumDescriptor,
    EndMediumMap,
    InvokeMediumMap,
    PagePosition,
    BeginCodePage,
    CodePageControl,
    CodePageDescriptor,
    CodePageIndex,
    EndCodePage,
    BeginFont,
    FontControl,
    FontDescriptor,
    FontOrientation,
    FontPosition,
    FontIndex,
    FontPatternsMap,
    FontPatterns,
    EndFont,
    MapCodedFont,
    BeginPage,
    PageDescriptor,
    EndPage,
    BeginImageObject,
    ObjectAreaDescriptor,
    ObjectAreaPosition,
    ImageDataDescriptor,
    ImagePictureData,
    EndImageObject,
    BeginPresentationText,
    PresentationTextDescriptor,
    PresentationTextData,
    Unknown,
}

impl RecordKind {
    /// Structured field acronym, as used in the MO:DCA, FOCA and IOCA references.
    pub fn acronym(self) -> &'static str {
        match self {
            RecordKind::BeginMediumMap => "BMM",
            RecordKind::MediumDescriptor => "MDD",
            RecordKind::EndMediumMap => "EMM",
            RecordKind::InvokeMediumMap => "IMM",
            RecordKind::PagePosition => "PGP",
            RecordKind::BeginCodePage => "BCP",
            RecordKind::CodePageControl => "CPC",
            RecordKind::CodePageDescriptor => "CPD",
            RecordKind::CodePageIndex => "CPI",
            RecordKind::EndCodePage => "ECP",
            RecordKind::BeginFont => "BFN",
            RecordKind::FontControl => "FNC",
            RecordKind::FontDescriptor => "FND",
            RecordKind::FontOrientation => "FNO",
            RecordKind::FontPosition => "FNP",
            RecordKind::FontIndex => "FNI",
            RecordKind::FontPatternsMap => "FNM",
            RecordKind::FontPatterns => "FNG",
            RecordKind::EndFont => "EFN",
            RecordKind::MapCodedFont => "MCF",
            RecordKind::BeginPage => "BPG",
            RecordKind::PageDescriptor => "PGD",
            RecordKind::EndPage => "EPG",
            RecordKind::BeginImageObject => "BIM",
            RecordKind::ObjectAreaDescriptor => "OBD",
            RecordKind::ObjectAreaPosition => "OBP",
            RecordKind::ImageDataDescriptor => "IDD",
            RecordKind::ImagePictureData => "IPD",
            RecordKind::EndImageObject => "EIM",
            RecordKind::BeginPresentationText => "BPT",
            RecordKind::PresentationTextDescriptor => "PTD",
            RecordKind::PresentationTextData => "PTX",
            RecordKind::Unknown => "???",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.acronym())
    }
}

/// Measurement unit base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitBase {
    /// Units per 10 inches
    TenInches,
    /// Units per 10 centimeters
    TenCentimeters,
}

impl UnitBase {
    /// Length of the unit base in inches.
    pub fn inches(self) -> f32 {
        match self {
            UnitBase::TenInches => 10.0,
            UnitBase::TenCentimeters => 100.0 / 25.4,
        }
    }
}

/// Font pattern technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTechnology {
    /// Bitmap patterns, the only kind reconstructed
    LaserMatrixNBitWide,
    /// CID-keyed outline font
    CidKeyedOutline,
    /// Type 1 PFB outline font
    Type1PfbOutline,
}

/// Raster pattern data alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternAlignment {
    /// 1 byte alignment, the only supported one
    OneByte,
    /// 4 byte alignment
    FourByte,
    /// 8 byte alignment
    EightByte,
}

/// Code page index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePageEntry {
    pub gcgid: String,
    pub code_point: u16,
}

/// Font position repeating group, one per orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPositionGroup {
    pub max_ascender: i32,
    pub max_descender: i32,
}

/// Font index entry: per-glyph metrics for one orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontIndexEntry {
    pub gcgid: String,
    pub character_increment: i32,
    pub ascender_height: i32,
    pub descender_depth: i32,
    pub baseline_offset: i32,
    pub a_space: i32,
    pub b_space: i32,
    pub c_space: i32,
    /// Index into the font patterns map
    pub fnm_index: u32,
}

/// Font patterns map entry: where a glyph's raster lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMapEntry {
    /// Zero-based box width
    pub box_width: u32,
    /// Zero-based box height
    pub box_height: u32,
    /// Byte offset into the font patterns
    pub pattern_offset: u32,
}

/// Map coded font repeating group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapCodedFontGroup {
    #[serde(default)]
    pub local_id: u8,
    pub qualifiers: Vec<FullyQualifiedName>,
}

/// Fully qualified name triplet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullyQualifiedName {
    pub role: NameRole,
    pub name: String,
}

/// Use of a fully qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameRole {
    CodePageNameReference,
    FontCharacterSetNameReference,
    CodedFontNameReference,
    Other,
}

/// A color value as carried by text and image controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorValue {
    /// Named color from the standard OCA color table
    Oca(u16),
    /// Explicit RGB
    Rgb([u8; 3]),
}

impl ColorValue {
    /// RGB triple of the color. Default and unknown OCA values are black.
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            ColorValue::Rgb(rgb) => rgb,
            ColorValue::Oca(value) => match value {
                0x0001 => [0, 0, 255],
                0x0002 => [255, 0, 0],
                0x0003 => [255, 0, 255],
                0x0004 => [0, 255, 0],
                0x0005 => [0, 255, 255],
                0x0006 => [255, 255, 0],
                0x0007 => [255, 255, 255],
                0x0009 => [0, 0, 170],
                0x000A => [255, 128, 0],
                0x000B => [170, 0, 170],
                0x000C => [0, 146, 0],
                0x000D => [0, 146, 170],
                0x000E => [196, 160, 32],
                0x000F => [131, 131, 131],
                0x0010 => [144, 48, 0],
                _ => [0, 0, 0],
            },
        }
    }
}

/// Presentation text control sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControlSequence {
    /// NOP
    NoOperation {
        #[serde(default)]
        data: Vec<u8>,
    },
    /// AMB
    AbsoluteMoveBaseline { displacement: i32 },
    /// AMI
    AbsoluteMoveInline { displacement: i32 },
    /// SCFL
    SetCodedFontLocal { id: u8 },
    /// STC
    SetTextColor { color: ColorValue },
    /// DIR
    DrawInlineRule { length: i32, width: i32 },
    /// DBR
    DrawBaselineRule { length: i32, width: i32 },
    /// TRN
    TransparentData { data: Vec<u8> },
    /// Any control sequence without an effect here.
    Other { function_type: u8 },
}
