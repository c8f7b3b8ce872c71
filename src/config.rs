use crate::types::Tag;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 地图宽度（x方向格数）
pub const MAP_WIDTH: usize = 256;
/// 地图长度（y方向格数）
pub const MAP_HEIGHT: usize = 256;
/// 地图层数（z方向，0..=7）
pub const MAP_DEPTH: usize = 8;

/// 完整方块属性记录大小
pub const BLOCK_INFO_SIZE: usize = 12;
/// 第二层方块表中只含盖面/坡度的精简记录大小
pub const LID_BLOCK_INFO_SIZE: usize = 4;
/// 第二层方块表的起始ID
pub const TIER2_FIRST_ID: u32 = 32768;

/// PSX区块之后的填充字节
pub const CHUNK_PADDING_BYTE: u8 = 0xAA;

/// PSX CMAP 列数据之后、第一层方块表之前的间隙
pub const CMAP_FIRST_GAP: usize = 0x400;
/// PSX CMAP 第一层与第二层方块表之间的间隙
pub const CMAP_SECOND_GAP: usize = 0x600;

/// 来源平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Pc,
    Psx,
}

impl Platform {
    pub fn config(self) -> GmpConfig {
        GmpConfig::new(self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Pc => f.write_str("pc"),
            Platform::Psx => f.write_str("psx"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pc" => Ok(Platform::Pc),
            "psx" => Ok(Platform::Psx),
            _ => Err(format!("不支持的平台: {}（可选 pc, psx）", s)),
        }
    }
}

/// 网格尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl GridDims {
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    pub fn planar_count(&self) -> usize {
        self.width * self.height
    }

    /// 密集网格（UMAP）区块的字节大小
    pub fn dense_size(&self) -> usize {
        self.cell_count() * BLOCK_INFO_SIZE
    }

    pub fn max_z(&self) -> u8 {
        (self.depth - 1) as u8
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            depth: MAP_DEPTH,
        }
    }
}

/// 第二层方块表布局（仅PSX）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier2Layout {
    pub gap: usize,
    pub first_id: u32,
    pub record_size: usize,
}

/// 列压缩网格区块的布局参数
///
/// 索引表项、列字数、列数据字宽、方块ID以及方块表条目数都使用同一个字宽：
/// PC为4字节，PSX为2字节。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedLayout {
    pub tag: Tag,
    pub word_width: usize,
    /// 列头（高度、起始层）之后的填充字节数
    pub column_padding: usize,
    /// 列数据与第一层方块表之间的间隙
    pub tier1_gap: usize,
    pub tier2: Option<Tier2Layout>,
}

impl CompressedLayout {
    pub fn pc() -> Self {
        Self {
            tag: Tag::Dmap,
            word_width: 4,
            column_padding: 2,
            tier1_gap: 0,
            tier2: None,
        }
    }

    pub fn psx() -> Self {
        Self {
            tag: Tag::Cmap,
            word_width: 2,
            column_padding: 0,
            tier1_gap: CMAP_FIRST_GAP,
            tier2: Some(Tier2Layout {
                gap: CMAP_SECOND_GAP,
                first_id: TIER2_FIRST_ID,
                record_size: LID_BLOCK_INFO_SIZE,
            }),
        }
    }

    /// 列头字节数
    pub fn column_header_size(&self) -> usize {
        2 + self.column_padding
    }

    /// 一列记录的字节长度
    pub fn column_record_size(&self, num_blocks: usize) -> usize {
        self.column_header_size() + self.word_width * num_blocks
    }

    /// 该字宽能表示的最大值
    pub fn word_max(&self) -> u64 {
        (1u64 << (self.word_width * 8)) - 1
    }
}

/// 一次编解码使用的不可变配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GmpConfig {
    pub platform: Platform,
    pub dims: GridDims,
    pub layout: CompressedLayout,
    /// 文件是否以 GBMP 魔数和版本号开头
    pub has_file_header: bool,
    /// 是否对坡度方块做盖面贴图修正（PSX特有问题）
    pub slope_fixup: bool,
}

impl GmpConfig {
    pub fn new(platform: Platform) -> Self {
        match platform {
            Platform::Pc => Self {
                platform,
                dims: GridDims::default(),
                layout: CompressedLayout::pc(),
                has_file_header: true,
                slope_fixup: false,
            },
            Platform::Psx => Self {
                platform,
                dims: GridDims::default(),
                layout: CompressedLayout::psx(),
                has_file_header: false,
                slope_fixup: true,
            },
        }
    }

    /// 索引表字节大小
    pub fn index_table_size(&self) -> usize {
        self.dims.planar_count() * self.layout.word_width
    }
}
