//! 方块属性记录（12字节）以及其中打包字段的解析。
//!
//! 记录布局（小端）：
//! ```text
//! 偏移 | 大小 | 字段
//! 0    | 2    | 左侧面
//! 2    | 2    | 右侧面
//! 4    | 2    | 上侧面
//! 6    | 2    | 下侧面
//! 8    | 2    | 盖面
//! 10   | 1    | 箭头/标志
//! 11   | 1    | 坡度与地面类型
//! ```

use crate::config::{BLOCK_INFO_SIZE, LID_BLOCK_INFO_SIZE};
use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

/// 贴图索引占用的位（低10位）
pub const TEXTURE_INDEX_MASK: u16 = 0x03FF;

/// 一个体素的方块属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct BlockInfo {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
    pub lid: u16,
    pub arrows: u8,
    pub slope_type: u8,
}

impl BlockInfo {
    /// 全零的空气方块
    pub const AIR: BlockInfo = BlockInfo {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
        lid: 0,
        arrows: 0,
        slope_type: 0,
    };

    pub fn from_bytes(bytes: &[u8; BLOCK_INFO_SIZE]) -> Self {
        Self {
            left: LittleEndian::read_u16(&bytes[0..2]),
            right: LittleEndian::read_u16(&bytes[2..4]),
            top: LittleEndian::read_u16(&bytes[4..6]),
            bottom: LittleEndian::read_u16(&bytes[6..8]),
            lid: LittleEndian::read_u16(&bytes[8..10]),
            arrows: bytes[10],
            slope_type: bytes[11],
        }
    }

    /// 第二层表的精简记录：只有盖面、标志和坡度，四个侧面为零
    pub fn from_lid_bytes(bytes: &[u8; LID_BLOCK_INFO_SIZE]) -> Self {
        Self {
            lid: LittleEndian::read_u16(&bytes[0..2]),
            arrows: bytes[2],
            slope_type: bytes[3],
            ..Self::AIR
        }
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_INFO_SIZE] {
        let mut bytes = [0u8; BLOCK_INFO_SIZE];
        LittleEndian::write_u16(&mut bytes[0..2], self.left);
        LittleEndian::write_u16(&mut bytes[2..4], self.right);
        LittleEndian::write_u16(&mut bytes[4..6], self.top);
        LittleEndian::write_u16(&mut bytes[6..8], self.bottom);
        LittleEndian::write_u16(&mut bytes[8..10], self.lid);
        bytes[10] = self.arrows;
        bytes[11] = self.slope_type;
        bytes
    }

    pub fn to_lid_bytes(&self) -> [u8; LID_BLOCK_INFO_SIZE] {
        let mut bytes = [0u8; LID_BLOCK_INFO_SIZE];
        LittleEndian::write_u16(&mut bytes[0..2], self.lid);
        bytes[2] = self.arrows;
        bytes[3] = self.slope_type;
        bytes
    }

    /// 四个侧面都为零，可以放进第二层表
    pub fn is_lid_only(&self) -> bool {
        self.left == 0 && self.right == 0 && self.top == 0 && self.bottom == 0
    }

    pub fn side(&self, side: Side) -> SideDescriptor {
        let raw = match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Top => self.top,
            Side::Bottom => self.bottom,
        };
        SideDescriptor::from_raw(raw)
    }

    pub fn lid_descriptor(&self) -> LidDescriptor {
        LidDescriptor::from_raw(self.lid)
    }

    pub fn slope(&self) -> SlopeByte {
        SlopeByte::from_raw(self.slope_type)
    }

    pub fn is_air(&self) -> bool {
        self.slope().block_type == BlockType::Air
    }

    /// 空气类型、没有盖面且四个侧面都为零
    pub fn is_empty(&self) -> bool {
        self.is_air() && !self.has_lid() && self.is_lid_only()
    }

    pub fn has_lid(&self) -> bool {
        self.lid & TEXTURE_INDEX_MASK != 0
    }

    pub fn is_slope(&self) -> bool {
        self.slope().is_slope()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// 贴图旋转角度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    fn from_bits(bits: u16) -> Self {
        match bits & 0x3 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// 侧面描述：贴图(10) 墙(1) 子弹墙(1) 平面(1) 翻转(1) 旋转(2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SideDescriptor {
    pub texture: u16,
    pub wall: bool,
    pub bullet_wall: bool,
    pub flat: bool,
    pub flip: bool,
    pub rotation: Rotation,
}

impl SideDescriptor {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            texture: raw & TEXTURE_INDEX_MASK,
            wall: raw >> 10 & 1 != 0,
            bullet_wall: raw >> 11 & 1 != 0,
            flat: raw >> 12 & 1 != 0,
            flip: raw >> 13 & 1 != 0,
            rotation: Rotation::from_bits(raw >> 14),
        }
    }
}

/// 盖面描述：贴图(10) 光照滤镜(2) 平面(1) 翻转(1) 旋转(2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LidDescriptor {
    pub texture: u16,
    pub lighting_filter: u8,
    pub flat: bool,
    pub flip: bool,
    pub rotation: Rotation,
}

impl LidDescriptor {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            texture: raw & TEXTURE_INDEX_MASK,
            lighting_filter: (raw >> 10 & 0x3) as u8,
            flat: raw >> 12 & 1 != 0,
            flip: raw >> 13 & 1 != 0,
            rotation: Rotation::from_bits(raw >> 14),
        }
    }
}

/// 地面类型（坡度字节低2位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockType {
    Air,
    Road,
    Pavement,
    Field,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Road => "road",
            BlockType::Pavement => "pavement",
            BlockType::Field => "field",
        }
    }
}

/// 坡度字节：低2位地面类型，高6位坡度类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlopeByte {
    pub block_type: BlockType,
    /// 0 = 平地，1..=60 = 各种坡，61..=63 不参与旋转
    pub slope: u8,
}

impl SlopeByte {
    pub fn from_raw(raw: u8) -> Self {
        let block_type = match raw & 0x3 {
            0 => BlockType::Air,
            1 => BlockType::Road,
            2 => BlockType::Pavement,
            _ => BlockType::Field,
        };
        Self {
            block_type,
            slope: raw >> 2,
        }
    }

    pub fn is_slope(&self) -> bool {
        (1..=60).contains(&self.slope)
    }
}
