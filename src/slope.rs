use crate::block::{BlockInfo, TEXTURE_INDEX_MASK};
use std::ops::RangeInclusive;

/// PSX上三面坡使用错误盖面贴图的坡度类型
pub const THREE_SIDED_SLOPES: RangeInclusive<u8> = 49..=52;
/// PSX上这些坡用的贴图索引
pub const PSX_SLOPE_LID_TEXTURE: u16 = 384;
/// PC上对应的贴图索引（低10位全1）
pub const PC_SLOPE_LID_TEXTURE: u16 = TEXTURE_INDEX_MASK;

/// 修正PSX三面坡的盖面贴图：384 改为 1023，其余位保持不变
pub fn fix_psx_slope(info: BlockInfo) -> BlockInfo {
    let slope = info.slope().slope;
    if THREE_SIDED_SLOPES.contains(&slope)
        && info.lid & TEXTURE_INDEX_MASK == PSX_SLOPE_LID_TEXTURE
    {
        BlockInfo {
            lid: info.lid | PC_SLOPE_LID_TEXTURE,
            ..info
        }
    } else {
        info
    }
}
