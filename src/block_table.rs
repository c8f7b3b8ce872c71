use crate::{
    block::BlockInfo,
    config::{GmpConfig, BLOCK_INFO_SIZE, LID_BLOCK_INFO_SIZE},
    error::GmpError,
    sections::{CompressedSections, TableSection},
    slope::fix_psx_slope,
    utils::read_bytes,
};

/// 方块ID到属性记录的两层查找表
///
/// 第一层是完整的12字节记录；第二层（仅PSX）从 `first_id` 开始，
/// 每条只有4字节的盖面/标志/坡度。
#[derive(Debug, Clone, Copy)]
pub struct BlockTable<'a> {
    data: &'a [u8],
    tier1: TableSection,
    tier2: Option<(u32, TableSection)>,
    slope_fixup: bool,
}

impl<'a> BlockTable<'a> {
    pub fn new(data: &'a [u8], sections: &CompressedSections, config: &GmpConfig) -> Self {
        let tier2 = match (config.layout.tier2, sections.tier2) {
            (Some(layout), Some(section)) => Some((layout.first_id, section)),
            _ => None,
        };
        Self {
            data,
            tier1: sections.tier1,
            tier2,
            slope_fixup: config.slope_fixup,
        }
    }

    pub fn tier1_count(&self) -> u32 {
        self.tier1.count
    }

    pub fn tier2_count(&self) -> u32 {
        self.tier2.map(|(_, section)| section.count).unwrap_or(0)
    }

    /// 解析一个方块ID，PSX上会同时应用坡度贴图修正
    pub fn resolve(&self, id: u32) -> Result<BlockInfo, GmpError> {
        let info = self.lookup(id)?;
        Ok(if self.slope_fixup {
            fix_psx_slope(info)
        } else {
            info
        })
    }

    /// 不做任何修正的原始记录
    pub fn lookup(&self, id: u32) -> Result<BlockInfo, GmpError> {
        match self.tier2 {
            Some((first_id, section)) if id >= first_id => {
                let index = id - first_id;
                if index >= section.count {
                    return Err(GmpError::BlockIdOutOfRange {
                        id,
                        tier: 2,
                        count: section.count,
                    });
                }
                let offset = section.offset + index as usize * LID_BLOCK_INFO_SIZE;
                let mut bytes = [0u8; LID_BLOCK_INFO_SIZE];
                bytes.copy_from_slice(read_bytes(self.data, offset, LID_BLOCK_INFO_SIZE)?);
                Ok(BlockInfo::from_lid_bytes(&bytes))
            }
            _ => {
                if id >= self.tier1.count {
                    return Err(GmpError::BlockIdOutOfRange {
                        id,
                        tier: 1,
                        count: self.tier1.count,
                    });
                }
                let offset = self.tier1.offset + id as usize * BLOCK_INFO_SIZE;
                let mut bytes = [0u8; BLOCK_INFO_SIZE];
                bytes.copy_from_slice(read_bytes(self.data, offset, BLOCK_INFO_SIZE)?);
                Ok(BlockInfo::from_bytes(&bytes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;

    /// 构造只有方块表的数据：第一层从0开始，第二层紧随其后
    fn tables(tier1: &[BlockInfo], tier2: &[BlockInfo]) -> (Vec<u8>, CompressedSections) {
        let mut data = Vec::new();
        for info in tier1 {
            data.extend_from_slice(&info.to_bytes());
        }
        let tier2_offset = data.len();
        for info in tier2 {
            data.extend_from_slice(&info.to_lid_bytes());
        }
        let sections = CompressedSections {
            index_offset: 0,
            column_words: 0,
            stream_offset: 0,
            stream_len: 0,
            tier1: TableSection {
                offset: 0,
                count: tier1.len() as u32,
                record_size: BLOCK_INFO_SIZE,
            },
            tier2: Some(TableSection {
                offset: tier2_offset,
                count: tier2.len() as u32,
                record_size: LID_BLOCK_INFO_SIZE,
            }),
            end: data.len(),
        };
        (data, sections)
    }

    fn full_block(n: u16) -> BlockInfo {
        BlockInfo {
            left: n,
            right: n + 1,
            top: n + 2,
            bottom: n + 3,
            lid: n + 4,
            arrows: 1,
            slope_type: 2,
        }
    }

    #[test]
    fn tier_boundary_on_psx() {
        let tier1: Vec<BlockInfo> = (0..32768u32)
            .map(|n| full_block((n % 1000) as u16 + 1))
            .collect();
        let tier2 = vec![BlockInfo {
            lid: 77,
            arrows: 2,
            slope_type: 3,
            ..BlockInfo::AIR
        }];
        let (data, sections) = tables(&tier1, &tier2);
        let table = BlockTable::new(&data, &sections, &Platform::Psx.config());

        let last_full = table.resolve(32767).unwrap();
        assert_eq!(last_full, tier1[32767]);
        assert!(!last_full.is_lid_only());

        let first_lid = table.resolve(32768).unwrap();
        assert_eq!(&first_lid.to_bytes()[..8], &[0u8; 8]);
        assert_eq!(first_lid.lid, 77);
        assert_eq!(first_lid.slope_type, 3);
    }

    #[test]
    fn out_of_range_ids_are_fatal() {
        let (data, sections) = tables(&[full_block(1)], &[BlockInfo::AIR]);
        let table = BlockTable::new(&data, &sections, &Platform::Psx.config());

        assert!(matches!(
            table.resolve(1),
            Err(GmpError::BlockIdOutOfRange { id: 1, tier: 1, count: 1 })
        ));
        assert!(matches!(
            table.resolve(32769),
            Err(GmpError::BlockIdOutOfRange { id: 32769, tier: 2, count: 1 })
        ));
    }

    #[test]
    fn pc_has_a_single_tier() {
        let tier1: Vec<BlockInfo> = (0..3).map(full_block).collect();
        let (data, mut sections) = tables(&tier1, &[]);
        sections.tier2 = None;
        let table = BlockTable::new(&data, &sections, &Platform::Pc.config());

        assert_eq!(table.tier2_count(), 0);
        assert_eq!(table.resolve(2).unwrap(), tier1[2]);
        assert!(matches!(
            table.resolve(32768),
            Err(GmpError::BlockIdOutOfRange { tier: 1, .. })
        ));
    }

    #[test]
    fn fixup_also_covers_lid_only_records() {
        let lid_slope = BlockInfo {
            lid: 384,
            slope_type: 51 << 2,
            ..BlockInfo::AIR
        };
        let (data, sections) = tables(&[full_block(1)], &[lid_slope]);
        let table = BlockTable::new(&data, &sections, &Platform::Psx.config());

        let resolved = table.resolve(32768).unwrap();
        assert_eq!(resolved.lid, 1023);
        assert!(resolved.is_lid_only());
        assert_eq!(table.lookup(32768).unwrap(), lid_slope);
    }

    #[test]
    fn fixup_follows_platform() {
        let slope = BlockInfo {
            lid: 384,
            slope_type: 50 << 2,
            ..full_block(1)
        };
        let (data, sections) = tables(&[slope], &[]);

        let psx = BlockTable::new(&data, &sections, &Platform::Psx.config());
        assert_eq!(psx.resolve(0).unwrap().lid, 1023);
        assert_eq!(psx.lookup(0).unwrap().lid, 384);

        let pc = BlockTable::new(&data, &sections, &Platform::Pc.config());
        assert_eq!(pc.resolve(0).unwrap().lid, 384);
    }
}
