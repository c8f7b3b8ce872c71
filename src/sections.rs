//! 列压缩网格区块（DMAP / CMAP）内部各段的定位。
//!
//! 两种布局都是：索引表、列字数、列数据、第一层方块表；PSX在列数据之后还有
//! 固定长度的间隙以及第二层（只含盖面）方块表。所有偏移均为文件内绝对偏移。

use crate::{
    config::{GmpConfig, BLOCK_INFO_SIZE},
    error::GmpError,
    utils::{read_bytes, read_word_at},
};
use serde::Serialize;

/// 方块属性表所在的一段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSection {
    pub offset: usize,
    pub count: u32,
    pub record_size: usize,
}

impl TableSection {
    pub fn end(&self) -> usize {
        self.offset + self.count as usize * self.record_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressedSections {
    pub index_offset: usize,
    pub column_words: u32,
    pub stream_offset: usize,
    pub stream_len: usize,
    pub tier1: TableSection,
    pub tier2: Option<TableSection>,
    /// 最后一个表之后的位置
    pub end: usize,
}

impl CompressedSections {
    /// 从区块数据起点开始依次跳过各段，`limit` 之后的字节视为不可用
    pub fn locate(
        data: &[u8],
        payload_offset: usize,
        limit: usize,
        config: &GmpConfig,
    ) -> Result<Self, GmpError> {
        let bounded = read_bytes(data, 0, limit)?;
        let layout = &config.layout;
        let width = layout.word_width;

        let index_offset = payload_offset;
        let mut cursor = index_offset + config.index_table_size();

        let column_words = read_word_at(bounded, cursor, width)?;
        cursor += width;

        let stream_offset = cursor;
        let stream_len = column_words as usize * width;
        cursor += stream_len + layout.tier1_gap;

        let tier1_count = read_word_at(bounded, cursor, width)?;
        cursor += width;
        let tier1 = TableSection {
            offset: cursor,
            count: tier1_count,
            record_size: BLOCK_INFO_SIZE,
        };
        cursor = tier1.end();

        let tier2 = match layout.tier2 {
            Some(tier2_layout) => {
                cursor += tier2_layout.gap;
                let count = read_word_at(bounded, cursor, width)?;
                cursor += width;
                let section = TableSection {
                    offset: cursor,
                    count,
                    record_size: tier2_layout.record_size,
                };
                cursor = section.end();
                Some(section)
            }
            None => None,
        };

        if cursor > bounded.len() {
            let last_table = tier2.unwrap_or(tier1);
            return Err(GmpError::Truncated {
                offset: last_table.offset,
                needed: last_table.end() - last_table.offset,
                available: bounded.len().saturating_sub(last_table.offset),
            });
        }

        Ok(Self {
            index_offset,
            column_words,
            stream_offset,
            stream_len,
            tier1,
            tier2,
            end: cursor,
        })
    }

    /// 列数据切片
    pub fn stream<'a>(&self, data: &'a [u8]) -> Result<&'a [u8], GmpError> {
        read_bytes(data, self.stream_offset, self.stream_len)
    }
}
