use crate::{
    config::GmpConfig,
    error::GmpError,
    sections::CompressedSections,
    types::Column,
    utils::{read_bytes, read_u8_at, read_word_at},
};
use std::collections::HashMap;

/// 解码列数据中一条列记录
///
/// `offset` 是相对列数据起点的字节偏移，`stream_base` 只用于在错误中报告文件偏移。
pub fn decode_column(
    stream: &[u8],
    offset: usize,
    stream_base: usize,
    config: &GmpConfig,
    (x, y): (usize, usize),
) -> Result<Column, GmpError> {
    let layout = &config.layout;
    let max_z = config.dims.max_z();
    let file_offset = stream_base + offset;

    let height = read_u8_at(stream, offset)?;
    let base_z = read_u8_at(stream, offset + 1)?;

    if height > max_z {
        return Err(GmpError::ColumnHeight {
            x,
            y,
            height,
            offset: file_offset,
        });
    }
    if base_z > max_z {
        return Err(GmpError::ColumnBase {
            x,
            y,
            base_z,
            offset: file_offset,
        });
    }
    if height < base_z {
        return Err(GmpError::ColumnInverted {
            x,
            y,
            height,
            base_z,
            offset: file_offset,
        });
    }

    let num_blocks = (height - base_z) as usize;
    let record = read_bytes(stream, offset, layout.column_record_size(num_blocks)).map_err(
        |_| GmpError::Truncated {
            offset: file_offset,
            needed: layout.column_record_size(num_blocks),
            available: stream.len().saturating_sub(offset),
        },
    )?;

    let ids_start = layout.column_header_size();
    let block_ids = (0..num_blocks)
        .map(|i| read_word_at(record, ids_start + i * layout.word_width, layout.word_width))
        .collect::<Result<Vec<u32>, GmpError>>()?;

    Ok(Column {
        height,
        base_z,
        block_ids,
    })
}

/// 索引表和列数据解析后的结果
///
/// 每个不同的列只解码一次，平面坐标通过下标引用它。
#[derive(Debug, Clone)]
pub struct ColumnStore {
    columns: Vec<Column>,
    cells: Vec<u32>,
    width: usize,
}

impl ColumnStore {
    /// 按行优先顺序读取索引表并解码每个被引用的列
    pub fn build(
        data: &[u8],
        sections: &CompressedSections,
        config: &GmpConfig,
    ) -> Result<Self, GmpError> {
        let width = config.dims.width;
        let word_width = config.layout.word_width;
        let stream = sections.stream(data)?;
        let index = read_bytes(data, sections.index_offset, config.index_table_size())?;

        let mut columns = Vec::new();
        let mut cells = Vec::with_capacity(config.dims.planar_count());
        let mut by_offset: HashMap<usize, u32> = HashMap::new();

        for y in 0..config.dims.height {
            for x in 0..width {
                let word = read_word_at(index, (x + y * width) * word_width, word_width)?;
                let offset = word as usize * word_width;
                if offset >= stream.len() {
                    return Err(GmpError::ColumnPointer { x, y, word });
                }

                let column_index = match by_offset.get(&offset) {
                    Some(&existing) => existing,
                    None => {
                        let column =
                            decode_column(stream, offset, sections.stream_offset, config, (x, y))?;
                        let new_index = columns.len() as u32;
                        columns.push(column);
                        by_offset.insert(offset, new_index);
                        new_index
                    }
                };
                cells.push(column_index);
            }
        }

        Ok(Self {
            columns,
            cells,
            width,
        })
    }

    /// 所有不同的列
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// 平面坐标 (x, y) 引用的列下标
    pub fn column_index(&self, x: usize, y: usize) -> usize {
        self.cells[x + y * self.width] as usize
    }

    pub fn column_at(&self, x: usize, y: usize) -> &Column {
        &self.columns[self.column_index(x, y)]
    }

    /// 按行优先顺序给出每个平面格的列下标
    pub fn cell_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().map(|&i| i as usize)
    }
}
