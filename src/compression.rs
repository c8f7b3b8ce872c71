//! 密集网格到列压缩格式（DMAP / CMAP）的编码，是解压的逆过程。
//!
//! 相同的列只存一次，相同的方块属性只在方块表中出现一次。

use crate::{
    block::BlockInfo,
    config::{CompressedLayout, GmpConfig},
    error::GmpError,
    grid::VoxelGrid,
    types::Column,
    utils::write_word,
};
use log::debug;
use std::collections::HashMap;

/// 方块表构建器，按首次出现的顺序分配ID
struct BlockTableBuilder {
    layout: CompressedLayout,
    tier1: Vec<BlockInfo>,
    tier2: Vec<BlockInfo>,
    ids: HashMap<BlockInfo, u32>,
}

impl BlockTableBuilder {
    fn new(layout: CompressedLayout) -> Self {
        Self {
            layout,
            tier1: Vec::new(),
            tier2: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn id_for(&mut self, info: BlockInfo) -> Result<u32, GmpError> {
        if let Some(&id) = self.ids.get(&info) {
            return Ok(id);
        }

        let id = match self.layout.tier2 {
            Some(tier2) if info.is_lid_only() => {
                let id = tier2.first_id as u64 + self.tier2.len() as u64;
                if id > self.layout.word_max() {
                    return Err(GmpError::FieldOverflow(format!(
                        "第二层方块表超过 {} 条",
                        self.tier2.len()
                    )));
                }
                self.tier2.push(info);
                id as u32
            }
            Some(tier2) => {
                if self.tier1.len() as u64 >= tier2.first_id as u64 {
                    return Err(GmpError::FieldOverflow(format!(
                        "第一层方块表超过 {} 条",
                        tier2.first_id
                    )));
                }
                self.tier1.push(info);
                (self.tier1.len() - 1) as u32
            }
            None => {
                if self.tier1.len() as u64 > self.layout.word_max() {
                    return Err(GmpError::FieldOverflow(
                        "方块表条目数超过上限".to_string(),
                    ));
                }
                self.tier1.push(info);
                (self.tier1.len() - 1) as u32
            }
        };

        self.ids.insert(info, id);
        Ok(id)
    }
}

/// 取出 (x, y) 处的列：从最低的非空气格到最高的非空气格
fn build_column(
    grid: &VoxelGrid,
    x: usize,
    y: usize,
    table: &mut BlockTableBuilder,
) -> Result<Column, GmpError> {
    let stack = grid.stack(x, y);

    // 列高度字段最大为7，最顶层无法表示
    if matches!(stack.last(), Some(top) if *top != BlockInfo::AIR) {
        return Err(GmpError::FieldOverflow(format!(
            "列 ({}, {}) 的第 {} 层不是空气，列压缩格式无法表示",
            x,
            y,
            stack.len() - 1
        )));
    }

    let occupied: Vec<usize> = stack
        .iter()
        .enumerate()
        .filter(|(_, info)| **info != BlockInfo::AIR)
        .map(|(z, _)| z)
        .collect();

    let (base_z, height) = match (occupied.first(), occupied.last()) {
        (Some(&low), Some(&high)) => (low, high + 1),
        _ => return Ok(Column::default()),
    };

    let block_ids = stack[base_z..height]
        .iter()
        .map(|info| table.id_for(*info))
        .collect::<Result<Vec<u32>, GmpError>>()?;

    Ok(Column {
        height: height as u8,
        base_z: base_z as u8,
        block_ids,
    })
}

fn encode_column(
    stream: &mut Vec<u8>,
    column: &Column,
    layout: &CompressedLayout,
) -> Result<(), GmpError> {
    stream.push(column.height);
    stream.push(column.base_z);
    stream.extend(std::iter::repeat(0u8).take(layout.column_padding));
    for &id in &column.block_ids {
        write_word(stream, id as u64, layout.word_width)?;
    }
    Ok(())
}

/// 把网格编码为列压缩区块的数据部分（索引表开头，方块表结尾）
pub fn compress_grid(grid: &VoxelGrid, config: &GmpConfig) -> Result<Vec<u8>, GmpError> {
    if grid.dims() != config.dims {
        return Err(GmpError::ValidationError(format!(
            "网格尺寸 {:?} 与配置 {:?} 不一致",
            grid.dims(),
            config.dims
        )));
    }

    let layout = config.layout;
    let width = layout.word_width;
    let mut table = BlockTableBuilder::new(layout);
    let mut stream = Vec::new();
    let mut words_by_column: HashMap<Column, u64> = HashMap::new();
    let mut payload = Vec::with_capacity(config.index_table_size());

    for y in 0..config.dims.height {
        for x in 0..config.dims.width {
            let column = build_column(grid, x, y, &mut table)?;
            let word = match words_by_column.get(&column) {
                Some(&word) => word,
                None => {
                    let word = (stream.len() / width) as u64;
                    encode_column(&mut stream, &column, &layout)?;
                    words_by_column.insert(column, word);
                    word
                }
            };
            write_word(&mut payload, word, width)?;
        }
    }

    debug!(
        "编码了 {} 个不同的列，{} 条完整方块，{} 条盖面方块",
        words_by_column.len(),
        table.tier1.len(),
        table.tier2.len()
    );

    write_word(&mut payload, (stream.len() / width) as u64, width)?;
    payload.extend_from_slice(&stream);
    payload.extend(std::iter::repeat(0u8).take(layout.tier1_gap));

    write_word(&mut payload, table.tier1.len() as u64, width)?;
    for info in &table.tier1 {
        payload.extend_from_slice(&info.to_bytes());
    }

    if let Some(tier2) = layout.tier2 {
        payload.extend(std::iter::repeat(0u8).take(tier2.gap));
        write_word(&mut payload, table.tier2.len() as u64, width)?;
        for info in &table.tier2 {
            payload.extend_from_slice(&info.to_lid_bytes());
        }
    }

    Ok(payload)
}
