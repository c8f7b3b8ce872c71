use crate::{
    block::BlockInfo,
    block_table::BlockTable,
    column::ColumnStore,
    config::{GmpConfig, GridDims, BLOCK_INFO_SIZE},
    error::GmpError,
    types::Chunk,
    utils::calculate_sha256,
};
use log::debug;
use rayon::prelude::*;

/// 完整展开的体素网格，每格一条方块属性，默认为全零空气
///
/// 存储顺序与UMAP相同：z最外层，其次y，x变化最快。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    dims: GridDims,
    cells: Vec<BlockInfo>,
}

impl VoxelGrid {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![BlockInfo::AIR; dims.cell_count()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    fn checked_index(&self, x: usize, y: usize, z: usize) -> Result<usize, GmpError> {
        if x >= self.dims.width || y >= self.dims.height || z >= self.dims.depth {
            return Err(GmpError::CoordinateOutOfRange { x, y, z });
        }
        Ok(x + y * self.dims.width + z * self.dims.width * self.dims.height)
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        match self.checked_index(x, y, z) {
            Ok(index) => index,
            Err(e) => panic!("{}", e),
        }
    }

    /// 读取一格
    ///
    /// # Panics
    ///
    /// 坐标超出网格范围时panic，不确定坐标是否有效时用 [`VoxelGrid::try_get`]。
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockInfo {
        self.cells[self.index(x, y, z)]
    }

    /// 写入一格
    ///
    /// # Panics
    ///
    /// 坐标超出网格范围时panic，不确定坐标是否有效时用 [`VoxelGrid::try_set`]。
    pub fn set(&mut self, x: usize, y: usize, z: usize, info: BlockInfo) {
        let index = self.index(x, y, z);
        self.cells[index] = info;
    }

    pub fn try_get(&self, x: usize, y: usize, z: usize) -> Result<BlockInfo, GmpError> {
        Ok(self.cells[self.checked_index(x, y, z)?])
    }

    pub fn try_set(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        info: BlockInfo,
    ) -> Result<(), GmpError> {
        let index = self.checked_index(x, y, z)?;
        self.cells[index] = info;
        Ok(())
    }

    /// 按 z/y/x 顺序遍历
    pub fn cells(&self) -> &[BlockInfo] {
        &self.cells
    }

    /// (x, y) 处从 z=0 开始的一整列
    pub fn stack(&self, x: usize, y: usize) -> Vec<BlockInfo> {
        (0..self.dims.depth).map(|z| self.get(x, y, z)).collect()
    }

    /// 非空方块数量
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|info| !info.is_empty()).count()
    }

    /// 序列化为UMAP区块数据
    pub fn to_dense_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; self.dims.dense_size()];
        write_dense(self, &mut buffer);
        buffer
    }

    /// 网格的SHA-256指纹
    pub fn digest(&self) -> [u8; 32] {
        calculate_sha256(&self.to_dense_bytes())
    }
}

/// 把列和方块表组装成密集网格
///
/// 每个不同的列并行解析一次，再按行优先顺序放入网格；
/// 未被任何列覆盖的格子保持空气。
pub fn assemble(
    store: &ColumnStore,
    table: &BlockTable<'_>,
    config: &GmpConfig,
) -> Result<VoxelGrid, GmpError> {
    let stacks = store
        .columns()
        .par_iter()
        .map(|column| {
            column
                .block_ids
                .iter()
                .map(|&id| table.resolve(id))
                .collect::<Result<Vec<BlockInfo>, GmpError>>()
        })
        .collect::<Result<Vec<_>, GmpError>>()?;

    debug!("解析了 {} 个不同的列", stacks.len());

    let mut grid = VoxelGrid::new(config.dims);
    let width = config.dims.width;

    for (cell, column_index) in store.cell_indices().enumerate() {
        let (x, y) = (cell % width, cell / width);
        let base_z = store.columns()[column_index].base_z as usize;
        for (i, info) in stacks[column_index].iter().enumerate() {
            grid.set(x, y, base_z + i, *info);
        }
    }

    Ok(grid)
}

/// 按 z/y/x 顺序把网格写入目标UMAP数据，目标较小时提前停止，返回写入的记录数
pub fn write_dense(grid: &VoxelGrid, dest: &mut [u8]) -> usize {
    let mut written = 0;
    for (info, slot) in grid.cells.iter().zip(dest.chunks_exact_mut(BLOCK_INFO_SIZE)) {
        slot.copy_from_slice(&info.to_bytes());
        written += 1;
    }
    written
}

/// 从UMAP区块读取密集网格
pub fn read_dense(data: &[u8], chunk: &Chunk, dims: GridDims) -> Result<VoxelGrid, GmpError> {
    let expected = dims.dense_size();
    if chunk.payload_size < expected {
        return Err(GmpError::DenseGridSize {
            expected,
            actual: chunk.payload_size,
        });
    }
    let payload = chunk.payload(data).ok_or(GmpError::Truncated {
        offset: chunk.payload_offset,
        needed: chunk.payload_size,
        available: data.len().saturating_sub(chunk.payload_offset),
    })?;

    let cells = payload[..expected]
        .chunks_exact(BLOCK_INFO_SIZE)
        .map(|record| {
            let mut bytes = [0u8; BLOCK_INFO_SIZE];
            bytes.copy_from_slice(record);
            BlockInfo::from_bytes(&bytes)
        })
        .collect();

    Ok(VoxelGrid { dims, cells })
}
