use crate::{
    block_table::BlockTable,
    column::ColumnStore,
    config::{GmpConfig, Platform},
    error::GmpError,
    grid::{assemble, read_dense, VoxelGrid},
    header::GmpHeader,
    lists::{read_lights, read_zones, LightEntry, ZoneEntry},
    scanner::scan_chunks,
    sections::CompressedSections,
    types::{Chunk, ChunkMap, Tag},
};
use log::info;
use std::fs;
use std::path::Path;

/// GBMP解码器：持有整个文件内容和扫描得到的区块表
pub struct GmpDecoder {
    config: GmpConfig,
    data: Vec<u8>,
    header: Option<GmpHeader>,
    chunks: ChunkMap,
}

impl GmpDecoder {
    /// 从文件读取并扫描区块
    pub fn from_file<P: AsRef<Path>>(path: P, platform: Platform) -> Result<Self, GmpError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        info!("读取 {}（{} 字节，平台 {}）", path.display(), data.len(), platform);
        Self::from_bytes(data, platform)
    }

    pub fn from_bytes(data: Vec<u8>, platform: Platform) -> Result<Self, GmpError> {
        let config = platform.config();
        let scanned = scan_chunks(&data, &config)?;
        Ok(Self {
            config,
            data,
            header: scanned.header,
            chunks: scanned.chunks,
        })
    }

    pub fn config(&self) -> &GmpConfig {
        &self.config
    }

    pub fn header(&self) -> Option<&GmpHeader> {
        self.header.as_ref()
    }

    pub fn chunks(&self) -> &ChunkMap {
        &self.chunks
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 必需的区块，不存在时报错
    pub fn require_chunk(&self, tag: Tag) -> Result<&Chunk, GmpError> {
        self.chunks.get(tag).ok_or(GmpError::MissingChunk(tag))
    }

    /// 区块数据（不含填充）
    pub fn chunk_payload(&self, tag: Tag) -> Option<&[u8]> {
        self.chunks.get(tag).and_then(|chunk| chunk.payload(&self.data))
    }

    /// 定位列压缩区块的各段
    pub fn compressed_sections(&self) -> Result<CompressedSections, GmpError> {
        let chunk = self.require_chunk(self.config.layout.tag)?;
        CompressedSections::locate(
            &self.data,
            chunk.payload_offset,
            chunk.payload_end(),
            &self.config,
        )
    }

    /// 解压列压缩网格（PC为DMAP，PSX为CMAP）
    pub fn decode_grid(&self) -> Result<VoxelGrid, GmpError> {
        let sections = self.compressed_sections()?;
        info!(
            "{}：{} 个列字，{} 条完整方块，{} 条盖面方块",
            self.config.layout.tag,
            sections.column_words,
            sections.tier1.count,
            sections.tier2.map(|t| t.count).unwrap_or(0)
        );

        let store = ColumnStore::build(&self.data, &sections, &self.config)?;
        let table = BlockTable::new(&self.data, &sections, &self.config);
        let grid = assemble(&store, &table, &self.config)?;

        info!("解压完成，{} 个非空方块", grid.solid_count());
        Ok(grid)
    }

    /// 读取未压缩的UMAP网格
    pub fn read_dense_grid(&self) -> Result<VoxelGrid, GmpError> {
        let chunk = self.require_chunk(Tag::Umap)?;
        read_dense(&self.data, chunk, self.config.dims)
    }

    /// 有UMAP时直接读取，否则解压列压缩网格
    pub fn grid(&self) -> Result<VoxelGrid, GmpError> {
        if self.chunks.contains(Tag::Umap) {
            self.read_dense_grid()
        } else {
            self.decode_grid()
        }
    }

    pub fn zones(&self) -> Result<Vec<ZoneEntry>, GmpError> {
        match self.chunk_payload(Tag::Zone) {
            Some(payload) => read_zones(payload),
            None => Ok(Vec::new()),
        }
    }

    pub fn lights(&self) -> Result<Vec<LightEntry>, GmpError> {
        match self.chunk_payload(Tag::Lght) {
            Some(payload) => read_lights(payload),
            None => Ok(Vec::new()),
        }
    }
}
