use crate::{
    chunk::{read_chunk_header, terminator_run, CHUNK_HEADER_SIZE},
    config::{GmpConfig, Platform},
    error::GmpError,
    header::{read_header, GmpHeader, HEADER_SIZE},
    sections::CompressedSections,
    types::{Chunk, ChunkMap, Tag},
    utils::read_bytes,
};
use log::debug;
use std::io::Cursor;

/// RGEN 区块在PSX文件中数据之后固定跟随的字节数
const RGEN_TRAILER_SIZE: usize = 2;

/// 扫描结果
#[derive(Debug, Clone)]
pub struct ScannedContainer {
    /// PC文件才有文件头
    pub header: Option<GmpHeader>,
    pub chunks: ChunkMap,
}

/// 扫描整个文件，找出每个区块的数据偏移和大小
pub fn scan_chunks(data: &[u8], config: &GmpConfig) -> Result<ScannedContainer, GmpError> {
    let (header, start) = if config.has_file_header {
        read_bytes(data, 0, HEADER_SIZE)?;
        let header = read_header(&mut Cursor::new(data))?;
        debug!("文件头: GBMP，版本 {}", header.version);
        (Some(header), HEADER_SIZE)
    } else {
        (None, 0)
    };

    let mut chunks = ChunkMap::new();
    let mut offset = start;

    while offset < data.len() {
        let (chunk, next) = match config.platform {
            Platform::Pc => scan_pc_chunk(data, offset)?,
            Platform::Psx => scan_psx_chunk(data, offset, config)?,
        };

        debug!(
            "找到区块 {}，偏移 {:#x}，大小 {:#x}",
            chunk.tag, chunk.payload_offset, chunk.payload_size
        );

        if !chunks.insert(chunk) {
            return Err(GmpError::DuplicateChunk(chunk.tag));
        }
        offset = next;
    }

    Ok(ScannedContainer { header, chunks })
}

/// PC区块：标签 + 大小 + 数据，没有填充
fn scan_pc_chunk(data: &[u8], offset: usize) -> Result<(Chunk, usize), GmpError> {
    let (tag, size) = read_chunk_header(data, offset)?;
    let payload_offset = offset + CHUNK_HEADER_SIZE;
    let payload_size = size as usize;
    read_bytes(data, payload_offset, payload_size)?;

    let chunk = Chunk {
        tag,
        payload_offset,
        payload_size,
    };
    Ok((chunk, payload_offset + payload_size))
}

/// PSX区块：数据之后跟着长度不定的0xAA填充，需要逐字节扫描找到下一个区块
fn scan_psx_chunk(
    data: &[u8],
    offset: usize,
    config: &GmpConfig,
) -> Result<(Chunk, usize), GmpError> {
    let (tag, size) = read_chunk_header(data, offset)?;
    let payload_offset = offset + CHUNK_HEADER_SIZE;

    let (payload_size, next) = if tag == config.layout.tag {
        // 声明的大小不可信，按各段长度走到数据末尾
        let sections = CompressedSections::locate(data, payload_offset, data.len(), config)?;
        let padding = expect_terminators(data, tag, sections.end)?;
        (sections.end - payload_offset, sections.end + padding)
    } else if tag == Tag::Rgen {
        let payload_size = size as usize;
        read_bytes(data, payload_offset, payload_size + RGEN_TRAILER_SIZE)?;
        (payload_size, payload_offset + payload_size + RGEN_TRAILER_SIZE)
    } else {
        let payload_size = size as usize;
        read_bytes(data, payload_offset, payload_size)?;
        let end = payload_offset + payload_size;
        let padding = expect_terminators(data, tag, end)?;
        (payload_size, end + padding)
    };

    let chunk = Chunk {
        tag,
        payload_offset,
        payload_size,
    };
    Ok((chunk, next))
}

fn expect_terminators(data: &[u8], tag: Tag, offset: usize) -> Result<usize, GmpError> {
    match terminator_run(data, offset) {
        0 => Err(GmpError::MissingTerminator { tag, offset }),
        count => Ok(count),
    }
}
