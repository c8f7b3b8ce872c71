use crate::{
    config::CHUNK_PADDING_BYTE,
    error::GmpError,
    types::Tag,
    utils::{read_bytes, read_u32_at, validate_chunk_size},
};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// 区块头大小：标签(4) + 大小(4)
pub const CHUNK_HEADER_SIZE: usize = 8;

/// 读取偏移处的区块头，返回标签和声明的大小
pub fn read_chunk_header(data: &[u8], offset: usize) -> Result<(Tag, u32), GmpError> {
    let raw = read_bytes(data, offset, 4)?;
    let tag = Tag::from_bytes(raw).ok_or_else(|| {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(raw);
        GmpError::UnknownTag { tag: bytes, offset }
    })?;
    let size = read_u32_at(data, offset + 4)?;
    Ok((tag, size))
}

/// 写入区块头
pub fn write_chunk_header<W: Write>(writer: &mut W, tag: Tag, size: usize) -> Result<(), GmpError> {
    writer.write_all(tag.as_bytes())?;
    writer.write_u32::<LittleEndian>(validate_chunk_size(size)?)?;
    Ok(())
}

/// 写入完整区块（区块头 + 数据）
pub fn write_chunk<W: Write>(writer: &mut W, tag: Tag, payload: &[u8]) -> Result<(), GmpError> {
    write_chunk_header(writer, tag, payload.len())?;
    writer.write_all(payload)?;
    Ok(())
}

/// 按PSX方式写入区块：区块头 + 数据 + 若干0xAA填充
pub fn write_padded_chunk<W: Write>(
    writer: &mut W,
    tag: Tag,
    payload: &[u8],
    padding: usize,
) -> Result<(), GmpError> {
    if padding == 0 {
        return Err(GmpError::ValidationError(
            "PSX区块至少需要一个填充字节".to_string(),
        ));
    }
    write_chunk(writer, tag, payload)?;
    writer.write_all(&vec![CHUNK_PADDING_BYTE; padding])?;
    Ok(())
}

/// 统计从偏移处开始连续的0xAA字节数，到文件末尾为止
pub fn terminator_run(data: &[u8], offset: usize) -> usize {
    data.get(offset..)
        .map(|rest| rest.iter().take_while(|&&b| b == CHUNK_PADDING_BYTE).count())
        .unwrap_or(0)
}
