use crate::error::GmpError;
use byteorder::{ByteOrder, LittleEndian};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// 计算SHA-256哈希
pub fn calculate_sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// 哈希转为十六进制字符串
pub fn hex_digest(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 读取一段字节，越界时报告截断
pub fn read_bytes(data: &[u8], offset: usize, len: usize) -> Result<&[u8], GmpError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(GmpError::Truncated {
            offset,
            needed: len,
            available: data.len().saturating_sub(offset),
        })
}

pub fn read_u8_at(data: &[u8], offset: usize) -> Result<u8, GmpError> {
    Ok(read_bytes(data, offset, 1)?[0])
}

pub fn read_u16_at(data: &[u8], offset: usize) -> Result<u16, GmpError> {
    Ok(LittleEndian::read_u16(read_bytes(data, offset, 2)?))
}

pub fn read_u32_at(data: &[u8], offset: usize) -> Result<u32, GmpError> {
    Ok(LittleEndian::read_u32(read_bytes(data, offset, 4)?))
}

/// 按字宽（2或4字节）读取小端整数
pub fn read_word_at(data: &[u8], offset: usize, width: usize) -> Result<u32, GmpError> {
    match width {
        2 => read_u16_at(data, offset).map(u32::from),
        4 => read_u32_at(data, offset),
        _ => Err(GmpError::ValidationError(format!("不支持的字宽: {}", width))),
    }
}

/// 按字宽写入小端整数，超出字宽时报错
pub fn write_word(buffer: &mut Vec<u8>, value: u64, width: usize) -> Result<(), GmpError> {
    match width {
        2 => {
            let value = u16::try_from(value)
                .map_err(|_| GmpError::FieldOverflow(format!("{} 超出16位范围", value)))?;
            buffer.extend_from_slice(&value.to_le_bytes());
        }
        4 => {
            let value = u32::try_from(value)
                .map_err(|_| GmpError::FieldOverflow(format!("{} 超出32位范围", value)))?;
            buffer.extend_from_slice(&value.to_le_bytes());
        }
        _ => return Err(GmpError::ValidationError(format!("不支持的字宽: {}", width))),
    }
    Ok(())
}

/// 区块大小必须能放进4字节大小字段
pub fn validate_chunk_size(size: usize) -> Result<u32, GmpError> {
    u32::try_from(size).map_err(|_| GmpError::FileTooLarge)
}

/// 注入结果的默认输出路径：与目标文件同目录的 `<名称>_injected.gmp`
pub fn injected_output_path(target: &Path) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    target.with_file_name(format!("{}_injected.gmp", stem))
}
