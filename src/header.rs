use crate::{error::GmpError, GBMP_MAGIC};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;
use std::io::{Read, Write};

/// PC 文件头大小：魔数(4) + 版本号(2)
pub const HEADER_SIZE: usize = 6;

/// GBMP文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GmpHeader {
    pub version: u16,
}

/// 写入GBMP文件头
pub fn write_header<W: Write>(writer: &mut W, version: u16) -> Result<(), GmpError> {
    writer.write_all(GBMP_MAGIC)?;
    writer.write_u16::<LittleEndian>(version)?;
    Ok(())
}

/// 读取GBMP文件头
pub fn read_header<R: Read>(reader: &mut R) -> Result<GmpHeader, GmpError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;

    if magic != *GBMP_MAGIC {
        return Err(GmpError::InvalidMagic);
    }

    let version = reader.read_u16::<LittleEndian>()?;

    Ok(GmpHeader { version })
}
