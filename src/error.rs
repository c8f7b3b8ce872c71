use crate::types::Tag;
use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum GmpError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("无效的魔数，不是GBMP文件")]
    InvalidMagic,

    #[error("未知的区块标签 {tag:?}，偏移 {offset:#x}")]
    UnknownTag { tag: [u8; 4], offset: usize },

    #[error("区块 {0} 重复出现")]
    DuplicateChunk(Tag),

    #[error("区块 {tag} 之后缺少0xAA终止符，偏移 {offset:#x}")]
    MissingTerminator { tag: Tag, offset: usize },

    #[error("数据被截断：偏移 {offset:#x} 需要 {needed} 字节，但只有 {available} 字节")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("列 ({x}, {y}) 高度 {height} 超过7，偏移 {offset:#x}")]
    ColumnHeight { x: usize, y: usize, height: u8, offset: usize },

    #[error("列 ({x}, {y}) 起始层 {base_z} 超过7，偏移 {offset:#x}")]
    ColumnBase { x: usize, y: usize, base_z: u8, offset: usize },

    #[error("列 ({x}, {y}) 高度 {height} 小于起始层 {base_z}，偏移 {offset:#x}")]
    ColumnInverted {
        x: usize,
        y: usize,
        height: u8,
        base_z: u8,
        offset: usize,
    },

    #[error("列 ({x}, {y}) 的字偏移 {word} 超出列数据范围")]
    ColumnPointer { x: usize, y: usize, word: u32 },

    #[error("方块ID {id} 超出第{tier}层方块表范围（共 {count} 条）")]
    BlockIdOutOfRange { id: u32, tier: u8, count: u32 },

    #[error("坐标 ({x}, {y}, {z}) 超出网格范围")]
    CoordinateOutOfRange { x: usize, y: usize, z: usize },

    #[error("缺少必需的区块: {0}")]
    MissingChunk(Tag),

    #[error("密集网格区块大小不符：需要 {expected} 字节，实际 {actual} 字节")]
    DenseGridSize { expected: usize, actual: usize },

    #[error("字段溢出: {0}")]
    FieldOverflow(String),

    #[error("文件太大，超过4GB限制")]
    FileTooLarge,

    #[error("校验错误: {0}")]
    ValidationError(String),
}
