pub mod block;
pub mod block_table;
pub mod chunk;
pub mod column;
pub mod compression;
pub mod config;
pub mod error;
pub mod grid;
pub mod header;
pub mod lists;
pub mod packer;
pub mod scanner;
pub mod sections;
pub mod slope;
pub mod types;
pub mod unpacker;
pub mod utils;

pub use crate::block::BlockInfo;
pub use crate::config::{GmpConfig, Platform};
pub use crate::error::GmpError;
pub use crate::grid::VoxelGrid;
pub use crate::packer::GmpEncoder;
pub use crate::unpacker::GmpDecoder;

/// GBMP版本号常量
pub const GBMP_VERSION: u16 = 500;

/// GBMP魔数常量（只出现在PC文件中）
pub const GBMP_MAGIC: &[u8; 4] = b"GBMP";
