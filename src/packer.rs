use crate::{
    chunk::write_chunk,
    compression::compress_grid,
    config::Platform,
    error::GmpError,
    grid::{write_dense, VoxelGrid},
    header::write_header,
    scanner::scan_chunks,
    types::Tag,
    unpacker::GmpDecoder,
    GBMP_VERSION,
};
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// 网格以何种形式写入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEncoding {
    /// 未压缩的UMAP
    Dense,
    /// PC列压缩的DMAP
    Compressed,
}

/// GBMP编码器，生成PC格式的地图文件
///
/// 区块顺序固定：网格、ZONE、ANIM，最后是原样追加的编辑器数据。
pub struct GmpEncoder {
    version: u16,
    grid: VoxelGrid,
    encoding: GridEncoding,
    zones: Option<Vec<u8>>,
    animations: Option<Vec<u8>>,
    edit_data: Option<Vec<u8>>,
}

impl GmpEncoder {
    pub fn new(grid: VoxelGrid) -> Self {
        Self {
            version: GBMP_VERSION,
            grid,
            encoding: GridEncoding::Dense,
            zones: None,
            animations: None,
            edit_data: None,
        }
    }

    /// 用解码结果创建编码器：网格加上原样复制的ZONE和ANIM
    pub fn from_decoder(decoder: &GmpDecoder) -> Result<Self, GmpError> {
        let mut encoder = Self::new(decoder.grid()?);
        encoder.zones = decoder.chunk_payload(Tag::Zone).map(<[u8]>::to_vec);
        encoder.animations = decoder.chunk_payload(Tag::Anim).map(<[u8]>::to_vec);
        Ok(encoder)
    }

    pub fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    pub fn with_encoding(mut self, encoding: GridEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// 设置ZONE区块数据
    pub fn with_zones(mut self, payload: Vec<u8>) -> Self {
        self.zones = Some(payload);
        self
    }

    /// 设置ANIM区块数据
    pub fn with_animations(mut self, payload: Vec<u8>) -> Self {
        self.animations = Some(payload);
        self
    }

    /// 设置追加在文件末尾的编辑器数据（不加区块头）
    pub fn with_edit_data(mut self, blob: Vec<u8>) -> Self {
        self.edit_data = Some(blob);
        self
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// 将所有数据写入GBMP文件
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GmpError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // 先在内存中编码，失败时不会留下不完整的文件
        let bytes = self.to_bytes()?;

        if path.exists() {
            fs::remove_file(path)?;
        }

        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;

        info!("写入 {}（{} 字节）", path.display(), bytes.len());
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GmpError> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }

    /// 将数据写入到指定的写入器
    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<(), GmpError> {
        write_header(writer, self.version)?;

        match self.encoding {
            GridEncoding::Dense => write_chunk(writer, Tag::Umap, &self.grid.to_dense_bytes())?,
            GridEncoding::Compressed => {
                let payload = compress_grid(&self.grid, &Platform::Pc.config())?;
                write_chunk(writer, Tag::Dmap, &payload)?;
            }
        }

        if let Some(zones) = &self.zones {
            write_chunk(writer, Tag::Zone, zones)?;
        }

        if let Some(animations) = &self.animations {
            write_chunk(writer, Tag::Anim, animations)?;
        }

        if let Some(edit_data) = &self.edit_data {
            writer.write_all(edit_data)?;
        }

        Ok(())
    }
}

/// 把网格写入一个PC文件的UMAP区块，返回写入的记录数
///
/// 缺少UMAP时在修改任何数据之前报错。
pub fn inject_grid(target: &mut [u8], grid: &VoxelGrid) -> Result<usize, GmpError> {
    let scanned = scan_chunks(target, &Platform::Pc.config())?;
    let chunk = *scanned
        .chunks
        .get(Tag::Umap)
        .ok_or(GmpError::MissingChunk(Tag::Umap))?;

    let written = write_dense(grid, &mut target[chunk.payload_offset..chunk.payload_end()]);
    if written < grid.dims().cell_count() {
        warn!(
            "UMAP只有 {} 字节，只写入了 {} / {} 条记录",
            chunk.payload_size,
            written,
            grid.dims().cell_count()
        );
    }
    Ok(written)
}

/// 复制目标文件到输出路径并注入网格
pub fn inject_into_file<P: AsRef<Path>, Q: AsRef<Path>>(
    target: P,
    output: Q,
    grid: &VoxelGrid,
) -> Result<usize, GmpError> {
    let target = target.as_ref();
    let output = output.as_ref();

    let mut data = fs::read(target)?;
    let written = inject_grid(&mut data, grid)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &data)?;

    info!(
        "已将 {} 条记录注入 {}，输出 {}",
        written,
        target.display(),
        output.display()
    );
    Ok(written)
}
