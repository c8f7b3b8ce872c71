use serde::{Serialize, Serializer};
use std::fmt;

/// 区块标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// 未压缩的密集网格
    Umap,
    /// PSX 列压缩网格
    Cmap,
    /// PC 列压缩网格
    Dmap,
    Zone,
    Mobj,
    Psxm,
    Anim,
    Lght,
    Edit,
    Thsr,
    Rgen,
}

impl Tag {
    pub const ALL: [Tag; 11] = [
        Tag::Umap,
        Tag::Cmap,
        Tag::Dmap,
        Tag::Zone,
        Tag::Mobj,
        Tag::Psxm,
        Tag::Anim,
        Tag::Lght,
        Tag::Edit,
        Tag::Thsr,
        Tag::Rgen,
    ];

    pub fn as_bytes(&self) -> &'static [u8; 4] {
        match self {
            Tag::Umap => b"UMAP",
            Tag::Cmap => b"CMAP",
            Tag::Dmap => b"DMAP",
            Tag::Zone => b"ZONE",
            Tag::Mobj => b"MOBJ",
            Tag::Psxm => b"PSXM",
            Tag::Anim => b"ANIM",
            Tag::Lght => b"LGHT",
            Tag::Edit => b"EDIT",
            Tag::Thsr => b"THSR",
            Tag::Rgen => b"RGEN",
        }
    }

    pub fn as_str(&self) -> &'static str {
        // 标签都是ASCII
        std::str::from_utf8(self.as_bytes()).unwrap_or("????")
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.as_bytes()[..] == *bytes)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 扫描得到的区块位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub tag: Tag,
    /// 数据起始位置（文件内绝对偏移）
    pub payload_offset: usize,
    /// 有效数据大小（不含PSX填充字节）
    pub payload_size: usize,
}

impl Chunk {
    pub fn payload_end(&self) -> usize {
        self.payload_offset + self.payload_size
    }

    /// 取出区块数据
    pub fn payload<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.payload_offset..self.payload_end())
    }
}

/// 一个文件中的所有区块，按出现顺序保存，每种标签至多一个
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkMap {
    chunks: Vec<Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加区块，重复的标签返回 false
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        if self.contains(chunk.tag) {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    pub fn get(&self, tag: Tag) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.tag == tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.get(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// 一个平面坐标上的方块列
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Column {
    pub height: u8,
    pub base_z: u8,
    /// 从 base_z 开始向上的方块ID
    pub block_ids: Vec<u32>,
}

impl Column {
    pub fn num_blocks(&self) -> usize {
        self.block_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_bytes_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_bytes(tag.as_bytes()), Some(tag));
        }
        assert_eq!(Tag::from_bytes(b"GBMP"), None);
        assert_eq!(Tag::from_bytes(b"UMA"), None);
    }

    #[test]
    fn chunk_map_rejects_duplicate_tags() {
        let mut map = ChunkMap::new();
        let zone = Chunk {
            tag: Tag::Zone,
            payload_offset: 8,
            payload_size: 4,
        };
        assert!(map.insert(zone));
        assert!(!map.insert(zone));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(Tag::Zone), Some(&zone));
        assert!(map.get(Tag::Anim).is_none());
    }

    #[test]
    fn chunk_payload_is_bounded() {
        let data = [0u8, 1, 2, 3, 4, 5];
        let chunk = Chunk {
            tag: Tag::Anim,
            payload_offset: 2,
            payload_size: 3,
        };
        assert_eq!(chunk.payload(&data), Some(&data[2..5]));

        let oversized = Chunk {
            payload_size: 10,
            ..chunk
        };
        assert_eq!(oversized.payload(&data), None);
    }
}
