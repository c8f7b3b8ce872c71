#![allow(dead_code)]

use gmpstream::{
    block::BlockInfo,
    chunk::{write_chunk, write_padded_chunk},
    config::{CMAP_FIRST_GAP, CMAP_SECOND_GAP},
    header::write_header,
    types::Tag,
};

pub const PLANAR_CELLS: usize = 256 * 256;

/// PSX CMAP 数据：索引表、列数据、两层方块表
pub fn cmap_payload(
    index: &[u16],
    stream: &[u16],
    tier1: &[BlockInfo],
    tier2: &[BlockInfo],
) -> Vec<u8> {
    assert_eq!(index.len(), PLANAR_CELLS);
    let mut payload = Vec::new();
    for word in index {
        payload.extend_from_slice(&word.to_le_bytes());
    }
    payload.extend_from_slice(&(stream.len() as u16).to_le_bytes());
    for word in stream {
        payload.extend_from_slice(&word.to_le_bytes());
    }
    payload.extend(vec![0u8; CMAP_FIRST_GAP]);
    payload.extend_from_slice(&(tier1.len() as u16).to_le_bytes());
    for info in tier1 {
        payload.extend_from_slice(&info.to_bytes());
    }
    payload.extend(vec![0u8; CMAP_SECOND_GAP]);
    payload.extend_from_slice(&(tier2.len() as u16).to_le_bytes());
    for info in tier2 {
        payload.extend_from_slice(&info.to_lid_bytes());
    }
    payload
}

/// PSX列记录：高度和起始层各一字节，合成一个小端字
pub fn psx_column_header(height: u8, base_z: u8) -> u16 {
    u16::from_le_bytes([height, base_z])
}

/// PSX地图：CMAP，然后是可选的ZONE和ANIM，每个区块后跟 `padding` 个0xAA
pub fn psx_container(
    cmap: &[u8],
    zone: Option<&[u8]>,
    anim: Option<&[u8]>,
    padding: usize,
) -> Vec<u8> {
    let mut data = Vec::new();
    write_padded_chunk(&mut data, Tag::Cmap, cmap, padding).unwrap();
    if let Some(zone) = zone {
        write_padded_chunk(&mut data, Tag::Zone, zone, padding).unwrap();
    }
    if let Some(anim) = anim {
        write_padded_chunk(&mut data, Tag::Anim, anim, padding).unwrap();
    }
    data
}

/// PC地图，区块按给定顺序写入
pub fn pc_container(chunks: &[(Tag, &[u8])]) -> Vec<u8> {
    let mut data = Vec::new();
    write_header(&mut data, 500).unwrap();
    for (tag, payload) in chunks {
        write_chunk(&mut data, *tag, payload).unwrap();
    }
    data
}

pub fn full_block(seed: u16) -> BlockInfo {
    BlockInfo {
        left: seed,
        right: seed + 1,
        top: seed + 2,
        bottom: seed + 3,
        lid: seed + 4,
        arrows: (seed % 7) as u8,
        slope_type: 1 | ((seed % 40) as u8) << 2,
    }
}

pub fn lid_block(lid: u16, slope_type: u8) -> BlockInfo {
    BlockInfo {
        lid,
        arrows: 1,
        slope_type,
        ..BlockInfo::AIR
    }
}

/// 示例区域列表（两条）
pub fn sample_zones() -> Vec<u8> {
    let mut zones = vec![1, 10, 11, 3, 4, 4];
    zones.extend_from_slice(b"dock");
    zones.extend_from_slice(&[5, 0, 0, 255, 255, 2]);
    zones.extend_from_slice(b"ok");
    zones
}
