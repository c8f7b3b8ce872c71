//! ZONE 和 LGHT 区块的只读列表。
//!
//! 这些区块在转换时按字节原样复制，这里只用于查看内容。

use crate::{
    error::GmpError,
    utils::{read_bytes, read_u16_at, read_u32_at, read_u8_at},
};
use serde::Serialize;

/// 区域记录头：类型、x、y、宽、高
pub const ZONE_HEADER_SIZE: usize = 5;
/// 光源记录大小
pub const LIGHT_INFO_SIZE: usize = 16;
/// fix16 坐标每格的单位数
pub const FIX16_UNITS_PER_BLOCK: u16 = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneEntry {
    pub zone_type: u8,
    pub x: u8,
    pub y: u8,
    pub w: u8,
    pub h: u8,
    pub name: String,
}

/// 拆分ZONE区块，直到声明的大小用完
pub fn read_zones(payload: &[u8]) -> Result<Vec<ZoneEntry>, GmpError> {
    let mut zones = Vec::new();
    let mut offset = 0;

    while offset < payload.len() {
        let header = read_bytes(payload, offset, ZONE_HEADER_SIZE)?;
        let name_len = read_u8_at(payload, offset + ZONE_HEADER_SIZE)? as usize;
        let name = read_bytes(payload, offset + ZONE_HEADER_SIZE + 1, name_len)?;

        zones.push(ZoneEntry {
            zone_type: header[0],
            x: header[1],
            y: header[2],
            w: header[3],
            h: header[4],
            name: String::from_utf8_lossy(name).into_owned(),
        });

        offset += ZONE_HEADER_SIZE + 1 + name_len;
    }

    Ok(zones)
}

/// fix16 坐标：整数格 + 格内偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fix16 {
    pub raw: u16,
}

impl Fix16 {
    pub fn block(&self) -> u16 {
        self.raw / FIX16_UNITS_PER_BLOCK
    }

    pub fn offset(&self) -> u16 {
        self.raw % FIX16_UNITS_PER_BLOCK
    }

    pub fn to_f32(&self) -> f32 {
        self.raw as f32 / FIX16_UNITS_PER_BLOCK as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightEntry {
    pub argb: u32,
    pub x: Fix16,
    pub y: Fix16,
    pub z: Fix16,
    pub radius: Fix16,
    pub intensity: u8,
    pub shape: u8,
    pub on_time: u8,
    pub off_time: u8,
}

/// 拆分LGHT区块为16字节记录
pub fn read_lights(payload: &[u8]) -> Result<Vec<LightEntry>, GmpError> {
    if payload.len() % LIGHT_INFO_SIZE != 0 {
        return Err(GmpError::ValidationError(format!(
            "LGHT区块大小 {} 不是 {} 的整数倍",
            payload.len(),
            LIGHT_INFO_SIZE
        )));
    }

    (0..payload.len() / LIGHT_INFO_SIZE)
        .map(|i| {
            let base = i * LIGHT_INFO_SIZE;
            Ok(LightEntry {
                argb: read_u32_at(payload, base)?,
                x: Fix16 { raw: read_u16_at(payload, base + 4)? },
                y: Fix16 { raw: read_u16_at(payload, base + 6)? },
                z: Fix16 { raw: read_u16_at(payload, base + 8)? },
                radius: Fix16 { raw: read_u16_at(payload, base + 10)? },
                intensity: read_u8_at(payload, base + 12)?,
                shape: read_u8_at(payload, base + 13)?,
                on_time: read_u8_at(payload, base + 14)?,
                off_time: read_u8_at(payload, base + 15)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_are_split_by_name_length() {
        let mut payload = vec![1, 10, 20, 5, 6, 3];
        payload.extend_from_slice(b"abc");
        payload.extend_from_slice(&[2, 0, 0, 1, 1, 0]);

        let zones = read_zones(&payload).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].name, "abc");
        assert_eq!((zones[0].x, zones[0].y, zones[0].w, zones[0].h), (10, 20, 5, 6));
        assert_eq!(zones[1].zone_type, 2);
        assert!(zones[1].name.is_empty());
    }

    #[test]
    fn zone_name_past_end_is_truncated() {
        let payload = [1, 0, 0, 1, 1, 4, b'a'];
        assert!(matches!(read_zones(&payload), Err(GmpError::Truncated { .. })));
    }

    #[test]
    fn lights_decode_fix16_coordinates() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&0xFF10_2030u32.to_le_bytes());
        payload.extend_from_slice(&(3 * 128 + 64u16).to_le_bytes());
        payload.extend_from_slice(&(255 * 128u16).to_le_bytes());
        payload.extend_from_slice(&(2 * 128u16).to_le_bytes());
        payload.extend_from_slice(&(128u16).to_le_bytes());
        payload.extend_from_slice(&[200, 1, 5, 6]);

        let lights = read_lights(&payload).unwrap();
        assert_eq!(lights.len(), 1);
        let light = lights[0];
        assert_eq!(light.argb, 0xFF10_2030);
        assert_eq!((light.x.block(), light.x.offset()), (3, 64));
        assert_eq!(light.x.to_f32(), 3.5);
        assert_eq!(light.y.block(), 255);
        assert_eq!(light.radius.to_f32(), 1.0);
        assert_eq!((light.intensity, light.shape, light.on_time, light.off_time), (200, 1, 5, 6));

        assert!(read_lights(&payload[..15]).is_err());
    }
}
