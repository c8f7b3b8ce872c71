mod common;

use common::*;
use gmpstream::{
    block::BlockInfo,
    compression::compress_grid,
    config::GridDims,
    packer::{inject_into_file, GridEncoding},
    types::Tag,
    utils::injected_output_path,
    GmpDecoder, GmpEncoder, GmpError, Platform, VoxelGrid,
};
use std::fs;
use tempfile::tempdir;

fn psx_map() -> (VoxelGrid, Vec<u8>) {
    let mut grid = VoxelGrid::new(GridDims::default());
    grid.set(0, 0, 0, full_block(1));
    grid.set(0, 0, 1, lid_block(40, 8));
    grid.set(128, 64, 5, full_block(2));
    grid.set(255, 255, 6, lid_block(41, 0));

    let cmap = compress_grid(&grid, &Platform::Psx.config()).unwrap();
    let data = psx_container(&cmap, Some(sample_zones().as_slice()), Some(&[1, 2, 3, 4][..]), 3);
    (grid, data)
}

#[test]
fn convert_psx_file_to_pc_layout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("city.cmp");
    let output = dir.path().join("out").join("city.gmp");
    let (grid, data) = psx_map();
    fs::write(&input, data).unwrap();

    let decoder = GmpDecoder::from_file(&input, Platform::Psx).unwrap();
    GmpEncoder::from_decoder(&decoder)
        .unwrap()
        .with_edit_data(b"EDIT\x02\x00\x00\x00ab".to_vec())
        .write_to_file(&output)
        .unwrap();

    let converted = GmpDecoder::from_file(&output, Platform::Pc).unwrap();
    let order: Vec<Tag> = converted.chunks().iter().map(|c| c.tag).collect();
    assert_eq!(order, vec![Tag::Umap, Tag::Zone, Tag::Anim, Tag::Edit]);
    assert_eq!(converted.header().map(|h| h.version), Some(500));
    assert_eq!(converted.chunk_payload(Tag::Zone), Some(sample_zones().as_slice()));
    assert_eq!(converted.chunk_payload(Tag::Anim), Some(&[1u8, 2, 3, 4][..]));
    assert_eq!(converted.grid().unwrap(), grid);
}

#[test]
fn compressed_pc_output_round_trips() {
    let (grid, _) = psx_map();
    let bytes = GmpEncoder::new(grid.clone())
        .with_encoding(GridEncoding::Compressed)
        .to_bytes()
        .unwrap();

    let decoder = GmpDecoder::from_bytes(bytes, Platform::Pc).unwrap();
    assert!(!decoder.chunks().contains(Tag::Umap));
    assert_eq!(decoder.grid().unwrap(), grid);
}

#[test]
fn inject_writes_grid_into_copy_of_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("base.gmp");
    let (grid, _) = psx_map();

    GmpEncoder::new(VoxelGrid::new(GridDims::default()))
        .with_zones(sample_zones())
        .write_to_file(&target)
        .unwrap();
    let target_before = fs::read(&target).unwrap();

    let output = injected_output_path(&target);
    assert_eq!(output, dir.path().join("base_injected.gmp"));

    let written = inject_into_file(&target, &output, &grid).unwrap();
    assert_eq!(written, 256 * 256 * 8);
    assert_eq!(fs::read(&target).unwrap(), target_before);

    let injected = GmpDecoder::from_file(&output, Platform::Pc).unwrap();
    assert_eq!(injected.read_dense_grid().unwrap(), grid);
    assert_eq!(injected.chunk_payload(Tag::Zone), Some(sample_zones().as_slice()));
}

#[test]
fn inject_into_short_dense_chunk_stops_early() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("short.gmp");
    let output = dir.path().join("short_out.gmp");
    fs::write(&target, pc_container(&[(Tag::Umap, &[0u8; 36][..])])).unwrap();

    let mut grid = VoxelGrid::new(GridDims::default());
    grid.set(1, 0, 0, full_block(5));
    grid.set(3, 0, 0, full_block(6));

    assert_eq!(inject_into_file(&target, &output, &grid).unwrap(), 3);

    let data = fs::read(&output).unwrap();
    let umap = &data[data.len() - 36..];
    assert_eq!(&umap[..12], &BlockInfo::AIR.to_bytes()[..]);
    assert_eq!(&umap[12..24], &full_block(5).to_bytes()[..]);
}

#[test]
fn inject_into_target_without_dense_chunk_leaves_no_output() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("nodense.gmp");
    let output = dir.path().join("nodense_out.gmp");
    fs::write(&target, pc_container(&[(Tag::Zone, sample_zones().as_slice())])).unwrap();

    let (grid, _) = psx_map();
    assert!(matches!(
        inject_into_file(&target, &output, &grid),
        Err(GmpError::MissingChunk(Tag::Umap))
    ));
    assert!(!output.exists());
}

#[test]
fn compressed_output_refuses_top_level_blocks() {
    let (mut grid, _) = psx_map();
    grid.set(3, 3, 7, full_block(9));

    let dense = GmpEncoder::new(grid.clone()).to_bytes().unwrap();
    let decoder = GmpDecoder::from_bytes(dense, Platform::Pc).unwrap();
    assert_eq!(decoder.grid().unwrap(), grid);

    assert!(matches!(
        GmpEncoder::new(grid)
            .with_encoding(GridEncoding::Compressed)
            .to_bytes(),
        Err(GmpError::FieldOverflow(_))
    ));
}
