use clap::{Parser, Subcommand};
use gmpstream::{
    packer::inject_into_file,
    types::Tag,
    utils::{hex_digest, injected_output_path},
    GmpDecoder, GmpEncoder, GmpError, Platform,
};
use log::warn;
use std::fs;
use std::path::PathBuf;

/// GBMP地图工具 - 列压缩体素网格的解压、转换与注入
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 将PSX地图转换为PC格式（UMAP + ZONE + ANIM）
    Convert {
        /// 输入PSX地图路径
        #[arg(short, long)]
        input: PathBuf,

        /// 输出GBMP文件路径
        #[arg(short, long)]
        output: PathBuf,

        /// 追加在文件末尾的编辑器数据文件
        #[arg(short, long)]
        edit: Option<PathBuf>,
    },

    /// 解压地图并把网格注入另一个带UMAP的PC地图
    Inject {
        /// 输入地图路径
        #[arg(short, long)]
        input: PathBuf,

        /// 输入地图的平台: pc, psx
        #[arg(short, long, default_value = "pc")]
        platform: Platform,

        /// 目标PC地图路径（不会被修改）
        #[arg(short, long)]
        target: PathBuf,

        /// 输出路径，默认为 <目标名称>_injected.gmp
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 查看地图文件信息
    Info {
        /// 地图文件路径
        #[arg(short, long)]
        file: PathBuf,

        /// 地图平台: pc, psx
        #[arg(short, long, default_value = "pc")]
        platform: Platform,

        /// 是否详细输出
        #[arg(short, long)]
        verbose: bool,

        /// 以JSON格式输出
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), GmpError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Convert { input, output, edit } => {
            check_exists(input)?;
            match convert_psx_to_pc(input, output, edit.as_ref()) {
                Ok(_) => {
                    println!("转换完成: {}", output.display());
                    Ok(())
                }
                Err(e) => {
                    eprintln!("转换失败: {}", e);
                    Err(e)
                }
            }
        }

        Commands::Inject {
            input,
            platform,
            target,
            output,
        } => {
            check_exists(input)?;
            check_exists(target)?;

            let output = output
                .clone()
                .unwrap_or_else(|| injected_output_path(target));

            println!("解压中...");
            match inject_map(input, *platform, target, &output) {
                Ok(written) => {
                    println!("注入完成: {}（{} 条记录）", output.display(), written);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("注入失败: {}", e);
                    Err(e)
                }
            }
        }

        Commands::Info {
            file,
            platform,
            verbose,
            json,
        } => {
            check_exists(file)?;
            match print_map_info(file, *platform, *verbose, *json) {
                Ok(_) => Ok(()),
                Err(e) => {
                    eprintln!("获取文件信息失败: {}", e);
                    Err(e)
                }
            }
        }
    }
}

fn check_exists(path: &PathBuf) -> Result<(), GmpError> {
    if !path.exists() {
        return Err(GmpError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("文件不存在: {}", path.display()),
        )));
    }
    Ok(())
}

/// 解压PSX地图，输出PC地图
fn convert_psx_to_pc(
    input: &PathBuf,
    output: &PathBuf,
    edit: Option<&PathBuf>,
) -> Result<(), GmpError> {
    let decoder = GmpDecoder::from_file(input, Platform::Psx)?;
    let mut encoder = GmpEncoder::from_decoder(&decoder)?;

    if let Some(edit) = edit {
        if edit.exists() {
            encoder = encoder.with_edit_data(fs::read(edit)?);
        } else {
            warn!("编辑器数据文件不存在: {}", edit.display());
        }
    }

    encoder.write_to_file(output)
}

/// 解压输入地图并注入目标地图的副本
fn inject_map(
    input: &PathBuf,
    platform: Platform,
    target: &PathBuf,
    output: &PathBuf,
) -> Result<usize, GmpError> {
    let decoder = GmpDecoder::from_file(input, platform)?;
    let grid = decoder.decode_grid()?;
    inject_into_file(target, output, &grid)
}

/// 打印地图文件信息
fn print_map_info(
    file: &PathBuf,
    platform: Platform,
    verbose: bool,
    json: bool,
) -> Result<(), GmpError> {
    let decoder = GmpDecoder::from_file(file, platform)?;
    let sections = if decoder.chunks().contains(decoder.config().layout.tag) {
        Some(decoder.compressed_sections()?)
    } else {
        None
    };
    let zones = decoder.zones()?;
    let lights = decoder.lights()?;
    let grid = decoder.grid()?;
    let fingerprint = hex_digest(&grid.digest());

    if json {
        let zones_value = if verbose {
            serde_json::to_value(&zones)
        } else {
            serde_json::to_value(zones.len())
        }
        .map_err(|e| GmpError::ValidationError(format!("JSON序列化错误: {}", e)))?;

        let document = serde_json::json!({
            "file": file.display().to_string(),
            "platform": platform,
            "header": decoder.header(),
            "size": decoder.data().len(),
            "chunks": decoder.chunks(),
            "compressed": sections,
            "zones": zones_value,
            "lights": lights.len(),
            "solid_blocks": grid.solid_count(),
            "grid_sha256": fingerprint,
        });
        let text = serde_json::to_string_pretty(&document)
            .map_err(|e| GmpError::ValidationError(format!("JSON写入错误: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== GBMP文件信息 ===");
    println!("文件: {}", file.display());
    println!("平台: {}", platform);
    match decoder.header() {
        Some(header) => println!("版本: {}", header.version),
        None => println!("版本: 无文件头"),
    }
    println!("文件大小: {} 字节", decoder.data().len());

    println!("\n区块:");
    for chunk in decoder.chunks().iter() {
        println!(
            "  {} 偏移 {:#x} 大小 {:#x}",
            chunk.tag, chunk.payload_offset, chunk.payload_size
        );
    }

    if let Some(sections) = sections {
        println!("\n列字数: {}", sections.column_words);
        println!("完整方块数: {}", sections.tier1.count);
        if let Some(tier2) = sections.tier2 {
            println!("盖面方块数: {}", tier2.count);
        }
    }

    println!("\n区域数量: {}", zones.len());
    println!("光源数量: {}", lights.len());
    println!("非空方块: {}", grid.solid_count());
    println!("网格SHA-256: {}", fingerprint);

    if verbose {
        if !zones.is_empty() {
            println!("\n=== 区域 ===");
            for zone in &zones {
                println!(
                    "  [{}] {} @ ({}, {}) {}x{}",
                    zone.zone_type, zone.name, zone.x, zone.y, zone.w, zone.h
                );
            }
        }

        let passthrough: Vec<Tag> = decoder
            .chunks()
            .iter()
            .map(|c| c.tag)
            .filter(|tag| !matches!(tag, Tag::Umap | Tag::Cmap | Tag::Dmap))
            .collect();
        if !passthrough.is_empty() {
            let names: Vec<&str> = passthrough.iter().map(|t| t.as_str()).collect();
            println!("\n原样复制的区块: {}", names.join(", "));
        }
    }

    Ok(())
}
