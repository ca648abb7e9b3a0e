//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{
    BITS_PER_BYTE, HIDDEN_IMAGE_EXTENSION, HIDDEN_IMAGE_PREFIX, RECOVERED_TEXT_EXTENSION,
    RECOVERED_TEXT_PREFIX,
};
use crate::error::CodecError;
use crate::pixels::{self, ChannelImage};
use crate::steganography::{bits_to_text, capacity_bits, embed, extract, text_to_bits};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、把文本转换为比特、调用隐写核心函数隐藏长度和载荷，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`，或目标格式不是无损格式。
/// * 无法读取输入的图像或文本文件。
/// * 文本包含无法用单字节表示的字符。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| {
        default_output_path(&args.image, HIDDEN_IMAGE_PREFIX, HIDDEN_IMAGE_EXTENSION)
    });

    ensure_writable(&dest, args.force)?;
    pixels::ensure_lossless(&dest)?;

    let cover = pixels::load_channels(&args.image)?;

    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let bits = text_to_bits(&text).with_context(|| {
        format!(
            "The text in {} contains characters that cannot be hidden. \nOnly single-byte (Latin-1) characters are supported.",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    log::info!(
        "hiding {} bits in {} ({} slots)",
        bits.len(),
        args.image.display(),
        cover.samples.len()
    );

    let samples = embed(&cover.samples, &bits).map_err(|err| match err {
        CodecError::CapacityExceeded { required, max } => anyhow::anyhow!(
            "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            max.to_string().green().bold()
        ),
        other => anyhow::Error::new(other),
    })?;

    let stego = ChannelImage::new(cover.width, cover.height, samples)?;
    pixels::save_channels(&stego, &dest)?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数读出长度头和载荷，
/// 最后将恢复的文本内容写入目标文本文件 (UTF-8)。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有有效的隐藏消息。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args.text.unwrap_or_else(|| {
        default_output_path(&args.image, RECOVERED_TEXT_PREFIX, RECOVERED_TEXT_EXTENSION)
    });

    ensure_writable(&dest, args.force)?;

    let picture = pixels::load_channels(&args.image)?;

    let bits = extract(&picture.samples).with_context(|| {
        format!(
            "No valid hidden message found in '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    log::info!(
        "recovered {} bits from {}",
        bits.len(),
        args.image.display()
    );

    let text = bits_to_text(&bits).with_context(|| {
        format!(
            "The hidden payload in '{}' is malformed.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// # Errors
///
/// 无法读取或解码图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = pixels::load_channels(&args.image)?;
    let bits = capacity_bits(picture.samples.len());

    log::debug!(
        "{} pixels, {} slots",
        picture.pixel_count(),
        picture.samples.len()
    );

    println!(
        "{}x{} image, {} slots: up to {} bits ({} characters) can be hidden.",
        picture.width,
        picture.height,
        picture.samples.len(),
        bits.to_string().green().bold(),
        (bits / BITS_PER_BYTE).to_string().green().bold()
    );

    Ok(())
}

/// 在 `source` 所在目录下生成 `<prefix><source 文件名主干>.<extension>`。
pub fn default_output_path(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| "output".into());

    source.with_file_name(format!("{prefix}{stem}.{extension}"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );

    if force && path.exists() {
        log::warn!("overwriting {}", path.display());
    }

    Ok(())
}
