//! # 像素源模块
//!
//! 负责把无损图像解码为扁平的 RGBA8 通道缓冲区，并把缓冲区原样写回无损容器。
//! 有损格式会破坏最低有效位，因此输出时会被拒绝。

use crate::constants::CHANNELS_PER_PIXEL;
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ColorType, ImageFormat};
use std::path::Path;

/// 解码后的图像：尺寸加上按行排列的 RGBA8 样本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelImage {
    pub width: u32,
    pub height: u32,
    pub samples: Vec<u8>,
}

impl ChannelImage {
    /// 用已有的样本构造图像，样本数必须等于 `width * height * 4`。
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS_PER_PIXEL;
        anyhow::ensure!(
            samples.len() == expected,
            "Channel buffer length mismatch. \nExpected: {}, Actual: {}",
            expected.to_string().green().bold(),
            samples.len().to_string().red().bold()
        );

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// 像素数。
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// 读取图像文件并转换为 RGBA8 通道缓冲区。
///
/// # Errors
///
/// 文件无法打开或格式不受支持时返回错误。
pub fn load_channels(path: &Path) -> Result<ChannelImage> {
    let decoded = image::open(path).with_context(|| {
        format!(
            "Unable to decode image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::debug!(
        "decoded {}x{} image from {}",
        width,
        height,
        path.display()
    );

    ChannelImage::new(width, height, rgba.into_raw())
}

/// 检查输出路径的扩展名是否对应一种无损格式。
///
/// # Errors
///
/// 扩展名无法识别，或对应有损格式 (如 JPEG) 时返回错误。
pub fn ensure_lossless(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path).with_context(|| {
        format!(
            "Unable to determine the output image format: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        matches!(
            format,
            ImageFormat::Png
                | ImageFormat::Bmp
                | ImageFormat::Tiff
                | ImageFormat::WebP
                | ImageFormat::Qoi
        ),
        "Output format {} is lossy or unsupported and would destroy the hidden data: {}",
        format!("{format:?}").red().bold(),
        path.to_string_lossy().red().bold()
    );

    Ok(format)
}

/// 将通道缓冲区原样写入无损图像文件。
///
/// # Errors
///
/// 输出格式不是无损格式，或写入失败时返回错误。
pub fn save_channels(image: &ChannelImage, path: &Path) -> Result<()> {
    let format = ensure_lossless(path)?;

    image::save_buffer_with_format(
        path,
        &image.samples,
        image.width,
        image.height,
        ColorType::Rgba8,
        format,
    )
    .with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    log::debug!("encoded {:?} image to {}", format, path.display());

    Ok(())
}
