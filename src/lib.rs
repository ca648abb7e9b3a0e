//! # lsb_text 库
//!
//! 本库包含 LSB 文本隐写工具的核心逻辑：
//! 隐写核心 ([`steganography`])、文本适配器 ([`text`]) 和像素源 ([`pixels`])。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod pixels;
pub mod steganography;
pub mod text;

pub use error::CodecError;
