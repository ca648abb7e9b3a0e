//! # 文本适配器
//!
//! 在 Rust 字符串与单字节代码单元 (Latin-1, U+0000..=U+00FF) 之间转换。
//! 超出范围的字符会被拒绝，而不是被截断。

use crate::error::CodecError;

/// 将文本转换为 Latin-1 代码单元。
///
/// # Errors
///
/// 任一字符的码点大于 `0xFF` 时返回 [`CodecError::UnsupportedCharacter`]，
/// 其中 `index` 是字符 (而非字节) 下标。
pub fn encode_latin1(text: &str) -> Result<Vec<u8>, CodecError> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| {
            u8::try_from(ch).map_err(|_| CodecError::UnsupportedCharacter { ch, index })
        })
        .collect()
}

/// 将 Latin-1 代码单元还原为文本。每个字节都对应一个合法字符。
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}
