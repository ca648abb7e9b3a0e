//! # 隐写核心
//!
//! 通道缓冲区中的每个样本 (R, G, B, A 均计入) 是一个槽位，承载 1 bit。
//! 前 32 个槽位的 LSB 组成大端序的长度头，记录载荷的比特数；
//! 随后的槽位依次承载载荷比特。其余槽位保持不变。

use crate::constants::{BITS_PER_BYTE, LENGTH_HEADER_BITS};
use crate::error::CodecError;
use crate::text::{decode_latin1, encode_latin1};

/// 长度为 `buffer_len` 的缓冲区最多可隐藏的载荷比特数。
///
/// 扣除长度头后不足 0 时为 0；长度头只有 32 位，因此上限为 `u32::MAX`。
pub fn capacity_bits(buffer_len: usize) -> usize {
    buffer_len
        .saturating_sub(LENGTH_HEADER_BITS)
        .min(u32::MAX as usize)
}

/// 将字节逐个展开为比特，每个字节高位在前。
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// 将文本转换为比特序列，长度为 `8 * 字符数`。
///
/// # Errors
///
/// 文本包含码点大于 `0xFF` 的字符时返回 [`CodecError::UnsupportedCharacter`]。
pub fn text_to_bits(text: &str) -> Result<Vec<bool>, CodecError> {
    encode_latin1(text).map(|bytes| bytes_to_bits(&bytes))
}

/// 将比特序列隐藏到缓冲区的副本中并返回该副本。
///
/// 输入缓冲区不会被修改。返回的缓冲区与输入等长，
/// 只有前 `32 + bits.len()` 个槽位的最低位可能不同。
///
/// # Errors
///
/// `bits.len()` 超过 [`capacity_bits`] 时返回 [`CodecError::CapacityExceeded`]，
/// 其中 `max` 为允许的最大比特数。缓冲区不足 32 个槽位时任何载荷都放不下。
pub fn embed(buffer: &[u8], bits: &[bool]) -> Result<Vec<u8>, CodecError> {
    let max = capacity_bits(buffer.len());
    if buffer.len() < LENGTH_HEADER_BITS || bits.len() > max {
        return Err(CodecError::CapacityExceeded {
            required: bits.len(),
            max,
        });
    }

    // max <= u32::MAX
    let header = bytes_to_bits(&(bits.len() as u32).to_be_bytes());

    let mut stego = buffer.to_vec();
    stego
        .iter_mut()
        .zip(header.iter().chain(bits))
        .for_each(|(slot, &bit)| *slot = (*slot & !1) | u8::from(bit));

    log::trace!(
        "embedded {} payload bits into {} slots",
        bits.len(),
        buffer.len()
    );

    Ok(stego)
}

/// 从缓冲区中读出长度头以及其声明的载荷比特。
///
/// 全零缓冲区的长度头为 0，返回空载荷。
///
/// # Errors
///
/// * 缓冲区不足 32 个槽位时返回 [`CodecError::BufferTooSmall`]。
/// * 长度头声明的比特数超过剩余槽位时返回 [`CodecError::CorruptHeader`]。
pub fn extract(buffer: &[u8]) -> Result<Vec<bool>, CodecError> {
    if buffer.len() < LENGTH_HEADER_BITS {
        return Err(CodecError::BufferTooSmall { len: buffer.len() });
    }

    let (header, body) = buffer.split_at(LENGTH_HEADER_BITS);
    let declared = header
        .iter()
        .fold(0u32, |acc, &slot| (acc << 1) | u32::from(slot & 1)) as usize;

    if declared > body.len() {
        return Err(CodecError::CorruptHeader {
            declared,
            available: body.len(),
        });
    }

    log::trace!("length header declares {declared} payload bits");

    Ok(body[..declared].iter().map(|&slot| slot & 1 == 1).collect())
}

/// 将比特序列按 8 位一组 (高位在前) 还原为字节。
///
/// # Errors
///
/// 比特数不是 8 的整数倍时返回 [`CodecError::MalformedPayload`]，不会丢弃尾部。
pub fn bits_to_bytes(bits: &[bool]) -> Result<Vec<u8>, CodecError> {
    if bits.len() % BITS_PER_BYTE != 0 {
        return Err(CodecError::MalformedPayload {
            bit_len: bits.len(),
        });
    }

    Ok(bits
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect())
}

/// 将比特序列还原为文本，每个字节对应码点相同的 Latin-1 字符。
///
/// # Errors
///
/// 比特数不是 8 的整数倍时返回 [`CodecError::MalformedPayload`]。
pub fn bits_to_text(bits: &[bool]) -> Result<String, CodecError> {
    bits_to_bytes(bits).map(|bytes| decode_latin1(&bytes))
}
