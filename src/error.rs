//! # 编解码错误模块
//!
//! 隐写核心只返回 [`CodecError`]，调用方可以按分支匹配。
//! 命令层再把它上转为 `anyhow::Error` 并附加面向用户的上下文。

/// 隐写核心与文本适配器的错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// 载荷超过了缓冲区可承载的比特数。`max` 是允许的最大比特数。
    #[error("payload of {required} bits exceeds capacity; at most {max} bits fit")]
    CapacityExceeded { required: usize, max: usize },

    /// 缓冲区连长度头都放不下。
    #[error("buffer of {len} samples is too small to hold a 32-bit length header")]
    BufferTooSmall { len: usize },

    /// 长度头声明的比特数超过了剩余的槽位。
    #[error("length header declares {declared} bits but only {available} are available")]
    CorruptHeader { declared: usize, available: usize },

    /// 比特数不是 8 的整数倍。
    #[error("payload of {bit_len} bits is not a whole number of bytes")]
    MalformedPayload { bit_len: usize },

    #[error("character {ch:?} at index {index} is not representable as a single byte")]
    UnsupportedCharacter { ch: char, index: usize },
}
