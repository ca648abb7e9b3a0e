/// 长度头占用的槽位数 (每个槽位承载 1 bit)。
/// 长度头是一个大端序的 `u32`，记录载荷的比特数。
pub const LENGTH_HEADER_BITS: usize = 32;

/// 每个代码单元 (单字节字符) 展开后的比特数。
pub const BITS_PER_BYTE: usize = 8;

/// 每个像素的通道数。所有 RGBA 通道都作为槽位使用。
pub const CHANNELS_PER_PIXEL: usize = 4;

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 未指定输出路径时，隐写图像使用的扩展名 (无损 PNG)。
pub const HIDDEN_IMAGE_EXTENSION: &str = "png";

/// 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_TEXT_PREFIX: &str = "recovered_";

/// 未指定输出路径时，恢复文本使用的扩展名。
pub const RECOVERED_TEXT_EXTENSION: &str = "txt";
