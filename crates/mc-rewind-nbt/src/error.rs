use thiserror::Error;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("NBT data ended early")]
    UnexpectedEof,

    #[error("root tag must be a compound, found kind {0}")]
    RootNotCompound(u8),

    #[error("unknown tag kind {0}")]
    UnknownTagType(u8),

    #[error("NBT string is not valid UTF-8")]
    InvalidUtf8,

    #[error("NBT nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("negative NBT length {0}")]
    NegativeLength(i32),
}
