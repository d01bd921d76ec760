//! Sample element types

use std::fmt;

/// Element type of every sample in a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 8-bit unsigned
    Byte,
    /// 16-bit unsigned
    UShort,
    /// 16-bit signed
    Short,
    /// 32-bit signed
    Int,
    /// 32-bit IEEE float
    Float,
    /// 64-bit IEEE float
    Double,
}

impl DataType {
    /// All element types, in wire-code order
    pub const ALL: [DataType; 6] = [
        DataType::Byte,
        DataType::UShort,
        DataType::Short,
        DataType::Int,
        DataType::Float,
        DataType::Double,
    ];

    /// Stable one-byte code used in serialized layout descriptors
    pub fn code(self) -> u8 {
        match self {
            DataType::Byte => 0,
            DataType::UShort => 1,
            DataType::Short => 2,
            DataType::Int => 3,
            DataType::Float => 4,
            DataType::Double => 5,
        }
    }

    /// Inverse of [`DataType::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        DataType::ALL.get(code as usize).copied()
    }

    /// Size of one element in bytes
    pub fn size(self) -> usize {
        match self {
            DataType::Byte => 1,
            DataType::UShort | DataType::Short => 2,
            DataType::Int | DataType::Float => 4,
            DataType::Double => 8,
        }
    }

    /// Whether samples of this type are integral
    pub fn is_integral(self) -> bool {
        !matches!(self, DataType::Float | DataType::Double)
    }

    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            DataType::Byte => "byte",
            DataType::UShort => "ushort",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Double => "double",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
