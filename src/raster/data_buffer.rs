//! Typed sample storage
//!
//! A `DataBuffer` holds one or more banks of elements of a single type.
//! Element accessors convert between the stored type and `i32`/`f32`/`f64`
//! with plain numeric casts: unsigned integers are zero extended, float to
//! integer conversion truncates toward zero and saturates, and integer
//! writes keep only the low bits that fit the element.

use super::data_type::DataType;

/// Banks of sample elements
#[derive(Debug, Clone, PartialEq)]
pub enum DataBuffer {
    Byte(Vec<Vec<u8>>),
    UShort(Vec<Vec<u16>>),
    Short(Vec<Vec<i16>>),
    Int(Vec<Vec<i32>>),
    Float(Vec<Vec<f32>>),
    Double(Vec<Vec<f64>>),
}

macro_rules! each_variant {
    ($buffer:expr, $banks:ident => $body:expr) => {
        match $buffer {
            DataBuffer::Byte($banks) => $body,
            DataBuffer::UShort($banks) => $body,
            DataBuffer::Short($banks) => $body,
            DataBuffer::Int($banks) => $body,
            DataBuffer::Float($banks) => $body,
            DataBuffer::Double($banks) => $body,
        }
    };
}

impl DataBuffer {
    /// Create a zero-filled buffer with `num_banks` banks of `bank_size` elements
    pub fn new(data_type: DataType, bank_size: usize, num_banks: usize) -> Self {
        match data_type {
            DataType::Byte => DataBuffer::Byte(vec![vec![0; bank_size]; num_banks]),
            DataType::UShort => DataBuffer::UShort(vec![vec![0; bank_size]; num_banks]),
            DataType::Short => DataBuffer::Short(vec![vec![0; bank_size]; num_banks]),
            DataType::Int => DataBuffer::Int(vec![vec![0; bank_size]; num_banks]),
            DataType::Float => DataBuffer::Float(vec![vec![0.0; bank_size]; num_banks]),
            DataType::Double => DataBuffer::Double(vec![vec![0.0; bank_size]; num_banks]),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DataBuffer::Byte(_) => DataType::Byte,
            DataBuffer::UShort(_) => DataType::UShort,
            DataBuffer::Short(_) => DataType::Short,
            DataBuffer::Int(_) => DataType::Int,
            DataBuffer::Float(_) => DataType::Float,
            DataBuffer::Double(_) => DataType::Double,
        }
    }

    pub fn num_banks(&self) -> usize {
        each_variant!(self, banks => banks.len())
    }

    /// Number of elements in a bank, or 0 if the bank does not exist
    pub fn bank_len(&self, bank: usize) -> usize {
        each_variant!(self, banks => banks.get(bank).map_or(0, |b| b.len()))
    }

    pub fn get_elem(&self, bank: usize, i: usize) -> i32 {
        match self {
            DataBuffer::Byte(b) => b[bank][i] as i32,
            DataBuffer::UShort(b) => b[bank][i] as i32,
            DataBuffer::Short(b) => b[bank][i] as i32,
            DataBuffer::Int(b) => b[bank][i],
            DataBuffer::Float(b) => b[bank][i] as i32,
            DataBuffer::Double(b) => b[bank][i] as i32,
        }
    }

    pub fn get_elem_float(&self, bank: usize, i: usize) -> f32 {
        match self {
            DataBuffer::Byte(b) => b[bank][i] as f32,
            DataBuffer::UShort(b) => b[bank][i] as f32,
            DataBuffer::Short(b) => b[bank][i] as f32,
            DataBuffer::Int(b) => b[bank][i] as f32,
            DataBuffer::Float(b) => b[bank][i],
            DataBuffer::Double(b) => b[bank][i] as f32,
        }
    }

    pub fn get_elem_double(&self, bank: usize, i: usize) -> f64 {
        match self {
            DataBuffer::Byte(b) => b[bank][i] as f64,
            DataBuffer::UShort(b) => b[bank][i] as f64,
            DataBuffer::Short(b) => b[bank][i] as f64,
            DataBuffer::Int(b) => b[bank][i] as f64,
            DataBuffer::Float(b) => b[bank][i] as f64,
            DataBuffer::Double(b) => b[bank][i],
        }
    }

    pub fn set_elem(&mut self, bank: usize, i: usize, value: i32) {
        match self {
            DataBuffer::Byte(b) => b[bank][i] = value as u8,
            DataBuffer::UShort(b) => b[bank][i] = value as u16,
            DataBuffer::Short(b) => b[bank][i] = value as i16,
            DataBuffer::Int(b) => b[bank][i] = value,
            DataBuffer::Float(b) => b[bank][i] = value as f32,
            DataBuffer::Double(b) => b[bank][i] = value as f64,
        }
    }

    pub fn set_elem_float(&mut self, bank: usize, i: usize, value: f32) {
        match self {
            DataBuffer::Byte(b) => b[bank][i] = value as i32 as u8,
            DataBuffer::UShort(b) => b[bank][i] = value as i32 as u16,
            DataBuffer::Short(b) => b[bank][i] = value as i32 as i16,
            DataBuffer::Int(b) => b[bank][i] = value as i32,
            DataBuffer::Float(b) => b[bank][i] = value,
            DataBuffer::Double(b) => b[bank][i] = value as f64,
        }
    }

    pub fn set_elem_double(&mut self, bank: usize, i: usize, value: f64) {
        match self {
            DataBuffer::Byte(b) => b[bank][i] = value as i32 as u8,
            DataBuffer::UShort(b) => b[bank][i] = value as i32 as u16,
            DataBuffer::Short(b) => b[bank][i] = value as i32 as i16,
            DataBuffer::Int(b) => b[bank][i] = value as i32,
            DataBuffer::Float(b) => b[bank][i] = value as f32,
            DataBuffer::Double(b) => b[bank][i] = value,
        }
    }

    /// Borrow the byte banks, if this is a `Byte` buffer
    pub fn as_bytes(&self) -> Option<&[Vec<u8>]> {
        match self {
            DataBuffer::Byte(banks) => Some(banks),
            _ => None,
        }
    }
}
