//! Codec capability descriptors
//!
//! Plain data describing which parameters a codec reads in each role and
//! which values they may take. Two descriptors of the same format can be
//! negotiated down to what both sides support.

mod descriptor;

pub use descriptor::{CapabilityDescriptor, CodecRole, ParamDomain, ParamSpec, ParamValue};
