//! Capability descriptors and parameter domains

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{invalid, TileResult};

/// Which side of a codec a descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecRole {
    Encoder,
    Decoder,
}

impl fmt::Display for CodecRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecRole::Encoder => write!(f, "encoder"),
            CodecRole::Decoder => write!(f, "decoder"),
        }
    }
}

/// A parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// One integer per band or per table entry; domains check every element
    IntList(Vec<i64>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::IntList(values) if values.len() > 8 => {
                write!(f, "[{}, {}, ... {} values]", values[0], values[1], values.len())
            }
            ParamValue::IntList(values) => write!(f, "{:?}", values),
        }
    }
}

/// Values a parameter may take
#[derive(Debug, Clone, PartialEq)]
pub enum ParamDomain {
    /// Inclusive integer range
    IntRange { min: i64, max: i64 },
    /// Inclusive float range
    FloatRange { min: f64, max: f64 },
    /// Explicit set of allowed values
    Values(Vec<ParamValue>),
}

impl ParamDomain {
    /// Whether a value, or every element of a list value, is in the domain
    pub fn admits(&self, value: &ParamValue) -> bool {
        match value {
            ParamValue::IntList(items) => items.iter().all(|&i| self.admits_scalar(&ParamValue::Int(i))),
            scalar => self.admits_scalar(scalar),
        }
    }

    fn admits_scalar(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamDomain::IntRange { min, max }, ParamValue::Int(v)) => min <= v && v <= max,
            (ParamDomain::FloatRange { min, max }, ParamValue::Float(v)) => *min <= *v && *v <= *max,
            (ParamDomain::FloatRange { min, max }, ParamValue::Int(v)) => *min <= *v as f64 && *v as f64 <= *max,
            (ParamDomain::Values(allowed), v) => allowed.contains(v),
            _ => false,
        }
    }

    /// Values admitted by both domains, or `None` if there are none
    pub fn intersect(&self, other: &ParamDomain) -> Option<ParamDomain> {
        use ParamDomain::*;

        let domain = match (self, other) {
            (IntRange { min: a, max: b }, IntRange { min: c, max: d }) => IntRange { min: *a.max(c), max: *b.min(d) },
            (FloatRange { min: a, max: b }, FloatRange { min: c, max: d }) => FloatRange { min: a.max(*c), max: b.min(*d) },
            (IntRange { min, max }, FloatRange { min: fmin, max: fmax })
            | (FloatRange { min: fmin, max: fmax }, IntRange { min, max }) => IntRange {
                min: (*min).max(fmin.ceil() as i64),
                max: (*max).min(fmax.floor() as i64),
            },
            (Values(values), range) | (range, Values(values)) if !matches!(range, Values(_)) => {
                Values(values.iter().filter(|v| range.admits(v)).cloned().collect())
            }
            (Values(a), Values(b)) => Values(a.iter().filter(|v| b.contains(v)).cloned().collect()),
            // The guard above makes the mixed arms exhaustive
            _ => return None,
        };

        if domain.is_empty() {
            None
        } else {
            Some(domain)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ParamDomain::IntRange { min, max } => min > max,
            ParamDomain::FloatRange { min, max } => !(min <= max),
            ParamDomain::Values(values) => values.is_empty(),
        }
    }

    /// The smallest or first value, shaped like `like` when that is a list
    pub fn representative(&self, like: &ParamValue) -> Option<ParamValue> {
        let scalar = match self {
            ParamDomain::IntRange { min, max } if min <= max => ParamValue::Int(*min),
            ParamDomain::FloatRange { min, max } if min <= max => ParamValue::Float(*min),
            ParamDomain::Values(values) => values.first()?.clone(),
            _ => return None,
        };
        match (like, scalar) {
            (ParamValue::IntList(items), ParamValue::Int(v)) => Some(ParamValue::IntList(vec![v; items.len()])),
            (_, scalar) => Some(scalar),
        }
    }
}

impl fmt::Display for ParamDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDomain::IntRange { min, max } => write!(f, "{}..={}", min, max),
            ParamDomain::FloatRange { min, max } => write!(f, "{}..={}", min, max),
            ParamDomain::Values(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}

/// One named parameter of a codec
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub domain: ParamDomain,
    pub default: ParamValue,
}

impl ParamSpec {
    pub fn new(name: &str, domain: ParamDomain, default: ParamValue) -> Self {
        ParamSpec {
            name: name.to_string(),
            domain,
            default,
        }
    }
}

/// Parameters a codec supports in one role
///
/// Immutable once built; negotiation produces a new descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityDescriptor {
    format: String,
    role: CodecRole,
    params: Vec<ParamSpec>,
}

impl CapabilityDescriptor {
    /// Build a descriptor; every default must lie in its domain
    pub fn new(format: &str, role: CodecRole, params: Vec<ParamSpec>) -> TileResult<Self> {
        for spec in &params {
            if !spec.domain.admits(&spec.default) {
                return invalid(format!(
                    "default {} of {} is outside its domain {}",
                    spec.default, spec.name, spec.domain
                ));
            }
        }
        Ok(CapabilityDescriptor {
            format: format.to_string(),
            role,
            params,
        })
    }

    /// Descriptor of a built-in codec, whose defaults are checked by tests
    pub(crate) fn builtin(format: &str, role: CodecRole, params: Vec<ParamSpec>) -> Self {
        CapabilityDescriptor {
            format: format.to_string(),
            role,
            params,
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn role(&self) -> CodecRole {
        self.role
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether `name` is a known parameter and `value` lies in its domain
    pub fn admits(&self, name: &str, value: &ParamValue) -> bool {
        self.param(name).map_or(false, |p| p.domain.admits(value))
    }

    /// Check a full set of named values against the descriptor
    pub fn check_values(&self, values: &BTreeMap<String, ParamValue>) -> TileResult<()> {
        for (name, value) in values {
            match self.param(name) {
                None => return invalid(format!("{} {} has no parameter {}", self.format, self.role, name)),
                Some(spec) if !spec.domain.admits(value) => {
                    return invalid(format!("{} = {} is outside {}", name, value, spec.domain))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// A descriptor both sides support
    ///
    /// Formats must match. Parameters both sides know are narrowed to the
    /// intersection of their domains, which must not be empty. Parameters
    /// only one side knows are taken over unchanged. Defaults are kept when
    /// they are still admissible, this side's first.
    pub fn negotiate(&self, other: &CapabilityDescriptor) -> TileResult<CapabilityDescriptor> {
        if !self.format.eq_ignore_ascii_case(&other.format) {
            return invalid(format!("cannot negotiate {} with {}", self.format, other.format));
        }

        let mut params = Vec::with_capacity(self.params.len());
        for spec in &self.params {
            match other.param(&spec.name) {
                None => params.push(spec.clone()),
                Some(theirs) => {
                    let domain = match spec.domain.intersect(&theirs.domain) {
                        Some(domain) => domain,
                        None => {
                            return invalid(format!(
                                "no common value for {}: {} versus {}",
                                spec.name, spec.domain, theirs.domain
                            ))
                        }
                    };
                    let default = [&spec.default, &theirs.default]
                        .into_iter()
                        .find(|d| domain.admits(d))
                        .cloned()
                        .or_else(|| domain.representative(&spec.default));
                    match default {
                        Some(default) => params.push(ParamSpec {
                            name: spec.name.clone(),
                            domain,
                            default,
                        }),
                        None => return invalid(format!("no usable default for {}", spec.name)),
                    }
                }
            }
        }
        for spec in &other.params {
            if self.param(&spec.name).is_none() {
                params.push(spec.clone());
            }
        }

        Ok(CapabilityDescriptor {
            format: self.format.clone(),
            role: self.role,
            params,
        })
    }

    /// One admissible value per parameter
    pub fn negotiated_values(&self) -> BTreeMap<String, ParamValue> {
        self.params
            .iter()
            .filter_map(|spec| {
                let value = if spec.domain.admits(&spec.default) {
                    Some(spec.default.clone())
                } else {
                    spec.domain.representative(&spec.default)
                };
                value.map(|v| (spec.name.clone(), v))
            })
            .collect()
    }
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.format, self.role)?;
        for spec in &self.params {
            writeln!(f, "  {:<26} {} (default {})", spec.name, spec.domain, spec.default)?;
        }
        Ok(())
    }
}
