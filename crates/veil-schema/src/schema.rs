//! Record schema descriptor
//!
//! A schema is an ordered list of field kinds with bit widths. Fixed-length
//! flag arrays expand into individual scalar fields in index order, so the
//! flat field sequence the cipher sees is fully determined by the schema.

use crate::error::SchemaError;

/// The kind and width of one record attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned scalar bounded to `bits` bits
    Scalar { bits: u8 },
    /// Single boolean flag (one field, values 0 or 1)
    Flag,
    /// Fixed-length array of boolean flags, flattened into `len` fields
    FlagArray { len: usize },
}

impl FieldKind {
    /// Number of flat fields this kind expands to
    pub fn flat_len(&self) -> usize {
        match self {
            FieldKind::Scalar { .. } | FieldKind::Flag => 1,
            FieldKind::FlagArray { len } => *len,
        }
    }
}

/// A named record attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Attribute name, used in error reporting
    pub name: &'static str,
    /// Kind and width
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a new descriptor
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Ordered schema for a fixed-shape record
///
/// Shared out-of-band by all participants; encode and decode both walk
/// this descriptor rather than hardcoding field counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    descriptors: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Create a schema from ordered descriptors
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Self {
        Self { descriptors }
    }

    /// The descriptors in schema order
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Total number of flat fields the schema describes
    pub fn flat_len(&self) -> usize {
        self.descriptors.iter().map(|d| d.kind.flat_len()).sum()
    }

    /// Iterate (flat field name, bit width) pairs in schema order
    fn flat_widths(&self) -> impl Iterator<Item = (String, u8)> + '_ {
        self.descriptors.iter().flat_map(|d| {
            let items: Vec<(String, u8)> = match d.kind {
                FieldKind::Scalar { bits } => vec![(d.name.to_string(), bits)],
                FieldKind::Flag => vec![(d.name.to_string(), 1)],
                FieldKind::FlagArray { len } => (0..len)
                    .map(|i| (format!("{}[{}]", d.name, i), 1))
                    .collect(),
            };
            items
        })
    }

    /// Validate a flat value sequence produced by encoding
    ///
    /// Checks the field count against the schema and every value against
    /// its declared width.
    pub fn validate_encoded(&self, values: &[u64]) -> Result<(), SchemaError> {
        let expected = self.flat_len();
        if values.len() != expected {
            return Err(SchemaError::SchemaMismatch {
                expected,
                actual: values.len(),
            });
        }

        for ((field, bits), &value) in self.flat_widths().zip(values) {
            if !fits_width(value, bits) {
                return Err(SchemaError::FieldOverflow { field, bits, value });
            }
        }
        Ok(())
    }

    /// Validate a flat value sequence received after decryption
    ///
    /// A wrong field count is a schema mismatch; a value outside its
    /// declared width means the delivered ciphertext was decrypted under
    /// the wrong key material.
    pub fn check_delivered(&self, values: &[u64]) -> Result<(), SchemaError> {
        let expected = self.flat_len();
        if values.len() != expected {
            return Err(SchemaError::SchemaMismatch {
                expected,
                actual: values.len(),
            });
        }

        for ((field, bits), &value) in self.flat_widths().zip(values) {
            if !fits_width(value, bits) {
                return Err(SchemaError::DeliveryMismatch { field });
            }
        }
        Ok(())
    }
}

/// Whether `value` fits in `bits` bits
fn fits_width(value: u64, bits: u8) -> bool {
    bits >= 64 || value < (1u64 << bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> RecordSchema {
        RecordSchema::new(vec![
            FieldDescriptor::new("id", FieldKind::Scalar { bits: 64 }),
            FieldDescriptor::new("level", FieldKind::Scalar { bits: 8 }),
            FieldDescriptor::new("active", FieldKind::Flag),
            FieldDescriptor::new("slots", FieldKind::FlagArray { len: 3 }),
        ])
    }

    #[test]
    fn test_flat_len_expands_arrays() {
        assert_eq!(sample_schema().flat_len(), 6);
    }

    #[test]
    fn test_validate_encoded_accepts_valid_values() {
        let schema = sample_schema();
        assert!(schema
            .validate_encoded(&[u64::MAX, 255, 1, 0, 1, 0])
            .is_ok());
    }

    #[test]
    fn test_validate_encoded_rejects_wrong_count() {
        let schema = sample_schema();
        let result = schema.validate_encoded(&[1, 2, 3]);
        assert!(matches!(
            result,
            Err(SchemaError::SchemaMismatch {
                expected: 6,
                actual: 3,
            })
        ));
    }

    #[test]
    fn test_validate_encoded_rejects_overflow() {
        let schema = sample_schema();
        let result = schema.validate_encoded(&[1, 256, 0, 0, 0, 0]);
        match result {
            Err(SchemaError::FieldOverflow { field, bits, value }) => {
                assert_eq!(field, "level");
                assert_eq!(bits, 8);
                assert_eq!(value, 256);
            }
            other => panic!("expected FieldOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_check_delivered_flags_garbage_as_mismatch() {
        let schema = sample_schema();
        let result = schema.check_delivered(&[1, 2, 0, 0, 7, 0]);
        match result {
            Err(SchemaError::DeliveryMismatch { field }) => {
                assert_eq!(field, "slots[1]");
            }
            other => panic!("expected DeliveryMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_flag_array_names_are_indexed() {
        let schema = sample_schema();
        let names: Vec<String> = schema.flat_widths().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "level", "active", "slots[0]", "slots[1]", "slots[2]"]);
    }
}
