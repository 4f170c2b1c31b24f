//! Fixed-shape patient record and its field codec
//!
//! The patient record is the shape shared by every participant of the
//! sharing protocol: an identifier, numeric attributes, and a fixed-length
//! allergy flag array. Encoding flattens it into schema order; decoding is
//! the exact inverse.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::{FieldDescriptor, FieldKind, RecordSchema};

/// Number of allergy flag slots in the record
pub const ALLERGY_SLOTS: usize = 5;

/// A patient medical record
///
/// Only ever transmitted as ciphertext outside the trusted computation
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Unique patient identifier
    pub patient_id: u64,
    /// Patient age in years
    pub age: u8,
    /// Gender flag
    pub gender: bool,
    /// Blood type code
    pub blood_type: u8,
    /// Weight in kilograms
    pub weight: u16,
    /// Height in centimeters
    pub height: u16,
    /// Allergy flags, one per known allergen slot
    pub allergies: [bool; ALLERGY_SLOTS],
}

impl PatientRecord {
    /// Create a new patient record
    pub fn new(
        patient_id: u64,
        age: u8,
        gender: bool,
        blood_type: u8,
        weight: u16,
        height: u16,
        allergies: [bool; ALLERGY_SLOTS],
    ) -> Self {
        Self {
            patient_id,
            age,
            gender,
            blood_type,
            weight,
            height,
            allergies,
        }
    }

    /// The shared schema for patient records
    pub fn schema() -> RecordSchema {
        RecordSchema::new(vec![
            FieldDescriptor::new("patient_id", FieldKind::Scalar { bits: 64 }),
            FieldDescriptor::new("age", FieldKind::Scalar { bits: 8 }),
            FieldDescriptor::new("gender", FieldKind::Flag),
            FieldDescriptor::new("blood_type", FieldKind::Scalar { bits: 8 }),
            FieldDescriptor::new("weight", FieldKind::Scalar { bits: 16 }),
            FieldDescriptor::new("height", FieldKind::Scalar { bits: 16 }),
            FieldDescriptor::new("allergies", FieldKind::FlagArray { len: ALLERGY_SLOTS }),
        ])
    }

    /// Flatten the record into the schema-defined field order
    ///
    /// The allergy flag array expands into individual scalar fields in
    /// index order. Validates the result against the schema before
    /// returning it.
    pub fn encode_fields(&self, schema: &RecordSchema) -> Result<Vec<u64>, SchemaError> {
        let mut fields = Vec::with_capacity(schema.flat_len());
        fields.push(self.patient_id);
        fields.push(self.age as u64);
        fields.push(self.gender as u64);
        fields.push(self.blood_type as u64);
        fields.push(self.weight as u64);
        fields.push(self.height as u64);
        fields.extend(self.allergies.iter().map(|&flag| flag as u64));

        schema.validate_encoded(&fields)?;
        Ok(fields)
    }

    /// Rebuild a record from a flat field sequence
    ///
    /// Exact inverse of [`encode_fields`](Self::encode_fields). Fails with
    /// [`SchemaError::SchemaMismatch`] on a wrong field count and
    /// [`SchemaError::DeliveryMismatch`] when a value does not fit its
    /// declared width.
    pub fn decode_fields(schema: &RecordSchema, fields: &[u64]) -> Result<Self, SchemaError> {
        schema.check_delivered(fields)?;

        let mut allergies = [false; ALLERGY_SLOTS];
        for (slot, &field) in allergies.iter_mut().zip(&fields[6..]) {
            *slot = field != 0;
        }

        Ok(Self {
            patient_id: fields[0],
            age: fields[1] as u8,
            gender: fields[2] != 0,
            blood_type: fields[3] as u8,
            weight: fields[4] as u16,
            height: fields[5] as u16,
            allergies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PatientRecord {
        PatientRecord::new(420, 69, true, 1, 70, 170, [false, true, false, true, false])
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let record = sample_record();
        let schema = PatientRecord::schema();

        let fields = record.encode_fields(&schema).unwrap();
        assert_eq!(fields.len(), schema.flat_len());
        assert_eq!(fields.len(), 11);

        let decoded = PatientRecord::decode_fields(&schema, &fields).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encode_order_matches_schema() {
        let record = sample_record();
        let fields = record.encode_fields(&PatientRecord::schema()).unwrap();

        assert_eq!(fields[0], 420);
        assert_eq!(fields[1], 69);
        assert_eq!(fields[2], 1);
        assert_eq!(fields[3], 1);
        assert_eq!(fields[4], 70);
        assert_eq!(fields[5], 170);
        assert_eq!(&fields[6..], &[0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let schema = PatientRecord::schema();
        let result = PatientRecord::decode_fields(&schema, &[1, 2, 3]);
        assert!(matches!(
            result,
            Err(SchemaError::SchemaMismatch {
                expected: 11,
                actual: 3,
            })
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_width_values() {
        let schema = PatientRecord::schema();
        let mut fields = sample_record().encode_fields(&schema).unwrap();
        fields[1] = 1000; // age cannot exceed 8 bits

        let result = PatientRecord::decode_fields(&schema, &fields);
        assert!(matches!(
            result,
            Err(SchemaError::DeliveryMismatch { .. })
        ));
    }

    #[test]
    fn test_roundtrip_edge_values() {
        let record = PatientRecord::new(u64::MAX, 255, false, 255, 65535, 65535, [true; 5]);
        let schema = PatientRecord::schema();

        let fields = record.encode_fields(&schema).unwrap();
        let decoded = PatientRecord::decode_fields(&schema, &fields).unwrap();
        assert_eq!(decoded, record);
    }
}
