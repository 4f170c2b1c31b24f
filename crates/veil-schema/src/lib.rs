//! # Veil Schema
//!
//! Record schema descriptor and fixed-shape record codec.
//!
//! A record is only ever transmitted as an ordered sequence of
//! fixed-width unsigned integer fields; this crate owns the mapping
//! between the structured record and that flat field sequence. Field
//! count and order are fixed by a schema shared out-of-band by all
//! parties, and neither the codec nor the cipher hardcodes field counts
//! inline.
//!
//! ## Key Types
//!
//! - [`RecordSchema`]: ordered descriptor of field kinds with bit widths
//! - [`PatientRecord`]: the fixed-shape patient record and its codec
//!
//! ## Example
//!
//! ```rust,ignore
//! use veil_schema::PatientRecord;
//!
//! let record = PatientRecord::new(420, 69, true, 1, 70, 170, [false; 5]);
//! let schema = PatientRecord::schema();
//!
//! let fields = record.encode_fields(&schema)?;
//! assert_eq!(PatientRecord::decode_fields(&schema, &fields)?, record);
//! ```

pub mod error;
pub mod patient;
pub mod schema;

// Re-exports
pub use error::{SchemaError, SchemaResult};
pub use patient::{PatientRecord, ALLERGY_SLOTS};
pub use schema::{FieldDescriptor, FieldKind, RecordSchema};
