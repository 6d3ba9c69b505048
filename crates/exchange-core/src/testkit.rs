//! Helpers for building rows without a real record format attached.
//!
//! Only compiled for tests (this crate's own, and downstream crates that
//! enable the `testkit` feature). Production code never constructs records
//! this way — it receives `RecordRef`s from the real row format already in
//! place upstream of the exchange.

use crate::record::{FieldMeta, FieldType, RecordMeta, VarlenSlot};

/// One field's value for [`encode_row`].
pub enum FieldValue {
    Int8(i64),
    Text(String),
}

/// Encodes a row matching `fields` into an owned byte buffer plus whatever
/// varlen backing bytes its `Text` fields need, and returns the
/// [`RecordMeta`] describing the layout.
///
/// The returned `Vec<Vec<u8>>` of varlen backing buffers must outlive any
/// `RecordRef` built from the first return value, since the inline varlen
/// slots point into it.
pub fn encode_row(fields: &[FieldValue]) -> (Vec<u8>, Vec<Vec<u8>>, RecordMeta) {
    let mut metas = Vec::with_capacity(fields.len());
    let mut offset = 0usize;
    for field in fields {
        let (field_type, width) = match field {
            FieldValue::Int8(_) => (FieldType::Int8, 8),
            FieldValue::Text(_) => (FieldType::Character, VarlenSlot::WIDTH),
        };
        metas.push(FieldMeta { field_type, offset, nullable: false });
        offset += width;
    }
    let record_size = offset;
    let mut buf = vec![0u8; record_size];
    let mut varlen_backing = Vec::new();
    for (field, meta) in fields.iter().zip(&metas) {
        match field {
            FieldValue::Int8(v) => {
                buf[meta.offset..meta.offset + 8].copy_from_slice(&v.to_ne_bytes());
            }
            FieldValue::Text(s) => {
                let backing = s.clone().into_bytes();
                let slot = VarlenSlot { len: backing.len(), ptr: backing.as_ptr() as usize };
                slot.write_at(&mut buf, meta.offset);
                varlen_backing.push(backing);
            }
        }
    }
    (buf, varlen_backing, RecordMeta::new(metas, record_size))
}
