//! Declarative account layouts and the single routine that decodes them.
//!
//! Every on-chain record this crate reads is described as a static
//! [`Layout`]: a name, the total width and a list of fields (offset +
//! primitive kind). [`decode`] walks that list over an untrusted buffer
//! and hands the collected values to the record's [`AccountLayout`]
//! impl. Records never index into raw bytes themselves.

pub mod market;
pub mod pool;
pub mod token;

use solana_sdk::pubkey::Pubkey;

use crate::error::DecodeError;

pub use market::MarketState;
pub use pool::PoolState;
pub use token::{AccountState, MintRecord, TokenAccountRecord};

/// Primitive kinds a layout field can hold. Integers are little-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U32,
    U64,
    U128,
    Pubkey,
    /// One byte, `0` or `1`.
    Bool,
}

impl FieldKind {
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Bool => 1,
            FieldKind::U32 => 4,
            FieldKind::U64 => 8,
            FieldKind::U128 => 16,
            FieldKind::Pubkey => 32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }
}

/// Fixed description of a binary record.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub name: &'static str,
    /// Minimum buffer length accepted by [`decode`].
    pub size: usize,
    pub fields: &'static [Field],
}

impl Layout {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    U32(u32),
    U64(u64),
    U128(u128),
    Pubkey(Pubkey),
    Bool(bool),
}

/// Values read for one buffer, looked up by field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fields {
    layout: &'static str,
    values: Vec<(&'static str, Value)>,
}

impl Fields {
    pub fn layout_name(&self) -> &'static str {
        self.layout
    }

    fn get(&self, field: &'static str) -> Result<Value, DecodeError> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| *value)
            .ok_or(DecodeError::MissingField {
                layout: self.layout,
                field,
            })
    }

    fn mismatch(&self, field: &'static str) -> DecodeError {
        DecodeError::KindMismatch {
            layout: self.layout,
            field,
        }
    }

    pub fn u8(&self, field: &'static str) -> Result<u8, DecodeError> {
        match self.get(field)? {
            Value::U8(v) => Ok(v),
            _ => Err(self.mismatch(field)),
        }
    }

    pub fn u32(&self, field: &'static str) -> Result<u32, DecodeError> {
        match self.get(field)? {
            Value::U32(v) => Ok(v),
            _ => Err(self.mismatch(field)),
        }
    }

    pub fn u64(&self, field: &'static str) -> Result<u64, DecodeError> {
        match self.get(field)? {
            Value::U64(v) => Ok(v),
            _ => Err(self.mismatch(field)),
        }
    }

    pub fn u128(&self, field: &'static str) -> Result<u128, DecodeError> {
        match self.get(field)? {
            Value::U128(v) => Ok(v),
            _ => Err(self.mismatch(field)),
        }
    }

    pub fn pubkey(&self, field: &'static str) -> Result<Pubkey, DecodeError> {
        match self.get(field)? {
            Value::Pubkey(v) => Ok(v),
            _ => Err(self.mismatch(field)),
        }
    }

    pub fn bool(&self, field: &'static str) -> Result<bool, DecodeError> {
        match self.get(field)? {
            Value::Bool(v) => Ok(v),
            _ => Err(self.mismatch(field)),
        }
    }

    /// SPL `COption` tag: a u32 that must be 0 (none) or 1 (some).
    pub fn option_tag(&self, field: &'static str) -> Result<bool, DecodeError> {
        match self.u32(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidDiscriminant {
                layout: self.layout,
                field,
                value: other as u64,
            }),
        }
    }

    /// A u64 on-chain decimals field narrowed to u8.
    pub fn decimals(&self, field: &'static str) -> Result<u8, DecodeError> {
        let raw = self.u64(field)?;
        u8::try_from(raw).map_err(|_| DecodeError::InvalidDiscriminant {
            layout: self.layout,
            field,
            value: raw,
        })
    }
}

/// Records that can be produced from a [`Layout`].
pub trait AccountLayout: Sized {
    const LAYOUT: Layout;

    fn from_fields(fields: &Fields) -> Result<Self, DecodeError>;
}

/// Decode `data` into `T`. Pure: the same bytes always give the same record.
pub fn decode<T: AccountLayout>(data: &[u8]) -> Result<T, DecodeError> {
    let fields = read_fields(&T::LAYOUT, data)?;
    T::from_fields(&fields)
}

/// Read every field of `layout` out of `data`.
pub fn read_fields(layout: &Layout, data: &[u8]) -> Result<Fields, DecodeError> {
    let too_short = DecodeError::TooShort {
        layout: layout.name,
        expected: layout.size,
        actual: data.len(),
    };
    if data.len() < layout.size {
        return Err(too_short);
    }

    let mut values = Vec::with_capacity(layout.fields.len());
    for field in layout.fields {
        let bytes = data
            .get(field.offset..field.end())
            .ok_or_else(|| too_short.clone())?;
        values.push((field.name, read_value(layout.name, field, bytes)?));
    }

    Ok(Fields {
        layout: layout.name,
        values,
    })
}

fn read_value(layout: &'static str, field: &Field, bytes: &[u8]) -> Result<Value, DecodeError> {
    let too_short = || DecodeError::TooShort {
        layout,
        expected: field.end(),
        actual: field.offset + bytes.len(),
    };
    let value = match field.kind {
        FieldKind::U8 => Value::U8(bytes[0]),
        FieldKind::Bool => match bytes[0] {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            other => {
                return Err(DecodeError::InvalidDiscriminant {
                    layout,
                    field: field.name,
                    value: other as u64,
                })
            }
        },
        FieldKind::U32 => Value::U32(u32::from_le_bytes(
            bytes.try_into().map_err(|_| too_short())?,
        )),
        FieldKind::U64 => Value::U64(u64::from_le_bytes(
            bytes.try_into().map_err(|_| too_short())?,
        )),
        FieldKind::U128 => Value::U128(u128::from_le_bytes(
            bytes.try_into().map_err(|_| too_short())?,
        )),
        FieldKind::Pubkey => Value::Pubkey(Pubkey::new_from_array(
            bytes.try_into().map_err(|_| too_short())?,
        )),
    };
    Ok(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Writes values at a layout's offsets; used to build synthetic accounts.
    pub(crate) struct BufferWriter {
        layout: Layout,
        pub bytes: Vec<u8>,
    }

    impl BufferWriter {
        pub(crate) fn new(layout: Layout) -> Self {
            Self {
                layout,
                bytes: vec![0u8; layout.size],
            }
        }

        fn slot(&mut self, name: &str) -> &mut [u8] {
            let field = *self
                .layout
                .field(name)
                .unwrap_or_else(|| panic!("no field {name} in {}", self.layout.name));
            &mut self.bytes[field.offset..field.end()]
        }

        pub(crate) fn u8(mut self, name: &str, v: u8) -> Self {
            self.slot(name).copy_from_slice(&[v]);
            self
        }

        pub(crate) fn u32(mut self, name: &str, v: u32) -> Self {
            self.slot(name).copy_from_slice(&v.to_le_bytes());
            self
        }

        pub(crate) fn u64(mut self, name: &str, v: u64) -> Self {
            self.slot(name).copy_from_slice(&v.to_le_bytes());
            self
        }

        pub(crate) fn pubkey(mut self, name: &str, v: &Pubkey) -> Self {
            self.slot(name).copy_from_slice(v.as_ref());
            self
        }

        pub(crate) fn build(self) -> Vec<u8> {
            self.bytes
        }
    }

    const TEST_FIELDS: &[Field] = &[
        Field::new("flag", 0, FieldKind::Bool),
        Field::new("count", 1, FieldKind::U32),
        Field::new("key", 5, FieldKind::Pubkey),
        Field::new("big", 37, FieldKind::U128),
    ];

    struct Probe {
        flag: bool,
        count: u32,
        key: Pubkey,
        big: u128,
    }

    impl AccountLayout for Probe {
        const LAYOUT: Layout = Layout {
            name: "Probe",
            size: 53,
            fields: TEST_FIELDS,
        };

        fn from_fields(fields: &Fields) -> Result<Self, DecodeError> {
            Ok(Self {
                flag: fields.bool("flag")?,
                count: fields.u32("count")?,
                key: fields.pubkey("key")?,
                big: fields.u128("big")?,
            })
        }
    }

    fn probe_bytes(key: &Pubkey) -> Vec<u8> {
        let mut bytes = vec![0u8; 53];
        bytes[0] = 1;
        bytes[1..5].copy_from_slice(&7u32.to_le_bytes());
        bytes[5..37].copy_from_slice(key.as_ref());
        bytes[37..53].copy_from_slice(&(u64::MAX as u128 + 5).to_le_bytes());
        bytes
    }

    #[test]
    fn test_decode_reads_little_endian_fields() {
        let key = Pubkey::new_unique();
        let probe: Probe = decode(&probe_bytes(&key)).unwrap();
        assert!(probe.flag);
        assert_eq!(probe.count, 7);
        assert_eq!(probe.key, key);
        assert_eq!(probe.big, u64::MAX as u128 + 5);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let bytes = probe_bytes(&Pubkey::new_unique());
        let a = read_fields(&Probe::LAYOUT, &bytes).unwrap();
        let b = read_fields(&Probe::LAYOUT, &bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_buffer_is_rejected_for_every_length() {
        let bytes = probe_bytes(&Pubkey::new_unique());
        for len in 0..bytes.len() {
            match decode::<Probe>(&bytes[..len]) {
                Err(DecodeError::TooShort { expected, actual, .. }) => {
                    assert_eq!(expected, 53);
                    assert_eq!(actual, len);
                }
                other => panic!("len {len}: expected TooShort, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let key = Pubkey::new_unique();
        let mut bytes = probe_bytes(&key);
        bytes.extend_from_slice(&[0xff; 16]);
        let probe: Probe = decode(&bytes).unwrap();
        assert_eq!(probe.key, key);
    }

    #[test]
    fn test_bool_outside_zero_one_is_invalid() {
        let mut bytes = probe_bytes(&Pubkey::new_unique());
        bytes[0] = 2;
        assert_eq!(
            decode::<Probe>(&bytes).err(),
            Some(DecodeError::InvalidDiscriminant {
                layout: "Probe",
                field: "flag",
                value: 2
            })
        );
    }

    #[test]
    fn test_wrong_kind_lookup_is_reported() {
        let bytes = probe_bytes(&Pubkey::new_unique());
        let fields = read_fields(&Probe::LAYOUT, &bytes).unwrap();
        assert_eq!(
            fields.u64("count"),
            Err(DecodeError::KindMismatch {
                layout: "Probe",
                field: "count"
            })
        );
        assert_eq!(
            fields.u64("nope"),
            Err(DecodeError::MissingField {
                layout: "Probe",
                field: "nope"
            })
        );
    }

    /// Every declared field must fit inside its layout and must not overlap
    /// the next one.
    pub(crate) fn assert_layout_consistent(layout: &Layout) {
        let mut sorted: Vec<&Field> = layout.fields.iter().collect();
        sorted.sort_by_key(|f| f.offset);
        for pair in sorted.windows(2) {
            assert!(
                pair[0].end() <= pair[1].offset,
                "{}: `{}` overlaps `{}`",
                layout.name,
                pair[0].name,
                pair[1].name
            );
        }
        if let Some(last) = sorted.last() {
            assert!(last.end() <= layout.size, "{}: `{}` past end", layout.name, last.name);
        }
    }

    #[test]
    fn test_probe_layout_consistent() {
        assert_layout_consistent(&Probe::LAYOUT);
    }
}
