//! Raw attributes → positional feature vector.
//!
//! Every field is validated before anything is assembled, so a failure never
//! yields a partially filled vector.

use tracing::debug;

use crate::domain::{
    ESTABLISHMENT_YEAR, EncodedVector, FeatureDomain, ITEM_MRP, ITEM_TYPE_CODE, ITEM_VISIBILITY,
    ITEM_WEIGHT, RawAttributes,
};
use crate::encode::tables::{FAT_MAP, LOCATION_MAP, SIZE_MAP, TYPE_MAP};
use crate::error::EncodeError;

/// How numeric fields outside their documented domain are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Reject out-of-range and fractional-integer values.
    #[default]
    Enforce,
    /// Pass numbers through unchecked (NaN/inf are still rejected).
    Lenient,
}

/// Stateless encoder; cheap to copy and safe to share between sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    pub range_policy: RangePolicy,
}

impl Encoder {
    pub fn new(range_policy: RangePolicy) -> Self {
        Self { range_policy }
    }

    /// Encode `raw` into the model's fixed field order.
    pub fn encode(&self, raw: &RawAttributes) -> Result<EncodedVector, EncodeError> {
        let fat = FAT_MAP.lookup(&raw.item_fat_content)?;
        let size = SIZE_MAP.lookup(&raw.outlet_size)?;
        let location = LOCATION_MAP.lookup(&raw.outlet_location_type)?;
        let outlet_type = TYPE_MAP.lookup(&raw.outlet_type)?;

        let weight = self.check(&ITEM_WEIGHT, raw.item_weight)?;
        let visibility = self.check(&ITEM_VISIBILITY, raw.item_visibility)?;
        let item_type = self.check(&ITEM_TYPE_CODE, raw.item_type_code as f64)?;
        let mrp = self.check(&ITEM_MRP, raw.item_mrp)?;
        let year = self.check(&ESTABLISHMENT_YEAR, raw.outlet_establishment_year as f64)?;

        let encoded = EncodedVector::new([
            weight,
            f64::from(fat),
            visibility,
            item_type,
            mrp,
            year,
            f64::from(size),
            f64::from(location),
            f64::from(outlet_type),
        ]);
        debug!(vector = ?encoded.as_slice(), "encoded attributes");
        Ok(encoded)
    }

    fn check(&self, domain: &FeatureDomain, value: f64) -> Result<f64, EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::InvalidNumber {
                field: domain.field,
                reason: format!("{value} is not a finite number"),
            });
        }

        if self.range_policy == RangePolicy::Lenient {
            return Ok(value);
        }

        if domain.integral && value.fract() != 0.0 {
            return Err(EncodeError::InvalidNumber {
                field: domain.field,
                reason: format!("{value} must be a whole number"),
            });
        }
        if !domain.contains(value) {
            return Err(EncodeError::OutOfRange {
                field: domain.field,
                value,
                min: domain.min,
                max: domain.max,
            });
        }
        Ok(value)
    }
}

/// Encode with the default (enforcing) policy.
pub fn encode(raw: &RawAttributes) -> Result<EncodedVector, EncodeError> {
    Encoder::default().encode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::tables::ALL_TABLES;

    #[test]
    fn reference_example_encodes_exactly() {
        let v = encode(&RawAttributes::reference_example()).unwrap();
        assert_eq!(
            v.values(),
            [13.5, 0.0, 0.065, 4.0, 245.25, 1999.0, 2.0, 1.0, 3.0]
        );
        assert_eq!(v.len(), 9);
    }

    #[test]
    fn high_size_and_type3_both_encode_to_zero() {
        let raw = RawAttributes {
            outlet_size: "High".to_string(),
            outlet_type: "Supermarket Type3".to_string(),
            ..RawAttributes::reference_example()
        };
        let v = encode(&raw).unwrap();
        assert_eq!(v.get(6), Some(0.0), "outlet_size position");
        assert_eq!(v.get(8), Some(0.0), "outlet_type position");

        // Each collision holds on its own, independent of the other field.
        let only_size = RawAttributes {
            outlet_size: "High".to_string(),
            ..RawAttributes::reference_example()
        };
        let v = encode(&only_size).unwrap();
        assert_eq!(v.get(6), Some(0.0));
        assert_eq!(v.get(8), Some(3.0));

        let only_type = RawAttributes {
            outlet_type: "Supermarket Type3".to_string(),
            ..RawAttributes::reference_example()
        };
        let v = encode(&only_type).unwrap();
        assert_eq!(v.get(6), Some(2.0));
        assert_eq!(v.get(8), Some(0.0));
    }

    #[test]
    fn every_label_lands_at_its_position() {
        let positions = [1usize, 6, 7, 8];
        for (table, &pos) in ALL_TABLES.iter().zip(positions.iter()) {
            for &(label, code) in table.entries() {
                let mut raw = RawAttributes::reference_example();
                match table.field {
                    "item_fat_content" => raw.item_fat_content = label.to_string(),
                    "outlet_size" => raw.outlet_size = label.to_string(),
                    "outlet_location_type" => raw.outlet_location_type = label.to_string(),
                    "outlet_type" => raw.outlet_type = label.to_string(),
                    other => panic!("unexpected table {other}"),
                }
                let v = encode(&raw).unwrap();
                assert_eq!(v.get(pos), Some(f64::from(code)), "{} = {label}", table.field);
                assert_eq!(v.as_slice().len(), 9);
            }
        }
    }

    #[test]
    fn all_72_categorical_combinations_are_deterministic() {
        let mut seen = 0;
        for &outlet_type in TYPE_MAP.labels().iter() {
            for &size in SIZE_MAP.labels().iter() {
                for &location in LOCATION_MAP.labels().iter() {
                    for &fat in FAT_MAP.labels().iter() {
                        let raw = RawAttributes {
                            item_fat_content: fat.to_string(),
                            outlet_size: size.to_string(),
                            outlet_location_type: location.to_string(),
                            outlet_type: outlet_type.to_string(),
                            ..RawAttributes::reference_example()
                        };
                        let a = encode(&raw).unwrap();
                        let b = encode(&raw).unwrap();
                        let bits_a: Vec<u64> = a.as_slice().iter().map(|x| x.to_bits()).collect();
                        let bits_b: Vec<u64> = b.as_slice().iter().map(|x| x.to_bits()).collect();
                        assert_eq!(bits_a, bits_b);
                        seen += 1;
                    }
                }
            }
        }
        assert_eq!(seen, 72);
    }

    #[test]
    fn unknown_category_fails_without_output() {
        let raw = RawAttributes {
            outlet_size: "Ultra Size".to_string(),
            ..RawAttributes::reference_example()
        };
        let err = encode(&raw).unwrap_err();
        assert!(matches!(err, EncodeError::UnknownCategory { field: "outlet_size", .. }));
    }

    #[test]
    fn out_of_range_is_enforced_by_default() {
        let raw = RawAttributes {
            item_mrp: 400.01,
            ..RawAttributes::reference_example()
        };
        let err = encode(&raw).unwrap_err();
        assert_eq!(
            err,
            EncodeError::OutOfRange {
                field: "item_mrp",
                value: 400.01,
                min: 0.0,
                max: 400.0,
            }
        );

        let raw = RawAttributes {
            outlet_establishment_year: 1984,
            ..RawAttributes::reference_example()
        };
        assert_eq!(encode(&raw).unwrap_err().field(), "outlet_establishment_year");
    }

    #[test]
    fn lenient_policy_passes_numbers_through() {
        let encoder = Encoder::new(RangePolicy::Lenient);
        let raw = RawAttributes {
            item_weight: 75.0,
            item_type_code: 22,
            ..RawAttributes::reference_example()
        };
        let v = encoder.encode(&raw).unwrap();
        assert_eq!(v.get(0), Some(75.0));
        assert_eq!(v.get(3), Some(22.0));

        let raw = RawAttributes {
            item_visibility: f64::NAN,
            ..RawAttributes::reference_example()
        };
        assert!(matches!(
            encoder.encode(&raw),
            Err(EncodeError::InvalidNumber { field: "item_visibility", .. })
        ));
    }

    #[test]
    fn boundaries_are_accepted() {
        let raw = RawAttributes {
            item_weight: 0.0,
            item_visibility: 1.0,
            item_type_code: 15,
            item_mrp: 400.0,
            outlet_establishment_year: 2022,
            ..RawAttributes::reference_example()
        };
        assert!(encode(&raw).is_ok());
    }
}
