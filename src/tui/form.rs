//! Form fields of the input tab.
//!
//! Categorical choices come straight from the lookup tables, so every label
//! the form can show is one the encoder accepts.

use crate::domain::{
    ESTABLISHMENT_YEAR, FeatureDomain, ITEM_MRP, ITEM_TYPE_CODE, ITEM_VISIBILITY, ITEM_WEIGHT,
    RawAttributes,
};
use crate::encode::{FAT_MAP, LOCATION_MAP, LookupTable, SIZE_MAP, TYPE_MAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormField {
    ItemWeight,
    FatContent,
    Visibility,
    ItemType,
    Mrp,
    EstablishmentYear,
    OutletSize,
    LocationType,
    OutletType,
}

enum Kind {
    Numeric { domain: FeatureDomain, step: f64 },
    Categorical(&'static LookupTable),
}

impl FormField {
    /// Display order; matches the model's feature order.
    pub(super) const ALL: [FormField; 9] = [
        FormField::ItemWeight,
        FormField::FatContent,
        FormField::Visibility,
        FormField::ItemType,
        FormField::Mrp,
        FormField::EstablishmentYear,
        FormField::OutletSize,
        FormField::LocationType,
        FormField::OutletType,
    ];

    pub(super) fn label(self) -> &'static str {
        match self {
            FormField::ItemWeight => "Item Weight",
            FormField::FatContent => "Item Fat Content",
            FormField::Visibility => "Item Visibility",
            FormField::ItemType => "Item Type (encoded)",
            FormField::Mrp => "Item MRP",
            FormField::EstablishmentYear => "Outlet Establishment Year",
            FormField::OutletSize => "Outlet Size",
            FormField::LocationType => "Outlet Location Type",
            FormField::OutletType => "Outlet Type",
        }
    }

    fn kind(self) -> Kind {
        match self {
            FormField::ItemWeight => Kind::Numeric { domain: ITEM_WEIGHT, step: 0.5 },
            FormField::FatContent => Kind::Categorical(&FAT_MAP),
            FormField::Visibility => Kind::Numeric { domain: ITEM_VISIBILITY, step: 0.005 },
            FormField::ItemType => Kind::Numeric { domain: ITEM_TYPE_CODE, step: 1.0 },
            FormField::Mrp => Kind::Numeric { domain: ITEM_MRP, step: 5.0 },
            FormField::EstablishmentYear => Kind::Numeric { domain: ESTABLISHMENT_YEAR, step: 1.0 },
            FormField::OutletSize => Kind::Categorical(&SIZE_MAP),
            FormField::LocationType => Kind::Categorical(&LOCATION_MAP),
            FormField::OutletType => Kind::Categorical(&TYPE_MAP),
        }
    }

    pub(super) fn is_numeric(self) -> bool {
        matches!(self.kind(), Kind::Numeric { .. })
    }

    pub(super) fn display_value(self, form: &RawAttributes) -> String {
        match self {
            FormField::ItemWeight => form.item_weight.to_string(),
            FormField::Visibility => format!("{:.3}", form.item_visibility),
            FormField::ItemType => form.item_type_code.to_string(),
            FormField::Mrp => form.item_mrp.to_string(),
            FormField::EstablishmentYear => form.outlet_establishment_year.to_string(),
            FormField::FatContent
            | FormField::OutletSize
            | FormField::LocationType
            | FormField::OutletType => self.label_slot(form).cloned().unwrap_or_default(),
        }
    }

    /// Cycle a categorical label or step a numeric value (clamped to its domain).
    pub(super) fn step(self, form: &mut RawAttributes, delta: i32) {
        match self.kind() {
            Kind::Categorical(table) => {
                if let Some(slot) = self.label_slot_mut(form) {
                    *slot = table.cycle(slot, delta).to_string();
                }
            }
            Kind::Numeric { domain, step } => {
                let current = self.numeric(form);
                let next = domain.clamp(current + f64::from(delta) * step);
                self.set_numeric(form, next);
            }
        }
    }

    /// Apply a typed value. Range checks are left to the encoder so the
    /// configured range policy decides.
    pub(super) fn set_from_text(self, form: &mut RawAttributes, text: &str) -> Result<(), String> {
        let Kind::Numeric { domain, .. } = self.kind() else {
            return Err(format!("{} is chosen from a list", self.label()));
        };
        let value: f64 = text
            .parse()
            .map_err(|_| format!("{}: '{text}' is not a number", self.label()))?;
        if !value.is_finite() {
            return Err(format!("{}: '{text}' is not a finite number", self.label()));
        }
        if domain.integral && value.fract() != 0.0 {
            return Err(format!("{}: '{text}' must be a whole number", self.label()));
        }
        self.set_numeric(form, value);
        Ok(())
    }

    fn numeric(self, form: &RawAttributes) -> f64 {
        match self {
            FormField::ItemWeight => form.item_weight,
            FormField::Visibility => form.item_visibility,
            FormField::ItemType => form.item_type_code as f64,
            FormField::Mrp => form.item_mrp,
            FormField::EstablishmentYear => form.outlet_establishment_year as f64,
            _ => 0.0,
        }
    }

    fn set_numeric(self, form: &mut RawAttributes, value: f64) {
        match self {
            FormField::ItemWeight => form.item_weight = value,
            FormField::Visibility => form.item_visibility = value,
            FormField::ItemType => form.item_type_code = value.round() as i64,
            FormField::Mrp => form.item_mrp = value,
            FormField::EstablishmentYear => form.outlet_establishment_year = value.round() as i64,
            _ => {}
        }
    }

    fn label_slot(self, form: &RawAttributes) -> Option<&String> {
        match self {
            FormField::FatContent => Some(&form.item_fat_content),
            FormField::OutletSize => Some(&form.outlet_size),
            FormField::LocationType => Some(&form.outlet_location_type),
            FormField::OutletType => Some(&form.outlet_type),
            _ => None,
        }
    }

    fn label_slot_mut(self, form: &mut RawAttributes) -> Option<&mut String> {
        match self {
            FormField::FatContent => Some(&mut form.item_fat_content),
            FormField::OutletSize => Some(&mut form.outlet_size),
            FormField::LocationType => Some(&mut form.outlet_location_type),
            FormField::OutletType => Some(&mut form.outlet_type),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    #[test]
    fn every_reachable_label_encodes() {
        let mut form = RawAttributes::default();
        for field in FormField::ALL.iter().filter(|f| !f.is_numeric()) {
            for _ in 0..5 {
                field.step(&mut form, 1);
                assert!(encode(&form).is_ok(), "{} = {}", field.label(), field.display_value(&form));
            }
        }
    }

    #[test]
    fn year_steps_are_whole_and_clamped() {
        let mut form = RawAttributes::default();
        for _ in 0..40 {
            FormField::EstablishmentYear.step(&mut form, 1);
        }
        assert_eq!(form.outlet_establishment_year, 2022);
    }

    #[test]
    fn typed_values_are_parsed_not_clamped() {
        let mut form = RawAttributes::default();
        FormField::Mrp.set_from_text(&mut form, "450.5").unwrap();
        assert_eq!(form.item_mrp, 450.5);
        assert!(FormField::ItemType.set_from_text(&mut form, "3.5").is_err());
        assert!(FormField::OutletSize.set_from_text(&mut form, "2").is_err());
    }
}
