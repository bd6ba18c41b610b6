//! Declarative field renaming between canonical and legacy names
//!
//! Outbound, every field matching a rule's canonical name is duplicated under
//! the legacy name (the canonical field stays). Inbound, legacy names are
//! renamed back in place; a legacy field whose canonical counterpart is
//! already present is dropped, so canonical identity is restored exactly.

use indexmap::IndexMap;
use indivo_format::{FieldContent, ModelElement};
use indivo_models::{format_number, DataError, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Exact,
    Prefix,
}

/// Outbound precondition on the record being serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    FieldEquals {
        field: &'static str,
        value: &'static str,
    },
}

impl Condition {
    fn holds(&self, fields: &IndexMap<String, FieldValue>) -> bool {
        match self {
            Condition::Always => true,
            Condition::FieldEquals { field, value } => {
                fields.get(*field).and_then(FieldValue::to_text).as_deref() == Some(*value)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameRule {
    pub canonical: &'static str,
    pub legacy: &'static str,
    pub matching: NameMatch,
    pub when: Condition,
}

impl RenameRule {
    pub const fn exact(canonical: &'static str, legacy: &'static str) -> Self {
        Self {
            canonical,
            legacy,
            matching: NameMatch::Exact,
            when: Condition::Always,
        }
    }

    pub const fn prefix(canonical: &'static str, legacy: &'static str) -> Self {
        Self {
            canonical,
            legacy,
            matching: NameMatch::Prefix,
            when: Condition::Always,
        }
    }

    pub const fn when(mut self, field: &'static str, value: &'static str) -> Self {
        self.when = Condition::FieldEquals { field, value };
        self
    }

    fn substitute(&self, name: &str, from: &str, to: &str) -> Option<String> {
        match self.matching {
            NameMatch::Exact => (name == from).then(|| to.to_string()),
            NameMatch::Prefix => name.strip_prefix(from).map(|rest| format!("{to}{rest}")),
        }
    }

    pub fn to_legacy(&self, name: &str) -> Option<String> {
        self.substitute(name, self.canonical, self.legacy)
    }

    pub fn to_canonical(&self, name: &str) -> Option<String> {
        self.substitute(name, self.legacy, self.canonical)
    }
}

/// Inbound unit normalization: a value stored in `from` units is rewritten
/// to `to` units by multiplying with `factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRule {
    pub unit_field: &'static str,
    pub value_field: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub factor: f64,
}

impl UnitRule {
    pub fn apply(&self, model: &mut ModelElement) -> Result<(), DataError> {
        if model.text(self.unit_field) != Some(self.from) {
            return Ok(());
        }

        let converted = match model.text(self.value_field) {
            Some(raw) => {
                let value: f64 = raw.trim().parse().map_err(|_| DataError::ExpectedNumber {
                    field: self.value_field.to_string(),
                    value: raw.to_string(),
                })?;
                Some(format_number(value * self.factor))
            }
            None => None,
        };

        set_text(model, self.unit_field, self.to.to_string());
        if let Some(converted) = converted {
            set_text(model, self.value_field, converted);
        }
        Ok(())
    }
}

fn set_text(model: &mut ModelElement, name: &str, text: String) {
    if let Some(field) = model.field_mut(name) {
        field.content = FieldContent::Text(Some(text));
    }
}

/// Rename rules and unit rules of one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameRules {
    rules: Vec<RenameRule>,
    units: Vec<UnitRule>,
}

impl RenameRules {
    pub fn new(rules: Vec<RenameRule>) -> Self {
        Self {
            rules,
            units: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: UnitRule) -> Self {
        self.units.push(unit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.units.is_empty()
    }

    /// Canonical fields followed by the legacy duplicates, rule by rule.
    pub fn outbound(&self, fields: &IndexMap<String, FieldValue>) -> IndexMap<String, FieldValue> {
        let mut out = fields.clone();
        for rule in &self.rules {
            if !rule.when.holds(fields) {
                continue;
            }
            for (name, value) in fields {
                if let Some(legacy) = rule.to_legacy(name) {
                    out.insert(legacy, value.clone());
                }
            }
        }
        out
    }

    /// Legacy name of a field, if any rule maps it back to a canonical name.
    pub fn canonical_name(&self, name: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.to_canonical(name))
    }

    /// Restore canonical names on one model element (nested elements are
    /// left alone), then apply unit normalization.
    pub fn inbound(&self, model: &mut ModelElement) -> Result<(), DataError> {
        let present: Vec<String> = model
            .fields
            .iter()
            .filter(|f| self.canonical_name(&f.name).is_none())
            .map(|f| f.name.clone())
            .collect();

        let mut fields = Vec::with_capacity(model.fields.len());
        for mut field in std::mem::take(&mut model.fields) {
            if let Some(canonical) = self.canonical_name(&field.name) {
                if present.contains(&canonical) {
                    continue;
                }
                field.name = canonical;
            }
            fields.push(field);
        }
        model.fields = fields;

        for unit in &self.units {
            unit.apply(model)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> IndexMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect()
    }

    #[test]
    fn prefix_rules_keep_the_suffix() {
        let rule = RenameRule::prefix("encounter_type_", "type_");
        assert_eq!(
            rule.to_legacy("encounter_type_code_system").as_deref(),
            Some("type_code_system")
        );
        assert_eq!(rule.to_canonical("type_title").as_deref(), Some("encounter_type_title"));
        assert_eq!(rule.to_legacy("start_date"), None);
    }

    #[test]
    fn outbound_appends_after_canonical_fields() {
        let rules = RenameRules::new(vec![
            RenameRule::exact("start_date", "startDate"),
            RenameRule::prefix("encounter_type_", "type_"),
        ]);
        let out = rules.outbound(&fields(&[
            ("encounter_type_title", "Ambulatory"),
            ("start_date", "2009-05-16T12:00:00Z"),
        ]));

        let names: Vec<_> = out.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["encounter_type_title", "start_date", "startDate", "type_title"]
        );
    }

    #[test]
    fn conditional_rules_need_a_matching_value() {
        let rules = RenameRules::new(vec![
            RenameRule::prefix("allergen_", "drug_allergen_").when("allergen_code_system", "rx"),
        ]);
        assert_eq!(rules.outbound(&fields(&[("allergen_code_system", "x")])).len(), 1);
        assert!(rules
            .outbound(&fields(&[("allergen_code_system", "rx")]))
            .contains_key("drug_allergen_code_system"));
    }

    #[test]
    fn inbound_drops_duplicates_and_renames_singletons() {
        let rules = RenameRules::new(vec![RenameRule::exact("end_date", "endDate")]);
        let mut model = ModelElement::new("Problem")
            .with_text("end_date", Some("a"))
            .with_text("endDate", Some("a"));
        rules.inbound(&mut model).unwrap();
        assert_eq!(model.fields.len(), 1);

        let mut model = ModelElement::new("Problem").with_text("endDate", Some("b"));
        rules.inbound(&mut model).unwrap();
        assert_eq!(model.text("end_date"), Some("b"));
    }

    #[test]
    fn unit_rule_converts_only_the_source_unit() {
        let rule = UnitRule {
            unit_field: "height_unit",
            value_field: "height_value",
            from: "m",
            to: "cm",
            factor: 100.0,
        };
        let mut metres = ModelElement::new("VitalSigns")
            .with_text("height_unit", Some("m"))
            .with_text("height_value", Some("1.8"));
        rule.apply(&mut metres).unwrap();
        assert_eq!(metres.text("height_unit"), Some("cm"));
        assert_eq!(metres.text("height_value"), Some("180.0"));

        let mut cm = ModelElement::new("VitalSigns")
            .with_text("height_unit", Some("cm"))
            .with_text("height_value", Some("180"));
        rule.apply(&mut cm).unwrap();
        assert_eq!(cm.text("height_value"), Some("180"));

        let mut bad = ModelElement::new("VitalSigns")
            .with_text("height_unit", Some("m"))
            .with_text("height_value", Some("tall"));
        assert!(matches!(rule.apply(&mut bad), Err(DataError::ExpectedNumber { .. })));
    }
}
