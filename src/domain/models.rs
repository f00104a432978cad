use super::schema::{FieldId, FieldKind, SCHEMA};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Current value of one field.
///
/// Serializes untagged, so text and choice values become JSON strings,
/// multi-choice selections become arrays and declarations become booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Multi(Vec<String>),
    Flag(bool),
}

impl FieldValue {
    /// The empty value for a field shape.
    pub fn empty_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text { .. } | FieldKind::SingleChoice(_) => FieldValue::Text(String::new()),
            FieldKind::MultiChoice(_) => FieldValue::Multi(Vec::new()),
            FieldKind::Boolean => FieldValue::Flag(false),
        }
    }

    /// Whether the value counts as "not filled in".
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Multi(items) => items.is_empty(),
            FieldValue::Flag(checked) => !checked,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            FieldValue::Multi(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(checked) => Some(*checked),
            _ => None,
        }
    }

    fn matches_kind(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Text(_), FieldKind::Text { .. } | FieldKind::SingleChoice(_))
                | (FieldValue::Multi(_), FieldKind::MultiChoice(_))
                | (FieldValue::Flag(_), FieldKind::Boolean)
        )
    }
}

/// All answers of one applicant.
///
/// Holds exactly one value per schema field, always of the field's shape.
///
/// # Examples
///
/// ```
/// use intake::domain::{ApplicantRecord, FieldId};
///
/// let record = ApplicantRecord::default();
/// assert_eq!(record.text(FieldId::FullName), "");
/// assert!(record.selections(FieldId::AreasOfInterest).is_empty());
/// assert!(!record.flag(FieldId::Declaration1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantRecord {
    values: Vec<FieldValue>,
}

impl Default for ApplicantRecord {
    fn default() -> Self {
        Self {
            values: SCHEMA.iter().map(|spec| FieldValue::empty_for(spec.kind)).collect(),
        }
    }
}

impl ApplicantRecord {
    pub fn get(&self, field: FieldId) -> &FieldValue {
        &self.values[field as usize]
    }

    pub(crate) fn get_mut(&mut self, field: FieldId) -> &mut FieldValue {
        &mut self.values[field as usize]
    }

    /// Text or single-choice value; empty for other shapes.
    pub fn text(&self, field: FieldId) -> &str {
        self.get(field).as_text().unwrap_or("")
    }

    /// Multi-choice selections in insertion order; empty for other shapes.
    pub fn selections(&self, field: FieldId) -> &[String] {
        self.get(field).as_multi().unwrap_or(&[])
    }

    pub fn flag(&self, field: FieldId) -> bool {
        self.get(field).as_flag().unwrap_or(false)
    }

    /// Iterates over `(field, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        FieldId::iter().zip(self.values.iter())
    }

    /// Restores every field to its empty value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Serialize for ApplicantRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_ref(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ApplicantRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> serde::de::Visitor<'de> for RecordVisitor {
    type Value = ApplicantRecord;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a flat object of applicant answers")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        use serde::de::Error;

        let mut record = ApplicantRecord::default();
        while let Some(key) = map.next_key::<String>()? {
            let Some(field) = FieldId::from_name(&key) else {
                map.next_value::<serde::de::IgnoredAny>()?;
                continue;
            };
            let value: FieldValue = map.next_value()?;
            if !value.matches_kind(field.kind()) {
                return Err(A::Error::custom(format!(
                    "field `{}` expects a {} value",
                    field,
                    field.kind().name()
                )));
            }
            *record.get_mut(field) = value;
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::EnumCount;

    #[test]
    fn test_default_record_shapes() {
        let record = ApplicantRecord::default();
        for (field, value) in record.iter() {
            assert!(value.matches_kind(field.kind()), "{} has wrong shape", field);
            assert!(value.is_empty(), "{} is not empty", field);
        }
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut record = ApplicantRecord::default();
        *record.get_mut(FieldId::FullName) = FieldValue::Text("Ada".to_string());
        *record.get_mut(FieldId::AreasOfInterest) =
            FieldValue::Multi(vec!["IoT".to_string(), "Robotics".to_string()]);
        *record.get_mut(FieldId::Declaration2) = FieldValue::Flag(true);

        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), FieldId::COUNT);
        assert_eq!(object["fullName"], json!("Ada"));
        assert_eq!(object["email"], json!(""));
        assert_eq!(object["areasOfInterest"], json!(["IoT", "Robotics"]));
        assert_eq!(object["softwareTools"], json!([]));
        assert_eq!(object["declaration1"], json!(false));
        assert_eq!(object["declaration2"], json!(true));
    }

    #[test]
    fn test_keys_follow_schema_order() {
        let json = serde_json::to_string(&ApplicantRecord::default()).unwrap();
        let full_name = json.find("\"fullName\"").unwrap();
        let email = json.find("\"email\"").unwrap();
        let declaration2 = json.find("\"declaration2\"").unwrap();
        assert!(full_name < email);
        assert!(email < declaration2);
    }

    #[test]
    fn test_deserialize_partial_object() {
        let record: ApplicantRecord = serde_json::from_value(json!({
            "phone": "12345",
            "hardwareExperience": ["FPGA"],
            "declaration1": true,
            "somethingElse": 42
        }))
        .unwrap();

        assert_eq!(record.text(FieldId::Phone), "12345");
        assert_eq!(record.selections(FieldId::HardwareExperience), ["FPGA".to_string()]);
        assert!(record.flag(FieldId::Declaration1));
        assert_eq!(record.text(FieldId::Email), "");
    }

    #[test]
    fn test_deserialize_rejects_wrong_shape() {
        let result = serde_json::from_value::<ApplicantRecord>(json!({ "declaration1": "yes" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_reset() {
        let mut record = ApplicantRecord::default();
        *record.get_mut(FieldId::College) = FieldValue::Text("MIT".to_string());
        record.reset();
        assert_eq!(record, ApplicantRecord::default());
    }
}
