use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One order/SLA row as exported by the control-tower backend.
///
/// Only the driver name and hub take part in matching. `fields` holds the
/// source row as it arrived (original keys and JSON types) and is nested so
/// it can never shadow the keys a `MatchResult` adds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub driver_name: String,
    pub hub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl OrderRecord {
    pub fn new(driver_name: impl Into<String>, hub: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
            hub: hub.into(),
            ..Self::default()
        }
    }

    pub fn with_order_number(mut self, number: impl Into<String>) -> Self {
        self.order_number = Some(number.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Rows without a driver name or hub cannot be reconciled.
    pub fn is_matchable(&self) -> bool {
        !self.driver_name.trim().is_empty() && !self.hub.trim().is_empty()
    }
}

/// A registered driver and the contact numbers on file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub driver_name: String,
    pub hub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RosterEntry {
    pub fn new(driver_name: impl Into<String>, hub: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
            hub: hub.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_alternate_phone(mut self, phone: impl Into<String>) -> Self {
        self.alternate_phone = Some(phone.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Primary phone, then the alternate one, then an empty string.
    pub fn contact_phone(&self) -> String {
        [self.phone.as_deref(), self.alternate_phone.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

/// Confidence label attached to a reconciliation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    Exact,
    DriverOnly,
    Partial,
    Approved,
    Similarity,
    None,
}

impl MatchKind {
    pub const ALL: [MatchKind; 6] = [
        MatchKind::Exact,
        MatchKind::DriverOnly,
        MatchKind::Partial,
        MatchKind::Approved,
        MatchKind::Similarity,
        MatchKind::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::DriverOnly => "driverOnly",
            MatchKind::Partial => "partial",
            MatchKind::Approved => "approved",
            MatchKind::Similarity => "similarity",
            MatchKind::None => "none",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reconciled order row: the original record plus the matched contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub record: OrderRecord,
    pub phone: Option<String>,
    pub matched: bool,
    pub match_kind: MatchKind,
}

impl MatchResult {
    pub fn is_kind(&self, kind: MatchKind) -> bool {
        self.match_kind == kind
    }

    pub(crate) fn matched(record: &OrderRecord, entry: &RosterEntry, kind: MatchKind) -> Self {
        Self {
            record: record.clone(),
            phone: Some(entry.contact_phone()),
            matched: true,
            match_kind: kind,
        }
    }

    pub(crate) fn unmatched(record: &OrderRecord) -> Self {
        Self {
            record: record.clone(),
            phone: None,
            matched: false,
            match_kind: MatchKind::None,
        }
    }
}

/// Precedence used to label a pairing.
///
/// `Legacy` keeps the historical order (exact, driverOnly, partial, approved,
/// similarity) in which approved and similarity can never be reported.
/// `Refined` folds similarity into partial and checks approval first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    #[default]
    Legacy,
    Refined,
}

impl CascadeMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "refined" => Some(Self::Refined),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CascadeMode::Legacy => "legacy",
            CascadeMode::Refined => "refined",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contact_phone_falls_back_to_alternate_then_empty() {
        let primary = RosterEntry::new("ANA", "SP")
            .with_phone("111")
            .with_alternate_phone("999");
        assert_eq!(primary.contact_phone(), "111");

        let fallback = RosterEntry::new("ANA", "SP")
            .with_phone("  ")
            .with_alternate_phone("999");
        assert_eq!(fallback.contact_phone(), "999");

        assert_eq!(RosterEntry::new("ANA", "SP").contact_phone(), "");
    }

    #[test]
    fn match_result_serializes_flat_with_camel_case_kind() {
        let record = OrderRecord::new("Ana", "SP")
            .with_order_number("123")
            .with_field("Pedido", 123);
        let result = MatchResult::matched(
            &record,
            &RosterEntry::new("ANA", "SP").with_phone("111"),
            MatchKind::DriverOnly,
        );

        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(
            value,
            json!({
                "driver_name": "Ana",
                "hub": "SP",
                "order_number": "123",
                "fields": { "Pedido": 123 },
                "phone": "111",
                "matched": true,
                "match_kind": "driverOnly",
            })
        );
    }

    #[test]
    fn passthrough_columns_cannot_shadow_result_keys() {
        let record = OrderRecord::new("Ana", "SP")
            .with_field("phone", "legacy-col")
            .with_field("matched", "yes")
            .with_field("match_kind", "manual");
        let result = MatchResult::matched(
            &record,
            &RosterEntry::new("ANA", "SP").with_phone("111"),
            MatchKind::Exact,
        );

        let text = serde_json::to_string(&result).expect("serializes");
        assert_eq!(text.matches("\"phone\"").count(), 2);

        let value: Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["phone"], "111");
        assert_eq!(value["matched"], true);
        assert_eq!(value["match_kind"], "exact");
        assert_eq!(value["fields"]["phone"], "legacy-col");
        assert_eq!(value["fields"]["matched"], "yes");
        assert_eq!(value["fields"]["match_kind"], "manual");

        let parsed: MatchResult = serde_json::from_value(value).expect("round trips");
        assert_eq!(parsed.record, record);
    }

    #[test]
    fn unmatched_result_has_null_phone() {
        let result = MatchResult::unmatched(&OrderRecord::new("Carlos", "SP"));
        assert_eq!(result.phone, None);
        assert!(!result.matched);
        assert_eq!(result.match_kind, MatchKind::None);
    }

    #[test]
    fn cascade_mode_parses_case_insensitively() {
        assert_eq!(CascadeMode::parse("LEGACY"), Some(CascadeMode::Legacy));
        assert_eq!(CascadeMode::parse(" refined"), Some(CascadeMode::Refined));
        assert_eq!(CascadeMode::parse("strict"), None);
    }

    #[test]
    fn matchable_requires_name_and_hub() {
        assert!(OrderRecord::new("Ana", "SP").is_matchable());
        assert!(!OrderRecord::new("  ", "SP").is_matchable());
        assert!(!OrderRecord::new("Ana", "").is_matchable());
    }
}
