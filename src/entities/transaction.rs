// Transaction entity - one recorded drop-off batch
//
// A transaction is immutable once recorded: points are computed from the rate
// table at submission time and stored, never recomputed. Older deployments
// persisted two earlier record shapes; both are modeled explicitly and
// normalized once at load instead of patched field-by-field at render time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rates::MaterialKind;

/// Round a point total to 2 decimals, half away from zero.
///
/// Recorded transactions store the rounded value, so every later aggregation
/// (history footer, leaderboard) operates on already-rounded points.
pub fn round_points(points: f64) -> f64 {
    (points * 100.0).round() / 100.0
}

// ============================================================================
// SUBMISSION INPUT
// ============================================================================

/// One row of a submission form: a material and its weighed amount.
/// Ephemeral; exists only while a batch is being submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchItem {
    pub material: MaterialKind,
    pub weight: f64,
}

impl BatchItem {
    pub fn new(material: MaterialKind, weight: f64) -> Self {
        BatchItem { material, weight }
    }
}

// ============================================================================
// RECORDED TRANSACTION
// ============================================================================

/// A recorded line item: weight times the material's rate at recording time.
/// Item points keep full precision; only the transaction total is rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub material: MaterialKind,
    pub weight: f64,
    pub points: f64,
}

/// An immutable recorded drop-off batch, appended to the front of a center's
/// history and never mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identity (UUID).
    pub id: String,

    pub recorded_at: DateTime<Utc>,

    /// Human summary, e.g. "Plastic (10kg), Glass (4kg)".
    pub summary: String,

    pub items: Vec<LineItem>,

    /// Sum of recorded item weights in kilograms.
    pub total_weight: f64,

    /// Reward points, rounded to 2 decimals at recording time.
    pub points: f64,
}

impl Transaction {
    /// Build a transaction from submitted batch rows.
    ///
    /// Rows with weight <= 0 (or a non-finite weight) are silently excluded;
    /// the observed policy is filter, don't error. Returns `None` when nothing
    /// survives filtering, in which case the caller records nothing at all.
    pub fn from_batch(batch: &[BatchItem], at: DateTime<Utc>) -> Option<Transaction> {
        let items: Vec<LineItem> = batch
            .iter()
            .filter(|row| row.weight.is_finite() && row.weight > 0.0)
            .map(|row| LineItem {
                material: row.material,
                weight: row.weight,
                points: row.weight * row.material.rate(),
            })
            .collect();

        if items.is_empty() {
            return None;
        }

        let total_weight = items.iter().map(|item| item.weight).sum();
        let raw_points: f64 = items.iter().map(|item| item.points).sum();
        let summary = items
            .iter()
            .map(|item| format!("{} ({}kg)", item.material.label(), item.weight))
            .collect::<Vec<_>>()
            .join(", ");

        Some(Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            recorded_at: at,
            summary,
            items,
            total_weight,
            points: round_points(raw_points),
        })
    }
}

// ============================================================================
// STORED RECORD VERSIONS
// ============================================================================

/// Raw item as found in older stored records: the material is a free string
/// and per-item points may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStoredItem {
    pub material: String,
    pub weight: f64,
    #[serde(default)]
    pub points: Option<f64>,
}

/// Multi-item record shape from earlier deployments: a locale-formatted date
/// string, an optional stored weight total, raw items under `itemsObject`,
/// and a points value that may be a number or a string.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyBatchRecord {
    pub date: String,
    pub summary: String,
    #[serde(default, rename = "totalWeight")]
    pub total_weight: Option<f64>,
    #[serde(default, rename = "itemsObject")]
    pub items_object: Option<Vec<RawStoredItem>>,
    #[serde(default)]
    pub points: serde_json::Value,
}

/// The earliest shape: a single material and weight per record.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySingleRecord {
    pub date: String,
    pub material: String,
    pub weight: f64,
    #[serde(default)]
    pub points: serde_json::Value,
}

/// Tagged union of every record shape that may appear in the store.
/// `normalize` converts all of them to the current `Transaction` once at
/// load; nothing downstream sees a legacy shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredTransaction {
    Current(Transaction),
    Batch(LegacyBatchRecord),
    Single(LegacySingleRecord),
}

/// Best-effort numeric coercion for stored point values: numbers pass
/// through, numeric strings parse, anything else contributes zero.
fn coerce_points(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Legacy dates were locale-formatted display strings; recover a timestamp
/// when the string happens to be RFC 3339, otherwise fall back to the epoch.
fn coerce_date(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn parse_raw_items(raw: &[RawStoredItem]) -> Vec<LineItem> {
    raw.iter()
        .filter_map(|item| {
            let material = MaterialKind::from_key(&item.material)?;
            Some(LineItem {
                material,
                weight: item.weight,
                points: item.points.unwrap_or(item.weight * material.rate()),
            })
        })
        .collect()
}

impl StoredTransaction {
    /// Normalize any stored shape to the current record form.
    pub fn normalize(self) -> Transaction {
        match self {
            StoredTransaction::Current(tx) => tx,
            StoredTransaction::Batch(rec) => {
                let items = rec
                    .items_object
                    .as_deref()
                    .map(parse_raw_items)
                    .unwrap_or_default();

                // A missing or zero stored total is recomputed from the raw
                // item weights rather than rejected.
                let stored = rec.total_weight.unwrap_or(0.0);
                let total_weight = if stored > 0.0 {
                    stored
                } else {
                    rec.items_object
                        .as_deref()
                        .map(|raw| raw.iter().map(|i| i.weight).sum())
                        .unwrap_or(0.0)
                };

                Transaction {
                    id: uuid::Uuid::new_v4().to_string(),
                    recorded_at: coerce_date(&rec.date),
                    summary: rec.summary,
                    items,
                    total_weight,
                    points: coerce_points(&rec.points),
                }
            }
            StoredTransaction::Single(rec) => {
                let items = parse_raw_items(&[RawStoredItem {
                    material: rec.material.clone(),
                    weight: rec.weight,
                    points: None,
                }]);

                Transaction {
                    id: uuid::Uuid::new_v4().to_string(),
                    recorded_at: coerce_date(&rec.date),
                    summary: rec.material,
                    items,
                    total_weight: rec.weight,
                    points: coerce_points(&rec.points),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_points_match_reference_example() {
        // rates: plastic 0.07, glass 0.25
        // 10kg plastic + 4kg glass = 0.7 + 1.0 = 1.70 points, 14kg
        let batch = [
            BatchItem::new(MaterialKind::Plastic, 10.0),
            BatchItem::new(MaterialKind::Glass, 4.0),
        ];

        let tx = Transaction::from_batch(&batch, at()).unwrap();
        assert_eq!(tx.points, 1.70);
        assert_eq!(tx.total_weight, 14.0);
        assert_eq!(tx.items.len(), 2);
    }

    #[test]
    fn test_summary_lists_items_in_order() {
        let batch = [
            BatchItem::new(MaterialKind::Plastic, 10.0),
            BatchItem::new(MaterialKind::Glass, 4.0),
        ];

        let tx = Transaction::from_batch(&batch, at()).unwrap();
        assert_eq!(tx.summary, "Plastic (10kg), Glass (4kg)");
    }

    #[test]
    fn test_non_positive_weights_are_filtered() {
        let batch = [
            BatchItem::new(MaterialKind::Plastic, 10.0),
            BatchItem::new(MaterialKind::Metal, 0.0),
            BatchItem::new(MaterialKind::Glass, -2.0),
            BatchItem::new(MaterialKind::Paper, f64::NAN),
        ];

        let tx = Transaction::from_batch(&batch, at()).unwrap();
        assert_eq!(tx.items.len(), 1);
        assert_eq!(tx.total_weight, 10.0);
        assert_eq!(tx.points, 0.70);
    }

    #[test]
    fn test_empty_batch_records_nothing() {
        assert!(Transaction::from_batch(&[], at()).is_none());

        let all_filtered = [
            BatchItem::new(MaterialKind::Plastic, 0.0),
            BatchItem::new(MaterialKind::Glass, -1.0),
        ];
        assert!(Transaction::from_batch(&all_filtered, at()).is_none());
    }

    #[test]
    fn test_total_is_rounded_items_keep_precision() {
        // 3 x 0.333kg plastic: raw total 0.06993, stored total 0.07
        let batch = [
            BatchItem::new(MaterialKind::Plastic, 0.333),
            BatchItem::new(MaterialKind::Plastic, 0.333),
            BatchItem::new(MaterialKind::Plastic, 0.333),
        ];

        let tx = Transaction::from_batch(&batch, at()).unwrap();
        assert_eq!(tx.points, 0.07);
        assert_eq!(tx.items[0].points, 0.333 * 0.07);
    }

    #[test]
    fn test_round_points_two_decimals() {
        assert_eq!(round_points(1.23456), 1.23);
        assert_eq!(round_points(1.239), 1.24);
        assert_eq!(round_points(0.0), 0.0);
    }

    #[test]
    fn test_normalize_current_shape_passes_through() {
        let tx = Transaction::from_batch(&[BatchItem::new(MaterialKind::Glass, 4.0)], at()).unwrap();
        let json = serde_json::to_string(&tx).unwrap();

        let stored: StoredTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(stored.normalize(), tx);
    }

    #[test]
    fn test_normalize_legacy_batch_recomputes_missing_weight() {
        let json = r#"{
            "date": "1/15/2024, 10:30:00 AM",
            "summary": "Plastic (10kg), Glass (4kg)",
            "itemsObject": [
                {"material": "plastic", "weight": 10.0, "points": 0.7},
                {"material": "glass", "weight": 4.0, "points": 1.0}
            ],
            "points": 1.7
        }"#;

        let stored: StoredTransaction = serde_json::from_str(json).unwrap();
        let tx = stored.normalize();
        assert_eq!(tx.total_weight, 14.0);
        assert_eq!(tx.points, 1.7);
        assert_eq!(tx.items.len(), 2);
        assert_eq!(tx.items[0].material, MaterialKind::Plastic);
    }

    #[test]
    fn test_normalize_legacy_single_record() {
        let json = r#"{"date": "1/2/2023, 9:00:00 AM", "material": "glass", "weight": 4.0, "points": "1.00"}"#;

        let stored: StoredTransaction = serde_json::from_str(json).unwrap();
        let tx = stored.normalize();
        assert_eq!(tx.total_weight, 4.0);
        assert_eq!(tx.points, 1.0);
        assert_eq!(tx.summary, "glass");
        assert_eq!(tx.items[0].points, 1.0);
    }

    #[test]
    fn test_normalize_coerces_bad_points_to_zero() {
        let json = r#"{"date": "x", "summary": "Glass (4kg)", "totalWeight": 4.0, "points": "n/a"}"#;

        let stored: StoredTransaction = serde_json::from_str(json).unwrap();
        let tx = stored.normalize();
        assert_eq!(tx.points, 0.0);
        assert_eq!(tx.total_weight, 4.0);
    }

    #[test]
    fn test_normalize_drops_unknown_legacy_materials() {
        let json = r#"{
            "date": "x",
            "summary": "Mystery (3kg)",
            "totalWeight": 3.0,
            "itemsObject": [{"material": "mystery", "weight": 3.0}],
            "points": 0.5
        }"#;

        let stored: StoredTransaction = serde_json::from_str(json).unwrap();
        let tx = stored.normalize();
        assert!(tx.items.is_empty());
        // stored totals survive even when the raw item cannot be typed
        assert_eq!(tx.total_weight, 3.0);
        assert_eq!(tx.points, 0.5);
    }
}
