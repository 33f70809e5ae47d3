// Response schema - Shape check of the untyped model reply before typing it
use crate::domain::dashboard::{DashboardData, Segment};
use crate::domain::error::AnalysisError;
use serde_json::{Map, Value, json};

pub const REQUIRED_FIELDS: [&str; 4] = [
    "customerSegmentation",
    "dailySales",
    "topCategories",
    "topCustomers",
];

/// `responseSchema` sent with every request. Mirrors [`DashboardData`].
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "customerSegmentation": {
                "type": "OBJECT",
                "description": "Counts of customers in each segment.",
                "properties": {
                    "premium": { "type": "INTEGER", "description": "Count of premium customers." },
                    "regular": { "type": "INTEGER", "description": "Count of regular customers." },
                    "normal": { "type": "INTEGER", "description": "Count of normal customers." }
                }
            },
            "dailySales": {
                "type": "ARRAY",
                "description": "Daily sales and purchase trends for the last 7 days.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING", "description": "Day of the week (e.g., 'Mon')." },
                        "sales": { "type": "NUMBER", "description": "Total sales amount for the day." },
                        "purchases": { "type": "NUMBER", "description": "Total purchase amount for the day." }
                    }
                }
            },
            "topCategories": {
                "type": "ARRAY",
                "description": "Top 5 best-selling product categories.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Category name." },
                        "value": { "type": "NUMBER", "description": "Total sales value for the category." }
                    }
                }
            },
            "topCustomers": {
                "type": "ARRAY",
                "description": "Top 5 customers by spending.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING", "description": "Customer ID." },
                        "name": { "type": "STRING", "description": "Customer name." },
                        "totalSpending": { "type": "NUMBER", "description": "Total amount spent by the customer." },
                        "frequency": { "type": "INTEGER", "description": "Number of visits or purchases." },
                        "segment": { "type": "STRING", "description": "Customer segment ('premium', 'regular', or 'normal')." }
                    }
                }
            }
        }
    })
}

/// Parse reply text, check its shape, and convert it to the typed aggregate.
pub fn parse_dashboard(reply: &str) -> Result<DashboardData, AnalysisError> {
    let document: Value = serde_json::from_str(reply.trim())?;
    check_shape(&document)?;
    Ok(serde_json::from_value(document)?)
}

#[derive(Clone, Copy)]
enum Kind {
    Text,
    Number,
    Count,
    Segment,
}

impl Kind {
    fn expected(self) -> &'static str {
        match self {
            Kind::Text => "a string",
            Kind::Number => "a number",
            Kind::Count => "a non-negative integer",
            Kind::Segment => "one of premium, regular, normal",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Kind::Text => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Count => value.is_u64(),
            Kind::Segment => value.as_str().and_then(Segment::parse).is_some(),
        }
    }
}

const SEGMENTATION_FIELDS: &[(&str, Kind)] = &[
    ("premium", Kind::Count),
    ("regular", Kind::Count),
    ("normal", Kind::Count),
];
const DAILY_SALE_FIELDS: &[(&str, Kind)] = &[
    ("day", Kind::Text),
    ("sales", Kind::Number),
    ("purchases", Kind::Number),
];
const CATEGORY_FIELDS: &[(&str, Kind)] = &[("name", Kind::Text), ("value", Kind::Number)];
const CUSTOMER_FIELDS: &[(&str, Kind)] = &[
    ("id", Kind::Text),
    ("name", Kind::Text),
    ("totalSpending", Kind::Number),
    ("frequency", Kind::Count),
    ("segment", Kind::Segment),
];

fn check_shape(document: &Value) -> Result<(), AnalysisError> {
    let root = as_object(document, "$")?;

    // presence of every top-level key is checked before any type check
    for field in REQUIRED_FIELDS {
        present(root, field, field)?;
    }

    let segmentation = present(root, "customerSegmentation", "customerSegmentation")?;
    check_fields(
        as_object(segmentation, "customerSegmentation")?,
        "customerSegmentation",
        SEGMENTATION_FIELDS,
    )?;

    check_items(root, "dailySales", DAILY_SALE_FIELDS)?;
    check_items(root, "topCategories", CATEGORY_FIELDS)?;
    check_items(root, "topCustomers", CUSTOMER_FIELDS)?;
    Ok(())
}

fn check_items(
    root: &Map<String, Value>,
    field: &str,
    item_fields: &[(&str, Kind)],
) -> Result<(), AnalysisError> {
    let items = present(root, field, field)?
        .as_array()
        .ok_or_else(|| mismatch(field, "an array"))?;

    for (index, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", field, index);
        check_fields(as_object(item, &path)?, &path, item_fields)?;
    }
    Ok(())
}

fn check_fields(
    object: &Map<String, Value>,
    path: &str,
    fields: &[(&str, Kind)],
) -> Result<(), AnalysisError> {
    for (name, kind) in fields {
        let field_path = format!("{}.{}", path, name);
        let value = present(object, name, &field_path)?;
        if !kind.accepts(value) {
            return Err(mismatch(&field_path, kind.expected()));
        }
    }
    Ok(())
}

fn present<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, AnalysisError> {
    match object.get(key) {
        Some(Value::Null) | None => Err(AnalysisError::MissingField(path.to_string())),
        Some(value) => Ok(value),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, AnalysisError> {
    value.as_object().ok_or_else(|| mismatch(path, "an object"))
}

fn mismatch(path: &str, expected: &'static str) -> AnalysisError {
    AnalysisError::SchemaMismatch {
        field: path.to_string(),
        expected,
    }
}
