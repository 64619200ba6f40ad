use crate::record::{Attribute, AttributeRecord};

pub const KEY_DELIMITER: &str = "|";
pub const KEY_PLACEHOLDER: &str = "-";

/// Fields of the comparison key, in key order.
pub const KEY_FIELDS: [Attribute; 10] = [
    Attribute::Category,
    Attribute::Subcategory,
    Attribute::Form,
    Attribute::Skin,
    Attribute::Bone,
    Attribute::Trim,
    Attribute::SizeBucket,
    Attribute::MeatGrade,
    Attribute::Preparation,
    Attribute::ValueAdded,
];

/// Pipe-delimited projection of the attributes that decide comparability.
/// Records with equal keys describe the same product for price comparison.
pub fn comparison_key(record: &AttributeRecord) -> String {
    KEY_FIELDS
        .iter()
        .map(|field| {
            record
                .attribute(*field)
                .map(str::to_uppercase)
                .unwrap_or_else(|| KEY_PLACEHOLDER.to_string())
        })
        .collect::<Vec<String>>()
        .join(KEY_DELIMITER)
}
