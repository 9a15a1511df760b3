//! Schema types and canonical dtype labels

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;

/// Normalized column data type
///
/// Labels from different dataframe libraries and file formats are folded
/// into one canonical spelling, so `Int64`, `<i8` and `integer` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DType {
    /// Boolean
    Bool,

    /// Signed integer of the given bit width
    Int(u8),

    /// Unsigned integer of the given bit width
    UInt(u8),

    /// Floating point of the given bit width
    Float(u8),

    /// Dedicated string type
    String,

    /// Generic object column (mixed or boxed values)
    Object,

    /// Categorical
    Category,

    /// Timestamp
    Datetime,

    /// Duration
    Timedelta,

    /// Any label not recognized above, kept trimmed and lower-cased
    Other(String),
}

impl DType {
    /// Parse a free-form type label into its canonical dtype
    ///
    /// Matching ignores case and surrounding whitespace. Width-suffixed
    /// names count bits (`int32`, `UInt8`, `Float64`). Single-letter codes
    /// follow numpy and count bytes, with an optional byte-order prefix:
    /// `i8` and `<i8` are `int64`, `u1` is `uint8`, `f4` is `float32`.
    pub fn parse(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "bool" | "boolean" | "b" | "b1" | "|b1" | "?" => return Self::Bool,
            "int" | "integer" | "long" | "bigint" => return Self::Int(64),
            "smallint" | "short" => return Self::Int(16),
            "tinyint" => return Self::Int(8),
            "uint" => return Self::UInt(64),
            "float" | "double" | "real" | "number" => return Self::Float(64),
            "half" => return Self::Float(16),
            "str" | "string" | "utf8" | "large_utf8" | "text" | "varchar" => return Self::String,
            "object" | "o" | "|o" => return Self::Object,
            "category" | "categorical" | "dictionary" => return Self::Category,
            "datetime" | "timestamp" | "datetime64" | "datetime64[ns]" | "date" => {
                return Self::Datetime
            }
            "timedelta" | "duration" | "timedelta64" | "timedelta64[ns]" | "interval" => {
                return Self::Timedelta
            }
            _ => {}
        }

        if let Some(dtype) = parse_sized(&normalized) {
            return dtype;
        }

        // Timezone-aware or non-ns datetimes, e.g. "datetime64[ns, utc]"
        if normalized.starts_with("datetime64[") {
            return Self::Datetime;
        }
        if normalized.starts_with("timedelta64[") {
            return Self::Timedelta;
        }

        Self::Other(normalized)
    }

    /// Canonical string label
    pub fn label(&self) -> String {
        self.to_string()
    }
}

fn bit_width_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(int|uint|float)(8|16|32|64)$").expect("static regex is valid")
    })
}

fn type_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[<>=|]?([iuf])([1248])$").expect("static regex is valid"))
}

/// Sized labels: `int32`, `uint8`, `float64` (bits) or `i8`, `<f4` (bytes)
fn parse_sized(label: &str) -> Option<DType> {
    let (kind, bits) = if let Some(caps) = bit_width_pattern().captures(label) {
        let bits: u8 = caps[2].parse().ok()?;
        (caps[1].to_string(), bits)
    } else {
        let caps = type_code_pattern().captures(label)?;
        let bytes: u8 = caps[2].parse().ok()?;
        (caps[1].to_string(), bytes * 8)
    };

    match kind.as_str() {
        "int" | "i" => Some(DType::Int(bits)),
        "uint" | "u" => Some(DType::UInt(bits)),
        "float" | "f" if bits >= 16 => Some(DType::Float(bits)),
        _ => None,
    }
}

impl FromStr for DType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int(bits) => write!(f, "int{}", bits),
            Self::UInt(bits) => write!(f, "uint{}", bits),
            Self::Float(bits) => write!(f, "float{}", bits),
            Self::String => write!(f, "string"),
            Self::Object => write!(f, "object"),
            Self::Category => write!(f, "category"),
            Self::Datetime => write!(f, "datetime64[ns]"),
            Self::Timedelta => write!(f, "timedelta64[ns]"),
            Self::Other(label) => write!(f, "{}", label),
        }
    }
}

impl Serialize for DType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::parse(&label))
    }
}

/// User-supplied dtype aliases
///
/// A key matches every label that parses to the same dtype, so
/// `varchar = "object"` also applies to `string` and `text` columns.
/// When several keys match, the first in sorted key order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DTypeAliases(BTreeMap<String, String>);

impl DTypeAliases {
    /// Create an empty alias table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as another spelling of `target`
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.0
            .insert(alias.into().trim().to_ascii_lowercase(), target.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-normalize a dtype through the alias table
    pub fn resolve(&self, dtype: DType) -> DType {
        if self.0.is_empty() {
            return dtype;
        }

        let target = self.0.iter().find(|(alias, _)| DType::parse(alias) == dtype);

        match target {
            Some((_, target)) => DType::parse(target),
            None => dtype,
        }
    }
}

/// A column in a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Normalized dtype
    pub dtype: DType,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// An ordered collection of columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of columns
    pub columns: Vec<Column>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Create a schema from columns
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Stable hex digest of the ordered `name:dtype` list
    ///
    /// Two schemas share a fingerprint only if they have the same columns
    /// in the same order with the same dtypes.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for column in &self.columns {
            hasher.update(column.name.as_bytes());
            hasher.update(b":");
            hasher.update(column.dtype.label().as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_aliases_fold_to_canonical() {
        assert_eq!(DType::parse("int"), DType::Int(64));
        assert_eq!(DType::parse(" Int64 "), DType::Int(64));
        assert_eq!(DType::parse("int32"), DType::Int(32));
        assert_eq!(DType::parse("UInt8"), DType::UInt(8));
        assert_eq!(DType::parse("double"), DType::Float(64));
        assert_eq!(DType::parse("Float32"), DType::Float(32));
        assert_eq!(DType::parse("str"), DType::String);
        assert_eq!(DType::parse("Utf8"), DType::String);
        assert_eq!(DType::parse("boolean"), DType::Bool);
        assert_eq!(DType::parse("datetime64[ns, UTC]"), DType::Datetime);
    }

    #[test]
    fn object_and_string_stay_distinct() {
        assert_ne!(DType::parse("object"), DType::parse("string"));
    }

    #[test]
    fn unknown_labels_are_kept() {
        assert_eq!(DType::parse("Decimal(10, 2)"), DType::Other("decimal(10, 2)".into()));
        assert_eq!(DType::parse("f1"), DType::Other("f1".into()));
        assert_eq!(DType::parse("i32"), DType::Other("i32".into()));
    }

    #[test]
    fn numpy_type_codes_count_bytes() {
        assert_eq!(DType::parse("i8"), DType::Int(64));
        assert_eq!(DType::parse("<i8"), DType::Int(64));
        assert_eq!(DType::parse("i4"), DType::Int(32));
        assert_eq!(DType::parse("u1"), DType::UInt(8));
        assert_eq!(DType::parse("u8"), DType::UInt(64));
        assert_eq!(DType::parse("f8"), DType::Float(64));
        assert_eq!(DType::parse(">f4"), DType::Float(32));
        assert_eq!(DType::parse("f2"), DType::Float(16));
        assert_eq!(DType::parse("|b1"), DType::Bool);
        assert_eq!(DType::parse("i8"), DType::parse("int64"));
    }

    #[test]
    fn dtype_display() {
        assert_eq!(DType::Int(64).to_string(), "int64");
        assert_eq!(DType::Float(32).to_string(), "float32");
        assert_eq!(DType::Object.to_string(), "object");
        assert_eq!(DType::Datetime.to_string(), "datetime64[ns]");
    }

    #[test]
    fn dtype_serializes_as_label() {
        let column = Column::new("a", DType::parse("integer"));
        let json = serde_json::to_string(&column).unwrap();
        assert_eq!(json, r#"{"name":"a","dtype":"int64"}"#);

        let parsed: Column = serde_json::from_str(r#"{"name":"a","dtype":"Float"}"#).unwrap();
        assert_eq!(parsed.dtype, DType::Float(64));
    }

    #[test]
    fn alias_table_resolves_labels() {
        let mut aliases = DTypeAliases::new();
        aliases.insert("Money", "float64");

        assert_eq!(aliases.resolve(DType::parse("money")), DType::Float(64));
        assert_eq!(aliases.resolve(DType::Bool), DType::Bool);
    }

    #[test]
    fn alias_keyed_by_builtin_spelling() {
        let mut aliases = DTypeAliases::new();
        aliases.insert("varchar", "object");

        assert_eq!(aliases.resolve(DType::parse("varchar")), DType::Object);
        assert_eq!(aliases.resolve(DType::parse("text")), DType::Object);
        assert_eq!(aliases.resolve(DType::Object), DType::Object);
        assert_eq!(aliases.resolve(DType::Int(64)), DType::Int(64));
    }

    #[test]
    fn alias_keys_from_config_ignore_case() {
        let aliases: DTypeAliases = serde_json::from_str(r#"{"Int64": "float64"}"#).unwrap();
        assert_eq!(aliases.resolve(DType::parse("int")), DType::Float(64));
    }

    #[test]
    fn schema_operations() {
        let schema = Schema::from_columns(vec![
            Column::new("id", DType::Int(64)),
            Column::new("name", DType::String),
        ]);

        assert_eq!(schema.column_names(), vec!["id", "name"]);
        assert!(schema.find_column("id").is_some());
        assert!(schema.find_column("nonexistent").is_none());
    }

    #[test]
    fn fingerprint_tracks_order_and_dtype() {
        let a = Schema::from_columns(vec![
            Column::new("id", DType::Int(64)),
            Column::new("name", DType::String),
        ]);
        let same = a.clone();
        let reordered = Schema::from_columns(vec![
            Column::new("name", DType::String),
            Column::new("id", DType::Int(64)),
        ]);

        assert_eq!(a.fingerprint(), same.fingerprint());
        assert_ne!(a.fingerprint(), reordered.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
