//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象：字段类型（`FieldKind`）与字段取值（`FieldValue`），
//! 以及类型化记录字段与动态取值之间的编解码（`FieldCodec`）。
//!

use chrono::NaiveDate;
use roster_macros::value_object;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// 日期字段的输入/输出格式（与表单 date 控件一致）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 字段类型
///
/// 配置中以小写字符串表示：`string` / `number` / `integer` / `date`。
#[value_object]
#[derive(Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    #[serde(rename = "string", alias = "text")]
    Text,
    Number,
    Integer,
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Date => "date",
        }
    }

    /// 表单清空后的零值
    pub fn zero_input(&self) -> &'static str {
        match self {
            FieldKind::Number | FieldKind::Integer => "0",
            FieldKind::Text | FieldKind::Date => "",
        }
    }

    /// 将非空的表单输入解析为字段取值
    pub fn parse_input(&self, field: &str, raw: &str) -> DomainResult<FieldValue> {
        let raw = raw.trim();
        match self {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Number => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(FieldValue::Number(n)),
                _ => Err(DomainError::validation(field, "must be a number")),
            },
            FieldKind::Integer => raw
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| DomainError::validation(field, "must be a whole number")),
            FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(FieldValue::Date)
                .map_err(|_| DomainError::validation(field, "must be a date (YYYY-MM-DD)")),
        }
    }
}

/// 字段取值
///
/// 序列化为自然的 JSON 形态（null / 字符串 / 数字 / `YYYY-MM-DD`）。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 可选字段留空
    #[default]
    Null,
    Text(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Number(_) => Some(FieldKind::Number),
            FieldValue::Integer(_) => Some(FieldKind::Integer),
            FieldValue::Date(_) => Some(FieldKind::Date),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().map(|k| k.as_str()).unwrap_or("null")
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// 表单可编辑的字符串表示
    pub fn to_input(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
        }
    }

    /// 按字段类型从松散的 JSON 记录中读取取值（`null` 映射为 `Null`）
    pub fn from_json(kind: FieldKind, field: &str, value: &Value) -> DomainResult<Self> {
        let mismatch = || DomainError::TypeMismatch {
            field: field.to_string(),
            expected: kind.as_str().to_string(),
            found: json_type_name(value).to_string(),
        };

        match (kind, value) {
            (_, Value::Null) => Ok(FieldValue::Null),
            (FieldKind::Text, Value::String(s)) => Ok(FieldValue::Text(s.clone())),
            (FieldKind::Text, Value::Number(n)) => Ok(FieldValue::Text(n.to_string())),
            (FieldKind::Text, Value::Bool(b)) => Ok(FieldValue::Text(b.to_string())),
            (FieldKind::Number, Value::Number(n)) => {
                n.as_f64().map(FieldValue::Number).ok_or_else(mismatch)
            }
            (FieldKind::Integer, Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(FieldValue::Integer(i)),
                None => n
                    .as_f64()
                    .and_then(f64_to_i64)
                    .map(FieldValue::Integer)
                    .ok_or_else(mismatch),
            },
            (FieldKind::Number | FieldKind::Integer | FieldKind::Date, Value::String(s)) => {
                kind.parse_input(field, s)
            }
            _ => Err(mismatch()),
        }
    }
}

/// 整值且落在 i64 范围内的浮点数转为 i64，其余返回 None
pub(crate) fn f64_to_i64(f: f64) -> Option<i64> {
    // i64::MAX 不能精确表示为 f64，上界取 2^63（开区间）
    const UPPER: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && f >= -UPPER && f < UPPER {
        Some(f as i64)
    } else {
        None
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 类型化记录字段与 `FieldValue` 之间的编解码
///
/// `#[record]` 宏生成的代码通过该 trait 推导字段类型与是否必填。
pub trait FieldCodec: Sized {
    const KIND: FieldKind;
    const REQUIRED: bool = true;

    fn into_value(self) -> FieldValue;

    fn from_value(field: &str, value: &FieldValue) -> DomainResult<Self>;
}

fn codec_mismatch(field: &str, expected: FieldKind, found: &FieldValue) -> DomainError {
    if found.is_null() {
        return DomainError::validation(field, "is required");
    }
    DomainError::TypeMismatch {
        field: field.to_string(),
        expected: expected.as_str().to_string(),
        found: found.type_name().to_string(),
    }
}

impl FieldCodec for String {
    const KIND: FieldKind = FieldKind::Text;

    fn into_value(self) -> FieldValue {
        FieldValue::Text(self)
    }

    fn from_value(field: &str, value: &FieldValue) -> DomainResult<Self> {
        match value {
            FieldValue::Text(s) => Ok(s.clone()),
            other => Err(codec_mismatch(field, Self::KIND, other)),
        }
    }
}

impl FieldCodec for f64 {
    const KIND: FieldKind = FieldKind::Number;

    fn into_value(self) -> FieldValue {
        FieldValue::Number(self)
    }

    fn from_value(field: &str, value: &FieldValue) -> DomainResult<Self> {
        value
            .as_number()
            .ok_or_else(|| codec_mismatch(field, Self::KIND, value))
    }
}

impl FieldCodec for i64 {
    const KIND: FieldKind = FieldKind::Integer;

    fn into_value(self) -> FieldValue {
        FieldValue::Integer(self)
    }

    fn from_value(field: &str, value: &FieldValue) -> DomainResult<Self> {
        match value {
            FieldValue::Integer(i) => Ok(*i),
            other => Err(codec_mismatch(field, Self::KIND, other)),
        }
    }
}

impl FieldCodec for NaiveDate {
    const KIND: FieldKind = FieldKind::Date;

    fn into_value(self) -> FieldValue {
        FieldValue::Date(self)
    }

    fn from_value(field: &str, value: &FieldValue) -> DomainResult<Self> {
        match value {
            FieldValue::Date(d) => Ok(*d),
            other => Err(codec_mismatch(field, Self::KIND, other)),
        }
    }
}

impl<T: FieldCodec> FieldCodec for Option<T> {
    const KIND: FieldKind = T::KIND;
    const REQUIRED: bool = false;

    fn into_value(self) -> FieldValue {
        self.map(T::into_value).unwrap_or(FieldValue::Null)
    }

    fn from_value(field: &str, value: &FieldValue) -> DomainResult<Self> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_value(field, other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_parses_from_config_names() {
        let kinds: Vec<FieldKind> =
            serde_json::from_value(json!(["string", "text", "number", "integer", "date"]))
                .unwrap();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Text,
                FieldKind::Text,
                FieldKind::Number,
                FieldKind::Integer,
                FieldKind::Date
            ]
        );
        assert_eq!(FieldKind::default(), FieldKind::Text);
    }

    #[test]
    fn parse_input_validates_numeric_and_date_fields() {
        assert_eq!(
            FieldKind::Number.parse_input("totalAmount", " 200.50 ").unwrap(),
            FieldValue::Number(200.5)
        );
        assert!(matches!(
            FieldKind::Number.parse_input("totalAmount", "abc"),
            Err(DomainError::Validation { .. })
        ));
        assert!(FieldKind::Number.parse_input("totalAmount", "NaN").is_err());
        assert_eq!(
            FieldKind::Integer.parse_input("itemCount", "3").unwrap(),
            FieldValue::Integer(3)
        );
        assert!(FieldKind::Integer.parse_input("itemCount", "3.5").is_err());
        assert!(FieldKind::Date.parse_input("orderDate", "2023-10-26").is_ok());
        assert!(FieldKind::Date.parse_input("orderDate", "26/10/2023").is_err());
    }

    #[test]
    fn input_representation_matches_form_values() {
        assert_eq!(FieldValue::Number(150.0).to_input(), "150");
        assert_eq!(FieldValue::Number(75.2).to_input(), "75.2");
        assert_eq!(FieldValue::Integer(3).to_input(), "3");
        assert_eq!(FieldValue::Null.to_input(), "");
        let d = FieldKind::Date.parse_input("d", "2023-10-28").unwrap();
        assert_eq!(d.to_input(), "2023-10-28");
    }

    #[test]
    fn from_json_is_lenient_but_typed() {
        assert_eq!(
            FieldValue::from_json(FieldKind::Integer, "itemCount", &json!(5.0)).unwrap(),
            FieldValue::Integer(5)
        );
        assert_eq!(
            FieldValue::from_json(FieldKind::Number, "totalAmount", &json!("12.5")).unwrap(),
            FieldValue::Number(12.5)
        );
        assert_eq!(
            FieldValue::from_json(FieldKind::Text, "name", &json!(null)).unwrap(),
            FieldValue::Null
        );
        let err = FieldValue::from_json(FieldKind::Number, "totalAmount", &json!({})).unwrap_err();
        assert!(matches!(err, DomainError::TypeMismatch { .. }));
    }

    #[test]
    fn codec_round_trips_optional_values() {
        assert_eq!(Option::<i64>::from_value("n", &FieldValue::Null).unwrap(), None);
        assert_eq!(Some(4_i64).into_value(), FieldValue::Integer(4));
        assert!(!<Option<f64> as FieldCodec>::REQUIRED);
        assert!(<String as FieldCodec>::REQUIRED);

        let err = String::from_value("customerName", &FieldValue::Null).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn integer_from_json_rejects_out_of_range_floats() {
        assert_eq!(
            FieldValue::from_json(FieldKind::Integer, "itemCount", &json!(4.0)).unwrap(),
            FieldValue::Integer(4)
        );
        let err = FieldValue::from_json(FieldKind::Integer, "itemCount", &json!(1e30)).unwrap_err();
        assert!(matches!(err, DomainError::TypeMismatch { .. }));
        assert!(FieldValue::from_json(FieldKind::Integer, "itemCount", &json!(-1e19)).is_err());
        assert_eq!(f64_to_i64(-9_223_372_036_854_775_808.0), Some(i64::MIN));
        assert_eq!(f64_to_i64(9_223_372_036_854_775_808.0), None);
    }
}
