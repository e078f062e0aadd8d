use serde::{Deserialize, Deserializer, Serialize};

pub mod transaction {
    use std::fmt;

    use rust_decimal::Decimal;

    use super::*;

    /// Server-assigned transaction identity.
    ///
    /// The service may emit ids as JSON numbers or strings; both are held as
    /// text so that `1` and `"1"` compare equal.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(from = "RawId", into = "String")]
    pub struct TransactionId(String);

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Signed(i64),
        Unsigned(u64),
        Text(String),
    }

    impl From<RawId> for TransactionId {
        fn from(value: RawId) -> Self {
            match value {
                RawId::Signed(id) => Self(id.to_string()),
                RawId::Unsigned(id) => Self(id.to_string()),
                RawId::Text(id) => Self(id),
            }
        }
    }

    impl From<TransactionId> for String {
        fn from(value: TransactionId) -> Self {
            value.0
        }
    }

    impl TransactionId {
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for TransactionId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for TransactionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    impl From<u64> for TransactionId {
        fn from(value: u64) -> Self {
            Self(value.to_string())
        }
    }

    /// Direction of a transaction.
    ///
    /// Matching is case-insensitive. Anything other than `income` or
    /// `expense` is kept verbatim as [`TransactionKind::Unknown`] and never
    /// contributes to a balance.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(from = "Option<String>", into = "String")]
    pub enum TransactionKind {
        Income,
        Expense,
        #[default]
        Missing,
        Unknown(String),
    }

    impl TransactionKind {
        /// Canonical lowercase wire value.
        pub fn as_str(&self) -> &str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
                Self::Missing => "",
                Self::Unknown(raw) => raw,
            }
        }

        pub fn is_known(&self) -> bool {
            matches!(self, Self::Income | Self::Expense)
        }
    }

    impl From<Option<String>> for TransactionKind {
        fn from(value: Option<String>) -> Self {
            let Some(raw) = value else {
                return Self::Missing;
            };
            if raw.eq_ignore_ascii_case("income") {
                Self::Income
            } else if raw.eq_ignore_ascii_case("expense") {
                Self::Expense
            } else {
                Self::Unknown(raw)
            }
        }
    }

    impl From<TransactionKind> for String {
        fn from(value: TransactionKind) -> Self {
            value.as_str().to_string()
        }
    }

    impl fmt::Display for TransactionKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Unsigned transaction amount as it travels on the wire.
    ///
    /// The sign comes from [`TransactionKind`]. Numbers, strings and null are
    /// all accepted. A string counts by its leading number, so `"12abc"` is 12
    /// and `"abc"` is not a number at all.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum Amount {
        Number(f64),
        Text(String),
        #[default]
        Missing,
    }

    impl Amount {
        /// Exact value, or `None` when the amount is not a number or does not
        /// fit in a [`Decimal`].
        pub fn value(&self) -> Option<Decimal> {
            match self {
                Self::Number(value) => Decimal::try_from(*value).ok(),
                Self::Text(raw) => {
                    let prefix = numeric_prefix(raw);
                    prefix
                        .parse::<Decimal>()
                        .ok()
                        .or_else(|| Decimal::try_from(prefix.parse::<f64>().ok()?).ok())
                }
                Self::Missing => None,
            }
        }

        /// Finite floating-point value, available for any numeric amount
        /// regardless of magnitude.
        pub fn number(&self) -> Option<f64> {
            let value = match self {
                Self::Number(value) => *value,
                Self::Text(raw) => numeric_prefix(raw).parse::<f64>().ok()?,
                Self::Missing => return None,
            };
            value.is_finite().then_some(value)
        }
    }

    /// Longest leading `[sign] digits [. digits] [e [sign] digits]` run after
    /// leading whitespace. Empty when no digit is found.
    fn numeric_prefix(raw: &str) -> &str {
        let text = raw.trim_start();
        let bytes = text.as_bytes();
        let digits_from = |mut at: usize| {
            while bytes.get(at).is_some_and(u8::is_ascii_digit) {
                at += 1;
            }
            at
        };

        let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
        let int_end = digits_from(end);
        let mut digits = int_end - end;
        end = int_end;
        if bytes.get(end) == Some(&b'.') {
            let frac_end = digits_from(end + 1);
            digits += frac_end - (end + 1);
            end = frac_end;
        }
        if digits == 0 {
            return "";
        }

        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_end = digits_from(exp);
            if exp_end > exp {
                end = exp_end;
            }
        }
        &text[..end]
    }

    impl fmt::Display for Amount {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Number(value) => write!(f, "{value}"),
                Self::Text(raw) => f.write_str(raw),
                Self::Missing => Ok(()),
            }
        }
    }

    impl From<f64> for Amount {
        fn from(value: f64) -> Self {
            Self::Number(value)
        }
    }

    /// Canonical record returned by the transaction service.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: TransactionId,
        #[serde(rename = "type", default)]
        pub kind: TransactionKind,
        #[serde(default, deserialize_with = "null_as_empty")]
        pub category: String,
        #[serde(default)]
        pub amount: Amount,
        /// ISO-8601 timestamp, kept verbatim.
        #[serde(default, deserialize_with = "null_as_empty")]
        pub date: String,
        #[serde(default, deserialize_with = "null_as_empty")]
        pub description: String,
    }

    /// Request body for create (`POST`) and update (`PUT`).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionDraft {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub category: String,
        pub amount: Amount,
        /// ISO-8601 UTC timestamp of the moment the form was submitted.
        pub date: String,
        pub description: String,
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::transaction::*;

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        let numeric: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"income","amount":100}"#).unwrap();
        let text: Transaction =
            serde_json::from_str(r#"{"id":"1","type":"income","amount":100}"#).unwrap();
        assert_eq!(numeric.id, text.id);
        assert_eq!(numeric.id.as_str(), "1");
    }

    #[test]
    fn kind_is_case_insensitive() {
        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"INCOME","amount":1}"#).unwrap();
        assert_eq!(tx.kind, TransactionKind::Income);
        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"Expense","amount":1}"#).unwrap();
        assert_eq!(tx.kind, TransactionKind::Expense);
    }

    #[test]
    fn unknown_and_missing_kinds_are_preserved() {
        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"transfer","amount":1}"#).unwrap();
        assert_eq!(tx.kind, TransactionKind::Unknown("transfer".to_string()));
        assert!(!tx.kind.is_known());

        let tx: Transaction = serde_json::from_str(r#"{"id":1,"amount":1}"#).unwrap();
        assert_eq!(tx.kind, TransactionKind::Missing);
        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":null,"amount":1}"#).unwrap();
        assert_eq!(tx.kind, TransactionKind::Missing);
    }

    #[test]
    fn amount_accepts_numbers_strings_and_null() {
        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"income","amount":12.5}"#).unwrap();
        assert_eq!(tx.amount.value(), Some(Decimal::new(125, 1)));
        assert_eq!(tx.amount.to_string(), "12.5");

        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"income","amount":"7.25"}"#).unwrap();
        assert_eq!(tx.amount.value(), Some(Decimal::new(725, 2)));

        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"income","amount":"lots"}"#).unwrap();
        assert_eq!(tx.amount.value(), None);

        let tx: Transaction =
            serde_json::from_str(r#"{"id":1,"type":"income","amount":null}"#).unwrap();
        assert_eq!(tx.amount, Amount::Missing);
        assert_eq!(tx.amount.value(), None);
    }

    #[test]
    fn text_amounts_count_by_their_leading_number() {
        assert_eq!(Amount::Text("12abc".into()).value(), Some(Decimal::from(12)));
        assert_eq!(Amount::Text("  -3.5 kg".into()).value(), Some(Decimal::new(-35, 1)));
        assert_eq!(Amount::Text("1e2x".into()).value(), Some(Decimal::from(100)));
        assert_eq!(Amount::Text("7e".into()).value(), Some(Decimal::from(7)));
        assert_eq!(Amount::Text(".5".into()).number(), Some(0.5));
        assert_eq!(Amount::Text("abc12".into()).value(), None);
        assert_eq!(Amount::Text("-.".into()).number(), None);
        assert_eq!(Amount::Text(String::new()).number(), None);
    }

    #[test]
    fn out_of_range_numbers_keep_their_float_value() {
        let huge = Amount::Number(1e29);
        assert_eq!(huge.value(), None);
        assert_eq!(huge.number(), Some(1e29));
        assert_eq!(Amount::Text("1e40".into()).value(), None);
        assert_eq!(Amount::Text("1e40".into()).number(), Some(1e40));
        assert_eq!(Amount::Missing.number(), None);
    }

    #[test]
    fn null_text_fields_become_empty() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":1,"type":"income","amount":1,"category":null,"description":null}"#,
        )
        .unwrap();
        assert_eq!(tx.category, "");
        assert_eq!(tx.description, "");
        assert_eq!(tx.date, "");
    }

    #[test]
    fn draft_serializes_type_field_and_numeric_amount() {
        let draft = TransactionDraft {
            kind: TransactionKind::Expense,
            category: "groceries".to_string(),
            amount: Amount::Number(30.0),
            date: "2024-05-01T10:00:00.000Z".to_string(),
            description: "weekly shop".to_string(),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["amount"], 30.0);
        assert!(value.get("id").is_none());
    }
}
