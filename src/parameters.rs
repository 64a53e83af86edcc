use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A string-coercible request parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    StringValue(Cow<'static, str>),
    IntValue(i64),
    FloatValue(f64),
    BoolValue(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::StringValue(s) => f.write_str(s),
            ParamValue::IntValue(n) => write!(f, "{}", n),
            ParamValue::FloatValue(n) => write!(f, "{}", n),
            ParamValue::BoolValue(b) => write!(f, "{}", b),
        }
    }
}

impl<'a> From<&'a str> for ParamValue {
    fn from(s: &'a str) -> Self {
        ParamValue::StringValue(Cow::Owned(s.to_owned()))
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::StringValue(Cow::Owned(s))
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::IntValue(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::IntValue(n.into())
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::IntValue(n.into())
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::FloatValue(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::BoolValue(b)
    }
}

/// Caller supplied parameters of a single API call.
///
/// Values are rendered to strings on insertion; a repeated key keeps the
/// last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into().to_string());
        self
    }

    /// Chaining form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[test]
fn test_values_render_as_strings() {
    let params = Params::new()
        .with("userid", 29i64)
        .with("startdate", "1")
        .with("lastupdate", 1.5)
        .with("offset", true);
    assert_eq!(params.get("userid"), Some("29"));
    assert_eq!(params.get("startdate"), Some("1"));
    assert_eq!(params.get("lastupdate"), Some("1.5"));
    assert_eq!(params.get("offset"), Some("true"));
    assert_eq!(params.len(), 4);
}

#[test]
fn test_repeated_key_keeps_last_value() {
    let params: Params = vec![("a", "1"), ("a", "2")].into_iter().collect();
    assert_eq!(params.len(), 1);
    assert_eq!(params.get("a"), Some("2"));
}

#[test]
fn test_borrowed_runtime_strings() {
    let startdate = format!("{}", 1_700_000_000);
    let params = Params::new().with("startdate", startdate.as_str());
    drop(startdate);
    assert_eq!(params.get("startdate"), Some("1700000000"));
}
