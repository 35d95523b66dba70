//! Lenient deserializers for text fields
//!
//! Part numbers, types and notes often arrive as bare numbers from YAML.
//! These helpers accept any scalar and keep its text form.

use serde::{Deserialize, Deserializer};

use super::OneOrMany;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(x) => super::format_number(x),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Required scalar coerced to text
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into())
}

/// Optional scalar coerced to text
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

/// Optional scalar or list of scalars coerced to text
pub fn opt_text_or_list<'de, D>(deserializer: D) -> Result<Option<OneOrMany<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany<Scalar>>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::One(s) => OneOrMany::One(String::from(s)),
        OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(String::from).collect()),
    }))
}

/// List of scalars coerced to text
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(items.into_iter().map(String::from).collect())
}
