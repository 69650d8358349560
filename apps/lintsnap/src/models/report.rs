//! Schema of the structured (JSON) analysis report.
//!
//! Mirrors golangci-lint's `--out-format json` document. Only the fields the
//! parser consumes are modeled; unknown fields are ignored.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Top-level report document.
pub struct JsonReport {
    pub report: ReportMeta,
    #[serde(deserialize_with = "null_as_empty")]
    pub issues: Vec<JsonIssue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Run metadata; `Error` carries compiler output the tool could not attribute.
pub struct ReportMeta {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonIssue {
    pub from_linter: String,
    pub text: String,
    pub pos: JsonPos,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonPos {
    pub filename: String,
    #[serde(deserialize_with = "position")]
    pub line: u32,
    #[serde(default, deserialize_with = "optional_position")]
    pub column: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Number(u64),
    Text(String),
}

impl RawPosition {
    fn into_u32<E: de::Error>(self) -> Result<u32, E> {
        match self {
            RawPosition::Number(n) => {
                u32::try_from(n).map_err(|_| E::custom(format!("position out of range: {n}")))
            }
            RawPosition::Text(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| E::custom(format!("position is not a number: {s:?}"))),
        }
    }
}

fn position<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    RawPosition::deserialize(d)?.into_u32()
}

fn optional_position<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    match Option::<RawPosition>::deserialize(d)? {
        Some(raw) => raw.into_u32().map(Some),
        None => Ok(None),
    }
}

fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}
