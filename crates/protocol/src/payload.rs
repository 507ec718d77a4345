use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Response body of `GET /api/graph/workspace/{workspaceId}`.
///
/// `nodes` and `links` decode to empty lists when absent, null, or not an
/// array; malformed elements are dropped one by one rather than aborting the
/// whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGraphPayload {
    #[serde(default, deserialize_with = "lenient_records")]
    pub nodes: Vec<RawNode>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub links: Vec<RawLink>,
}

/// One node record as the backend emits it. `_id` is a collection-qualified
/// key (e.g. `terms/12345`); the label fields are all optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub label_ko: Option<String>,
    pub label_en: Option<String>,
    pub term_ko: Option<String>,
    #[serde(rename = "_key")]
    pub key: Option<String>,
}

/// One edge record. `_from`/`_to` reference `RawNode::id` values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    #[serde(rename = "_from")]
    pub from: Option<String>,
    #[serde(rename = "_to")]
    pub to: Option<String>,
    pub label_ko: Option<String>,
    pub label_en: Option<String>,
}

impl RawNode {
    /// Best human-readable label, in fallback order:
    /// `label_ko` → `label_en` → `term_ko` → `_key`.
    ///
    /// Blank fields count as absent. Returns `None` only when every candidate
    /// is missing, in which case the record is unusable.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        [&self.label_ko, &self.label_en, &self.term_ko, &self.key]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    /// Categorical tag for renderer coloring: the collection prefix of `_id`
    /// (text before the first `/`), when present.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        let id = self.id.as_deref()?.trim();
        let (prefix, rest) = id.split_once('/')?;
        if prefix.is_empty() || rest.is_empty() {
            return None;
        }
        Some(prefix)
    }
}

/// Decode a record array while tolerating shape drift from the backend.
///
/// Anything that is not an array becomes an empty list; elements that fail to
/// decode are logged and skipped.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let Some(items) = value.as_array() else {
        if !value.is_null() {
            log::warn!("graph payload field is not an array; treating as empty");
        }
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("dropping malformed graph record: {err}"),
        }
    }
    Ok(records)
}
