//! Client for the external volunteer-listings service.
//!
//! The upstream answers XML. Whatever shape it returns (one `<item>`,
//! many, or none) is normalized into a `Vec<VolunteerProgram>` right
//! here at the boundary; nothing else in the crate sees the raw payload.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::db::models::VolunteerProgram;
use crate::error::SproutError;

#[derive(Clone)]
pub struct ListingsClient {
    http: reqwest::Client,
    base: Url,
    service_key: Arc<str>,
}

impl ListingsClient {
    pub fn new(http: reqwest::Client, base: Url, service_key: &str) -> Self {
        Self {
            http,
            base,
            service_key: Arc::from(service_key),
        }
    }

    /// Fetch the detail records for one program registration number.
    pub async fn fetch_detail(
        &self,
        program_id: &str,
    ) -> Result<Vec<VolunteerProgram>, SproutError> {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("ServiceKey", &self.service_key)
            .append_pair("progrmRegistNo", program_id);

        let resp = self.http.get(url).send().await?.error_for_status()?;
        let body = resp.text().await?;

        let records = parse_listing(&body)?;
        info!(program_id, count = records.len(), "fetched volunteer detail");
        Ok(records)
    }
}

// Envelope mirrors the upstream's <response><body><items><item>… nesting.
// Every level is optional; an absent level means an empty result, not an
// error.
#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    body: Option<ListingBody>,
}

#[derive(Debug, Deserialize)]
struct ListingBody {
    items: Option<ListingItems>,
}

#[derive(Debug, Deserialize)]
struct ListingItems {
    #[serde(default, rename = "item")]
    item: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "progrmRegistNo")]
    registration_no: Option<String>,
    #[serde(rename = "prgramSj")]
    title: Option<String>,
    #[serde(rename = "actBeginDe")]
    begin_date: Option<String>,
    #[serde(rename = "actEndDe")]
    end_date: Option<String>,
    #[serde(rename = "actPlace")]
    place: Option<String>,
}

/// Parse the upstream XML into normalized records. Items without a
/// registration number are dropped; they cannot be keyed or persisted.
pub fn parse_listing(xml: &str) -> Result<Vec<VolunteerProgram>, SproutError> {
    let envelope: ListingEnvelope = quick_xml::de::from_str(xml)
        .map_err(|e| SproutError::Upstream(format!("malformed listings XML: {e}")))?;

    let items = envelope
        .body
        .and_then(|b| b.items)
        .map(|i| i.item)
        .unwrap_or_default();

    Ok(items
        .into_iter()
        .filter_map(|raw| {
            let registration_no = raw.registration_no?;
            Some(VolunteerProgram {
                registration_no,
                title: raw.title.unwrap_or_default(),
                begin_date: raw.begin_date,
                end_date: raw.end_date,
                place: raw.place,
            })
        })
        .collect())
}
