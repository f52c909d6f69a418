use anyhow::{Result, anyhow};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::config::Endpoints;
use crate::data_models::{MAX_RESULTS, ResolverPath, SearchResult};
use crate::fallback::{Step, first_success};

const RESULT_LINK_SELECTOR: &str = "a.result__a[href]";
const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (compatible; StatusbuiltPRBot/1.0)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    /// Structured search API, only tried when a credential is available.
    Primary,
    /// HTML results page, scraped.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    pub source: SearchSource,
    /// The upstream answered and its body was understood.
    pub ok: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub results: Vec<SearchResult>,
    pub path: ResolverPath,
    pub cse_attempted: bool,
    pub cse_ok: bool,
    pub ddg_used: bool,
}

impl Resolution {
    fn from_trail(results: Option<Vec<SearchResult>>, trail: &[SourceAttempt]) -> Resolution {
        let primary = trail.iter().find(|a| a.source == SearchSource::Primary);
        let path = match (&results, trail.last()) {
            (Some(_), Some(last)) if last.source == SearchSource::Primary => ResolverPath::Primary,
            (Some(_), Some(_)) => ResolverPath::Fallback,
            _ => ResolverPath::None,
        };
        Resolution {
            results: results.unwrap_or_default(),
            path,
            cse_attempted: primary.is_some(),
            cse_ok: primary.is_some_and(|a| a.ok),
            ddg_used: trail.iter().any(|a| a.source == SearchSource::Fallback),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Option<Vec<CseItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    display_link: Option<String>,
}

impl CseResponse {
    fn into_results(self) -> Vec<SearchResult> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .take(MAX_RESULTS)
            .enumerate()
            .map(|(idx, item)| {
                SearchResult::new(
                    idx as u32 + 1,
                    item.title.unwrap_or_default(),
                    item.link.unwrap_or_default(),
                    item.snippet.unwrap_or_default(),
                    item.display_link.unwrap_or_default(),
                )
            })
            .collect()
    }
}

/// Finds up to [`MAX_RESULTS`] search results for a query. Never fails: upstream
/// problems are logged and show up as fewer (or zero) results.
pub struct Resolver<'a> {
    client: &'a Client,
    endpoints: &'a Endpoints,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a Client, endpoints: &'a Endpoints) -> Self {
        Self { client, endpoints }
    }

    pub async fn resolve(&self, query: &str, api_key: Option<&str>, cx: &str) -> Resolution {
        let mut sources = Vec::with_capacity(2);
        if api_key.is_some() {
            sources.push(SearchSource::Primary);
        }
        sources.push(SearchSource::Fallback);

        let outcome = first_success(sources, move |source| {
            self.try_source(source, query, api_key, cx)
        })
        .await;

        let resolution = Resolution::from_trail(outcome.winner, &outcome.trail);
        tracing::info!(
            path = ?resolution.path,
            count = resolution.results.len(),
            "resolved search results"
        );
        resolution
    }

    async fn try_source(
        &self,
        source: SearchSource,
        query: &str,
        api_key: Option<&str>,
        cx: &str,
    ) -> Step<Vec<SearchResult>, SourceAttempt> {
        let fetched = match (source, api_key) {
            (SearchSource::Primary, Some(key)) => self.fetch_primary(query, key, cx).await,
            (SearchSource::Primary, None) => Err(anyhow!("no search credential configured")),
            (SearchSource::Fallback, _) => self.fetch_fallback(query).await,
        };

        match fetched {
            Ok(results) if !results.is_empty() => {
                Step::Accept(results, SourceAttempt { source, ok: true })
            }
            Ok(_) => Step::Reject(SourceAttempt { source, ok: true }),
            Err(e) => {
                tracing::warn!(?source, "search source failed: {:#}", e);
                Step::Reject(SourceAttempt { source, ok: false })
            }
        }
    }

    async fn fetch_primary(&self, query: &str, key: &str, cx: &str) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(&self.endpoints.cse)
            .query(&[("q", query), ("key", key), ("cx", cx)])
            .send()
            .await?
            .error_for_status()
            // reqwest errors embed the URL, which carries the key
            .map_err(|e| anyhow!("search API returned {:?}", e.status()))?;
        let body: CseResponse = response.json().await?;
        Ok(body.into_results())
    }

    async fn fetch_fallback(&self, query: &str) -> Result<Vec<SearchResult>> {
        let html = self
            .client
            .get(&self.endpoints.ddg_html)
            .query(&[("q", query)])
            .header(reqwest::header::USER_AGENT, FALLBACK_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_fallback_results(&html)
    }
}

/// Pulls result links out of an HTML results page: anchor text becomes the
/// title, `href` the link. Stops after [`MAX_RESULTS`] entries.
pub fn parse_fallback_results(html: &str) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(RESULT_LINK_SELECTOR)
        .map_err(|e| anyhow!("invalid result selector: {e:?}"))?;

    let results = document
        .select(&selector)
        .filter_map(|anchor| {
            let link = anchor.value().attr("href")?.trim();
            if link.is_empty() {
                return None;
            }
            let title = anchor.text().collect::<String>().trim().to_string();
            Some((title, link.to_string()))
        })
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(idx, (title, link))| {
            let rank = idx as u32 + 1;
            SearchResult::from_anchor(rank, title, link)
        })
        .collect();

    Ok(results)
}
