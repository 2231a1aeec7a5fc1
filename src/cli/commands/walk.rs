use clap::Args;
use reqwest::header::LINK;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::cli::OutputFormat;
use crate::pagination::{find_link, Rel};

#[derive(Args, Debug)]
pub struct WalkArgs {
    #[arg(help = "Timeline URL to start from, e.g. http://localhost:3000/api/v1/timelines/home")]
    pub url: Url,

    #[arg(long, env = "TIMELINE_TOKEN", hide_env_values = true, help = "Bearer token for protected timelines")]
    pub token: Option<String>,

    #[arg(long, help = "Page size requested on the first page")]
    pub limit: Option<u32>,

    #[arg(long, default_value_t = 10, help = "Stop after this many pages")]
    pub max_pages: usize,
}

/// One fetched page, reduced to what navigation needs
#[derive(Debug, Serialize)]
pub struct WalkedPage {
    pub url: String,
    pub ids: Vec<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

pub async fn handle(args: WalkArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = match args.limit {
        Some(limit) => with_limit(&args.url, limit),
        None => args.url.clone(),
    };

    let pages = walk(&client, start, args.token.as_deref(), args.max_pages).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&pages)?),
        OutputFormat::Text => {
            for (n, page) in pages.iter().enumerate() {
                println!("page {} ({} items) {}", n + 1, page.ids.len(), page.url);
                for id in &page.ids {
                    println!("  {}", id);
                }
            }
            let total: usize = pages.iter().map(|p| p.ids.len()).sum();
            let exhausted = pages.last().map_or(true, |p| p.next.is_none());
            println!(
                "{} items over {} pages{}",
                total,
                pages.len(),
                if exhausted { "" } else { " (stopped at --max-pages)" }
            );
        }
    }
    Ok(())
}

/// Fetch `start` and keep following `rel="next"` until it disappears or
/// `max_pages` pages have been read.
pub async fn walk(
    client: &reqwest::Client,
    start: Url,
    token: Option<&str>,
    max_pages: usize,
) -> anyhow::Result<Vec<WalkedPage>> {
    let mut pages = Vec::new();
    let mut cursor = Some(start);

    while let Some(url) = cursor.take() {
        if pages.len() >= max_pages {
            break;
        }

        let mut request = client.get(url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} answered {}: {}", url, status, body);
        }

        let items: Vec<Value> = response.json().await?;
        let next = link.as_deref().and_then(|l| find_link(l, Rel::Next));
        let prev = link.as_deref().and_then(|l| find_link(l, Rel::Prev));
        tracing::debug!("Fetched {} items from {}", items.len(), url);

        cursor = next.as_deref().map(Url::parse).transpose()?;
        pages.push(WalkedPage {
            url: url.to_string(),
            ids: items.iter().map(item_id).collect(),
            next,
            prev,
        });
    }

    Ok(pages)
}

/// Replace any `limit` already in the query string
fn with_limit(url: &Url, limit: u32) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "limit")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("limit", &limit.to_string());
    url
}

fn item_id(item: &Value) -> String {
    match item.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_limit_replaces_existing_limit() {
        let url = Url::parse("http://localhost:3000/api/v1/mutes?limit=5&max_id=9").unwrap();
        assert_eq!(with_limit(&url, 2).as_str(), "http://localhost:3000/api/v1/mutes?max_id=9&limit=2");
    }

    #[test]
    fn item_ids_are_rendered_as_text() {
        assert_eq!(item_id(&json!({ "id": "abc" })), "abc");
        assert_eq!(item_id(&json!({ "id": 7 })), "7");
        assert_eq!(item_id(&json!({})), "?");
    }
}
