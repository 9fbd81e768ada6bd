use std::sync::LazyLock;

use account_finder::sources::{FetchError, ReferenceSource};
use account_finder::ReferenceInfo;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use super::get_text;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<h[1-6][^>]*class="[^"]*profile-top-title[^"]*"[^>]*>(.*?)</h[1-6]>"#).expect("valid FIDE profile regex")
});
static FEDERATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Federation:?\s*</div>\s*<div[^>]*>(.*?)</div>").expect("valid FIDE profile regex"));
static BIRTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)B-Year:?\s*</div>\s*<div[^>]*>(.*?)</div>").expect("valid FIDE profile regex"));
static RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="[^"]*profile-top-rating_header[^"]*"[^>]*>(.*?)</div>"#).expect("valid FIDE profile regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid FIDE profile regex"));

pub struct FideClient {
    client: Client,
    base_url: String,
}

impl FideClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ReferenceSource for FideClient {
    async fn fetch_reference_info(&self, fide_id: &str) -> Result<Option<ReferenceInfo>, FetchError> {
        let url = format!("{}/profile/{}", self.base_url, fide_id.trim());
        Ok(get_text(&self.client, &url)
            .await?
            .and_then(|html| parse_profile(&html)))
    }
}

/// Scrape name, federation, birth year and standard rating from a FIDE
/// profile page. Returns None when the page has no player name.
pub fn parse_profile(html: &str) -> Option<ReferenceInfo> {
    let name = capture_text(&NAME_RE, html)?;

    Some(ReferenceInfo {
        name,
        federation: capture_text(&FEDERATION_RE, html),
        birth_year: capture_text(&BIRTH_YEAR_RE, html).and_then(|y| digits(&y)),
        rating: capture_text(&RATING_RE, html).and_then(|r| digits(&r)),
    })
}

fn capture_text(re: &Regex, html: &str) -> Option<String> {
    let inner = re.captures(html)?.get(1)?.as_str();
    let text = TAG_RE.replace_all(inner, " ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

fn digits(s: &str) -> Option<i32> {
    let d: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    d.parse().ok()
}
