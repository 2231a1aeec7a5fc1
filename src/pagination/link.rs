use std::fmt::{self, Display};

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rel {
    Next,
    Prev,
}

impl Rel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rel::Next => "next",
            Rel::Prev => "prev",
        }
    }

    /// Query parameter that anchors a link of this relation
    pub fn cursor_param(&self) -> &'static str {
        match self {
            Rel::Next => "max_id",
            Rel::Prev => "min_id",
        }
    }
}

/// One navigation target of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub rel: Rel,
    pub url: Url,
}

impl Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>; rel=\"{}\"", self.url, self.rel.as_str())
    }
}

/// Absolute request URL with its query string stripped; links are built on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBase {
    url: Url,
}

impl LinkBase {
    /// Resolve the request `path` against the configured public `base_url`
    pub fn new(base_url: &str, path: &str) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(base_url)?.join(path)?;
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url })
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn link(&self, rel: Rel, limit: u32, cursor: &impl Display) -> Link {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair(rel.cursor_param(), &cursor.to_string());
        Link { rel, url }
    }
}

/// Join links into one header value, `None` when there is nothing to navigate to
pub fn format_link_header(links: &[Link]) -> Option<String> {
    if links.is_empty() {
        return None;
    }
    Some(links.iter().map(Link::to_string).collect::<Vec<_>>().join(", "))
}

/// Split a `Link` header value into `(rel, url)` pairs.
///
/// Segments without a `rel` parameter are skipped; unknown relations are kept verbatim.
pub fn parse_link_header(value: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for segment in split_segments(value) {
        let segment = segment.trim();
        let Some(rest) = segment.strip_prefix('<') else { continue };
        let Some((target, params)) = rest.split_once('>') else { continue };

        let rel = params
            .split(';')
            .filter_map(|p| p.trim().split_once('='))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("rel"))
            .map(|(_, v)| v.trim().trim_matches('"').to_string());

        if let Some(rel) = rel {
            out.push((rel, target.trim().to_string()));
        }
    }
    out
}

/// Find the URL for one relation in a `Link` header value
pub fn find_link(value: &str, rel: Rel) -> Option<String> {
    parse_link_header(value)
        .into_iter()
        .find(|(r, _)| r.split_whitespace().any(|r| r == rel.as_str()))
        .map(|(_, url)| url)
}

// Commas may appear inside <...>, only split outside of it
fn split_segments(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&value[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_strips_query_and_uses_configured_origin() {
        let base =
            LinkBase::new("https://social.example", "/api/v1/timelines/home?limit=5&max_id=9").unwrap();
        assert_eq!(base.as_url().as_str(), "https://social.example/api/v1/timelines/home");
    }

    #[test]
    fn link_carries_limit_and_cursor() {
        let base = LinkBase::new("https://social.example/", "/api/v1/mutes").unwrap();
        let next = base.link(Rel::Next, 40, &"0190a");
        assert_eq!(
            next.to_string(),
            "<https://social.example/api/v1/mutes?limit=40&max_id=0190a>; rel=\"next\""
        );
        let prev = base.link(Rel::Prev, 40, &7);
        assert_eq!(prev.url.as_str(), "https://social.example/api/v1/mutes?limit=40&min_id=7");
    }

    #[test]
    fn header_joins_with_comma_and_is_absent_when_empty() {
        let base = LinkBase::new("http://localhost:3000", "/x").unwrap();
        let links = [base.link(Rel::Next, 2, &20), base.link(Rel::Prev, 2, &30)];
        let header = format_link_header(&links).unwrap();
        assert_eq!(
            header,
            "<http://localhost:3000/x?limit=2&max_id=20>; rel=\"next\", \
             <http://localhost:3000/x?limit=2&min_id=30>; rel=\"prev\""
        );
        assert_eq!(format_link_header(&[]), None);
    }

    #[test]
    fn parses_header_back() {
        let header = "<https://a.example/x?limit=2&max_id=20>; rel=\"next\", \
                      <https://a.example/x?limit=2&min_id=30>; rel=\"prev\"";
        let links = parse_link_header(header);
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0],
            ("next".to_string(), "https://a.example/x?limit=2&max_id=20".to_string())
        );
        assert_eq!(
            find_link(header, Rel::Prev).as_deref(),
            Some("https://a.example/x?limit=2&min_id=30")
        );
        assert_eq!(find_link("", Rel::Next), None);
        assert_eq!(find_link("<https://a.example/y>; title=\"x\"", Rel::Next), None);
    }
}
