//! RFC 5988 `Link` header rendering.

use url::Url;

use crate::PageRequest;

fn page_url(base: &Url, request: &PageRequest, page: u64) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("page", &page.to_string());
        pairs.append_pair("size", &request.size().to_string());
        if let Some(sort) = request.sort() {
            pairs.append_pair("sort", &sort.to_string());
        }
    }
    url
}

/// Render `first`, `prev`, `next`, and `last` links for a paged resource.
///
/// `prev` is omitted on the first page and `next` on the last. An empty
/// result still links `first` and `last` to page zero.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, link_header};
/// use url::Url;
///
/// let base = Url::parse("http://localhost/api/points").expect("url");
/// let request = PageRequest::new(0, 20).expect("request");
/// let header = link_header(&base, &request, 3);
/// assert!(header.contains(r#"<http://localhost/api/points?page=1&size=20>; rel="next""#));
/// assert!(!header.contains(r#"rel="prev""#));
/// ```
#[must_use]
pub fn link_header(base: &Url, request: &PageRequest, total_pages: u64) -> String {
    let current = u64::from(request.page());
    let last = total_pages.saturating_sub(1);
    let mut links = Vec::with_capacity(4);
    if current < last {
        links.push((current + 1, "next"));
    }
    if current > 0 {
        links.push((current - 1, "prev"));
    }
    links.push((last, "last"));
    links.push((0, "first"));

    links
        .into_iter()
        .map(|(page, rel)| format!("<{}>; rel=\"{rel}\"", page_url(base, request, page)))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    //! Link rendering coverage.
    use super::*;
    use crate::Sort;
    use rstest::{fixture, rstest};

    #[fixture]
    fn base() -> Url {
        Url::parse("http://localhost:8080/api/weights?stale=1").expect("base url")
    }

    fn rels(header: &str) -> Vec<String> {
        header
            .split(',')
            .filter_map(|link| link.split("rel=\"").nth(1))
            .map(|rel| rel.trim_end_matches('"').to_owned())
            .collect()
    }

    #[rstest]
    fn middle_page_links_both_neighbours(base: Url) {
        let request = PageRequest::new(1, 10).expect("request");
        let header = link_header(&base, &request, 3);
        assert_eq!(rels(&header), vec!["next", "prev", "last", "first"]);
        assert!(header.contains("page=2&size=10>; rel=\"next\""));
        assert!(header.contains("page=0&size=10>; rel=\"prev\""));
        assert!(!header.contains("stale"));
    }

    #[rstest]
    fn last_page_omits_next(base: Url) {
        let request = PageRequest::new(2, 10).expect("request");
        let header = link_header(&base, &request, 3);
        assert_eq!(rels(&header), vec!["prev", "last", "first"]);
    }

    #[rstest]
    fn empty_result_links_page_zero(base: Url) {
        let header = link_header(&base, &PageRequest::default(), 0);
        assert_eq!(rels(&header), vec!["last", "first"]);
        assert!(header.contains("page=0&size=20>; rel=\"last\""));
    }

    #[rstest]
    fn sort_is_carried_into_links(base: Url) {
        let request = PageRequest::new(0, 5)
            .expect("request")
            .with_sort(Sort::desc("timestamp"));
        let header = link_header(&base, &request, 2);
        assert!(header.contains("sort=timestamp%2Cdesc"));
    }
}
