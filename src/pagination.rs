use regex::Regex;

/// Highest page number referenced as `{marker}<n>/` anywhere in the markup.
///
/// Small collections carry no pagination links at all, so the absence of a
/// marker means a single page rather than an error.
pub fn resolve_last_page(markup: &str, marker: &str) -> u32 {
    let pattern = format!(r"{}(\d+)/", regex::escape(marker));
    let Ok(re) = Regex::new(&pattern) else {
        return 1;
    };
    re.captures_iter(markup)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .max()
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_markers_is_single_page() {
        assert_eq!(resolve_last_page("<html><body>nothing</body></html>", "films/page/"), 1);
    }

    #[test]
    fn picks_maximum() {
        let html = r#"
            <div class="paginate-pages"><ul>
              <li><a href="/kurstboy/films/page/2/">2</a></li>
              <li><a href="/kurstboy/films/page/3/">3</a></li>
              <li class="paginate-page unseen-pages">…</li>
              <li><a href="/kurstboy/films/page/41/">41</a></li>
            </ul></div>
            <a class="next" href="/kurstboy/films/page/2/">Older</a>"#;
        assert_eq!(resolve_last_page(html, "films/page/"), 41);
    }

    #[test]
    fn other_resource_markers_ignored() {
        let html = r#"<a href="/u/films/diary/page/9/">9</a><a href="/u/watchlist/page/4/">4</a>"#;
        assert_eq!(resolve_last_page(html, "watchlist/page/"), 4);
        assert_eq!(resolve_last_page(html, "films/page/"), 1);
        assert_eq!(resolve_last_page(html, "films/diary/page/"), 9);
    }

    #[test]
    fn page_zero_clamped() {
        assert_eq!(resolve_last_page(r#"<a href="/u/lists/page/0/">"#, "lists/page/"), 1);
    }
}
