use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::parser;

/// One entry of a fetched feed, reduced to what delivery needs.
///
/// `content` keeps the entry's HTML as-is; conversion to the chat dialect
/// happens at render time. `published` falls back to the entry's updated
/// time; entries carrying neither are parsed but never delivered.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub content: String,
    pub published: Option<DateTime<Utc>>,
}

/// Parses RSS/Atom bytes into items in document order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedItem>> {
    let feed = parser::parse(bytes)?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            let content = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content))
                .unwrap_or_default();
            let published = entry.published.or(entry.updated);

            FeedItem {
                title,
                content,
                published,
            }
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rss_items_in_document_order() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Example</title>
    <item>
        <title>Newer</title>
        <description>&lt;p&gt;b&lt;/p&gt;</description>
        <pubDate>Tue, 02 Jan 2024 12:00:00 GMT</pubDate>
    </item>
    <item>
        <title>Older</title>
        <description>&lt;p&gt;a&lt;/p&gt;</description>
        <pubDate>Mon, 01 Jan 2024 12:00:00 GMT</pubDate>
    </item>
</channel></rss>"#;

        let items = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Newer");
        assert_eq!(items[1].title, "Older");
        assert_eq!(
            items[0].published,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap())
        );
        assert_eq!(items[0].content, "<p>b</p>");
    }

    #[test]
    fn item_without_date_has_no_published_time() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Example</title>
    <item><title>Undated</title><description>x</description></item>
</channel></rss>"#;

        let items = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].published.is_none());
    }

    #[test]
    fn atom_entry_uses_content_body_and_updated_fallback() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Example</title>
    <id>urn:example</id>
    <updated>2024-01-02T12:00:00Z</updated>
    <entry>
        <title>Entry</title>
        <id>urn:example:1</id>
        <updated>2024-01-02T12:00:00Z</updated>
        <content type="html">&lt;p&gt;body&lt;/p&gt;</content>
    </entry>
</feed>"#;

        let items = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "<p>body</p>");
        // no <published>; the updated time stands in
        assert_eq!(
            items[0].published,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn missing_title_and_content_get_defaults() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Example</title>
    <item><pubDate>Mon, 01 Jan 2024 12:00:00 GMT</pubDate></item>
</channel></rss>"#;

        let items = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(items[0].title, "Untitled");
        assert_eq!(items[0].content, "");
    }

    #[test]
    fn rejects_invalid_xml() {
        assert!(parse_feed(b"<not a feed").is_err());
    }
}
