use crate::feed::FeedItem;
use chrono::{DateTime, Utc};

/// Result of scanning a fetched feed against the stored watermark.
#[derive(Debug)]
pub struct Selection {
    /// Items to deliver, oldest first.
    pub items: Vec<FeedItem>,
    /// Publish time of the newest selected item; `None` when nothing was
    /// selected, in which case the caller must not write a watermark.
    pub new_watermark: Option<DateTime<Utc>>,
}

/// Selects the items published strictly after `watermark`, oldest first.
///
/// Feeds are conventionally newest-first, so the input is processed in
/// reverse: delivery order then matches chronological publish order and
/// the chat history reads correctly. Items without a publish time are
/// never selected and never move the watermark. A `None` watermark
/// ("never delivered") selects every timestamped item.
///
/// The comparison is strict: an item whose timestamp equals the watermark
/// was already considered delivered and is excluded.
pub fn select_new(items: Vec<FeedItem>, watermark: Option<DateTime<Utc>>) -> Selection {
    let mut selected = Vec::new();
    let mut new_watermark = None;

    for item in items.into_iter().rev() {
        let Some(published) = item.published else {
            continue;
        };

        if let Some(mark) = watermark {
            if published <= mark {
                continue;
            }
        }

        new_watermark = Some(published);
        selected.push(item);
    }

    Selection {
        items: selected,
        new_watermark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn item(title: &str, published: Option<i64>) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            content: format!("<p>{}</p>", title),
            published: published.map(ts),
        }
    }

    /// Newest-first feed, like a real one.
    fn feed_t3_t2_t1() -> Vec<FeedItem> {
        vec![
            item("third", Some(300)),
            item("second", Some(200)),
            item("first", Some(100)),
        ]
    }

    #[test]
    fn watermark_at_oldest_item_selects_the_rest_chronologically() {
        let selection = select_new(feed_t3_t2_t1(), Some(ts(100)));

        let titles: Vec<&str> = selection.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "third"]);
        assert_eq!(selection.new_watermark, Some(ts(300)));
    }

    #[test]
    fn absent_watermark_selects_all_timestamped_items_oldest_first() {
        let selection = select_new(feed_t3_t2_t1(), None);

        let titles: Vec<&str> = selection.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert_eq!(selection.new_watermark, Some(ts(300)));
    }

    #[test]
    fn untimestamped_item_is_skipped_alongside_a_selected_one() {
        let feed = vec![item("timestamped", Some(500)), item("undated", None)];

        let selection = select_new(feed, Some(ts(400)));

        let titles: Vec<&str> = selection.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["timestamped"]);
        assert_eq!(selection.new_watermark, Some(ts(500)));
    }

    #[test]
    fn untimestamped_items_never_move_the_watermark() {
        let selection = select_new(vec![item("undated", None)], None);

        assert!(selection.items.is_empty());
        assert_eq!(selection.new_watermark, None);
    }

    #[test]
    fn item_exactly_at_the_watermark_is_excluded() {
        let selection = select_new(feed_t3_t2_t1(), Some(ts(300)));

        assert!(selection.items.is_empty());
        assert_eq!(selection.new_watermark, None);
    }

    #[test]
    fn rerun_with_produced_watermark_selects_nothing() {
        let first = select_new(feed_t3_t2_t1(), None);
        let second = select_new(feed_t3_t2_t1(), first.new_watermark);

        assert!(second.items.is_empty());
        assert_eq!(second.new_watermark, None);
    }

    proptest! {
        #[test]
        fn selection_is_new_and_chronological(
            mut seconds in proptest::collection::vec(0i64..2_000_000_000, 0..20),
            watermark_secs in proptest::option::of(0i64..2_000_000_000),
        ) {
            // feeds are conventionally newest-first
            seconds.sort_unstable_by(|a, b| b.cmp(a));
            let feed: Vec<FeedItem> = seconds
                .iter()
                .map(|&s| item("entry", Some(s)))
                .collect();
            let watermark = watermark_secs.map(ts);

            let selection = select_new(feed, watermark);

            let mut previous: Option<DateTime<Utc>> = None;
            for selected in &selection.items {
                let published = selected.published.unwrap();
                if let Some(mark) = watermark {
                    prop_assert!(published > mark);
                }
                if let Some(prev) = previous {
                    prop_assert!(published >= prev);
                }
                previous = Some(published);
            }

            match selection.new_watermark {
                Some(mark) => prop_assert_eq!(
                    Some(mark),
                    selection.items.last().and_then(|i| i.published)
                ),
                None => prop_assert!(selection.items.is_empty()),
            }
        }
    }
}
