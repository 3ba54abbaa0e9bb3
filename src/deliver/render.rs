use crate::feed::FeedItem;

/// Telegram rejects messages over 4096 characters; stay safely under.
const MAX_MESSAGE_CHARS: usize = 4000;

/// Renders one feed item as a Telegram message: the title in bold, a
/// blank line, then the item content converted to Telegram's legacy
/// Markdown dialect.
///
/// Conversion failures are not fatal — the raw HTML is sent as-is so the
/// item is still delivered.
pub fn render_message(item: &FeedItem) -> String {
    let content = match htmd::convert(&item.content) {
        Ok(markdown) => to_legacy_markdown(&markdown),
        Err(error) => {
            tracing::warn!(
                title = %item.title,
                error = %error,
                "HTML conversion failed, sending raw content"
            );
            item.content.clone()
        }
    };

    assemble(&item.title, &content)
}

fn assemble(title: &str, content: &str) -> String {
    truncate(&format!("*{}*\n\n{}", title, content), MAX_MESSAGE_CHARS)
}

/// Telegram's legacy Markdown parse mode only understands
/// single-character delimiters: `*bold*` and `_italic_`.
fn to_legacy_markdown(markdown: &str) -> String {
    markdown.replace("**", "*").replace("__", "_")
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => {
            let mut truncated = String::from(&s[..idx]);
            truncated.push_str("...");
            truncated
        }
    }
}
