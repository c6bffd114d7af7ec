//! Small HTML fragment builders.
//!
//! Every piece of server-supplied text goes through [`escape`] before it is
//! interpolated. Fragments are plain `String`s; there is no DOM.

use std::fmt::Write;

use crate::events::VideoRef;

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<h4>heading</h4>` followed by a bulleted list.
pub fn heading_list(heading: &str, list_class: &str, items: &[String]) -> String {
    let mut out = format!("<h4>{}</h4>\n<ul class=\"{list_class}\">\n", escape(heading));
    for item in items {
        let _ = writeln!(out, "<li>{}</li>", escape(item));
    }
    out.push_str("</ul>\n");
    out
}

/// `<h4>heading</h4>` followed by a single text block.
pub fn heading_block(heading: &str, block_class: &str, text: &str) -> String {
    format!(
        "<h4>{}</h4>\n<div class=\"{block_class}\">{}</div>\n",
        escape(heading),
        escape(text)
    )
}

/// The "Top Related Videos" sub-block: one link per video, in order.
///
/// Links open in a new browsing context. Videos without a URL are listed as
/// plain text.
pub fn top_videos_block(videos: &[VideoRef]) -> String {
    let mut out = String::from("<div class=\"top-videos-container\">\n<h4>Top Related Videos</h4>\n<ul>\n");
    for video in videos {
        if video.url.is_empty() {
            let _ = writeln!(out, "<li>{}</li>", escape(&video.title));
        } else {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></li>",
                escape(&video.url),
                escape(&video.title)
            );
        }
    }
    out.push_str("</ul>\n</div>\n");
    out
}

/// Neutral notice shown when a lookup produced nothing.
pub fn no_videos_notice() -> String {
    "<div class=\"no-videos\">No related videos found.</div>\n".to_string()
}

/// Error notice carrying the failure's message.
pub fn error_notice(prefix: &str, message: &str) -> String {
    format!("<div class=\"error\">{}: {}</div>\n", escape(prefix), escape(message))
}
