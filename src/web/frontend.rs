//! Page shell for the tubeseo web dashboard.
//!
//! Pages are rendered on the server; the shell only carries the stylesheet.
//! No external assets, no build tools, no CDN dependencies.

use crate::render::html::escape;

const STYLE: &str = r##"
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --red: #f85149;
  --purple: #bc8cff;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; line-height: 1.5; }
.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header { display: flex; align-items: center; justify-content: space-between;
  margin-bottom: 24px; padding-bottom: 16px; border-bottom: 1px solid var(--border); }
header h1 { font-size: 24px; font-weight: 600; }
header a { color: var(--accent); text-decoration: none; margin-left: 16px; }

.card { background: var(--surface); border: 1px solid var(--border);
  border-radius: var(--radius); padding: 20px; margin-bottom: 16px; }
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }
h4 { font-size: 14px; font-weight: 600; margin: 12px 0 8px; color: var(--text-muted); }

form { display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-end; }
label { display: flex; flex-direction: column; gap: 4px; color: var(--text-muted); font-size: 12px; }
input, select { background: var(--bg); color: var(--text); border: 1px solid var(--border);
  border-radius: 6px; padding: 6px 10px; font-size: 13px; }
button { background: var(--accent); color: #fff; border: none; border-radius: 6px;
  padding: 8px 16px; font-weight: 500; cursor: pointer; }

ul { padding-left: 20px; }
a { color: var(--accent); }
.error { color: var(--red); padding: 8px 0; }
.no-videos { color: var(--text-muted); padding: 8px 0; }
.seo-score { font-size: 28px; font-weight: 700; color: var(--green); }

table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border); }
th a { color: var(--text); text-decoration: none; }
td.num, th.num { text-align: right; }

.bar-row { display: grid; grid-template-columns: 180px 1fr 80px; gap: 8px; align-items: center; margin: 2px 0; }
.bar-label { color: var(--text-muted); overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.bar { height: 12px; background: var(--purple); border-radius: 3px; }
.bar.s1 { background: var(--accent); }
.bar-value { text-align: right; font-variant-numeric: tabular-nums; }
"##;

/// Wrap a rendered body in the full HTML document.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="app">
<header>
<h1>tubeseo</h1>
<nav><a href="/">Search</a><a href="/dashboard">Analytics</a></nav>
</header>
{body}
</div>
</body>
</html>
"#,
        title = escape(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_escapes_title_and_keeps_body() {
        let html = page("a<b", "<p>body</p>");
        assert!(html.contains("<title>a&lt;b</title>"));
        assert!(html.contains("<p>body</p>"));
    }
}
