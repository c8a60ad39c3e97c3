use std::sync::OnceLock;

use regex::{Captures, Regex};

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern is valid"))
}

fn inline_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"))
}

fn bold_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"))
}

fn italic_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+?)\*").expect("italic pattern is valid"))
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid"))
}

/// Render guide markup to HTML.
///
/// Supported: `#`/`##`/`###` headers, `**bold**`, `*italic*`, fenced and
/// inline code, `[text](href)` links, and line breaks. Everything else is
/// escaped text. Fenced blocks are emitted verbatim inside `<pre><code>`.
pub fn render_guide(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }

    let mut html = String::with_capacity(markup.len() + markup.len() / 2);
    let mut last = 0;

    for fence in fence_regex().captures_iter(markup) {
        let (Some(whole), Some(body)) = (fence.get(0), fence.get(1)) else {
            continue;
        };
        html.push_str(&render_prose(&markup[last..whole.start()]));
        html.push_str(&render_fence(body.as_str()));
        last = whole.end();
    }
    html.push_str(&render_prose(&markup[last..]));

    html
}

fn render_fence(body: &str) -> String {
    // An optional language word may sit on the opening fence line.
    let (language, code) = match body.split_once('\n') {
        Some((first, rest)) if !first.contains(char::is_whitespace) => (first, rest),
        _ => ("", body),
    };
    let code = code.strip_suffix('\n').unwrap_or(code);
    let code = html_escape::encode_text(code);

    if language.is_empty() {
        format!("<pre><code>{code}</code></pre>")
    } else {
        let language = html_escape::encode_double_quoted_attribute(language);
        format!("<pre><code class=\"language-{language}\">{code}</code></pre>")
    }
}

fn render_prose(text: &str) -> String {
    text.split('\n')
        .map(render_line)
        .collect::<Vec<_>>()
        .join("<br/>")
}

fn render_line(line: &str) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);

    for (marker, tag) in [("### ", "h3"), ("## ", "h2"), ("# ", "h1")] {
        if let Some(rest) = line.strip_prefix(marker) {
            return format!("<{tag}>{}</{tag}>", render_inline(rest));
        }
    }

    render_inline(line)
}

// Code spans and link targets are set aside before emphasis runs so that
// `*` inside them is never treated as markup, then restored at the end.
fn render_inline(text: &str) -> String {
    let mut stash = Stash::default();

    let mut protected = String::with_capacity(text.len());
    let mut last = 0;
    for span in inline_code_regex().captures_iter(text) {
        let (Some(whole), Some(code)) = (span.get(0), span.get(1)) else {
            continue;
        };
        protected.push_str(&text[last..whole.start()]);
        let code = html_escape::encode_text(code.as_str()).into_owned();
        protected.push_str(&stash.code(code));
        last = whole.end();
    }
    protected.push_str(&text[last..]);

    let escaped = html_escape::encode_text(&protected);
    let linked = link_regex().replace_all(&escaped, |caps: &Captures| {
        let href = stash.literal(&caps[2]).replace('"', "&quot;");
        if is_safe_href(&href) {
            let href = stash.verbatim(href);
            format!("<a href=\"{href}\" target=\"_blank\">{}</a>", &caps[1])
        } else {
            caps[1].to_string()
        }
    });
    let bold = bold_regex().replace_all(&linked, "<strong>$1</strong>");
    let italic = italic_regex().replace_all(&bold, "<em>$1</em>");

    stash.restore(&italic)
}

const STASH_OPEN: char = '\u{E000}';
const STASH_CLOSE: char = '\u{E001}';

fn stash_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("\u{E000}([0-9]+)\u{E001}").expect("stash pattern is valid"))
}

/// Fragments held out of the formatting passes, keyed by private-use markers.
#[derive(Default)]
struct Stash {
    entries: Vec<Entry>,
}

enum Entry {
    Code(String),
    Verbatim(String),
}

impl Stash {
    fn push(&mut self, entry: Entry) -> String {
        self.entries.push(entry);
        format!("{STASH_OPEN}{}{STASH_CLOSE}", self.entries.len() - 1)
    }

    fn code(&mut self, escaped: String) -> String {
        self.push(Entry::Code(escaped))
    }

    fn verbatim(&mut self, html: String) -> String {
        self.push(Entry::Verbatim(html))
    }

    /// Resolve markers to plain escaped text, for use inside attributes.
    fn literal(&self, text: &str) -> String {
        stash_regex()
            .replace_all(text, |caps: &Captures| match self.lookup(&caps[1]) {
                Some(Entry::Code(code)) | Some(Entry::Verbatim(code)) => code.clone(),
                None => String::new(),
            })
            .into_owned()
    }

    fn restore(&self, text: &str) -> String {
        stash_regex()
            .replace_all(text, |caps: &Captures| match self.lookup(&caps[1]) {
                Some(Entry::Code(code)) => format!("<code>{code}</code>"),
                Some(Entry::Verbatim(html)) => html.clone(),
                None => String::new(),
            })
            .into_owned()
    }

    fn lookup(&self, index: &str) -> Option<&Entry> {
        index.parse::<usize>().ok().and_then(|i| self.entries.get(i))
    }
}

/// Absolute http(s) and mailto links, or relative references without a scheme.
fn is_safe_href(href: &str) -> bool {
    let lower = href.trim().to_lowercase();
    if ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return true;
    }
    // A scheme is anything before a `:` that precedes the first path, query or fragment delimiter.
    match lower.find([':', '/', '?', '#']) {
        Some(i) => lower.as_bytes()[i] != b':',
        None => true,
    }
}
