use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence regex"));
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("image regex"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link regex"));
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+").expect("heading regex"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*[*+][ \t]+").expect("bullet regex"));
static BOLD_STAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold regex"));
static BOLD_UNDERSCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.*?)__").expect("bold regex"));
static ITALIC_STAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("italic regex"));
static ITALIC_UNDERSCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.*?)_").expect("italic regex"));
static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("inline code regex"));
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

/// Degrade Markdown to plain text for pasting into payer portals.
///
/// Fenced code loses its fences but keeps its content, links become
/// `text (url)`, images disappear, heading hashes and emphasis markers are
/// dropped, `*`/`+` bullets become `-`, and blank-line runs collapse to one.
pub fn to_portal_text(md: &str) -> String {
    let s = md.replace("\r\n", "\n");

    let out = CODE_FENCE_RE.replace_all(&s, |c: &regex::Captures| c[1].trim().to_string());
    // Images first, otherwise the link rule would swallow `![alt](src)`.
    let out = IMAGE_RE.replace_all(&out, "");
    let out = LINK_RE.replace_all(&out, "$1 ($2)");
    let out = HEADING_RE.replace_all(&out, "");
    // Bullets before emphasis so a leading `* ` is never read as an italic opener.
    let out = BULLET_RE.replace_all(&out, "- ");
    let out = BOLD_STAR_RE.replace_all(&out, "$1");
    let out = BOLD_UNDERSCORE_RE.replace_all(&out, "$1");
    let out = ITALIC_STAR_RE.replace_all(&out, "$1");
    let out = ITALIC_UNDERSCORE_RE.replace_all(&out, "$1");
    let out = INLINE_CODE_RE.replace_all(&out, "$1");

    let trimmed = out
        .split('\n')
        .map(|l| l.trim_end_matches(&[' ', '\t'][..]))
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_RUN_RE.replace_all(&trimmed, "\n\n").trim().to_string()
}
