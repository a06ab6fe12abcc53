use casedoc::to_portal_text;

#[test]
fn strips_markdown_decoration() {
    let md = "# Executive Summary\nRequesting **Drug X** for _MDD_.\n\n## Details\n- Dose: `84 mg`\n* Frequency: __weekly__\n+ Duration: *4 weeks*";
    assert_eq!(
        to_portal_text(md),
        "Executive Summary\nRequesting Drug X for MDD.\n\nDetails\n- Dose: 84 mg\n- Frequency: weekly\n- Duration: 4 weeks"
    );
}

#[test]
fn links_keep_their_target() {
    assert_eq!(
        to_portal_text("See [the trial](https://example.org/t1) and [^1]."),
        "See the trial (https://example.org/t1) and [^1]."
    );
}

#[test]
fn code_fences_keep_content() {
    let md = "Before\n```text\nPHQ-9 22\n```\nAfter";
    assert_eq!(to_portal_text(md), "Before\ntext\nPHQ-9 22\nAfter");
}

#[test]
fn fence_inner_whitespace_is_trimmed() {
    let md = "```\n  keep  this  \n```";
    assert_eq!(to_portal_text(md), "keep  this");
}

#[test]
fn images_vanish() {
    assert_eq!(to_portal_text("![scan](img.png)\nText ![](x.png)"), "Text");
}

#[test]
fn blank_runs_and_trailing_spaces() {
    let md = "\n\nLine one   \n\n\n\n\nLine two\t\n\n\n";
    assert_eq!(to_portal_text(md), "Line one\n\nLine two");
}

#[test]
fn crlf_input() {
    assert_eq!(to_portal_text("# A\r\n\r\n\r\n\r\nB\r\n"), "A\n\nB");
}

#[test]
fn citation_footnotes_degrade_readably() {
    let md = "[^1]: [Trial — Journal (2021)](#/evidence?caseId=c1&evidenceId=e1)\n\n> Snippet";
    assert_eq!(
        to_portal_text(md),
        "[^1]: Trial — Journal (2021) (#/evidence?caseId=c1&evidenceId=e1)\n\n> Snippet"
    );
}
