use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Same,
    Add,
    #[serde(rename = "del")]
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOp {
    #[serde(rename = "type")]
    pub tag: DiffTag,
    pub text: String,
}

impl DiffOp {
    fn new(tag: DiffTag, text: &str) -> Self {
        Self { tag, text: text.to_string() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub same: usize,
    pub added: usize,
    pub deleted: usize,
}

impl DiffSummary {
    pub fn of(ops: &[DiffOp]) -> Self {
        let mut s = DiffSummary::default();
        for op in ops {
            match op.tag {
                DiffTag::Same => s.same += 1,
                DiffTag::Add => s.added += 1,
                DiffTag::Delete => s.deleted += 1,
            }
        }
        s
    }

    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.deleted == 0
    }
}

fn normalise(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Line-level LCS diff, ops in top-to-bottom order.
///
/// The table holds LCS lengths of line suffixes and is walked from the first
/// lines forward. On a mismatch where skipping the old line keeps at least as
/// long a common subsequence, the old line is emitted as `Delete`; so a replaced
/// line always reads delete-then-add.
pub fn diff_lines(old_text: &str, new_text: &str) -> Vec<DiffOp> {
    let (old_norm, new_norm) = (normalise(old_text), normalise(new_text));
    let a: Vec<&str> = old_norm.split('\n').collect();
    let b: Vec<&str> = new_norm.split('\n').collect();
    let (n, m) = (a.len(), b.len());

    let width = m + 1;
    let at = |i: usize, j: usize| i * width + j;
    let mut dp = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[at(i, j)] = if a[i] == b[j] {
                dp[at(i + 1, j + 1)] + 1
            } else {
                dp[at(i + 1, j)].max(dp[at(i, j + 1)])
            };
        }
    }

    let mut ops = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            ops.push(DiffOp::new(DiffTag::Same, a[i]));
            i += 1;
            j += 1;
        } else if dp[at(i + 1, j)] >= dp[at(i, j + 1)] {
            ops.push(DiffOp::new(DiffTag::Delete, a[i]));
            i += 1;
        } else {
            ops.push(DiffOp::new(DiffTag::Add, b[j]));
            j += 1;
        }
    }
    ops.extend(a[i..].iter().map(|l| DiffOp::new(DiffTag::Delete, l)));
    ops.extend(b[j..].iter().map(|l| DiffOp::new(DiffTag::Add, l)));
    ops
}

/// Unified-style rendering: two-character prefix per line.
pub fn format_diff(ops: &[DiffOp]) -> String {
    ops.iter()
        .map(|op| {
            let prefix = match op.tag {
                DiffTag::Same => "  ",
                DiffTag::Add => "+ ",
                DiffTag::Delete => "- ",
            };
            format!("{}{}", prefix, op.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_is_normalised() {
        let ops = diff_lines("a\r\nb", "a\nb");
        assert!(ops.iter().all(|o| o.tag == DiffTag::Same));
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn summary_counts() {
        let ops = diff_lines("a\nb\nc", "a\nx\nc\nd");
        let s = DiffSummary::of(&ops);
        assert_eq!(s, DiffSummary { same: 2, added: 2, deleted: 1 });
        assert!(!s.is_unchanged());
    }

    #[test]
    fn format_prefixes() {
        let ops = diff_lines("a\nb", "a\nc");
        assert_eq!(format_diff(&ops), "  a\n- b\n+ c");
    }
}
