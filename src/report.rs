use std::path::Path;

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthChar;

use crate::{
    error::AppError,
    git::IncludeStatus,
    setup::{ClipboardOutcome, SetupSummary},
    workspace::DirectoryStatus,
};

/// Total width of the box contents, padding included
const BOX_WIDTH: usize = 80;
/// Horizontal padding on each side of the contents
const PADDING: usize = 2;

/// Color of a piece of summary text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Good,
    Warn,
    Info,
    Key,
    KeyText,
    Path,
    Error,
}

impl Tone {
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Tone::Plain => text.normal(),
            Tone::Good => text.truecolor(0x04, 0xB5, 0x75),
            Tone::Warn => text.truecolor(0xFF, 0xA5, 0x00),
            Tone::Info => text.truecolor(0x00, 0xBF, 0xFF),
            Tone::Key => text.truecolor(0x00, 0xFF, 0xFF),
            Tone::KeyText => text.truecolor(0xE5, 0xE5, 0xE5),
            Tone::Path => text.italic(),
            Tone::Error => text.truecolor(0xFF, 0x00, 0x00),
        }
    }
}

/// One line of the summary, made of differently colored segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line(Vec<(Tone, String)>);

impl Line {
    fn blank() -> Self {
        Self::default()
    }

    fn text(tone: Tone, text: impl Into<String>) -> Self {
        Self(vec![(tone, text.into())])
    }

    fn labelled(tone: Tone, label: &str, path: &Path) -> Self {
        Self(vec![
            (tone, label.to_string()),
            (Tone::Plain, " ".to_string()),
            (Tone::Path, path.display().to_string()),
        ])
    }

    fn with(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.0.push((tone, text.into()));
        self
    }

    /// Text of the line without any styling
    pub fn plain(&self) -> String {
        self.0.iter().map(|(_, text)| text.as_str()).collect()
    }

    /// Renders the characters `start..end` of the line with their colors
    fn paint_range(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        let mut offset = 0;
        for (tone, text) in &self.0 {
            let len = text.chars().count();
            let from = start.max(offset);
            let to = end.min(offset + len);
            if from < to {
                let piece: String = text.chars().skip(from - offset).take(to - from).collect();
                out.push_str(&tone.paint(&piece).to_string());
            }
            offset += len;
        }
        out
    }
}

/// Builds the summary messages shown after a successful setup
pub fn summary_lines(summary: &SetupSummary) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(match summary.directory_status {
        DirectoryStatus::Existing => Line::labelled(Tone::Info, "Directory already exists:", &summary.directory),
        DirectoryStatus::Created => Line::labelled(Tone::Info, "Created directory:", &summary.directory),
    });
    lines.push(Line::labelled(Tone::Key, "Generated SSH key:", &summary.keys.private_key));
    lines.push(Line::labelled(Tone::Warn, "Created/Updated local .gitconfig:", &summary.local_config));
    let global_label = if summary.global_config.created {
        "Created global .gitconfig:"
    } else {
        "Updated global .gitconfig:"
    };
    let global = Line::labelled(Tone::Warn, global_label, &summary.global_config.path);
    lines.push(match summary.global_config.include {
        IncludeStatus::Added => global,
        IncludeStatus::AlreadyPresent => global.with(Tone::Plain, " (include already present)"),
    });

    lines.push(Line::blank());
    lines.push(Line::text(Tone::Good, "Setup completed successfully!"));
    lines.push(Line::blank());
    lines.push(Line::text(Tone::Key, "Your SSH Public Key:"));
    lines.push(Line::text(Tone::KeyText, summary.public_key.trim()));

    match &summary.clipboard {
        ClipboardOutcome::Copied => {
            lines.push(Line::blank());
            lines.push(Line::text(Tone::Good, "Public key copied to clipboard"));
        }
        ClipboardOutcome::Failed { error } => {
            lines.push(Line::text(
                Tone::Warn,
                format!("Could not copy public key to clipboard: {}", error),
            ));
        }
        ClipboardOutcome::Skipped => {}
    }

    let key_usage = if summary.sign_commits {
        "as both an Authentication key AND a Signing key"
    } else {
        "as an Authentication key"
    };
    let instruction_prefix = if summary.clipboard == ClipboardOutcome::Copied {
        "Please add the copied key"
    } else {
        "Please add this key"
    };

    lines.push(Line::blank());
    lines.push(Line::text(
        Tone::Warn,
        format!(
            "{} to your Git provider (GitHub, GitLab, etc.) {}.",
            instruction_prefix, key_usage
        ),
    ));
    lines.push(Line::text(
        Tone::Warn,
        "Find this under SSH and GPG keys (or similar) in your account settings.",
    ));
    lines
}

/// Renders `lines` inside a rounded, padded border
pub fn render_box(lines: &[Line]) -> String {
    let inner: usize = BOX_WIDTH - 2 * PADDING;
    let border = |s: &str| Tone::Good.paint(s).to_string();
    let pad = " ".repeat(PADDING);

    let mut rows: Vec<String> = Vec::new();
    rows.push(format!("{}{}{}", border("╭"), border(&"─".repeat(BOX_WIDTH)), border("╮")));
    let empty_row = format!("{}{}{}", border("│"), " ".repeat(BOX_WIDTH), border("│"));
    rows.push(empty_row.clone());
    for line in lines {
        let plain: String = line.plain();
        for (start, end) in wrap_ranges(&plain, inner) {
            let shown: usize = plain.chars().skip(start).take(end - start).map(char_width).sum();
            let fill = " ".repeat(inner.saturating_sub(shown));
            rows.push(format!(
                "{}{}{}{}{}{}",
                border("│"),
                pad,
                line.paint_range(start, end),
                fill,
                pad,
                border("│")
            ));
        }
    }
    rows.push(empty_row);
    rows.push(format!("{}{}{}", border("╰"), border(&"─".repeat(BOX_WIDTH)), border("╯")));
    rows.join("\n")
}

/// Summary as pretty JSON, for `--json`
pub fn summary_json(summary: &SetupSummary) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Prints the summary box surrounded by blank lines
pub fn print_summary(summary: &SetupSummary) {
    println!();
    println!("{}", render_box(&summary_lines(summary)));
    println!();
}

/// Terminal columns taken by `c`
fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Splits `text` into character ranges at most `width` columns wide, breaking
/// at spaces where possible and hard-splitting words longer than a line
fn wrap_ranges(text: &str, width: usize) -> Vec<(usize, usize)> {
    let chars: Vec<char> = text.chars().collect();
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        if !ranges.is_empty() {
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
            if start == chars.len() {
                break;
            }
        }

        let mut end = start;
        let mut used = 0;
        while end < chars.len() && used + char_width(chars[end]) <= width {
            used += char_width(chars[end]);
            end += 1;
        }
        if end == chars.len() {
            ranges.push((start, end));
            break;
        }
        if end == start {
            end = start + 1;
        } else if chars[end] != ' ' {
            if let Some(space) = (start + 1..end).rev().find(|&i| chars[i] == ' ') {
                end = space;
            }
        }
        ranges.push((start, end));
        start = end;
    }

    if ranges.is_empty() {
        ranges.push((0, 0));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{git::GlobalUpdate, identity::KeyType, keygen::KeyPair};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn summary() -> SetupSummary {
        SetupSummary {
            directory: PathBuf::from("/home/u/work"),
            directory_status: DirectoryStatus::Created,
            key_type: KeyType::Ed25519,
            keys: KeyPair::in_dir(&PathBuf::from("/home/u/.ssh"), "work-1"),
            public_key: "ssh-ed25519 AAAAC3Nza work-1".to_string(),
            local_config: PathBuf::from("/home/u/work/.gitconfig"),
            global_config: GlobalUpdate {
                path: PathBuf::from("/home/u/.gitconfig"),
                created: false,
                include: IncludeStatus::Added,
            },
            sign_commits: false,
            clipboard: ClipboardOutcome::Copied,
        }
    }

    fn plain(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::plain).collect()
    }

    #[test]
    fn summary_after_copy() {
        assert_eq!(
            plain(&summary_lines(&summary())),
            vec![
                "Created directory: /home/u/work",
                "Generated SSH key: /home/u/.ssh/work-1",
                "Created/Updated local .gitconfig: /home/u/work/.gitconfig",
                "Updated global .gitconfig: /home/u/.gitconfig",
                "",
                "Setup completed successfully!",
                "",
                "Your SSH Public Key:",
                "ssh-ed25519 AAAAC3Nza work-1",
                "",
                "Public key copied to clipboard",
                "",
                "Please add the copied key to your Git provider (GitHub, GitLab, etc.) as an Authentication key.",
                "Find this under SSH and GPG keys (or similar) in your account settings.",
            ]
        );
    }

    #[test]
    fn summary_after_failed_copy_with_signing() {
        let mut summary = summary();
        summary.directory_status = DirectoryStatus::Existing;
        summary.global_config.include = IncludeStatus::AlreadyPresent;
        summary.sign_commits = true;
        summary.clipboard = ClipboardOutcome::Failed {
            error: "no clipboard program found".to_string(),
        };

        let lines = plain(&summary_lines(&summary));
        assert_eq!(lines[0], "Directory already exists: /home/u/work");
        assert_eq!(lines[3], "Updated global .gitconfig: /home/u/.gitconfig (include already present)");
        assert_eq!(lines[9], "Could not copy public key to clipboard: no clipboard program found");
        assert_eq!(
            lines[11],
            "Please add this key to your Git provider (GitHub, GitLab, etc.) as both an Authentication key AND a Signing key."
        );
    }

    #[test]
    fn summary_with_clipboard_skipped() {
        let mut summary = summary();
        summary.clipboard = ClipboardOutcome::Skipped;

        let lines = plain(&summary_lines(&summary));
        assert!(!lines.iter().any(|line| line.contains("clipboard")));
        assert_eq!(
            &lines[8..],
            &[
                "ssh-ed25519 AAAAC3Nza work-1",
                "",
                "Please add this key to your Git provider (GitHub, GitLab, etc.) as an Authentication key.",
                "Find this under SSH and GPG keys (or similar) in your account settings.",
            ]
        );
    }

    #[test]
    fn json_summary_fields() {
        let json: serde_json::Value = serde_json::from_str(&summary_json(&summary()).unwrap()).unwrap();
        assert_eq!(json["directory"], "/home/u/work");
        assert_eq!(json["directory_status"], "created");
        assert_eq!(json["key_type"], "ed25519");
        assert_eq!(json["keys"]["private_key"], "/home/u/.ssh/work-1");
        assert_eq!(json["keys"]["public_key"], "/home/u/.ssh/work-1.pub");
        assert_eq!(json["global_config"]["include"], "added");
        assert_eq!(json["global_config"]["created"], false);
        assert_eq!(json["clipboard"]["status"], "copied");
        assert_eq!(json["sign_commits"], false);

        let mut failed = summary();
        failed.clipboard = ClipboardOutcome::Failed {
            error: "xclip exited with 1".to_string(),
        };
        let json: serde_json::Value = serde_json::from_str(&summary_json(&failed).unwrap()).unwrap();
        assert_eq!(json["clipboard"]["status"], "failed");
        assert_eq!(json["clipboard"]["error"], "xclip exited with 1");
    }

    #[test]
    fn new_global_config_is_reported_as_created() {
        let mut summary = summary();
        summary.global_config.created = true;
        assert_eq!(
            summary_lines(&summary)[3].plain(),
            "Created global .gitconfig: /home/u/.gitconfig"
        );
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(wrap_ranges("aaa bbb ccc", 7), vec![(0, 7), (8, 11)]);
        assert_eq!(wrap_ranges("abcdefghij", 4), vec![(0, 4), (4, 8), (8, 10)]);
        assert_eq!(wrap_ranges("", 10), vec![(0, 0)]);
        assert_eq!(wrap_ranges("short", 10), vec![(0, 5)]);
    }

    #[test]
    fn box_rows_have_constant_width() {
        colored::control::set_override(false);
        let rendered = render_box(&summary_lines(&summary()));
        let rows: Vec<&str> = rendered.lines().collect();

        assert_eq!(rows[0], format!("╭{}╮", "─".repeat(80)));
        assert_eq!(rows[1], format!("│{}│", " ".repeat(80)));
        assert_eq!(rows[2], format!("│  {:<76}  │", "Created directory: /home/u/work"));
        assert!(rows.iter().all(|row| row.chars().count() == 82));
        // the provider instruction is longer than one row
        assert!(rows.iter().any(|row| row.contains("(GitHub, GitLab, etc.) as an ")));
        assert!(rows.iter().any(|row| row.starts_with("│  Authentication key. ")));
        assert_eq!(rows.last().copied(), Some(format!("╰{}╯", "─".repeat(80)).as_str()));
    }

    #[test]
    fn wide_characters_count_two_columns() {
        assert_eq!(wrap_ranges("工作工作", 4), vec![(0, 2), (2, 4)]);
        assert_eq!(wrap_ranges("a工", 2), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn box_rows_align_with_wide_characters() {
        use unicode_width::UnicodeWidthStr;

        colored::control::set_override(false);
        let mut summary = summary();
        summary.directory = PathBuf::from("/home/u/工作");
        summary.local_config = PathBuf::from(format!("/home/u/{}/.gitconfig", "工作".repeat(30)));
        let rendered = render_box(&summary_lines(&summary));

        assert!(rendered.contains("/home/u/工作"));
        assert!(rendered.lines().all(|row| UnicodeWidthStr::width(row) == 82));
    }

    #[test]
    fn painted_range_keeps_segment_boundaries() {
        colored::control::set_override(false);
        let line = Line::labelled(Tone::Info, "Created directory:", Path::new("/w"));
        assert_eq!(line.paint_range(8, 21), "directory: /w");
    }
}
