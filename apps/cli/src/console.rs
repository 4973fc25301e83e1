//! Terminal input and output helpers.

use std::io::Write;

use stockroom_billing::{Notice, NoticeLevel, Notifier};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented stdin shared by prompts and the bill loop.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn new() -> Self {
        Console {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `label` and reads one trimmed line; `None` at end of input.
    pub async fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}

/// Prints notices as tagged lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error | NoticeLevel::Warning => eprintln!("{}", format_notice(&notice)),
            NoticeLevel::Success | NoticeLevel::Info => println!("{}", format_notice(&notice)),
        }
    }
}

pub fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "--",
        NoticeLevel::Warning => "!!",
        NoticeLevel::Error => "xx",
    };
    format!("[{tag}] {}", notice.message)
}

/// Fixed-width text table; columns sized to their widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

/// "page 2 of 5 (23 rows)".
pub fn page_footer(number: usize, total_pages: usize, total_rows: usize) -> String {
    format!("page {number} of {total_pages} ({total_rows} rows)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(
            &["Name", "Qty"],
            &[
                vec!["Blue Pen".into(), "10".into()],
                vec!["Ink".into(), "4".into()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Name      Qty");
        assert_eq!(lines[1], "--------  ---");
        assert_eq!(lines[2], "Blue Pen  10");
        assert_eq!(lines[3], "Ink       4");
    }

    #[test]
    fn test_format_notice() {
        assert_eq!(
            format_notice(&Notice::success("Bill finalized and inventory updated")),
            "[ok] Bill finalized and inventory updated"
        );
        assert_eq!(format_notice(&Notice::error("boom")), "[xx] boom");
    }
}
