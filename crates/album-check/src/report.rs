// TestLog - The human-readable text log of a suite run
//
// The log is truncated at the start of every run and receives, in order: a title
// banner, setup lines, one block per test case, and a results footer. Stage
// lines ("# Starting Chrome") are mirrored to the console.

use crate::error::Result;
use crate::verify::{CaseSummary, DateVerdict, KeywordVerdict};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const BANNER_WIDTH: usize = 34;

/// Append-only writer for the test log.
pub struct TestLog {
    out: Box<dyn Write>,
}

impl TestLog {
    /// Creates (or truncates) the log file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    pub fn from_writer(out: impl Write + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Writes the three-line banner around `title`.
    pub fn banner(&mut self, title: &str) -> Result<()> {
        let rule = "-".repeat(BANNER_WIDTH);
        writeln!(self.out, "{} ", rule)?;
        writeln!(self.out, "{} ", title_line(title))?;
        writeln!(self.out, "{} ", rule)?;
        Ok(())
    }

    /// Writes `# {text}` and echoes it to the console.
    pub fn stage(&mut self, text: &str) -> Result<()> {
        println!("# {}", text);
        writeln!(self.out, "# {} ", text)?;
        Ok(())
    }

    /// Writes a plain log entry.
    pub fn entry(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{} ", text)?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }

    /// Opens a test case block with its description.
    pub fn case_header(&mut self, message: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    pub fn date_item(&mut self, verdict: &DateVerdict) -> Result<()> {
        if let Some(mismatch) = &verdict.mismatch {
            tracing::debug!("Image {}: {}", verdict.id, mismatch);
        }
        writeln!(
            self.out,
            "IMAGE_ID: {} DATE: {} {} ",
            verdict.id,
            verdict.date(),
            status(verdict.is_ok())
        )?;
        Ok(())
    }

    pub fn keyword_item(&mut self, verdict: &KeywordVerdict) -> Result<()> {
        if let Some(mismatch) = &verdict.mismatch {
            tracing::debug!("Image {}: {}", verdict.id, mismatch);
        }
        writeln!(
            self.out,
            "IMAGE_ID: {} {} ",
            verdict.id,
            status(verdict.is_ok())
        )?;
        Ok(())
    }

    /// Writes the count check and the error total of a search case.
    pub fn search_summary(&mut self, summary: &CaseSummary) -> Result<()> {
        if summary.count_mismatch.is_some() {
            self.entry(&format!(
                "Expected {} results, got {}",
                summary.expected, summary.found
            ))?;
        }
        if summary.errors == 1 {
            self.entry("Search completed with 1 error")
        } else {
            self.entry(&format!("Search completed with {} errors", summary.errors))
        }
    }

    pub fn login_result(&mut self, message: &str, passed: bool) -> Result<()> {
        let outcome = if passed { "passed" } else { "failed" };
        self.entry(&format!("Test case {}: {}", outcome, message))
    }

    /// Writes the results banner and the final tally.
    pub fn footer(&mut self, failed: usize, total: usize) -> Result<()> {
        self.banner("TEST RESULTS")?;
        write!(
            self.out,
            "# Test completed with {} failed test cases (out of {})",
            failed, total
        )?;
        self.flush()
    }

    /// Marks a run that stopped during setup.
    pub fn aborted(&mut self) -> Result<()> {
        println!("# Test aborted");
        write!(self.out, "\n# Test aborted")?;
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "OK" } else { "ERROR" }
}

/// Centers `title` in the rule. An odd remainder becomes a second space before
/// the title, so both dash runs stay the same length.
fn title_line(title: &str) -> String {
    let label = format!(" {} ", title);
    let fill = BANNER_WIDTH.saturating_sub(label.chars().count());
    let dashes = "-".repeat(fill / 2);
    let pad = if fill % 2 == 1 { " " } else { "" };
    format!("{}{}{}{}", dashes, pad, label, dashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::Mismatch;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture() -> (TestLog, SharedBuf) {
        let buf = SharedBuf::default();
        (TestLog::from_writer(buf.clone()), buf)
    }

    #[test]
    fn test_banner_layout() {
        assert_eq!(title_line("LOGIN TEST"), "----------- LOGIN TEST -----------");
        assert_eq!(
            title_line("DATE SEARCH TEST"),
            "-------- DATE SEARCH TEST --------"
        );
        assert_eq!(
            title_line("KEYWORD SEARCH TEST"),
            "------  KEYWORD SEARCH TEST ------"
        );
        assert_eq!(title_line("KEYWORD SEARCH TEST").len(), BANNER_WIDTH);
        assert_eq!(title_line("TEST RESULTS").len(), BANNER_WIDTH);

        let (mut log, buf) = capture();
        log.banner("LOGIN TEST").unwrap();
        let text = buf.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "---------------------------------- ");
        assert_eq!(lines[1], "----------- LOGIN TEST ----------- ");
    }

    #[test]
    fn test_item_lines() {
        let (mut log, buf) = capture();
        log.date_item(&DateVerdict {
            id: "3".to_string(),
            timestamp: Some("2018-06-03T12:00:00Z".to_string()),
            mismatch: None,
        })
        .unwrap();
        log.date_item(&DateVerdict {
            id: "99".to_string(),
            timestamp: None,
            mismatch: Some(Mismatch::UnknownImage),
        })
        .unwrap();
        log.keyword_item(&KeywordVerdict {
            id: "9".to_string(),
            mismatch: Some(Mismatch::NoKeywordMatch),
        })
        .unwrap();

        assert_eq!(
            buf.text(),
            "IMAGE_ID: 3 DATE: 2018-06-03T12:00:00Z OK \n\
             IMAGE_ID: 99 DATE: No image with given ID ERROR \n\
             IMAGE_ID: 9 ERROR \n"
        );
    }

    #[test]
    fn test_search_summary() {
        let (mut log, buf) = capture();
        log.search_summary(&CaseSummary {
            expected: 3,
            found: 2,
            errors: 1,
            count_mismatch: Some(Mismatch::Count {
                expected: 3,
                found: 2,
            }),
        })
        .unwrap();
        log.search_summary(&CaseSummary {
            expected: 2,
            found: 2,
            errors: 0,
            count_mismatch: None,
        })
        .unwrap();

        assert_eq!(
            buf.text(),
            "Expected 3 results, got 2 \n\
             Search completed with 1 error \n\
             Search completed with 0 errors \n"
        );
    }

    #[test]
    fn test_footer_and_abort() {
        let (mut log, buf) = capture();
        log.login_result("valid credentials", true).unwrap();
        log.footer(1, 4).unwrap();
        let text = buf.text();
        assert!(text.starts_with("Test case passed: valid credentials \n"));
        assert!(text.ends_with("# Test completed with 1 failed test cases (out of 4)"));

        let (mut log, buf) = capture();
        log.aborted().unwrap();
        assert_eq!(buf.text(), "\n# Test aborted");
    }

    #[test]
    fn test_stage_line_written_once() {
        let (mut log, buf) = capture();
        log.stage("Starting Chrome").unwrap();
        log.entry("Added 4 test cases").unwrap();
        assert_eq!(buf.text(), "# Starting Chrome \nAdded 4 test cases \n");
    }
}
