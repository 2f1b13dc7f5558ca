use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::Path,
    sync::{Arc, Mutex},
};

/// Removes ANSI escape sequences so the log file stays plain text.
pub fn strip_ansi_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (_, '\x1b') => in_escape = true,
            (true, c) if c.is_ascii_alphabetic() => in_escape = false,
            (true, _) => {}
            (false, c) => result.push(c),
        }
    }
    result
}

/// Append-only log file that keeps at most `max_lines` lines, trimming the
/// oldest ones once the file overshoots the cap by a tenth.
#[derive(Clone)]
pub struct LineCappedWriter {
    path: String,
    max_lines: u32,
    lines: Arc<Mutex<u32>>,
}

impl LineCappedWriter {
    pub fn new(path: String, max_lines: u32) -> Self {
        let existing = File::open(&path)
            .map(|f| BufReader::new(f).lines().count() as u32)
            .unwrap_or(0);
        Self {
            path,
            max_lines: max_lines.max(1),
            lines: Arc::new(Mutex::new(existing)),
        }
    }

    fn slack(&self) -> u32 {
        (self.max_lines / 10).max(50)
    }

    /// Rewrites the file with its newest `max_lines` lines and returns the new count.
    fn trim(&self) -> io::Result<u32> {
        if !Path::new(&self.path).exists() {
            return Ok(0);
        }

        let lines: Vec<String> = BufReader::new(File::open(&self.path)?)
            .lines()
            .collect::<Result<_, _>>()?;
        let keep = lines.len().min(self.max_lines as usize);

        let mut file = File::create(&self.path)?;
        for line in &lines[lines.len() - keep..] {
            writeln!(file, "{}", line)?;
        }
        Ok(keep as u32)
    }
}

impl io::Write for LineCappedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?
            .write_all(buf)?;

        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        *lines += buf.iter().filter(|&&b| b == b'\n').count() as u32;

        if *lines > self.max_lines + self.slack() {
            match self.trim() {
                Ok(kept) => *lines = kept,
                Err(e) => eprintln!("Failed to trim log file: {}", e),
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LineCappedWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_escapes() {
        assert_eq!(strip_ansi_escapes("\x1b[1mINFO\x1b[0m ready"), "INFO ready");
        assert_eq!(strip_ansi_escapes("plain"), "plain");
    }

    #[test]
    fn test_writer_trims_to_cap() {
        let path = std::env::temp_dir().join(format!(
            "rumblelink-writer-{}.log",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let path_str = path.to_string_lossy().into_owned();

        let mut writer = LineCappedWriter::new(path_str.clone(), 10);
        for i in 0..100 {
            writeln!(writer, "line {}", i).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines.len() <= 10 + 50, "got {} lines", lines.len());
        assert_eq!(*lines.last().unwrap(), "line 99");

        let _ = std::fs::remove_file(&path);
    }
}
