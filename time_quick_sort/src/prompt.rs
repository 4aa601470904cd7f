use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::GroupSpec;

/// Parse `<directory> <size>`. The size is the last whitespace-separated
/// token, so directory names may contain spaces.
pub fn parse_group_line(line: &str) -> Result<GroupSpec, String> {
    let line = line.trim();
    let Some((dir, size)) = line.rsplit_once(char::is_whitespace) else {
        return Err(format!("expected '<directory> <size>', got {:?}", line));
    };
    let dir = dir.trim();
    if size.is_empty() || !size.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("size must be a whole number, got {:?}", size));
    }
    if !Path::new(dir).is_dir() {
        return Err(format!("{} is not a directory", dir));
    }
    Ok(GroupSpec::new(dir, Some(size)))
}

/// Ask for input groups until an empty line, `done`, or end of input.
/// Bad lines are reported and asked again.
pub fn prompt_groups<R: BufRead, W: Write>(input: R, mut out: W) -> io::Result<Vec<GroupSpec>> {
    let mut groups = Vec::new();
    let mut lines = input.lines();

    writeln!(
        out,
        "Enter input directories as '<directory> <size>'. Empty line or 'done' to finish."
    )?;

    loop {
        write!(out, "group {}> ", groups.len() + 1)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.eq_ignore_ascii_case("done") {
            break;
        }

        match parse_group_line(line) {
            Ok(group) => groups.push(group),
            Err(msg) => writeln!(out, "  {}", msg)?,
        }
    }

    Ok(groups)
}
