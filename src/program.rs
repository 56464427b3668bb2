use std::fs;
use std::path::Path;

/// A line of a program listing that is not a 32-bit hex word.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: `{text}` is not a 32-bit hex word")]
pub struct ParseProgramError {
    pub line: usize,
    pub text: String,
}

/// Parses one hex instruction word per line. `#` starts a comment, blank
/// lines are skipped and an `0x` prefix is optional.
pub fn parse(source: &str) -> Result<Vec<u32>, ParseProgramError> {
    let mut words = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let text = line.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text)
            .replace('_', "");

        let word = u32::from_str_radix(&digits, 16).map_err(|_| ParseProgramError {
            line: index + 1,
            text: text.to_owned(),
        })?;
        words.push(word);
    }

    Ok(words)
}

pub fn read(path: &Path) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    Ok(parse(&source)?)
}
