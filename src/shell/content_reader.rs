use std::io::BufRead;

use tracing::debug;

/// Collects file content typed after `create` until a line containing `terminator`.
///
/// Lines before the terminating one keep their line break. On the
/// terminating line only the text in front of the terminator is kept,
/// without a line break. End of input finishes the content as well.
pub fn read_content<R: BufRead>(input: &mut R, terminator: char) -> std::io::Result<String> {
    let mut content = String::new();

    loop {
        let Some(line) = read_line_lossy(input)? else {
            debug!("Input ended before the content terminator");
            break;
        };

        if let Some((before, _)) = line.split_once(terminator) {
            content.push_str(before);
            break;
        }
        content.push_str(&line);
        content.push('\n');
    }

    Ok(content)
}

/// Next input line without its line break, `None` at end of input.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the read.
pub fn read_line_lossy<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut bytes = Vec::new();
    if input.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&bytes);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}
