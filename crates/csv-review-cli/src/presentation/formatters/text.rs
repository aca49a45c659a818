const TAB_SIZE: usize = 8;

/// Wrap every line of `text` to `width` columns.
///
/// Lines end at `\n`, `\r\n`, a lone `\r` and the other Unicode line breaks.
/// Each line is filled greedily; tabs expand to 8-column stops, spacing
/// between words on the same output line is kept as written, and the spaces
/// where a line breaks are dropped. Blank lines are kept. Words longer than
/// the width are split across lines.
pub fn wrap(text: &str, width: usize) -> String {
    split_lines(text)
        .into_iter()
        .map(|line| fill(&expand_tabs(line), width.max(1)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split on line breaks; a trailing break does not start an extra line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(is_line_break) {
        lines.push(&rest[..pos]);
        let tail = &rest[pos..];
        let skip = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[skip..];
    }

    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

fn expand_tabs(line: &str) -> String {
    let mut expanded = String::with_capacity(line.len());
    let mut column = 0;

    for c in line.chars() {
        if c == '\t' {
            let spaces = TAB_SIZE - column % TAB_SIZE;
            expanded.extend(std::iter::repeat_n(' ', spaces));
            column += spaces;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded
}

fn is_space(chunk: &str) -> bool {
    chunk.starts_with(' ')
}

/// Alternating runs of spaces and of everything else.
fn chunks(line: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (i, c) in line.char_indices() {
        let space = c == ' ';
        if in_space.is_some_and(|prev| prev != space) {
            chunks.push(&line[start..i]);
            start = i;
        }
        in_space = Some(space);
    }

    if start < line.len() {
        chunks.push(&line[start..]);
    }
    chunks
}

fn fill(line: &str, width: usize) -> String {
    // Reversed so the next chunk is at the end
    let mut pending = chunks(line);
    pending.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !pending.is_empty() {
        if !lines.is_empty() && pending.last().is_some_and(|chunk| is_space(chunk)) {
            pending.pop();
        }

        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0;
        while let Some(&chunk) = pending.last() {
            let len = chunk.chars().count();
            if current_len + len > width {
                break;
            }
            current.push(chunk);
            current_len += len;
            pending.pop();
        }

        // Chunk wider than a whole line: fill what is left of this one
        if let Some(chunk) = pending.last_mut()
            && chunk.chars().count() > width
        {
            let word = *chunk;
            let room = width.saturating_sub(current_len).max(1);
            let split = word
                .char_indices()
                .nth(room)
                .map_or(word.len(), |(i, _)| i);
            current.push(&word[..split]);
            *chunk = &word[split..];
        }

        if current.last().is_some_and(|chunk| is_space(chunk)) {
            current.pop();
        }
        if !current.is_empty() {
            lines.push(current.concat());
        }
    }

    lines.join("\n")
}
