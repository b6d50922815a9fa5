use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::stems::{parse_stem_source, Lemma};
use crate::utils::source_name;

struct Replacement {
    start_line: usize,
    end_line: usize,
    text: String,
}

fn line_terminator(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Renders the lines replacing `lines`, which held the original lemma.
/// Comment lines inside the range are kept ahead of the lemma.
fn replacement_text(updated: &Lemma, lines: &[&str]) -> String {
    let last = lines.last().copied().unwrap_or_default();
    let newline = match line_terminator(last) {
        "" => lines
            .iter()
            .map(|l| line_terminator(l))
            .find(|t| !t.is_empty())
            .unwrap_or("\n"),
        t => t,
    };
    let mut rendered: Vec<String> = lines
        .iter()
        .filter(|l| l.trim_start().starts_with('#'))
        .map(|l| l.trim_end_matches(['\r', '\n']).to_string())
        .collect();
    rendered.extend(updated.to_lines());
    let mut text = rendered.join(newline);
    text.push_str(line_terminator(last));
    text
}

fn rewrite_file<F>(path: &Path, is_verb: bool, updater: &mut F) -> Result<bool>
where
    F: FnMut(&Lemma) -> Option<Lemma>,
{
    let content = fs::read_to_string(path)?;
    let lemmata = parse_stem_source(&source_name(path), &content, is_verb)?;
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let mut replacements = vec![];
    for lemma in &lemmata {
        let Some(updated) = updater(lemma) else {
            continue;
        };
        if updated.content_eq(lemma) {
            continue;
        }
        let Some(source) = &lemma.source else {
            continue;
        };
        replacements.push(Replacement {
            start_line: source.start_line,
            end_line: source.end_line,
            text: replacement_text(&updated, &lines[source.start_line..source.end_line]),
        });
    }
    if replacements.is_empty() {
        return Ok(false);
    }

    let mut output = String::with_capacity(content.len());
    let mut next = 0;
    for replacement in replacements {
        output.extend(lines[next..replacement.start_line].iter().copied());
        output.push_str(&replacement.text);
        next = replacement.end_line;
    }
    output.extend(lines[next..].iter().copied());
    fs::write(path, output)?;
    tracing::debug!(file = %path.display(), "rewrote stem file");
    Ok(true)
}

/// Rewrites lemmata in place in their stem files.
///
/// `updater` is called with every lemma. When it returns a lemma that differs
/// from the original, the lines of the original lemma are replaced with the
/// rendered update. All other content of the file is left as is, and files
/// without changes are not written.
///
/// Returns the number of files written.
///
/// # Errors
///
/// [`MorceusError`](crate::errors::MorceusError) will be returned when a file
/// cannot be read, parsed, or written.
pub fn rewrite_regular_lemmata<F, P>(
    mut updater: F,
    noun_files: &[P],
    verb_files: &[P],
) -> Result<usize>
where
    F: FnMut(&Lemma) -> Option<Lemma>,
    P: AsRef<Path>,
{
    let mut written = 0;
    for path in noun_files {
        written += usize::from(rewrite_file(path.as_ref(), false, &mut updater)?);
    }
    for path in verb_files {
        written += usize::from(rewrite_file(path.as_ref(), true, &mut updater)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_keeps_comments() {
        let lemma = parse_stem_source("f", ":le:vita\n:no:vit a_ae fem\n", false).unwrap();
        let lines = [":le:vita\r\n", "# comment\r\n", ":no:vitt a_ae fem\r\n"];
        assert_eq!(
            replacement_text(&lemma[0], &lines),
            "# comment\r\n:le:vita\r\n:no:vit a_ae fem\r\n"
        );
    }

    #[test]
    fn test_replacement_at_end_of_file() {
        let lemma = parse_stem_source("f", ":le:vita\n:no:vit a_ae fem\n", false).unwrap();
        let lines = [":le:vita\n", ":no:vitt a_ae fem"];
        assert_eq!(
            replacement_text(&lemma[0], &lines),
            ":le:vita\n:no:vit a_ae fem"
        );
    }
}
