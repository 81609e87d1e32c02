//! Input normalization, the session's `transform_cell` step.
//!
//! Notebook front ends hand the session raw cell text that may contain
//! magic lines (`%...`) and shell escapes (`!...`). Those lines belong
//! to the host, not to the cell language, so they are blanked before
//! the cell is parsed.

/// Blanks magic and shell-escape lines. Every surviving line keeps its
/// original line number so diagnostics still point where the user is
/// looking.
pub fn normalize_cell(source: &str) -> String {
    source
        .lines()
        .map(|line| if is_magic_line(line) { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_magic_line(line: &str) -> bool {
    matches!(line.trim_start().chars().next(), Some('%' | '!'))
}

/// Splits a percent-format script into cells. A line whose first
/// non-blank characters are `# %%` (or `#%%`) starts a new cell; text
/// before the first marker is its own cell. Cells with no content are
/// dropped.
pub fn split_cells(source: &str) -> Vec<String> {
    let mut cells = vec![String::new()];
    for line in source.lines() {
        if is_cell_marker(line) {
            cells.push(String::new());
            continue;
        }
        let cell = cells.last_mut().expect("cells always holds at least one entry");
        if !cell.is_empty() {
            cell.push('\n');
        }
        cell.push_str(line);
    }
    cells.into_iter().filter(|cell| !cell.trim().is_empty()).collect()
}

fn is_cell_marker(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("# %%") || line.starts_with("#%%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_and_shell_lines_are_blanked() {
        let normalized = normalize_cell("%matplotlib inline\nx = 1\n  !pip install scry\nprint(x)");
        assert_eq!(normalized, "\nx = 1\n\nprint(x)");
    }

    #[test]
    fn plain_cells_pass_through() {
        assert_eq!(normalize_cell("x = 1\nprint(x)"), "x = 1\nprint(x)");
    }

    #[test]
    fn percent_in_mid_line_is_not_a_magic() {
        assert_eq!(normalize_cell("x = 100\n# 50%"), "x = 100\n# 50%");
    }

    #[test]
    fn percent_markers_split_cells() {
        let cells = split_cells("a = 1\n# %% second\nb = 2\n\n#%%\nc = 3\n");
        assert_eq!(cells, vec!["a = 1", "b = 2\n", "c = 3"]);
    }

    #[test]
    fn leading_marker_and_blank_cells_are_dropped() {
        let cells = split_cells("# %%\nx = 1\n# %%\n\n# %%\ny = 2");
        assert_eq!(cells, vec!["x = 1", "y = 2"]);
    }

    #[test]
    fn empty_script_has_no_cells() {
        assert!(split_cells("").is_empty());
    }
}
