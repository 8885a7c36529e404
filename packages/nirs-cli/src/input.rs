use std::path::Path;

/// Collect the labels for one batch from positional arguments or a label
/// file. Exactly one source must be given.
pub fn resolve_labels(labels: &[String], file: Option<&str>) -> Result<Vec<String>, String> {
    match (labels.is_empty(), file) {
        (false, Some(_)) => {
            Err("Give channel labels either as arguments or with --file, not both".to_string())
        }
        (false, None) => Ok(labels.to_vec()),
        (true, Some(path)) => read_label_file(path),
        (true, None) => Err(
            "No channel labels given: pass labels as arguments or use --file".to_string(),
        ),
    }
}

/// Read a label file. `.json` files hold an array of strings; anything else
/// is plain text with one label per line.
pub fn read_label_file(path: &str) -> Result<Vec<String>, String> {
    let p = Path::new(path);
    if !p.is_file() {
        return Err(format!("Label file not found: {}", path));
    }

    let content = std::fs::read_to_string(p)
        .map_err(|e| format!("Failed to read label file '{}': {}", path, e))?;

    let is_json = p
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let labels = if is_json {
        parse_label_json(&content).map_err(|e| format!("{}: {}", path, e))?
    } else {
        parse_label_lines(&content)
    };

    log::debug!("Read {} labels from {}", labels.len(), path);
    Ok(labels)
}

/// One label per line. Lines are trimmed; blank lines and `#` comments are
/// skipped.
pub fn parse_label_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn parse_label_json(content: &str) -> Result<Vec<String>, String> {
    serde_json::from_str::<Vec<String>>(content)
        .map_err(|e| format!("expected a JSON array of label strings ({})", e))
}
