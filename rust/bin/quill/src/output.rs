//! Plain-text tables and JSON printing.

use serde_json::Value;

/// Left-aligned columns sized to the widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };
    line(headers.iter().map(|h| h.to_uppercase()).collect());
    for row in rows {
        line(row.clone());
    }
}

pub fn json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// "page 2/5 (48 total)".
pub fn page_footer(page: u32, page_count: u64, total: u64) {
    println!("page {page}/{page_count} ({total} total)");
}

/// Unix seconds as RFC 3339, or the raw number when out of range.
pub fn timestamp(unix: i64) -> String {
    chrono::DateTime::from_timestamp(unix, 0).map_or_else(|| unix.to_string(), |d| d.to_rfc3339())
}

/// Date part only.
pub fn date(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn tags(tags: &[quill_client::Tag]) -> String {
    tags.iter().map(|t| t.tag.as_str()).collect::<Vec<_>>().join(",")
}
