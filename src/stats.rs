//! CSV export of the global tag statistics.

use std::io::Write;

use crate::dataset::DatasetIndex;

/// Write `tag,image_count` rows, busiest tags first, alphabetical within
/// a count.
pub fn write_tag_counts<W: Write>(index: &DatasetIndex, writer: W) -> csv::Result<()> {
    let mut entries: Vec<_> = index.global_tags().collect();
    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.text.cmp(&b.text))
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["tag", "image_count"])?;
    for tag in entries {
        csv_writer.write_record([tag.text.as_str(), tag.count.to_string().as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn export_lists_tags_in_view_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("img1.png"), b"").unwrap();
        fs::write(dir.path().join("img1.txt"), "cat, outdoor").unwrap();
        fs::write(dir.path().join("img2.png"), b"").unwrap();
        fs::write(dir.path().join("img2.txt"), "cat").unwrap();

        let mut index = DatasetIndex::new();
        index.load(dir.path()).unwrap();

        let mut out = Vec::new();
        write_tag_counts(&index, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "tag,image_count\ncat,2\noutdoor,1\n");
    }

    #[test]
    fn export_of_empty_dataset_is_header_only() {
        let index = DatasetIndex::new();
        let mut out = Vec::new();
        write_tag_counts(&index, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "tag,image_count\n");
    }
}
