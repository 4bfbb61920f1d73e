//! Size and filename formatting used by the rendered summaries

const MIB: u128 = 1024 * 1024;

/// Size in MiB with two decimals, e.g. `2.00 MB`
///
/// Halves of a hundredth round up, so 128 KiB reads `0.13 MB`.
#[must_use]
pub fn format_megabytes(bytes: u64) -> String {
    let hundredths = (u128::from(bytes) * 100 + MIB / 2) / MIB;
    format!("{}.{:02} MB", hundredths / 100, hundredths % 100)
}

/// Human-readable size with up to two decimals, e.g. `1.5 KB`
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS.get(unit_index).unwrap_or(&"Bytes"))
}

/// Text after the last dot of a filename
///
/// Empty when the name has no dot or its only dot is the leading one.
#[must_use]
pub fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if index > 0 => filename.get(index + 1..).unwrap_or(""),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(2_097_152), "2.00 MB");
        assert_eq!(format_megabytes(512_000), "0.49 MB");
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(10 * 1024 * 1024), "10.00 MB");
    }

    #[test]
    fn test_format_megabytes_rounds_halves_up() {
        assert_eq!(format_megabytes(131_072), "0.13 MB");
        assert_eq!(format_megabytes(655_360), "0.63 MB");
        assert_eq!(format_megabytes(5_242), "0.00 MB");
        assert_eq!(format_megabytes(5_243), "0.01 MB");
        assert_eq!(format_megabytes(u64::MAX), "17592186044416.00 MB");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2_097_152), "2 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        // Sizes beyond GB stay expressed in GB
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.jpg"), "jpg");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".bashrc"), "");
        assert_eq!(file_extension("trailing."), "");
        assert_eq!(file_extension(""), "");
    }
}
