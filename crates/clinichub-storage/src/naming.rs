//! File naming rules for uploads and backups.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Timestamp format embedded in stored names.
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Keep ASCII alphanumerics plus `.`, `_` and `-`; leading dots are dropped
/// so the result is never hidden or a path component like `..`.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Lowercase extension after the last dot.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether `filename` carries one of `allowed` (lowercase) extensions.
pub fn is_allowed(filename: &str, allowed: &[String]) -> bool {
    extension_of(filename).is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
}

/// `{patient}_{YYYYmmdd_HHMMSS}_{sanitized}`.
pub fn stored_document_name(patient_id: Uuid, at: DateTime<Utc>, original: &str) -> String {
    format!(
        "{patient_id}_{}_{}",
        at.format(STAMP_FORMAT),
        sanitize_filename(original)
    )
}

/// `healthcare_backup_{YYYYmmdd_HHMMSS}.json`.
pub fn backup_name(at: DateTime<Utc>) -> String {
    format!("healthcare_backup_{}.json", at.format(STAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_filename("lab results (1).pdf"), "labresults1.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\scans\\x-ray_01.PNG"), "x-ray_01.PNG");
        assert_eq!(sanitize_filename(".env"), "env");
    }

    #[test]
    fn test_extension_policy() {
        let allowed = vec!["pdf".to_string(), "png".to_string()];
        assert!(is_allowed("scan.PDF", &allowed));
        assert!(!is_allowed("run.exe", &allowed));
        assert!(!is_allowed("pdf", &allowed));
        assert!(!is_allowed(".pdf", &allowed));
    }

    #[test]
    fn test_names() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let pid = Uuid::nil();
        assert_eq!(
            stored_document_name(pid, at, "report final.pdf"),
            "00000000-0000-0000-0000-000000000000_20250304_050607_reportfinal.pdf"
        );
        assert_eq!(backup_name(at), "healthcare_backup_20250304_050607.json");
    }
}
