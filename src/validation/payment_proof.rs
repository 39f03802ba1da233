use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest proof accepted by default: 5 MiB.
pub const DEFAULT_MAX_PROOF_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofKind {
    Jpeg,
    Png,
    Pdf,
}

impl ProofKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ProofKind::Jpeg => "image/jpeg",
            ProofKind::Png => "image/png",
            ProofKind::Pdf => "application/pdf",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(ProofKind::Jpeg),
            "image/png" => Some(ProofKind::Png),
            "application/pdf" => Some(ProofKind::Pdf),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ProofKind::Jpeg),
            "png" => Some(ProofKind::Png),
            "pdf" => Some(ProofKind::Pdf),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ProofKind::Jpeg | ProofKind::Png)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofRejection {
    #[error("file size {size_bytes} bytes exceeds the {max_bytes} byte limit")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
    #[error("unsupported file type '{0}', only JPG, PNG or PDF are allowed")]
    UnsupportedType(String),
    #[error("could not read '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// A locally selected payment receipt. Only its metadata is kept; nothing is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub file_name: String,
    pub kind: ProofKind,
    pub size_bytes: u64,
}

impl PaymentProof {
    /// Build a proof from an announced MIME type and size, as a browser file picker reports them.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: &str,
        size_bytes: u64,
        max_bytes: u64,
    ) -> Result<Self, ProofRejection> {
        if size_bytes > max_bytes {
            return Err(ProofRejection::TooLarge { size_bytes, max_bytes });
        }
        let kind = ProofKind::from_mime_type(mime_type)
            .ok_or_else(|| ProofRejection::UnsupportedType(mime_type.to_string()))?;

        Ok(Self {
            file_name: file_name.into(),
            kind,
            size_bytes,
        })
    }

    /// Inspect a file on disk. The extension decides the kind.
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self, ProofRejection> {
        let metadata = std::fs::metadata(path).map_err(|e| ProofRejection::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if !metadata.is_file() {
            return Err(ProofRejection::Unreadable {
                path: path.display().to_string(),
                reason: "not a regular file".to_string(),
            });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let kind = ProofKind::from_extension(extension)
            .ok_or_else(|| ProofRejection::UnsupportedType(format!(".{extension}")))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new(file_name, kind.mime_type(), metadata.len(), max_bytes)
    }

    pub fn display_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// Human readable size with up to two decimals, e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accepts_supported_types() {
        let proof = PaymentProof::new("receipt.png", "image/png", 2048, DEFAULT_MAX_PROOF_BYTES).unwrap();
        assert_eq!(proof.kind, ProofKind::Png);
        assert!(proof.kind.is_image());

        let pdf = PaymentProof::new("receipt.pdf", "application/pdf", 10, DEFAULT_MAX_PROOF_BYTES).unwrap();
        assert!(!pdf.kind.is_image());
    }

    #[test]
    fn test_rejects_oversized_file() {
        let err = PaymentProof::new("big.jpg", "image/jpeg", DEFAULT_MAX_PROOF_BYTES + 1, DEFAULT_MAX_PROOF_BYTES)
            .unwrap_err();
        assert!(matches!(err, ProofRejection::TooLarge { .. }));
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = PaymentProof::new("receipt.gif", "image/gif", 10, DEFAULT_MAX_PROOF_BYTES).unwrap_err();
        assert_eq!(err, ProofRejection::UnsupportedType("image/gif".to_string()));
    }

    #[test]
    fn test_from_path_uses_extension() {
        let mut file = tempfile::Builder::new().suffix(".PDF").tempfile().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let proof = PaymentProof::from_path(file.path(), DEFAULT_MAX_PROOF_BYTES).unwrap();
        assert_eq!(proof.kind, ProofKind::Pdf);
        assert_eq!(proof.size_bytes, 8);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = PaymentProof::from_path(Path::new("/definitely/not/here.png"), DEFAULT_MAX_PROOF_BYTES)
            .unwrap_err();
        assert!(matches!(err, ProofRejection::Unreadable { .. }));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
    }
}
