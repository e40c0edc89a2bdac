// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload intake — persists an uploaded byte stream to a scoped temp file.
//
// The temp file lives exactly as long as the `UploadedDocument` value.
// Dropping the value deletes the file, so cleanup is guaranteed on every
// exit path, whether dispatch succeeded, failed, or was never reached.

use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use druckkiosk_core::error::{DruckkioskError, Result};
use druckkiosk_core::types::{DocumentType, PrintJob, PrintOptions};

/// SHA-256 hash of a byte slice, hex encoded.  Used to identify documents
/// in logs and receipts without storing their content.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// An uploaded document staged on disk for one interaction.
pub struct UploadedDocument {
    file: NamedTempFile,
    name: String,
    document_type: DocumentType,
    hash: String,
    len: u64,
}

impl UploadedDocument {
    /// Accept a byte stream plus its original filename.
    ///
    /// The extension decides the document type (PDF, TXT, PNG, JPG/JPEG);
    /// anything else is rejected.  Bytes are written to a temp file carrying
    /// the same extension so the print backend can identify the format.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn receive(filename: &str, bytes: &[u8]) -> Result<Self> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .ok_or_else(|| {
                DruckkioskError::UnsupportedDocument(format!(
                    "'{filename}' has no file extension"
                ))
            })?;

        let document_type = DocumentType::from_extension(ext).ok_or_else(|| {
            DruckkioskError::UnsupportedDocument(ext.to_string())
        })?;

        let file = write_temp(document_type, bytes)?;
        let hash = hash_bytes(bytes);

        info!(
            name = filename,
            mime = document_type.mime_type(),
            hash = %hash,
            "upload staged"
        );

        Ok(Self {
            file,
            name: filename.to_string(),
            document_type,
            hash,
            len: bytes.len() as u64,
        })
    }

    /// Path of the staged file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Original filename as uploaded.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// SHA-256 hash of the current payload.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Payload size in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the current payload back (for editing or preview).
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.path())?)
    }

    /// Replace the payload with an edited version, e.g. the normalized page
    /// PNG produced from an uploaded photo.
    ///
    /// A fresh temp file with the new extension takes over; the previous
    /// file is deleted when the old handle drops.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn replace_payload(&mut self, bytes: &[u8], document_type: DocumentType) -> Result<()> {
        let file = write_temp(document_type, bytes)?;
        debug!(
            old = %self.file.path().display(),
            new = %file.path().display(),
            "payload replaced"
        );
        self.file = file;
        self.document_type = document_type;
        self.hash = hash_bytes(bytes);
        self.len = bytes.len() as u64;
        Ok(())
    }

    /// Build the immutable print job for this document.
    pub fn print_job(&self, options: PrintOptions) -> Result<PrintJob> {
        PrintJob::new(
            self.path().to_path_buf(),
            self.document_type,
            self.name.clone(),
            self.hash.clone(),
            options,
        )
    }
}

/// Write bytes to a named temp file with the type's canonical extension.
fn write_temp(document_type: DocumentType, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("druckkiosk-")
        .suffix(&format!(".{}", document_type.extension()))
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_identifies_type_by_extension() {
        let doc = UploadedDocument::receive("holiday.JPEG", b"fake jpeg bytes").expect("receive");
        assert_eq!(doc.document_type(), DocumentType::Jpeg);
        assert_eq!(doc.name(), "holiday.JPEG");
        assert!(doc.path().exists());
        assert_eq!(doc.path().extension().and_then(|e| e.to_str()), Some("jpg"));
    }

    #[test]
    fn unknown_extension_rejected() {
        let result = UploadedDocument::receive("report.docx", b"zip bytes");
        assert!(matches!(
            result,
            Err(DruckkioskError::UnsupportedDocument(_))
        ));
    }

    #[test]
    fn missing_extension_rejected() {
        let result = UploadedDocument::receive("README", b"text");
        assert!(matches!(
            result,
            Err(DruckkioskError::UnsupportedDocument(_))
        ));
    }

    #[test]
    fn temp_file_removed_on_drop() {
        let path = {
            let doc = UploadedDocument::receive("note.txt", b"hello").expect("receive");
            doc.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn replace_payload_switches_type_and_hash() {
        let mut doc = UploadedDocument::receive("photo.jpg", b"original").expect("receive");
        let old_path = doc.path().to_path_buf();
        let old_hash = doc.hash().to_string();

        doc.replace_payload(b"edited png bytes", DocumentType::Png)
            .expect("replace");

        assert_eq!(doc.document_type(), DocumentType::Png);
        assert_ne!(doc.hash(), old_hash);
        assert!(!old_path.exists());
        assert!(doc.path().exists());
        assert_eq!(doc.read_bytes().expect("read"), b"edited png bytes");
    }

    #[test]
    fn print_job_carries_staged_path() {
        let doc = UploadedDocument::receive("doc.pdf", b"%PDF-1.4").expect("receive");
        let job = doc.print_job(PrintOptions::default()).expect("job");
        assert_eq!(job.source_path, doc.path());
        assert_eq!(job.document_type, DocumentType::Pdf);
        assert_eq!(job.document_hash, doc.hash());
    }

    #[test]
    fn hash_is_stable_sha256() {
        assert_eq!(
            hash_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
