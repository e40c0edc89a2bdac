// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Druckkiosk Document — upload intake (scoped temp files) and page
// normalization (crop-to-fill to a standard paper size).

pub mod intake;
pub mod page;

pub use intake::UploadedDocument;
pub use page::{PageImage, PagePreparer};
