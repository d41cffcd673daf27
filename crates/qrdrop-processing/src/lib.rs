//! QRDrop Processing Library
//!
//! CPU-bound collaborators of the publish pipeline:
//! - QR encoding of a URL into a PNG and a `data:` URI
//! - Stamping a PNG onto the first page of a PDF
//!
//! Everything here is synchronous; callers on an async runtime should run it
//! on a blocking thread.

pub mod error;
pub mod placement;
pub mod qr;
pub mod stamp;

pub use error::{ProcessingError, ProcessingResult};
pub use placement::{StampPlacement, StampRect};
pub use qr::{QrEncoder, QrPayload};
pub use stamp::{PdfStamper, StampedDocument};
