//! Contact source adapters.
//!
//! Four sources feed the pipeline:
//! - spreadsheet files, forwarded to the backend as-is ([`TabularFileImporter`])
//! - vCard text ([`CardTextImporter`])
//! - the native device contact picker ([`PickerImporter`])
//! - the OAuth-gated remote directory ([`DirectoryImporter`])
//!
//! The last three implement [`ContactSource`] and return canonical records
//! that the session merges into its accumulation store:
//!
//! ```ignore
//! let batch = CardTextImporter::from_path("contacts.vcf").produce().await?;
//! store.merge_batch(batch);
//! ```

pub mod directory;
mod picker;
mod tabular;
mod traits;
mod vcard;

pub use directory::DirectoryImporter;
pub use picker::{
    ContactPicker, ContactProperty, JsonFilePicker, PICKER_PROPERTIES, PickerError,
    PickerImporter, RawContact,
};
pub use tabular::{DEFAULT_TABULAR_EXTENSIONS, TabularFileImporter};
pub use traits::{ContactSource, SourceKind, read_import_bytes, read_import_file};
pub use vcard::CardTextImporter;
