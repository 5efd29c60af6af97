//! # rdar-rs
//!
//! `rdar-rs` is a pure Rust decoder for the table of contents of RDAR game asset archives.
//! It reads the fixed archive header and the index region behind it: per-file metadata keyed
//! by a 64-bit name hash, the offset table of stored segments, and the supplemental hash table.
//!
//! ## Features
//! - Header and index decoding with precise truncation diagnostics (stage and entry index)
//! - Optional hash-to-path resolution through a caller-supplied [`NameResolver`]
//! - Selectable handling of duplicate name hashes
//! - Opening a single archive or a whole directory of archives
//!
//! File contents are not read or decompressed, and stored digests and checksums are not verified.
//!
//! ## Usage
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! rdar-rs = "0.1"
//! ```
//!
//! ### Example: Listing files
//! ```rust,no_run
//! use rdar_rs::{ArchiveSet, DecodeOptions, DuplicatePolicy, HashDictionary};
//!
//! let names = HashDictionary::from_file("archivehashes.csv").unwrap();
//! let options = DecodeOptions::default().with_duplicate_policy(DuplicatePolicy::Error);
//! let set = ArchiveSet::load_dir("archive/pc/content", &names, &options).unwrap();
//!
//! for archive in &set.archives {
//!     for file in archive.files() {
//!         println!("{} {}", file.name(), file.digest_hex());
//!     }
//! }
//! ```

pub mod archive_set;
pub mod decode_options;
pub mod error;
mod ext;
pub mod file_info_entry;
pub mod file_time;
pub mod hash_entry;
pub mod name_resolver;
pub mod offset_entry;
pub mod rdar_archive;
pub mod rdar_header;
pub mod rdar_index_table;
mod utility;

pub use archive_set::ArchiveSet;
pub use decode_options::{DecodeOptions, DuplicatePolicy};
pub use error::{RdarError, Result, TableKind};
pub use file_info_entry::FileInfoEntry;
pub use file_time::FileTime;
pub use hash_entry::HashEntry;
pub use name_resolver::{HashDictionary, NameResolver, NoNames};
pub use offset_entry::OffsetEntry;
pub use rdar_archive::RdarArchive;
pub use rdar_header::{ArchiveHeader, RDAR_MAGIC};
pub use rdar_index_table::{IndexCounts, IndexTable};
