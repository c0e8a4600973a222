//! Sent-file cache model.
//!
//! Maps the `sent_files` table, which remembers the server-side reference
//! (`id` + `hash`) of files already uploaded, keyed by content digest, size
//! and kind, so re-sending the same file can skip the upload.

use sea_orm::entity::prelude::*;

/// Kind of uploaded file a cache row refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum FileKind {
    /// A generic document upload.
    #[sea_orm(string_value = "document")]
    Document,
    /// A photo upload.
    #[sea_orm(string_value = "photo")]
    Photo,
}

/// One cached upload, keyed by (digest, size, kind).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sent_files")]
pub struct Model {
    /// MD5 digest of the file contents.
    #[sea_orm(primary_key, auto_increment = false)]
    pub md5_digest: Vec<u8>,

    /// File size in bytes.
    #[sea_orm(primary_key, auto_increment = false)]
    pub file_size: i64,

    /// Whether the file was sent as a document or a photo.
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: FileKind,

    /// Server-assigned file identifier.
    pub id: i64,

    /// Server-assigned access hash for the file.
    pub hash: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
