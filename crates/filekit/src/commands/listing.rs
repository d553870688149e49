//! Directory listing command (ls)

use async_trait::async_trait;

use super::{render_table, Arity, Command, Context};
use crate::error::Result;
use crate::storage::DirEntry;

/// The ls command - list a directory as a Name/Type table.
///
/// Directories come first, then files; each group is sorted by plain
/// lexical string comparison so the order is total and locale-independent.
pub struct Ls;

#[async_trait]
impl Command for Ls {
    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    async fn execute(&self, mut ctx: Context<'_>) -> Result<()> {
        let target = match ctx.args.first() {
            Some(sub) => ctx.cursor.resolve(sub),
            None => ctx.cursor.path().to_path_buf(),
        };

        let entries = ctx.storage.read_dir(&target).await?;

        let (mut dirs, mut files): (Vec<DirEntry>, Vec<DirEntry>) =
            entries.into_iter().partition(|e| e.file_type.is_dir());
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));

        if dirs.is_empty() && files.is_empty() {
            return ctx.write_line("Empty directory").await;
        }

        let rows: Vec<(String, String)> = dirs
            .into_iter()
            .map(|e| (e.name, "directory".to_string()))
            .chain(files.into_iter().map(|e| (e.name, "file".to_string())))
            .collect();

        ctx.write(&render_table(("Name", "Type"), &rows)).await
    }
}
