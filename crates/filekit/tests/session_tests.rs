//! Full-dispatch tests over the in-memory gateway
//!
//! Every test drives `Session::dispatch` exactly as the CLI does, with a
//! `Vec<u8>` sink standing in for stdout. `MemoryStorage` is `Clone` over
//! shared state, so the tests keep a handle for asserting on what the
//! commands actually committed.

use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

use filekit::{
    async_trait, DirEntry, MemoryStorage, Metadata, Outcome, Result, Session, Storage,
    StorageReader, StorageWriter,
};

fn session_over(storage: &MemoryStorage) -> Session {
    Session::builder()
        .storage(Arc::new(storage.clone()))
        .home("/home/user")
        .build()
}

async fn run(session: &mut Session, line: &str) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = session.dispatch(line, &mut out).await;
    (outcome, String::from_utf8(out).unwrap())
}

// ==================== dispatcher protocol ====================

#[tokio::test]
async fn unknown_command_reports_invalid_input_with_cursor_unchanged() {
    let storage = MemoryStorage::new();
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "frobnicate now").await;
    assert_eq!(outcome, Outcome::InvalidInput);
    assert_eq!(output, "Invalid input\nYou are currently in /home/user\n");
}

#[tokio::test]
async fn empty_line_reports_invalid_input() {
    let storage = MemoryStorage::new();
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "   ").await;
    assert_eq!(outcome, Outcome::InvalidInput);
    assert!(output.contains("Invalid input"));
}

#[tokio::test]
async fn exit_sentinel_ends_the_session_silently() {
    let storage = MemoryStorage::new();
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "  .exit  ").await;
    assert_eq!(outcome, Outcome::Exit);
    assert_eq!(output, "");
}

#[tokio::test]
async fn failure_does_not_wedge_the_session() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/ok.txt", b"still here");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "cat missing.txt").await;
    assert_eq!(outcome, Outcome::OperationFailed);

    let (outcome, output) = run(&mut session, "cat ok.txt").await;
    assert_eq!(outcome, Outcome::Success);
    assert!(output.starts_with("still here"));
}

// ==================== navigation ====================

#[tokio::test]
async fn cd_moves_the_cursor_and_up_walks_back() {
    let storage = MemoryStorage::new();
    storage.insert_dir("/home/user/projects");
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "cd projects").await;
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(output, "You are currently in /home/user/projects\n");

    let (outcome, output) = run(&mut session, "up").await;
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(output, "You are currently in /home/user\n");
}

#[tokio::test]
async fn cd_into_a_file_fails_and_leaves_the_cursor() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/notes.txt", b"notes");
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "cd notes.txt").await;
    assert_eq!(outcome, Outcome::OperationFailed);
    assert_eq!(
        output,
        "Operation failed\nYou are currently in /home/user\n"
    );
    assert_eq!(session.cwd(), Path::new("/home/user"));
}

#[tokio::test]
async fn up_at_the_root_is_idempotent() {
    let storage = MemoryStorage::new();
    let mut session = Session::builder()
        .storage(Arc::new(storage.clone()))
        .home("/")
        .build();

    run(&mut session, "up").await;
    assert_eq!(session.cwd(), Path::new("/"));
    run(&mut session, "up").await;
    assert_eq!(session.cwd(), Path::new("/"));
}

// ==================== listing ====================

#[tokio::test]
async fn ls_lists_directories_first_each_group_sorted() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/zeta.txt", b"");
    storage.insert_file("/home/user/alpha.txt", b"");
    storage.insert_dir("/home/user/src");
    storage.insert_dir("/home/user/docs");
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "ls").await;
    assert_eq!(outcome, Outcome::Success);

    let names: Vec<&str> = output
        .lines()
        .skip(2)
        .take(4)
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(names, vec!["docs", "src", "alpha.txt", "zeta.txt"]);
}

#[tokio::test]
async fn ls_reports_empty_directories_distinctly() {
    let storage = MemoryStorage::new();
    storage.insert_dir("/home/user/empty");
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "ls empty").await;
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(output, "Empty directory\nYou are currently in /home/user\n");
}

// ==================== create / rename / delete ====================

#[tokio::test]
async fn add_is_exclusive_create() {
    let storage = MemoryStorage::new();
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "add fresh.txt").await;
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(storage.file_contents("/home/user/fresh.txt").unwrap(), b"");

    let (outcome, _) = run(&mut session, "add fresh.txt").await;
    assert_eq!(outcome, Outcome::OperationFailed);
}

#[tokio::test]
async fn rn_renames_within_the_tree() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/old.txt", b"payload");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "rn old.txt new.txt").await;
    assert_eq!(outcome, Outcome::Success);
    assert!(storage.file_contents("/home/user/old.txt").is_none());
    assert_eq!(
        storage.file_contents("/home/user/new.txt").unwrap(),
        b"payload"
    );
}

#[tokio::test]
async fn rm_unlinks_files_but_refuses_directories() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/gone.txt", b"");
    storage.insert_dir("/home/user/keep");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "rm gone.txt").await;
    assert_eq!(outcome, Outcome::Success);
    assert!(storage.file_contents("/home/user/gone.txt").is_none());

    let (outcome, _) = run(&mut session, "rm keep").await;
    assert_eq!(outcome, Outcome::OperationFailed);
}

// ==================== copy / move ====================

#[tokio::test]
async fn cp_streams_into_the_destination_directory() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/data.bin", b"byte-identical payload");
    storage.insert_dir("/home/user/backup");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "cp data.bin backup").await;
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(
        storage.file_contents("/home/user/backup/data.bin").unwrap(),
        b"byte-identical payload"
    );
    // source untouched
    assert_eq!(
        storage.file_contents("/home/user/data.bin").unwrap(),
        b"byte-identical payload"
    );
}

#[tokio::test]
async fn cp_with_directory_source_fails_without_side_effect() {
    let storage = MemoryStorage::new();
    storage.insert_dir("/home/user/tree");
    storage.insert_dir("/home/user/backup");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "cp tree backup").await;
    assert_eq!(outcome, Outcome::OperationFailed);

    let entries = storage.read_dir(Path::new("/home/user/backup")).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn cp_with_file_destination_fails() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/data.bin", b"payload");
    storage.insert_file("/home/user/not-a-dir", b"");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "cp data.bin not-a-dir").await;
    assert_eq!(outcome, Outcome::OperationFailed);
}

#[tokio::test]
async fn cp_onto_itself_is_refused() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/data.bin", b"payload");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "cp data.bin .").await;
    assert_eq!(outcome, Outcome::OperationFailed);
    assert_eq!(
        storage.file_contents("/home/user/data.bin").unwrap(),
        b"payload"
    );
}

#[tokio::test]
async fn mv_removes_the_source_after_a_complete_copy() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/data.bin", b"moved payload");
    storage.insert_dir("/home/user/archive");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "mv data.bin archive").await;
    assert_eq!(outcome, Outcome::Success);
    assert!(storage.file_contents("/home/user/data.bin").is_none());
    assert_eq!(
        storage.file_contents("/home/user/archive/data.bin").unwrap(),
        b"moved payload"
    );
}

/// Delegates to `MemoryStorage` but fails every `open_write`, forcing the
/// copy half of `mv` to fail before any unlink can happen.
struct BrokenSink(MemoryStorage);

#[async_trait]
impl Storage for BrokenSink {
    async fn stat(&self, path: &Path) -> Result<Metadata> {
        self.0.stat(path).await
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.0.read_dir(path).await
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        self.0.exists(path).await
    }

    async fn create_new(&self, path: &Path) -> Result<()> {
        self.0.create_new(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.0.rename(from, to).await
    }

    async fn unlink(&self, path: &Path) -> Result<()> {
        self.0.unlink(path).await
    }

    async fn open_read(&self, path: &Path) -> Result<StorageReader> {
        self.0.open_read(path).await
    }

    async fn open_write(&self, _path: &Path) -> Result<StorageWriter> {
        Err(std::io::Error::other("injected write failure").into())
    }
}

#[tokio::test]
async fn mv_keeps_the_source_when_the_copy_fails() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/data.bin", b"must survive");
    storage.insert_dir("/home/user/archive");

    let mut session = Session::builder()
        .storage(Arc::new(BrokenSink(storage.clone())))
        .home("/home/user")
        .build();

    let (outcome, _) = run(&mut session, "mv data.bin archive").await;
    assert_eq!(outcome, Outcome::OperationFailed);

    assert_eq!(
        storage.file_contents("/home/user/data.bin").unwrap(),
        b"must survive"
    );
    assert!(storage.file_contents("/home/user/archive/data.bin").is_none());
}

// ==================== cat / hash / codec ====================

#[tokio::test]
async fn cat_streams_file_bytes_in_order() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/poem.txt", b"line one\nline two");
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "cat poem.txt").await;
    assert_eq!(outcome, Outcome::Success);
    assert!(output.starts_with("line one\nline two\n"));
}

#[tokio::test]
async fn hash_is_deterministic_and_byte_sensitive() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/blob.bin", b"hello\n");
    let mut session = session_over(&storage);

    let (_, first) = run(&mut session, "hash blob.bin").await;
    let (_, second) = run(&mut session, "hash blob.bin").await;
    assert_eq!(first, second);

    // sha256("hello\n")
    assert_eq!(
        first.lines().next().unwrap(),
        "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
    );

    storage.insert_file("/home/user/blob.bin", b"hello!");
    let (_, changed) = run(&mut session, "hash blob.bin").await;
    assert_ne!(first, changed);
}

#[tokio::test]
async fn hash_of_a_directory_fails() {
    let storage = MemoryStorage::new();
    storage.insert_dir("/home/user/tree");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "hash tree").await;
    assert_eq!(outcome, Outcome::OperationFailed);
}

#[tokio::test]
async fn compress_then_decompress_round_trips() {
    let storage = MemoryStorage::new();
    let payload = b"compressible payload ".repeat(500);
    storage.insert_file("/home/user/plain.txt", &payload);
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "compress plain.txt plain.txt.gz").await;
    assert_eq!(outcome, Outcome::Success);
    let packed = storage.file_contents("/home/user/plain.txt.gz").unwrap();
    assert_ne!(packed, payload);
    assert!(packed.len() < payload.len());

    let (outcome, _) = run(&mut session, "decompress plain.txt.gz restored.txt").await;
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(
        storage.file_contents("/home/user/restored.txt").unwrap(),
        payload
    );
}

#[tokio::test]
async fn decompress_of_a_plain_file_fails() {
    let storage = MemoryStorage::new();
    storage.insert_file("/home/user/plain.txt", b"not gzip at all");
    let mut session = session_over(&storage);

    let (outcome, _) = run(&mut session, "decompress plain.txt out.txt").await;
    assert_eq!(outcome, Outcome::OperationFailed);
}

// ==================== host info ====================

#[tokio::test]
async fn os_eol_prints_the_escaped_line_ending() {
    let storage = MemoryStorage::new();
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "os --EOL").await;
    assert_eq!(outcome, Outcome::Success);
    let line = output.lines().next().unwrap();
    assert!(line == "\"\\n\"" || line == "\"\\r\\n\"");
}

#[tokio::test]
async fn os_architecture_matches_the_target() {
    let storage = MemoryStorage::new();
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "os --architecture").await;
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(output.lines().next().unwrap(), std::env::consts::ARCH);
}

#[tokio::test]
async fn os_rejects_unknown_flags_as_invalid_input() {
    let storage = MemoryStorage::new();
    let mut session = session_over(&storage);

    let (outcome, output) = run(&mut session, "os --bogus").await;
    assert_eq!(outcome, Outcome::InvalidInput);
    assert!(output.contains("Invalid input"));
}
