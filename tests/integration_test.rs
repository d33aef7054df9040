//! Integration tests for csvsift

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use csvsift::error::PipelineError;
use csvsift::{OUTPUT_SUBDIR, Options, run_pipeline};

fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn read_output(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(OUTPUT_SUBDIR).join(name)).unwrap()
}

mod filtering_tests {
    use super::*;

    #[tokio::test]
    async fn test_keeps_columns_with_any_nonempty_value() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.csv", "name,age\nAlice,0\nBob,5\n,0\n");

        let stats = run_pipeline(Options::new(dir.path())).await.unwrap();

        // `age` is kept because of Bob's 5; Alice's 0 is empty. The all-empty
        // third row is dropped.
        assert_eq!(read_output(dir.path(), "a.csv"), "name,age\nAlice,0\nBob,5\n");
        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.records_read, 3);
        assert_eq!(stats.records_written, 2);
        assert_eq!(stats.rows_dropped, 1);
    }

    #[tokio::test]
    async fn test_drops_columns_that_are_empty_everywhere() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "data.csv",
            "id,junk,zero,null\n1,,0,NULL\n2,,0,NULL\n3,,0,NULL\n",
        );

        run_pipeline(Options::new(dir.path())).await.unwrap();

        assert_eq!(read_output(dir.path(), "data.csv"), "id\n1\n2\n3\n");
    }

    #[tokio::test]
    async fn test_kept_column_order_is_first_nonempty_occurrence() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "order.csv", "a,b\n,1\n2,3\n");

        run_pipeline(Options::new(dir.path())).await.unwrap();

        // `b` goes non-empty first (record 1), `a` only in record 2.
        assert_eq!(read_output(dir.path(), "order.csv"), "b,a\n1,\n3,2\n");
    }

    #[tokio::test]
    async fn test_header_only_file_yields_empty_output() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "empty.csv", "x,y,z\n");

        let stats = run_pipeline(Options::new(dir.path())).await.unwrap();

        let out = read_output(dir.path(), "empty.csv");
        assert!(out.trim().is_empty(), "expected no columns, got {out:?}");
        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.records_written, 0);
    }

    #[tokio::test]
    async fn test_values_are_trimmed_before_classification() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "pad.csv", "a,b\n 0 , x \n");

        run_pipeline(Options::new(dir.path())).await.unwrap();

        assert_eq!(read_output(dir.path(), "pad.csv"), "b\nx\n");
    }

    #[tokio::test]
    async fn test_multiple_files_are_filtered_independently() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "one.csv", "a,b\n1,\n2,\n");
        write_file(dir.path(), "two.csv", "a,b\n,1\n,2\n");

        let stats = run_pipeline(Options::new(dir.path())).await.unwrap();

        assert_eq!(read_output(dir.path(), "one.csv"), "a\n1\n2\n");
        assert_eq!(read_output(dir.path(), "two.csv"), "b\n1\n2\n");
        assert_eq!(stats.files_processed, 2);
    }

    #[tokio::test]
    async fn test_rerun_on_filtered_output_is_a_fixed_point() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.csv", "name,age,junk\nAlice,0,\nBob,5,\n,0,\n");

        run_pipeline(Options::new(dir.path())).await.unwrap();
        let first = read_output(dir.path(), "a.csv");

        let filtered = dir.path().join(OUTPUT_SUBDIR);
        run_pipeline(Options::new(filtered.as_path())).await.unwrap();
        let second = read_output(&filtered, "a.csv");

        assert_eq!(first, second);
    }
}

mod skip_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_csv_entries_are_never_read() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "keep.csv", "a\n1\n");
        write_file(dir.path(), "notes.txt", "not,a\ncsv,file\n");
        fs::create_dir(dir.path().join("sub.csv")).unwrap();

        let stats = run_pipeline(Options::new(dir.path())).await.unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_skipped, 2);
        let out_dir = dir.path().join(OUTPUT_SUBDIR);
        assert!(out_dir.join("keep.csv").exists());
        assert!(!out_dir.join("notes.txt").exists());
        assert!(!out_dir.join("sub.csv").exists());
    }

    #[tokio::test]
    async fn test_existing_output_dir_is_tolerated() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(OUTPUT_SUBDIR)).unwrap();
        write_file(dir.path(), "a.csv", "a\n1\n");

        let stats = run_pipeline(Options::new(dir.path())).await.unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(read_output(dir.path(), "a.csv"), "a\n1\n");
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_decode_error_fails_that_file_only() {
        let dir = TempDir::new().unwrap();
        // Second record disagrees with the header on field count.
        write_file(dir.path(), "bad.csv", "a,b\n1,2\n3\n");
        write_file(dir.path(), "good.csv", "a,b\n1,2\n");

        let result = run_pipeline(Options::new(dir.path())).await;

        match result {
            Err(PipelineError::FilesFailed { count }) => assert_eq!(count, 1),
            other => panic!("expected FilesFailed, got {other:?}"),
        }

        // The sibling file still produced correct output.
        assert_eq!(read_output(dir.path(), "good.csv"), "a,b\n1,2\n");
        assert!(!dir.path().join(OUTPUT_SUBDIR).join("bad.csv").exists());
    }

    #[tokio::test]
    async fn test_write_error_fails_that_file_only() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "blocked.csv", "a,b\n1,2\n");
        write_file(dir.path(), "good.csv", "a,b\n3,4\n");
        // Occupy blocked.csv's output path with a directory so creating the
        // output file fails during the rewrite pass.
        fs::create_dir_all(dir.path().join(OUTPUT_SUBDIR).join("blocked.csv")).unwrap();

        let result = run_pipeline(Options::new(dir.path())).await;

        match result {
            Err(PipelineError::FilesFailed { count }) => assert_eq!(count, 1),
            other => panic!("expected FilesFailed, got {other:?}"),
        }

        // The sibling file still produced correct output.
        assert_eq!(read_output(dir.path(), "good.csv"), "a,b\n3,4\n");
    }

    #[tokio::test]
    async fn test_missing_directory_is_a_listing_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = run_pipeline(Options::new(missing.as_path())).await;

        assert!(matches!(result, Err(PipelineError::Listing { .. })));
    }

    #[tokio::test]
    async fn test_empty_directory_succeeds_with_zero_candidates() {
        let dir = TempDir::new().unwrap();

        let stats = run_pipeline(Options::new(dir.path())).await.unwrap();

        assert_eq!(stats.files_processed, 0);
        assert!(dir.path().join(OUTPUT_SUBDIR).exists());
    }
}
