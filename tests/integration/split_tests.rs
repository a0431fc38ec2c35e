//! End-to-end tests over the written output tree

use pretty_assertions::assert_eq;

use pg_dump_splitter::{split_dump, ObjectKind, SplitOptions, SplitterError};

use crate::common::{TestContext, SAMPLE_DUMP};

#[test]
fn test_sample_dump_produces_expected_tree() {
    let ctx = TestContext::with_dump(SAMPLE_DUMP);
    ctx.split_successfully();

    assert_eq!(
        ctx.output_files(),
        vec![
            "extensions/public.pgcrypto.sql".to_string(),
            "functions/public.set_updated_at.sql".to_string(),
            "residual.sql".to_string(),
            "schemas/app.sql".to_string(),
            "tables/public.users.sql".to_string(),
            "types/public.mood.sql".to_string(),
            "views/app.active_users.sql".to_string(),
        ]
    );
}

#[test]
fn test_table_file_is_self_contained() {
    let ctx = TestContext::with_dump(SAMPLE_DUMP);
    ctx.split_successfully();

    let table = ctx.read_output("tables/public.users.sql");
    assert_eq!(
        table,
        "CREATE TABLE public.users (\n    \
         id integer GENERATED ALWAYS AS IDENTITY (SEQUENCE NAME public.users_id_seq START WITH 1 INCREMENT BY 1 NO MINVALUE NO MAXVALUE CACHE 1) NOT NULL,\n    \
         email text NOT NULL,\n    \
         mood public.mood DEFAULT 'ok'::public.mood,\n    \
         CONSTRAINT users_pkey PRIMARY KEY (id)\n);\n\n\
         CREATE INDEX users_email_idx ON public.users USING btree (email);\n"
    );
}

#[test]
fn test_function_file_keeps_dollar_quoted_body() {
    let ctx = TestContext::with_dump(SAMPLE_DUMP);
    ctx.split_successfully();

    let function = ctx.read_output("functions/public.set_updated_at.sql");
    assert!(function.starts_with("CREATE FUNCTION public.set_updated_at()"));
    assert!(function.contains("NEW.updated_at := now();"));
    assert!(function.contains("END;\n$$;"));
}

#[test]
fn test_residual_collects_preamble_and_comment_headers() {
    let ctx = TestContext::with_dump(SAMPLE_DUMP);
    ctx.split_successfully();

    let residual = ctx.read_output("residual.sql");
    assert!(residual.contains("PostgreSQL database dump"));
    assert!(residual.contains("SET statement_timeout = 0;"));
    assert!(residual.contains("SELECT pg_catalog.set_config('search_path', '', false);"));
    assert!(residual.contains("-- Name: users; Type: TABLE; Schema: public; Owner: -"));
    // Statements that were classified must not leak into the residual.
    assert!(!residual.contains("CREATE TABLE"));
    assert!(!residual.contains("ADD CONSTRAINT"));
}

#[test]
fn test_summary_matches_written_files() {
    let ctx = TestContext::with_dump(SAMPLE_DUMP);
    let summary = ctx.split_successfully();

    assert_eq!(summary.files_written, ctx.output_files().len());
    assert!(summary.has_residual);
    assert_eq!(summary.objects_by_kind.get(&ObjectKind::Table), Some(&1));
    assert_eq!(summary.objects_by_kind.get(&ObjectKind::View), Some(&1));
    assert_eq!(summary.objects_by_kind.get(&ObjectKind::Schema), Some(&1));
    assert_eq!(summary.sequences_inlined, 1);
    assert_eq!(summary.constraints_inlined, 1);
    assert_eq!(summary.indexes_attached, 1);
}

#[test]
fn test_orphan_index_never_reaches_disk() {
    let ctx = TestContext::with_dump("CREATE INDEX idx_a ON public.t (a);\n");
    let summary = ctx.split_successfully();

    assert_eq!(summary.files_written, 0);
    assert!(!summary.has_residual);
    assert_eq!(ctx.output_files(), Vec::<String>::new());
}

#[test]
fn test_set_only_dump_writes_residual_only() {
    let ctx = TestContext::with_dump("SET statement_timeout = 0;\n");
    let summary = ctx.split_successfully();

    assert_eq!(summary.files_written, 1);
    assert_eq!(ctx.output_files(), vec!["residual.sql".to_string()]);
    assert_eq!(ctx.read_output("residual.sql"), "SET statement_timeout = 0;\n");
}

#[test]
fn test_windows_1252_dump_round_trips() {
    let ctx = TestContext::with_dump_bytes(
        b"-- caf\xe9 schema\nCREATE TABLE public.caf (id integer NOT NULL);\n",
    );
    ctx.split_successfully();

    let table = ctx.read_output("tables/public.caf.sql");
    assert!(table.starts_with("CREATE TABLE public.caf"));
    let residual = ctx.read_output("residual.sql");
    assert!(residual.contains("café schema"));
}

#[test]
fn test_missing_dump_file_errors() {
    let ctx = TestContext::with_dump("SELECT 1;");
    let result = split_dump(SplitOptions {
        dump_path: ctx.dump_path.with_file_name("nope.sql"),
        output_dir: Some(ctx.output_dir.clone()),
        verbose: false,
    });
    let err = result.expect_err("missing file must error");
    assert!(matches!(
        err.downcast_ref::<SplitterError>(),
        Some(SplitterError::DumpRead { .. })
    ));
}

#[test]
fn test_dump_path_pointing_at_directory_errors() {
    let ctx = TestContext::with_dump("SELECT 1;");
    let result = split_dump(SplitOptions {
        dump_path: ctx.dump_path.parent().expect("parent").to_path_buf(),
        output_dir: Some(ctx.output_dir.clone()),
        verbose: false,
    });
    let err = result.expect_err("directory must error");
    assert!(matches!(
        err.downcast_ref::<SplitterError>(),
        Some(SplitterError::DumpIsDirectory { .. })
    ));
}

#[test]
fn test_empty_dump_errors() {
    let ctx = TestContext::with_dump("   \n\n");
    let err = ctx.split().expect_err("empty dump must error");
    assert!(matches!(
        err.downcast_ref::<SplitterError>(),
        Some(SplitterError::DumpEmpty { .. })
    ));
}

#[test]
fn test_default_output_dir_is_named_after_dump() {
    let ctx = TestContext::with_dump("CREATE SCHEMA app;\n");
    let summary = split_dump(SplitOptions {
        dump_path: ctx.dump_path.clone(),
        output_dir: None,
        verbose: false,
    })
    .expect("split failed");

    assert_eq!(summary.output_dir, ctx.dump_path.with_extension(""));
    assert!(summary.output_dir.join("schemas/app.sql").exists());
}

#[test]
fn test_split_is_repeatable() {
    let ctx = TestContext::with_dump(SAMPLE_DUMP);
    ctx.split_successfully();
    let first = ctx.read_output("tables/public.users.sql");
    ctx.split_successfully();
    let second = ctx.read_output("tables/public.users.sql");
    assert_eq!(first, second);
}
