//! Common test utilities for pg-dump-splitter tests

use std::path::PathBuf;

use tempfile::TempDir;

use pg_dump_splitter::{split_dump, SplitOptions, SplitSummary};

/// Test context with temporary directory for isolated test execution
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub dump_path: PathBuf,
    pub output_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context with the given dump content on disk
    pub fn with_dump(content: &str) -> Self {
        Self::with_dump_bytes(content.as_bytes())
    }

    /// Create a new test context from raw dump bytes (for encoding tests)
    pub fn with_dump_bytes(content: &[u8]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dump_path = temp_dir.path().join("schema.sql");
        std::fs::write(&dump_path, content).expect("Failed to write dump");
        let output_dir = temp_dir.path().join("out");

        Self {
            _temp_dir: temp_dir,
            dump_path,
            output_dir,
        }
    }

    /// Split the dump into the context's output directory
    pub fn split(&self) -> anyhow::Result<SplitSummary> {
        split_dump(SplitOptions {
            dump_path: self.dump_path.clone(),
            output_dir: Some(self.output_dir.clone()),
            verbose: false,
        })
    }

    /// Split the dump, panicking if the split fails
    pub fn split_successfully(&self) -> SplitSummary {
        self.split().expect("split failed")
    }

    /// Read an output file by its path relative to the output directory
    pub fn read_output(&self, relative: &str) -> String {
        std::fs::read_to_string(self.output_dir.join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    /// All written files, as sorted paths relative to the output directory
    pub fn output_files(&self) -> Vec<String> {
        let mut files: Vec<String> = walkdir::WalkDir::new(&self.output_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.output_dir)
                    .expect("path under output dir")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }
}

/// A small but representative schema dump: preamble, schema, extension,
/// enum type, trigger function with a dollar-quoted body, a table with an
/// identity column, constraint and index statements, and a view.
pub const SAMPLE_DUMP: &str = r#"--
-- PostgreSQL database dump
--

SET statement_timeout = 0;
SET client_encoding = 'UTF8';
SELECT pg_catalog.set_config('search_path', '', false);

--
-- Name: app; Type: SCHEMA; Schema: -; Owner: -
--

CREATE SCHEMA app;

--
-- Name: pgcrypto; Type: EXTENSION; Schema: -; Owner: -
--

CREATE EXTENSION IF NOT EXISTS pgcrypto WITH SCHEMA public;

--
-- Name: mood; Type: TYPE; Schema: public; Owner: -
--

CREATE TYPE public.mood AS ENUM (
    'sad',
    'ok',
    'happy'
);

--
-- Name: set_updated_at(); Type: FUNCTION; Schema: public; Owner: -
--

CREATE FUNCTION public.set_updated_at() RETURNS trigger
    LANGUAGE plpgsql
    AS $$
BEGIN
    NEW.updated_at := now();
    RETURN NEW;
END;
$$;

--
-- Name: users; Type: TABLE; Schema: public; Owner: -
--

CREATE TABLE public.users (
    id integer NOT NULL,
    email text NOT NULL,
    mood public.mood DEFAULT 'ok'::public.mood
);

--
-- Name: users id; Type: DEFAULT; Schema: public; Owner: -
--

ALTER TABLE ONLY public.users ALTER COLUMN id ADD GENERATED ALWAYS AS IDENTITY (
    SEQUENCE NAME public.users_id_seq
    START WITH 1
    INCREMENT BY 1
    NO MINVALUE
    NO MAXVALUE
    CACHE 1
);

--
-- Name: users users_pkey; Type: CONSTRAINT; Schema: public; Owner: -
--

ALTER TABLE ONLY public.users
    ADD CONSTRAINT users_pkey PRIMARY KEY (id);

--
-- Name: users_email_idx; Type: INDEX; Schema: public; Owner: -
--

CREATE INDEX users_email_idx ON public.users USING btree (email);

--
-- Name: active_users; Type: VIEW; Schema: app; Owner: -
--

CREATE VIEW app.active_users AS
 SELECT users.id,
    users.email
   FROM public.users;
"#;
