//! The per-file driver.
//!
//! Each file is read, parsed, rewritten against a file-local lookup table,
//! diffed against its original tree, serialized, and persisted. The local
//! lookup entries are folded into the run's table only once all of that has
//! succeeded, so a failing file leaves no trace in the final table.

use std::fs;
use std::io::Write;
use std::path::Path;

use rekey_diff::{diff_nodes, NodeDiff};
use rekey_rewrite::rewrite;
use rekey_types::{LookupTable, PrefixSpec};
use rekey_yaml::{BlockForSpecial, StylePolicy, YamlCodec};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::{BatchConfig, ErrorPolicy};
use crate::error::{BatchError, BatchResult};
use crate::report::{FileOutcome, RunReport};

/// Runs configured documents through the rewrite pipeline.
pub struct Pipeline<P = BlockForSpecial> {
    config: BatchConfig,
    codec: YamlCodec<P>,
}

impl Pipeline {
    /// A pipeline using the literal-block style policy and the codec options
    /// from `config`.
    pub fn new(config: BatchConfig) -> Self {
        let codec = YamlCodec::default()
            .with_repair(config.repair_block_scalars)
            .with_verify(config.verify_round_trip);
        Self { config, codec }
    }
}

impl<P: StylePolicy> Pipeline<P> {
    /// A pipeline with a caller-built codec; the codec options in `config`
    /// are ignored.
    pub fn with_codec(config: BatchConfig, codec: YamlCodec<P>) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process every configured document in order.
    ///
    /// `observe` sees each outcome as soon as it is known. Under
    /// [`ErrorPolicy::Strict`] the first failure is observed and then
    /// returned as [`BatchError::Aborted`].
    pub fn run(
        &self,
        prefix: &str,
        mut observe: impl FnMut(&FileOutcome),
    ) -> BatchResult<RunReport> {
        let mut report = RunReport::default();

        for class in &self.config.documents {
            let path = self.config.path_of(class);
            let file = class.file.clone();

            let outcome = if !path.exists() {
                warn!(%file, "skipping missing document");
                FileOutcome::Skipped { file }
            } else {
                match self.process_file(&path, &class.spec(prefix), &mut report.lookup) {
                    Ok(diff) => {
                        info!(%file, changes = diff.len(), "processed document");
                        FileOutcome::Processed { file, changes: diff.changes }
                    }
                    Err(err) if self.config.policy == ErrorPolicy::Strict => {
                        observe(&FileOutcome::Failed { file: file.clone(), error: err.to_string() });
                        return Err(BatchError::Aborted { file, source: Box::new(err) });
                    }
                    Err(err) => {
                        warn!(%file, error = %err, "failed to process document");
                        FileOutcome::Failed { file, error: err.to_string() }
                    }
                }
            };

            observe(&outcome);
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    /// Rewrite a single document in place and return its changes.
    ///
    /// `lookup` is only extended when the whole file succeeded.
    pub fn process_file(
        &self,
        path: &Path,
        spec: &PrefixSpec,
        lookup: &mut LookupTable,
    ) -> BatchResult<NodeDiff> {
        let text = fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        let original = self.codec.decode(&text)?;
        debug!(path = %path.display(), kind = original.kind(), "parsed document");

        let mut staged = LookupTable::new();
        let updated = rewrite(&original, spec, &mut staged);
        let diff = diff_nodes(&original, &updated);
        let rendered = self.codec.encode(&updated)?;

        if self.config.write {
            persist(path, &rendered)?;
        } else {
            debug!(path = %path.display(), "dry run, not writing");
        }

        lookup.merge(staged);
        Ok(diff)
    }
}

/// Replace `path` with `contents` via a temporary file in the same directory.
fn persist(path: &Path, contents: &str) -> BatchResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)
        .map_err(|e| BatchError::io(path, e))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| BatchError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| BatchError::io(path, e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| BatchError::io(path, e))?;
    tmp.persist(path).map_err(|e| BatchError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentClass;
    use rekey_types::Node;

    const ORGS: &str = "\
- name: infra
  description: Core infrastructure
- name: dev_apps
";

    const JOBS: &str = "\
- name: deploy
  organization: infra
  project: site
  credentials:
  - aws
  - vault
  extra_vars: |
    target: \"prod\"
";

    const MALFORMED: &str = "name: [unclosed\n";

    fn config(dir: &Path, documents: Vec<DocumentClass>) -> BatchConfig {
        BatchConfig {
            directory: dir.to_path_buf(),
            documents,
            ..Default::default()
        }
    }

    fn classes() -> Vec<DocumentClass> {
        vec![
            DocumentClass::new("orgs.yaml", ["name"]),
            DocumentClass::new("projects.yaml", ["name", "organization"]),
            DocumentClass::new(
                "job_templates.yaml",
                ["name", "organization", "project", "credentials"],
            ),
        ]
    }

    fn write(dir: &Path, file: &str, contents: &str) {
        fs::write(dir.join(file), contents).unwrap();
    }

    fn read(dir: &Path, file: &str) -> String {
        fs::read_to_string(dir.join(file)).unwrap()
    }

    #[test]
    fn rewrites_files_and_builds_lookup() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", ORGS);
        write(dir.path(), "job_templates.yaml", JOBS);

        let pipeline = Pipeline::new(config(dir.path(), classes()));
        let mut seen = Vec::new();
        let report = pipeline.run("dev_", |o| seen.push(o.file().to_string())).unwrap();

        assert_eq!(seen, ["orgs.yaml", "projects.yaml", "job_templates.yaml"]);
        assert_eq!(report.processed(), 2);
        assert_eq!(report.skipped(), 1);

        assert_eq!(
            read(dir.path(), "orgs.yaml"),
            "- name: dev_infra\n  description: Core infrastructure\n- name: dev_apps\n"
        );
        assert_eq!(
            read(dir.path(), "job_templates.yaml"),
            "\
- name: dev_deploy
  organization: dev_infra
  project: dev_site
  credentials:
  - aws
  - vault
  extra_vars: |
    target: \"prod\"
"
        );

        let lookup: Vec<_> = report.lookup.iter().collect();
        assert_eq!(
            lookup,
            vec![
                ("infra", "dev_infra"),
                ("deploy", "dev_deploy"),
                ("site", "dev_site"),
            ]
        );
    }

    #[test]
    fn change_records_follow_document_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "job_templates.yaml", JOBS);

        let pipeline = Pipeline::new(config(dir.path(), classes()));
        let report = pipeline.run("dev_", |_| {}).unwrap();

        let FileOutcome::Processed { changes, .. } = &report.outcomes[2] else {
            panic!("expected processed outcome");
        };
        let lines: Vec<String> = changes.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "[0].name: deploy -> dev_deploy",
                "[0].organization: infra -> dev_infra",
                "[0].project: site -> dev_site",
            ]
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", ORGS);

        let pipeline = Pipeline::new(config(dir.path(), classes()));
        pipeline.run("dev_", |_| {}).unwrap();
        let after_first = read(dir.path(), "orgs.yaml");

        let report = pipeline.run("dev_", |_| {}).unwrap();
        assert_eq!(report.total_changes(), 0);
        assert!(report.lookup.is_empty());
        assert_eq!(read(dir.path(), "orgs.yaml"), after_first);
    }

    #[test]
    fn resilient_policy_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", ORGS);
        write(dir.path(), "projects.yaml", MALFORMED);
        write(dir.path(), "job_templates.yaml", JOBS);

        let pipeline = Pipeline::new(config(dir.path(), classes()));
        let report = pipeline.run("dev_", |_| {}).unwrap();

        assert_eq!(report.processed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.outcomes[1].is_failure());
        assert_eq!(read(dir.path(), "projects.yaml"), MALFORMED);
        assert!(read(dir.path(), "job_templates.yaml").contains("dev_deploy"));
    }

    #[test]
    fn numeric_keys_fail_instead_of_being_retyped() {
        let dir = tempfile::tempdir().unwrap();
        let text = "- name: infra\n  ports:\n    1: one\n";
        write(dir.path(), "orgs.yaml", text);

        let pipeline = Pipeline::new(config(dir.path(), classes()));
        let report = pipeline.run("dev_", |_| {}).unwrap();

        match &report.outcomes[0] {
            FileOutcome::Failed { file, error } => {
                assert_eq!(file, "orgs.yaml");
                assert!(error.contains("number"), "{error}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(report.lookup.is_empty());
        assert_eq!(read(dir.path(), "orgs.yaml"), text);
    }

    #[test]
    fn strict_policy_aborts_and_leaves_later_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", ORGS);
        write(dir.path(), "projects.yaml", MALFORMED);
        write(dir.path(), "job_templates.yaml", JOBS);

        let mut cfg = config(dir.path(), classes());
        cfg.policy = ErrorPolicy::Strict;
        let pipeline = Pipeline::new(cfg);

        let mut seen = Vec::new();
        let err = pipeline.run("dev_", |o| seen.push(o.clone())).unwrap_err();

        match err {
            BatchError::Aborted { file, source } => {
                assert_eq!(file, "projects.yaml");
                assert!(matches!(*source, BatchError::Yaml(_)));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
        assert_eq!(seen.len(), 2);
        assert!(seen[1].is_failure());
        assert!(read(dir.path(), "orgs.yaml").contains("dev_infra"));
        assert_eq!(read(dir.path(), "job_templates.yaml"), JOBS);
    }

    #[test]
    fn failed_files_contribute_no_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config(dir.path(), classes()));
        let spec = PrefixSpec::new("dev_", ["name"]);
        let mut lookup = LookupTable::new();
        lookup.record("keep", "dev_keep");

        let missing = dir.path().join("absent.yaml");
        assert!(pipeline.process_file(&missing, &spec, &mut lookup).is_err());

        write(dir.path(), "bad.yaml", MALFORMED);
        assert!(pipeline.process_file(&dir.path().join("bad.yaml"), &spec, &mut lookup).is_err());

        assert_eq!(lookup.len(), 1);
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", ORGS);

        let mut cfg = config(dir.path(), classes());
        cfg.write = false;
        let report = Pipeline::new(cfg).run("dev_", |_| {}).unwrap();

        assert_eq!(read(dir.path(), "orgs.yaml"), ORGS);
        assert_eq!(report.total_changes(), 1);
        assert_eq!(report.lookup.get("infra"), Some("dev_infra"));
    }

    #[test]
    fn inline_block_scalars_are_repaired() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", "- name: infra\n  description: | managed by ops\n");

        let report = Pipeline::new(config(dir.path(), classes())).run("dev_", |_| {}).unwrap();

        assert_eq!(report.failed(), 0);
        assert_eq!(
            read(dir.path(), "orgs.yaml"),
            "- name: dev_infra\n  description: |\n    managed by ops\n"
        );
    }

    #[test]
    fn repair_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", "- name: infra\n  description: | managed by ops\n");

        let mut cfg = config(dir.path(), classes());
        cfg.repair_block_scalars = false;
        let report = Pipeline::new(cfg).run("dev_", |_| {}).unwrap();

        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn custom_codec_policy() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", "name: infra\n");

        let codec = YamlCodec::new(|_: &str| rekey_yaml::ScalarStyle::DoubleQuoted);
        let pipeline = Pipeline::with_codec(config(dir.path(), classes()), codec);
        pipeline.run("dev_", |_| {}).unwrap();

        assert_eq!(read(dir.path(), "orgs.yaml"), "name: \"dev_infra\"\n");
    }

    #[test]
    fn empty_documents_round_trip_as_null() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", "");

        let report = Pipeline::new(config(dir.path(), classes())).run("dev_", |_| {}).unwrap();

        assert_eq!(report.processed(), 1);
        assert_eq!(read(dir.path(), "orgs.yaml"), "null\n");
    }

    #[test]
    fn process_file_reports_diff() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one.yaml", "name: web\norganization: infra\n");
        let pipeline = Pipeline::new(config(dir.path(), classes()));
        let spec = PrefixSpec::new("dev_", ["name", "organization"]);
        let mut lookup = LookupTable::new();

        let diff = pipeline
            .process_file(&dir.path().join("one.yaml"), &spec, &mut lookup)
            .unwrap();

        assert_eq!(diff.modifications(), 2);
        assert_eq!(diff.changes[1].new, Some(Node::from("dev_infra")));
        assert_eq!(lookup.get("web"), Some("dev_web"));
    }

    #[cfg(unix)]
    #[test]
    fn persist_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orgs.yaml", ORGS);
        let path = dir.path().join("orgs.yaml");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        Pipeline::new(config(dir.path(), classes())).run("dev_", |_| {}).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
