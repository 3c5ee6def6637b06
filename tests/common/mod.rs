//! In-memory repository that answers the `git` and `npm` commands the release
//! workflow issues, so whole runs can be checked against repository state.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use release_tag::exec::{CommandOutput, CommandRunner};
use release_tag::Result;
use tempfile::TempDir;

pub type Snapshot = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct RepoState {
    pub branch: String,
    /// Commit history, HEAD last
    pub commits: Vec<Snapshot>,
    pub worktree: Snapshot,
    /// Tag name -> index into `commits`
    pub tags: BTreeMap<String, usize>,
    pub remote_head: Option<Snapshot>,
    pub remote_tags: BTreeSet<String>,
    pub log: Vec<String>,
}

impl RepoState {
    pub fn head(&self) -> &Snapshot {
        self.commits.last().expect("repository has no commits")
    }

    fn dirty_entries(&self) -> Vec<String> {
        let head = self.head();
        let mut entries = Vec::new();
        for (path, content) in &self.worktree {
            match head.get(path) {
                None => entries.push(format!("?? {}", path)),
                Some(committed) if committed != content => entries.push(format!(" M {}", path)),
                _ => {}
            }
        }
        entries
    }
}

pub struct SimulatedRepo {
    dir: TempDir,
    /// Directory holding the manifest and lockfile, "" for the root
    package_dir: String,
    /// File the bump tool creates next to the manifest, if any
    bump_adds: Option<String>,
    state: Mutex<RepoState>,
    failures: Vec<(Vec<String>, CommandOutput)>,
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

pub fn package_json(version: &str) -> String {
    format!(
        "{{\n  \"name\": \"array-inspector\",\n  \"version\": \"{}\"\n}}\n",
        version
    )
}

pub fn lockfile(version: &str) -> String {
    format!(
        "{{\n  \"name\": \"array-inspector\",\n  \"version\": \"{}\",\n  \"lockfileVersion\": 3\n}}\n",
        version
    )
}

impl SimulatedRepo {
    /// Clean repository on `main` whose manifest and lockfile hold `version`
    pub fn with_version(version: &str) -> Self {
        Self::with_package_in("", version)
    }

    /// Same as [SimulatedRepo::with_version] with the package in `package_dir`
    pub fn with_package_in(package_dir: &str, version: &str) -> Self {
        let mut files = Snapshot::new();
        files.insert(join(package_dir, "package.json"), package_json(version));
        files.insert(join(package_dir, "package-lock.json"), lockfile(version));
        files.insert("README.md".to_string(), "# array-inspector\n".to_string());

        let state = RepoState {
            branch: "main".to_string(),
            commits: vec![files.clone()],
            worktree: files,
            ..Default::default()
        };

        let repo = SimulatedRepo {
            dir: TempDir::new().expect("temp dir"),
            package_dir: package_dir.to_string(),
            bump_adds: None,
            state: Mutex::new(state),
            failures: Vec::new(),
        };
        repo.sync_disk();
        repo
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Have the bump tool also create and commit `name` next to the manifest,
    /// as a `version` lifecycle script writing a changelog would
    pub fn bump_adds_file(mut self, name: &str) -> Self {
        self.bump_adds = Some(name.to_string());
        self
    }

    /// Make every command starting with `prefix` fail
    pub fn fail_on(&mut self, prefix: &[&str], stderr: &str) {
        self.failures.push((
            prefix.iter().map(|s| s.to_string()).collect(),
            CommandOutput::failed(1, stderr),
        ));
    }

    /// Add an uncommitted file to the working tree
    pub fn touch(&self, path: &str, content: &str) {
        self.state
            .lock()
            .unwrap()
            .worktree
            .insert(path.to_string(), content.to_string());
        self.sync_disk();
    }

    /// Create a tag at HEAD, as a leftover from an earlier run would be
    pub fn add_tag(&self, tag: &str) {
        let mut state = self.state.lock().unwrap();
        let head = state.commits.len() - 1;
        state.tags.insert(tag.to_string(), head);
    }

    pub fn state(&self) -> RepoState {
        self.state.lock().unwrap().clone()
    }

    pub fn manifest_on_disk(&self) -> String {
        fs::read_to_string(self.root().join(join(&self.package_dir, "package.json"))).unwrap()
    }

    fn sync_disk(&self) {
        let state = self.state.lock().unwrap();
        for (path, content) in &state.worktree {
            let full: PathBuf = self.root().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
    }

    fn execute(&self, dir: &str, argv: &[&str]) -> CommandOutput {
        let mut state = self.state.lock().unwrap();
        state.log.push(argv.join(" "));

        match argv {
            ["git", "rev-parse", "--abbrev-ref", "HEAD"] => {
                CommandOutput::ok(format!("{}\n", state.branch))
            }
            ["git", "status", "--porcelain"] => {
                let entries = state.dirty_entries();
                CommandOutput::ok(entries.join("\n"))
            }
            ["npm", "version", "minor", "-m", message] => {
                let manifest = join(dir, "package.json");
                if !state.worktree.contains_key(&manifest) {
                    return CommandOutput::failed(
                        254,
                        format!("npm ERR! enoent Could not read package.json in '{}'", dir),
                    );
                }
                if !state.dirty_entries().is_empty() {
                    return CommandOutput::failed(1, "npm ERR! Git working directory not clean.");
                }
                let current = extract_version(&state.worktree[&manifest]);
                let parts: Vec<u64> = current.split('.').map(|p| p.parse().unwrap()).collect();
                let next = format!("{}.{}.0", parts[0], parts[1] + 1);
                let tag = format!("v{}", next);
                if state.tags.contains_key(&tag) {
                    return CommandOutput::failed(1, "npm ERR! fatal: tag already exists");
                }
                state.worktree.insert(manifest, package_json(&next));
                state
                    .worktree
                    .insert(join(dir, "package-lock.json"), lockfile(&next));
                if let Some(name) = &self.bump_adds {
                    state
                        .worktree
                        .insert(join(dir, name), format!("## {}\n", next));
                }
                let snapshot = state.worktree.clone();
                state.commits.push(snapshot);
                let head = state.commits.len() - 1;
                state.tags.insert(tag, head);
                CommandOutput::ok(format!("v{}\n{}", next, message.replace("%s", &next)))
            }
            ["git", "tag", "-d", tag] => match state.tags.remove(*tag) {
                Some(_) => CommandOutput::ok(format!("Deleted tag '{}'", tag)),
                None => CommandOutput::failed(1, format!("error: tag '{}' not found.", tag)),
            },
            ["git", "tag", "--list"] => {
                let names: Vec<&str> = state.tags.keys().map(String::as_str).collect();
                CommandOutput::ok(names.join("\n"))
            }
            ["git", "tag", tag] => {
                if state.tags.contains_key(*tag) {
                    return CommandOutput::failed(
                        128,
                        format!("fatal: tag '{}' already exists", tag),
                    );
                }
                let head = state.commits.len() - 1;
                state.tags.insert(tag.to_string(), head);
                CommandOutput::ok("")
            }
            ["git", "diff", "--name-status", "--no-renames", "--relative", "HEAD~1", "HEAD"] => {
                if state.commits.len() < 2 {
                    return CommandOutput::failed(128, "fatal: bad revision 'HEAD~1'");
                }
                let head = &state.commits[state.commits.len() - 1];
                let parent = &state.commits[state.commits.len() - 2];
                let paths: BTreeSet<&String> = head.keys().chain(parent.keys()).collect();
                let changed: Vec<String> = paths
                    .into_iter()
                    .filter_map(|path| match (parent.get(path), head.get(path)) {
                        (None, Some(_)) => Some(format!("A\t{}", path)),
                        (Some(_), None) => Some(format!("D\t{}", path)),
                        (Some(a), Some(b)) if a != b => Some(format!("M\t{}", path)),
                        _ => None,
                    })
                    .collect();
                CommandOutput::ok(changed.join("\n"))
            }
            ["git", "ls-files", "--", paths @ ..] => {
                let head = state.head();
                let tracked: Vec<&str> = paths
                    .iter()
                    .copied()
                    .filter(|p| head.contains_key(*p))
                    .collect();
                CommandOutput::ok(tracked.join("\n"))
            }
            ["git", "reset", "HEAD~1"] => {
                if state.commits.len() < 2 {
                    return CommandOutput::failed(128, "fatal: ambiguous argument 'HEAD~1'");
                }
                state.commits.pop();
                CommandOutput::ok("Unstaged changes after reset:")
            }
            ["git", "restore", "--", paths @ ..] => {
                let head = state.head().clone();
                for path in paths {
                    match head.get(*path) {
                        Some(content) => {
                            state.worktree.insert(path.to_string(), content.clone());
                        }
                        None => {
                            return CommandOutput::failed(
                                1,
                                format!("error: pathspec '{}' did not match", path),
                            )
                        }
                    }
                }
                CommandOutput::ok("")
            }
            ["git", "clean", "-f", "--", paths @ ..] => {
                let head = state.head().clone();
                for path in paths {
                    if !head.contains_key(*path) && state.worktree.remove(*path).is_some() {
                        let _ = fs::remove_file(self.root().join(path));
                    }
                }
                CommandOutput::ok("")
            }
            ["git", "push", _remote, target] => {
                let tag = target.strip_prefix("refs/tags/");
                if tag.is_none() && *target == state.branch {
                    let head = state.head().clone();
                    state.remote_head = Some(head);
                    CommandOutput::ok("")
                } else if let Some(tag) = tag.filter(|t| state.tags.contains_key(*t)) {
                    state.remote_tags.insert(tag.to_string());
                    CommandOutput::ok("")
                } else {
                    CommandOutput::failed(
                        1,
                        format!("error: src refspec {} does not match any", target),
                    )
                }
            }
            other => CommandOutput::failed(127, format!("unsupported command: {:?}", other)),
        }
    }
}

fn extract_version(manifest: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(manifest).unwrap();
    value["version"].as_str().unwrap().to_string()
}

impl CommandRunner for SimulatedRepo {
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut argv = vec![program];
        argv.extend_from_slice(args);

        let failure = self.failures.iter().find(|(prefix, _)| {
            argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, p)| *a == p.as_str())
        });
        if let Some((_, output)) = failure {
            self.state.lock().unwrap().log.push(argv.join(" "));
            return Ok(output.clone());
        }

        let output = self.execute(&dir.to_string_lossy(), &argv);
        self.sync_disk();
        Ok(output)
    }
}
