// SPDX-License-Identifier: MIT

//! `port task ...` — create/list/show/cancel tasks, plus the two
//! self-spawning entry points (`daemon`, `worker`) the daemon and its
//! workers invoke on the same binary.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Args, Subcommand, ValueEnum};
use port_adapters::{LocalAdapter, WorkerAdapter};
use port_core::TaskMode;
use port_storage::{resolve_task_ref, ResolveOutcome, RepoPaths, TaskIndexStore};

use crate::repo::repo_root_arg;

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Read,
    Write,
}

impl From<ModeArg> for TaskMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Read => TaskMode::Read,
            ModeArg::Write => TaskMode::Write,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Create a queued task and ensure the repo's daemon is running.
    Create {
        title: String,
        #[arg(long, value_enum, default_value = "read")]
        mode: ModeArg,
        /// Required for write-mode tasks; the branch the task's worktree is based on.
        #[arg(long)]
        branch: Option<String>,
        #[arg(long, default_value = "local")]
        adapter: String,
        #[arg(long)]
        repo: Option<PathBuf>,
    },
    /// List every task in the repo's index.
    List {
        #[arg(long)]
        repo: Option<PathBuf>,
    },
    /// Show one task, resolved by display id, full id, or id prefix.
    Show {
        reference: String,
        #[arg(long)]
        repo: Option<PathBuf>,
    },
    /// Cancel a task: best-effort SIGTERM to its worker, transition to cancelled.
    Cancel {
        reference: String,
        #[arg(long)]
        repo: Option<PathBuf>,
    },
    /// Run the 1Hz scheduling loop for `--repo` until idle-timeout or a signal.
    /// Invoked by `ensureDaemon`, not normally typed by hand.
    Daemon {
        #[arg(long)]
        serve: bool,
        #[arg(long)]
        repo: PathBuf,
    },
    /// Run one task to completion inside an already-prepared worktree.
    /// Invoked by the local adapter's `start`, not normally typed by hand.
    Worker {
        #[arg(long = "task-id")]
        task_id: String,
        #[arg(long)]
        repo: PathBuf,
        #[arg(long)]
        worktree: PathBuf,
    },
}

pub async fn run(args: TaskArgs) -> Result<()> {
    match args.command {
        TaskCommand::Create { title, mode, branch, adapter, repo } => {
            create(title, mode.into(), branch, adapter, repo).await
        }
        TaskCommand::List { repo } => list(repo),
        TaskCommand::Show { reference, repo } => show(reference, repo),
        TaskCommand::Cancel { reference, repo } => cancel(reference, repo).await,
        TaskCommand::Daemon { serve, repo } => daemon(serve, repo).await,
        TaskCommand::Worker { task_id, repo, worktree } => worker(task_id, repo, worktree).await,
    }
}

async fn create(
    title: String,
    mode: TaskMode,
    branch: Option<String>,
    adapter_name: String,
    repo: Option<PathBuf>,
) -> Result<()> {
    if mode == TaskMode::Write && branch.is_none() {
        return Err(anyhow!("--branch is required for write-mode tasks"));
    }

    let repo_root = repo_root_arg(repo)?;
    let paths = RepoPaths::new(&repo_root);
    std::fs::create_dir_all(paths.dot_port())?;
    let index = TaskIndexStore::new(paths.clone());

    let adapter: Box<dyn WorkerAdapter> = match adapter_name.as_str() {
        "local" => Box::new(LocalAdapter::new()),
        other => return Err(anyhow!("unknown adapter: {other}")),
    };

    let now = Utc::now();
    let task = index.create_task(title, mode, branch, adapter.name(), now)?;
    index.patch_task(task.id, |t| t.capabilities = adapter.capabilities(), now)?;

    let binary = port_daemon::current_binary();
    port_daemon::ensure_daemon(&repo_root, &binary)?;

    println!("created task {} (#{})", task.id, task.display_id);
    Ok(())
}

fn list(repo: Option<PathBuf>) -> Result<()> {
    let repo_root = repo_root_arg(repo)?;
    let index = TaskIndexStore::new(RepoPaths::new(&repo_root));
    let mut tasks = index.list_tasks();
    tasks.sort_by_key(|t| t.display_id);

    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for task in tasks {
        let branch = task.branch.as_deref().unwrap_or("-");
        println!(
            "#{:<4} {:<10} {:<8} {:<20} branch={} {}",
            task.display_id,
            format!("{:?}", task.status).to_lowercase(),
            format!("{:?}", task.mode).to_lowercase(),
            task.id,
            branch,
            task.title,
        );
    }
    Ok(())
}

fn show(reference: String, repo: Option<PathBuf>) -> Result<()> {
    let repo_root = repo_root_arg(repo)?;
    let index = TaskIndexStore::new(RepoPaths::new(&repo_root));
    let tasks = index.list_tasks();

    match resolve_task_ref(&tasks, &reference) {
        ResolveOutcome::Found(task) => {
            println!("{}", serde_json::to_string_pretty(&task)?);
            Ok(())
        }
        ResolveOutcome::Ambiguous(candidates) => {
            let ids: Vec<_> = candidates.iter().map(|t| t.id.to_string()).collect();
            Err(anyhow!("ambiguous task reference {reference:?}, matches: {}", ids.join(", ")))
        }
        ResolveOutcome::NotFound => Err(anyhow!("no task matches {reference:?}")),
    }
}

async fn cancel(reference: String, repo: Option<PathBuf>) -> Result<()> {
    let repo_root = repo_root_arg(repo)?;
    let paths = RepoPaths::new(&repo_root);
    let index = TaskIndexStore::new(paths.clone());
    let tasks = index.list_tasks();

    let task = match resolve_task_ref(&tasks, &reference) {
        ResolveOutcome::Found(task) => task,
        ResolveOutcome::Ambiguous(candidates) => {
            let ids: Vec<_> = candidates.iter().map(|t| t.id.to_string()).collect();
            return Err(anyhow!("ambiguous task reference {reference:?}, matches: {}", ids.join(", ")));
        }
        ResolveOutcome::NotFound => return Err(anyhow!("no task matches {reference:?}")),
    };

    if task.status.is_terminal() {
        println!("task {} is already {:?}", task.id, task.status);
        return Ok(());
    }

    if let Some(pid) = task.runtime.worker_pid {
        let adapter = LocalAdapter::new();
        let handle = port_adapters::WorkerHandle {
            worker_pid: pid,
            worktree_path: task.runtime.worktree_path.clone().map(PathBuf::from).unwrap_or_default(),
            branch: task.branch.clone().unwrap_or_default(),
        };
        let _ = adapter.cancel(&handle).await;
    }

    let now = Utc::now();
    index.patch_task(task.id, |t| t.runtime.retained_for_debug = true, now)?;
    index.update_task_status(task.id, port_core::TaskStatus::Cancelled, Some("cancelled by user".into()), now)?;
    println!("cancelled task {}", task.id);
    Ok(())
}

async fn daemon(serve: bool, repo: PathBuf) -> Result<()> {
    if !serve {
        return Err(anyhow!("`port task daemon` only supports --serve"));
    }
    let paths = RepoPaths::new(&repo);
    let _guard = port_daemon::log::init(&paths.runtime_dir())?;
    port_daemon::serve(&repo).await?;
    Ok(())
}

async fn worker(task_id: String, repo: PathBuf, worktree: PathBuf) -> Result<()> {
    port_daemon::run_worker(&repo, &task_id, &worktree).await?;
    Ok(())
}
